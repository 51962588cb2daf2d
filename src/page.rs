//! Page composer: mounts the hero layers in z-order, routes input and drives the contact overlay.

use std::time::Duration;

use crate::{
    config::{GridStyle, ParallaxSettings, SiteConfig},
    contact::{
        form::{ContactForm, SubmitStatus, SubmitStep, Submission},
        overlay::ContactOverlay,
        relay::Relay,
    },
    foundation::{
        core::{FrameStep, Point, Viewport},
        error::KloudyResult,
    },
    render::{
        backend::{FrameRGBA, RenderBackend},
        plan::FramePlan,
    },
    scene::{
        FrameCtx, Layer, SceneInput,
        hero::{HeroRole, HeroText},
        horizon::HorizonLayer,
        parallax::ParallaxConfig,
        perspective::PerspectiveLayer,
        shooting_stars::ShootingStarsLayer,
        starfield::StarfieldLayer,
    },
    theme::Theme,
};

/// Handle returned by [`Page::mount`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayerId(u64);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PageEvent {
    PointerMove(Point),
    Click(Point),
    TouchStart,
    /// Device orientation sample in degrees.
    Orientation { beta: f64, gamma: f64 },
    PermissionResult(bool),
    Resize(Viewport),
}

/// What the host has to do after an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageResponse {
    Nothing,
    /// Ask the platform for device orientation access, then report back with
    /// [`PageEvent::PermissionResult`].
    RequestOrientationPermission,
    /// The submit button produced a valid submission; send it and call [`Page::finish_submit`].
    Submit(Submission),
}

struct Mounted {
    id: LayerId,
    layer: Box<dyn Layer>,
}

pub struct Page {
    theme: Theme,
    viewport: Viewport,
    rng: fastrand::Rng,
    layers: Vec<Mounted>,
    next_id: u64,
    contact: ContactOverlay,
}

impl Page {
    /// Build the page for `config` with the standard layers mounted.
    pub fn new(config: &SiteConfig, viewport: Viewport) -> Self {
        Self::with_rng(config, viewport, fastrand::Rng::new())
    }

    /// Like [`Page::new`] with an explicit random source, for reproducible scenes.
    pub fn with_rng(config: &SiteConfig, viewport: Viewport, rng: fastrand::Rng) -> Self {
        let mut page = Self::empty(Theme::builtin(config.theme), viewport, rng);
        page.contact = ContactOverlay::new(ContactForm::new(config.auto_close()));

        let stars = StarfieldLayer::new(config.star_count, viewport, &mut page.rng);
        page.mount(Box::new(stars));
        page.mount(Box::new(ShootingStarsLayer::new(config.shooting_star_chance)));
        match config.grid_style {
            GridStyle::Curved => page.mount(Box::new(HorizonLayer::new())),
            GridStyle::Perspective => page.mount(Box::new(PerspectiveLayer::new())),
        };
        let p = &config.parallax;
        page.mount(Box::new(HeroText::new(
            HeroRole::Title,
            parallax_config(p, p.hero_intensity),
        )));
        page.mount(Box::new(HeroText::new(
            HeroRole::Tagline,
            parallax_config(p, p.tagline_intensity),
        )));
        page
    }

    /// A page with no layers mounted.
    pub fn empty(theme: Theme, viewport: Viewport, rng: fastrand::Rng) -> Self {
        Self {
            theme,
            viewport,
            rng,
            layers: Vec::new(),
            next_id: 0,
            contact: ContactOverlay::new(ContactForm::default()),
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn contact(&self) -> &ContactOverlay {
        &self.contact
    }

    pub fn contact_mut(&mut self) -> &mut ContactOverlay {
        &mut self.contact
    }

    /// Names of the mounted layers, bottom to top.
    pub fn layer_names(&self) -> Vec<&'static str> {
        self.layers.iter().map(|m| m.layer.name()).collect()
    }

    /// Register a per-frame layer. Layers with equal z keep mount order.
    pub fn mount(&mut self, layer: Box<dyn Layer>) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        let at = self.layers.partition_point(|m| m.layer.z() <= layer.z());
        tracing::debug!(layer = layer.name(), z = layer.z(), "layer mounted");
        self.layers.insert(at, Mounted { id, layer });
        id
    }

    /// Stop updating and drawing a layer. Returns it, or `None` if `id` is not mounted.
    pub fn unmount(&mut self, id: LayerId) -> Option<Box<dyn Layer>> {
        let at = self.layers.iter().position(|m| m.id == id)?;
        let removed = self.layers.remove(at);
        tracing::debug!(layer = removed.layer.name(), "layer unmounted");
        Some(removed.layer)
    }

    /// Advance every mounted layer and the overlay by one step.
    pub fn tick(&mut self, step: FrameStep) {
        let ctx = FrameCtx {
            viewport: self.viewport,
            theme: &self.theme,
            step,
        };
        for m in &mut self.layers {
            m.layer.advance(&ctx, &mut self.rng);
        }
        self.contact.advance(step);
    }

    pub fn tick_duration(&mut self, dt: Duration) {
        self.tick(FrameStep::from_duration(dt));
    }

    pub fn handle_event(&mut self, event: PageEvent) -> PageResponse {
        match event {
            PageEvent::PointerMove(p) => self.route(SceneInput::PointerMove(p)),
            PageEvent::TouchStart => self.route(SceneInput::TouchStart),
            PageEvent::Orientation { beta, gamma } => {
                self.route(SceneInput::Orientation { beta, gamma })
            }
            PageEvent::PermissionResult(granted) => {
                self.route(SceneInput::PermissionResult(granted))
            }
            PageEvent::Resize(viewport) => {
                self.viewport = viewport;
                PageResponse::Nothing
            }
            PageEvent::Click(p) => {
                if !self.contact.is_open() {
                    self.contact.open(&mut self.rng);
                    return PageResponse::Nothing;
                }
                match self.contact.click(p, self.viewport) {
                    Some(SubmitStep::Ready(submission)) => PageResponse::Submit(submission),
                    _ => PageResponse::Nothing,
                }
            }
        }
    }

    fn route(&mut self, input: SceneInput) -> PageResponse {
        let mut request = false;
        for m in &mut self.layers {
            request |= m.layer.on_input(&input, self.viewport);
        }
        if request {
            PageResponse::RequestOrientationPermission
        } else {
            PageResponse::Nothing
        }
    }

    /// Apply the relay outcome for a [`PageResponse::Submit`].
    pub fn finish_submit(&mut self, outcome: KloudyResult<()>) {
        self.contact.form_mut().finish_submit(outcome);
    }

    /// Validate the form and send it through `relay` in one go.
    pub async fn submit_contact(&mut self, relay: &dyn Relay) -> SubmitStatus {
        self.contact.form_mut().submit(relay).await
    }

    #[tracing::instrument(skip(self), fields(layers = self.layers.len()))]
    pub fn plan(&self) -> FramePlan {
        let ctx = FrameCtx {
            viewport: self.viewport,
            theme: &self.theme,
            step: FrameStep::ONE,
        };
        let mut plan = FramePlan::new(self.viewport, self.theme.background);
        if !self.viewport.is_drawable() {
            return plan;
        }
        for m in &self.layers {
            plan.push_layer(m.layer.plan(&ctx));
        }
        for layer in self.contact.plan(self.viewport, &self.theme) {
            plan.push_layer(layer);
        }
        plan
    }

    pub fn render(&self, backend: &mut dyn RenderBackend) -> KloudyResult<FrameRGBA> {
        backend.render_plan(&self.plan())
    }
}

fn parallax_config(settings: &ParallaxSettings, intensity: f64) -> ParallaxConfig {
    ParallaxConfig {
        intensity,
        touch_intensity: intensity * settings.touch_multiplier,
        mode: settings.input,
        needs_permission: settings.orientation_needs_permission,
    }
}

#[cfg(test)]
#[path = "../tests/unit/page.rs"]
mod tests;
