use crate::{
    animation::ease::Ease,
    foundation::core::{FrameStep, Point, Vec2, Viewport},
};

/// Largest horizontal/vertical shift, in CSS pixels, at intensity 1.
const MAX_SHIFT: Vec2 = Vec2::new(20.0, 15.0);
const TRANSITION_SECS: f64 = 0.3;
const TILT_LIMIT_DEG: f64 = 30.0;
/// Front-back tilt of a phone held comfortably; treated as "no tilt".
const BETA_REST_DEG: f64 = 45.0;
const TILT_SMOOTHING: f64 = 0.15;

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    #[default]
    Pointer,
    Touch,
}

/// Device orientation permission, as granted by the platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Permission {
    Unrequested,
    Requesting,
    Granted,
    Denied,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParallaxConfig {
    pub intensity: f64,
    pub touch_intensity: f64,
    pub mode: InputMode,
    /// Whether the platform asks the user before delivering orientation samples.
    pub needs_permission: bool,
}

impl ParallaxConfig {
    /// Pointer-driven config; touch intensity defaults to twice `intensity`.
    pub fn pointer(intensity: f64) -> Self {
        Self {
            intensity,
            touch_intensity: intensity * 2.0,
            mode: InputMode::Pointer,
            needs_permission: true,
        }
    }

    pub fn touch(intensity: f64, needs_permission: bool) -> Self {
        Self {
            mode: InputMode::Touch,
            needs_permission,
            ..Self::pointer(intensity)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Transition {
    from: Vec2,
    to: Vec2,
    elapsed_secs: f64,
}

/// Offset applied to wrapped content, driven by the pointer or by device tilt.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Parallax {
    config: ParallaxConfig,
    offset: Vec2,
    transition: Option<Transition>,
    permission: Permission,
}

impl Parallax {
    pub fn new(config: ParallaxConfig) -> Self {
        let permission = if config.mode == InputMode::Touch && !config.needs_permission {
            Permission::Granted
        } else {
            Permission::Unrequested
        };
        Self {
            config,
            offset: Vec2::ZERO,
            transition: None,
            permission,
        }
    }

    pub fn config(&self) -> ParallaxConfig {
        self.config
    }

    /// Offset currently displayed.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Offset the current transition is heading to.
    pub fn target(&self) -> Vec2 {
        self.transition.map_or(self.offset, |t| t.to)
    }

    pub fn permission(&self) -> Permission {
        self.permission
    }

    /// Retarget from the pointer position; restarts the transition from the displayed offset.
    pub fn on_pointer_move(&mut self, pointer: Point, viewport: Viewport) {
        if self.config.mode != InputMode::Pointer || !viewport.is_drawable() {
            return;
        }
        let c = viewport.center();
        let nx = (pointer.x - c.x) / c.x;
        let ny = (pointer.y - c.y) / c.y;
        let to = Vec2::new(
            nx * MAX_SHIFT.x * self.config.intensity,
            ny * MAX_SHIFT.y * self.config.intensity,
        );
        self.transition = Some(Transition {
            from: self.offset,
            to,
            elapsed_secs: 0.0,
        });
    }

    /// Progress the pointer transition.
    pub fn advance(mut self, step: FrameStep) -> Self {
        let Some(mut t) = self.transition else {
            return self;
        };
        t.elapsed_secs += step.as_secs();
        let p = Ease::PARALLAX.apply(t.elapsed_secs / TRANSITION_SECS);
        self.offset = t.from.lerp(t.to, p);
        self.transition = (t.elapsed_secs < TRANSITION_SECS).then_some(t);
        self
    }

    /// First touch in touch mode. Returns `true` when a permission request must be issued.
    pub fn on_touch_start(&mut self) -> bool {
        if self.config.mode != InputMode::Touch || self.permission != Permission::Unrequested {
            return false;
        }
        if self.config.needs_permission {
            self.permission = Permission::Requesting;
            tracing::debug!("orientation permission requested");
            true
        } else {
            self.permission = Permission::Granted;
            false
        }
    }

    pub fn resolve_permission(&mut self, granted: bool) {
        if self.permission != Permission::Requesting {
            return;
        }
        self.permission = if granted {
            Permission::Granted
        } else {
            Permission::Denied
        };
        tracing::debug!(granted, "orientation permission resolved");
    }

    /// Smooth toward the offset implied by a tilt sample (degrees).
    pub fn on_orientation(&mut self, beta: f64, gamma: f64) {
        if self.config.mode != InputMode::Touch || self.permission != Permission::Granted {
            return;
        }
        if !beta.is_finite() || !gamma.is_finite() {
            return;
        }
        let nx = gamma.clamp(-TILT_LIMIT_DEG, TILT_LIMIT_DEG) / TILT_LIMIT_DEG;
        let ny = (beta - BETA_REST_DEG).clamp(-TILT_LIMIT_DEG, TILT_LIMIT_DEG) / TILT_LIMIT_DEG;
        let target = Vec2::new(
            nx * MAX_SHIFT.x * self.config.touch_intensity,
            ny * MAX_SHIFT.y * self.config.touch_intensity,
        );
        self.offset += (target - self.offset) * TILT_SMOOTHING;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/parallax.rs"]
mod tests;
