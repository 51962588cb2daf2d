//! KloudySky renders the animated hero of the KloudySky site on the CPU and drives its contact
//! form.
//!
//! - Build a [`Page`] from a [`SiteConfig`] and a [`Viewport`]
//! - Feed it [`PageEvent`]s and advance it with [`Page::tick`]
//! - Render frames through a [`RenderBackend`] (the [`CpuBackend`]) or stream them to MP4
//! - Send contact submissions through a [`Relay`] such as [`Web3FormsRelay`]
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod animation;
/// Site configuration.
pub mod config;
/// Contact form state, relay client and overlay.
pub mod contact;
/// MP4 encoding.
pub mod encode;
/// Page composer.
pub mod page;
/// Frame plans and the CPU backend.
pub mod render;
/// Animated hero layers.
pub mod scene;
/// Built-in color themes.
pub mod theme;

pub use crate::animation::{ease::Ease, trail::TrailRing};
pub use crate::foundation::core::{
    Affine, BezPath, FrameStep, Point, REFERENCE_HZ, Rect, Rgb, Rgba, Rgba8Premul, Vec2, Viewport,
};
pub use crate::foundation::error::{KloudyError, KloudyResult};

pub use crate::config::{GridStyle, SiteConfig};
pub use crate::contact::form::{ContactForm, SubmitStatus, Submission};
pub use crate::contact::relay::{Relay, Web3FormsRelay};
pub use crate::encode::video::{RenderToMp4Opts, render_hero_to_mp4};
pub use crate::page::{LayerId, Page, PageEvent, PageResponse};
pub use crate::render::backend::{FrameRGBA, RenderBackend, RenderSettings, create_backend};
pub use crate::render::cpu::CpuBackend;
pub use crate::theme::{ACTIVE_THEME, Theme, ThemeName};
