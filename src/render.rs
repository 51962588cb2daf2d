//! Frame plans and the software backend that executes them.

/// Backend trait, settings and the rendered frame type.
pub mod backend;
pub(crate) mod blur;
pub(crate) mod composite;
/// `vello_cpu` backend.
pub mod cpu;
/// Plan execution over backend primitives.
pub mod passes;
/// Backend-agnostic draw lists.
pub mod plan;
pub(crate) mod text;
