//! Contact form: validation state machine, relay client and modal overlay.

/// Form state machine.
pub mod form;
/// Modal overlay drawing and hit testing.
pub mod overlay;
/// HTTP relay client.
pub mod relay;
