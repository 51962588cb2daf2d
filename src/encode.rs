//! MP4 output through the system `ffmpeg`.

/// `ffmpeg` process wrapper and alpha flattening.
pub mod ffmpeg;
/// Drives a [`Page`](crate::page::Page) frame by frame into an encoder.
pub mod video;
