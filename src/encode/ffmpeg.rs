use std::{
    ffi::OsString,
    io::{Read as _, Write as _},
    path::{Path, PathBuf},
    process::{Child, ChildStdin, Command, Stdio},
    thread::JoinHandle,
};

use anyhow::Context as _;

use crate::{
    foundation::{
        core::Rgb,
        error::{KloudyError, KloudyResult},
        math::mul_div255_u16,
    },
    render::backend::FrameRGBA,
};

#[derive(Clone, Debug)]
pub struct EncodeConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub out_path: PathBuf,
    pub overwrite: bool,
}

impl EncodeConfig {
    pub fn new(out_path: impl Into<PathBuf>, width: u32, height: u32, fps: u32) -> Self {
        Self {
            width,
            height,
            fps,
            out_path: out_path.into(),
            overwrite: true,
        }
    }

    pub fn validate(&self) -> KloudyResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(KloudyError::validation(
                "encode width/height must be non-zero",
            ));
        }
        if self.fps == 0 {
            return Err(KloudyError::validation("encode fps must be non-zero"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(KloudyError::validation(
                "encode width/height must be even (yuv420p output)",
            ));
        }
        Ok(())
    }
}

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn ensure_parent_dir(path: &Path) -> KloudyResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Command line for raw RGBA on stdin to H.264 in an MP4 container.
pub fn ffmpeg_args(cfg: &EncodeConfig) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![if cfg.overwrite { "-y" } else { "-n" }.into()];
    let size = format!("{}x{}", cfg.width, cfg.height);
    let rate = cfg.fps.to_string();
    let input = [
        ("-loglevel", "error"),
        ("-f", "rawvideo"),
        ("-pix_fmt", "rgba"),
        ("-s", size.as_str()),
        ("-r", rate.as_str()),
        ("-i", "pipe:0"),
    ];
    let output = [
        ("-c:v", "libx264"),
        ("-pix_fmt", "yuv420p"),
        ("-movflags", "+faststart"),
    ];
    for (flag, value) in input {
        args.extend([flag.into(), value.into()]);
    }
    args.push("-an".into());
    for (flag, value) in output {
        args.extend([flag.into(), value.into()]);
    }
    args.push(cfg.out_path.clone().into_os_string());
    args
}

/// Streams flattened RGBA frames into a system `ffmpeg` producing H.264 MP4.
pub struct FfmpegEncoder {
    cfg: EncodeConfig,
    background: Rgb,
    child: Child,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    scratch: Vec<u8>,
    frames: u64,
}

impl FfmpegEncoder {
    /// Spawn `ffmpeg`. Alpha is flattened over `background` before each frame is written.
    pub fn new(cfg: EncodeConfig, background: Rgb) -> KloudyResult<Self> {
        cfg.validate()?;
        ensure_parent_dir(&cfg.out_path)?;

        if !cfg.overwrite && cfg.out_path.exists() {
            return Err(KloudyError::validation(format!(
                "output file '{}' already exists",
                cfg.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(KloudyError::render(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .args(ffmpeg_args(&cfg));

        let mut child = cmd
            .spawn()
            .map_err(|e| KloudyError::render(format!("failed to spawn ffmpeg: {e}")))?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| KloudyError::render("failed to open ffmpeg stdin"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| KloudyError::render("failed to open ffmpeg stderr"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok(bytes)
        });

        tracing::debug!(
            out = %cfg.out_path.display(),
            width = cfg.width,
            height = cfg.height,
            fps = cfg.fps,
            "ffmpeg started"
        );
        Ok(Self {
            scratch: vec![0u8; cfg.width as usize * cfg.height as usize * 4],
            cfg,
            background,
            child,
            stdin: Some(stdin),
            stderr_drain: Some(stderr_drain),
            frames: 0,
        })
    }

    pub fn encode_frame(&mut self, frame: &FrameRGBA) -> KloudyResult<()> {
        if frame.width != self.cfg.width || frame.height != self.cfg.height {
            return Err(KloudyError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, self.cfg.width, self.cfg.height
            )));
        }
        flatten_to_opaque_rgba8(
            &mut self.scratch,
            &frame.data,
            frame.premultiplied,
            self.background,
        )?;

        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| KloudyError::render("ffmpeg encoder is already finalized"))?;
        stdin
            .write_all(&self.scratch)
            .map_err(|e| KloudyError::render(format!("write frame to ffmpeg: {e}")))?;
        self.frames += 1;
        Ok(())
    }

    /// Close the pipe and wait for `ffmpeg`. Returns the number of frames written.
    pub fn finish(mut self) -> KloudyResult<u64> {
        drop(self.stdin.take());
        let status = self
            .child
            .wait()
            .map_err(|e| KloudyError::render(format!("wait for ffmpeg: {e}")))?;
        let stderr = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| KloudyError::render("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| KloudyError::render(format!("read ffmpeg stderr: {e}")))?,
            None => Vec::new(),
        };

        if !status.success() {
            return Err(KloudyError::render(format!(
                "ffmpeg exited with status {status}: {}",
                String::from_utf8_lossy(&stderr).trim()
            )));
        }
        tracing::debug!(frames = self.frames, "ffmpeg finished");
        Ok(self.frames)
    }
}

/// Composite an RGBA8 buffer over an opaque background.
pub fn flatten_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    src_is_premul: bool,
    background: Rgb,
) -> KloudyResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(KloudyError::validation(
            "flatten expects equal-length rgba8 buffers",
        ));
    }

    let bg = [
        u16::from(background.r),
        u16::from(background.g),
        u16::from(background.b),
    ];
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        let inv = 255 - a;
        for c in 0..3 {
            let fg = if src_is_premul {
                u16::from(s[c])
            } else {
                mul_div255_u16(u16::from(s[c]), a)
            };
            d[c] = (fg + mul_div255_u16(bg[c], inv)).min(255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
