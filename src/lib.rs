//! # Redactor
//!
//! Redact video and audio streams according to a time-indexed track file.
//!
//! A track descriptor lists redaction windows: rectangular regions of the
//! picture to obscure (solid fill, pixellation, or a noise-seeded blur with
//! temporal blending), or segments of the audio to mute or replace with
//! noise. The library schedules those tracks against the stream clock and
//! applies the per-frame / per-block transforms; it does not decode or
//! encode media.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use redactor::{Frame, PixelFormat, RedactorConfig, VideoRedactionFilter};
//!
//! # fn main() -> redactor::Result<()> {
//! let config = RedactorConfig::default();
//! let mut filter = VideoRedactionFilter::open(Some(Path::new("tracks.txt")), &config)?;
//!
//! let frame = Frame::new(PixelFormat::Yuv420p, 1280, 720);
//! let redacted = filter.redact_frame(&frame, 0.040);
//! # let _ = redacted;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - [`tracks`] - descriptor parsing and the time-ordered track store
//! - [`video`] - planar frames and the box-painting pipeline
//! - [`audio`] - sample blocks and the mute/noise policy
//! - [`filter`] - the per-stream front ends gluing the above together
//! - [`config`] - tunables, loaded from TOML or defaulted
//!
//! ## Track files
//!
//! One directive per line; `#` starts a comment. Video tracks are
//! `start,end,left,right,top,bottom,method` where `method` is `pixel`,
//! `inv`, `blur` or a color specification; audio tracks are
//! `start,end,method` with `mute`, `noise` or `none`. A `seed <n>` line
//! makes the blur noise reproducible across runs.

pub mod audio;
pub mod config;
pub mod error;
pub mod filter;
pub mod noise;
pub mod tracks;
pub mod video;

// Re-export commonly used types for convenience
pub use crate::{
    audio::{AudioRedactor, SampleBlock, SampleFormat},
    config::{RedactorConfig, TimingStrategy},
    error::{RedactorError, Result},
    filter::{AudioRedactionFilter, VideoRedactionFilter},
    noise::NoiseSource,
    tracks::{RedactionMethod, Rect, Track, TrackKind, TrackStore},
    video::{Frame, PixelFormat, VideoRedactor},
};
