//! # Video Redaction
//!
//! Planar YUV frame handling and the per-frame box painting pipeline:
//!
//! - [`frame`] - pixel formats and the planar [`Frame`] buffer
//! - [`redactor`] - base copy plus per-box transforms in overlap order
//! - [`blur`] - separable box blur with seeded noise
//! - [`blend`] - temporal blending against the previous output frame

pub mod blend;
pub mod blur;
pub mod frame;
pub mod redactor;

// Re-exports for convenience
pub use blend::TemporalBlender;
pub use blur::BlurEngine;
pub use frame::{Frame, PixelFormat};
pub use redactor::VideoRedactor;
