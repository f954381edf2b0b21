//! # Redaction Tracks
//!
//! Everything that turns a track descriptor file into a scheduled collection
//! of redaction directives:
//!
//! - [`types`] - the track data model (method variants, rectangles, kinds)
//! - [`color`] - color specification parsing and CCIR-601 YUV conversion
//! - [`parser`] - the line-oriented descriptor format
//! - [`store`] - the time-ordered store answering "what is active at t"
//!
//! ## Descriptor format
//!
//! One directive per line. Comments start with `#`, blank lines are ignored,
//! and a `seed <n>` line seeds the noise source. Video tracks are
//! `start,end,left,right,top,bottom,method`; audio tracks are
//! `start,end,method`. Times are floating-point seconds, coordinates are
//! luma-plane pixels.
//!
//! ```text
//! # blur a face for the first ten seconds
//! seed 1234
//! 0.0,10.0,80,240,40,200,blur
//! 4.5,6.0,0,1920,0,1080,black
//! ```

pub mod color;
pub mod parser;
pub mod store;
pub mod types;

// Re-exports for convenience
pub use store::{LoadedTracks, TrackStore};
pub use types::{RedactionMethod, Rect, Track, TrackKind};
