//! Line parser for the track descriptor format.

use tracing::warn;

use crate::error::TrackError;

use super::color::{self, OPAQUE_BLACK};
use super::types::{RedactionMethod, Rect, Track, TrackKind};

/// One successfully parsed descriptor line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Directive {
    Track(Track),
    /// `seed <n>` - seeds the noise source for the whole stream
    Seed(u64),
}

/// Parse a single descriptor line.
///
/// Comment and blank lines yield `Ok(None)`. Malformed lines yield a
/// recoverable [`TrackError`]; the caller is expected to log and skip them.
/// Unknown method tokens and unparseable colors are softer still: the track
/// is created with a documented default and only a warning is emitted here.
pub fn parse_line(line: &str, kind: TrackKind) -> Result<Option<Directive>, TrackError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    // Track lines always start with a number, so a leading "seed" can only
    // be the directive.
    if let Some(rest) = line.strip_prefix("seed") {
        return rest
            .trim()
            .parse::<u64>()
            .map(|seed| Some(Directive::Seed(seed)))
            .map_err(|_| TrackError::MalformedSeed { line: line.to_string() });
    }

    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let track = match kind {
        TrackKind::Video => parse_video_track(line, &fields)?,
        TrackKind::Audio => parse_audio_track(line, &fields)?,
    };
    Ok(Some(Directive::Track(track)))
}

fn parse_video_track(line: &str, fields: &[&str]) -> Result<Track, TrackError> {
    if fields.len() != 7 {
        return Err(malformed(line, format!("expected 7 fields, got {}", fields.len())));
    }

    let (start, end) = parse_window(line, fields[0], fields[1])?;
    let mut coords = [0i32; 4];
    for (slot, field) in coords.iter_mut().zip(&fields[2..6]) {
        *slot = field
            .parse()
            .map_err(|_| malformed(line, format!("bad coordinate '{}'", field)))?;
    }
    let region = Rect::new(coords[0], coords[1], coords[2], coords[3]);

    Ok(Track {
        start,
        end,
        method: video_method(fields[6]),
        region: Some(region),
    })
}

fn parse_audio_track(line: &str, fields: &[&str]) -> Result<Track, TrackError> {
    if fields.len() != 3 {
        return Err(malformed(line, format!("expected 3 fields, got {}", fields.len())));
    }

    let (start, end) = parse_window(line, fields[0], fields[1])?;
    Ok(Track {
        start,
        end,
        method: audio_method(fields[2]),
        region: None,
    })
}

/// Parse and validate the time window shared by both track kinds.
///
/// Zero- and negative-duration windows are rejected here so the store never
/// holds a track that could not possibly become active.
fn parse_window(line: &str, start: &str, end: &str) -> Result<(f64, f64), TrackError> {
    let start: f64 = start
        .parse()
        .map_err(|_| malformed(line, format!("bad start time '{}'", start)))?;
    let end: f64 = end
        .parse()
        .map_err(|_| malformed(line, format!("bad end time '{}'", end)))?;
    if !start.is_finite() || !end.is_finite() {
        return Err(malformed(line, "times must be finite"));
    }
    if start >= end {
        return Err(malformed(line, "start must precede end"));
    }
    Ok((start, end))
}

/// Resolve a video method token: `pixel*`, `inv*` and `blur*` match by
/// prefix; anything else is treated as a color specification.
fn video_method(token: &str) -> RedactionMethod {
    let lower = token.to_ascii_lowercase();
    if lower.starts_with("pixel") {
        RedactionMethod::Pixellate
    } else if lower.starts_with("inv") {
        warn!("inverse pixellation is not implemented; region will pass through");
        RedactionMethod::InversePixellate
    } else if lower.starts_with("blur") {
        RedactionMethod::Blur
    } else {
        let rgba = match color::parse_color(token) {
            Ok(rgba) => rgba,
            Err(err) => {
                warn!("{}, defaulting to opaque black", err);
                OPAQUE_BLACK
            }
        };
        let (y, u, v) = color::yuv_from_rgb(rgba[0], rgba[1], rgba[2]);
        RedactionMethod::SolidColor { y, u, v, alpha: rgba[3] }
    }
}

/// Resolve an audio method token; unknown tokens fall back to `Mute`, the
/// safe direction for a redaction filter.
fn audio_method(token: &str) -> RedactionMethod {
    let lower = token.to_ascii_lowercase();
    if lower.starts_with("mute") {
        RedactionMethod::Mute
    } else if lower.starts_with("noise") {
        RedactionMethod::Noise
    } else if lower.starts_with("none") {
        RedactionMethod::None
    } else {
        let err = TrackError::UnknownMethod { token: token.to_string() };
        warn!("{}, using 'mute'", err);
        RedactionMethod::Mute
    }
}

fn malformed(line: &str, reason: impl Into<String>) -> TrackError {
    TrackError::MalformedLine {
        line: line.to_string(),
        reason: reason.into(),
    }
}
