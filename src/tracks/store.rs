//! Time-ordered track store with lazy expiry.

use std::cmp::Ordering;

use tracing::{debug, warn};

use super::parser::{self, Directive};
use super::types::{Track, TrackKind};

/// Mutable, time-ordered collection of redaction tracks
///
/// Tracks are sorted ascending by start time when the store is loaded; that
/// load-time sort is the only sort ever performed. Expired tracks are pruned
/// lazily while answering [`TrackStore::active_at`] and are never re-added.
#[derive(Debug, Clone, Default)]
pub struct TrackStore {
    tracks: Vec<Track>,
}

/// Result of loading a descriptor: the store plus the side information the
/// loader picked up along the way.
#[derive(Debug, Clone)]
pub struct LoadedTracks {
    pub store: TrackStore,
    /// Seed from a `seed` directive, if the descriptor carried one
    pub seed: Option<u64>,
    /// Number of lines skipped as malformed
    pub skipped: usize,
}

impl TrackStore {
    /// Build a store from descriptor lines.
    ///
    /// Malformed lines are logged and skipped; loading never fails. A `seed`
    /// directive is consumed and reported through [`LoadedTracks::seed`].
    pub fn load<'a, I>(lines: I, kind: TrackKind) -> LoadedTracks
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut tracks = Vec::new();
        let mut seed = None;
        let mut skipped = 0usize;

        for line in lines {
            match parser::parse_line(line, kind) {
                Ok(Some(Directive::Track(track))) => tracks.push(track),
                Ok(Some(Directive::Seed(value))) => {
                    if seed.replace(value).is_some() {
                        warn!("multiple seed directives; keeping the last one ({})", value);
                    }
                }
                Ok(None) => {}
                Err(err) => {
                    warn!("{}; line skipped", err);
                    skipped += 1;
                }
            }
        }

        tracks.sort_by(|a, b| a.start.partial_cmp(&b.start).unwrap_or(Ordering::Equal));
        debug!("loaded {} tracks ({} lines skipped)", tracks.len(), skipped);

        LoadedTracks {
            store: Self { tracks },
            seed,
            skipped,
        }
    }

    /// Build a store directly from tracks, sorting by start time.
    pub fn from_tracks(mut tracks: Vec<Track>) -> Self {
        tracks.sort_by(|a, b| a.start.partial_cmp(&b.start).unwrap_or(Ordering::Equal));
        Self { tracks }
    }

    /// Tracks active at `now`, oldest start first, pruning expired tracks as
    /// a side effect.
    ///
    /// A single forward pass does both selection and pruning. The scan stops
    /// at the first track starting in the future: by sort order nothing after
    /// it can be active yet, and that early exit is what defines which tracks
    /// participate in this call. A track whose end has passed is removed from
    /// the store permanently, even if a later call presents a smaller `now`.
    pub fn active_at(&mut self, now: f64) -> Vec<Track> {
        let mut active = Vec::new();
        let mut i = 0;
        while i < self.tracks.len() {
            let track = &self.tracks[i];
            if track.start > now {
                break;
            }
            if track.end < now {
                // Expired: interior shift removal keeps the remaining order.
                self.tracks.remove(i);
                continue;
            }
            active.push(*track);
            i += 1;
        }
        active
    }

    /// Number of tracks still held (active or not yet scanned)
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
