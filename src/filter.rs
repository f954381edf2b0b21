//! Filter front ends: descriptor loading plus the per-stream entry points.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::audio::{AudioRedactor, SampleBlock};
use crate::config::{RedactorConfig, TimingStrategy};
use crate::error::{ConfigError, RedactorError, Result};
use crate::noise::NoiseSource;
use crate::tracks::{TrackKind, TrackStore};
use crate::video::{Frame, VideoRedactor};

/// Read the descriptor file, surfacing the two fatal construction failures
/// as distinct named errors.
fn read_descriptor(descriptor: Option<&Path>) -> Result<String> {
    let path = descriptor.ok_or(ConfigError::MissingDescriptor)?;
    fs::read_to_string(path).map_err(|_| {
        RedactorError::from(ConfigError::UnreadableDescriptor {
            path: path.display().to_string(),
        })
    })
}

/// Video redaction filter
///
/// Owns the track store, the noise source and the frame redactor for one
/// stream. All state is exclusively owned; processing is strictly
/// sequential, one frame per call in presentation order.
#[derive(Debug)]
pub struct VideoRedactionFilter {
    store: TrackStore,
    redactor: VideoRedactor,
    noise: NoiseSource,
}

impl VideoRedactionFilter {
    /// Construct from a descriptor file path.
    ///
    /// Fails with [`ConfigError::MissingDescriptor`] when no path is given
    /// and [`ConfigError::UnreadableDescriptor`] when it cannot be read.
    /// Malformed descriptor lines are logged and skipped, never fatal.
    pub fn open(descriptor: Option<&Path>, config: &RedactorConfig) -> Result<Self> {
        let text = read_descriptor(descriptor)?;
        Ok(Self::from_descriptor(&text, config))
    }

    /// Construct from descriptor text already in memory.
    pub fn from_descriptor(text: &str, config: &RedactorConfig) -> Self {
        let loaded = TrackStore::load(text.lines(), TrackKind::Video);
        info!("video redaction with {} tracks", loaded.store.len());
        Self {
            store: loaded.store,
            redactor: VideoRedactor::new(&config.video),
            noise: NoiseSource::from_seed(loaded.seed.unwrap_or(config.seed)),
        }
    }

    /// Redact one frame.
    ///
    /// `pts_seconds` must be the stream's actual presentation timestamp.
    pub fn redact_frame(&mut self, input: &Frame, pts_seconds: f64) -> Frame {
        let active = self.store.active_at(pts_seconds);
        self.redactor.redact(input, &active, &mut self.noise)
    }

    /// Tracks not yet expired (active or still in the future)
    pub fn remaining_tracks(&self) -> usize {
        self.store.len()
    }
}

/// Audio redaction filter
///
/// Owns the track store, the noise source and the block redactor for one
/// stream, plus the stream clock. With [`TimingStrategy::Accumulated`] the
/// clock advances by each block's duration before track resolution, the
/// behavior the filter has always had; with
/// [`TimingStrategy::Presentation`] the caller-supplied timestamp is used
/// directly. The two drift apart under variable block sizes or seeking,
/// which is why the strategy is an explicit choice.
#[derive(Debug)]
pub struct AudioRedactionFilter {
    store: TrackStore,
    redactor: AudioRedactor,
    noise: NoiseSource,
    timing: TimingStrategy,
    sample_rate: u32,
    channels: u16,
    elapsed: f64,
}

impl AudioRedactionFilter {
    /// Construct from a descriptor file path; failure modes as the video
    /// filter.
    pub fn open(
        descriptor: Option<&Path>,
        config: &RedactorConfig,
        sample_rate: u32,
        channels: u16,
    ) -> Result<Self> {
        let text = read_descriptor(descriptor)?;
        Ok(Self::from_descriptor(&text, config, sample_rate, channels))
    }

    /// Construct from descriptor text already in memory.
    pub fn from_descriptor(
        text: &str,
        config: &RedactorConfig,
        sample_rate: u32,
        channels: u16,
    ) -> Self {
        let loaded = TrackStore::load(text.lines(), TrackKind::Audio);
        info!("audio redaction with {} tracks", loaded.store.len());
        Self {
            store: loaded.store,
            redactor: AudioRedactor::new(&config.audio),
            noise: NoiseSource::from_seed(loaded.seed.unwrap_or(config.seed)),
            timing: config.audio.timing,
            sample_rate,
            channels,
            elapsed: 0.0,
        }
    }

    /// Redact one block of interleaved samples in place.
    ///
    /// `pts_seconds` is only consulted under the `Presentation` timing
    /// strategy; the accumulated clock ignores it.
    pub fn redact_block(&mut self, block: &mut SampleBlock<'_>, pts_seconds: f64) {
        let now = match self.timing {
            TimingStrategy::Accumulated => {
                let frames = block.len() / usize::from(self.channels.max(1));
                self.elapsed += frames as f64 / f64::from(self.sample_rate.max(1));
                self.elapsed
            }
            TimingStrategy::Presentation => pts_seconds,
        };
        let active = self.store.active_at(now);
        self.redactor.process(&active, block, &mut self.noise);
    }

    /// Tracks not yet expired (active or still in the future)
    pub fn remaining_tracks(&self) -> usize {
        self.store.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    use crate::video::PixelFormat;

    fn presentation_config() -> RedactorConfig {
        let mut config = RedactorConfig::default();
        config.audio.timing = TimingStrategy::Presentation;
        config
    }

    #[test]
    fn test_missing_descriptor_is_fatal() {
        let err = VideoRedactionFilter::open(None, &RedactorConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            RedactorError::Config(ConfigError::MissingDescriptor)
        ));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_unreadable_descriptor_is_fatal() {
        let path = Path::new("/no/such/file.txt");
        let err =
            AudioRedactionFilter::open(Some(path), &RedactorConfig::default(), 44100, 1)
                .unwrap_err();
        assert!(matches!(
            err,
            RedactorError::Config(ConfigError::UnreadableDescriptor { .. })
        ));
    }

    #[test]
    fn test_open_reads_descriptor_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# tracks").unwrap();
        writeln!(file, "0.0,1.0,10,20,10,20,red").unwrap();

        let filter =
            VideoRedactionFilter::open(Some(file.path()), &RedactorConfig::default()).unwrap();
        assert_eq!(filter.remaining_tracks(), 1);
    }

    #[test]
    fn test_red_box_scenario() {
        let mut filter =
            VideoRedactionFilter::from_descriptor("0.0,1.0,10,20,10,20,red", &RedactorConfig::default());
        let mut input = Frame::new(PixelFormat::Yuv420p, 32, 32);
        input.fill(16, 128, 128);

        // At t=0.5 the box shifts toward red's luma, everything else stays.
        let out = filter.redact_frame(&input, 0.5);
        assert_eq!(out.sample(0, 15, 15), 82);
        assert_eq!(out.sample(0, 9, 9), 16);
        assert_eq!(out.sample(0, 20, 20), 16);
        // Red's V sits well above center at chroma resolution.
        assert!(out.sample(2, 7, 7) > 200);

        // At t=1.5 the track is expired: output untouched, track gone.
        let out = filter.redact_frame(&input, 1.5);
        assert_eq!(out, input);
        assert_eq!(filter.remaining_tracks(), 0);
    }

    #[test]
    fn test_mute_block_scenario() {
        let mut filter = AudioRedactionFilter::from_descriptor(
            "0.0,2.0,mute",
            &presentation_config(),
            44100,
            1,
        );

        let mut samples: Vec<i16> = (0..512).map(|i| (i % 101) as i16).collect();
        filter.redact_block(&mut SampleBlock::I16(&mut samples), 1.0);
        assert!(samples.iter().all(|&s| s == 0));

        let original: Vec<i16> = (0..512).map(|i| (i % 101) as i16).collect();
        let mut samples = original.clone();
        filter.redact_block(&mut SampleBlock::I16(&mut samples), 2.5);
        assert_eq!(samples, original);
    }

    #[test]
    fn test_accumulated_clock_advances_by_block_duration() {
        // 1.0s..2.0s mute window, 8000 Hz stereo, quarter-second blocks.
        let mut filter = AudioRedactionFilter::from_descriptor(
            "1.0,2.0,mute",
            &RedactorConfig::default(),
            8000,
            2,
        );

        let mut muted_blocks = Vec::new();
        for _ in 0..12 {
            let mut samples = vec![1000i16; 4000]; // 2000 frames = 0.25s
            filter.redact_block(&mut SampleBlock::I16(&mut samples), 0.0);
            muted_blocks.push(samples.iter().all(|&s| s == 0));
        }

        // The clock advances before resolution, so blocks land at 0.25,
        // 0.50, ... and exactly those in [1.0, 2.0] are muted.
        let expected: Vec<bool> = (1..=12).map(|i| (4..=8).contains(&i)).collect();
        assert_eq!(muted_blocks, expected);
    }

    #[test]
    fn test_descriptor_seed_matches_explicit_config_seed() {
        let mut input = Frame::new(PixelFormat::Yuv420p, 16, 16);
        for y in 0..16 {
            for x in 0..16 {
                input.set_sample(0, x, y, ((x * 5 + y * 3) % 256) as u8);
            }
        }

        let mut seeded = VideoRedactionFilter::from_descriptor(
            "seed 7\n0.0,1.0,2,14,2,14,blur",
            &RedactorConfig::default(),
        );
        let mut configured = {
            let mut config = RedactorConfig::default();
            config.seed = 7;
            VideoRedactionFilter::from_descriptor("0.0,1.0,2,14,2,14,blur", &config)
        };

        assert_eq!(
            seeded.redact_frame(&input, 0.5),
            configured.redact_frame(&input, 0.5)
        );
    }
}
