use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::noise::DEFAULT_SEED;

/// Main configuration for the redactor
///
/// Replaces the global mutable tunables of the original filter with explicit
/// values handed to the redactors at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedactorConfig {
    /// Video redaction settings
    pub video: VideoRedactConfig,

    /// Audio redaction settings
    pub audio: AudioRedactConfig,

    /// Noise seed used when the descriptor has no `seed` directive
    pub seed: u64,
}

impl Default for RedactorConfig {
    fn default() -> Self {
        Self {
            video: VideoRedactConfig::default(),
            audio: AudioRedactConfig::default(),
            seed: DEFAULT_SEED,
        }
    }
}

impl RedactorConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: RedactorConfig = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue {
            key: "config".to_string(),
            value: e.to_string(),
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.video.validate()?;
        self.audio.validate()?;
        Ok(())
    }
}

/// Video redaction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoRedactConfig {
    /// Pixellation block edge length in luma pixels
    pub pixel_block: u32,

    /// Blur and temporal blend tunables
    pub blur: BlurConfig,
}

impl Default for VideoRedactConfig {
    fn default() -> Self {
        Self {
            pixel_block: 64,
            blur: BlurConfig::default(),
        }
    }
}

impl VideoRedactConfig {
    fn validate(&self) -> Result<()> {
        if self.pixel_block == 0 {
            return Err(ConfigError::InvalidValue {
                key: "video.pixel_block".to_string(),
                value: self.pixel_block.to_string(),
            }
            .into());
        }
        self.blur.validate()
    }
}

/// Blur and temporal blend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurConfig {
    /// Magnitude of the additive blur noise, in sample values
    pub noise_magnitude: i32,

    /// Radial falloff fraction treated as fully inside the box (0.0-1.0)
    pub blend_boundary: f32,

    /// Lower bound of the per-pixel temporal mix ratio
    pub mix_floor: f32,

    /// Upper bound of the per-pixel temporal mix ratio
    pub mix_ceil: f32,
}

impl Default for BlurConfig {
    fn default() -> Self {
        Self {
            noise_magnitude: 12,
            blend_boundary: 0.2,
            mix_floor: 0.25,
            mix_ceil: 0.75,
        }
    }
}

impl BlurConfig {
    fn validate(&self) -> Result<()> {
        if !(0..=255).contains(&self.noise_magnitude) {
            return Err(ConfigError::InvalidValue {
                key: "video.blur.noise_magnitude".to_string(),
                value: self.noise_magnitude.to_string(),
            }
            .into());
        }

        if !(self.blend_boundary > 0.0 && self.blend_boundary <= 1.0) {
            return Err(ConfigError::InvalidValue {
                key: "video.blur.blend_boundary".to_string(),
                value: self.blend_boundary.to_string(),
            }
            .into());
        }

        let mix_ok = (0.0..=1.0).contains(&self.mix_floor)
            && (0.0..=1.0).contains(&self.mix_ceil)
            && self.mix_floor <= self.mix_ceil;
        if !mix_ok {
            return Err(ConfigError::InvalidValue {
                key: "video.blur.mix_range".to_string(),
                value: format!("{}-{}", self.mix_floor, self.mix_ceil),
            }
            .into());
        }

        Ok(())
    }
}

/// Audio redaction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioRedactConfig {
    /// Where the audio clock comes from
    pub timing: TimingStrategy,

    /// Amplitude of the noise method as a fraction of full scale (0.0-1.0)
    pub noise_level: f64,
}

impl Default for AudioRedactConfig {
    fn default() -> Self {
        Self {
            timing: TimingStrategy::Accumulated,
            noise_level: 0.1,
        }
    }
}

impl AudioRedactConfig {
    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.noise_level) {
            return Err(ConfigError::InvalidValue {
                key: "audio.noise_level".to_string(),
                value: self.noise_level.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Audio timing source
///
/// `Accumulated` sums block durations into an internal clock, the behavior
/// the filter has always had; `Presentation` trusts the caller-supplied
/// timestamp instead. The two can drift apart under variable block sizes or
/// seeking, so the choice is explicit rather than silently unified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingStrategy {
    Accumulated,
    Presentation,
}
