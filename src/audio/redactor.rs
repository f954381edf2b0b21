use crate::config::AudioRedactConfig;
use crate::noise::NoiseSource;
use crate::tracks::{RedactionMethod, Track};

use super::block::SampleBlock;

/// Applies the resolved redaction method to one sample block at a time
#[derive(Debug)]
pub struct AudioRedactor {
    noise_level: f64,
}

impl AudioRedactor {
    pub fn new(config: &AudioRedactConfig) -> Self {
        Self {
            noise_level: config.noise_level,
        }
    }

    /// Resolve a single method from the active list.
    ///
    /// The list arrives oldest start first. Each track overwrites the method
    /// so far; setting `Mute` stops the scan outright. Net effect: mute
    /// anywhere in the active set wins, otherwise the latest-starting track's
    /// method does.
    pub fn resolve(active: &[Track]) -> RedactionMethod {
        let mut method = RedactionMethod::None;
        for track in active {
            method = track.method;
            if method == RedactionMethod::Mute {
                break;
            }
        }
        method
    }

    /// Mutate the sample block according to the active tracks.
    pub fn process(&self, active: &[Track], block: &mut SampleBlock<'_>, noise: &mut NoiseSource) {
        match Self::resolve(active) {
            RedactionMethod::Mute => block.silence(),
            RedactionMethod::Noise => block.add_noise(self.noise_level, noise),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(start: f64, end: f64, method: RedactionMethod) -> Track {
        Track { start, end, method, region: None }
    }

    #[test]
    fn test_empty_active_list_does_nothing() {
        let redactor = AudioRedactor::new(&AudioRedactConfig::default());
        let original: Vec<i16> = (0..16).collect();
        let mut samples = original.clone();

        redactor.process(
            &[],
            &mut SampleBlock::I16(&mut samples),
            &mut NoiseSource::from_seed(1),
        );
        assert_eq!(samples, original);
    }

    #[test]
    fn test_mute_wins_regardless_of_order() {
        // Mute starts earlier than the noise track.
        let active = [
            track(0.0, 5.0, RedactionMethod::Mute),
            track(1.0, 5.0, RedactionMethod::Noise),
        ];
        assert_eq!(AudioRedactor::resolve(&active), RedactionMethod::Mute);

        // Mute starts later.
        let active = [
            track(0.0, 5.0, RedactionMethod::Noise),
            track(1.0, 5.0, RedactionMethod::Mute),
        ];
        assert_eq!(AudioRedactor::resolve(&active), RedactionMethod::Mute);

        // Even when a None track starts after the mute.
        let active = [
            track(0.0, 5.0, RedactionMethod::Mute),
            track(1.0, 5.0, RedactionMethod::None),
        ];
        assert_eq!(AudioRedactor::resolve(&active), RedactionMethod::Mute);
    }

    #[test]
    fn test_latest_start_wins_among_non_mute() {
        let active = [
            track(0.0, 5.0, RedactionMethod::Noise),
            track(1.0, 5.0, RedactionMethod::None),
        ];
        assert_eq!(AudioRedactor::resolve(&active), RedactionMethod::None);

        let active = [
            track(0.0, 5.0, RedactionMethod::None),
            track(1.0, 5.0, RedactionMethod::Noise),
        ];
        assert_eq!(AudioRedactor::resolve(&active), RedactionMethod::Noise);
    }

    #[test]
    fn test_mute_zeroes_the_block() {
        let redactor = AudioRedactor::new(&AudioRedactConfig::default());
        let mut samples: Vec<i16> = (0..128).map(|i| i * 100).collect();

        redactor.process(
            &[track(0.0, 2.0, RedactionMethod::Mute)],
            &mut SampleBlock::I16(&mut samples),
            &mut NoiseSource::from_seed(1),
        );
        assert!(samples.iter().all(|&s| s == 0));
    }

    #[test]
    fn test_noise_alters_the_block() {
        let redactor = AudioRedactor::new(&AudioRedactConfig::default());
        let mut samples = vec![0i16; 128];

        redactor.process(
            &[track(0.0, 2.0, RedactionMethod::Noise)],
            &mut SampleBlock::I16(&mut samples),
            &mut NoiseSource::from_seed(1),
        );
        assert!(samples.iter().any(|&s| s != 0));
    }
}
