//! Temporal blending of blurred boxes against the previous output frame.

use crate::config::BlurConfig;
use crate::noise::NoiseSource;
use crate::tracks::Rect;

use super::frame::Frame;

/// Radial-falloff blend damping frame-to-frame blur flicker
///
/// Independent noise draws make each frame's blur shimmer; mixing every pixel
/// with the corresponding pixel of the previous output frame calms it down.
/// The blend weight falls off radially from the box center, reaching zero on
/// the inscribed ellipse, so the box melts into its surroundings instead of
/// ending at a hard rectangle edge.
#[derive(Debug)]
pub struct TemporalBlender {
    boundary: f32,
    mix_floor: f32,
    mix_ceil: f32,
}

impl TemporalBlender {
    pub fn new(config: &BlurConfig) -> Self {
        Self {
            boundary: config.blend_boundary,
            mix_floor: config.mix_floor,
            mix_ceil: config.mix_ceil,
        }
    }

    /// Blend the freshly blurred `region` of `output` with the previous
    /// output frame.
    ///
    /// `output` holds the blurred pixels on entry; `input` is the untouched
    /// source frame, restored outside the inscribed ellipse. On the first
    /// frame of a stream there is no previous output, so the input frame
    /// stands in for it.
    pub fn blend_region(
        &self,
        input: &Frame,
        output: &mut Frame,
        previous: Option<&Frame>,
        region: Rect,
        noise: &mut NoiseSource,
    ) {
        for plane in 0..3 {
            let (hs, vs) = output.subsampling(plane);
            let (plane_w, plane_h) = output.plane_dims(plane);
            let shifted = region.subsampled(hs, vs);
            let Some(rect) = shifted.clamped(plane_w, plane_h) else {
                continue;
            };
            // clamped() returned Some, so the shifted box is non-degenerate
            let (box_w, box_h) = (shifted.width(), shifted.height());

            let input_plane = input.plane(plane);
            let previous_plane = previous.map(|f| f.plane(plane)).unwrap_or(input_plane);
            let output_plane = output.plane_mut(plane);

            for y in rect.top..rect.bottom {
                let ynorm = (2 * y - (shifted.top + shifted.bottom)) as f32 / box_h as f32;
                for x in rect.left..rect.right {
                    let xnorm = (2 * x - (shifted.left + shifted.right)) as f32 / box_w as f32;
                    let idx = y as usize * plane_w + x as usize;

                    let falloff = 1.0 - (xnorm * xnorm + ynorm * ynorm).sqrt();
                    if falloff < 0.0 {
                        // Outside the inscribed ellipse: no redaction at the
                        // box's extreme corners.
                        output_plane[idx] = input_plane[idx];
                        continue;
                    }

                    let alpha = if falloff > self.boundary {
                        1.0
                    } else {
                        falloff / self.boundary
                    };
                    let m = noise.mix(self.mix_floor, self.mix_ceil);

                    let original = f32::from(input_plane[idx]);
                    let blurred = f32::from(output_plane[idx]);
                    let prior = f32::from(previous_plane[idx]);

                    let mixed = (1.0 - m) * blurred + m * prior;
                    let value = (1.0 - alpha) * original + alpha * mixed;
                    output_plane[idx] = value.round().clamp(0.0, 255.0) as u8;
                }
            }
        }
    }
}
