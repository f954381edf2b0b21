// src/video/redactor.rs - per-frame box painting

use tracing::debug;

use crate::config::VideoRedactConfig;
use crate::noise::NoiseSource;
use crate::tracks::{RedactionMethod, Rect, Track};

use super::blend::TemporalBlender;
use super::blur::BlurEngine;
use super::frame::Frame;

/// Applies the active tracks' pixel transforms to one frame at a time
///
/// The redactor owns the previous output frame for the blur method's
/// temporal blend. It is replaced exactly once per processed frame, after
/// the new output is complete, since the blend step reads it during the
/// call.
#[derive(Debug)]
pub struct VideoRedactor {
    pixel_block: u32,
    blur: BlurEngine,
    blender: TemporalBlender,
    previous: Option<Frame>,
}

impl VideoRedactor {
    pub fn new(config: &VideoRedactConfig) -> Self {
        Self {
            pixel_block: config.pixel_block,
            blur: BlurEngine::new(config.blur.noise_magnitude),
            blender: TemporalBlender::new(&config.blur),
            previous: None,
        }
    }

    /// Produce the redacted output frame for `input`.
    ///
    /// The input is copied wholesale, then active boxes are painted onto the
    /// output oldest start first, so on spatial overlap the latest-starting
    /// track's paint is what survives.
    pub fn redact(&mut self, input: &Frame, active: &[Track], noise: &mut NoiseSource) -> Frame {
        let mut output = input.clone();

        for track in active {
            let Some(region) = track.region else {
                continue;
            };
            match track.method {
                RedactionMethod::SolidColor { y, u, v, alpha } => {
                    paint_solid(&mut output, region, [y, u, v], alpha);
                }
                RedactionMethod::Pixellate => {
                    pixellate(&mut output, region, self.pixel_block);
                }
                RedactionMethod::InversePixellate => {
                    // Declared by the track format but unimplemented; the
                    // parser already warned at load time.
                    debug!("inverse pixellation requested, passing region through");
                }
                RedactionMethod::Blur => {
                    self.blur.blur_region(&mut output, region, noise);
                    let previous = self
                        .previous
                        .as_ref()
                        .filter(|prev| prev.same_geometry(input));
                    self.blender.blend_region(input, &mut output, previous, region, noise);
                }
                // Audio-only methods never reach the video path.
                RedactionMethod::None | RedactionMethod::Mute | RedactionMethod::Noise => {}
            }
        }

        self.previous = Some(output.clone());
        output
    }
}

/// Alpha-blend a flat YUV color over the region, per plane.
fn paint_solid(frame: &mut Frame, region: Rect, color: [u8; 3], alpha: u8) {
    let a = f32::from(alpha) / 255.0;
    for plane in 0..3 {
        let (hs, vs) = frame.subsampling(plane);
        let (plane_w, plane_h) = frame.plane_dims(plane);
        let Some(rect) = region.subsampled(hs, vs).clamped(plane_w, plane_h) else {
            continue;
        };
        let target = f32::from(color[plane]);
        let data = frame.plane_mut(plane);
        for y in rect.top as usize..rect.bottom as usize {
            for sample in &mut data[y * plane_w + rect.left as usize..y * plane_w + rect.right as usize] {
                *sample = ((1.0 - a) * f32::from(*sample) + a * target).round() as u8;
            }
        }
    }
}

/// Force every pixel in the region to its block's representative value.
///
/// The grid is aligned to the plane origin, not the box origin, and scaled
/// per axis by the plane's subsampling. The representative is the block's
/// top-left pixel; it quantizes onto itself, so painting in place never
/// feeds a block its own repainted pixels.
fn pixellate(frame: &mut Frame, region: Rect, block: u32) {
    for plane in 0..3 {
        let (hs, vs) = frame.subsampling(plane);
        let (plane_w, plane_h) = frame.plane_dims(plane);
        let Some(rect) = region.subsampled(hs, vs).clamped(plane_w, plane_h) else {
            continue;
        };
        let block_w = (block >> hs).max(1) as usize;
        let block_h = (block >> vs).max(1) as usize;

        let data = frame.plane_mut(plane);
        for y in rect.top as usize..rect.bottom as usize {
            let source_y = y / block_h * block_h;
            for x in rect.left as usize..rect.right as usize {
                let source_x = x / block_w * block_w;
                data[y * plane_w + x] = data[source_y * plane_w + source_x];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VideoRedactConfig;
    use crate::video::frame::PixelFormat;

    fn solid(start: f64, end: f64, region: Rect, y: u8) -> Track {
        Track {
            start,
            end,
            method: RedactionMethod::SolidColor { y, u: 128, v: 128, alpha: 255 },
            region: Some(region),
        }
    }

    fn redactor() -> VideoRedactor {
        VideoRedactor::new(&VideoRedactConfig::default())
    }

    #[test]
    fn test_base_copy_when_nothing_active() {
        let mut frame = Frame::new(PixelFormat::Yuv420p, 8, 8);
        frame.fill(77, 100, 150);

        let out = redactor().redact(&frame, &[], &mut NoiseSource::from_seed(1));
        assert_eq!(out, frame);
    }

    #[test]
    fn test_solid_color_fills_clamped_region() {
        let mut frame = Frame::new(PixelFormat::Yuv420p, 16, 16);
        frame.fill(0, 128, 128);
        let track = solid(0.0, 1.0, Rect::new(4, 50, 4, 50), 200);

        let out = redactor().redact(&frame, &[track], &mut NoiseSource::from_seed(1));

        assert_eq!(out.sample(0, 3, 3), 0);
        assert_eq!(out.sample(0, 4, 4), 200);
        assert_eq!(out.sample(0, 15, 15), 200); // clamped to the frame edge
    }

    #[test]
    fn test_overlap_later_start_wins() {
        let mut frame = Frame::new(PixelFormat::Yuv420p, 16, 16);
        frame.fill(0, 128, 128);

        // Active list arrives oldest start first.
        let first = solid(0.0, 10.0, Rect::new(0, 8, 0, 8), 60);
        let second = solid(1.0, 10.0, Rect::new(4, 12, 4, 12), 180);

        let out = redactor().redact(&frame, &[first, second], &mut NoiseSource::from_seed(1));

        assert_eq!(out.sample(0, 2, 2), 60); // only the first box
        assert_eq!(out.sample(0, 6, 6), 180); // overlap: later start painted last
        assert_eq!(out.sample(0, 10, 10), 180); // only the second box
    }

    #[test]
    fn test_half_alpha_blends() {
        let mut frame = Frame::new(PixelFormat::Yuv420p, 8, 8);
        frame.fill(100, 128, 128);
        let track = Track {
            start: 0.0,
            end: 1.0,
            method: RedactionMethod::SolidColor { y: 200, u: 128, v: 128, alpha: 128 },
            region: Some(Rect::new(0, 8, 0, 8)),
        };

        let out = redactor().redact(&frame, &[track], &mut NoiseSource::from_seed(1));
        let blended = out.sample(0, 4, 4);
        assert!((149..=151).contains(&blended));
    }

    #[test]
    fn test_pixellate_uses_block_top_left() {
        let mut frame = Frame::new(PixelFormat::Yuv444p, 8, 8);
        for y in 0..8 {
            for x in 0..8 {
                frame.set_sample(0, x, y, (y * 8 + x) as u8);
            }
        }
        let track = Track {
            start: 0.0,
            end: 1.0,
            method: RedactionMethod::Pixellate,
            region: Some(Rect::new(0, 8, 0, 8)),
        };
        let mut redactor = VideoRedactor::new(&VideoRedactConfig {
            pixel_block: 4,
            ..Default::default()
        });

        let out = redactor.redact(&frame, &[track], &mut NoiseSource::from_seed(1));

        // Every pixel of a 4x4 block reads the block's top-left value.
        assert_eq!(out.sample(0, 0, 0), 0);
        assert_eq!(out.sample(0, 3, 3), 0);
        assert_eq!(out.sample(0, 4, 0), 4);
        assert_eq!(out.sample(0, 7, 7), 36); // block at (4,4) starts at sample 4*8+4
    }

    #[test]
    fn test_pixellate_grid_aligned_to_plane_origin() {
        let mut frame = Frame::new(PixelFormat::Yuv444p, 8, 8);
        for y in 0..8 {
            for x in 0..8 {
                frame.set_sample(0, x, y, (y * 8 + x) as u8);
            }
        }
        // Box straddles the block boundary at x=4 but starts mid-block.
        let track = Track {
            start: 0.0,
            end: 1.0,
            method: RedactionMethod::Pixellate,
            region: Some(Rect::new(2, 6, 2, 6)),
        };
        let mut redactor = VideoRedactor::new(&VideoRedactConfig {
            pixel_block: 4,
            ..Default::default()
        });

        let out = redactor.redact(&frame, &[track], &mut NoiseSource::from_seed(1));

        // Grid cells are (0..4) and (4..8) regardless of the box origin; the
        // representative pixels sit outside the box and keep input values.
        assert_eq!(out.sample(0, 2, 2), 0);
        assert_eq!(out.sample(0, 5, 3), 4);
        assert_eq!(out.sample(0, 3, 5), 32);
        assert_eq!(out.sample(0, 1, 1), 9); // outside the box: untouched
    }

    #[test]
    fn test_inverse_pixellate_is_a_noop() {
        let mut frame = Frame::new(PixelFormat::Yuv420p, 8, 8);
        frame.fill(90, 110, 130);
        let track = Track {
            start: 0.0,
            end: 1.0,
            method: RedactionMethod::InversePixellate,
            region: Some(Rect::new(0, 8, 0, 8)),
        };

        let out = redactor().redact(&frame, &[track], &mut NoiseSource::from_seed(1));
        assert_eq!(out, frame);
    }

    #[test]
    fn test_blur_box_is_deterministic_across_instances() {
        let mut frame = Frame::new(PixelFormat::Yuv420p, 16, 16);
        for y in 0..16 {
            for x in 0..16 {
                frame.set_sample(0, x, y, ((x * y) % 251) as u8);
            }
        }
        let track = Track {
            start: 0.0,
            end: 1.0,
            method: RedactionMethod::Blur,
            region: Some(Rect::new(2, 14, 2, 14)),
        };

        let a = redactor().redact(&frame, &[track], &mut NoiseSource::from_seed(11));
        let b = redactor().redact(&frame, &[track], &mut NoiseSource::from_seed(11));
        assert_eq!(a, b);

        let c = redactor().redact(&frame, &[track], &mut NoiseSource::from_seed(12));
        assert_ne!(a, c);
    }

    #[test]
    fn test_blur_second_frame_uses_previous_output() {
        let mut frame = Frame::new(PixelFormat::Yuv420p, 16, 16);
        for y in 0..16 {
            for x in 0..16 {
                frame.set_sample(0, x, y, ((x * 7 + y * 13) % 256) as u8);
            }
        }
        let track = Track {
            start: 0.0,
            end: 1.0,
            method: RedactionMethod::Blur,
            region: Some(Rect::new(2, 14, 2, 14)),
        };

        // Same input twice through one redactor: the second call blends
        // against the first call's output rather than the input, and the two
        // outputs use different noise draws.
        let mut redactor = redactor();
        let mut noise = NoiseSource::from_seed(11);
        let first = redactor.redact(&frame, &[track], &mut noise);
        let second = redactor.redact(&frame, &[track], &mut noise);
        assert_ne!(first, second);
    }

    #[test]
    fn test_fully_offscreen_boxes_change_nothing() {
        let mut frame = Frame::new(PixelFormat::Yuv420p, 8, 8);
        frame.fill(64, 100, 160);
        let tracks = [
            solid(0.0, 1.0, Rect::new(-20, -10, 0, 8), 200),
            solid(0.0, 1.0, Rect::new(0, 8, 100, 200), 200),
        ];

        let out = redactor().redact(&frame, &tracks, &mut NoiseSource::from_seed(1));
        assert_eq!(out, frame);
    }
}
