//! Separable box blur with seeded noise injection.

use crate::noise::NoiseSource;
use crate::tracks::Rect;

use super::frame::Frame;

/// Box-blur convolution engine for redaction boxes
///
/// Two 1-D rolling-sum passes (horizontal then vertical) per plane, each at
/// that plane's resolution. The kernel on each axis is half the box's extent
/// on that axis, scaled down by the plane's subsampling shift with ceiling
/// rounding, so a wide shallow box smears mostly sideways. Every output
/// sample also receives a uniform noise draw, which is what makes the result
/// resistant to super-resolution reconstruction across frames.
#[derive(Debug)]
pub struct BlurEngine {
    noise_magnitude: i32,
}

impl BlurEngine {
    pub fn new(noise_magnitude: i32) -> Self {
        Self { noise_magnitude }
    }

    /// Blur `region` (luma coordinates) of every plane in place.
    pub fn blur_region(&self, frame: &mut Frame, region: Rect, noise: &mut NoiseSource) {
        for plane in 0..3 {
            let (hs, vs) = frame.subsampling(plane);
            let (plane_w, plane_h) = frame.plane_dims(plane);
            let Some(rect) = region.subsampled(hs, vs).clamped(plane_w, plane_h) else {
                continue;
            };
            // A kernel longer than the plane just re-reads the clamped edge
            // sample; cap it so absurd descriptor boxes stay cheap.
            let kernel_w = kernel_len(region.width(), hs).min(plane_w);
            let kernel_h = kernel_len(region.height(), vs).min(plane_h);

            let data = frame.plane_mut(plane);
            self.horizontal_pass(data, plane_w, rect, kernel_w, noise);
            self.vertical_pass(data, plane_w, plane_h, rect, kernel_h, noise);
        }
    }

    /// One rolling-sum pass along rows.
    ///
    /// The ring buffer holds the window `[x, x+k)`: the write at `x` always
    /// trails every read, so the pass never consumes its own output. The
    /// sample admitted each step sits `k` ahead of the write cursor, clamped
    /// to the row's last sample at the tail.
    fn horizontal_pass(
        &self,
        data: &mut [u8],
        stride: usize,
        rect: Rect,
        k: usize,
        noise: &mut NoiseSource,
    ) {
        let mut ring = vec![0u8; k];
        for y in rect.top as usize..rect.bottom as usize {
            let row = &mut data[y * stride..][..stride];

            let mut sum = 0u32;
            for (i, slot) in ring.iter_mut().enumerate() {
                *slot = row[(rect.left as usize + i).min(stride - 1)];
                sum += u32::from(*slot);
            }

            let mut head = 0;
            for x in rect.left as usize..rect.right as usize {
                let incoming = row[(x + k).min(stride - 1)];
                let average = (sum / k as u32) as i32;
                row[x] = (average + noise.amplitude(self.noise_magnitude)).clamp(0, 255) as u8;

                sum -= u32::from(ring[head]);
                sum += u32::from(incoming);
                ring[head] = incoming;
                head = (head + 1) % k;
            }
        }
    }

    /// The same rolling-sum pass along columns.
    fn vertical_pass(
        &self,
        data: &mut [u8],
        stride: usize,
        plane_h: usize,
        rect: Rect,
        k: usize,
        noise: &mut NoiseSource,
    ) {
        let mut ring = vec![0u8; k];
        for x in rect.left as usize..rect.right as usize {
            let mut sum = 0u32;
            for (i, slot) in ring.iter_mut().enumerate() {
                let sy = (rect.top as usize + i).min(plane_h - 1);
                *slot = data[sy * stride + x];
                sum += u32::from(*slot);
            }

            let mut head = 0;
            for y in rect.top as usize..rect.bottom as usize {
                let incoming = data[(y + k).min(plane_h - 1) * stride + x];
                let average = (sum / k as u32) as i32;
                data[y * stride + x] =
                    (average + noise.amplitude(self.noise_magnitude)).clamp(0, 255) as u8;

                sum -= u32::from(ring[head]);
                sum += u32::from(incoming);
                ring[head] = incoming;
                head = (head + 1) % k;
            }
        }
    }
}

/// Kernel length for one axis: half the box extent, scaled down by the
/// plane's subsampling shift with ceiling rounding, never shorter than 1.
fn kernel_len(extent: i32, shift: u32) -> usize {
    let half = extent.max(0) as usize / 2;
    let scaled = (half + (1usize << shift) - 1) >> shift;
    scaled.max(1)
}
