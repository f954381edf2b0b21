use image::RgbImage;

use crate::error::{RedactorError, Result};

/// Planar 8-bit YUV pixel formats the redactor accepts
///
/// These are the layouts the filter negotiates with its host: three separate
/// planes, chroma possibly subsampled per axis by a power of two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Yuv444p,
    Yuv440p,
    Yuv422p,
    Yuv420p,
    Yuv411p,
    Yuv410p,
}

impl PixelFormat {
    /// Horizontal and vertical chroma subsampling shifts (log2 factors)
    pub fn chroma_shift(self) -> (u32, u32) {
        match self {
            PixelFormat::Yuv444p => (0, 0),
            PixelFormat::Yuv440p => (0, 1),
            PixelFormat::Yuv422p => (1, 0),
            PixelFormat::Yuv420p => (1, 1),
            PixelFormat::Yuv411p => (2, 0),
            PixelFormat::Yuv410p => (2, 2),
        }
    }

    /// Total bytes of one frame at the given luma dimensions
    pub fn frame_bytes(self, width: usize, height: usize) -> usize {
        let (cw, ch) = self.chroma_dims(width, height);
        width * height + 2 * cw * ch
    }

    /// Chroma plane dimensions for the given luma dimensions, rounding up so
    /// odd-sized frames keep their last chroma column/row.
    pub fn chroma_dims(self, width: usize, height: usize) -> (usize, usize) {
        let (hs, vs) = self.chroma_shift();
        (ceil_div(width, 1 << hs), ceil_div(height, 1 << vs))
    }
}

impl std::str::FromStr for PixelFormat {
    type Err = RedactorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "yuv444p" => Ok(PixelFormat::Yuv444p),
            "yuv440p" => Ok(PixelFormat::Yuv440p),
            "yuv422p" => Ok(PixelFormat::Yuv422p),
            "yuv420p" | "i420" => Ok(PixelFormat::Yuv420p),
            "yuv411p" => Ok(PixelFormat::Yuv411p),
            "yuv410p" => Ok(PixelFormat::Yuv410p),
            other => Err(RedactorError::generic(format!("unknown pixel format '{}'", other))),
        }
    }
}

fn ceil_div(n: usize, d: usize) -> usize {
    (n + d - 1) / d
}

/// A planar YUV frame with owned plane buffers
///
/// Plane 0 is luma at full resolution; planes 1 and 2 are chroma at the
/// format's subsampled resolution. Rows are tightly packed (stride equals
/// plane width).
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    format: PixelFormat,
    width: usize,
    height: usize,
    planes: [Vec<u8>; 3],
}

impl Frame {
    /// Create a black frame (limited-range luma 16, centered chroma)
    pub fn new(format: PixelFormat, width: usize, height: usize) -> Self {
        let (cw, ch) = format.chroma_dims(width, height);
        Self {
            format,
            width,
            height,
            planes: [
                vec![16; width * height],
                vec![128; cw * ch],
                vec![128; cw * ch],
            ],
        }
    }

    /// Assemble a frame from raw plane buffers, validating their sizes
    pub fn from_planes(
        format: PixelFormat,
        width: usize,
        height: usize,
        y: Vec<u8>,
        u: Vec<u8>,
        v: Vec<u8>,
    ) -> Result<Self> {
        let (cw, ch) = format.chroma_dims(width, height);
        if y.len() != width * height {
            return Err(RedactorError::generic(format!(
                "luma plane is {} bytes, expected {}",
                y.len(),
                width * height
            )));
        }
        if u.len() != cw * ch || v.len() != cw * ch {
            return Err(RedactorError::generic(format!(
                "chroma planes are {}/{} bytes, expected {}",
                u.len(),
                v.len(),
                cw * ch
            )));
        }
        Ok(Self { format, width, height, planes: [y, u, v] })
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Dimensions of a plane (luma for 0, subsampled chroma for 1 and 2)
    pub fn plane_dims(&self, plane: usize) -> (usize, usize) {
        if plane == 0 {
            (self.width, self.height)
        } else {
            self.format.chroma_dims(self.width, self.height)
        }
    }

    /// Subsampling shifts for a plane: `(0, 0)` for luma
    pub fn subsampling(&self, plane: usize) -> (u32, u32) {
        if plane == 0 {
            (0, 0)
        } else {
            self.format.chroma_shift()
        }
    }

    pub fn plane(&self, plane: usize) -> &[u8] {
        &self.planes[plane]
    }

    pub fn plane_mut(&mut self, plane: usize) -> &mut [u8] {
        &mut self.planes[plane]
    }

    /// Read one sample from a plane at that plane's resolution
    pub fn sample(&self, plane: usize, x: usize, y: usize) -> u8 {
        let (w, _) = self.plane_dims(plane);
        self.planes[plane][y * w + x]
    }

    /// Write one sample into a plane at that plane's resolution
    pub fn set_sample(&mut self, plane: usize, x: usize, y: usize, value: u8) {
        let (w, _) = self.plane_dims(plane);
        self.planes[plane][y * w + x] = value;
    }

    /// Fill every plane with constant values (useful for synthetic frames)
    pub fn fill(&mut self, luma: u8, cb: u8, cr: u8) {
        self.planes[0].fill(luma);
        self.planes[1].fill(cb);
        self.planes[2].fill(cr);
    }

    /// Whether another frame has the same geometry, so its planes can stand
    /// in for this frame's in per-pixel operations
    pub fn same_geometry(&self, other: &Frame) -> bool {
        self.format == other.format && self.width == other.width && self.height == other.height
    }

    /// Convert to an RGB image (BT.601) for preview output
    pub fn to_rgb_image(&self) -> RgbImage {
        let (hs, vs) = self.format.chroma_shift();
        let (cw, _) = self.format.chroma_dims(self.width, self.height);
        RgbImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let (x, y) = (x as usize, y as usize);
            let c = i32::from(self.planes[0][y * self.width + x]) - 16;
            let ci = (y >> vs) * cw + (x >> hs);
            let d = i32::from(self.planes[1][ci]) - 128;
            let e = i32::from(self.planes[2][ci]) - 128;
            let clamp = |v: i32| v.clamp(0, 255) as u8;
            image::Rgb([
                clamp((298 * c + 409 * e + 128) >> 8),
                clamp((298 * c - 100 * d - 208 * e + 128) >> 8),
                clamp((298 * c + 516 * d + 128) >> 8),
            ])
        })
    }
}
