//! Page geometry and raster targets.

use crate::config::Rotation;
use crate::error::{PdfPlanError, Result};

/// Largest width or height of a surface, in device pixels.
pub const MAX_SURFACE_DIMENSION: u32 = 32_767;

/// Largest pixel count of a surface.
pub const MAX_SURFACE_AREA: u64 = 268_435_456;

const BYTES_PER_PIXEL: usize = 4;

/// Size of a page at a given scale, in CSS pixels (1 pt = 1 px at scale 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width after scaling and rotation.
    pub width: f32,
    /// Height after scaling and rotation.
    pub height: f32,
    /// Scale the viewport was computed for.
    pub scale: f32,
    /// Effective rotation of the page.
    pub rotation: Rotation,
}

impl Viewport {
    /// Compute a viewport from a page's unrotated size in points.
    pub fn new(width: f32, height: f32, scale: f32, rotation: Rotation) -> Self {
        let (width, height) = if rotation.is_quarter_turn() {
            (height, width)
        } else {
            (width, height)
        };

        Self {
            width: width * scale,
            height: height * scale,
            scale,
            rotation,
        }
    }

    /// Displayed size, in whole CSS pixels.
    pub fn css_size(&self) -> (u32, u32) {
        (self.width.floor() as u32, self.height.floor() as u32)
    }

    /// Backing surface size for a device pixel ratio, in whole device pixels.
    pub fn device_size(&self, device_pixel_ratio: f32) -> (u32, u32) {
        (
            (self.width * device_pixel_ratio).floor() as u32,
            (self.height * device_pixel_ratio).floor() as u32,
        )
    }
}

/// An RGBA8 pixel buffer that a page is drawn into.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterSurface {
    /// Acquire a transparent surface.
    ///
    /// # Errors
    ///
    /// Returns `SurfaceUnavailable` for empty or oversized surfaces, or when
    /// the pixel buffer cannot be allocated.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let unavailable = || PdfPlanError::SurfaceUnavailable { width, height };

        if width == 0
            || height == 0
            || width > MAX_SURFACE_DIMENSION
            || height > MAX_SURFACE_DIMENSION
            || u64::from(width) * u64::from(height) > MAX_SURFACE_AREA
        {
            return Err(unavailable());
        }

        let len = width as usize * height as usize * BYTES_PER_PIXEL;
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len).map_err(|_| unavailable())?;
        pixels.resize(len, 0);

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Width in device pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in device pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row by row.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable raw RGBA bytes, row by row.
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Color of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.pixels[offset..offset + BYTES_PER_PIXEL]);
        Some(rgba)
    }

    /// Paint every pixel with one color.
    pub fn fill(&mut self, rgba: [u8; 4]) {
        for chunk in self.pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
            chunk.copy_from_slice(&rgba);
        }
    }
}

impl std::fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}
