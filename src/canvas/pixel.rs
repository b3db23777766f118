use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};

use crate::foundation::core::{Position, Rgb8};
use crate::foundation::error::{ChaosError, ChaosResult};

/// In-memory RGB8 raster the chaos walk is plotted into.
///
/// Writes overwrite; there is no blending.
#[derive(Clone, Debug)]
pub struct PixelCanvas {
    image: RgbImage,
}

impl PixelCanvas {
    /// Create a `width`x`height` canvas filled with [`Rgb8::BLACK`].
    pub fn new(width: u32, height: u32) -> ChaosResult<Self> {
        if width == 0 || height == 0 {
            return Err(ChaosError::validation(
                "canvas width/height must be non-zero",
            ));
        }
        Ok(Self {
            image: RgbImage::from_pixel(width, height, Rgb(Rgb8::BLACK.to_array())),
        })
    }

    /// Canvas width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Overwrite the pixel at `(x, y)`.
    ///
    /// Coordinates outside the canvas are a [`ChaosError::Bounds`]; they are never clamped.
    pub fn set_pixel(&mut self, x: i64, y: i64, color: Rgb8) -> ChaosResult<()> {
        let (px, py) = self.checked_coords(x, y)?;
        self.image.put_pixel(px, py, Rgb(color.to_array()));
        Ok(())
    }

    /// Plot a walk position.
    pub fn plot(&mut self, pos: Position, color: Rgb8) -> ChaosResult<()> {
        self.set_pixel(pos.x, pos.y, color)
    }

    /// Read back the pixel at `(x, y)`.
    pub fn get_pixel(&self, x: i64, y: i64) -> ChaosResult<Rgb8> {
        let (px, py) = self.checked_coords(x, y)?;
        let Rgb([r, g, b]) = *self.image.get_pixel(px, py);
        Ok(Rgb8::new(r, g, b))
    }

    /// Borrow the underlying raster.
    pub fn as_image(&self) -> &RgbImage {
        &self.image
    }

    /// Encode the current contents as PNG at `path`.
    pub fn encode_to(&self, path: &Path) -> ChaosResult<()> {
        self.image
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| ChaosError::encode(format!("write png '{}': {e}", path.display())))
    }

    fn checked_coords(&self, x: i64, y: i64) -> ChaosResult<(u32, u32)> {
        let out_of_bounds = || ChaosError::Bounds {
            x,
            y,
            width: self.width(),
            height: self.height(),
        };
        let px = u32::try_from(x).map_err(|_| out_of_bounds())?;
        let py = u32::try_from(y).map_err(|_| out_of_bounds())?;
        if px >= self.width() || py >= self.height() {
            return Err(out_of_bounds());
        }
        Ok((px, py))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/pixel.rs"]
mod tests;
