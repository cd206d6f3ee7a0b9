//! Image loading utilities for texture data
//!
//! Decodes PNG and JPEG files with the `image` crate. Rows are flipped on load
//! so the first row in memory is the bottom of the picture, matching a
//! bottom-left UV origin. The native channel count is preserved; the texture
//! registry decides which counts it accepts.

use std::path::Path;

use image::DynamicImage;

use crate::assets::AssetError;

/// Decoded image data ready for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Tightly packed 8-bit pixel rows, bottom row first
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Number of color channels per pixel
    pub channels: u8,
}

impl ImageData {
    /// Load and flip an image from a file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let path_ref = path.as_ref();

        log::debug!("Loading image from: {:?}", path_ref);

        if !path_ref.exists() {
            return Err(AssetError::NotFound(path_ref.display().to_string()));
        }

        let bytes = std::fs::read(path_ref)?;
        let img = image::load_from_memory(&bytes)
            .map_err(|e| AssetError::LoadFailed(format!("{}: {}", path_ref.display(), e)))?;
        let data = Self::from_dynamic(&img.flipv());

        log::info!(
            "Loaded image {}x{} ({} channels) from {:?}",
            data.width,
            data.height,
            data.channels,
            path_ref
        );

        Ok(data)
    }

    /// Load and flip an image from memory
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AssetError> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| AssetError::LoadFailed(format!("Failed to load image from bytes: {e}")))?;
        let data = Self::from_dynamic(&img.flipv());

        log::debug!("Loaded image {}x{} from memory", data.width, data.height);

        Ok(data)
    }

    /// Wrap raw pixels, checking that the buffer matches the dimensions
    pub fn from_raw(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<Self, AssetError> {
        let expected = width as usize * height as usize * channels as usize;
        if channels == 0 || data.len() != expected {
            return Err(AssetError::InvalidData(format!(
                "{}x{}x{} image needs {} bytes, got {}",
                width,
                height,
                channels,
                expected,
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Create a solid color image with one channel per `color` component
    #[must_use]
    pub fn solid_color(width: u32, height: u32, color: &[u8]) -> Self {
        let pixel_count = width as usize * height as usize;
        let data = color.repeat(pixel_count);
        let channels = u8::try_from(color.len()).unwrap_or(u8::MAX);

        Self {
            data,
            width,
            height,
            channels,
        }
    }

    fn from_dynamic(img: &DynamicImage) -> Self {
        let (width, height) = (img.width(), img.height());
        let (channels, data) = match img.color().channel_count() {
            3 => (3, img.to_rgb8().into_raw()),
            4 => (4, img.to_rgba8().into_raw()),
            2 => (2, img.to_luma_alpha8().into_raw()),
            _ => (1, img.to_luma8().into_raw()),
        };
        Self {
            data,
            width,
            height,
            channels,
        }
    }

    /// Get the size of the image data in bytes
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Get one pixel as a channel slice, `y` counted from the bottom row
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let stride = self.channels as usize;
        let start = (y as usize * self.width as usize + x as usize) * stride;
        self.data.get(start..start + stride)
    }
}
