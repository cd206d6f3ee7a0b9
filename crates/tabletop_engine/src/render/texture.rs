//! Texture registry
//!
//! Decodes image files, uploads them through a [`TextureBackend`], and hands
//! out one sampler slot per registration in load order. Lookup is a linear
//! scan by tag; duplicate tags are accepted and the first registration wins.
//!
//! [`HostTextureStore`] is the in-memory backend. It keeps the pixels, a
//! box-filtered mip chain, the sampler parameters, and the unit binding
//! table, so the whole registry contract can run without a GPU.

use std::path::Path;

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::assets::{AssetError, ImageData};
use crate::render::LookupError;

slotmap::new_key_type! {
    /// Handle for an uploaded texture owned by a backend
    pub struct TextureHandle;
}

/// Sampler slot index a texture is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureSlot(pub u32);

impl TextureSlot {
    /// Slot as a table index
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Slot as the integer value a sampler uniform expects
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn as_uniform(self) -> i32 {
        self.0 as i32
    }
}

/// Internal pixel formats accepted for upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 8-bit RGB
    Rgb8,
    /// 8-bit RGBA
    Rgba8,
}

impl PixelFormat {
    /// Pick the format for a decoded channel count
    #[must_use]
    pub const fn from_channels(channels: u8) -> Option<Self> {
        match channels {
            3 => Some(Self::Rgb8),
            4 => Some(Self::Rgba8),
            _ => None,
        }
    }

    /// Bytes per pixel
    #[must_use]
    pub const fn channels(self) -> usize {
        match self {
            Self::Rgb8 => 3,
            Self::Rgba8 => 4,
        }
    }
}

/// Texture filtering modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterMode {
    /// Nearest neighbor filtering
    Nearest,
    /// Linear filtering
    Linear,
}

/// Texture wrapping modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WrapMode {
    /// Repeat the texture
    Repeat,
    /// Mirror the texture
    MirroredRepeat,
    /// Clamp to edge
    ClampToEdge,
}

/// Texture creation parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureParams {
    /// Texture filtering mode
    pub filter_mode: FilterMode,
    /// Texture wrapping mode
    pub wrap_mode: WrapMode,
    /// Generate mipmaps
    pub generate_mipmaps: bool,
}

impl Default for TextureParams {
    fn default() -> Self {
        Self {
            filter_mode: FilterMode::Linear,
            wrap_mode: WrapMode::Repeat,
            generate_mipmaps: true,
        }
    }
}

/// Texture registration errors
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    /// The image could not be read or decoded
    #[error("Failed to decode texture: {0}")]
    Decode(#[from] AssetError),

    /// Decoded image has a channel count other than 3 or 4
    #[error("Texture '{tag}' has unsupported channel count {channels}")]
    UnsupportedChannels {
        /// Tag the texture was registered under
        tag: String,
        /// Decoded channel count
        channels: u8,
    },

    /// Every sampler slot is already taken
    #[error("Cannot register texture '{tag}': all {max_slots} texture units are in use")]
    CapacityExceeded {
        /// Tag the texture was registered under
        tag: String,
        /// Number of available texture units
        max_slots: usize,
    },

    /// The backend refused the operation
    #[error("Texture backend error: {0}")]
    Backend(String),
}

/// GPU-side texture operations
pub trait TextureBackend {
    /// Number of sampler units available to the shading program
    fn max_texture_units(&self) -> usize;

    /// Upload pixels with the given sampler parameters
    fn upload(
        &mut self,
        image: &ImageData,
        format: PixelFormat,
        params: &TextureParams,
    ) -> Result<TextureHandle, TextureError>;

    /// Make `handle` the active texture for `slot`
    fn bind(&mut self, slot: TextureSlot, handle: TextureHandle) -> Result<(), TextureError>;

    /// Free an uploaded texture
    fn release(&mut self, handle: TextureHandle);
}

/// One registered texture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureEntry {
    /// Symbolic tag used by draw steps
    pub tag: String,
    /// Backend handle
    pub handle: TextureHandle,
    /// Sampler slot, equal to registration order
    pub slot: TextureSlot,
    /// Width of the base level
    pub width: u32,
    /// Height of the base level
    pub height: u32,
    /// Upload format
    pub format: PixelFormat,
}

/// Registry of loaded textures keyed by tag
#[derive(Debug)]
pub struct TextureRegistry {
    entries: Vec<TextureEntry>,
    max_slots: usize,
    params: TextureParams,
}

impl TextureRegistry {
    /// Create a registry with `max_slots` sampler units
    #[must_use]
    pub fn new(max_slots: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_slots,
            params: TextureParams::default(),
        }
    }

    /// Create a registry sized to a backend's texture-unit limit
    #[must_use]
    pub fn for_backend<B: TextureBackend>(backend: &B) -> Self {
        Self::new(backend.max_texture_units())
    }

    /// Replace the sampler parameters used by later uploads
    #[must_use]
    pub fn with_params(mut self, params: TextureParams) -> Self {
        self.params = params;
        self
    }

    /// Sampler parameters applied to every upload
    #[must_use]
    pub const fn params(&self) -> &TextureParams {
        &self.params
    }

    /// Decode `path` and register it under `tag`
    ///
    /// On any failure the registry is left unchanged.
    pub fn load<B, P>(&mut self, backend: &mut B, path: P, tag: &str) -> Result<TextureSlot, TextureError>
    where
        B: TextureBackend,
        P: AsRef<Path>,
    {
        self.check_capacity(tag)?;
        let image = ImageData::from_file(path.as_ref())?;
        self.register_image(backend, &image, tag)
    }

    /// Register already-decoded pixels under `tag`
    pub fn register_image<B: TextureBackend>(
        &mut self,
        backend: &mut B,
        image: &ImageData,
        tag: &str,
    ) -> Result<TextureSlot, TextureError> {
        self.check_capacity(tag)?;

        let format = PixelFormat::from_channels(image.channels).ok_or_else(|| TextureError::UnsupportedChannels {
            tag: tag.to_string(),
            channels: image.channels,
        })?;

        if self.entries.iter().any(|entry| entry.tag == tag) {
            log::warn!("Texture tag '{}' registered more than once; lookups return the first", tag);
        }

        let handle = backend.upload(image, format, &self.params)?;
        let slot = TextureSlot(u32::try_from(self.entries.len()).map_err(|_| TextureError::CapacityExceeded {
            tag: tag.to_string(),
            max_slots: self.max_slots,
        })?);

        self.entries.push(TextureEntry {
            tag: tag.to_string(),
            handle,
            slot,
            width: image.width,
            height: image.height,
            format,
        });

        log::debug!(
            "Registered texture '{}' ({}x{} {:?}) in slot {}",
            tag,
            image.width,
            image.height,
            format,
            slot.0
        );
        Ok(slot)
    }

    fn check_capacity(&self, tag: &str) -> Result<(), TextureError> {
        if self.entries.len() >= self.max_slots {
            log::error!(
                "Texture '{}' rejected: {} of {} texture units already used",
                tag,
                self.entries.len(),
                self.max_slots
            );
            return Err(TextureError::CapacityExceeded {
                tag: tag.to_string(),
                max_slots: self.max_slots,
            });
        }
        Ok(())
    }

    /// Bind every registered texture to its slot
    ///
    /// Returns the number of bindings made.
    pub fn bind_all<B: TextureBackend>(&self, backend: &mut B) -> Result<usize, TextureError> {
        for entry in &self.entries {
            backend.bind(entry.slot, entry.handle)?;
        }
        log::debug!("Bound {} textures", self.entries.len());
        Ok(self.entries.len())
    }

    /// Slot of the first texture registered under `tag`
    pub fn find_slot(&self, tag: &str) -> Result<TextureSlot, LookupError> {
        self.find(tag).map(|entry| entry.slot)
    }

    /// Handle of the first texture registered under `tag`
    pub fn find_handle(&self, tag: &str) -> Result<TextureHandle, LookupError> {
        self.find(tag).map(|entry| entry.handle)
    }

    fn find(&self, tag: &str) -> Result<&TextureEntry, LookupError> {
        self.entries
            .iter()
            .find(|entry| entry.tag == tag)
            .ok_or_else(|| LookupError::TextureNotFound(tag.to_string()))
    }

    /// Return every texture to the backend and empty the registry
    pub fn release_all<B: TextureBackend>(&mut self, backend: &mut B) {
        let count = self.entries.len();
        for entry in self.entries.drain(..) {
            backend.release(entry.handle);
        }
        log::info!("Released {} textures", count);
    }

    /// Registered textures in slot order
    #[must_use]
    pub fn entries(&self) -> &[TextureEntry] {
        &self.entries
    }

    /// Number of sampler units this registry may fill
    #[must_use]
    pub const fn max_slots(&self) -> usize {
        self.max_slots
    }

    /// Number of registered textures
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One level of a mip chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MipLevel {
    /// Level width in pixels
    pub width: u32,
    /// Level height in pixels
    pub height: u32,
    /// Packed pixels
    pub data: Vec<u8>,
}

/// Texture held by [`HostTextureStore`]
#[derive(Debug, Clone)]
pub struct HostTexture {
    /// Pixel format
    pub format: PixelFormat,
    /// Sampler parameters
    pub params: TextureParams,
    /// Level 0 first, down to 1x1 when mipmaps are enabled
    pub levels: Vec<MipLevel>,
}

/// In-memory texture backend
#[derive(Debug)]
pub struct HostTextureStore {
    textures: SlotMap<TextureHandle, HostTexture>,
    bindings: Vec<Option<TextureHandle>>,
}

impl HostTextureStore {
    /// Texture-unit count most desktop drivers guarantee for fragment shaders
    pub const DEFAULT_TEXTURE_UNITS: usize = 16;

    /// Create a store with the default unit count
    #[must_use]
    pub fn new() -> Self {
        Self::with_texture_units(Self::DEFAULT_TEXTURE_UNITS)
    }

    /// Create a store with `units` sampler units
    #[must_use]
    pub fn with_texture_units(units: usize) -> Self {
        Self {
            textures: SlotMap::with_key(),
            bindings: vec![None; units],
        }
    }

    /// Look up an uploaded texture
    #[must_use]
    pub fn texture(&self, handle: TextureHandle) -> Option<&HostTexture> {
        self.textures.get(handle)
    }

    /// Texture currently bound to `slot`
    #[must_use]
    pub fn bound(&self, slot: TextureSlot) -> Option<TextureHandle> {
        self.bindings.get(slot.index()).copied().flatten()
    }

    /// Number of live textures
    #[must_use]
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// True when no textures are live
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

impl Default for HostTextureStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureBackend for HostTextureStore {
    fn max_texture_units(&self) -> usize {
        self.bindings.len()
    }

    fn upload(
        &mut self,
        image: &ImageData,
        format: PixelFormat,
        params: &TextureParams,
    ) -> Result<TextureHandle, TextureError> {
        if image.channels as usize != format.channels() {
            return Err(TextureError::Backend(format!(
                "{:?} upload given {}-channel pixels",
                format, image.channels
            )));
        }
        if image.width == 0 || image.height == 0 {
            return Err(TextureError::Backend("cannot upload an empty image".to_string()));
        }

        let base = MipLevel {
            width: image.width,
            height: image.height,
            data: image.data.clone(),
        };
        let levels = if params.generate_mipmaps {
            build_mip_chain(base, format.channels())
        } else {
            vec![base]
        };

        log::trace!("Uploaded {}x{} texture with {} levels", image.width, image.height, levels.len());
        Ok(self.textures.insert(HostTexture {
            format,
            params: *params,
            levels,
        }))
    }

    fn bind(&mut self, slot: TextureSlot, handle: TextureHandle) -> Result<(), TextureError> {
        if !self.textures.contains_key(handle) {
            return Err(TextureError::Backend(format!("bind of released texture {handle:?}")));
        }
        let units = self.bindings.len();
        let unit = self
            .bindings
            .get_mut(slot.index())
            .ok_or_else(|| TextureError::Backend(format!("slot {} outside {} texture units", slot.0, units)))?;
        *unit = Some(handle);
        Ok(())
    }

    fn release(&mut self, handle: TextureHandle) {
        if self.textures.remove(handle).is_some() {
            for unit in &mut self.bindings {
                if *unit == Some(handle) {
                    *unit = None;
                }
            }
        }
    }
}

/// Halve each level with a 2x2 box filter until reaching 1x1
fn build_mip_chain(base: MipLevel, channels: usize) -> Vec<MipLevel> {
    let mut levels = vec![base];
    while let Some(last) = levels.last() {
        if last.width == 1 && last.height == 1 {
            break;
        }
        let next = downsample(last, channels);
        levels.push(next);
    }
    levels
}

#[allow(clippy::cast_possible_truncation)]
fn downsample(level: &MipLevel, channels: usize) -> MipLevel {
    let width = (level.width / 2).max(1);
    let height = (level.height / 2).max(1);
    let src_w = level.width as usize;
    let src_h = level.height as usize;
    let mut data = Vec::with_capacity(width as usize * height as usize * channels);

    for y in 0..height as usize {
        for x in 0..width as usize {
            let xs = [(2 * x).min(src_w - 1), (2 * x + 1).min(src_w - 1)];
            let ys = [(2 * y).min(src_h - 1), (2 * y + 1).min(src_h - 1)];
            for c in 0..channels {
                let sum: u32 = ys
                    .iter()
                    .flat_map(|&sy| xs.iter().map(move |&sx| (sy * src_w + sx) * channels + c))
                    .map(|i| u32::from(level.data[i]))
                    .sum();
                data.push(((sum + 2) / 4) as u8);
            }
        }
    }

    MipLevel { width, height, data }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(width: u32, height: u32) -> ImageData {
        ImageData::solid_color(width, height, &[200, 100, 50])
    }

    fn rgba(width: u32, height: u32) -> ImageData {
        ImageData::solid_color(width, height, &[10, 20, 30, 255])
    }

    #[test]
    fn test_slots_follow_registration_order() {
        let mut backend = HostTextureStore::new();
        let mut registry = TextureRegistry::for_backend(&backend);

        for (i, tag) in ["counter", "wall", "apple"].iter().enumerate() {
            let slot = registry.register_image(&mut backend, &rgb(2, 2), tag).unwrap();
            assert_eq!(slot, TextureSlot(u32::try_from(i).unwrap()));
        }
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_lookup_is_idempotent() {
        let mut backend = HostTextureStore::new();
        let mut registry = TextureRegistry::for_backend(&backend);
        registry.register_image(&mut backend, &rgb(2, 2), "pages").unwrap();
        registry.register_image(&mut backend, &rgba(2, 2), "foam").unwrap();

        let first = (registry.find_slot("foam").unwrap(), registry.find_handle("foam").unwrap());
        for _ in 0..5 {
            assert_eq!(registry.find_slot("foam").unwrap(), first.0);
            assert_eq!(registry.find_handle("foam").unwrap(), first.1);
        }
    }

    #[test]
    fn test_duplicate_tag_keeps_both_entries() {
        let mut backend = HostTextureStore::new();
        let mut registry = TextureRegistry::for_backend(&backend);
        let first = registry.register_image(&mut backend, &rgb(2, 2), "wall").unwrap();
        let second = registry.register_image(&mut backend, &rgba(4, 4), "wall").unwrap();

        assert_ne!(first, second);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.find_slot("wall").unwrap(), first);
    }

    #[test]
    fn test_missing_tag_is_an_error() {
        let registry = TextureRegistry::new(16);
        assert_eq!(
            registry.find_slot("nothing"),
            Err(LookupError::TextureNotFound("nothing".to_string()))
        );
        assert!(registry.find_handle("nothing").is_err());
    }

    #[test]
    fn test_unsupported_channels_rejected() {
        let mut backend = HostTextureStore::new();
        let mut registry = TextureRegistry::for_backend(&backend);
        let gray = ImageData::solid_color(2, 2, &[128]);

        let result = registry.register_image(&mut backend, &gray, "gray");
        assert!(matches!(result, Err(TextureError::UnsupportedChannels { channels: 1, .. })));
        assert!(registry.is_empty());
        assert!(backend.is_empty());
    }

    #[test]
    fn test_capacity_overrun_rejected() {
        let mut backend = HostTextureStore::with_texture_units(2);
        let mut registry = TextureRegistry::for_backend(&backend);
        registry.register_image(&mut backend, &rgb(1, 1), "a").unwrap();
        registry.register_image(&mut backend, &rgb(1, 1), "b").unwrap();

        let result = registry.register_image(&mut backend, &rgb(1, 1), "c");
        assert!(matches!(result, Err(TextureError::CapacityExceeded { max_slots: 2, .. })));
        assert_eq!(registry.len(), 2);
        assert_eq!(backend.len(), 2);
    }

    #[test]
    fn test_load_missing_file_leaves_registry_unchanged() {
        let mut backend = HostTextureStore::new();
        let mut registry = TextureRegistry::for_backend(&backend);
        let result = registry.load(&mut backend, "textures/missing.jpg", "missing");

        assert!(matches!(result, Err(TextureError::Decode(AssetError::NotFound(_)))));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_bind_all_binds_each_slot() {
        let mut backend = HostTextureStore::new();
        let mut registry = TextureRegistry::for_backend(&backend);
        registry.register_image(&mut backend, &rgb(2, 2), "can").unwrap();
        registry.register_image(&mut backend, &rgba(2, 2), "canlid").unwrap();

        assert_eq!(registry.bind_all(&mut backend).unwrap(), 2);
        for entry in registry.entries() {
            assert_eq!(backend.bound(entry.slot), Some(entry.handle));
        }
    }

    #[test]
    fn test_upload_uses_repeat_linear_mipmapped() {
        let mut backend = HostTextureStore::new();
        let mut registry = TextureRegistry::for_backend(&backend);
        registry.register_image(&mut backend, &rgba(8, 4), "counter").unwrap();

        let texture = backend.texture(registry.find_handle("counter").unwrap()).unwrap();
        assert_eq!(texture.params, TextureParams::default());
        assert_eq!(texture.format, PixelFormat::Rgba8);
        let sizes: Vec<(u32, u32)> = texture.levels.iter().map(|l| (l.width, l.height)).collect();
        assert_eq!(sizes, vec![(8, 4), (4, 2), (2, 1), (1, 1)]);
    }

    #[test]
    fn test_custom_params_reach_the_backend() {
        let mut backend = HostTextureStore::new();
        let params = TextureParams {
            filter_mode: FilterMode::Nearest,
            wrap_mode: WrapMode::MirroredRepeat,
            generate_mipmaps: false,
        };
        let mut registry = TextureRegistry::for_backend(&backend).with_params(params);
        assert_eq!(registry.params(), &params);
        registry.register_image(&mut backend, &rgb(8, 8), "wall").unwrap();

        let texture = backend.texture(registry.find_handle("wall").unwrap()).unwrap();
        assert_eq!(texture.params, params);
        assert_eq!(texture.levels.len(), 1);
    }

    #[test]
    fn test_downsample_averages_blocks() {
        let level = MipLevel {
            width: 2,
            height: 2,
            data: vec![0, 100, 200, 100],
        };
        let next = downsample(&level, 1);
        assert_eq!((next.width, next.height), (1, 1));
        assert_eq!(next.data, vec![100]);
    }

    #[test]
    fn test_release_all_empties_backend() {
        let mut backend = HostTextureStore::new();
        let mut registry = TextureRegistry::for_backend(&backend);
        registry.register_image(&mut backend, &rgb(2, 2), "a").unwrap();
        registry.register_image(&mut backend, &rgb(2, 2), "b").unwrap();
        registry.bind_all(&mut backend).unwrap();

        registry.release_all(&mut backend);
        assert!(registry.is_empty());
        assert!(backend.is_empty());
        assert_eq!(backend.bound(TextureSlot(0)), None);
    }
}
