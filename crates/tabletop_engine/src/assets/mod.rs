//! Asset loading
//!
//! Decodes image files into host pixel buffers for the texture registry.

pub mod image_loader;

pub use image_loader::ImageData;

/// Asset errors
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// Asset not found
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Failed to load asset
    #[error("Failed to load asset: {0}")]
    LoadFailed(String),

    /// Invalid asset data
    #[error("Invalid asset data: {0}")]
    InvalidData(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
