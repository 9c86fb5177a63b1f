// SPDX-License-Identifier: MPL-2.0
//! Image loading and caching for the gallery.
//!
//! This module decodes raster and SVG files into GPU-ready pixel data and
//! keeps recently viewed images in a bounded cache.

pub mod image;
pub mod prefetch;

// Re-export commonly used types
pub use extensions::IMAGE_EXTENSIONS;
pub use image::{load_image, load_thumbnail, ImageData};
pub use prefetch::PrefetchCache;

/// Supported image extensions
pub mod extensions {
    /// Image file extensions
    pub const IMAGE_EXTENSIONS: &[&str] = &[
        "jpg", "jpeg", "png", "gif", "tiff", "tif", "webp", "bmp", "ico", "svg",
    ];

    /// Checks if a file extension belongs to a supported image format.
    #[must_use]
    pub fn is_supported(ext: &str) -> bool {
        IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
    }

    /// Checks if a file path points to a supported image format.
    #[must_use]
    pub fn path_is_supported<P: AsRef<std::path::Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(is_supported)
    }
}
