//! Scoped photo resource.
//!
//! A photo is decoded once per render call, normalised to a PNG in the scratch
//! directory, used by exactly one renderer and released when the scope ends:
//! on success, on a renderer error and during unwinding alike. Nothing is
//! cached between calls.

use std::io::{Seek, SeekFrom};
use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbImage};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::RenderError;

/// Longest side of the materialised photo, in pixels.
const MAX_PHOTO_EDGE: u32 = 600;

pub struct ScopedPhoto {
    pixels: RgbImage,
    file: Option<NamedTempFile>,
}

impl ScopedPhoto {
    /// Decodes `bytes` and writes the normalised PNG to `scratch_dir`.
    ///
    /// Undecodable data is not an error: it logs a warning and yields `None`
    /// so the render continues without a photo. Failing to write the scratch
    /// file is a renderer fault.
    pub fn acquire(bytes: &[u8], scratch_dir: &Path) -> Result<Option<Self>, RenderError> {
        let decoded = match image::load_from_memory(bytes) {
            Ok(img) => img,
            Err(e) => {
                warn!("Photo could not be decoded, rendering without it: {e}");
                return Ok(None);
            }
        };
        let normalised = if decoded.width() > MAX_PHOTO_EDGE || decoded.height() > MAX_PHOTO_EDGE {
            decoded.thumbnail(MAX_PHOTO_EDGE, MAX_PHOTO_EDGE)
        } else {
            decoded
        };
        let pixels = normalised.to_rgb8();

        let mut file = tempfile::Builder::new()
            .prefix("cv-photo-")
            .suffix(".png")
            .tempfile_in(scratch_dir)
            .map_err(RenderError::Scratch)?;
        DynamicImage::ImageRgb8(pixels.clone())
            .write_to(file.as_file_mut(), ImageFormat::Png)
            .map_err(|e| RenderError::Photo(e.to_string()))?;
        file.as_file_mut()
            .seek(SeekFrom::Start(0))
            .map_err(RenderError::Scratch)?;
        debug!("Photo materialised at {}", file.path().display());
        let photo = ScopedPhoto {
            pixels,
            file: Some(file),
        };
        Ok(Some(photo))
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Height for a given display width, preserving aspect ratio.
    pub fn height_for(&self, width: f32) -> f32 {
        width * self.height() as f32 / self.width().max(1) as f32
    }

    /// The normalised PNG as written to the scratch file.
    pub fn png_bytes(&self) -> Result<Vec<u8>, RenderError> {
        let file = self
            .file
            .as_ref()
            .ok_or_else(|| RenderError::Photo("scratch file already released".to_string()))?;
        std::fs::read(file.path()).map_err(RenderError::Scratch)
    }
}

impl Drop for ScopedPhoto {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            let path = file.path().to_path_buf();
            // Cleanup is best-effort and must not mask the render result.
            match file.close() {
                Ok(()) => debug!("Photo scratch file released: {}", path.display()),
                Err(e) => warn!("Failed to remove photo scratch file {}: {e}", path.display()),
            }
        }
    }
}

/// Runs `f` with the photo acquired for the duration of the call only.
pub fn with_photo<T, F>(bytes: Option<&[u8]>, scratch_dir: &Path, f: F) -> Result<T, RenderError>
where
    F: FnOnce(Option<&ScopedPhoto>) -> Result<T, RenderError>,
{
    let photo = match bytes {
        Some(bytes) if !bytes.is_empty() => ScopedPhoto::acquire(bytes, scratch_dir)?,
        _ => None,
    };
    f(photo.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::tiny_png;
    use tempfile::TempDir;

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn test_acquire_materialises_png_then_releases() {
        let dir = TempDir::new().unwrap();
        let photo = ScopedPhoto::acquire(&tiny_png(), dir.path()).unwrap().unwrap();
        assert_eq!((photo.width(), photo.height()), (8, 6));
        assert_eq!(entries(dir.path()), 1);
        let png = photo.png_bytes().unwrap();
        assert_eq!(&png[1..4], b"PNG");
        drop(photo);
        assert_eq!(entries(dir.path()), 0);
    }

    #[test]
    fn test_garbage_bytes_mean_no_photo() {
        let dir = TempDir::new().unwrap();
        let photo = ScopedPhoto::acquire(b"definitely not an image", dir.path()).unwrap();
        assert!(photo.is_none());
        assert_eq!(entries(dir.path()), 0);
    }

    #[test]
    fn test_with_photo_releases_on_error() {
        let dir = TempDir::new().unwrap();
        let png = tiny_png();
        let result: Result<(), RenderError> = with_photo(Some(&png), dir.path(), |photo| {
            assert!(photo.is_some());
            Err(RenderError::Pdf("drawing failed".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(entries(dir.path()), 0);
    }

    #[test]
    fn test_with_photo_releases_on_panic() {
        let dir = TempDir::new().unwrap();
        let png = tiny_png();
        let path = dir.path().to_path_buf();
        let outcome = std::panic::catch_unwind(|| {
            let _: Result<(), RenderError> =
                with_photo(Some(&png), &path, |_| panic!("renderer blew up"));
        });
        assert!(outcome.is_err());
        assert_eq!(entries(dir.path()), 0);
    }

    #[test]
    fn test_missing_scratch_dir_is_a_render_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("gone");
        let err = ScopedPhoto::acquire(&tiny_png(), &missing).err().unwrap();
        assert!(matches!(err, RenderError::Scratch(_)));
    }

    #[test]
    fn test_height_for_keeps_aspect_ratio() {
        let dir = TempDir::new().unwrap();
        let photo = ScopedPhoto::acquire(&tiny_png(), dir.path()).unwrap().unwrap();
        assert!((photo.height_for(40.0) - 30.0).abs() < 1e-4);
    }
}
