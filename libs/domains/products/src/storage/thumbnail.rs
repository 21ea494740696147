use std::io::Cursor;

use bytes::Bytes;
use image::{DynamicImage, ImageFormat};

use super::{StorageError, StorageResult};

/// Thumbnails fit inside a square of this many pixels
pub const THUMBNAIL_SIZE: u32 = 500;

/// Decode, downscale to fit [`THUMBNAIL_SIZE`] and re-encode as JPEG.
///
/// CPU bound; callers run it on the blocking pool.
pub fn render_thumbnail(source: &[u8]) -> StorageResult<Vec<u8>> {
    let decoded =
        image::load_from_memory(source).map_err(|e| StorageError::InvalidImage(e.to_string()))?;

    let resized = decoded.thumbnail(THUMBNAIL_SIZE, THUMBNAIL_SIZE);
    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());

    let mut out = Cursor::new(Vec::new());
    rgb.write_to(&mut out, ImageFormat::Jpeg)
        .map_err(|e| StorageError::Upload(format!("thumbnail encoding failed: {}", e)))?;

    Ok(out.into_inner())
}

pub(crate) async fn render_thumbnail_blocking(source: Bytes) -> StorageResult<Bytes> {
    tokio::task::spawn_blocking(move || render_thumbnail(&source))
        .await
        .map_err(|e| StorageError::Upload(format!("thumbnail task failed: {}", e)))?
        .map(Bytes::from)
}
