// SPDX-License-Identifier: GPL-3.0-only

//! Preview thumbnail encoding

use crate::errors::WorkerFault;
use crate::luminance::LuminanceView;

/// Fixed JPEG quality for preview thumbnails
const THUMBNAIL_JPEG_QUALITY: u8 = 50;

/// Encoded preview image and its size relative to the decoded region
#[derive(Debug, Clone)]
pub struct Thumbnail {
    /// JPEG-encoded grayscale preview
    pub bytes: Vec<u8>,
    /// Thumbnail width / region width, always in (0, 1]
    pub scale_factor: f32,
}

/// Render and encode a JPEG preview of the viewed region
pub fn render(view: &LuminanceView) -> Result<Thumbnail, WorkerFault> {
    let (pixels, width, height) = view.render_thumbnail();

    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    let mut encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, THUMBNAIL_JPEG_QUALITY);
    encoder
        .encode(&pixels, width, height, image::ExtendedColorType::L8)
        .map_err(|e| WorkerFault::Thumbnail(e.to_string()))?;

    Ok(Thumbnail {
        bytes: buffer,
        scale_factor: width as f32 / view.width() as f32,
    })
}
