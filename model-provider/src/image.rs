//! Attachment encoding
//!
//! Attachments are re-encoded to RGB JPEG and sent inline as base64,
//! whatever their source format.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use base64::{Engine as _, engine::general_purpose};
use image::ImageFormat;

use crate::error::{ProviderError, Result};

/// MIME type of every encoded attachment.
pub const ATTACHMENT_MIME: &str = "image/jpeg";

/// Re-encode one image file as base64 JPEG.
pub fn encode_jpeg_base64(path: &Path) -> Result<String> {
  let img = image::open(path)
    .map_err(|e| ProviderError::ImageError(format!("{}: {}", path.display(), e)))?;
  let rgb = img.to_rgb8();

  let mut bytes = Vec::new();
  rgb
    .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
    .map_err(|e| ProviderError::ImageError(format!("{}: {}", path.display(), e)))?;

  Ok(general_purpose::STANDARD.encode(&bytes))
}

/// Encode every readable attachment. Unreadable files are logged and skipped.
pub fn encode_attachments(paths: &[PathBuf]) -> Vec<String> {
  paths
    .iter()
    .filter_map(|path| match encode_jpeg_base64(path) {
      Ok(data) => Some(data),
      Err(e) => {
        tracing::warn!("Skipping attachment: {}", e);
        None
      }
    })
    .collect()
}

/// `data:` URL form used by OpenAI-compatible image parts.
pub fn data_url(base64_jpeg: &str) -> String {
  format!("data:{};base64,{}", ATTACHMENT_MIME, base64_jpeg)
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::{Rgba, RgbaImage};

  #[test]
  fn png_with_alpha_becomes_jpeg() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pixel.png");
    RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 128]))
      .save(&path)
      .unwrap();

    let encoded = encode_jpeg_base64(&path).unwrap();
    let bytes = general_purpose::STANDARD.decode(encoded).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
  }

  #[test]
  fn unreadable_attachments_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.png");
    assert!(encode_attachments(&[missing]).is_empty());
  }

  #[test]
  fn data_url_prefix() {
    assert_eq!(data_url("AAA"), "data:image/jpeg;base64,AAA");
  }
}
