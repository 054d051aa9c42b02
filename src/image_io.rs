/// Upload and download of images
///
/// Uploads are read entirely into memory and tagged with a mime type sniffed
/// from their content. Downloads write the active image to a user-chosen path.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use image::ImageFormat;
use log::info;

use crate::error::ImageIoError;
use crate::state::EncodedImage;

/// Extensions offered in the upload dialog
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "bmp"];

/// Show the upload dialog and load the chosen file
///
/// Returns `Ok(None)` if the user cancelled.
pub async fn pick_image() -> Result<Option<EncodedImage>, ImageIoError> {
    let picked = rfd::AsyncFileDialog::new()
        .set_title("Select a Photo")
        .add_filter("Images", IMAGE_EXTENSIONS)
        .pick_file()
        .await;

    match picked {
        Some(handle) => load_image(handle.path().to_path_buf()).await.map(Some),
        None => Ok(None),
    }
}

/// Read an image file into memory
pub async fn load_image(path: PathBuf) -> Result<EncodedImage, ImageIoError> {
    let bytes = tokio::fs::read(&path).await?;
    if bytes.is_empty() {
        return Err(ImageIoError::Empty);
    }

    let mime_type = detect_mime_type(&bytes, &path)?;
    info!("📁 Loaded {} ({}, {} bytes)", path.display(), mime_type, bytes.len());

    Ok(EncodedImage::new(mime_type, bytes))
}

/// Sniff the format from the content, falling back to the file extension
fn detect_mime_type(bytes: &[u8], path: &Path) -> Result<&'static str, ImageIoError> {
    image::guess_format(bytes)
        .or_else(|_| ImageFormat::from_path(path))
        .map(|format| format.to_mime_type())
        .map_err(|_| ImageIoError::UnsupportedFormat(path.display().to_string()))
}

/// Default download name, e.g. `edited-image-20261015-093000.png`
pub fn download_file_name(image: &EncodedImage, now: DateTime<Utc>) -> String {
    format!(
        "edited-image-{}.{}",
        now.format("%Y%m%d-%H%M%S"),
        image.file_extension()
    )
}

/// Show the save dialog and write the image
///
/// Returns the written path, or `Ok(None)` if the user cancelled.
pub async fn save_image_as(image: EncodedImage) -> Result<Option<PathBuf>, ImageIoError> {
    let picked = rfd::AsyncFileDialog::new()
        .set_title("Save Image")
        .set_file_name(download_file_name(&image, Utc::now()))
        .save_file()
        .await;

    match picked {
        Some(handle) => save_image(&image, handle.path().to_path_buf()).await.map(Some),
        None => Ok(None),
    }
}

/// Write the raw image bytes to `path`
pub async fn save_image(image: &EncodedImage, path: PathBuf) -> Result<PathBuf, ImageIoError> {
    tokio::fs::write(&path, &image.bytes).await?;
    info!("💾 Saved {} bytes to {}", image.byte_len(), path.display());
    Ok(path)
}
