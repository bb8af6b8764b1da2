/// Remote picture loading and photo preparation.
///
/// Pictures come back from the API as URLs (sometimes without a scheme).
/// Fetched bytes are decoded and downscaled off the UI thread, then
/// handed to the image widget as raw RGBA.
use std::path::PathBuf;

use iced::widget::image::Handle;

use crate::api::sightings::PhotoUpload;

/// Longest edge for card/detail pictures.
pub const DISPLAY_MAX_DIM: u32 = 640;

/// Longest edge for photos uploaded with a new sighting.
pub const UPLOAD_MAX_DIM: u32 = 1600;

/// Fetch a remote picture and decode it into a widget-ready handle.
pub async fn load(http: reqwest::Client, url: String, max_dim: u32) -> Result<Handle, String> {
    let url = normalize_url(&url);
    let response = http
        .get(&url)
        .send()
        .await
        .map_err(|e| format!("picture fetch failed: {e}"))?;

    if !response.status().is_success() {
        return Err(format!("picture fetch answered {}", response.status()));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| format!("picture read failed: {e}"))?
        .to_vec();

    // Decoding is CPU-bound, keep it off the UI thread.
    tokio::task::spawn_blocking(move || decode_scaled(&bytes, max_dim))
        .await
        .map_err(|e| format!("task join error: {e}"))?
}

fn decode_scaled(bytes: &[u8], max_dim: u32) -> Result<Handle, String> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| format!("could not decode picture: {e}"))?;

    let scaled = if decoded.width() > max_dim || decoded.height() > max_dim {
        decoded.thumbnail(max_dim, max_dim)
    } else {
        decoded
    };

    let rgba = scaled.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(Handle::from_rgba(width, height, rgba.into_raw()))
}

/// Read a picked photo from disk, check it decodes, downscale oversized
/// images, and produce both the JPEG upload bytes and a preview handle.
pub async fn prepare_upload(path: PathBuf) -> Result<(PhotoUpload, Handle), String> {
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| format!("could not read photo: {e}"))?;

    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "sighting".to_string());

    tokio::task::spawn_blocking(move || {
        let decoded =
            image::load_from_memory(&bytes).map_err(|e| format!("not a readable image: {e}"))?;

        let scaled = if decoded.width() > UPLOAD_MAX_DIM || decoded.height() > UPLOAD_MAX_DIM {
            decoded.thumbnail(UPLOAD_MAX_DIM, UPLOAD_MAX_DIM)
        } else {
            decoded
        };

        // JPEG has no alpha channel, encode from RGB.
        let rgb = scaled.to_rgb8();
        let mut encoded = Vec::new();
        rgb.write_to(
            &mut std::io::Cursor::new(&mut encoded),
            image::ImageFormat::Jpeg,
        )
        .map_err(|e| format!("could not encode photo: {e}"))?;

        let rgba = scaled.to_rgba8();
        let (width, height) = rgba.dimensions();
        let preview = Handle::from_rgba(width, height, rgba.into_raw());

        Ok((
            PhotoUpload {
                file_name: format!("{stem}.jpg"),
                bytes: encoded,
            },
            preview,
        ))
    })
    .await
    .map_err(|e| format!("task join error: {e}"))?
}

/// The API sometimes returns picture URLs without a scheme; make them
/// fetchable.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else if let Some(rest) = trimmed.strip_prefix("//") {
        format!("https://{rest}")
    } else {
        format!("https://{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_full_urls_untouched() {
        assert_eq!(
            normalize_url("https://pics.example/rose.png"),
            "https://pics.example/rose.png"
        );
        assert_eq!(
            normalize_url("http://pics.example/rose.png"),
            "http://pics.example/rose.png"
        );
    }

    #[test]
    fn prepends_a_scheme_when_missing() {
        assert_eq!(
            normalize_url("pics.example/rose.png"),
            "https://pics.example/rose.png"
        );
        assert_eq!(
            normalize_url("//pics.example/rose.png"),
            "https://pics.example/rose.png"
        );
    }

    #[test]
    fn trims_whitespace_first() {
        assert_eq!(
            normalize_url("  pics.example/rose.png "),
            "https://pics.example/rose.png"
        );
    }
}
