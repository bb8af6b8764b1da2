/// Sighting and like endpoints.
///
/// Creation is a multipart form because a photo may ride along; every 2xx
/// status counts as success. Likes are a sub-resource keyed by the
/// current user, so like/unlike both send the user id.
use reqwest::multipart::{Form, Part};
use serde_json::json;

use super::client::{decode, expect_success, ApiClient};
use super::error::{ApiError, ApiResult};
use super::models::{Like, LikesList, Sighting, SightingEnvelope, SightingsList};

/// Payload for creating a sighting.
#[derive(Debug, Clone)]
pub struct NewSighting {
    pub flower_id: i64,
    pub name: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub picture: Option<PhotoUpload>,
}

/// A photo ready for upload: already decoded, downscaled, and re-encoded
/// as JPEG by the picker flow.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub async fn latest(api: &ApiClient) -> ApiResult<Vec<Sighting>> {
    let response = api.get("/sightings", None).send().await?;
    let list: SightingsList = decode(response).await?;
    Ok(list.sightings)
}

pub async fn detail(api: &ApiClient, sighting_id: i64) -> ApiResult<Sighting> {
    let response = api
        .get(&format!("/sightings/{sighting_id}"), None)
        .send()
        .await?;
    let envelope: SightingEnvelope = decode(response).await?;
    Ok(envelope.sighting)
}

pub async fn create(api: &ApiClient, token: &str, new: NewSighting) -> ApiResult<Sighting> {
    let mut form = Form::new()
        .text("flower_id", new.flower_id.to_string())
        .text("name", new.name)
        .text("description", new.description)
        .text("latitude", format!("{:.4}", new.latitude))
        .text("longitude", format!("{:.4}", new.longitude));

    if let Some(photo) = new.picture {
        let part = Part::bytes(photo.bytes)
            .file_name(photo.file_name)
            .mime_str("image/jpeg")
            .map_err(|e| ApiError::Network(e.to_string()))?;
        form = form.part("picture", part);
    }

    let response = api
        .post("/sightings", Some(token))
        .multipart(form)
        .send()
        .await?;
    let envelope: SightingEnvelope = decode(response).await?;
    Ok(envelope.sighting)
}

/// Delete a sighting; the server only honors this for its creator.
pub async fn delete(api: &ApiClient, token: &str, sighting_id: i64) -> ApiResult<()> {
    let response = api
        .delete(&format!("/sightings/{sighting_id}"), Some(token))
        .send()
        .await?;
    expect_success(response).await
}

/// The authoritative like list for a sighting.
pub async fn likes(api: &ApiClient, token: Option<&str>, sighting_id: i64) -> ApiResult<Vec<Like>> {
    let response = api
        .get(&format!("/sightings/{sighting_id}/likes"), token)
        .send()
        .await?;
    let list: LikesList = decode(response).await?;
    Ok(list.likes)
}

pub async fn like(
    api: &ApiClient,
    token: &str,
    sighting_id: i64,
    user_id: i64,
) -> ApiResult<()> {
    let response = api
        .post(&format!("/sightings/{sighting_id}/likes"), Some(token))
        .json(&json!({ "user_id": user_id }))
        .send()
        .await?;
    expect_success(response).await
}

pub async fn unlike(
    api: &ApiClient,
    token: &str,
    sighting_id: i64,
    user_id: i64,
) -> ApiResult<()> {
    let response = api
        .delete(&format!("/sightings/{sighting_id}/likes"), Some(token))
        .json(&json!({ "user_id": user_id }))
        .send()
        .await?;
    expect_success(response).await
}
