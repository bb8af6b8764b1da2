/// Flower and favorites endpoints.
///
/// Favorites are a sub-resource of flowers: adding posts to
/// `/flowers/:id/favorites`, removal needs the *favorite-record* id in
/// `/flowers/:id/favorites/:fav_id`, and the listing comes back as
/// `fav_flowers` records pairing both ids.
use serde_json::json;

use super::client::{decode, expect_success, ApiClient};
use super::error::ApiResult;
use super::models::{
    FavoriteCreated, FavoriteRecord, FavoritesList, Flower, FlowerEnvelope, FlowerList,
    Sighting, SightingsList,
};

pub async fn list(api: &ApiClient) -> ApiResult<Vec<Flower>> {
    let response = api.get("/flowers", None).send().await?;
    let list: FlowerList = decode(response).await?;
    Ok(list.flowers)
}

/// Random selection shown on the home page.
pub async fn random(api: &ApiClient) -> ApiResult<Vec<Flower>> {
    let response = api.get("/flowers/random", None).send().await?;
    let list: FlowerList = decode(response).await?;
    Ok(list.flowers)
}

pub async fn search(api: &ApiClient, query: &str) -> ApiResult<Vec<Flower>> {
    let response = api
        .get("/flowers/search", None)
        .query(&[("query", query)])
        .send()
        .await?;
    let list: FlowerList = decode(response).await?;
    Ok(list.flowers)
}

pub async fn detail(api: &ApiClient, flower_id: i64) -> ApiResult<Flower> {
    let response = api
        .get(&format!("/flowers/{flower_id}"), None)
        .send()
        .await?;
    let envelope: FlowerEnvelope = decode(response).await?;
    Ok(envelope.flower)
}

pub async fn sightings_of(api: &ApiClient, flower_id: i64) -> ApiResult<Vec<Sighting>> {
    let response = api
        .get(&format!("/flowers/{flower_id}/sightings"), None)
        .send()
        .await?;
    let list: SightingsList = decode(response).await?;
    Ok(list.sightings)
}

pub async fn favorites(api: &ApiClient, token: &str) -> ApiResult<Vec<FavoriteRecord>> {
    let response = api.get("/flowers/favorites", Some(token)).send().await?;
    let list: FavoritesList = decode(response).await?;
    Ok(list.fav_flowers)
}

/// Add a flower to favorites; the returned record carries the id needed
/// for later removal.
pub async fn add_favorite(
    api: &ApiClient,
    token: &str,
    flower_id: i64,
    user_id: i64,
) -> ApiResult<FavoriteRecord> {
    let response = api
        .post(&format!("/flowers/{flower_id}/favorites"), Some(token))
        .json(&json!({ "user_id": user_id }))
        .send()
        .await?;
    let created: FavoriteCreated = decode(response).await?;
    Ok(created.fav_flower)
}

/// Remove a favorite. Takes the favorite-record id, not the flower id.
pub async fn remove_favorite(
    api: &ApiClient,
    token: &str,
    flower_id: i64,
    fav_flower_id: i64,
) -> ApiResult<()> {
    let response = api
        .delete(
            &format!("/flowers/{flower_id}/favorites/{fav_flower_id}"),
            Some(token),
        )
        .send()
        .await?;
    expect_success(response).await
}
