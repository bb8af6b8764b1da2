/// Authentication endpoints: registration, login, and the profile of the
/// currently authenticated user.
use super::client::{decode, ApiClient};
use super::error::ApiResult;
use super::models::{AuthResponse, Credentials, Registration, User, UserEnvelope};

pub async fn register(api: &ApiClient, form: &Registration) -> ApiResult<AuthResponse> {
    let response = api.post("/users/register", None).json(form).send().await?;
    decode(response).await
}

pub async fn login(api: &ApiClient, credentials: &Credentials) -> ApiResult<AuthResponse> {
    let response = api
        .post("/users/login", None)
        .json(credentials)
        .send()
        .await?;
    decode(response).await
}

/// Fetch the profile behind the token; used right after login to cache
/// the numeric user id and the name shown in the header.
pub async fn me(api: &ApiClient, token: &str) -> ApiResult<User> {
    let response = api.get("/users/me", Some(token)).send().await?;
    let envelope: UserEnvelope = decode(response).await?;
    Ok(envelope.user)
}
