use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use super::error::{ApiError, ApiResult};

/// The fixed third-party API the client talks to.
pub const DEFAULT_BASE_URL: &str = "https://flowrspot-api.herokuapp.com/api/v1";

/// Thin wrapper around a shared `reqwest::Client` that knows the API base
/// path and how to attach bearer credentials.
///
/// Cloning is cheap (the inner client is reference counted), so each
/// background task gets its own handle.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: String,
}

impl ApiClient {
    /// Build a client against the compiled-in base URL.
    ///
    /// `FLOWRSPOT_API_BASE` may override the default at build time; there
    /// is no runtime configuration surface.
    pub fn new() -> Self {
        let base = option_env!("FLOWRSPOT_API_BASE").unwrap_or(DEFAULT_BASE_URL);
        Self::with_base(base)
    }

    pub fn with_base(base: impl Into<String>) -> Self {
        ApiClient {
            http: Client::new(),
            base: base.into(),
        }
    }

    /// The underlying HTTP client, for requests outside the API base path
    /// (pictures, geolocation).
    pub fn http(&self) -> &Client {
        &self.http
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn get(&self, path: &str, token: Option<&str>) -> RequestBuilder {
        authorize(self.http.get(self.url(path)), token)
    }

    pub fn post(&self, path: &str, token: Option<&str>) -> RequestBuilder {
        authorize(self.http.post(self.url(path)), token)
    }

    pub fn delete(&self, path: &str, token: Option<&str>) -> RequestBuilder {
        authorize(self.http.delete(self.url(path)), token)
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

fn authorize(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => builder.bearer_auth(token),
        None => builder,
    }
}

/// Check the status line, then decode the JSON body.
pub async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let response = check(response).await?;
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

/// Normalize the response status into the error taxonomy.
///
/// 401 becomes `Unauthorized` so callers can drop the stored session;
/// any other non-2xx status surfaces the server-provided `error` (or
/// `message`) field when the body carries one.
pub async fn check(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }
    if !status.is_success() {
        let message = error_message(response).await.unwrap_or_else(|| {
            format!("request failed with status {}", status.as_u16())
        });
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response)
}

/// Run the status check and discard the body.
pub async fn expect_success(response: Response) -> ApiResult<()> {
    check(response).await.map(|_| ())
}

async fn error_message(response: Response) -> Option<String> {
    let body: serde_json::Value = response.json().await.ok()?;
    body.get("error")
        .or_else(|| body.get("message"))
        .and_then(|value| value.as_str())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_joined_against_the_base() {
        let api = ApiClient::with_base("https://example.test/api/v1");
        assert_eq!(
            api.url("/flowers/random"),
            "https://example.test/api/v1/flowers/random"
        );
    }

    #[test]
    fn default_base_points_at_the_flowrspot_api() {
        let api = ApiClient::new();
        assert!(api.url("/flowers").starts_with("https://"));
        assert!(api.url("/flowers").ends_with("/api/v1/flowers"));
    }
}
