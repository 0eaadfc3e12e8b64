//! API client for communicating with the wardrobe REST backend.
//!
//! This module provides the `ApiClient` struct for making authenticated
//! requests to the auth, item, outfit, and image endpoints.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use base64::Engine;
use chrono::Utc;
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::SessionData;
use crate::models::{ClothingItem, ItemDraft, ItemPatch, Outfit, OutfitDraft, OutfitPatch, User};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Default backend URL for local development
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
/// 3 retries with exponential backoff usually succeeds without excessive delay.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
/// 1 second is polite to the server while not making users wait too long.
const INITIAL_BACKOFF_MS: u64 = 1000;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Register returns the created user's fields with the token inlined.
/// The token key is snake_case while the user fields are camelCase.
#[derive(Debug, Deserialize)]
struct RegisterResponse {
    access_token: String,
    #[serde(flatten)]
    user: User,
}

/// Response from the background-removal endpoint
#[derive(Debug, Deserialize)]
struct ImageResponse {
    filename: String,
    content_type: String,
    base64_image: String,
}

/// A processed clothing image, decoded from the service response
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// API client for the wardrobe backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client against the given base URL
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Set the bearer token for authenticated requests
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    /// This is more efficient than creating a new client for each request.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(), // Cheap clone, shares connection pool
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ===== Authentication =====

    /// Log in with email and password, returning session data.
    /// The login endpoint only returns a token, so the profile is
    /// fetched in a second request.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionData> {
        let url = self.url("/auth/login");
        let body = serde_json::json!({ "email": email, "password": password });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("Failed to send login request")?;

        let response = Self::check_response(response).await?;
        let token: TokenResponse = response.json().await.context("Failed to parse login response")?;

        let user = self.fetch_profile_with_token(&token.access_token).await?;

        Ok(SessionData {
            token: token.access_token,
            user,
            created_at: Utc::now(),
        })
    }

    /// Register a new account, returning session data.
    /// The register endpoint inlines the token in the user payload.
    pub async fn register(&self, email: &str, password: &str, name: &str) -> Result<SessionData> {
        let url = self.url("/auth/register");
        let body = serde_json::json!({ "email": email, "password": password, "name": name });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("Failed to send registration request")?;

        let response = Self::check_response(response).await?;
        let created: RegisterResponse = response
            .json()
            .await
            .context("Failed to parse registration response")?;

        Ok(SessionData {
            token: created.access_token,
            user: created.user,
            created_at: Utc::now(),
        })
    }

    /// Fetch the authenticated user's profile
    pub async fn fetch_profile(&self) -> Result<User> {
        self.get(&self.url("/auth/me")).await
    }

    async fn fetch_profile_with_token(&self, token: &str) -> Result<User> {
        let url = self.url("/auth/me");
        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .context("Failed to fetch user profile")?;

        let response = Self::check_response(response).await?;
        response.json().await.context("Failed to parse user profile")
    }

    // ===== Clothing Items =====

    /// Fetch all clothing items for the authenticated user
    pub async fn fetch_items(&self) -> Result<Vec<ClothingItem>> {
        self.get(&self.url("/items")).await
    }

    /// Create a clothing item, returning the server's copy with id and timestamp
    pub async fn create_item(&self, draft: &ItemDraft) -> Result<ClothingItem> {
        self.post(&self.url("/items"), draft).await
    }

    /// Apply a partial update to a clothing item
    pub async fn update_item(&self, id: &str, patch: &ItemPatch) -> Result<ClothingItem> {
        self.patch(&self.url(&format!("/items/{}", id)), patch).await
    }

    /// Delete a clothing item by id
    pub async fn delete_item(&self, id: &str) -> Result<()> {
        self.delete(&self.url(&format!("/items/{}", id))).await
    }

    // ===== Outfits =====

    /// Fetch all outfits for the authenticated user
    pub async fn fetch_outfits(&self) -> Result<Vec<Outfit>> {
        self.get(&self.url("/outfits")).await
    }

    /// Create an outfit, returning the server's copy with id and timestamp.
    /// The server rejects drafts referencing unknown item ids with 400.
    pub async fn create_outfit(&self, draft: &OutfitDraft) -> Result<Outfit> {
        self.post(&self.url("/outfits"), draft).await
    }

    /// Apply a partial update to an outfit
    pub async fn update_outfit(&self, id: &str, patch: &OutfitPatch) -> Result<Outfit> {
        self.patch(&self.url(&format!("/outfits/{}", id)), patch).await
    }

    /// Delete an outfit by id
    pub async fn delete_outfit(&self, id: &str) -> Result<()> {
        self.delete(&self.url(&format!("/outfits/{}", id))).await
    }

    // ===== Image Processing =====

    /// Upload an image to the background-removal service and decode the result
    pub async fn remove_background(&self, path: &Path) -> Result<ProcessedImage> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read image file {}", path.display()))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload.png".to_string());

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        let form = reqwest::multipart::Form::new().part("file", part);

        let url = self.url("/images/remove-background/");
        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .multipart(form)
            .send()
            .await
            .context("Failed to upload image")?;

        let response = Self::check_response(response).await?;
        let parsed: ImageResponse = response
            .json()
            .await
            .context("Failed to parse image processing response")?;

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&parsed.base64_image)
            .context("Failed to decode processed image payload")?;

        debug!(
            filename = %parsed.filename,
            size = bytes.len(),
            "Processed image received"
        );

        Ok(ProcessedImage {
            filename: parsed.filename,
            content_type: parsed.content_type,
            bytes,
        })
    }

    // ===== Request Plumbing =====

    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = self.token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit (should retry),
    /// or Err for other errors.
    async fn check_response_for_retry(
        response: reqwest::Response,
    ) -> Result<Option<reqwest::Response>> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status().as_u16() == 429 {
            // Rate limited - signal to retry
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let response = self
                .client
                .get(url)
                .headers(self.auth_headers()?)
                .send()
                .await
                .with_context(|| format!("Failed to send GET request to {}", url))?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => {
                    return response
                        .json()
                        .await
                        .with_context(|| format!("Failed to parse JSON response from {}", url));
                }
                None => {
                    // Rate limited
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited.into());
                    }
                    warn!(url = url, retry = retries, backoff_ms = backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2; // Exponential backoff
                }
            }
        }
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, url: &str, body: &B) -> Result<T> {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let response = self
                .client
                .post(url)
                .headers(self.auth_headers()?)
                .json(body)
                .send()
                .await
                .with_context(|| format!("Failed to send POST request to {}", url))?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => {
                    return response
                        .json()
                        .await
                        .with_context(|| format!("Failed to parse JSON response from {}", url));
                }
                None => {
                    // Rate limited
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited.into());
                    }
                    warn!(url = url, retry = retries, backoff_ms = backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2; // Exponential backoff
                }
            }
        }
    }

    async fn patch<T: DeserializeOwned, B: Serialize>(&self, url: &str, body: &B) -> Result<T> {
        let response = self
            .client
            .patch(url)
            .headers(self.auth_headers()?)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send PATCH request to {}", url))?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    /// DELETE returns 204 with no body
    async fn delete(&self, url: &str) -> Result<()> {
        let response = self
            .client
            .delete(url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .with_context(|| format!("Failed to send DELETE request to {}", url))?;

        Self::check_response(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let client = ApiClient::new("http://localhost:8000/").expect("client builds");
        assert_eq!(client.url("/items"), "http://localhost:8000/items");
    }

    #[test]
    fn test_parse_register_response() {
        let json = r#"{
            "id": "5f1c9a6e-8a8b-4a76-9c41-2a9a17a1f001",
            "email": "casey@example.com",
            "name": "Casey",
            "createdAt": "2025-06-15T08:00:00Z",
            "access_token": "eyJhbGciOi.test.token"
        }"#;

        let resp: RegisterResponse = serde_json::from_str(json)
            .expect("Failed to parse register test JSON");
        assert_eq!(resp.access_token, "eyJhbGciOi.test.token");
        assert_eq!(resp.user.email, "casey@example.com");
        assert_eq!(resp.user.name.as_deref(), Some("Casey"));
    }

    #[test]
    fn test_parse_image_response_payload() {
        // "PNG!" base64-encoded
        let json = r#"{
            "filename": "a1b2.png",
            "content_type": "image/png",
            "base64_image": "UE5HIQ=="
        }"#;

        let resp: ImageResponse = serde_json::from_str(json)
            .expect("Failed to parse image test JSON");
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&resp.base64_image)
            .expect("payload decodes");
        assert_eq!(bytes, b"PNG!");
        assert_eq!(resp.content_type, "image/png");
    }

    #[test]
    fn test_error_from_status_mapping() {
        let err = ApiError::from_status(reqwest::StatusCode::UNAUTHORIZED, "");
        assert!(matches!(err, ApiError::Unauthorized));

        let err = ApiError::from_status(reqwest::StatusCode::BAD_REQUEST, "Item 9 not found");
        assert!(matches!(err, ApiError::BadRequest(_)));

        let err = ApiError::from_status(reqwest::StatusCode::TOO_MANY_REQUESTS, "");
        assert!(matches!(err, ApiError::RateLimited));
    }
}
