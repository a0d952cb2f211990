pub mod auth;
pub mod investors;

use common::ErrorResponse;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use crate::settings;

// API_BASE is now retrieved from settings
fn api_base() -> String {
    settings::get_settings().api_base_url()
}

/// Attach the bearer token when the caller holds one
fn with_auth(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
        None => builder,
    }
}

/// Message shown for a failed response.
///
/// Prefers the server's `error` field, then the HTTP status text, then the bare code.
pub fn error_message(status: u16, status_text: &str, body: Option<ErrorResponse>) -> String {
    if let Some(body) = body {
        if !body.error.trim().is_empty() {
            return body.error;
        }
    }
    if !status_text.trim().is_empty() {
        return status_text.to_string();
    }
    format!("HTTP {}", status)
}

async fn read_response<T>(method: &str, endpoint: &str, response: Response) -> Result<T, String>
where
    T: DeserializeOwned,
{
    if !response.ok() {
        let status = response.status();
        let status_text = response.status_text();
        let body = response.json::<ErrorResponse>().await.ok();
        let error_msg = error_message(status, &status_text, body);
        log::error!("{} {} - {} ({})", method, endpoint, error_msg, status);
        return Err(error_msg);
    }

    log::trace!("{} {} - Response received, parsing JSON", method, endpoint);
    response.json::<T>().await.map_err(|e| {
        let error_msg = format!("Failed to parse response: {}", e);
        log::error!("{} {} - {}", method, endpoint, error_msg);
        error_msg
    })
}

/// Common GET request handler
pub async fn get<T>(endpoint: &str, token: Option<&str>) -> Result<T, String>
where
    T: DeserializeOwned,
{
    let url = format!("{}{}", api_base(), endpoint);
    log::debug!("GET request to: {}", url);

    let response = with_auth(Request::get(&url), token)
        .send()
        .await
        .map_err(|e| {
            let error_msg = format!("Request failed: {}", e);
            log::error!("GET {} - {}", endpoint, error_msg);
            error_msg
        })?;

    let result = read_response("GET", endpoint, response).await;
    if result.is_ok() {
        log::info!("GET {} - Success", endpoint);
    }
    result
}

/// Common POST request handler
pub async fn post<T, B>(endpoint: &str, body: &B, token: Option<&str>) -> Result<T, String>
where
    T: DeserializeOwned,
    B: Serialize,
{
    let url = format!("{}{}", api_base(), endpoint);
    log::debug!("POST request to: {}", url);

    let request = with_auth(Request::post(&url), token)
        .json(body)
        .map_err(|e| {
            let error_msg = format!("Failed to serialize request: {}", e);
            log::error!("POST {} - {}", endpoint, error_msg);
            error_msg
        })?;

    let response = request.send().await.map_err(|e| {
        let error_msg = format!("Request failed: {}", e);
        log::error!("POST {} - {}", endpoint, error_msg);
        error_msg
    })?;

    let result = read_response("POST", endpoint, response).await;
    if result.is_ok() {
        log::info!("POST {} - Success", endpoint);
    }
    result
}
