use anyhow::Context;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::{json, Value};
use url::Url;

use crate::cli::OutputFormat;

/// Thin JSON client for the vidshare API.
pub struct ApiClient {
    base: Url,
    token: Option<String>,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base: &str, token: Option<String>) -> anyhow::Result<Self> {
        let base = Url::parse(base).with_context(|| format!("invalid API URL '{}'", base))?;
        Ok(Self {
            base,
            token,
            http: reqwest::Client::new(),
        })
    }

    pub fn endpoint(&self, path: &str) -> anyhow::Result<Url> {
        self.base
            .join(path)
            .with_context(|| format!("invalid API path '{}'", path))
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub async fn get(&self, path: &str) -> anyhow::Result<(StatusCode, Value)> {
        self.send::<()>(Method::GET, path, None).await
    }

    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> anyhow::Result<(StatusCode, Value)> {
        self.send(Method::POST, path, Some(body)).await
    }

    async fn send<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> anyhow::Result<(StatusCode, Value)> {
        let url = self.endpoint(path)?;
        let mut request = self.http.request(method, url.clone());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;
        let status = response.status();
        let value = response.json::<Value>().await.unwrap_or(Value::Null);
        Ok((status, value))
    }
}

/// Pull the server's error message out of an error envelope.
pub fn error_message(status: StatusCode, body: &Value) -> String {
    body.get("message")
        .or_else(|| body.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("request failed with status {}", status))
}

/// Fail with the server's message unless `status` is a success.
pub fn ensure_success(status: StatusCode, body: &Value) -> anyhow::Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(anyhow::anyhow!(error_message(status, body)))
    }
}

/// Output a success message in the appropriate format
pub fn output_success(output_format: OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });
            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(
    output_format: OutputFormat,
    collection_name: &str,
    message: &str,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ collection_name: [] }))?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_onto_base() {
        let client = ApiClient::new("http://localhost:3000", None).unwrap();
        assert_eq!(
            client.endpoint("/api/videos").unwrap().as_str(),
            "http://localhost:3000/api/videos"
        );
    }

    #[test]
    fn rejects_malformed_base() {
        assert!(ApiClient::new("not a url", None).is_err());
    }

    #[test]
    fn error_message_prefers_server_text() {
        let body = json!({ "success": false, "error": true, "message": "User already exists" });
        assert_eq!(error_message(StatusCode::BAD_REQUEST, &body), "User already exists");
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, &Value::Null),
            "request failed with status 502 Bad Gateway"
        );
    }
}
