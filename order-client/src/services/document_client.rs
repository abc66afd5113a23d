//! HTTP document-service client: multipart submission of composed orders.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use order_core::lifecycle::DocumentService;
use order_core::models::DocumentKind;
use order_core::payload::{Payload, Value};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use secrecy::ExposeSecret;

use crate::config::DocumentServiceSettings;

pub struct DocumentServiceClient {
    client: Client,
    settings: DocumentServiceSettings,
}

impl DocumentServiceClient {
    pub fn new(settings: DocumentServiceSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    fn endpoint(&self, kind: DocumentKind, id: Option<&str>) -> String {
        match id {
            Some(id) => format!("{}/{}/{}", self.settings.url, kind.resource(), id),
            None => format!("{}/{}", self.settings.url, kind.resource()),
        }
    }

    /// Build a multipart form from the flat payload field family.
    fn form(payload: &Payload) -> Form {
        let mut form = Form::new();
        for (name, value) in payload.fields() {
            form = match value {
                Value::Text(text) => form.text(name.clone(), text.clone()),
                Value::File { file_name, bytes } => form.part(
                    name.clone(),
                    Part::bytes(bytes.clone()).file_name(file_name.clone()),
                ),
            };
        }
        form
    }

    async fn post(&self, url: &str, payload: &Payload) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(url)
            .bearer_auth(self.settings.api_token.expose_secret())
            .multipart(Self::form(payload))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send POST request to {}: {}", url, e);
                anyhow!("HTTP request failed: {}", e)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Document service rejected submission");
            return Err(anyhow!("document service returned {}", status));
        }

        Ok(response)
    }
}

#[async_trait]
impl DocumentService for DocumentServiceClient {
    async fn create(&self, kind: DocumentKind, payload: &Payload) -> Result<String> {
        let url = self.endpoint(kind, None);
        let response = self.post(&url, payload).await?;

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| anyhow!("malformed create response: {}", e))?;

        // Server-assigned ids arrive as a string or a number depending on
        // the backend version.
        match body.get("id") {
            Some(serde_json::Value::String(id)) => Ok(id.clone()),
            Some(serde_json::Value::Number(id)) => Ok(id.to_string()),
            _ => Err(anyhow!("no id in create response")),
        }
    }

    async fn update(&self, kind: DocumentKind, id: &str, payload: &Payload) -> Result<()> {
        let url = self.endpoint(kind, Some(id));
        self.post(&url, payload).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    fn client() -> DocumentServiceClient {
        DocumentServiceClient::new(DocumentServiceSettings {
            url: "http://localhost:8000/api".to_string(),
            api_token: Secret::new("test-token".to_string()),
        })
    }

    #[test]
    fn create_endpoint_uses_kind_resource() {
        let c = client();
        assert_eq!(
            c.endpoint(DocumentKind::Bill, None),
            "http://localhost:8000/api/bills"
        );
        assert_eq!(
            c.endpoint(DocumentKind::Quote, None),
            "http://localhost:8000/api/quotes"
        );
    }

    #[test]
    fn update_endpoint_is_keyed_by_id() {
        let c = client();
        assert_eq!(
            c.endpoint(DocumentKind::Bill, Some("42")),
            "http://localhost:8000/api/bills/42"
        );
    }
}
