use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use crate::models::RequesterId;
use crate::services::transport::{Envelope, Transport, TransportError};

/// Header carrying the shared secret the front-end checks on every callback
pub const SECRET_HEADER: &str = "X-Pairline-Secret";

#[derive(Debug, Serialize)]
struct Delivery<'a> {
    #[serde(rename = "recipientId")]
    recipient_id: &'a RequesterId,
    #[serde(rename = "deliveryId")]
    delivery_id: String,
    envelope: &'a Envelope,
}

/// Delivers envelopes by POSTing them to the front-end's callback URL
pub struct WebhookTransport {
    callback_url: String,
    secret: Option<String>,
    client: Client,
}

impl WebhookTransport {
    /// Create a new webhook transport
    pub fn new(
        callback_url: String,
        secret: Option<String>,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            callback_url,
            secret,
            client,
        })
    }

    pub fn callback_url(&self) -> &str {
        &self.callback_url
    }
}

#[async_trait]
impl Transport for WebhookTransport {
    async fn deliver(&self, recipient: &RequesterId, envelope: Envelope) -> Result<(), TransportError> {
        let delivery = Delivery {
            recipient_id: recipient,
            delivery_id: uuid::Uuid::new_v4().to_string(),
            envelope: &envelope,
        };

        let mut request = self.client.post(&self.callback_url).json(&delivery);
        if let Some(secret) = &self.secret {
            request = request.header(SECRET_HEADER, secret.as_str());
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::warn!("Callback rejected delivery to {}: {} - {}", recipient, status, body);
            return Err(TransportError::Rejected(status.to_string()));
        }

        tracing::debug!("Delivered {} to {}", delivery.delivery_id, recipient);

        Ok(())
    }
}
