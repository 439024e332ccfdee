use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::models::{Payload, RequesterId};

/// Errors that can occur while handing an envelope to the front-end
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Front-end rejected delivery: {0}")]
    Rejected(String),

    #[error("Recipient unreachable: {0}")]
    Unreachable(RequesterId),
}

/// One unit of delivery addressed to a single requester
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Envelope {
    /// A partner was found; relay is now open
    Matched { partner: RequesterId },
    /// The partner ended the session
    PartnerLeft,
    /// The recipient's own end-of-session confirmation
    SessionEnded,
    /// A relayed message, forwarded unmodified
    Relay { payload: Payload },
}

/// Delivery capability supplied by the front-end collaborator
#[async_trait]
pub trait Transport: Send + Sync {
    async fn deliver(&self, recipient: &RequesterId, envelope: Envelope) -> Result<(), TransportError>;
}
