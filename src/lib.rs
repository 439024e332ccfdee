//! Pairline - anonymous preference-based pairing and relay
//!
//! Requesters declare who they are and who they want to talk to. The engine
//! pairs two mutually compatible requesters, then relays opaque payloads
//! between them until either side ends the session.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{is_compatible, DeliveryFailure, PairingEngine, SessionCoordinator};
pub use models::{
    AgeBracket, CancelOutcome, EndOutcome, Gender, MatchOutcome, Payload, PreferenceProfile, RelayOutcome,
    RequesterId, ResetOutcome, SessionState, Wanted,
};
pub use services::{Envelope, MemoryTransport, Transport, TransportError, WebhookTransport};
