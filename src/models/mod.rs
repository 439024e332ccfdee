// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AgeBracket, CancelOutcome, ConnectedPair, EndOutcome, Gender, MatchOutcome, ParseAttributeError, Payload,
    PreferenceProfile, RelayOutcome, RequesterId, ResetOutcome, SessionState, Wanted,
};
pub use requests::{MatchRequest, RelayRequest, RequesterRequest, StateQuery};
pub use responses::{ErrorResponse, HealthResponse, SessionResponse};
