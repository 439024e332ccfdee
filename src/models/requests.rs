use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{AgeBracket, Gender, Payload, PreferenceProfile, RequesterId, Wanted};

/// Request to enter matchmaking with a freshly declared profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchRequest {
    #[validate(length(min = 1, max = 128))]
    #[serde(alias = "requester_id", rename = "requesterId")]
    pub requester_id: String,
    pub gender: Gender,
    #[serde(alias = "age_bracket", rename = "ageBracket")]
    pub age_bracket: AgeBracket,
    #[serde(alias = "wanted_gender", rename = "wantedGender")]
    pub wanted_gender: Wanted<Gender>,
    #[serde(alias = "wanted_age_bracket", rename = "wantedAgeBracket")]
    pub wanted_age_bracket: Wanted<AgeBracket>,
}

impl From<MatchRequest> for PreferenceProfile {
    fn from(req: MatchRequest) -> Self {
        PreferenceProfile::new(
            RequesterId::from(req.requester_id),
            req.gender,
            req.age_bracket,
            req.wanted_gender,
            req.wanted_age_bracket,
        )
    }
}

/// Request naming only the acting requester (cancel, end, reset)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RequesterRequest {
    #[validate(length(min = 1, max = 128))]
    #[serde(alias = "requester_id", rename = "requesterId")]
    pub requester_id: String,
}

/// Request to forward a payload to the sender's partner
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RelayRequest {
    #[validate(length(min = 1, max = 128))]
    #[serde(alias = "requester_id", rename = "requesterId")]
    pub requester_id: String,
    pub payload: Payload,
}

/// Query string for state lookups
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StateQuery {
    #[validate(length(min = 1, max = 128))]
    #[serde(alias = "requester_id", rename = "requesterId")]
    pub requester_id: String,
}
