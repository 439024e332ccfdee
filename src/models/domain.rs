use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a declared attribute is outside the known vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} value: {value:?}")]
pub struct ParseAttributeError {
    pub kind: &'static str,
    pub value: String,
}

/// Stable opaque identifier of a requester, resolved by the front-end
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequesterId(String);

impl RequesterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequesterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RequesterId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RequesterId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ParseAttributeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            other => Err(ParseAttributeError {
                kind: "gender",
                value: other.to_string(),
            }),
        }
    }
}

/// Age brackets offered by the front-end menus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeBracket {
    #[serde(rename = "18_25")]
    Age18To25,
    #[serde(rename = "26_35")]
    Age26To35,
    #[serde(rename = "36_45")]
    Age36To45,
    #[serde(rename = "45_plus")]
    Age45Plus,
}

impl AgeBracket {
    pub const ALL: [AgeBracket; 4] = [
        AgeBracket::Age18To25,
        AgeBracket::Age26To35,
        AgeBracket::Age36To45,
        AgeBracket::Age45Plus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeBracket::Age18To25 => "18_25",
            AgeBracket::Age26To35 => "26_35",
            AgeBracket::Age36To45 => "36_45",
            AgeBracket::Age45Plus => "45_plus",
        }
    }
}

impl fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgeBracket {
    type Err = ParseAttributeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgeBracket::ALL
            .into_iter()
            .find(|bracket| bracket.as_str() == s)
            .ok_or_else(|| ParseAttributeError {
                kind: "age bracket",
                value: s.to_string(),
            })
    }
}

/// A partner criterion: either a concrete value or the `any` wildcard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wanted<T> {
    Any,
    Exactly(T),
}

impl<T: PartialEq> Wanted<T> {
    /// Whether a counterpart offering `value` satisfies this criterion
    #[inline]
    pub fn accepts(&self, value: &T) -> bool {
        match self {
            Wanted::Any => true,
            Wanted::Exactly(wanted) => wanted == value,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Wanted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Wanted::Any => f.write_str("any"),
            Wanted::Exactly(value) => value.fmt(f),
        }
    }
}

impl<T: FromStr<Err = ParseAttributeError>> FromStr for Wanted<T> {
    type Err = ParseAttributeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "any" {
            Ok(Wanted::Any)
        } else {
            s.parse().map(Wanted::Exactly)
        }
    }
}

impl<T: fmt::Display> Serialize for Wanted<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, T: FromStr<Err = ParseAttributeError>> Deserialize<'de> for Wanted<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// What one requester offers and seeks for a single matchmaking attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceProfile {
    #[serde(rename = "requesterId")]
    pub requester_id: RequesterId,
    pub gender: Gender,
    #[serde(rename = "ageBracket")]
    pub age_bracket: AgeBracket,
    #[serde(rename = "wantedGender")]
    pub wanted_gender: Wanted<Gender>,
    #[serde(rename = "wantedAgeBracket")]
    pub wanted_age_bracket: Wanted<AgeBracket>,
    /// Logical insertion order, assigned by the waiting pool
    #[serde(rename = "enqueuedAt", default)]
    pub enqueued_at: u64,
}

impl PreferenceProfile {
    pub fn new(
        requester_id: impl Into<RequesterId>,
        gender: Gender,
        age_bracket: AgeBracket,
        wanted_gender: Wanted<Gender>,
        wanted_age_bracket: Wanted<AgeBracket>,
    ) -> Self {
        Self {
            requester_id: requester_id.into(),
            gender,
            age_bracket,
            wanted_gender,
            wanted_age_bracket,
            enqueued_at: 0,
        }
    }
}

/// Two requesters linked for relay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectedPair {
    pub first: RequesterId,
    pub second: RequesterId,
    #[serde(rename = "matchedAt")]
    pub matched_at: chrono::DateTime<chrono::Utc>,
}

/// Per-identity session state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Waiting,
    Connected { partner: RequesterId },
}

/// Opaque relay payload; never inspected or transformed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(pub serde_json::Value);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MatchOutcome {
    Matched {
        requester: RequesterId,
        partner: RequesterId,
    },
    Waiting,
    AlreadyWaiting,
    AlreadyPaired { partner: RequesterId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CancelOutcome {
    Cancelled,
    WasNotWaiting,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EndOutcome {
    Ended { partner: RequesterId },
    WasNotConnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RelayOutcome {
    Delivered,
    NotConnected,
}

/// Prior state cleared by a reset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ResetOutcome {
    WasIdle,
    CancelledWaiting,
    EndedSession { partner: RequesterId },
}
