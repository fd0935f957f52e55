use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEMO_EMAIL: &str = "employer@guhuza.com";
pub const DEMO_NAME: &str = "Demo Employer";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub email: String,
    pub name: String,
    /// Absent on the seeded demo account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(email: &str, name: Option<&str>, now: DateTime<Utc>) -> Self {
        Self {
            email: email.to_string(),
            name: name.map_or_else(|| local_part(email).to_string(), str::to_string),
            created_at: Some(now),
        }
    }

    pub fn demo() -> Self {
        Self {
            email: DEMO_EMAIL.to_string(),
            name: DEMO_NAME.to_string(),
            created_at: None,
        }
    }
}

/// The part of an address before the first `@`.
pub fn local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}
