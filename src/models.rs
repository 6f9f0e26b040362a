use chrono::DateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Model,
}

impl Message {
    pub const fn new(role: MessageRole, content: String) -> Self {
        Self { role, content }
    }

    pub const fn user(content: String) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub const fn model(content: String) -> Self {
        Self::new(MessageRole::Model, content)
    }
}

/// A generated person as returned by the profile API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    pub name: PersonName,
    pub email: String,
    pub phone: String,
    pub cell: String,
    pub picture: Picture,
    pub dob: DateOfBirth,
    pub location: Location,
    pub gender: String,
    pub nat: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersonName {
    pub title: String,
    pub first: String,
    pub last: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Picture {
    pub large: String,
    pub medium: String,
    pub thumbnail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateOfBirth {
    pub date: String,
    pub age: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    pub city: String,
    pub country: String,
    pub street: Street,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Street {
    pub number: u32,
    pub name: String,
}

impl Profile {
    pub fn full_name(&self) -> String {
        format!("{} {} {}", self.name.title, self.name.first, self.name.last)
    }

    pub fn full_address(&self) -> String {
        format!(
            "{} {}, {}, {}",
            self.location.street.number,
            self.location.street.name,
            self.location.city,
            self.location.country
        )
    }

    /// Birth date as "20 July 1993", or the raw value if it is not RFC 3339.
    pub fn birth_date(&self) -> String {
        DateTime::parse_from_rfc3339(&self.dob.date).map_or_else(
            |_| self.dob.date.clone(),
            |date| date.format("%-d %B %Y").to_string(),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub gemini_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini_api_key: Option<String>,
    pub profile_url: String,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

const fn default_debounce_ms() -> u64 {
    1000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gemini_url: "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent".to_string(),
            gemini_api_key: None,
            profile_url: "https://randomuser.me/api/".to_string(),
            debounce_ms: default_debounce_ms(),
            request_timeout_secs: None,
        }
    }
}
