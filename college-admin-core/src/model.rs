//! College records as exchanged with the remote API
//!
//! Field names on the wire follow the API (`_id`, `googleMapsLink`,
//! `mapEmbedUrl`); missing optional sections deserialize to their defaults
//! since the public list endpoint may omit them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::form::ValidationError;

/// An institution record managed by the admin panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct College {
    /// Server-assigned identity; absent on a record built from the form
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub district: String,
    pub address: String,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub contact: Contact,
    #[serde(default)]
    pub programs: Vec<Program>,
    #[serde(default)]
    pub facilities: Vec<String>,
}

impl College {
    /// Id as a borrowed str, empty when the record was never saved
    pub fn id_str(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(rename = "googleMapsLink", default)]
    pub map_link: String,
    #[serde(rename = "mapEmbedUrl", default)]
    pub embed_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub website: String,
}

impl Contact {
    pub fn is_empty(&self) -> bool {
        self.phone.is_empty() && self.email.is_empty() && self.website.is_empty()
    }
}

/// A named offering within a college
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub name: String,
    #[serde(default)]
    pub cutoff: u32,
    #[serde(default)]
    pub eligibility: String,
    #[serde(default)]
    pub medium: Medium,
}

impl Program {
    pub const MAX_CUTOFF: u32 = 100;
}

/// Language of instruction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Medium {
    #[default]
    English,
    Kannada,
    Both,
}

impl Medium {
    pub const ALL: [Medium; 3] = [Medium::English, Medium::Kannada, Medium::Both];

    pub fn as_str(&self) -> &'static str {
        match self {
            Medium::English => "English",
            Medium::Kannada => "Kannada",
            Medium::Both => "Both",
        }
    }
}

impl fmt::Display for Medium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Medium {
    type Err = ValidationError;

    /// Empty input selects the default medium
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Medium::default());
        }
        Medium::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ValidationError::InvalidVariant {
                field: "medium",
                value: trimmed.to_string(),
            })
    }
}
