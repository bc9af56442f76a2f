//! Wire types for the activities API

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// One activity as returned by `GET /activities`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityDetails {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub schedule: String,
    #[serde(default)]
    pub max_participants: i64,
    #[serde(default, deserialize_with = "participants_or_empty")]
    pub participants: Vec<String>,
}

impl ActivityDetails {
    /// Capacity minus current participants; negative when over-subscribed
    pub fn spots_left(&self) -> i64 {
        self.max_participants - self.participants.len() as i64
    }
}

/// Anything other than an array of strings is read as no participants
fn participants_or_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            serde_json::Value::String(email) => Some(email),
            _ => None,
        })
        .collect())
}

/// The activity collection, in the order the server sent it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityCatalog {
    pub activities: Vec<(String, ActivityDetails)>,
}

impl ActivityCatalog {
    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ActivityDetails> {
        self.activities
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, details)| details)
    }
}

impl<'de> Deserialize<'de> for ActivityCatalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CatalogVisitor;

        impl<'de> Visitor<'de> for CatalogVisitor {
            type Value = ActivityCatalog;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of activity name to activity details")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut activities = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, details)) = map.next_entry::<String, ActivityDetails>()? {
                    activities.push((name, details));
                }
                Ok(ActivityCatalog { activities })
            }
        }

        deserializer.deserialize_map(CatalogVisitor)
    }
}

/// Body of a successful signup
#[derive(Debug, Clone, Deserialize)]
pub struct SignupResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of a rejected request. `detail` is only kept when it is a plain string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    detail: serde_json::Value,
}

impl ErrorResponse {
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_str().filter(|d| !d.is_empty())
    }
}
