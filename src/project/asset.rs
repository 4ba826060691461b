//! References to uploaded or generated media. Ingestion happens elsewhere;
//! the timeline only needs an id, a playable URL and, if known, a length.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::clip::MediaKind;
use crate::core::time::Time;

/// Opaque asset identifier issued by the asset service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AssetId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for AssetId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub name: String,
    pub kind: MediaKind,
    pub url: String,
    /// Source length in nanoseconds. Stills have none.
    #[serde(default)]
    pub duration: Option<Time>,
}

impl Asset {
    pub fn new(
        id: impl Into<AssetId>,
        name: impl Into<String>,
        kind: MediaKind,
        url: impl Into<String>,
        duration: Option<Time>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            url: url.into(),
            duration,
        }
    }
}
