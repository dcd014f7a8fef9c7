//! ModelId - the natural key shared by every version of a logical entity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a logical entity across all of its versions.
///
/// Always non-empty. Build one with [`ModelId::new`] or [`to_model_id`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModelId(String);

/// Returns true iff `value` can be used as a [`ModelId`].
pub fn is_model_id(value: &str) -> bool {
    !value.is_empty()
}

/// Converts an optional raw value into a [`ModelId`].
///
/// Returns `None` when the value is absent or not a valid model id.
pub fn to_model_id(value: Option<&str>) -> Option<ModelId> {
    value.and_then(|v| ModelId::new(v))
}

impl ModelId {
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        is_model_id(&value).then_some(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ModelId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ModelId::new(value).ok_or_else(|| "model id must not be empty".to_string())
    }
}

impl From<ModelId> for String {
    fn from(id: ModelId) -> Self {
        id.0
    }
}

impl AsRef<str> for ModelId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
