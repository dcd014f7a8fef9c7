//! Versions and the composite physical id scheme.
//!
//! Every version of a model is stored under its own physical id
//! `"<model id>-<version zero-padded to 16 digits>"`. The fixed width keeps
//! the string order of ids equal to the numeric order of versions, and makes
//! the scheme injective: the last 17 characters are always the separator
//! followed by the padded version, so the model id is recovered exactly even
//! when it contains the separator itself.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model_id::ModelId;

/// Number of digits of the padded version in a physical id.
pub const VERSION_PADDING: usize = 16;

const SEPARATOR: char = '-';

/// Non-negative version number of a model, bounded so that it always fits
/// in [`VERSION_PADDING`] digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Version(u64);

impl Version {
    /// Version of a freshly created model.
    pub const INITIAL: Version = Version(0);

    /// Largest version whose padded form still has 16 digits.
    pub const MAX: Version = Version(9_999_999_999_999_999);

    pub fn new(value: u64) -> Option<Self> {
        (value <= Self::MAX.0).then_some(Self(value))
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// The version following this one, or `None` past [`Version::MAX`].
    pub fn next(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }
}

impl TryFrom<u64> for Version {
    type Error = String;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Version::new(value).ok_or_else(|| format!("version {} exceeds {}", value, Self::MAX))
    }
}

impl From<Version> for u64 {
    fn from(version: Version) -> Self {
        version.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Builds the physical id of `version` of the model identified by `model_id`.
pub fn generate_versioned_model_id(model_id: &ModelId, version: Version) -> String {
    format!(
        "{}{}{:0width$}",
        model_id,
        SEPARATOR,
        version.0,
        width = VERSION_PADDING
    )
}

/// Splits a physical id back into its model id and version.
pub fn parse_versioned_model_id(id: &str) -> Option<(ModelId, Version)> {
    let split = id.len().checked_sub(VERSION_PADDING + 1)?;
    if !id.is_char_boundary(split) {
        return None;
    }
    let (model_id, suffix) = id.split_at(split);
    let digits = suffix.strip_prefix(SEPARATOR)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let version = Version::new(digits.parse().ok()?)?;
    Some((ModelId::new(model_id)?, version))
}
