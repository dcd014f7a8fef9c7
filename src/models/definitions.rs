//! Validated value types shared by the models.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model_id::ModelId;

static FISCAL_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Z]{6}[0-9LMNPQRSTUV]{2}[ABCDEHLMPRST][0-9LMNPQRSTUV]{2}[A-Z][0-9LMNPQRSTUV]{3}[A-Z]$",
    )
    .expect("fiscal code pattern is valid")
});

static EMAIL_ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Declares a validated string newtype with serde, `Display` and `AsRef<str>` support.
macro_rules! validated_string {
    ($(#[$doc:meta])* $name:ident, $what:literal, $valid:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Returns `None` unless `value` is valid.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let value = value.into();
                let valid: fn(&str) -> bool = $valid;
                valid(&value).then_some(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                $name::new(value.clone())
                    .ok_or_else(|| format!("{:?} is not a valid {}", value, $what))
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

validated_string!(
    /// Italian fiscal code of a citizen.
    FiscalCode,
    "fiscal code",
    |s| FISCAL_CODE.is_match(s)
);

validated_string!(
    /// An email address in `local@domain.tld` form.
    EmailAddress,
    "email address",
    |s| EMAIL_ADDRESS.is_match(s)
);

validated_string!(NonEmptyString, "non-empty string", |s| !s.is_empty());

impl From<&FiscalCode> for ModelId {
    fn from(code: &FiscalCode) -> Self {
        fiscal_code_to_model_id(code)
    }
}

impl From<&NonEmptyString> for ModelId {
    fn from(value: &NonEmptyString) -> Self {
        ModelId::new(value.as_str()).unwrap_or_else(|| unreachable!("value is non-empty"))
    }
}

/// The model id of a citizen's documents is their fiscal code.
pub fn fiscal_code_to_model_id(code: &FiscalCode) -> ModelId {
    ModelId::new(code.as_str()).unwrap_or_else(|| unreachable!("fiscal codes are non-empty"))
}
