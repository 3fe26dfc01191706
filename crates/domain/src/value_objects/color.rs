//! `#RRGGBB` color tags for categories.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let trimmed = value.trim();
        let valid = trimmed.len() == 7
            && trimmed.starts_with('#')
            && trimmed[1..].chars().all(|c| c.is_ascii_hexdigit());
        if !valid {
            return Err(DomainError::validation(format!(
                "Color must look like #RRGGBB, got {trimmed:?}"
            )));
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for HexColor {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> String {
        color.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_and_lowercases_hex() {
        assert_eq!(HexColor::new("#22C55E").unwrap().as_str(), "#22c55e");
    }

    #[test]
    fn rejects_other_shapes() {
        for bad in ["22c55e", "#22c55", "#22c55eff", "#zzzzzz"] {
            assert!(HexColor::new(bad).is_err(), "{bad}");
        }
    }
}
