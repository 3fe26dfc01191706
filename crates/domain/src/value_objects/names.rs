//! Validated name newtypes for domain entities
//!
//! These newtypes ensure that names are valid by construction:
//! - Non-empty (except Description)
//! - Within length limits
//! - Trimmed of leading/trailing whitespace

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Maximum length for player display names
const MAX_PLAYER_NAME_LENGTH: usize = 100;

/// Maximum length for quest titles
const MAX_QUEST_TITLE_LENGTH: usize = 255;

/// Maximum length for category names
const MAX_CATEGORY_NAME_LENGTH: usize = 100;

/// Maximum length for free-text descriptions
const MAX_DESCRIPTION_LENGTH: usize = 5000;

fn trimmed_within(
    value: String,
    label: &str,
    max: usize,
    allow_empty: bool,
) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if !allow_empty && trimmed.is_empty() {
        return Err(DomainError::validation(format!("{label} cannot be empty")));
    }
    if trimmed.chars().count() > max {
        return Err(DomainError::validation(format!(
            "{label} cannot exceed {max} characters"
        )));
    }
    Ok(trimmed.to_string())
}

// ============================================================================
// PlayerName
// ============================================================================

/// A validated player display name (non-empty, <=100 chars, trimmed)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerName(String);

impl PlayerName {
    /// Create a new validated player name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the name is empty or longer than
    /// 100 characters after trimming.
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        trimmed_within(name.into(), "Player name", MAX_PLAYER_NAME_LENGTH, false).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for PlayerName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<PlayerName> for String {
    fn from(name: PlayerName) -> String {
        name.0
    }
}

// ============================================================================
// QuestTitle
// ============================================================================

/// A validated quest title (non-empty, <=255 chars, trimmed)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QuestTitle(String);

impl QuestTitle {
    /// Create a new validated quest title.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the title is empty or longer than
    /// 255 characters after trimming.
    pub fn new(title: impl Into<String>) -> Result<Self, DomainError> {
        trimmed_within(title.into(), "Quest title", MAX_QUEST_TITLE_LENGTH, false).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for QuestTitle {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<QuestTitle> for String {
    fn from(title: QuestTitle) -> String {
        title.0
    }
}

// ============================================================================
// CategoryName
// ============================================================================

/// A validated finance category name (non-empty, <=100 chars, trimmed)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryName(String);

impl CategoryName {
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        trimmed_within(name.into(), "Category name", MAX_CATEGORY_NAME_LENGTH, false).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for CategoryName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<CategoryName> for String {
    fn from(name: CategoryName) -> String {
        name.0
    }
}

// ============================================================================
// Description
// ============================================================================

/// A validated description (may be empty, <=5000 chars, trimmed)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Description(String);

impl Description {
    pub fn new(text: impl Into<String>) -> Result<Self, DomainError> {
        trimmed_within(text.into(), "Description", MAX_DESCRIPTION_LENGTH, true).map(Self)
    }

    /// Builds an optional description, treating blank input as absent.
    pub fn optional(text: Option<String>) -> Result<Option<Self>, DomainError> {
        match text {
            Some(text) => {
                let desc = Self::new(text)?;
                Ok((!desc.is_empty()).then_some(desc))
            }
            None => Ok(None),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Description {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Description> for String {
    fn from(desc: Description) -> String {
        desc.0
    }
}
