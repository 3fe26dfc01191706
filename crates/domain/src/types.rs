//! Shared vocabulary enums.
//!
//! These are the wire spelling too (`snake_case`), so the shared crate reuses
//! them directly instead of mirroring them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

macro_rules! vocabulary_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    other => Err(DomainError::parse(format!(
                        "Unknown {}: {}",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }
    };
}

vocabulary_enum! {
    /// How hard a quest is; drives the default XP reward.
    QuestDifficulty {
        Easy => "easy",
        Medium => "medium",
        Hard => "hard",
        Epic => "epic",
    }
}

impl QuestDifficulty {
    /// XP granted when a quest is created without an explicit reward.
    pub fn default_xp_reward(&self) -> u32 {
        match self {
            QuestDifficulty::Easy => 10,
            QuestDifficulty::Medium => 30,
            QuestDifficulty::Hard => 50,
            QuestDifficulty::Epic => 100,
        }
    }
}

impl Default for QuestDifficulty {
    fn default() -> Self {
        QuestDifficulty::Medium
    }
}

vocabulary_enum! {
    /// Quest lifecycle. Only `Active` can transition; the rest are terminal.
    QuestStatus {
        Active => "active",
        Completed => "completed",
        Failed => "failed",
        Cancelled => "cancelled",
    }
}

impl QuestStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, QuestStatus::Active)
    }
}

vocabulary_enum! {
    /// The stat a quest trains.
    Attribute {
        Strength => "strength",
        Intelligence => "intelligence",
        Charisma => "charisma",
        Vitality => "vitality",
        Wisdom => "wisdom",
        Agility => "agility",
    }
}

vocabulary_enum! {
    TransactionType {
        Income => "income",
        Expense => "expense",
    }
}

vocabulary_enum! {
    UserRole {
        User => "user",
        Admin => "admin",
    }
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::User
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Epic".parse::<QuestDifficulty>().unwrap(), QuestDifficulty::Epic);
        assert_eq!(" wisdom ".parse::<Attribute>().unwrap(), Attribute::Wisdom);
    }

    #[test]
    fn unknown_values_are_parse_errors() {
        let err = "focus".parse::<Attribute>().unwrap_err();
        assert!(matches!(err, DomainError::Parse(_)));
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&QuestStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
        let parsed: TransactionType = serde_json::from_str("\"expense\"").unwrap();
        assert_eq!(parsed, TransactionType::Expense);
    }

    #[test]
    fn default_rewards_grow_with_difficulty() {
        let rewards: Vec<u32> = QuestDifficulty::ALL
            .iter()
            .map(QuestDifficulty::default_xp_reward)
            .collect();
        assert_eq!(rewards, vec![10, 30, 50, 100]);
    }

    #[test]
    fn six_attributes() {
        assert_eq!(Attribute::ALL.len(), 6);
    }
}
