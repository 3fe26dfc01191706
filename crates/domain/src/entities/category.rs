//! Category entity - Groups transactions for the finance views
//!
//! A category either belongs to one user or, when it has no owner, is a
//! shared default visible to everyone.

use chrono::{DateTime, Utc};

use crate::types::TransactionType;
use crate::value_objects::{CategoryName, HexColor};
use crate::{CategoryId, UserId};

/// Maximum length of a category icon token (emoji or icon name)
const MAX_ICON_LENGTH: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    /// `None` for shared defaults
    pub user_id: Option<UserId>,
    pub name: CategoryName,
    pub category_type: TransactionType,
    pub icon: Option<String>,
    pub color: Option<HexColor>,
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// A category owned by `user_id`.
    pub fn new(
        user_id: UserId,
        name: CategoryName,
        category_type: TransactionType,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: CategoryId::new(),
            user_id: Some(user_id),
            name,
            category_type,
            icon: None,
            color: None,
            created_at: now,
        }
    }

    /// A shared default category with no owner.
    pub fn shared(name: CategoryName, category_type: TransactionType, now: DateTime<Utc>) -> Self {
        Self {
            id: CategoryId::new(),
            user_id: None,
            name,
            category_type,
            icon: None,
            color: None,
            created_at: now,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        let icon: String = icon.into().trim().chars().take(MAX_ICON_LENGTH).collect();
        self.icon = (!icon.is_empty()).then_some(icon);
        self
    }

    pub fn with_color(mut self, color: HexColor) -> Self {
        self.color = Some(color);
        self
    }

    pub fn is_default(&self) -> bool {
        self.user_id.is_none()
    }

    /// Defaults are visible to everyone, owned categories only to their owner.
    pub fn visible_to(&self, user_id: UserId) -> bool {
        self.user_id.map_or(true, |owner| owner == user_id)
    }
}

/// Categories seeded at startup so a fresh account can record transactions
/// right away.
pub mod default_categories {
    use crate::types::TransactionType;

    pub struct DefaultCategoryDef {
        pub name: &'static str,
        pub category_type: TransactionType,
        pub icon: &'static str,
        pub color: &'static str,
    }

    pub const DEFAULT_CATEGORIES: &[DefaultCategoryDef] = &[
        DefaultCategoryDef {
            name: "Salary",
            category_type: TransactionType::Income,
            icon: "briefcase",
            color: "#22c55e",
        },
        DefaultCategoryDef {
            name: "Freelance",
            category_type: TransactionType::Income,
            icon: "laptop",
            color: "#10b981",
        },
        DefaultCategoryDef {
            name: "Food",
            category_type: TransactionType::Expense,
            icon: "utensils",
            color: "#f97316",
        },
        DefaultCategoryDef {
            name: "Housing",
            category_type: TransactionType::Expense,
            icon: "home",
            color: "#6366f1",
        },
        DefaultCategoryDef {
            name: "Transport",
            category_type: TransactionType::Expense,
            icon: "car",
            color: "#0ea5e9",
        },
        DefaultCategoryDef {
            name: "Health",
            category_type: TransactionType::Expense,
            icon: "heart",
            color: "#ef4444",
        },
        DefaultCategoryDef {
            name: "Leisure",
            category_type: TransactionType::Expense,
            icon: "gamepad",
            color: "#a855f7",
        },
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::HexColor;

    #[test]
    fn defaults_are_visible_to_everyone() {
        let now = Utc::now();
        let shared = Category::shared(
            CategoryName::new("Food").unwrap(),
            TransactionType::Expense,
            now,
        );
        assert!(shared.is_default());
        assert!(shared.visible_to(UserId::new()));
    }

    #[test]
    fn owned_categories_are_private() {
        let owner = UserId::new();
        let category = Category::new(
            owner,
            CategoryName::new("Books").unwrap(),
            TransactionType::Expense,
            Utc::now(),
        );
        assert!(!category.is_default());
        assert!(category.visible_to(owner));
        assert!(!category.visible_to(UserId::new()));
    }

    #[test]
    fn seeded_defaults_are_valid() {
        for def in default_categories::DEFAULT_CATEGORIES {
            assert!(CategoryName::new(def.name).is_ok());
            assert!(HexColor::new(def.color).is_ok());
        }
    }

    #[test]
    fn blank_icon_is_dropped() {
        let category = Category::shared(
            CategoryName::new("Salary").unwrap(),
            TransactionType::Income,
            Utc::now(),
        )
        .with_icon("   ");
        assert!(category.icon.is_none());
    }
}
