//! Domain Events
//!
//! Coarse-grained events representing significant state changes in the
//! domain. Use cases collect them from aggregate mutations and log them;
//! the HTTP layer reflects them in the response.

use serde::{Deserialize, Serialize};

use crate::aggregates::RewardOutcome;
use crate::types::Attribute;
use crate::{QuestId, UserId};

/// Domain event for significant state changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum DomainEvent {
    QuestCompleted {
        user_id: UserId,
        quest_id: QuestId,
        attribute: Attribute,
        xp_gained: u64,
    },
    LevelUp {
        user_id: UserId,
        old_level: u32,
        new_level: u32,
    },
    AttributeLevelUp {
        user_id: UserId,
        attribute: Attribute,
        old_level: u32,
        new_level: u32,
    },
    QuestsExpired {
        user_id: UserId,
        quest_ids: Vec<QuestId>,
    },
}

impl DomainEvent {
    /// Events raised by one quest completion: the completion itself, then at
    /// most one overall and one attribute level-up.
    pub fn from_reward(user_id: UserId, quest_id: QuestId, outcome: &RewardOutcome) -> Vec<Self> {
        let mut events = vec![DomainEvent::QuestCompleted {
            user_id,
            quest_id,
            attribute: outcome.attribute,
            xp_gained: outcome.xp_gained,
        }];
        if outcome.level.is_level_up() {
            events.push(DomainEvent::LevelUp {
                user_id,
                old_level: outcome.level.old_level,
                new_level: outcome.level.new_level,
            });
        }
        if outcome.attribute_level.is_level_up() {
            events.push(DomainEvent::AttributeLevelUp {
                user_id,
                attribute: outcome.attribute,
                old_level: outcome.attribute_level.old_level,
                new_level: outcome.attribute_level.new_level,
            });
        }
        events
    }

    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::QuestCompleted { .. } => "quest_completed",
            DomainEvent::LevelUp { .. } => "level_up",
            DomainEvent::AttributeLevelUp { .. } => "attribute_level_up",
            DomainEvent::QuestsExpired { .. } => "quests_expired",
        }
    }
}
