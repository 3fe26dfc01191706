//! Quest aggregate - a user-defined task that pays out XP when completed
//!
//! # Rustic DDD Design
//!
//! - **Private fields**: status can only change through the transition methods
//! - **Newtypes**: `QuestTitle` / `Description` are validated on construction
//! - **Valid by construction**: `from_state` re-checks invariants for stored rows

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::types::{Attribute, QuestDifficulty, QuestStatus};
use crate::value_objects::{Description, QuestTitle};
use crate::{QuestId, UserId};

/// Largest XP reward a single quest may carry.
pub const MAX_XP_REWARD: u32 = 10_000;

/// A quest owned by one user.
///
/// # Invariants
///
/// - `completed_at.is_some()` iff `status == Completed`
/// - `xp_reward <= MAX_XP_REWARD`
/// - only `Active` quests change status
#[derive(Debug, Clone, PartialEq)]
pub struct Quest {
    id: QuestId,
    user_id: UserId,
    title: QuestTitle,
    description: Option<Description>,
    difficulty: QuestDifficulty,
    attribute: Attribute,
    xp_reward: u32,
    status: QuestStatus,
    due_date: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Input for creating a quest.
#[derive(Debug, Clone)]
pub struct NewQuest {
    pub title: QuestTitle,
    pub description: Option<Description>,
    pub difficulty: QuestDifficulty,
    pub attribute: Attribute,
    /// Falls back to the difficulty's default when absent.
    pub xp_reward: Option<u32>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Raw column values used to rebuild a `Quest` from storage.
#[derive(Debug, Clone)]
pub struct QuestState {
    pub id: QuestId,
    pub user_id: UserId,
    pub title: QuestTitle,
    pub description: Option<Description>,
    pub difficulty: QuestDifficulty,
    pub attribute: Attribute,
    pub xp_reward: u32,
    pub status: QuestStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn check_reward(xp_reward: u32) -> Result<u32, DomainError> {
    if xp_reward > MAX_XP_REWARD {
        return Err(DomainError::validation(format!(
            "XP reward cannot exceed {MAX_XP_REWARD}"
        )));
    }
    Ok(xp_reward)
}

impl Quest {
    pub fn create(user_id: UserId, input: NewQuest, now: DateTime<Utc>) -> Result<Self, DomainError> {
        let xp_reward = check_reward(
            input
                .xp_reward
                .unwrap_or_else(|| input.difficulty.default_xp_reward()),
        )?;

        Ok(Self {
            id: QuestId::new(),
            user_id,
            title: input.title,
            description: input.description,
            difficulty: input.difficulty,
            attribute: input.attribute,
            xp_reward,
            status: QuestStatus::Active,
            due_date: input.due_date,
            completed_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuilds a quest from stored values, rejecting rows that break invariants.
    pub fn from_state(state: QuestState) -> Result<Self, DomainError> {
        let completed = state.status == QuestStatus::Completed;
        if completed != state.completed_at.is_some() {
            return Err(DomainError::constraint(format!(
                "Quest {} has status {} but completed_at is {}",
                state.id,
                state.status,
                if state.completed_at.is_some() { "set" } else { "unset" }
            )));
        }

        Ok(Self {
            id: state.id,
            user_id: state.user_id,
            title: state.title,
            description: state.description,
            difficulty: state.difficulty,
            attribute: state.attribute,
            xp_reward: check_reward(state.xp_reward)?,
            status: state.status,
            due_date: state.due_date,
            completed_at: state.completed_at,
            created_at: state.created_at,
            updated_at: state.updated_at,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> QuestId {
        self.id
    }

    #[inline]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[inline]
    pub fn title(&self) -> &QuestTitle {
        &self.title
    }

    #[inline]
    pub fn description(&self) -> Option<&Description> {
        self.description.as_ref()
    }

    #[inline]
    pub fn difficulty(&self) -> QuestDifficulty {
        self.difficulty
    }

    #[inline]
    pub fn attribute(&self) -> Attribute {
        self.attribute
    }

    #[inline]
    pub fn xp_reward(&self) -> u32 {
        self.xp_reward
    }

    #[inline]
    pub fn status(&self) -> QuestStatus {
        self.status
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == QuestStatus::Active
    }

    #[inline]
    pub fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    #[inline]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[inline]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }

    /// Active and past its due date.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.is_active() && self.due_date.is_some_and(|due| due < now)
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    pub fn complete(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.transition(QuestStatus::Completed, now)?;
        self.completed_at = Some(now);
        Ok(())
    }

    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.transition(QuestStatus::Cancelled, now)
    }

    pub fn fail(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.transition(QuestStatus::Failed, now)
    }

    fn transition(&mut self, to: QuestStatus, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.status != QuestStatus::Active {
            return Err(DomainError::invalid_state_transition(format!(
                "quest {} is {}, cannot become {}",
                self.id, self.status, to
            )));
        }
        self.status = to;
        self.updated_at = now;
        Ok(())
    }
}
