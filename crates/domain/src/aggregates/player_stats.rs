//! PlayerStats aggregate - the gamification state of one user
//!
//! Levels are never stored on their own. Every level shown to a caller is
//! derived from the XP it belongs to through [`crate::leveling`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::leveling::{level_for_xp, LevelChange, LevelProgress};
use crate::types::Attribute;
use crate::UserId;

/// XP accumulated per attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeXp {
    pub strength: u64,
    pub intelligence: u64,
    pub charisma: u64,
    pub vitality: u64,
    pub wisdom: u64,
    pub agility: u64,
}

impl AttributeXp {
    pub fn get(&self, attribute: Attribute) -> u64 {
        match attribute {
            Attribute::Strength => self.strength,
            Attribute::Intelligence => self.intelligence,
            Attribute::Charisma => self.charisma,
            Attribute::Vitality => self.vitality,
            Attribute::Wisdom => self.wisdom,
            Attribute::Agility => self.agility,
        }
    }

    fn get_mut(&mut self, attribute: Attribute) -> &mut u64 {
        match attribute {
            Attribute::Strength => &mut self.strength,
            Attribute::Intelligence => &mut self.intelligence,
            Attribute::Charisma => &mut self.charisma,
            Attribute::Vitality => &mut self.vitality,
            Attribute::Wisdom => &mut self.wisdom,
            Attribute::Agility => &mut self.agility,
        }
    }
}

/// Result of crediting one completed quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardOutcome {
    pub xp_gained: u64,
    pub attribute: Attribute,
    pub level: LevelChange,
    pub attribute_level: LevelChange,
}

/// Per-user level, XP tracks and activity counters.
///
/// # Invariants
///
/// - `total_xp` only grows, through [`PlayerStats::apply_quest_reward`]
/// - `revision` is the value last read from storage; writers compare against it
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStats {
    user_id: UserId,
    total_xp: u64,
    attribute_xp: AttributeXp,
    quests_completed: u64,
    streak_days: u32,
    last_activity: Option<DateTime<Utc>>,
    revision: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Raw column values used to rebuild `PlayerStats` from storage.
#[derive(Debug, Clone)]
pub struct PlayerStatsState {
    pub user_id: UserId,
    pub total_xp: u64,
    pub attribute_xp: AttributeXp,
    pub quests_completed: u64,
    pub streak_days: u32,
    pub last_activity: Option<DateTime<Utc>>,
    pub revision: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlayerStats {
    /// Fresh stats for a newly registered user: level 1, no XP.
    pub fn new_for_user(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            total_xp: 0,
            attribute_xp: AttributeXp::default(),
            quests_completed: 0,
            streak_days: 0,
            last_activity: None,
            revision: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn from_state(state: PlayerStatsState) -> Self {
        Self {
            user_id: state.user_id,
            total_xp: state.total_xp,
            attribute_xp: state.attribute_xp,
            quests_completed: state.quests_completed,
            streak_days: state.streak_days,
            last_activity: state.last_activity,
            revision: state.revision,
            created_at: state.created_at,
            updated_at: state.updated_at,
        }
    }

    #[inline]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[inline]
    pub fn total_xp(&self) -> u64 {
        self.total_xp
    }

    #[inline]
    pub fn level(&self) -> u32 {
        level_for_xp(self.total_xp)
    }

    pub fn progress(&self) -> LevelProgress {
        LevelProgress::for_xp(self.total_xp)
    }

    #[inline]
    pub fn attribute_xp(&self) -> &AttributeXp {
        &self.attribute_xp
    }

    pub fn attribute_level(&self, attribute: Attribute) -> u32 {
        level_for_xp(self.attribute_xp.get(attribute))
    }

    pub fn attribute_progress(&self, attribute: Attribute) -> LevelProgress {
        LevelProgress::for_xp(self.attribute_xp.get(attribute))
    }

    #[inline]
    pub fn quests_completed(&self) -> u64 {
        self.quests_completed
    }

    #[inline]
    pub fn streak_days(&self) -> u32 {
        self.streak_days
    }

    #[inline]
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.last_activity
    }

    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[inline]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Credits a completed quest worth `xp` to `attribute` and to the total.
    ///
    /// Nothing is modified when either sum would overflow.
    pub fn apply_quest_reward(
        &mut self,
        attribute: Attribute,
        xp: u32,
        now: DateTime<Utc>,
    ) -> Result<RewardOutcome, DomainError> {
        let xp = u64::from(xp);
        let old_total = self.total_xp;
        let old_attribute = self.attribute_xp.get(attribute);

        let new_total = old_total
            .checked_add(xp)
            .ok_or_else(|| DomainError::overflow("total XP"))?;
        let new_attribute = old_attribute
            .checked_add(xp)
            .ok_or_else(|| DomainError::overflow(format!("{attribute} XP")))?;
        let quests_completed = self
            .quests_completed
            .checked_add(1)
            .ok_or_else(|| DomainError::overflow("quests completed"))?;

        self.total_xp = new_total;
        *self.attribute_xp.get_mut(attribute) = new_attribute;
        self.quests_completed = quests_completed;
        self.record_activity(now);

        Ok(RewardOutcome {
            xp_gained: xp,
            attribute,
            level: LevelChange::between(old_total, new_total),
            attribute_level: LevelChange::between(old_attribute, new_attribute),
        })
    }

    /// Same UTC day keeps the streak, the following day extends it, any
    /// longer gap restarts it.
    fn record_activity(&mut self, now: DateTime<Utc>) {
        let today = now.date_naive();
        self.streak_days = match self.last_activity.map(|at| at.date_naive()) {
            Some(last) if last == today => self.streak_days.max(1),
            Some(last) if last.succ_opt() == Some(today) => self.streak_days.saturating_add(1),
            _ => 1,
        };
        self.last_activity = Some(now);
        self.updated_at = now;
    }

    /// Advances the revision after a conditional write against the previous
    /// value succeeded.
    pub fn mark_saved(&mut self) {
        self.revision = self.revision.saturating_add(1);
    }

    /// Manual correction of the activity counters.
    pub fn update_streak(
        &mut self,
        streak_days: Option<u32>,
        last_activity: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) {
        if let Some(days) = streak_days {
            self.streak_days = days;
        }
        if let Some(at) = last_activity {
            self.last_activity = Some(at);
        }
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 26, 9, 0, 0).unwrap()
    }

    #[test]
    fn first_reward_matches_worked_example() {
        let mut stats = PlayerStats::new_for_user(UserId::new(), t0());
        let outcome = stats
            .apply_quest_reward(Attribute::Strength, 50, t0())
            .unwrap();

        assert_eq!(stats.attribute_xp().strength, 50);
        assert_eq!(stats.total_xp(), 50);
        assert_eq!(stats.quests_completed(), 1);
        assert_eq!(stats.level(), 1);
        assert_eq!(outcome.xp_gained, 50);
        assert!(!outcome.level.is_level_up());
        assert_eq!(stats.streak_days(), 1);
    }

    #[test]
    fn crossing_threshold_levels_up_both_tracks() {
        let mut stats = PlayerStats::new_for_user(UserId::new(), t0());
        stats.apply_quest_reward(Attribute::Wisdom, 60, t0()).unwrap();
        let outcome = stats.apply_quest_reward(Attribute::Wisdom, 60, t0()).unwrap();

        assert_eq!(outcome.level, LevelChange { old_level: 1, new_level: 2 });
        assert_eq!(
            outcome.attribute_level,
            LevelChange { old_level: 1, new_level: 2 }
        );
        assert_eq!(stats.attribute_level(Attribute::Wisdom), 2);
        assert_eq!(stats.attribute_level(Attribute::Strength), 1);
    }

    #[test]
    fn other_attributes_are_untouched() {
        let mut stats = PlayerStats::new_for_user(UserId::new(), t0());
        stats.apply_quest_reward(Attribute::Agility, 30, t0()).unwrap();
        for attribute in Attribute::ALL {
            let expected = if *attribute == Attribute::Agility { 30 } else { 0 };
            assert_eq!(stats.attribute_xp().get(*attribute), expected);
        }
    }

    #[test]
    fn overflow_leaves_stats_unchanged() {
        let mut stats = PlayerStats::from_state(PlayerStatsState {
            user_id: UserId::new(),
            total_xp: u64::MAX - 5,
            attribute_xp: AttributeXp::default(),
            quests_completed: 3,
            streak_days: 2,
            last_activity: None,
            revision: 7,
            created_at: t0(),
            updated_at: t0(),
        });
        let before = stats.clone();
        let result = stats.apply_quest_reward(Attribute::Charisma, 10, t0());
        assert!(matches!(result, Err(DomainError::Overflow(_))));
        assert_eq!(stats, before);
    }

    #[test]
    fn streak_rules() {
        let mut stats = PlayerStats::new_for_user(UserId::new(), t0());
        stats.apply_quest_reward(Attribute::Vitality, 10, t0()).unwrap();
        assert_eq!(stats.streak_days(), 1);

        stats
            .apply_quest_reward(Attribute::Vitality, 10, t0() + Duration::hours(3))
            .unwrap();
        assert_eq!(stats.streak_days(), 1);

        stats
            .apply_quest_reward(Attribute::Vitality, 10, t0() + Duration::days(1))
            .unwrap();
        assert_eq!(stats.streak_days(), 2);

        stats
            .apply_quest_reward(Attribute::Vitality, 10, t0() + Duration::days(4))
            .unwrap();
        assert_eq!(stats.streak_days(), 1);
        assert_eq!(stats.last_activity(), Some(t0() + Duration::days(4)));
    }

    #[test]
    fn update_streak_only_touches_given_fields() {
        let mut stats = PlayerStats::new_for_user(UserId::new(), t0());
        stats.update_streak(Some(9), None, t0());
        assert_eq!(stats.streak_days(), 9);
        assert!(stats.last_activity().is_none());
        assert_eq!(stats.total_xp(), 0);
    }
}
