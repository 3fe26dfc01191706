use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Manual stats correction. XP and levels are not patchable; they only move
/// through quest completion.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateStatsRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(max = 36500))]
    pub streak_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<DateTime<Utc>>,
}
