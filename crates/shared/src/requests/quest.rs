use chrono::{DateTime, Utc};
use lifesys_domain::types::{Attribute, QuestDifficulty, QuestStatus};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateQuestRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    /// Defaults to `medium`.
    #[serde(default)]
    pub difficulty: QuestDifficulty,
    pub attribute: Attribute,
    /// Defaults to the difficulty's reward.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(max = 10000))]
    pub xp_reward: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

/// `?status=` filter for the quest list.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Validate)]
pub struct ListQuestsQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<QuestStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_body_uses_defaults() {
        let request: CreateQuestRequest =
            serde_json::from_str(r#"{"title":"Read a chapter","attribute":"intelligence"}"#)
                .unwrap();
        assert_eq!(request.difficulty, QuestDifficulty::Medium);
        assert!(request.xp_reward.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn reward_above_cap_fails_validation() {
        let request: CreateQuestRequest = serde_json::from_str(
            r#"{"title":"Marathon","attribute":"vitality","difficulty":"epic","xp_reward":10001}"#,
        )
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn unknown_attribute_is_a_decode_error() {
        let result = serde_json::from_str::<CreateQuestRequest>(
            r#"{"title":"x","attribute":"luck"}"#,
        );
        assert!(result.is_err());
    }
}
