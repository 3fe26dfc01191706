//! Domain to wire conversions.

use lifesys_domain::{
    Attribute, BodyMetric, Category, CategoryTotal, DailyBucket, FinanceSummary, LevelProgress,
    MonthlyTrends, PlayerStats, Quest, Transaction, User,
};
use lifesys_shared::{
    AttributeStatsResponse, AttributesResponse, BodyMetricResponse, CategoryResponse,
    CategoryTotalResponse, DailyBucketResponse, DailyFinanceResponse, FinanceSummaryResponse,
    FinanceTrendsResponse, LeaderboardEntry, MonthlyTotalResponse, PlayerStatsResponse,
    QuestCompleteResponse, QuestResponse, TransactionResponse, UserResponse,
};

use crate::use_cases::{QuestCompletion, RankedPlayer};

pub fn user(user: &User) -> UserResponse {
    UserResponse {
        id: user.id().to_uuid(),
        email: user.email().as_str().to_string(),
        name: user.name().as_str().to_string(),
        role: user.role(),
        login_method: user.login_method().to_string(),
        created_at: user.created_at(),
        last_signed_in: user.last_signed_in(),
    }
}

pub fn quest(quest: &Quest) -> QuestResponse {
    QuestResponse {
        id: quest.id().to_uuid(),
        title: quest.title().as_str().to_string(),
        description: quest.description().map(|d| d.as_str().to_string()),
        difficulty: quest.difficulty(),
        attribute: quest.attribute(),
        xp_reward: quest.xp_reward(),
        status: quest.status(),
        due_date: quest.due_date(),
        completed_at: quest.completed_at(),
        created_at: quest.created_at(),
        updated_at: quest.updated_at(),
    }
}

pub fn completion(done: &QuestCompletion) -> QuestCompleteResponse {
    let outcome = &done.outcome;
    QuestCompleteResponse {
        quest: quest(&done.quest),
        xp_gained: outcome.xp_gained,
        attribute: outcome.attribute,
        level_up: outcome.level.is_level_up(),
        old_level: outcome.level.old_level,
        new_level: outcome.level.new_level,
        attribute_level_up: outcome.attribute_level.is_level_up(),
        attribute_old_level: outcome.attribute_level.old_level,
        attribute_new_level: outcome.attribute_level.new_level,
        stats: stats(&done.stats),
        message: completion_message(done),
    }
}

fn completion_message(done: &QuestCompletion) -> String {
    let outcome = &done.outcome;
    let mut message = format!(
        "Quest complete! +{} XP to {}",
        outcome.xp_gained, outcome.attribute
    );
    if outcome.level.is_level_up() {
        message.push_str(&format!(". Level up! You are now level {}", outcome.level.new_level));
    }
    if outcome.attribute_level.is_level_up() {
        message.push_str(&format!(
            ". {} reached level {}",
            outcome.attribute, outcome.attribute_level.new_level
        ));
    }
    message
}

fn track(progress: LevelProgress) -> AttributeStatsResponse {
    AttributeStatsResponse {
        level: progress.level,
        xp: progress.xp,
        xp_to_next_level: progress.xp_to_next_level,
        progress_percentage: progress.progress_percentage,
    }
}

pub fn stats(stats: &PlayerStats) -> PlayerStatsResponse {
    let progress = stats.progress();
    let attribute = |a: Attribute| track(stats.attribute_progress(a));
    PlayerStatsResponse {
        user_id: stats.user_id().to_uuid(),
        level: progress.level,
        total_xp: progress.xp,
        xp_into_level: progress.xp_into_level,
        xp_to_next_level: progress.xp_to_next_level,
        progress_percentage: progress.progress_percentage,
        attributes: AttributesResponse {
            strength: attribute(Attribute::Strength),
            intelligence: attribute(Attribute::Intelligence),
            charisma: attribute(Attribute::Charisma),
            vitality: attribute(Attribute::Vitality),
            wisdom: attribute(Attribute::Wisdom),
            agility: attribute(Attribute::Agility),
        },
        quests_completed: stats.quests_completed(),
        streak_days: stats.streak_days(),
        last_activity: stats.last_activity(),
        updated_at: stats.updated_at(),
    }
}

pub fn ranked(player: RankedPlayer) -> LeaderboardEntry {
    LeaderboardEntry {
        position: player.position,
        name: player.name,
        level: player.level,
        total_xp: player.total_xp,
        quests_completed: player.quests_completed,
    }
}

pub fn category(category: &Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id.to_uuid(),
        name: category.name.as_str().to_string(),
        category_type: category.category_type,
        icon: category.icon.clone(),
        color: category.color.as_ref().map(|c| c.as_str().to_string()),
        is_default: category.is_default(),
    }
}

pub fn transaction(tx: &Transaction) -> TransactionResponse {
    TransactionResponse {
        id: tx.id.to_uuid(),
        category_id: tx.category_id.to_uuid(),
        transaction_type: tx.transaction_type,
        amount: tx.amount.value(),
        description: tx.description.as_ref().map(|d| d.as_str().to_string()),
        date: tx.date,
        created_at: tx.created_at,
    }
}

fn category_total(total: CategoryTotal) -> CategoryTotalResponse {
    CategoryTotalResponse {
        category_id: total.category_id.to_uuid(),
        name: total.name,
        total: total.total,
        count: total.count,
        percentage: total.percentage,
    }
}

pub fn summary(summary: FinanceSummary) -> FinanceSummaryResponse {
    FinanceSummaryResponse {
        total_income: summary.total_income,
        total_expense: summary.total_expense,
        balance: summary.balance,
        income_by_category: summary
            .income_by_category
            .into_iter()
            .map(category_total)
            .collect(),
        expense_by_category: summary
            .expense_by_category
            .into_iter()
            .map(category_total)
            .collect(),
        transaction_count: summary.transaction_count,
    }
}

pub fn daily(buckets: Vec<DailyBucket>) -> DailyFinanceResponse {
    DailyFinanceResponse {
        days: buckets
            .into_iter()
            .map(|b| DailyBucketResponse {
                date: b.date,
                income: b.income,
                expense: b.expense,
            })
            .collect(),
    }
}

pub fn trends(trends: MonthlyTrends) -> FinanceTrendsResponse {
    FinanceTrendsResponse {
        months: trends
            .months
            .into_iter()
            .map(|m| MonthlyTotalResponse {
                month: format!("{:04}-{:02}", m.year, m.month),
                income: m.income,
                expense: m.expense,
                balance: m.balance,
            })
            .collect(),
        average_income: trends.average_income,
        average_expense: trends.average_expense,
    }
}

pub fn body_metric(metric: &BodyMetric) -> BodyMetricResponse {
    BodyMetricResponse {
        id: metric.id.to_uuid(),
        date: metric.date,
        weight: metric.weight,
        muscle_mass: metric.muscle_mass,
        fat_percentage: metric.fat_percentage,
        photo_url: metric.photo_url.clone(),
        created_at: metric.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use lifesys_domain::{MonthlyTotal, NewQuest, QuestDifficulty, QuestTitle, UserId};
    use rust_decimal::Decimal;

    #[test]
    fn month_is_zero_padded() {
        let body = trends(MonthlyTrends {
            months: vec![MonthlyTotal {
                year: 2026,
                month: 3,
                income: Decimal::ONE,
                expense: Decimal::ZERO,
                balance: Decimal::ONE,
            }],
            average_income: Decimal::ONE,
            average_expense: Decimal::ZERO,
        });
        assert_eq!(body.months[0].month, "2026-03");
    }

    #[test]
    fn completion_reports_levels_and_stats() {
        let now = Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap();
        let user_id = UserId::new();
        let mut quest = Quest::create(
            user_id,
            NewQuest {
                title: QuestTitle::new("Deadlift day").unwrap(),
                description: None,
                difficulty: QuestDifficulty::Epic,
                attribute: Attribute::Strength,
                xp_reward: None,
                due_date: None,
            },
            now,
        )
        .unwrap();
        quest.complete(now).unwrap();
        let mut player = PlayerStats::new_for_user(user_id, now);
        let outcome = player
            .apply_quest_reward(quest.attribute(), quest.xp_reward(), now)
            .unwrap();

        let done = QuestCompletion {
            quest,
            stats: player,
            outcome,
            events: Vec::new(),
        };
        let body = completion(&done);
        assert_eq!(body.xp_gained, 100);
        assert!(body.level_up);
        assert_eq!(body.new_level, 2);
        assert_eq!(body.stats.attributes.strength.xp, 100);
        assert!(body.message.contains("+100 XP"));
    }
}
