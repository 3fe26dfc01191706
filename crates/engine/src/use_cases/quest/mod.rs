//! Quest use cases: create, list, complete, cancel and expire.
//!
//! Completion is the only path by which XP moves. The repository commits the
//! quest and the rewarded stats together, reading the stats under the write
//! lock so parallel completions for one player queue up.

use std::sync::Arc;

use lifesys_domain::{
    Description, DomainError, DomainEvent, NewQuest, PlayerStats, Quest, QuestId, QuestStatus,
    QuestTitle, RewardOutcome, UserId,
};
use lifesys_shared::CreateQuestRequest;

use crate::infrastructure::ports::{ClockPort, CommitOutcome, QuestRepo, RepoError};

/// Container for quest use cases.
pub struct QuestUseCases {
    pub create: Arc<CreateQuest>,
    pub list: Arc<ListQuests>,
    pub get: Arc<GetQuest>,
    pub complete: Arc<CompleteQuest>,
    pub cancel: Arc<CancelQuest>,
    pub expire_overdue: Arc<ExpireOverdueQuests>,
}

impl QuestUseCases {
    pub fn new(quests: Arc<dyn QuestRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            create: Arc::new(CreateQuest::new(quests.clone(), clock.clone())),
            list: Arc::new(ListQuests::new(quests.clone())),
            get: Arc::new(GetQuest::new(quests.clone())),
            complete: Arc::new(CompleteQuest::new(quests.clone(), clock.clone())),
            cancel: Arc::new(CancelQuest::new(quests.clone(), clock.clone())),
            expire_overdue: Arc::new(ExpireOverdueQuests::new(quests, clock)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QuestError {
    #[error("Quest not found")]
    NotFound,
    #[error("Quest is already completed")]
    AlreadyCompleted,
    #[error("Quest cannot change state: {0}")]
    InvalidState(String),
    #[error("Player stats missing for user")]
    StatsMissing,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Domain(DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<DomainError> for QuestError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg)
            | DomainError::Parse(msg)
            | DomainError::InvalidId(msg)
            | DomainError::Constraint(msg) => QuestError::InvalidInput(msg),
            DomainError::InvalidStateTransition(msg) => QuestError::InvalidState(msg),
            other => QuestError::Domain(other),
        }
    }
}

impl QuestError {
    /// The conflict reported for a quest that is no longer active.
    fn not_active(quest: &Quest) -> Self {
        match quest.status() {
            QuestStatus::Completed => QuestError::AlreadyCompleted,
            status => QuestError::InvalidState(format!("quest {} is {status}", quest.id())),
        }
    }
}

/// Loads a quest owned by `user_id`. Someone else's quest reads as missing.
async fn load_owned(
    quests: &dyn QuestRepo,
    user_id: UserId,
    quest_id: QuestId,
) -> Result<Quest, QuestError> {
    quests
        .get(quest_id)
        .await?
        .filter(|quest| quest.is_owned_by(user_id))
        .ok_or(QuestError::NotFound)
}

pub struct CreateQuest {
    quests: Arc<dyn QuestRepo>,
    clock: Arc<dyn ClockPort>,
}

impl CreateQuest {
    pub fn new(quests: Arc<dyn QuestRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { quests, clock }
    }

    pub async fn execute(&self, user_id: UserId, request: CreateQuestRequest) -> Result<Quest, QuestError> {
        let input = NewQuest {
            title: QuestTitle::new(request.title)?,
            description: Description::optional(request.description)?,
            difficulty: request.difficulty,
            attribute: request.attribute,
            xp_reward: request.xp_reward,
            due_date: request.due_date,
        };
        let quest = Quest::create(user_id, input, self.clock.now())?;
        self.quests.insert(&quest).await?;

        tracing::info!(
            quest_id = %quest.id(),
            user_id = %user_id,
            difficulty = %quest.difficulty(),
            xp_reward = quest.xp_reward(),
            "Quest created"
        );
        Ok(quest)
    }
}

pub struct ListQuests {
    quests: Arc<dyn QuestRepo>,
}

impl ListQuests {
    pub fn new(quests: Arc<dyn QuestRepo>) -> Self {
        Self { quests }
    }

    pub async fn execute(&self, user_id: UserId, status: Option<QuestStatus>) -> Result<Vec<Quest>, QuestError> {
        Ok(self.quests.list_for_user(user_id, status).await?)
    }
}

pub struct GetQuest {
    quests: Arc<dyn QuestRepo>,
}

impl GetQuest {
    pub fn new(quests: Arc<dyn QuestRepo>) -> Self {
        Self { quests }
    }

    pub async fn execute(&self, user_id: UserId, quest_id: QuestId) -> Result<Quest, QuestError> {
        load_owned(self.quests.as_ref(), user_id, quest_id).await
    }
}

/// Everything a caller needs to report a completion.
#[derive(Debug, Clone)]
pub struct QuestCompletion {
    pub quest: Quest,
    pub stats: PlayerStats,
    pub outcome: RewardOutcome,
    pub events: Vec<DomainEvent>,
}

pub struct CompleteQuest {
    quests: Arc<dyn QuestRepo>,
    clock: Arc<dyn ClockPort>,
}

impl CompleteQuest {
    pub fn new(quests: Arc<dyn QuestRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { quests, clock }
    }

    pub async fn execute(&self, user_id: UserId, quest_id: QuestId) -> Result<QuestCompletion, QuestError> {
        let mut quest = load_owned(self.quests.as_ref(), user_id, quest_id).await?;
        if !quest.is_active() {
            return Err(QuestError::not_active(&quest));
        }
        quest.complete(self.clock.now())?;

        match self.quests.commit_completion(&quest).await? {
            CommitOutcome::Committed { stats, reward } => {
                let events = DomainEvent::from_reward(user_id, quest_id, &reward);
                for event in &events {
                    tracing::info!(
                        event = event.name(),
                        user_id = %user_id,
                        quest_id = %quest_id,
                        xp_gained = reward.xp_gained,
                        level = stats.level(),
                        "Quest completion event"
                    );
                }
                Ok(QuestCompletion {
                    quest,
                    stats,
                    outcome: reward,
                    events,
                })
            }
            CommitOutcome::QuestNotActive => {
                let current = load_owned(self.quests.as_ref(), user_id, quest_id).await?;
                Err(QuestError::not_active(&current))
            }
            CommitOutcome::StatsMissing => Err(QuestError::StatsMissing),
            CommitOutcome::RewardRejected(err) => Err(err.into()),
        }
    }
}

pub struct CancelQuest {
    quests: Arc<dyn QuestRepo>,
    clock: Arc<dyn ClockPort>,
}

impl CancelQuest {
    pub fn new(quests: Arc<dyn QuestRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { quests, clock }
    }

    pub async fn execute(&self, user_id: UserId, quest_id: QuestId) -> Result<Quest, QuestError> {
        let mut quest = load_owned(self.quests.as_ref(), user_id, quest_id).await?;
        if !quest.is_active() {
            return Err(QuestError::not_active(&quest));
        }
        quest.cancel(self.clock.now())?;

        if !self.quests.save_transition(&quest).await? {
            let current = load_owned(self.quests.as_ref(), user_id, quest_id).await?;
            return Err(QuestError::not_active(&current));
        }
        tracing::info!(quest_id = %quest_id, "Quest cancelled");
        Ok(quest)
    }
}

/// Fails every active quest of a user whose due date has passed.
pub struct ExpireOverdueQuests {
    quests: Arc<dyn QuestRepo>,
    clock: Arc<dyn ClockPort>,
}

impl ExpireOverdueQuests {
    pub fn new(quests: Arc<dyn QuestRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { quests, clock }
    }

    /// Returns the ids that were moved to `failed`.
    pub async fn execute(&self, user_id: UserId) -> Result<Vec<QuestId>, QuestError> {
        let now = self.clock.now();
        let active = self
            .quests
            .list_for_user(user_id, Some(QuestStatus::Active))
            .await?;

        let mut expired = Vec::new();
        for mut quest in active.into_iter().filter(|q| q.is_overdue(now)) {
            quest.fail(now)?;
            // A quest completed in the meantime keeps its completion.
            if self.quests.save_transition(&quest).await? {
                expired.push(quest.id());
            }
        }

        if !expired.is_empty() {
            let event = DomainEvent::QuestsExpired {
                user_id,
                quest_ids: expired.clone(),
            };
            tracing::info!(event = event.name(), user_id = %user_id, count = expired.len(), "Overdue quests failed");
        }
        Ok(expired)
    }
}
