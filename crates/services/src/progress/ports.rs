use crate::common::RepositoryError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const XP_PER_LEVEL: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Achievement {
    #[serde(rename = "first_steps")]
    FirstSteps,
    #[serde(rename = "xp_100")]
    Xp100,
    #[serde(rename = "xp_1000")]
    Xp1000,
    #[serde(rename = "streak_3")]
    Streak3,
    #[serde(rename = "streak_7")]
    Streak7,
}

impl Achievement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Achievement::FirstSteps => "first_steps",
            Achievement::Xp100 => "xp_100",
            Achievement::Xp1000 => "xp_1000",
            Achievement::Streak3 => "streak_3",
            Achievement::Streak7 => "streak_7",
        }
    }

    fn is_earned(&self, progress: &UserProgress) -> bool {
        match self {
            Achievement::FirstSteps => true,
            Achievement::Xp100 => progress.xp >= 100,
            Achievement::Xp1000 => progress.xp >= 1000,
            Achievement::Streak3 => progress.current_streak >= 3,
            Achievement::Streak7 => progress.current_streak >= 7,
        }
    }
}

const ALL_ACHIEVEMENTS: [Achievement; 5] = [
    Achievement::FirstSteps,
    Achievement::Xp100,
    Achievement::Xp1000,
    Achievement::Streak3,
    Achievement::Streak7,
];

/// Gamification state for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserProgress {
    pub user_id: String,
    pub xp: u64,
    pub level: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_active_date: Option<NaiveDate>,
    /// Unlock order
    pub achievements: Vec<Achievement>,
}

impl UserProgress {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            xp: 0,
            level: 1,
            current_streak: 0,
            longest_streak: 0,
            last_active_date: None,
            achievements: Vec::new(),
        }
    }
}

/// A single XP change, applied atomically by the repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpAward {
    pub xp_delta: i64,
    pub at: DateTime<Utc>,
}

impl XpAward {
    /// Apply the award and return the achievements it unlocked
    pub fn apply(&self, progress: &mut UserProgress) -> Vec<Achievement> {
        let xp = (progress.xp as i64).saturating_add(self.xp_delta).max(0);
        progress.xp = xp as u64;
        progress.level = progress.xp / XP_PER_LEVEL + 1;

        let today = self.at.date_naive();
        match progress.last_active_date {
            None => progress.current_streak = 1,
            // Same day, or an event that arrived late
            Some(last) if today <= last => {}
            Some(last) if last.succ_opt() == Some(today) => progress.current_streak += 1,
            Some(_) => progress.current_streak = 1,
        }
        progress.last_active_date = progress.last_active_date.max(Some(today));
        progress.longest_streak = progress.longest_streak.max(progress.current_streak);

        let mut unlocked = Vec::new();
        for achievement in ALL_ACHIEVEMENTS {
            if !progress.achievements.contains(&achievement) && achievement.is_earned(progress) {
                progress.achievements.push(achievement);
                unlocked.push(achievement);
            }
        }
        unlocked
    }
}

// ============================================
// Service Traits
// ============================================

#[async_trait::async_trait]
pub trait ProgressServiceTrait: Send + Sync {
    /// Defaults for users that never earned XP
    async fn get_progress(&self, user_id: &str) -> Result<UserProgress, ProgressError>;

    async fn award_xp(
        &self,
        user_id: &str,
        xp_delta: i64,
        at: DateTime<Utc>,
    ) -> Result<UserProgress, ProgressError>;
}

// ============================================
// Repository Traits
// ============================================

#[async_trait::async_trait]
pub trait ProgressRepository: Send + Sync {
    async fn get(&self, user_id: &str) -> Result<Option<UserProgress>, RepositoryError>;

    /// Apply `award` to the user's progress, creating it when missing
    async fn apply_award(
        &self,
        user_id: &str,
        award: XpAward,
    ) -> Result<UserProgress, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
