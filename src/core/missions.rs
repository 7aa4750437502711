//! Daily missions - today's two missions, per-user progress and the reward claim.
//!
//! The `daily_missions` table holds at most one primary and one secondary mission. While
//! it is being rolled over the table may be empty; callers report that as "resetting".

use crate::{
    config::settings::MissionsConfig,
    core::economy,
    entities::{DailyMission, MissionProgress, User, daily_mission, mission_progress, user},
    errors::Result,
};
use sea_orm::{
    Set, TransactionTrait,
    prelude::*,
    sea_query::{Expr, OnConflict},
};
use tracing::info;

/// Slot name of the primary mission
pub const PRIMARY_SLOT: &str = "primary";
/// Slot name of the secondary mission
pub const SECONDARY_SLOT: &str = "secondary";

/// A mission key and how much progress completes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionSpec {
    /// Mission key, e.g. "catch"
    pub key: String,
    /// Progress required
    pub target: i64,
}

impl MissionSpec {
    /// Convenience constructor.
    #[must_use]
    pub fn new(key: impl Into<String>, target: i64) -> Self {
        Self {
            key: key.into(),
            target,
        }
    }
}

/// Today's pair of missions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyMissions {
    /// The primary mission
    pub primary: MissionSpec,
    /// The secondary mission
    pub secondary: MissionSpec,
}

/// One mission together with a user's progress on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionStatus {
    /// The mission
    pub mission: MissionSpec,
    /// Progress made today
    pub done: i64,
}

impl MissionStatus {
    /// Whether the target has been reached.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.done >= self.mission.target
    }

    /// Fills `{x}` and `{done}` in `template`. Without a template a generic line is used.
    #[must_use]
    pub fn describe(&self, template: Option<&str>) -> String {
        template.map_or_else(
            || format!("{} {}/{}", self.mission.key, self.done, self.mission.target),
            |template| {
                template
                    .replace("{x}", &self.mission.target.to_string())
                    .replace("{done}", &self.done.to_string())
            },
        )
    }
}

/// A user's view of today's missions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionBoard {
    /// Primary mission progress
    pub primary: MissionStatus,
    /// Secondary mission progress
    pub secondary: MissionStatus,
    /// Whether today's reward was already claimed
    pub claimed: bool,
}

impl MissionBoard {
    /// Both missions are complete.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.primary.is_complete() && self.secondary.is_complete()
    }

    /// Primary mission text, using the configured templates.
    #[must_use]
    pub fn primary_text(&self, config: &MissionsConfig) -> String {
        self.primary.describe(
            config
                .primaries
                .get(&self.primary.mission.key)
                .map(String::as_str),
        )
    }

    /// Secondary mission text, using the configured templates.
    #[must_use]
    pub fn secondary_text(&self, config: &MissionsConfig) -> String {
        self.secondary.describe(
            config
                .secondaries
                .get(&self.secondary.mission.key)
                .map(String::as_str),
        )
    }
}

/// Result of trying to claim today's reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// Reward granted
    Claimed {
        /// Credits added
        reward: i64,
        /// Balance after the reward
        credits: i64,
    },
    /// Reward was already claimed today
    AlreadyClaimed,
    /// At least one mission is incomplete
    Incomplete,
    /// Today's missions are not available yet
    MissionsResetting,
}

/// Returns today's missions, or None while they are being reset.
pub async fn get_daily_missions(db: &DatabaseConnection) -> Result<Option<DailyMissions>> {
    let rows = DailyMission::find().all(db).await?;

    let spec_for = |slot: &str| {
        rows.iter()
            .find(|row| row.slot == slot)
            .map(|row| MissionSpec::new(row.mission_key.clone(), row.target))
    };

    Ok(spec_for(PRIMARY_SLOT)
        .zip(spec_for(SECONDARY_SLOT))
        .map(|(primary, secondary)| DailyMissions { primary, secondary }))
}

/// Replaces today's missions and wipes all progress and claim flags.
pub async fn roll_daily_missions(
    db: &DatabaseConnection,
    primary: MissionSpec,
    secondary: MissionSpec,
) -> Result<DailyMissions> {
    let txn = db.begin().await?;

    DailyMission::delete_many().exec(&txn).await?;
    MissionProgress::delete_many().exec(&txn).await?;
    User::update_many()
        .col_expr(user::Column::MissionsClaimed, Expr::value(false))
        .exec(&txn)
        .await?;

    for (slot, spec) in [(PRIMARY_SLOT, &primary), (SECONDARY_SLOT, &secondary)] {
        daily_mission::ActiveModel {
            slot: Set(slot.to_string()),
            mission_key: Set(spec.key.clone()),
            target: Set(spec.target),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;

    info!(
        primary = %primary.key,
        secondary = %secondary.key,
        "Rolled daily missions"
    );
    Ok(DailyMissions { primary, secondary })
}

/// Adds `amount` to the user's progress on `mission_key` and returns the new total.
///
/// The increment is a single upsert on the `(user_id, mission_key)` unique index, so
/// concurrent calls never lose progress or create duplicate rows.
pub async fn record_progress(
    db: &DatabaseConnection,
    user_id: &str,
    mission_key: &str,
    amount: i64,
) -> Result<i64> {
    let txn = db.begin().await?;

    MissionProgress::insert(mission_progress::ActiveModel {
        user_id: Set(user_id.to_string()),
        mission_key: Set(mission_key.to_string()),
        amount: Set(amount),
        ..Default::default()
    })
    .on_conflict(
        OnConflict::columns([
            mission_progress::Column::UserId,
            mission_progress::Column::MissionKey,
        ])
        .value(
            mission_progress::Column::Amount,
            Expr::col(mission_progress::Column::Amount).add(amount),
        )
        .to_owned(),
    )
    .exec_without_returning(&txn)
    .await?;

    let total = find_progress(&txn, user_id, mission_key)
        .await?
        .map_or(amount, |row| row.amount);
    txn.commit().await?;

    Ok(total)
}

/// Today's progress of `user_id` on `mission_key`.
pub async fn get_progress(db: &DatabaseConnection, user_id: &str, mission_key: &str) -> Result<i64> {
    Ok(find_progress(db, user_id, mission_key)
        .await?
        .map_or(0, |row| row.amount))
}

/// Builds the user's mission board, or None while missions are being reset.
pub async fn mission_board(db: &DatabaseConnection, user_id: &str) -> Result<Option<MissionBoard>> {
    let Some(missions) = get_daily_missions(db).await? else {
        return Ok(None);
    };

    let user = economy::get_or_create_user(db, user_id).await?;
    let primary_done = get_progress(db, user_id, &missions.primary.key).await?;
    let secondary_done = get_progress(db, user_id, &missions.secondary.key).await?;

    Ok(Some(MissionBoard {
        primary: MissionStatus {
            mission: missions.primary,
            done: primary_done,
        },
        secondary: MissionStatus {
            mission: missions.secondary,
            done: secondary_done,
        },
        claimed: user.missions_claimed,
    }))
}

/// Grants `reward` credits if both missions are complete and nothing was claimed today.
///
/// The claim flag and the credits are updated in a single conditional statement, so
/// concurrent claims pay out at most once.
pub async fn claim_rewards(
    db: &DatabaseConnection,
    user_id: &str,
    reward: i64,
) -> Result<ClaimOutcome> {
    let Some(board) = mission_board(db, user_id).await? else {
        return Ok(ClaimOutcome::MissionsResetting);
    };
    if !board.is_complete() {
        return Ok(ClaimOutcome::Incomplete);
    }

    let txn = db.begin().await?;

    let claimed = User::update_many()
        .col_expr(
            user::Column::Credits,
            Expr::col(user::Column::Credits).add(reward),
        )
        .col_expr(user::Column::MissionsClaimed, Expr::value(true))
        .filter(user::Column::UserId.eq(user_id))
        .filter(user::Column::MissionsClaimed.eq(false))
        .exec(&txn)
        .await?;

    if claimed.rows_affected == 0 {
        return Ok(ClaimOutcome::AlreadyClaimed);
    }

    let user = economy::get_or_create_user(&txn, user_id).await?;
    txn.commit().await?;

    info!(user_id, reward, "Claimed daily mission reward");
    Ok(ClaimOutcome::Claimed {
        reward,
        credits: user.credits,
    })
}

async fn find_progress<C>(
    db: &C,
    user_id: &str,
    mission_key: &str,
) -> Result<Option<mission_progress::Model>>
where
    C: ConnectionTrait,
{
    MissionProgress::find()
        .filter(mission_progress::Column::UserId.eq(user_id))
        .filter(mission_progress::Column::MissionKey.eq(mission_key))
        .one(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use std::collections::HashMap;

    async fn setup_missions() -> Result<DatabaseConnection> {
        let db = setup_test_db().await?;
        roll_daily_missions(
            &db,
            MissionSpec::new("catch", 10),
            MissionSpec::new("hatch", 2),
        )
        .await?;
        Ok(db)
    }

    async fn complete_missions(db: &DatabaseConnection, user_id: &str) -> Result<()> {
        record_progress(db, user_id, "catch", 10).await?;
        record_progress(db, user_id, "hatch", 2).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_no_missions_means_resetting() -> Result<()> {
        let db = setup_test_db().await?;

        assert!(get_daily_missions(&db).await?.is_none());
        assert!(mission_board(&db, "user1").await?.is_none());
        assert_eq!(
            claim_rewards(&db, "user1", 100).await?,
            ClaimOutcome::MissionsResetting
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_roll_replaces_missions() -> Result<()> {
        let db = setup_missions().await?;
        record_progress(&db, "user1", "catch", 4).await?;

        let rolled = roll_daily_missions(
            &db,
            MissionSpec::new("battle", 3),
            MissionSpec::new("fish", 5),
        )
        .await?;

        assert_eq!(get_daily_missions(&db).await?, Some(rolled));
        assert_eq!(get_progress(&db, "user1", "catch").await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_record_progress_accumulates() -> Result<()> {
        let db = setup_missions().await?;

        assert_eq!(record_progress(&db, "user1", "catch", 3).await?, 3);
        assert_eq!(record_progress(&db, "user1", "catch", 4).await?, 7);
        assert_eq!(get_progress(&db, "user2", "catch").await?, 0);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_progress_is_not_lost() -> Result<()> {
        let db = setup_missions().await?;

        let tasks: Vec<_> = (0..20)
            .map(|_| {
                let db = db.clone();
                tokio::spawn(async move { record_progress(&db, "user1", "catch", 1).await })
            })
            .collect();
        for task in tasks {
            task.await.map_err(|e| crate::errors::Error::InvalidArgument {
                message: e.to_string(),
            })??;
        }

        let rows = MissionProgress::find()
            .filter(mission_progress::Column::UserId.eq("user1"))
            .all(&db)
            .await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(get_progress(&db, "user1", "catch").await?, 20);
        Ok(())
    }

    #[tokio::test]
    async fn test_board_reports_progress() -> Result<()> {
        let db = setup_missions().await?;
        record_progress(&db, "user1", "catch", 10).await?;
        record_progress(&db, "user1", "hatch", 1).await?;

        let board = mission_board(&db, "user1").await?.ok_or_else(|| {
            crate::errors::Error::InvalidArgument {
                message: "missing board".to_string(),
            }
        })?;
        assert!(board.primary.is_complete());
        assert!(!board.secondary.is_complete());
        assert!(!board.is_complete());
        assert!(!board.claimed);
        Ok(())
    }

    #[tokio::test]
    async fn test_claim_requires_completion() -> Result<()> {
        let db = setup_missions().await?;
        record_progress(&db, "user1", "catch", 10).await?;

        assert_eq!(
            claim_rewards(&db, "user1", 10_000).await?,
            ClaimOutcome::Incomplete
        );
        assert_eq!(economy::get_credits(&db, "user1").await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_claim_pays_once() -> Result<()> {
        let db = setup_missions().await?;
        complete_missions(&db, "user1").await?;

        assert_eq!(
            claim_rewards(&db, "user1", 10_000).await?,
            ClaimOutcome::Claimed {
                reward: 10_000,
                credits: 10_000
            }
        );
        assert_eq!(
            claim_rewards(&db, "user1", 10_000).await?,
            ClaimOutcome::AlreadyClaimed
        );
        assert_eq!(economy::get_credits(&db, "user1").await?, 10_000);
        Ok(())
    }

    #[tokio::test]
    async fn test_roll_resets_claims() -> Result<()> {
        let db = setup_missions().await?;
        complete_missions(&db, "user1").await?;
        claim_rewards(&db, "user1", 10_000).await?;

        roll_daily_missions(
            &db,
            MissionSpec::new("catch", 1),
            MissionSpec::new("hatch", 1),
        )
        .await?;
        complete_missions(&db, "user1").await?;

        assert!(matches!(
            claim_rewards(&db, "user1", 10_000).await?,
            ClaimOutcome::Claimed {
                credits: 20_000,
                ..
            }
        ));
        Ok(())
    }

    #[test]
    fn test_describe_with_templates() {
        let status = MissionStatus {
            mission: MissionSpec::new("catch", 10),
            done: 4,
        };
        assert_eq!(
            status.describe(Some("Catch {x} pokemon ({done}/{x})")),
            "Catch 10 pokemon (4/10)"
        );
        assert_eq!(status.describe(None), "catch 4/10");

        let config = MissionsConfig {
            primaries: HashMap::from([("catch".to_string(), "Catch {x}".to_string())]),
            ..Default::default()
        };
        let board = MissionBoard {
            primary: status.clone(),
            secondary: MissionStatus {
                mission: MissionSpec::new("hatch", 2),
                done: 0,
            },
            claimed: false,
        };
        assert_eq!(board.primary_text(&config), "Catch 10");
        assert_eq!(board.secondary_text(&config), "hatch 0/2");
    }
}
