//! Credit balances - user lookup, rewards and transfers.
//!
//! Balance changes are written as single conditional `UPDATE` statements so concurrent
//! commands can never drive a balance below zero or lose an increment.

use crate::{
    entities::{User, user},
    errors::{Error, Result},
};
use sea_orm::{
    Set, TransactionTrait,
    prelude::*,
    sea_query::{Expr, OnConflict},
};
use tracing::info;

/// Returns the user's row, creating it with zero credits on first use.
pub async fn get_or_create_user<C>(db: &C, user_id: &str) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    if let Some(existing) = find_user(db, user_id).await? {
        return Ok(existing);
    }

    let new_user = user::ActiveModel {
        user_id: Set(user_id.to_string()),
        credits: Set(0),
        missions_claimed: Set(false),
        ..Default::default()
    };
    User::insert(new_user)
        .on_conflict(
            OnConflict::column(user::Column::UserId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    find_user(db, user_id)
        .await?
        .ok_or_else(|| Error::Database(DbErr::RecordNotFound(user_id.to_string())))
}

/// Current credit balance, zero for users never seen before.
pub async fn get_credits(db: &DatabaseConnection, user_id: &str) -> Result<i64> {
    Ok(find_user(db, user_id)
        .await?
        .map_or(0, |existing| existing.credits))
}

/// Atomically adds `amount` credits and returns the updated user.
pub async fn add_credits<C>(db: &C, user_id: &str, amount: i64) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    get_or_create_user(db, user_id).await?;

    User::update_many()
        .col_expr(
            user::Column::Credits,
            Expr::col(user::Column::Credits).add(amount),
        )
        .filter(user::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    get_or_create_user(db, user_id).await
}

/// Checks that `from` could send `amount` credits to `to` right now, returning the balance.
///
/// Used to reject a transfer before asking anyone to confirm it. The balance can still
/// change afterwards; [`transfer_credits`] checks it again atomically.
///
/// # Errors
/// Same as [`transfer_credits`].
pub async fn check_transfer(
    db: &DatabaseConnection,
    from: &str,
    to: &str,
    amount: i64,
) -> Result<i64> {
    validate_transfer(from, to, amount)?;

    let available = get_credits(db, from).await?;
    if available < amount {
        return Err(Error::InsufficientCredits {
            available,
            required: amount,
        });
    }
    Ok(available)
}

fn validate_transfer(from: &str, to: &str, amount: i64) -> Result<()> {
    if amount <= 0 {
        return Err(Error::InvalidArgument {
            message: format!("Transfer amount must be positive, got {amount}"),
        });
    }
    if from == to {
        return Err(Error::InvalidArgument {
            message: "Cannot transfer credits to yourself".to_string(),
        });
    }
    Ok(())
}

/// Moves `amount` credits from `from` to `to` in one database transaction.
///
/// # Errors
/// * [`Error::InvalidArgument`] for a non-positive amount or a self-transfer
/// * [`Error::InsufficientCredits`] when `from` holds fewer than `amount` credits
pub async fn transfer_credits(
    db: &DatabaseConnection,
    from: &str,
    to: &str,
    amount: i64,
) -> Result<(user::Model, user::Model)> {
    validate_transfer(from, to, amount)?;

    let txn = db.begin().await?;

    let payer = get_or_create_user(&txn, from).await?;
    get_or_create_user(&txn, to).await?;

    let debited = User::update_many()
        .col_expr(
            user::Column::Credits,
            Expr::col(user::Column::Credits).sub(amount),
        )
        .filter(user::Column::UserId.eq(from))
        .filter(user::Column::Credits.gte(amount))
        .exec(&txn)
        .await?;

    if debited.rows_affected == 0 {
        return Err(Error::InsufficientCredits {
            available: payer.credits,
            required: amount,
        });
    }

    let payee = add_credits(&txn, to, amount).await?;
    let payer = get_or_create_user(&txn, from).await?;

    txn.commit().await?;

    info!(from, to, amount, "Transferred credits");
    Ok((payer, payee))
}

async fn find_user<C>(db: &C, user_id: &str) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    User::find()
        .filter(user::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_get_or_create_user_is_stable() -> Result<()> {
        let db = setup_test_db().await?;

        let created = get_or_create_user(&db, "user1").await?;
        assert_eq!(created.credits, 0);
        assert!(!created.missions_claimed);

        let again = get_or_create_user(&db, "user1").await?;
        assert_eq!(again.id, created.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_credits_for_unknown_user() -> Result<()> {
        let db = setup_test_db().await?;
        assert_eq!(get_credits(&db, "ghost").await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_add_credits_accumulates() -> Result<()> {
        let db = setup_test_db().await?;

        add_credits(&db, "user1", 100).await?;
        let updated = add_credits(&db, "user1", 50).await?;

        assert_eq!(updated.credits, 150);
        assert_eq!(get_credits(&db, "user1").await?, 150);
        Ok(())
    }

    #[tokio::test]
    async fn test_transfer_moves_credits() -> Result<()> {
        let db = setup_user_with_credits("giver", 1_000).await?;

        let (payer, payee) = transfer_credits(&db, "giver", "taker", 400).await?;

        assert_eq!(payer.credits, 600);
        assert_eq!(payee.credits, 400);
        assert_eq!(get_credits(&db, "giver").await?, 600);
        assert_eq!(get_credits(&db, "taker").await?, 400);
        Ok(())
    }

    #[tokio::test]
    async fn test_transfer_insufficient_credits() -> Result<()> {
        let db = setup_user_with_credits("giver", 100).await?;

        let result = transfer_credits(&db, "giver", "taker", 101).await;
        assert!(matches!(
            result,
            Err(Error::InsufficientCredits {
                available: 100,
                required: 101
            })
        ));

        // Nothing moved
        assert_eq!(get_credits(&db, "giver").await?, 100);
        assert_eq!(get_credits(&db, "taker").await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_transfer_validation() -> Result<()> {
        let db = setup_user_with_credits("giver", 100).await?;

        assert!(matches!(
            transfer_credits(&db, "giver", "taker", 0).await,
            Err(Error::InvalidArgument { .. })
        ));
        assert!(matches!(
            transfer_credits(&db, "giver", "taker", -5).await,
            Err(Error::InvalidArgument { .. })
        ));
        assert!(matches!(
            transfer_credits(&db, "giver", "giver", 5).await,
            Err(Error::InvalidArgument { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_check_transfer_rejects_before_moving_credits() -> Result<()> {
        let db = setup_user_with_credits("giver", 100).await?;

        assert_eq!(check_transfer(&db, "giver", "taker", 100).await?, 100);
        for amount in [0, -5] {
            assert!(matches!(
                check_transfer(&db, "giver", "taker", amount).await,
                Err(Error::InvalidArgument { .. })
            ));
        }
        assert!(matches!(
            check_transfer(&db, "giver", "taker", 101).await,
            Err(Error::InsufficientCredits {
                available: 100,
                required: 101
            })
        ));

        assert_eq!(get_credits(&db, "giver").await?, 100);
        assert_eq!(get_credits(&db, "taker").await?, 0);
        Ok(())
    }
}
