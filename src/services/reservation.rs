//! Conditional updates
//!
//! Every contended write in this crate is a single `UPDATE ... WHERE
//! <precondition>`: the active-slot claim, the slot release, the enrollment
//! progress bump and coupon usage reservation. The affected-row count tells
//! the caller whether its precondition still held; zero means another writer
//! got there first (or the resource is exhausted).

use sea_orm::{ConnectionTrait, EntityTrait, UpdateMany};

/// Runs `update` and reports whether it matched at least one row.
pub async fn try_reserve<E, C>(conn: &C, update: UpdateMany<E>) -> Result<bool, sea_orm::DbErr>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let result = update.exec(conn).await?;
    Ok(result.rows_affected > 0)
}
