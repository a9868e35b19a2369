//! src/services/bottle_service.rs
//!
//! BottleService — create/list/update/delete over bottle records in SQLite,
//! scoped to the calling user. Every operation is a single attempt; any
//! database failure is surfaced as `BottleError::Sqlx`.

use crate::models::bottle::{Bottle, BottlePatch, NewBottle};
use chrono::Utc;
use sqlx::{QueryBuilder, SqlitePool, sqlite::Sqlite};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

#[derive(Debug, Error)]
pub enum BottleError {
    #[error("invalid bottle: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("bottle `{0}` not found")]
    NotFound(String),
    #[error("user `{user}` does not own bottle `{id}`")]
    NotOwner { id: Uuid, user: String },
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type BottleResult<T> = Result<T, BottleError>;

const BOTTLE_COLUMNS: &str = "id, owner_id, product, vintage, varietal, count, price, \
     cost_per_bottle, total_cost, size, country_code, status, created_at";

/// BottleService owns the bottle table:
/// - Create a bottle for the caller
/// - List the caller's bottles, newest first
/// - Patch or delete a bottle the caller owns
#[derive(Clone)]
pub struct BottleService {
    /// Shared SQLite connection pool.
    pub db: Arc<SqlitePool>,
}

impl BottleService {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }

    /// Validate and insert a new bottle owned by `owner`.
    pub async fn create(&self, owner: &str, input: NewBottle) -> BottleResult<Bottle> {
        input.validate()?;

        let sql = format!(
            "INSERT INTO bottles ({BOTTLE_COLUMNS})
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {BOTTLE_COLUMNS}"
        );
        let bottle = sqlx::query_as::<_, Bottle>(&sql)
            .bind(Uuid::new_v4())
            .bind(owner)
            .bind(input.product.unwrap_or_default())
            .bind(input.vintage)
            .bind(input.varietal)
            .bind(input.count)
            .bind(input.price)
            .bind(input.cost_per_bottle)
            .bind(input.total_cost)
            .bind(input.size)
            .bind(input.country_code)
            .bind(input.status)
            .bind(Utc::now())
            .fetch_one(&*self.db)
            .await?;

        debug!("created bottle {} for {}", bottle.id, owner);
        Ok(bottle)
    }

    /// All bottles owned by `owner`, most recently created first.
    pub async fn list(&self, owner: &str) -> BottleResult<Vec<Bottle>> {
        let sql = format!(
            "SELECT {BOTTLE_COLUMNS} FROM bottles
             WHERE owner_id = ?
             ORDER BY created_at DESC, rowid DESC"
        );
        let bottles = sqlx::query_as::<_, Bottle>(&sql)
            .bind(owner)
            .fetch_all(&*self.db)
            .await?;
        Ok(bottles)
    }

    /// Apply a partial update to a bottle owned by `owner`.
    ///
    /// Only keys present in `patch` are written. Checks run in order:
    /// validation, existence, ownership.
    pub async fn update(&self, id: &str, owner: &str, patch: BottlePatch) -> BottleResult<Bottle> {
        patch.validate()?;
        let current = self.fetch_owned(id, owner).await?;
        if patch.is_empty() {
            return Ok(current);
        }

        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE bottles SET ");
        {
            let mut set = builder.separated(", ");
            macro_rules! assign {
                ($column:literal, $field:expr) => {
                    if let Some(value) = $field {
                        set.push(concat!($column, " = "));
                        set.push_bind_unseparated(value);
                    }
                };
            }
            assign!("product", patch.product);
            assign!("vintage", patch.vintage);
            assign!("varietal", patch.varietal);
            assign!("count", patch.count);
            assign!("price", patch.price);
            assign!("cost_per_bottle", patch.cost_per_bottle);
            assign!("total_cost", patch.total_cost);
            assign!("size", patch.size);
            assign!("country_code", patch.country_code);
            assign!("status", patch.status);
        }
        builder.push(" WHERE id = ");
        builder.push_bind(current.id);
        builder.push(" AND owner_id = ");
        builder.push_bind(owner.to_string());
        builder.push(format!(" RETURNING {BOTTLE_COLUMNS}"));

        let updated: Option<Bottle> = builder.build_query_as().fetch_optional(&*self.db).await?;

        // The row can vanish between the ownership check and the write.
        updated.ok_or_else(|| BottleError::NotFound(id.to_string()))
    }

    /// Permanently remove a bottle owned by `owner` and return its last state.
    pub async fn delete(&self, id: &str, owner: &str) -> BottleResult<Bottle> {
        let bottle = self.fetch_owned(id, owner).await?;

        let result = sqlx::query("DELETE FROM bottles WHERE id = ? AND owner_id = ?")
            .bind(bottle.id)
            .bind(owner)
            .execute(&*self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(BottleError::NotFound(id.to_string()));
        }

        debug!("deleted bottle {} for {}", bottle.id, owner);
        Ok(bottle)
    }

    /// Look up a bottle and make sure `owner` may mutate it.
    ///
    /// An id that is not a UUID cannot exist and is reported as not found.
    async fn fetch_owned(&self, id: &str, owner: &str) -> BottleResult<Bottle> {
        let uuid = Uuid::parse_str(id).map_err(|_| BottleError::NotFound(id.to_string()))?;

        let sql = format!("SELECT {BOTTLE_COLUMNS} FROM bottles WHERE id = ?");
        let bottle = sqlx::query_as::<_, Bottle>(&sql)
            .bind(uuid)
            .fetch_optional(&*self.db)
            .await?
            .ok_or_else(|| BottleError::NotFound(id.to_string()))?;

        if bottle.owner_id != owner {
            return Err(BottleError::NotOwner {
                id: bottle.id,
                user: owner.to_string(),
            });
        }

        Ok(bottle)
    }
}
