//! Movement log recorder
//!
//! Appends one immutable audit entry for every stock-affecting action.
//! Entries are written inside the coordinator's transaction so an action
//! and its audit record commit or roll back together.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::pagination::{paginate, ListSpec};
use shared::{ListQuery, MovementAction, MovementLogEntry, Page};

#[derive(Clone)]
pub struct MovementService {
    db: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct MovementRow {
    id: Uuid,
    stock_item_id: Uuid,
    batch_id: Option<Uuid>,
    action: String,
    comment: String,
    actor_id: Uuid,
    created_at: DateTime<Utc>,
}

impl TryFrom<MovementRow> for MovementLogEntry {
    type Error = AppError;

    fn try_from(row: MovementRow) -> Result<Self, Self::Error> {
        let action = MovementAction::parse(&row.action).ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!(
                "unknown movement action '{}' in row {}",
                row.action,
                row.id
            ))
        })?;
        Ok(MovementLogEntry {
            id: row.id,
            stock_item_id: row.stock_item_id,
            batch_id: row.batch_id,
            action,
            comment: row.comment,
            actor_id: row.actor_id,
            created_at: row.created_at,
        })
    }
}

/// Append a movement entry inside the caller's transaction
pub async fn record(
    tx: &mut Transaction<'_, Postgres>,
    stock_item_id: Uuid,
    batch_id: Option<Uuid>,
    action: MovementAction,
    comment: &str,
    actor_id: Uuid,
) -> AppResult<Uuid> {
    let id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO movement_log (stock_item_id, batch_id, action, comment, actor_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(stock_item_id)
    .bind(batch_id)
    .bind(action.as_str())
    .bind(comment)
    .bind(actor_id)
    .fetch_one(&mut **tx)
    .await?;

    Ok(id)
}

impl MovementService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List movement entries, optionally scoped to one stock item
    pub async fn list(
        &self,
        stock_item_id: Option<Uuid>,
        query: &ListQuery,
    ) -> AppResult<Page<MovementLogEntry>> {
        let mut filters = Vec::new();
        if let Some(item_id) = stock_item_id {
            filters.push(crate::services::pagination::Filter::EqUuid(
                "stock_item_id",
                item_id,
            ));
        }

        let spec = ListSpec {
            table: "movement_log",
            columns: "id, stock_item_id, batch_id, action, comment, actor_id, created_at",
            search_fields: &["comment", "action"],
            sort_fields: &["created_at", "action"],
            default_sort: "created_at",
            filters,
        };

        let page = paginate::<MovementRow>(&self.db, &spec, query).await?;
        page.try_map(MovementLogEntry::try_from)
    }
}
