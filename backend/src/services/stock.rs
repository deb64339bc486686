//! Batch-finance transaction coordinator
//!
//! Every operation here writes a batch change and its financial
//! consequence inside one database transaction. The paid/debt split is
//! validated as a [`FinanceSplit`] before the transaction opens, so on
//! commit the invariant `paid + debt == total_cost` holds for the event's
//! movement entry by construction.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::movement;
use crate::services::pagination::{paginate, Filter, ListSpec};
use crate::services::party::PartyService;
use shared::{
    Batch, FinanceSplit, ListQuery, MeasurementUnit, MovementAction, Page, PartyKind, PaymentType,
    PostingChange, StockItem, StockKind,
};

#[derive(Clone)]
pub struct StockService {
    db: PgPool,
}

/// Input for creating a stock item together with its first batch
#[derive(Debug, Deserialize)]
pub struct CreateItemWithBatchInput {
    pub name: String,
    pub kind: StockKind,
    pub unit: MeasurementUnit,
    pub supplier_id: Uuid,
    pub amount: Decimal,
    pub buy_price: Decimal,
    pub paid: Decimal,
    pub payment_type: PaymentType,
    pub min_threshold: Option<Decimal>,
    pub comment: Option<String>,
}

/// Input for adding a batch to an existing stock item
#[derive(Debug, Deserialize)]
pub struct AddBatchInput {
    pub supplier_id: Uuid,
    pub amount: Decimal,
    pub buy_price: Decimal,
    pub paid: Decimal,
    pub payment_type: PaymentType,
    pub comment: Option<String>,
}

/// Input for amending a batch; absent fields keep their current values
#[derive(Debug, Default, Deserialize)]
pub struct AmendBatchInput {
    pub amount: Option<Decimal>,
    pub buy_price: Option<Decimal>,
    pub paid: Option<Decimal>,
    pub supplier_id: Option<Uuid>,
    pub payment_type: Option<PaymentType>,
}

/// Input for editing item metadata (no financial side effect)
#[derive(Debug, Deserialize)]
pub struct UpdateItemInput {
    pub name: Option<String>,
    pub min_threshold: Option<Decimal>,
}

/// Result of a batch-creating operation
#[derive(Debug, Serialize)]
pub struct BatchFinanceView {
    pub stock_item_id: Uuid,
    pub batch_id: Uuid,
    pub movement_id: Uuid,
    pub total_cost: Decimal,
    pub paid: Decimal,
    pub debt: Decimal,
}

/// Result of a batch amendment
#[derive(Debug, Serialize)]
pub struct AmendedBatchView {
    pub batch: Batch,
    pub total_cost: Decimal,
    pub paid: Decimal,
    pub debt: Decimal,
}

#[derive(Debug, Serialize)]
pub struct DeleteResult {
    pub success: bool,
}

#[derive(Debug, sqlx::FromRow)]
struct StockItemRow {
    id: Uuid,
    name: String,
    kind: String,
    unit: String,
    min_threshold: Option<Decimal>,
    is_deleted: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<StockItemRow> for StockItem {
    type Error = AppError;

    fn try_from(row: StockItemRow) -> Result<Self, Self::Error> {
        let kind = StockKind::parse(&row.kind).ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!("unknown stock kind '{}'", row.kind))
        })?;
        let unit = MeasurementUnit::parse(&row.unit).ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!("unknown measurement unit '{}'", row.unit))
        })?;
        Ok(StockItem {
            id: row.id,
            name: row.name,
            kind,
            unit,
            min_threshold: row.min_threshold,
            is_deleted: row.is_deleted,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct BatchRow {
    id: Uuid,
    stock_item_id: Uuid,
    amount: Decimal,
    buy_price: Decimal,
    total_cost: Decimal,
    is_deleted: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BatchRow> for Batch {
    fn from(row: BatchRow) -> Self {
        Batch {
            id: row.id,
            stock_item_id: row.stock_item_id,
            amount: row.amount,
            buy_price: row.buy_price,
            total_cost: row.total_cost,
            is_deleted: row.is_deleted,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Pinned reconciliation row (payment or debt) for one movement entry
#[derive(Debug, sqlx::FromRow)]
struct PostingRow {
    id: Uuid,
    amount: Decimal,
    from_party: Uuid,
    to_party: Uuid,
}

const BATCH_COLUMNS: &str =
    "id, stock_item_id, amount, buy_price, total_cost, is_deleted, created_at, updated_at";
const ITEM_COLUMNS: &str =
    "id, name, kind, unit, min_threshold, is_deleted, created_at, updated_at";

impl StockService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a stock item and its first batch with the financial postings
    /// in one transaction
    pub async fn create_item_with_batch(
        &self,
        actor_id: Uuid,
        input: CreateItemWithBatchInput,
    ) -> AppResult<BatchFinanceView> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Name must not be empty".to_string(),
            });
        }

        let split = FinanceSplit::new(input.amount, input.buy_price, input.paid)?;

        let parties = PartyService::new(self.db.clone());
        parties
            .ensure_active(input.supplier_id, Some(PartyKind::Supplier), "Supplier")
            .await?;
        parties
            .ensure_active(actor_id, Some(PartyKind::Staff), "Actor")
            .await?;

        let mut tx = self.db.begin().await?;

        let stock_item_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO stock_items (name, kind, unit, min_threshold)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(input.kind.as_str())
        .bind(input.unit.as_str())
        .bind(input.min_threshold)
        .fetch_one(&mut *tx)
        .await?;

        let batch_id =
            insert_batch(&mut tx, stock_item_id, input.amount, input.buy_price, &split).await?;

        let comment = input
            .comment
            .unwrap_or_else(|| format!("Added {} with initial batch", name));
        let movement_id = movement::record(
            &mut tx,
            stock_item_id,
            Some(batch_id),
            MovementAction::Add,
            &comment,
            actor_id,
        )
        .await?;

        insert_postings(
            &mut tx,
            movement_id,
            &split,
            actor_id,
            input.supplier_id,
            input.payment_type,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            %stock_item_id, %batch_id, total_cost = %split.total_cost,
            "created stock item with batch"
        );

        Ok(BatchFinanceView {
            stock_item_id,
            batch_id,
            movement_id,
            total_cost: split.total_cost,
            paid: split.paid,
            debt: split.debt,
        })
    }

    /// Add a batch to an existing stock item
    pub async fn add_batch(
        &self,
        actor_id: Uuid,
        stock_item_id: Uuid,
        input: AddBatchInput,
    ) -> AppResult<BatchFinanceView> {
        let split = FinanceSplit::new(input.amount, input.buy_price, input.paid)?;

        let item_name = sqlx::query_scalar::<_, String>(
            "SELECT name FROM stock_items WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(stock_item_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Stock item".to_string()))?;

        let parties = PartyService::new(self.db.clone());
        parties
            .ensure_active(input.supplier_id, Some(PartyKind::Supplier), "Supplier")
            .await?;
        parties
            .ensure_active(actor_id, Some(PartyKind::Staff), "Actor")
            .await?;

        let mut tx = self.db.begin().await?;

        let batch_id =
            insert_batch(&mut tx, stock_item_id, input.amount, input.buy_price, &split).await?;

        let comment = input.comment.unwrap_or_else(|| {
            format!(
                "Added batch to {}: {} at {}",
                item_name, input.amount, input.buy_price
            )
        });
        let movement_id = movement::record(
            &mut tx,
            stock_item_id,
            Some(batch_id),
            MovementAction::AddBatch,
            &comment,
            actor_id,
        )
        .await?;

        insert_postings(
            &mut tx,
            movement_id,
            &split,
            actor_id,
            input.supplier_id,
            input.payment_type,
        )
        .await?;

        tx.commit().await?;

        Ok(BatchFinanceView {
            stock_item_id,
            batch_id,
            movement_id,
            total_cost: split.total_cost,
            paid: split.paid,
            debt: split.debt,
        })
    }

    /// Amend a batch and reconcile its postings
    ///
    /// The payment and debt rows pinned to the batch's originating movement
    /// entry are treated as mutable reconciliation rows: they are updated,
    /// inserted, or removed so that after commit the sums again equal the
    /// re-derived total cost. The batch row is locked for update at the top
    /// of the transaction, so racing amendments of the same batch serialize
    /// and every reconciliation read happens under that lock.
    pub async fn amend_batch(
        &self,
        actor_id: Uuid,
        batch_id: Uuid,
        input: AmendBatchInput,
    ) -> AppResult<AmendedBatchView> {
        if let Some(id) = input.supplier_id {
            PartyService::new(self.db.clone())
                .ensure_active(id, Some(PartyKind::Supplier), "Supplier")
                .await?;
        }

        let mut tx = self.db.begin().await?;

        let existing = sqlx::query_as::<_, BatchRow>(&format!(
            "SELECT {} FROM batches WHERE id = $1 FOR UPDATE",
            BATCH_COLUMNS
        ))
        .bind(batch_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Batch".to_string()))?;

        if existing.is_deleted {
            return Err(AppError::Conflict("Batch is deleted".to_string()));
        }

        let movement_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM movement_log
            WHERE batch_id = $1 AND action IN ('ADD', 'ADD_BATCH')
            ORDER BY created_at
            LIMIT 1
            "#,
        )
        .bind(batch_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::InvariantViolation("Batch has no originating movement entry".to_string())
        })?;

        let previously_paid = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(amount), 0) FROM payments WHERE movement_id = $1",
        )
        .bind(movement_id)
        .fetch_one(&mut *tx)
        .await?;
        let previous_debt = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(amount), 0) FROM debts WHERE movement_id = $1",
        )
        .bind(movement_id)
        .fetch_one(&mut *tx)
        .await?;

        let pinned_payment = sqlx::query_as::<_, PostingRow>(
            r#"
            SELECT id, amount, from_party, to_party
            FROM payments WHERE movement_id = $1
            ORDER BY created_at LIMIT 1
            "#,
        )
        .bind(movement_id)
        .fetch_optional(&mut *tx)
        .await?;
        let pinned_debt = sqlx::query_as::<_, PostingRow>(
            r#"
            SELECT id, amount, from_party, to_party
            FROM debts WHERE movement_id = $1
            ORDER BY created_at LIMIT 1
            "#,
        )
        .bind(movement_id)
        .fetch_optional(&mut *tx)
        .await?;

        let new_amount = input.amount.unwrap_or(existing.amount);
        let new_buy_price = input.buy_price.unwrap_or(existing.buy_price);
        let split = FinanceSplit::amend(new_amount, new_buy_price, previously_paid, input.paid)?;

        // The supplier side of the rewritten rows: the validated override,
        // or whatever the existing postings already point at.
        let supplier_id = input.supplier_id.or_else(|| {
            pinned_payment
                .as_ref()
                .map(|p| p.to_party)
                .or_else(|| pinned_debt.as_ref().map(|d| d.from_party))
        });
        let payer_id = pinned_payment
            .as_ref()
            .map(|p| p.from_party)
            .or_else(|| pinned_debt.as_ref().map(|d| d.to_party))
            .unwrap_or(actor_id);

        let needs_postings = split.paid > Decimal::ZERO || split.debt > Decimal::ZERO;
        let supplier_id = match (supplier_id, needs_postings) {
            (Some(id), _) => id,
            (None, false) => actor_id, // no rows will be written
            (None, true) => {
                return Err(AppError::Validation {
                    field: "supplier_id".to_string(),
                    message: "supplier_id is required when a batch has no prior postings"
                        .to_string(),
                });
            }
        };

        let payment_type = input.payment_type.unwrap_or(PaymentType::Cash);

        sqlx::query(
            r#"
            UPDATE batches
            SET amount = $1, buy_price = $2, total_cost = $3, updated_at = NOW()
            WHERE id = $4
            "#,
        )
        .bind(new_amount)
        .bind(new_buy_price)
        .bind(split.total_cost)
        .bind(batch_id)
        .execute(&mut *tx)
        .await?;

        reconcile_posting(
            &mut tx,
            Posting::Payment(payment_type),
            pinned_payment.as_ref(),
            split.paid,
            movement_id,
            payer_id,
            supplier_id,
        )
        .await?;
        reconcile_posting(
            &mut tx,
            Posting::Debt,
            pinned_debt.as_ref(),
            split.debt,
            movement_id,
            supplier_id,
            payer_id,
        )
        .await?;

        let comment = format!(
            "Amended batch: amount {} -> {}, buy price {} -> {}, paid {} -> {}, debt {} -> {}",
            existing.amount,
            new_amount,
            existing.buy_price,
            new_buy_price,
            previously_paid,
            split.paid,
            previous_debt,
            split.debt,
        );
        movement::record(
            &mut tx,
            existing.stock_item_id,
            Some(batch_id),
            MovementAction::ChangeBatch,
            &comment,
            actor_id,
        )
        .await?;

        tx.commit().await?;

        let updated = sqlx::query_as::<_, BatchRow>(&format!(
            "SELECT {} FROM batches WHERE id = $1",
            BATCH_COLUMNS
        ))
        .bind(batch_id)
        .fetch_one(&self.db)
        .await?;

        Ok(AmendedBatchView {
            batch: updated.into(),
            total_cost: split.total_cost,
            paid: split.paid,
            debt: split.debt,
        })
    }

    /// Soft-delete a batch
    ///
    /// Historical payment and debt rows stay untouched: money that already
    /// moved is a fact, not something to reverse. Stock totals simply stop
    /// counting the batch.
    pub async fn delete_batch(&self, actor_id: Uuid, batch_id: Uuid) -> AppResult<DeleteResult> {
        let row = sqlx::query_as::<_, (Uuid, bool)>(
            "SELECT stock_item_id, is_deleted FROM batches WHERE id = $1",
        )
        .bind(batch_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Batch".to_string()))?;

        if row.1 {
            return Err(AppError::Conflict("Batch is already deleted".to_string()));
        }

        let mut tx = self.db.begin().await?;

        sqlx::query("UPDATE batches SET is_deleted = TRUE, updated_at = NOW() WHERE id = $1")
            .bind(batch_id)
            .execute(&mut *tx)
            .await?;

        movement::record(
            &mut tx,
            row.0,
            Some(batch_id),
            MovementAction::DeleteBatch,
            "Removed batch from stock; financial history preserved",
            actor_id,
        )
        .await?;

        tx.commit().await?;

        Ok(DeleteResult { success: true })
    }

    /// Soft-delete a stock item and, logically, its batches
    pub async fn delete_item(&self, actor_id: Uuid, stock_item_id: Uuid) -> AppResult<DeleteResult> {
        let name = sqlx::query_scalar::<_, String>(
            "SELECT name FROM stock_items WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(stock_item_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Stock item".to_string()))?;

        let mut tx = self.db.begin().await?;

        sqlx::query("UPDATE stock_items SET is_deleted = TRUE, updated_at = NOW() WHERE id = $1")
            .bind(stock_item_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "UPDATE batches SET is_deleted = TRUE, updated_at = NOW() WHERE stock_item_id = $1",
        )
        .bind(stock_item_id)
        .execute(&mut *tx)
        .await?;

        movement::record(
            &mut tx,
            stock_item_id,
            None,
            MovementAction::Delete,
            &format!("Deleted {}", name),
            actor_id,
        )
        .await?;

        tx.commit().await?;

        Ok(DeleteResult { success: true })
    }

    /// Edit item metadata; carries no financial side effect
    pub async fn update_item(
        &self,
        actor_id: Uuid,
        stock_item_id: Uuid,
        input: UpdateItemInput,
    ) -> AppResult<StockItem> {
        let existing = sqlx::query_as::<_, StockItemRow>(&format!(
            "SELECT {} FROM stock_items WHERE id = $1 AND is_deleted = FALSE",
            ITEM_COLUMNS
        ))
        .bind(stock_item_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Stock item".to_string()))?;

        let name = input.name.unwrap_or(existing.name);
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Name must not be empty".to_string(),
            });
        }
        let min_threshold = input.min_threshold.or(existing.min_threshold);

        let mut tx = self.db.begin().await?;

        sqlx::query(
            "UPDATE stock_items SET name = $1, min_threshold = $2, updated_at = NOW() WHERE id = $3",
        )
        .bind(&name)
        .bind(min_threshold)
        .bind(stock_item_id)
        .execute(&mut *tx)
        .await?;

        movement::record(
            &mut tx,
            stock_item_id,
            None,
            MovementAction::Change,
            &format!("Updated item metadata for {}", name),
            actor_id,
        )
        .await?;

        tx.commit().await?;

        let row = sqlx::query_as::<_, StockItemRow>(&format!(
            "SELECT {} FROM stock_items WHERE id = $1",
            ITEM_COLUMNS
        ))
        .bind(stock_item_id)
        .fetch_one(&self.db)
        .await?;

        row.try_into()
    }

    /// List stock items, optionally restricted to one kind
    pub async fn list_items(
        &self,
        kind: Option<StockKind>,
        query: &ListQuery,
    ) -> AppResult<Page<StockItem>> {
        let mut filters = vec![Filter::EqBool("is_deleted", false)];
        if let Some(kind) = kind {
            filters.push(Filter::EqText("kind", kind.as_str()));
        }

        let spec = ListSpec {
            table: "stock_items",
            columns: ITEM_COLUMNS,
            search_fields: &["name"],
            sort_fields: &["name", "created_at", "updated_at"],
            default_sort: "created_at",
            filters,
        };

        let page = paginate::<StockItemRow>(&self.db, &spec, query).await?;
        page.try_map(StockItem::try_from)
    }

    /// List a stock item's batches
    pub async fn list_batches(
        &self,
        stock_item_id: Uuid,
        query: &ListQuery,
    ) -> AppResult<Page<Batch>> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM stock_items WHERE id = $1)",
        )
        .bind(stock_item_id)
        .fetch_one(&self.db)
        .await?;
        if !exists {
            return Err(AppError::NotFound("Stock item".to_string()));
        }

        let spec = ListSpec {
            table: "batches",
            columns: BATCH_COLUMNS,
            search_fields: &[],
            sort_fields: &["created_at", "amount", "buy_price"],
            default_sort: "created_at",
            filters: vec![
                Filter::EqUuid("stock_item_id", stock_item_id),
                Filter::EqBool("is_deleted", false),
            ],
        };

        let page = paginate::<BatchRow>(&self.db, &spec, query).await?;
        Ok(page.map(Batch::from))
    }
}

async fn insert_batch(
    tx: &mut Transaction<'_, Postgres>,
    stock_item_id: Uuid,
    amount: Decimal,
    buy_price: Decimal,
    split: &FinanceSplit,
) -> AppResult<Uuid> {
    let id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO batches (stock_item_id, amount, buy_price, total_cost)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(stock_item_id)
    .bind(amount)
    .bind(buy_price)
    .bind(split.total_cost)
    .fetch_one(&mut **tx)
    .await?;

    Ok(id)
}

/// Write the payment and debt rows for a fresh batch event
async fn insert_postings(
    tx: &mut Transaction<'_, Postgres>,
    movement_id: Uuid,
    split: &FinanceSplit,
    payer_id: Uuid,
    supplier_id: Uuid,
    payment_type: PaymentType,
) -> AppResult<()> {
    if split.paid > Decimal::ZERO {
        sqlx::query(
            r#"
            INSERT INTO payments (amount, from_party, to_party, payment_type, movement_id)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(split.paid)
        .bind(payer_id)
        .bind(supplier_id)
        .bind(payment_type.as_str())
        .bind(movement_id)
        .execute(&mut **tx)
        .await?;
    }

    if split.debt > Decimal::ZERO {
        sqlx::query(
            r#"
            INSERT INTO debts (amount, from_party, to_party, movement_id)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(split.debt)
        .bind(supplier_id)
        .bind(payer_id)
        .bind(movement_id)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

enum Posting {
    Payment(PaymentType),
    Debt,
}

/// Bring one pinned reconciliation row in line with its target amount
async fn reconcile_posting(
    tx: &mut Transaction<'_, Postgres>,
    posting: Posting,
    pinned: Option<&PostingRow>,
    target: Decimal,
    movement_id: Uuid,
    from_party: Uuid,
    to_party: Uuid,
) -> AppResult<()> {
    let table = match posting {
        Posting::Payment(_) => "payments",
        Posting::Debt => "debts",
    };

    match (pinned, PostingChange::plan(pinned.is_some(), target)) {
        (Some(row), PostingChange::Set(amount)) => {
            let result = sqlx::query(&format!(
                "UPDATE {} SET amount = $1, from_party = $2, to_party = $3 WHERE id = $4",
                table
            ))
            .bind(amount)
            .bind(from_party)
            .bind(to_party)
            .bind(row.id)
            .execute(&mut **tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(AppError::InvariantViolation(format!(
                    "{} row for movement {} vanished during reconciliation",
                    table, movement_id
                )));
            }
        }
        (Some(_), PostingChange::Remove) => {
            sqlx::query(&format!("DELETE FROM {} WHERE movement_id = $1", table))
                .bind(movement_id)
                .execute(&mut **tx)
                .await?;
        }
        (None, PostingChange::Create(amount)) => match posting {
            Posting::Payment(payment_type) => {
                sqlx::query(
                    r#"
                    INSERT INTO payments (amount, from_party, to_party, payment_type, movement_id)
                    VALUES ($1, $2, $3, $4, $5)
                    "#,
                )
                .bind(amount)
                .bind(from_party)
                .bind(to_party)
                .bind(payment_type.as_str())
                .bind(movement_id)
                .execute(&mut **tx)
                .await?;
            }
            Posting::Debt => {
                sqlx::query(
                    r#"
                    INSERT INTO debts (amount, from_party, to_party, movement_id)
                    VALUES ($1, $2, $3, $4)
                    "#,
                )
                .bind(amount)
                .bind(from_party)
                .bind(to_party)
                .bind(movement_id)
                .execute(&mut **tx)
                .await?;
            }
        },
        _ => {}
    }

    Ok(())
}
