//! Read side of the payment/debt ledger
//!
//! Payment and debt rows are written only by the transaction coordinator;
//! this service exposes them for listing. Rows are decoded through
//! [`CorrelationRef`], so a corrupt both-set or both-null reference is
//! surfaced instead of silently passed along.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::pagination::{paginate, ListSpec};
use shared::{CorrelationRef, Debt, ListQuery, Page, Payment, PaymentType};

#[derive(Clone)]
pub struct LedgerService {
    db: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    amount: Decimal,
    from_party: Uuid,
    to_party: Uuid,
    payment_type: String,
    sale_id: Option<Uuid>,
    movement_id: Option<Uuid>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct DebtRow {
    id: Uuid,
    amount: Decimal,
    from_party: Uuid,
    to_party: Uuid,
    sale_id: Option<Uuid>,
    movement_id: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = AppError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        let correlation = CorrelationRef::from_columns(row.sale_id, row.movement_id)
            .map_err(|msg| AppError::InternalError(anyhow::anyhow!("payment {}: {}", row.id, msg)))?;
        let payment_type = PaymentType::parse(&row.payment_type).ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!(
                "unknown payment type '{}' in row {}",
                row.payment_type,
                row.id
            ))
        })?;
        Ok(Payment {
            id: row.id,
            amount: row.amount,
            from_party: row.from_party,
            to_party: row.to_party,
            payment_type,
            correlation,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<DebtRow> for Debt {
    type Error = AppError;

    fn try_from(row: DebtRow) -> Result<Self, Self::Error> {
        let correlation = CorrelationRef::from_columns(row.sale_id, row.movement_id)
            .map_err(|msg| AppError::InternalError(anyhow::anyhow!("debt {}: {}", row.id, msg)))?;
        Ok(Debt {
            id: row.id,
            amount: row.amount,
            from_party: row.from_party,
            to_party: row.to_party,
            correlation,
            created_at: row.created_at,
        })
    }
}

impl LedgerService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list_payments(&self, query: &ListQuery) -> AppResult<Page<Payment>> {
        let spec = ListSpec {
            table: "payments",
            columns:
                "id, amount, from_party, to_party, payment_type, sale_id, movement_id, created_at",
            search_fields: &["payment_type"],
            sort_fields: &["created_at", "amount"],
            default_sort: "created_at",
            filters: vec![],
        };

        let page = paginate::<PaymentRow>(&self.db, &spec, query).await?;
        page.try_map(Payment::try_from)
    }

    pub async fn list_debts(&self, query: &ListQuery) -> AppResult<Page<Debt>> {
        let spec = ListSpec {
            table: "debts",
            columns: "id, amount, from_party, to_party, sale_id, movement_id, created_at",
            search_fields: &[],
            sort_fields: &["created_at", "amount"],
            default_sort: "created_at",
            filters: vec![],
        };

        let page = paginate::<DebtRow>(&self.db, &spec, query).await?;
        page.try_map(Debt::try_from)
    }
}
