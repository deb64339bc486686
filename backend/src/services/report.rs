//! KPI aggregation engine
//!
//! Read-only rollups over the ledger for one time window. Window bounds
//! use the same inclusive-day semantics as the list filters; two calls
//! over identical data return identical numbers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;

use crate::error::AppResult;
use shared::{
    day_bounds, AdminBalances, KpiReport, MeasurementUnit, StockKind, StockTotals,
};

#[derive(Clone)]
pub struct ReportService {
    db: PgPool,
}

/// Window parameters for the KPI query; both ends optional
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub created_from: Option<String>,
    pub created_to: Option<String>,
}

impl ReportService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Full KPI rollup: stock totals, profit, and outstanding balances
    pub async fn kpi(&self, query: &ReportQuery) -> AppResult<KpiReport> {
        let (from, to) = day_bounds(query.created_from.as_deref(), query.created_to.as_deref());

        let stock = self.stock_totals(from, to).await?;
        let total_profit = self.total_profit(from, to).await?;
        let admin = self.admin_balances(from, to).await?;

        Ok(KpiReport {
            stock,
            total_profit,
            admin,
        })
    }

    /// Remaining quantity per kind and unit: batch amounts minus what has
    /// been sold, over active batches of non-deleted items
    async fn stock_totals(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> AppResult<StockTotals> {
        let rows = sqlx::query_as::<_, (String, String, Decimal)>(
            r#"
            SELECT i.kind, i.unit,
                   COALESCE(SUM(b.amount), 0) - COALESCE(SUM(s.total_sold), 0) AS remaining
            FROM stock_items i
            JOIN batches b ON b.stock_item_id = i.id AND b.is_deleted = FALSE
            LEFT JOIN (
                SELECT batch_id, SUM(sold_amount) AS total_sold
                FROM sales
                GROUP BY batch_id
            ) s ON s.batch_id = b.id
            WHERE i.is_deleted = FALSE
              AND ($1::timestamptz IS NULL OR b.created_at >= $1)
              AND ($2::timestamptz IS NULL OR b.created_at <= $2)
            GROUP BY i.kind, i.unit
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.db)
        .await?;

        let mut totals = StockTotals::default();
        for (kind, unit, remaining) in rows {
            if let (Some(kind), Some(unit)) =
                (StockKind::parse(&kind), MeasurementUnit::parse(&unit))
            {
                totals.add(kind, unit, remaining);
            }
        }

        Ok(totals)
    }

    /// Profit over sales whose timestamp falls inside the window
    async fn total_profit(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> AppResult<Decimal> {
        let profit = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM((s.sell_price - b.buy_price) * s.sold_amount), 0)
            FROM sales s
            JOIN batches b ON b.id = s.batch_id
            WHERE ($1::timestamptz IS NULL OR s.created_at >= $1)
              AND ($2::timestamptz IS NULL OR s.created_at <= $2)
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.db)
        .await?;

        Ok(profit)
    }

    /// Outstanding balances, split by the debt's correlation side
    ///
    /// Debt rows are kept reconciled by their writers, so their sum is the
    /// outstanding amount: movement-correlated debts are what the
    /// organization owes suppliers, sale-correlated debts are what clients
    /// owe the organization.
    async fn admin_balances(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> AppResult<AdminBalances> {
        let total_debt_from_suppliers = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(d.amount), 0)
            FROM debts d
            JOIN parties p ON p.id = d.from_party
            WHERE d.movement_id IS NOT NULL
              AND p.kind = 'supplier'
              AND ($1::timestamptz IS NULL OR d.created_at >= $1)
              AND ($2::timestamptz IS NULL OR d.created_at <= $2)
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.db)
        .await?;

        let total_credit_from_clients = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(d.amount), 0)
            FROM debts d
            JOIN parties p ON p.id = d.from_party
            WHERE d.sale_id IS NOT NULL
              AND p.kind = 'client'
              AND ($1::timestamptz IS NULL OR d.created_at >= $1)
              AND ($2::timestamptz IS NULL OR d.created_at <= $2)
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.db)
        .await?;

        Ok(AdminBalances {
            total_debt_from_suppliers,
            total_credit_from_clients,
        })
    }
}
