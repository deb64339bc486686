//! Party referential checks
//!
//! Party management (CRUD, contact data) belongs to a collaborator outside
//! the ledger. The coordinator only ever asks one question: does this id
//! reference an active party of the expected kind?

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::PartyKind;

#[derive(Clone)]
pub struct PartyService {
    db: PgPool,
}

impl PartyService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Fail with a referential error unless the party exists, is active,
    /// and (when given) has the expected kind
    pub async fn ensure_active(
        &self,
        party_id: Uuid,
        expected_kind: Option<PartyKind>,
        label: &str,
    ) -> AppResult<()> {
        let row = sqlx::query_as::<_, (String, bool)>(
            "SELECT kind, is_active FROM parties WHERE id = $1",
        )
        .bind(party_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound(label.to_string()))?;

        if !row.1 {
            return Err(AppError::InactiveParty(label.to_string()));
        }

        if let Some(expected) = expected_kind {
            if PartyKind::parse(&row.0) != Some(expected) {
                return Err(AppError::Validation {
                    field: label.to_lowercase().replace(' ', "_"),
                    message: format!("{} is not a {}", label, expected.as_str()),
                });
            }
        }

        Ok(())
    }
}
