//! Actor identity extraction
//!
//! Authentication is handled by the gateway in front of this service; by
//! the time a request reaches the ledger the authenticated staff member's
//! id has been placed in the `x-actor-id` header. This extractor surfaces
//! it to handlers and rejects requests that arrive without one.

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::AppError;

/// The authenticated actor performing the current request
#[derive(Clone, Copy, Debug)]
pub struct CurrentActor(pub Uuid);

pub const ACTOR_HEADER: &str = "x-actor-id";

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentActor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing actor identity".to_string()))?;

        let actor_id = Uuid::parse_str(header)
            .map_err(|_| AppError::Unauthorized("Invalid actor identity".to_string()))?;

        Ok(CurrentActor(actor_id))
    }
}
