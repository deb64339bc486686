//! Common enums used across the ledger

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Measurement unit for stock quantities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MeasurementUnit {
    Kg,
    Unit,
}

impl MeasurementUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementUnit::Kg => "KG",
            MeasurementUnit::Unit => "UNIT",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "KG" => Some(MeasurementUnit::Kg),
            "UNIT" => Some(MeasurementUnit::Unit),
            _ => None,
        }
    }
}

/// Kind of stock item
///
/// Raw materials and products share one model and one movement-log action
/// enum; the kind tag is what tells them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockKind {
    RawMaterial,
    Product,
}

impl StockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockKind::RawMaterial => "RAW_MATERIAL",
            StockKind::Product => "PRODUCT",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "RAW_MATERIAL" => Some(StockKind::RawMaterial),
            "PRODUCT" => Some(StockKind::Product),
            _ => None,
        }
    }
}

/// How a payment was made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentType {
    Cash,
    Card,
    Transfer,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Cash => "CASH",
            PaymentType::Card => "CARD",
            PaymentType::Transfer => "TRANSFER",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CASH" => Some(PaymentType::Cash),
            "CARD" => Some(PaymentType::Card),
            "TRANSFER" => Some(PaymentType::Transfer),
            _ => None,
        }
    }
}

/// Kind of ledger party
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyKind {
    Supplier,
    Client,
    Staff,
}

impl PartyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartyKind::Supplier => "supplier",
            PartyKind::Client => "client",
            PartyKind::Staff => "staff",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "supplier" => Some(PartyKind::Supplier),
            "client" => Some(PartyKind::Client),
            "staff" => Some(PartyKind::Staff),
            _ => None,
        }
    }
}

/// Typed action recorded in the movement log
///
/// One enum serves both raw materials and products; the `StockKind` on the
/// referenced item disambiguates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementAction {
    Add,
    AddBatch,
    Change,
    ChangeBatch,
    Delete,
    DeleteBatch,
}

impl MovementAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementAction::Add => "ADD",
            MovementAction::AddBatch => "ADD_BATCH",
            MovementAction::Change => "CHANGE",
            MovementAction::ChangeBatch => "CHANGE_BATCH",
            MovementAction::Delete => "DELETE",
            MovementAction::DeleteBatch => "DELETE_BATCH",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ADD" => Some(MovementAction::Add),
            "ADD_BATCH" => Some(MovementAction::AddBatch),
            "CHANGE" => Some(MovementAction::Change),
            "CHANGE_BATCH" => Some(MovementAction::ChangeBatch),
            "DELETE" => Some(MovementAction::Delete),
            "DELETE_BATCH" => Some(MovementAction::DeleteBatch),
            _ => None,
        }
    }
}

/// Correlation reference carried by every Payment and Debt row
///
/// A ledger posting belongs to exactly one event: either a sale transaction
/// or a movement-log entry. Modeling this as a sum type (rather than two
/// nullable foreign keys) makes the both-set and both-null states
/// unrepresentable in application code; the storage layer mirrors it with a
/// CHECK constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum CorrelationRef {
    Sale(Uuid),
    Movement(Uuid),
}

impl CorrelationRef {
    /// Split into the `(sale_id, movement_id)` column pair
    pub fn into_columns(self) -> (Option<Uuid>, Option<Uuid>) {
        match self {
            CorrelationRef::Sale(id) => (Some(id), None),
            CorrelationRef::Movement(id) => (None, Some(id)),
        }
    }

    /// Rebuild from the column pair, rejecting both-set and both-null rows
    pub fn from_columns(
        sale_id: Option<Uuid>,
        movement_id: Option<Uuid>,
    ) -> Result<Self, String> {
        match (sale_id, movement_id) {
            (Some(id), None) => Ok(CorrelationRef::Sale(id)),
            (None, Some(id)) => Ok(CorrelationRef::Movement(id)),
            (Some(_), Some(_)) => Err("posting references both a sale and a movement".to_string()),
            (None, None) => Err("posting references neither a sale nor a movement".to_string()),
        }
    }

    pub fn movement_id(&self) -> Option<Uuid> {
        match self {
            CorrelationRef::Movement(id) => Some(*id),
            CorrelationRef::Sale(_) => None,
        }
    }

    pub fn sale_id(&self) -> Option<Uuid> {
        match self {
            CorrelationRef::Sale(id) => Some(*id),
            CorrelationRef::Movement(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correlation_round_trips_through_columns() {
        let id = Uuid::new_v4();
        let (sale, movement) = CorrelationRef::Movement(id).into_columns();
        assert_eq!(sale, None);
        assert_eq!(movement, Some(id));
        assert_eq!(
            CorrelationRef::from_columns(sale, movement),
            Ok(CorrelationRef::Movement(id))
        );
    }

    #[test]
    fn correlation_rejects_both_set_and_both_null() {
        let id = Uuid::new_v4();
        assert!(CorrelationRef::from_columns(Some(id), Some(id)).is_err());
        assert!(CorrelationRef::from_columns(None, None).is_err());
    }

    #[test]
    fn movement_action_labels_are_stable() {
        for action in [
            MovementAction::Add,
            MovementAction::AddBatch,
            MovementAction::Change,
            MovementAction::ChangeBatch,
            MovementAction::Delete,
            MovementAction::DeleteBatch,
        ] {
            assert_eq!(MovementAction::parse(action.as_str()), Some(action));
        }
        // underscore spelling only; the dashed variant is not accepted
        assert_eq!(MovementAction::parse("CHANGE-BATCH"), None);
    }
}
