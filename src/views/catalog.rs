//! Units and mechanics lists

use crate::core::store::QueryState;
use crate::entities::{Mechanic, MechanicId, Unit, UnitId};
use crate::views::{ViewState, DASH};

pub const NO_UNITS: &str = "No units found.";
pub const NO_MECHANICS: &str = "No mechanics found.";

#[derive(Debug, Clone, PartialEq)]
pub struct UnitRow {
    pub id: UnitId,
    pub unit_number: String,
    pub unit_type: String,
    pub odometer: String,
    pub status: String,
}

impl From<&Unit> for UnitRow {
    fn from(unit: &Unit) -> Self {
        UnitRow {
            id: unit.id,
            unit_number: unit.unit_number.clone(),
            unit_type: unit
                .unit_type
                .map_or_else(|| DASH.to_string(), |t| t.to_string()),
            odometer: unit
                .odometer
                .map_or_else(|| DASH.to_string(), |km| format!("{} km", km)),
            status: unit
                .status
                .clone()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "unknown".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MechanicRow {
    pub id: MechanicId,
    pub name: String,
    pub email: String,
    pub status: String,
    pub hourly_rate: Option<f64>,
}

impl From<&Mechanic> for MechanicRow {
    fn from(mechanic: &Mechanic) -> Self {
        MechanicRow {
            id: mechanic.id,
            name: mechanic.name.clone(),
            email: mechanic
                .email
                .clone()
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| DASH.to_string()),
            status: mechanic.status_label(),
            hourly_rate: mechanic.hourly_rate,
        }
    }
}

pub fn units(state: &QueryState<Vec<Unit>>) -> ViewState<UnitRow> {
    ViewState::from_query(state, "units", NO_UNITS, |u| UnitRow::from(u))
}

pub fn mechanics(state: &QueryState<Vec<Mechanic>>) -> ViewState<MechanicRow> {
    ViewState::from_query(state, "mechanics", NO_MECHANICS, |m| MechanicRow::from(m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unit_rows() {
        let list: Vec<Unit> = serde_json::from_value(json!([
            {"id": 7, "unit_number": "T-104"},
            {"id": 8, "unit_number": "R-2", "type": "reefer", "odometer": 120500, "status": "in_service"}
        ]))
        .unwrap();
        let view = units(&QueryState::Ready(list));
        let rows = view.rows();
        assert_eq!(rows[0].odometer, DASH);
        assert_eq!(rows[0].status, "unknown");
        assert_eq!(rows[1].unit_type, "reefer");
        assert_eq!(rows[1].odometer, "120500 km");
        assert_eq!(rows[1].status, "in_service");
    }

    #[test]
    fn test_mechanic_rows() {
        let list: Vec<Mechanic> = serde_json::from_value(json!([
            {"id": 3, "name": "Dana", "hourly_rate": 42.5},
            {"id": 4, "name": "Lee", "email": "lee@shop.test", "active": false}
        ]))
        .unwrap();
        let view = mechanics(&QueryState::Ready(list));
        let rows = view.rows();
        assert_eq!(rows[0].email, DASH);
        assert_eq!(rows[0].status, "active");
        assert_eq!(rows[0].hourly_rate, Some(42.5));
        assert_eq!(rows[1].status, "inactive");
    }

    #[test]
    fn test_empty_states() {
        assert_eq!(units(&QueryState::Ready(vec![])), ViewState::Empty(NO_UNITS));
        assert_eq!(
            mechanics(&QueryState::Ready(vec![])),
            ViewState::Empty(NO_MECHANICS)
        );
    }
}
