//! Unit entity - a fleet vehicle that work orders are opened against

use serde::{Deserialize, Serialize};

use crate::entities::lenient;

pub type UnitId = i64;

/// Vehicle type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    Truck,
    Reefer,
    /// Any type this client does not know; never sent
    #[serde(other)]
    Other,
}

impl std::fmt::Display for UnitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitType::Truck => write!(f, "truck"),
            UnitType::Reefer => write!(f, "reefer"),
            UnitType::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for UnitType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "truck" => Ok(UnitType::Truck),
            "reefer" => Ok(UnitType::Reefer),
            _ => Err(format!("Invalid unit type: {}. Use truck or reefer", s)),
        }
    }
}

/// A fleet unit as returned by the API
///
/// Status and odometer are mutated by backend events; only identity is stable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,

    pub unit_number: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub unit_type: Option<UnitType>,

    #[serde(
        default,
        deserialize_with = "lenient::opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub odometer: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Body for `POST /units`
#[derive(Debug, Clone, Serialize)]
pub struct NewUnit {
    pub unit_number: String,
    #[serde(rename = "type")]
    pub unit_type: UnitType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub odometer: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_minimal() {
        let unit: Unit = serde_json::from_str(r#"{"id":7,"unit_number":"T-104"}"#).unwrap();
        assert_eq!(unit.unit_number, "T-104");
        assert!(unit.unit_type.is_none());
        assert!(unit.odometer.is_none());
    }

    #[test]
    fn test_unit_type_field_name() {
        let unit: Unit = serde_json::from_str(
            r#"{"id":1,"unit_number":"R-9","type":"reefer","odometer":120000,"status":"active"}"#,
        )
        .unwrap();
        assert_eq!(unit.unit_type, Some(UnitType::Reefer));

        let unit: Unit =
            serde_json::from_str(r#"{"id":2,"unit_number":"TR-1","type":"trailer","odometer":"9100"}"#)
                .unwrap();
        assert_eq!(unit.unit_type, Some(UnitType::Other));
        assert_eq!(unit.odometer, Some(9100));
        assert!("other".parse::<UnitType>().is_err());

        let body = NewUnit {
            unit_number: "T-1".to_string(),
            unit_type: UnitType::Truck,
            odometer: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["type"], "truck");
        assert!(json.get("odometer").is_none());
    }
}
