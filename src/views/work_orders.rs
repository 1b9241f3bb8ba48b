//! Work order list: status tabs, unit join and per-row actions

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::core::lifecycle::{Action, Lifecycle};
use crate::core::store::QueryState;
use crate::entities::{Bay, Priority, Unit, UnitId, WorkOrder, WorkOrderId, WorkOrderStatus};
use crate::views::{ViewState, DASH};

/// Characters of the complaint shown in list rows
pub const COMPLAINT_PREVIEW: usize = 80;

pub const EMPTY_TAB: &str = "No work orders in this tab.";

/// Status tab on the work order board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum Tab {
    #[default]
    Pending,
    #[value(alias = "in_progress")]
    InProgress,
    #[value(alias = "on_hold")]
    OnHold,
    Completed,
    /// Every work order, canceled included
    All,
}

impl Tab {
    /// Tabs shown on the board, in order
    pub const BOARD: [Tab; 4] = [Tab::Pending, Tab::InProgress, Tab::OnHold, Tab::Completed];

    pub fn status(&self) -> Option<WorkOrderStatus> {
        match self {
            Tab::Pending => Some(WorkOrderStatus::Pending),
            Tab::InProgress => Some(WorkOrderStatus::InProgress),
            Tab::OnHold => Some(WorkOrderStatus::OnHold),
            Tab::Completed => Some(WorkOrderStatus::Completed),
            Tab::All => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self.status() {
            Some(status) => status.label(),
            None => "All",
        }
    }

    /// Whether `work_order` belongs in this tab (by normalized status)
    pub fn contains(&self, work_order: &WorkOrder) -> bool {
        match self.status() {
            Some(status) => work_order.lifecycle_status() == status,
            None => true,
        }
    }
}

/// One rendered row of the work order list
#[derive(Debug, Clone, PartialEq)]
pub struct WorkOrderRow {
    pub id: WorkOrderId,
    pub number: String,
    pub unit: String,
    pub title: String,
    pub complaint: String,
    pub priority: Priority,
    pub status: WorkOrderStatus,
    pub bay: Option<Bay>,
    pub opened_at: Option<DateTime<Utc>>,
    pub mechanic: Option<String>,
    pub actions: Vec<Action>,
}

impl WorkOrderRow {
    pub fn bay_display(&self) -> String {
        self.bay.map_or_else(|| "-".to_string(), |b| b.to_string())
    }

    pub fn actions_display(&self) -> String {
        if self.actions.is_empty() {
            return "-".to_string();
        }
        self.actions
            .iter()
            .map(|a| a.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Unit numbers keyed by id, for joining onto work orders
pub fn unit_index(units: &[Unit]) -> HashMap<UnitId, String> {
    units
        .iter()
        .map(|u| (u.id, u.unit_number.clone()))
        .collect()
}

/// Unit label for a work order: its own denormalized number, then the join, then a dash
pub fn unit_label(work_order: &WorkOrder, units: &HashMap<UnitId, String>) -> String {
    work_order
        .unit_number
        .clone()
        .or_else(|| units.get(&work_order.unit_id).cloned())
        .unwrap_or_else(|| DASH.to_string())
}

/// First [`COMPLAINT_PREVIEW`] characters of the complaint
pub fn complaint_preview(complaint: &str) -> String {
    complaint.chars().take(COMPLAINT_PREVIEW).collect()
}

pub fn row(work_order: &WorkOrder, units: &HashMap<UnitId, String>, lifecycle: &Lifecycle) -> WorkOrderRow {
    let status = work_order.lifecycle_status();
    WorkOrderRow {
        id: work_order.id,
        number: work_order.number(),
        unit: unit_label(work_order, units),
        title: work_order.title.clone(),
        complaint: complaint_preview(&work_order.complaint),
        priority: work_order.priority,
        status,
        bay: work_order.bay,
        opened_at: work_order.opened_at,
        mechanic: work_order.mechanic_name.clone(),
        actions: lifecycle.available_actions(status),
    }
}

/// Build the list for one tab
///
/// Units are optional: if the units query failed or is still loading, rows
/// fall back to a dash for the unit column.
pub fn list(
    work_orders: &QueryState<Vec<WorkOrder>>,
    units: &QueryState<Vec<Unit>>,
    tab: Tab,
    lifecycle: &Lifecycle,
) -> ViewState<WorkOrderRow> {
    let index = units.data().map(|u| unit_index(u)).unwrap_or_default();
    match work_orders {
        QueryState::Idle => ViewState::Loading,
        QueryState::Failed(message) => {
            ViewState::Failed(crate::views::failed_message("work orders", message))
        }
        QueryState::Ready(orders) => {
            let rows: Vec<WorkOrderRow> = orders
                .iter()
                .filter(|wo| tab.contains(wo))
                .map(|wo| row(wo, &index, lifecycle))
                .collect();
            if rows.is_empty() {
                ViewState::Empty(EMPTY_TAB)
            } else {
                ViewState::Ready(rows)
            }
        }
    }
}

/// Number of work orders in each board tab
pub fn tab_counts(work_orders: &[WorkOrder]) -> Vec<(Tab, usize)> {
    Tab::BOARD
        .iter()
        .map(|tab| (*tab, work_orders.iter().filter(|wo| tab.contains(wo)).count()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn orders(value: serde_json::Value) -> Vec<WorkOrder> {
        serde_json::from_value(value).unwrap()
    }

    fn units(value: serde_json::Value) -> Vec<Unit> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_pending_row_joins_unit_number() {
        let wos = QueryState::Ready(orders(json!([
            {"id": 1, "status": "pending", "unit_id": 7, "title": "Brake check", "priority": "high"}
        ])));
        let us = QueryState::Ready(units(json!([{"id": 7, "unit_number": "T-104"}])));
        let lc = Lifecycle::new(Some(3));

        let pending = list(&wos, &us, Tab::Pending, &lc);
        let rows = pending.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].unit, "T-104");
        assert_eq!(rows[0].title, "Brake check");
        assert_eq!(rows[0].priority.to_string(), "high");
        assert_eq!(rows[0].actions, vec![Action::Assign, Action::Start]);

        for tab in [Tab::InProgress, Tab::OnHold, Tab::Completed] {
            assert_eq!(list(&wos, &us, tab, &lc), ViewState::Empty(EMPTY_TAB));
        }
    }

    #[test]
    fn test_unit_falls_back_to_dash() {
        let wos = QueryState::Ready(orders(json!([
            {"id": 2, "status": "pending", "unit_id": 99, "title": "Lights"}
        ])));
        let failed_units = QueryState::Failed("down".to_string());
        let view = list(&wos, &failed_units, Tab::Pending, &Lifecycle::default());
        assert_eq!(view.rows()[0].unit, DASH);
        assert!(view.rows()[0].actions.is_empty());
        assert_eq!(view.rows()[0].actions_display(), "-");
        assert_eq!(view.rows()[0].bay_display(), "-");
    }

    #[test]
    fn test_tabs_use_normalized_status() {
        let wos = orders(json!([
            {"id": 1, "status": "in_progress", "on_hold": true, "unit_id": 1, "title": "a"},
            {"id": 2, "status": "on-hold", "unit_id": 1, "title": "b"},
            {"id": 3, "status": "in_progress", "unit_id": 1, "title": "c"},
            {"id": 4, "status": "canceled", "unit_id": 1, "title": "d"}
        ]));
        let counts = tab_counts(&wos);
        assert_eq!(
            counts,
            vec![
                (Tab::Pending, 0),
                (Tab::InProgress, 1),
                (Tab::OnHold, 2),
                (Tab::Completed, 0)
            ]
        );

        let all = list(
            &QueryState::Ready(wos),
            &QueryState::Idle,
            Tab::All,
            &Lifecycle::default(),
        );
        assert_eq!(all.rows().len(), 4);
    }

    #[test]
    fn test_complaint_preview_counts_chars() {
        let long = "é".repeat(100);
        assert_eq!(complaint_preview(&long).chars().count(), 80);
        assert_eq!(complaint_preview("short"), "short");
    }

    #[test]
    fn test_failed_list_message() {
        let view = list(
            &QueryState::Failed("Fetch /work-orders failed: 500 boom".to_string()),
            &QueryState::Idle,
            Tab::Pending,
            &Lifecycle::default(),
        );
        assert!(view.is_failed());
        assert_eq!(
            view.message(),
            Some("Failed to load work orders: Fetch /work-orders failed: 500 boom")
        );
    }
}
