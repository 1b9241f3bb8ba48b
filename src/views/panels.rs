//! Work order detail panels: notes, parts, timeline and summary

use chrono::{DateTime, Local, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Instant;
use thiserror::Error;

use crate::core::client::{ApiError, Transport};
use crate::core::debounce::Debouncer;
use crate::core::store::{QueryState, Store};
use crate::entities::{Note, Part, PartId, Summary, TimelineEvent, WorkOrder, WorkOrderStatus};
use crate::views::{failed_message, ViewState};

pub const NO_NOTES: &str = "No notes yet.";
pub const NO_EVENTS: &str = "No events yet.";
pub const NO_PARTS: &str = "No parts found.";

pub const ATTACH_LABEL: &str = "Attach";
pub const ATTACH_DISABLED_LABEL: &str = "Only in progress";

fn timestamp(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

// Notes

#[derive(Debug, Clone, PartialEq)]
pub struct NoteLine {
    /// "author • timestamp"
    pub header: String,
    pub message: String,
}

impl From<&Note> for NoteLine {
    fn from(note: &Note) -> Self {
        let when = timestamp(note.created_at);
        let header = if when.is_empty() {
            note.author.clone()
        } else {
            format!("{} • {}", note.author, when)
        };
        NoteLine {
            header,
            message: note.message.clone(),
        }
    }
}

pub fn notes(state: &QueryState<Vec<Note>>) -> ViewState<NoteLine> {
    ViewState::from_query(state, "notes", NO_NOTES, |n| NoteLine::from(n))
}

// Timeline

/// "timestamp event_type — details"
pub fn timeline_line(event: &TimelineEvent) -> String {
    let mut line = timestamp(event.created_at);
    if !line.is_empty() {
        line.push(' ');
    }
    line.push_str(&event.event_type);
    if let Some(details) = event.details.as_deref().filter(|d| !d.is_empty()) {
        line.push_str(" — ");
        line.push_str(details);
    }
    line
}

pub fn timeline(state: &QueryState<Vec<TimelineEvent>>) -> ViewState<String> {
    ViewState::from_query(state, "timeline", NO_EVENTS, timeline_line)
}

// Summary

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryCard {
    pub parts: i64,
    pub labor_hours: String,
    pub notes: i64,
}

impl From<&Summary> for SummaryCard {
    fn from(summary: &Summary) -> Self {
        SummaryCard {
            parts: summary.parts(),
            labor_hours: summary.labor_display(),
            notes: summary.notes(),
        }
    }
}

/// Summary panel: a single card rather than a list
pub fn summary(state: &QueryState<Summary>) -> Result<Option<SummaryCard>, String> {
    match state {
        QueryState::Idle => Ok(None),
        QueryState::Failed(message) => Err(failed_message("summary", message)),
        QueryState::Ready(summary) => Ok(Some(SummaryCard::from(summary))),
    }
}

// Parts

#[derive(Debug, Error)]
pub enum PartsError {
    #[error("Parts can only be attached while the work order is in progress (it is {0})")]
    NotInProgress(WorkOrderStatus),

    #[error("Quantity must be at least 1")]
    InvalidQuantity,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Whether parts may be attached to an order in `status`
pub fn attach_enabled(status: WorkOrderStatus) -> bool {
    status == WorkOrderStatus::InProgress
}

/// Attach button label for an order in `status`
pub fn attach_label(status: WorkOrderStatus) -> &'static str {
    if attach_enabled(status) {
        ATTACH_LABEL
    } else {
        ATTACH_DISABLED_LABEL
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartRow {
    pub id: PartId,
    pub part_number: String,
    pub part_name: String,
    pub stock_qty: i64,
    pub cost: String,
    pub qty: u32,
}

/// Parts search and attach state for one work order
#[derive(Debug)]
pub struct PartsPanel {
    search: Debouncer,
    results: QueryState<Vec<Part>>,
    quantities: HashMap<PartId, u32>,
}

impl Default for PartsPanel {
    fn default() -> Self {
        Self {
            search: Debouncer::default(),
            results: QueryState::Ready(Vec::new()),
            quantities: HashMap::new(),
        }
    }
}

impl PartsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a keystroke in the search box
    pub fn set_query(&mut self, query: &str, now: Instant) {
        self.search.set_query(query, now);
    }

    /// Run the search once the query has settled; returns whether a search ran
    pub fn tick<T: Transport>(&mut self, store: &Store<'_, T>, now: Instant) -> bool {
        match self.search.poll(now).map(str::to_string) {
            Some(query) => {
                self.run(store, &query);
                true
            }
            None => false,
        }
    }

    /// Settle and run the pending query immediately (Enter pressed)
    ///
    /// After a failed search, Enter on the same query retries it.
    pub fn submit<T: Transport>(&mut self, store: &Store<'_, T>) -> bool {
        let failed = matches!(self.results, QueryState::Failed(_));
        let query = match self.search.flush().map(str::to_string) {
            Some(query) => query,
            None if failed => self.search.settled().to_string(),
            None => return false,
        };
        self.run(store, &query);
        true
    }

    fn run<T: Transport>(&mut self, store: &Store<'_, T>, query: &str) {
        if query.is_empty() {
            self.results = QueryState::Ready(Vec::new());
            return;
        }
        self.results = match store.client().search_parts(query) {
            Ok(parts) => QueryState::Ready(parts),
            Err(e) => QueryState::Failed(e.to_string()),
        };
    }

    pub fn query(&self) -> &str {
        self.search.settled()
    }

    /// Quantity for a part; defaults to 1
    pub fn quantity(&self, part: PartId) -> u32 {
        self.quantities.get(&part).copied().unwrap_or(1)
    }

    /// Set a part's quantity, clamped to at least 1
    pub fn set_quantity(&mut self, part: PartId, qty: u32) {
        self.quantities.insert(part, qty.max(1));
    }

    pub fn results(&self) -> ViewState<PartRow> {
        if self.search.settled().is_empty() {
            return ViewState::Empty(NO_PARTS);
        }
        ViewState::from_query(&self.results, "parts", NO_PARTS, |p: &Part| PartRow {
            id: p.id,
            part_number: p.part_number.clone(),
            part_name: p.part_name.clone(),
            stock_qty: p.stock_qty,
            cost: p.cost_display(),
            qty: self.quantity(p.id),
        })
    }

    /// Attach a part using the panel's quantity for it
    ///
    /// The guard reads the parent order's current status, never panel state.
    pub fn attach<T: Transport>(
        &self,
        store: &mut Store<'_, T>,
        work_order: &WorkOrder,
        part: PartId,
    ) -> Result<Value, PartsError> {
        attach_part(store, work_order, part, self.quantity(part))
    }
}

/// Attach `qty` of `part` to `work_order`, refusing unless it is in progress
pub fn attach_part<T: Transport>(
    store: &mut Store<'_, T>,
    work_order: &WorkOrder,
    part: PartId,
    qty: u32,
) -> Result<Value, PartsError> {
    let status = work_order.lifecycle_status();
    if !attach_enabled(status) {
        return Err(PartsError::NotInProgress(status));
    }
    if qty < 1 {
        return Err(PartsError::InvalidQuantity);
    }
    Ok(store.attach_part(work_order.id, part, qty)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::testing::fake_client;
    use crate::core::client::{ApiResponse, Method};
    use crate::core::debounce::SEARCH_DEBOUNCE;
    use serde_json::json;
    use std::time::Duration;

    fn order(status: &str, on_hold: bool) -> WorkOrder {
        serde_json::from_value(json!({
            "id": 5, "unit_id": 1, "title": "Brakes", "status": status, "on_hold": on_hold
        }))
        .unwrap()
    }

    #[test]
    fn test_attach_gated_on_in_progress() {
        assert_eq!(attach_label(WorkOrderStatus::InProgress), "Attach");
        for status in [
            WorkOrderStatus::Pending,
            WorkOrderStatus::OnHold,
            WorkOrderStatus::Completed,
            WorkOrderStatus::Canceled,
        ] {
            assert!(!attach_enabled(status));
            assert_eq!(attach_label(status), "Only in progress");
        }
    }

    #[test]
    fn test_attach_refused_without_request() {
        let client = fake_client();
        let mut store = Store::new(&client);
        let mut panel = PartsPanel::new();
        panel.set_quantity(11, 3);

        for wo in [order("pending", false), order("in_progress", true)] {
            assert!(matches!(
                panel.attach(&mut store, &wo, 11),
                Err(PartsError::NotInProgress(_))
            ));
        }
        assert_eq!(client.transport().total(), 0);
    }

    #[test]
    fn test_attach_posts_quantity() {
        let client = fake_client();
        client
            .transport()
            .json(Method::Post, "/work-orders/5/parts", json!({"ok": true}));
        let mut store = Store::new(&client);
        let mut panel = PartsPanel::new();
        panel.set_quantity(11, 0);
        assert_eq!(panel.quantity(11), 1);
        panel.set_quantity(11, 2);

        panel.attach(&mut store, &order("in_progress", false), 11).unwrap();
        assert_eq!(
            client.transport().requests()[0].body,
            Some(json!({"part_id": 11, "qty": 2}))
        );
        assert!(matches!(
            attach_part(&mut store, &order("in_progress", false), 11, 0),
            Err(PartsError::InvalidQuantity)
        ));
    }

    #[test]
    fn test_search_is_debounced() {
        let client = fake_client();
        client.transport().json(
            Method::Get,
            "/parts/search?q=brake",
            json!([{"id": 11, "part_number": "BRK-22", "part_name": "Brake pad", "stock_qty": 4, "unit_cost": 18}]),
        );
        let store = Store::new(&client);
        let mut panel = PartsPanel::new();
        let t0 = Instant::now();

        panel.set_query("br", t0);
        panel.set_query("brake", t0 + Duration::from_millis(100));
        assert!(!panel.tick(&store, t0 + Duration::from_millis(200)));
        assert!(panel.tick(&store, t0 + Duration::from_millis(100) + SEARCH_DEBOUNCE));

        assert_eq!(client.transport().total(), 1);
        let view = panel.results();
        assert_eq!(view.rows()[0].cost, "$18.00");
        assert_eq!(view.rows()[0].qty, 1);
    }

    #[test]
    fn test_empty_query_issues_no_request() {
        let client = fake_client();
        let store = Store::new(&client);
        let mut panel = PartsPanel::new();
        panel.set_query("   ", Instant::now());
        panel.submit(&store);
        assert_eq!(client.transport().total(), 0);
        assert_eq!(panel.results(), ViewState::Empty(NO_PARTS));
    }

    #[test]
    fn test_failed_search_retries_on_enter() {
        let client = fake_client();
        client
            .transport()
            .respond(Method::Get, "/parts/search?q=pad", ApiResponse::text(503, "busy"))
            .json(
                Method::Get,
                "/parts/search?q=pad",
                json!([{"id": 11, "part_number": "BRK-22", "part_name": "Brake pad"}]),
            );
        let store = Store::new(&client);
        let mut panel = PartsPanel::new();

        panel.set_query("pad", Instant::now());
        assert!(panel.submit(&store));
        assert!(matches!(panel.results(), ViewState::Failed(_)));

        panel.set_query("pad", Instant::now());
        assert!(panel.submit(&store));
        assert_eq!(client.transport().count(Method::Get, "/parts/search?q=pad"), 2);
        assert_eq!(panel.results().rows().len(), 1);

        // A settled, successful query is not re-sent
        panel.set_query("pad", Instant::now());
        assert!(!panel.submit(&store));
        assert_eq!(client.transport().total(), 2);
    }

    #[test]
    fn test_timeline_and_notes_lines() {
        let event: TimelineEvent = serde_json::from_value(json!({
            "id": 1, "event_type": "started", "details": "odometer 54000"
        }))
        .unwrap();
        assert_eq!(timeline_line(&event), "started — odometer 54000");

        let view = timeline(&QueryState::Ready(vec![]));
        assert_eq!(view, ViewState::Empty(NO_EVENTS));

        let note: Note = serde_json::from_value(json!({"id": 1, "author": "Owner", "text": "hi"})).unwrap();
        let line = NoteLine::from(&note);
        assert_eq!(line.header, "Owner");
        assert_eq!(line.message, "hi");
    }

    #[test]
    fn test_summary_card() {
        let s = Summary {
            total_parts: Some(3),
            labor_hours: Some(2.0),
            ..Default::default()
        };
        let card = summary(&QueryState::Ready(s)).unwrap().unwrap();
        assert_eq!(card.parts, 3);
        assert_eq!(card.labor_hours, "2.0");
        assert_eq!(card.notes, 0);
        assert_eq!(
            summary(&QueryState::Failed("x".to_string())).unwrap_err(),
            "Failed to load summary: x"
        );
    }
}
