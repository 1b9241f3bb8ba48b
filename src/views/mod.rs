//! View models - what each page and panel shows, independent of the terminal
//!
//! Views turn store state into rows and panel states; the CLI layer decides
//! how to print them.

pub mod catalog;
pub mod dashboards;
pub mod form;
pub mod panels;
pub mod work_orders;

use crate::core::store::QueryState;

/// Placeholder for missing joined or optional values
pub const DASH: &str = "—";

/// Render state shared by every list and panel
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Failed(String),
    Empty(&'static str),
    Ready(Vec<T>),
}

impl<T> ViewState<T> {
    /// Build a view state from a list query, mapping each loaded item
    pub fn from_query<S, F>(
        state: &QueryState<Vec<S>>,
        thing: &str,
        empty: &'static str,
        map: F,
    ) -> Self
    where
        F: FnMut(&S) -> T,
    {
        match state {
            QueryState::Idle => ViewState::Loading,
            QueryState::Failed(message) => ViewState::Failed(failed_message(thing, message)),
            QueryState::Ready(items) if items.is_empty() => ViewState::Empty(empty),
            QueryState::Ready(items) => ViewState::Ready(items.iter().map(map).collect()),
        }
    }

    pub fn rows(&self) -> &[T] {
        match self {
            ViewState::Ready(rows) => rows,
            _ => &[],
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ViewState::Failed(_))
    }

    /// One-line message for non-data states
    pub fn message(&self) -> Option<&str> {
        match self {
            ViewState::Loading => Some("Loading…"),
            ViewState::Failed(message) => Some(message),
            ViewState::Empty(message) => Some(message),
            ViewState::Ready(_) => None,
        }
    }
}

/// "Failed to load <thing>: <cause>"
pub fn failed_message(thing: &str, cause: &str) -> String {
    format!("Failed to load {}: {}", thing, cause)
}
