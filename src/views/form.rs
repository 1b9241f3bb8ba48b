//! Creation forms: work orders, notes and units
//!
//! A draft that fails validation never reaches the client; the submit is
//! "disabled" and the caller gets a [`FormError`] naming what is missing.

use serde_json::Value;
use thiserror::Error;

use crate::core::client::{ApiError, Transport};
use crate::core::store::Store;
use crate::entities::{
    Bay, Category, NewUnit, NewWorkOrder, Priority, UnitId, UnitType, WorkOrderId,
};

#[derive(Debug, Error)]
pub enum FormError {
    #[error("Choose a unit for the work order")]
    MissingUnit,

    #[error("Title is required")]
    MissingTitle,

    #[error("Complaint is required")]
    MissingComplaint,

    #[error("Note text is required")]
    EmptyNote,

    #[error("Unit number is required")]
    MissingUnitNumber,

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl FormError {
    /// Whether the error was caught before any request was sent
    pub fn is_validation(&self) -> bool {
        !matches!(self, FormError::Api(_))
    }
}

/// New work order form state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkOrderDraft {
    pub unit_id: Option<UnitId>,
    pub title: String,
    pub complaint: String,
    pub priority: Priority,
    pub category: Category,
    pub bay: Option<Bay>,
}

impl WorkOrderDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// The request body, or the first missing field
    pub fn validate(&self) -> Result<NewWorkOrder, FormError> {
        let unit_id = self.unit_id.ok_or(FormError::MissingUnit)?;
        let title = self.title.trim();
        if title.is_empty() {
            return Err(FormError::MissingTitle);
        }
        let complaint = self.complaint.trim();
        if complaint.is_empty() {
            return Err(FormError::MissingComplaint);
        }
        Ok(NewWorkOrder {
            unit_id,
            title: title.to_string(),
            complaint: complaint.to_string(),
            priority: self.priority,
            category: self.category,
            bay: self.bay,
        })
    }

    /// Whether the create button is enabled
    pub fn can_submit(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Create the work order; the draft is reset only on success
    pub fn submit<T: Transport>(&mut self, store: &mut Store<'_, T>) -> Result<Value, FormError> {
        let body = self.validate()?;
        let created = store.create_work_order(&body)?;
        self.reset();
        Ok(created)
    }
}

/// Add-note form state for one work order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteDraft {
    pub text: String,
}

impl NoteDraft {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn can_submit(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Post the note; the draft is cleared only on success
    pub fn submit<T: Transport>(
        &mut self,
        store: &mut Store<'_, T>,
        work_order: WorkOrderId,
        author: &str,
    ) -> Result<Value, FormError> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(FormError::EmptyNote);
        }
        let created = store.add_note(work_order, author, text)?;
        self.text.clear();
        Ok(created)
    }
}

/// New unit form state
#[derive(Debug, Clone, PartialEq)]
pub struct UnitDraft {
    pub unit_number: String,
    pub unit_type: UnitType,
    pub odometer: Option<u64>,
}

impl Default for UnitDraft {
    fn default() -> Self {
        Self {
            unit_number: String::new(),
            unit_type: UnitType::Truck,
            odometer: None,
        }
    }
}

impl UnitDraft {
    pub fn validate(&self) -> Result<NewUnit, FormError> {
        let unit_number = self.unit_number.trim();
        if unit_number.is_empty() {
            return Err(FormError::MissingUnitNumber);
        }
        Ok(NewUnit {
            unit_number: unit_number.to_string(),
            unit_type: self.unit_type,
            odometer: self.odometer,
        })
    }

    pub fn submit<T: Transport>(&mut self, store: &mut Store<'_, T>) -> Result<Value, FormError> {
        let body = self.validate()?;
        let created = store.create_unit(&body)?;
        *self = Self::default();
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::testing::fake_client;
    use crate::core::client::{ApiResponse, Method};
    use crate::core::store::QueryKey;
    use serde_json::json;

    fn filled() -> WorkOrderDraft {
        WorkOrderDraft {
            unit_id: Some(7),
            title: "  Brake check ".to_string(),
            complaint: "Grinding noise front left".to_string(),
            priority: Priority::High,
            ..Default::default()
        }
    }

    #[test]
    fn test_draft_defaults() {
        let draft = WorkOrderDraft::new();
        assert_eq!(draft.priority, Priority::Medium);
        assert_eq!(draft.category, Category::Other);
        assert!(draft.bay.is_none());
        assert!(!draft.can_submit());
    }

    #[test]
    fn test_required_fields() {
        let mut draft = filled();
        assert!(draft.can_submit());

        draft.unit_id = None;
        assert!(matches!(draft.validate(), Err(FormError::MissingUnit)));

        let mut draft = filled();
        draft.title = "   ".to_string();
        assert!(matches!(draft.validate(), Err(FormError::MissingTitle)));

        let mut draft = filled();
        draft.complaint.clear();
        assert!(matches!(draft.validate(), Err(FormError::MissingComplaint)));
    }

    #[test]
    fn test_empty_title_sends_nothing() {
        let client = fake_client();
        let mut store = Store::new(&client);
        let mut draft = filled();
        draft.title.clear();

        let err = draft.submit(&mut store).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(client.transport().total(), 0);
    }

    #[test]
    fn test_submit_trims_resets_and_refreshes_list() {
        let client = fake_client();
        client
            .transport()
            .json(Method::Get, "/work-orders", json!([]))
            .json(Method::Post, "/work-orders", json!({"id": 12}));
        let mut store = Store::new(&client);
        store.work_orders();

        let mut draft = filled();
        draft.submit(&mut store).unwrap();
        assert_eq!(draft, WorkOrderDraft::default());

        let requests = client.transport().requests();
        let body = requests[1].body.clone().unwrap();
        assert_eq!(body["title"], "Brake check");
        assert_eq!(body["priority"], "high");
        assert_eq!(body["category"], "Other");
        assert!(body.get("status").is_none());

        store.work_orders();
        assert_eq!(store.fetch_count(QueryKey::WorkOrders), 2);
    }

    #[test]
    fn test_failed_submit_keeps_draft() {
        let client = fake_client();
        client
            .transport()
            .respond(Method::Post, "/work-orders", ApiResponse::text(422, "unit missing"));
        let mut store = Store::new(&client);
        let mut draft = filled();

        let err = draft.submit(&mut store).unwrap_err();
        assert!(!err.is_validation());
        assert_eq!(draft.title, "  Brake check ");
    }

    #[test]
    fn test_blank_note_issues_no_post() {
        let client = fake_client();
        let mut store = Store::new(&client);
        let mut note = NoteDraft::new("   \n ");
        assert!(!note.can_submit());
        assert!(matches!(
            note.submit(&mut store, 1, "Owner"),
            Err(FormError::EmptyNote)
        ));
        assert_eq!(client.transport().count(Method::Post, "/work-orders/1/notes"), 0);
    }

    #[test]
    fn test_note_submit_clears_draft() {
        let client = fake_client();
        client
            .transport()
            .json(Method::Post, "/work-orders/1/notes", json!({"id": 5}));
        let mut store = Store::new(&client);
        let mut note = NoteDraft::new(" Pads ordered ");
        note.submit(&mut store, 1, "Dispatch").unwrap();
        assert!(note.text.is_empty());
        assert_eq!(
            client.transport().requests()[0].body,
            Some(json!({"author": "Dispatch", "text": "Pads ordered"}))
        );
    }

    #[test]
    fn test_unit_draft_requires_number() {
        let draft = UnitDraft::default();
        assert!(matches!(draft.validate(), Err(FormError::MissingUnitNumber)));
        let draft = UnitDraft {
            unit_number: " T-200 ".to_string(),
            ..Default::default()
        };
        assert_eq!(draft.validate().unwrap().unit_number, "T-200");
    }
}
