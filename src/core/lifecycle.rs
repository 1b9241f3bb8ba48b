//! Work order lifecycle: status transitions and the actions that drive them
//!
//! ```text
//! pending ──start──▶ in_progress ──complete──▶ completed
//!    │                 │     ▲
//!  assign            pause resume
//!    │                 ▼     │
//! pending            on_hold ┘
//! ```
//!
//! Guards are evaluated against the locally known status only. The server is
//! not re-queried, so two staff members acting on stale views are not
//! detected here; the last write wins server-side.

use serde::Serialize;
use thiserror::Error;

use crate::core::client::{ApiClient, ApiError, Transport};
use crate::entities::{MechanicId, WorkOrder, WorkOrderId, WorkOrderStatus};

/// Reason sent when a pause is requested with a blank reason
pub const DEFAULT_PAUSE_REASON: &str = "Pause";

/// Suggested reason pre-filled in the pause form
pub const SUGGESTED_PAUSE_REASON: &str = "Waiting parts";

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("No mechanic selected. Pass --mechanic or run 'shop config set mechanic_id <id>'")]
    NoMechanic,

    #[error("Cannot {action} {number}: it is {status} (available: {available})")]
    NotOffered {
        action: Action,
        number: String,
        status: WorkOrderStatus,
        available: String,
    },

    #[error("An odometer reading is required to start work")]
    MissingOdometer,

    #[error("Invalid odometer reading '{0}': expected a whole number of km")]
    InvalidOdometer(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// A user-initiated lifecycle action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Assign,
    Start,
    Pause,
    Resume,
    Complete,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Assign,
        Action::Start,
        Action::Pause,
        Action::Resume,
        Action::Complete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Assign => "assign",
            Action::Start => "start",
            Action::Pause => "pause",
            Action::Resume => "resume",
            Action::Complete => "complete",
        }
    }

    /// Button label
    pub fn label(&self) -> &'static str {
        match self {
            Action::Assign => "Assign to me",
            Action::Start => "Start",
            Action::Pause => "Pause",
            Action::Resume => "Resume",
            Action::Complete => "Complete",
        }
    }

    /// Status the action is offered from
    pub fn source(&self) -> WorkOrderStatus {
        match self {
            Action::Assign | Action::Start => WorkOrderStatus::Pending,
            Action::Pause | Action::Complete => WorkOrderStatus::InProgress,
            Action::Resume => WorkOrderStatus::OnHold,
        }
    }

    /// Status the work order is expected to reach
    pub fn target(&self) -> WorkOrderStatus {
        match self {
            Action::Assign => WorkOrderStatus::Pending,
            Action::Start | Action::Resume => WorkOrderStatus::InProgress,
            Action::Pause => WorkOrderStatus::OnHold,
            Action::Complete => WorkOrderStatus::Completed,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An action together with the input it requires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionInput {
    Assign,
    Start { odometer: u64 },
    Pause { reason: String },
    Resume,
    Complete,
}

impl TransitionInput {
    pub fn action(&self) -> Action {
        match self {
            TransitionInput::Assign => Action::Assign,
            TransitionInput::Start { .. } => Action::Start,
            TransitionInput::Pause { .. } => Action::Pause,
            TransitionInput::Resume => Action::Resume,
            TransitionInput::Complete => Action::Complete,
        }
    }

    /// Pause with a free-text reason; blank falls back to [`DEFAULT_PAUSE_REASON`]
    pub fn pause(reason: Option<&str>) -> Self {
        let reason = reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_PAUSE_REASON);
        TransitionInput::Pause {
            reason: reason.to_string(),
        }
    }
}

/// Result of a successfully posted transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionOutcome {
    pub work_order_id: WorkOrderId,
    pub action: Action,
    pub mechanic_id: MechanicId,
    pub from: WorkOrderStatus,
    pub expected: WorkOrderStatus,
}

/// Lifecycle rules scoped to the current mechanic
#[derive(Debug, Clone, Copy, Default)]
pub struct Lifecycle {
    mechanic: Option<MechanicId>,
}

impl Lifecycle {
    pub fn new(mechanic: Option<MechanicId>) -> Self {
        Self { mechanic }
    }

    pub fn mechanic(&self) -> Option<MechanicId> {
        self.mechanic
    }

    /// Check if a status transition is valid
    pub fn is_valid_transition(from: WorkOrderStatus, to: WorkOrderStatus) -> bool {
        matches!(
            (from, to),
            (WorkOrderStatus::Pending, WorkOrderStatus::InProgress)
                | (WorkOrderStatus::InProgress, WorkOrderStatus::OnHold)
                | (WorkOrderStatus::OnHold, WorkOrderStatus::InProgress)
                | (WorkOrderStatus::InProgress, WorkOrderStatus::Completed)
        )
    }

    /// Statuses reachable from `current`
    pub fn allowed_transitions(current: WorkOrderStatus) -> Vec<WorkOrderStatus> {
        match current {
            WorkOrderStatus::Pending => vec![WorkOrderStatus::InProgress],
            WorkOrderStatus::InProgress => {
                vec![WorkOrderStatus::OnHold, WorkOrderStatus::Completed]
            }
            WorkOrderStatus::OnHold => vec![WorkOrderStatus::InProgress],
            WorkOrderStatus::Completed | WorkOrderStatus::Canceled => vec![],
        }
    }

    /// Actions offered for a work order in `status`; none without a mechanic
    pub fn available_actions(&self, status: WorkOrderStatus) -> Vec<Action> {
        if self.mechanic.is_none() {
            return Vec::new();
        }
        Action::ALL
            .into_iter()
            .filter(|a| a.source() == status)
            .collect()
    }

    /// Verify that `action` is offered for `work_order`, returning the acting mechanic
    pub fn check(&self, work_order: &WorkOrder, action: Action) -> Result<MechanicId, LifecycleError> {
        let mechanic = self.mechanic.ok_or(LifecycleError::NoMechanic)?;
        let status = work_order.lifecycle_status();
        let offered = self.available_actions(status);
        if !offered.contains(&action) {
            let available = if offered.is_empty() {
                "none".to_string()
            } else {
                offered.iter().map(|a| a.as_str()).collect::<Vec<_>>().join(", ")
            };
            return Err(LifecycleError::NotOffered {
                action,
                number: work_order.number(),
                status,
                available,
            });
        }
        Ok(mechanic)
    }

    /// Post a transition for `work_order` after checking its guard
    pub fn apply<T: Transport>(
        &self,
        client: &ApiClient<T>,
        work_order: &WorkOrder,
        input: &TransitionInput,
    ) -> Result<TransitionOutcome, LifecycleError> {
        let action = input.action();
        let mechanic = self.check(work_order, action)?;
        let id = work_order.id;

        match input {
            TransitionInput::Assign => client.assign(id, mechanic)?,
            TransitionInput::Start { odometer } => client.start(id, mechanic, Some(*odometer))?,
            TransitionInput::Pause { reason } => client.pause(id, mechanic, Some(reason))?,
            TransitionInput::Resume => client.resume(id, mechanic)?,
            TransitionInput::Complete => client.complete(id, mechanic)?,
        };

        tracing::info!(
            work_order = id,
            action = %action,
            mechanic,
            from = %work_order.lifecycle_status(),
            "transition posted"
        );

        Ok(TransitionOutcome {
            work_order_id: id,
            action,
            mechanic_id: mechanic,
            from: work_order.lifecycle_status(),
            expected: action.target(),
        })
    }
}

/// Parse an odometer reading as entered in the start form
pub fn parse_odometer(input: &str) -> Result<u64, LifecycleError> {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '_' | ' '))
        .collect();
    if cleaned.is_empty() {
        return Err(LifecycleError::MissingOdometer);
    }
    cleaned
        .parse()
        .map_err(|_| LifecycleError::InvalidOdometer(input.trim().to_string()))
}
