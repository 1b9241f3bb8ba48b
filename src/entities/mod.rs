//! Entity type definitions
//!
//! All entities are owned by the shop API; these are the shapes the client
//! consumes and produces:
//!
//! - [`Unit`] - Fleet vehicles (trucks, reefers)
//! - [`Mechanic`] - Shop mechanics
//! - [`WorkOrder`] - Repair jobs tracked through a status lifecycle
//! - [`Note`] - Append-only comments on a work order
//! - [`TimelineEvent`] - Append-only audit log of a work order
//! - [`Part`] - Inventory parts attachable to in-progress work
//! - [`Summary`] - Parts / labor / notes rollup for a work order

pub mod lenient;
pub mod mechanic;
pub mod note;
pub mod part;
pub mod summary;
pub mod timeline;
pub mod unit;
pub mod work_order;

pub use mechanic::{Mechanic, MechanicId};
pub use note::{NewNote, Note};
pub use part::{Part, PartAttachment, PartId};
pub use summary::{Summary, SummaryPayload};
pub use timeline::TimelineEvent;
pub use unit::{NewUnit, Unit, UnitId, UnitType};
pub use work_order::{
    parse_wo_reference, wo_number, Bay, Category, NewWorkOrder, Priority, WorkOrder, WorkOrderId,
    WorkOrderStatus,
};
