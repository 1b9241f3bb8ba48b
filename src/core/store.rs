//! Query store: one source of truth per entity type
//!
//! Each collection or per-work-order resource is a [`Query`]. A query fetches
//! once, then serves its cached state until it is invalidated. A failed query
//! stays failed (no further request) until an explicit [`Query::refresh`] or an
//! invalidation triggered by a mutation.
//!
//! Mutations go through the store so that the refresh contract is applied in
//! one place: [`Mutation::affected`] names exactly the queries that become
//! stale, and nothing else is touched.

use serde_json::Value;
use std::collections::HashMap;

use crate::core::client::{ApiClient, ApiError, Transport};
use crate::core::lifecycle::{Lifecycle, LifecycleError, TransitionInput, TransitionOutcome};
use crate::entities::{
    Mechanic, NewUnit, NewWorkOrder, Note, PartId, Summary, TimelineEvent, Unit, WorkOrder,
    WorkOrderId,
};

/// Load state of a query
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    /// Not fetched yet
    Idle,
    Ready(T),
    Failed(String),
}

impl<T> QueryState<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            QueryState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            QueryState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// A cached remote resource
#[derive(Debug)]
pub struct Query<T> {
    state: QueryState<T>,
    stale: bool,
    fetches: usize,
}

impl<T> Default for Query<T> {
    fn default() -> Self {
        Self {
            state: QueryState::Idle,
            stale: false,
            fetches: 0,
        }
    }
}

impl<T> Query<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &QueryState<T> {
        &self.state
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Number of fetches issued so far
    pub fn fetch_count(&self) -> usize {
        self.fetches
    }

    /// Fetch if never loaded or invalidated; otherwise serve the cached state
    pub fn ensure<F>(&mut self, fetch: F) -> &QueryState<T>
    where
        F: FnOnce() -> Result<T, ApiError>,
    {
        if matches!(self.state, QueryState::Idle) || self.stale {
            self.refresh(fetch)
        } else {
            &self.state
        }
    }

    /// Fetch unconditionally (explicit retry / refresh)
    pub fn refresh<F>(&mut self, fetch: F) -> &QueryState<T>
    where
        F: FnOnce() -> Result<T, ApiError>,
    {
        self.fetches += 1;
        self.stale = false;
        self.state = match fetch() {
            Ok(data) => QueryState::Ready(data),
            Err(e) => QueryState::Failed(e.to_string()),
        };
        &self.state
    }

    /// Mark stale so the next `ensure` re-fetches
    pub fn invalidate(&mut self) {
        self.stale = true;
    }
}

/// Identifies one query in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Units,
    Mechanics,
    WorkOrders,
    Notes(WorkOrderId),
    Timeline(WorkOrderId),
    Summary(WorkOrderId),
}

/// A successful write against the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    UnitCreated,
    WorkOrderCreated,
    Transitioned(WorkOrderId),
    NoteAdded(WorkOrderId),
    PartAttached(WorkOrderId),
}

impl Mutation {
    /// Queries made stale by this mutation: the entity and its dependents
    pub fn affected(&self) -> Vec<QueryKey> {
        match *self {
            Mutation::UnitCreated => vec![QueryKey::Units],
            Mutation::WorkOrderCreated => vec![QueryKey::WorkOrders],
            Mutation::Transitioned(id) => vec![
                QueryKey::WorkOrders,
                QueryKey::Timeline(id),
                QueryKey::Summary(id),
            ],
            Mutation::NoteAdded(id) => vec![QueryKey::Notes(id), QueryKey::Summary(id)],
            Mutation::PartAttached(id) => vec![QueryKey::Summary(id), QueryKey::Timeline(id)],
        }
    }
}

#[derive(Debug, Default)]
struct WorkOrderDetail {
    notes: Query<Vec<Note>>,
    timeline: Query<Vec<TimelineEvent>>,
    summary: Query<Summary>,
}

/// Per-process cache of everything fetched through one client
pub struct Store<'c, T: Transport> {
    client: &'c ApiClient<T>,
    units: Query<Vec<Unit>>,
    mechanics: Query<Vec<Mechanic>>,
    work_orders: Query<Vec<WorkOrder>>,
    details: HashMap<WorkOrderId, WorkOrderDetail>,
}

impl<'c, T: Transport> Store<'c, T> {
    pub fn new(client: &'c ApiClient<T>) -> Self {
        Self {
            client,
            units: Query::new(),
            mechanics: Query::new(),
            work_orders: Query::new(),
            details: HashMap::new(),
        }
    }

    pub fn client(&self) -> &'c ApiClient<T> {
        self.client
    }

    // Collections

    pub fn units(&mut self) -> &QueryState<Vec<Unit>> {
        let client = self.client;
        self.units.ensure(|| client.units())
    }

    pub fn refresh_units(&mut self) -> &QueryState<Vec<Unit>> {
        let client = self.client;
        self.units.refresh(|| client.units())
    }

    pub fn mechanics(&mut self) -> &QueryState<Vec<Mechanic>> {
        let client = self.client;
        self.mechanics.ensure(|| client.mechanics())
    }

    pub fn refresh_mechanics(&mut self) -> &QueryState<Vec<Mechanic>> {
        let client = self.client;
        self.mechanics.refresh(|| client.mechanics())
    }

    pub fn work_orders(&mut self) -> &QueryState<Vec<WorkOrder>> {
        let client = self.client;
        self.work_orders.ensure(|| client.work_orders())
    }

    pub fn refresh_work_orders(&mut self) -> &QueryState<Vec<WorkOrder>> {
        let client = self.client;
        self.work_orders.refresh(|| client.work_orders())
    }

    /// Fetch counts per collection, for diagnostics and tests
    pub fn fetch_count(&self, key: QueryKey) -> usize {
        match key {
            QueryKey::Units => self.units.fetch_count(),
            QueryKey::Mechanics => self.mechanics.fetch_count(),
            QueryKey::WorkOrders => self.work_orders.fetch_count(),
            QueryKey::Notes(id) => self.details.get(&id).map_or(0, |d| d.notes.fetch_count()),
            QueryKey::Timeline(id) => self.details.get(&id).map_or(0, |d| d.timeline.fetch_count()),
            QueryKey::Summary(id) => self.details.get(&id).map_or(0, |d| d.summary.fetch_count()),
        }
    }

    /// Look up a work order in the (loaded) list
    pub fn find_work_order(&mut self, id: WorkOrderId) -> Result<Option<WorkOrder>, String> {
        match self.work_orders() {
            QueryState::Ready(list) => Ok(list.iter().find(|w| w.id == id).cloned()),
            QueryState::Failed(message) => Err(message.clone()),
            QueryState::Idle => Ok(None),
        }
    }

    // Per-work-order resources

    pub fn notes(&mut self, id: WorkOrderId) -> &QueryState<Vec<Note>> {
        let client = self.client;
        self.details.entry(id).or_default().notes.ensure(|| client.notes(id))
    }

    pub fn timeline(&mut self, id: WorkOrderId) -> &QueryState<Vec<TimelineEvent>> {
        let client = self.client;
        self.details
            .entry(id)
            .or_default()
            .timeline
            .ensure(|| client.timeline(id))
    }

    pub fn summary(&mut self, id: WorkOrderId) -> &QueryState<Summary> {
        let client = self.client;
        self.details
            .entry(id)
            .or_default()
            .summary
            .ensure(|| client.summary(id))
    }

    // Invalidation

    pub fn invalidate(&mut self, key: QueryKey) {
        match key {
            QueryKey::Units => self.units.invalidate(),
            QueryKey::Mechanics => self.mechanics.invalidate(),
            QueryKey::WorkOrders => self.work_orders.invalidate(),
            QueryKey::Notes(id) => self.details.entry(id).or_default().notes.invalidate(),
            QueryKey::Timeline(id) => self.details.entry(id).or_default().timeline.invalidate(),
            QueryKey::Summary(id) => self.details.entry(id).or_default().summary.invalidate(),
        }
    }

    pub fn invalidate_after(&mut self, mutation: Mutation) {
        let affected = mutation.affected();
        tracing::debug!(?mutation, ?affected, "invalidating queries");
        for key in affected {
            self.invalidate(key);
        }
    }

    // Mutations

    pub fn create_unit(&mut self, unit: &NewUnit) -> Result<Value, ApiError> {
        let created = self.client.create_unit(unit)?;
        self.invalidate_after(Mutation::UnitCreated);
        Ok(created)
    }

    pub fn create_work_order(&mut self, work_order: &NewWorkOrder) -> Result<Value, ApiError> {
        let created = self.client.create_work_order(work_order)?;
        tracing::info!(unit_id = work_order.unit_id, title = %work_order.title, "work order created");
        self.invalidate_after(Mutation::WorkOrderCreated);
        Ok(created)
    }

    pub fn add_note(&mut self, id: WorkOrderId, author: &str, text: &str) -> Result<Value, ApiError> {
        let created = self.client.add_note(id, author, text)?;
        self.invalidate_after(Mutation::NoteAdded(id));
        Ok(created)
    }

    pub fn attach_part(&mut self, id: WorkOrderId, part_id: PartId, qty: u32) -> Result<Value, ApiError> {
        let attached = self.client.attach_part(id, part_id, qty)?;
        tracing::info!(work_order = id, part_id, qty, "part attached");
        self.invalidate_after(Mutation::PartAttached(id));
        Ok(attached)
    }

    /// Apply a lifecycle action to a work order known to the store
    pub fn transition(
        &mut self,
        lifecycle: &Lifecycle,
        work_order: &WorkOrder,
        input: &TransitionInput,
    ) -> Result<TransitionOutcome, LifecycleError> {
        let outcome = lifecycle.apply(self.client, work_order, input)?;
        self.invalidate_after(Mutation::Transitioned(work_order.id));
        Ok(outcome)
    }
}
