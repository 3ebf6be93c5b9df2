// Entrant Store - in-memory records with a monotonic id allocator
//
// The record map and the last assigned id live behind one RwLock, so a create
// allocates and inserts in a single critical section and readers never see
// half of a mutation. Deleted ids are not reused: the allocator only moves
// forward.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{error, info};

use crate::entrant::{is_blank, Entrant, EntrantId, Field, NewEntrant};
use crate::error::{StoreError, StoreResult};

// ============================================================================
// STORE CAPABILITY
// ============================================================================

/// Create/read/delete over entrant records.
///
/// The request handler only sees this trait, so tests can swap in a store
/// that fails on purpose.
pub trait EntrantStore: Send + Sync {
    /// Validate the candidate, assign the next id and store it.
    fn create(&self, candidate: NewEntrant) -> StoreResult<Entrant>;

    /// Point-in-time copy of every record, in no particular order.
    fn get_all(&self) -> StoreResult<Vec<Entrant>>;

    fn get_by_id(&self, id: EntrantId) -> StoreResult<Entrant>;

    /// Remove a record. Its id is never handed out again.
    fn delete(&self, id: EntrantId) -> StoreResult<()>;
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

#[derive(Debug, Default)]
struct StoreState {
    records: HashMap<EntrantId, Entrant>,
    /// Highest id ever assigned or seeded. Never decreases.
    last_id: EntrantId,
}

/// Process-lifetime entrant store. Share it behind an `Arc`.
#[derive(Debug, Default)]
pub struct InMemoryEntrantStore {
    state: RwLock<StoreState>,
}

impl InMemoryEntrantStore {
    /// Empty store; the first create gets id 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with existing records.
    ///
    /// The allocator starts at the highest seeded id. Seeds with id 0, a
    /// duplicate id or a blank name are rejected.
    pub fn with_records<I>(records: I) -> StoreResult<Self>
    where
        I: IntoIterator<Item = Entrant>,
    {
        let mut state = StoreState::default();

        for entrant in records {
            if entrant.id == 0 || state.records.contains_key(&entrant.id) {
                return Err(StoreError::InvalidArgument(Field::Id));
            }
            if is_blank(Some(&entrant.first_name)) {
                return Err(StoreError::InvalidArgument(Field::FirstName));
            }
            if is_blank(Some(&entrant.last_name)) {
                return Err(StoreError::InvalidArgument(Field::LastName));
            }

            state.last_id = state.last_id.max(entrant.id);
            state.records.insert(entrant.id, entrant);
        }

        info!(
            records = state.records.len(),
            last_id = state.last_id,
            "Seeded entrant store"
        );

        Ok(InMemoryEntrantStore {
            state: RwLock::new(state),
        })
    }

    /// Number of records currently held
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read()?.records.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Highest id assigned so far (0 for a fresh, unseeded store)
    pub fn last_assigned_id(&self) -> StoreResult<EntrantId> {
        Ok(self.read()?.last_id)
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, StoreState>> {
        self.state.read().map_err(|_| {
            error!("Entrant store lock poisoned");
            StoreError::internal("store lock poisoned")
        })
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, StoreState>> {
        self.state.write().map_err(|_| {
            error!("Entrant store lock poisoned");
            StoreError::internal("store lock poisoned")
        })
    }
}

impl EntrantStore for InMemoryEntrantStore {
    fn create(&self, candidate: NewEntrant) -> StoreResult<Entrant> {
        candidate.validate()?;

        let mut state = self.write()?;

        let id = state.last_id.checked_add(1).ok_or_else(|| {
            error!(last_id = state.last_id, "Entrant id space exhausted");
            StoreError::internal("entrant id space exhausted")
        })?;

        if state.records.contains_key(&id) {
            error!(id, "Create new Entrant failed: id already in use");
            return Err(StoreError::internal(format!("id {} already in use", id)));
        }

        let entrant = candidate.into_entrant(id);
        state.last_id = id;
        state.records.insert(id, entrant.clone());

        info!(id, "Created new Entrant");
        Ok(entrant)
    }

    fn get_all(&self) -> StoreResult<Vec<Entrant>> {
        Ok(self.read()?.records.values().cloned().collect())
    }

    fn get_by_id(&self, id: EntrantId) -> StoreResult<Entrant> {
        match self.read()?.records.get(&id) {
            Some(entrant) => Ok(entrant.clone()),
            None => {
                info!(id, "GetById failed: Entrant not found");
                Err(StoreError::NotFound(id))
            }
        }
    }

    fn delete(&self, id: EntrantId) -> StoreResult<()> {
        let mut state = self.write()?;

        match state.records.remove(&id) {
            Some(_) => {
                info!(id, "Deleted Entrant");
                Ok(())
            }
            None => {
                info!(id, "Delete failed: Entrant not found");
                Err(StoreError::NotFound(id))
            }
        }
    }
}

/// Demonstration records loaded by the server at startup
pub fn default_seed() -> Vec<Entrant> {
    vec![
        Entrant::new(1, "First1", "Last1"),
        Entrant::new(2, "First2", "Last2"),
    ]
}

// ============================================================================
// TESTS
// ============================================================================
