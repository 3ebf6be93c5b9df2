// Request Handler - maps store results onto the response contract
//
// Holds no state of its own beyond the injected store. Every failure that is
// not InvalidArgument or NotFound becomes InternalFailure, and the detail
// stays in the log.

use std::sync::Arc;

use tracing::{debug, debug_span, error};

use crate::entrant::{Entrant, EntrantId, Field, NewEntrant};
use crate::error::StoreError;
use crate::store::EntrantStore;

/// Transport-neutral outcome of a handler operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// All records (list)
    Ok(Vec<Entrant>),
    /// A single record (get)
    Found(Entrant),
    /// A newly stored record (create)
    Created(Entrant),
    /// Empty acknowledgement (delete)
    Deleted,
    NotFound(EntrantId),
    BadRequest(Field),
    InternalFailure,
}

/// Façade over one entrant store
pub struct EntrantHandler<S: EntrantStore> {
    store: Arc<S>,
}

impl<S: EntrantStore> Clone for EntrantHandler<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: EntrantStore> EntrantHandler<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All entrants in the store
    pub fn list(&self) -> Reply {
        let _span = debug_span!("list").entered();
        debug!("start list");

        let reply = match self.store.get_all() {
            Ok(entrants) => Reply::Ok(entrants),
            Err(e) => internal("list", &e),
        };

        debug!("finish list");
        reply
    }

    /// The entrant with this id, or NotFound
    pub fn get(&self, id: EntrantId) -> Reply {
        let _span = debug_span!("get", id).entered();
        debug!("start get");

        let reply = match self.store.get_by_id(id) {
            Ok(entrant) => Reply::Found(entrant),
            Err(StoreError::NotFound(missing)) => Reply::NotFound(missing),
            Err(e) => internal("get", &e),
        };

        debug!("finish get");
        reply
    }

    /// Store a new entrant. `None` means the request carried no candidate.
    pub fn create(&self, candidate: Option<NewEntrant>) -> Reply {
        let _span = debug_span!("create").entered();
        debug!("start create");

        let reply = match candidate {
            None => Reply::BadRequest(Field::Entrant),
            Some(candidate) => match candidate.validate() {
                Err(field) => Reply::BadRequest(field),
                Ok(()) => match self.store.create(candidate) {
                    Ok(entrant) => Reply::Created(entrant),
                    Err(StoreError::InvalidArgument(field)) => Reply::BadRequest(field),
                    Err(e) => internal("create", &e),
                },
            },
        };

        debug!("finish create");
        reply
    }

    /// Remove the entrant with this id, or NotFound
    pub fn delete(&self, id: EntrantId) -> Reply {
        let _span = debug_span!("delete", id).entered();
        debug!("start delete");

        let reply = match self.store.delete(id) {
            Ok(()) => Reply::Deleted,
            Err(StoreError::NotFound(missing)) => Reply::NotFound(missing),
            Err(e) => internal("delete", &e),
        };

        debug!("finish delete");
        reply
    }
}

fn internal(operation: &str, err: &StoreError) -> Reply {
    error!(operation, error = %err, "Unexpected entrant store failure");
    Reply::InternalFailure
}

// ============================================================================
// TESTS
// ============================================================================
