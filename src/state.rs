//! Per-operation state cells.
//!
//! Each operation owns one [`OperationSlot`]: a mutex-guarded cell holding
//! its phase, last good result and last error. Slots never share a lock, so
//! different operations progress independently.

use crate::error::OperationError;
use crate::models::Action;
use crate::{Error, Result};
use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Pending,
    Succeeded,
    Failed,
}

/// A point-in-time copy of one slot.
///
/// `result` is the most recent successful result. It survives later failures
/// and is only cleared by a reset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationState<T> {
    pub phase: Phase,
    pub result: Option<T>,
    pub error: Option<OperationError>,
}

impl<T> Default for OperationState<T> {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            result: None,
            error: None,
        }
    }
}

impl<T> OperationState<T> {
    pub fn is_pending(&self) -> bool {
        self.phase == Phase::Pending
    }
}

/// Proof that a call entered `Pending`. Completing with a ticket from an
/// older generation is a no-op.
#[derive(Debug)]
#[must_use]
pub struct Ticket {
    generation: u64,
}

struct Cell<T> {
    state: OperationState<T>,
    generation: u64,
}

pub struct OperationSlot<T> {
    action: Action,
    cell: Mutex<Cell<T>>,
}

impl<T: Clone> OperationSlot<T> {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            cell: Mutex::new(Cell {
                state: OperationState::default(),
                generation: 0,
            }),
        }
    }

    pub fn action(&self) -> Action {
        self.action
    }

    fn lock(&self) -> MutexGuard<'_, Cell<T>> {
        self.cell.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move into `Pending`.
    ///
    /// A slot that is already pending rejects the call and is left as it is.
    /// A failed precondition is stored as `Failed` without ever entering
    /// `Pending`.
    pub fn begin(&self, precondition: Result<()>) -> Result<Ticket> {
        let mut cell = self.lock();

        if cell.state.phase == Phase::Pending {
            warn!("{} requested while one is still pending; rejecting", self.action);
            return Err(Error::AlreadyPending {
                action: self.action,
            });
        }

        if let Err(err) = precondition {
            info!("{} not started: {}", self.action, err);
            cell.state.phase = Phase::Failed;
            cell.state.error = Some(OperationError::from(&err));
            return Err(err);
        }

        cell.generation += 1;
        cell.state.phase = Phase::Pending;
        cell.state.error = None;
        debug!("{} pending (generation {})", self.action, cell.generation);

        Ok(Ticket {
            generation: cell.generation,
        })
    }

    /// Record the outcome of a call started with `ticket` and hand it back.
    ///
    /// The outcome is always returned to the caller, but it is only stored
    /// when the slot has not been reset since the call began.
    pub fn finish(&self, ticket: Ticket, outcome: Result<T>) -> Result<T> {
        let mut cell = self.lock();

        if ticket.generation != cell.generation || cell.state.phase != Phase::Pending {
            debug!(
                "Dropping stale {} response (generation {}, current {})",
                self.action, ticket.generation, cell.generation
            );
            return outcome;
        }

        match outcome {
            Ok(value) => {
                info!("{} succeeded", self.action);
                cell.state.phase = Phase::Succeeded;
                cell.state.result = Some(value.clone());
                cell.state.error = None;
                Ok(value)
            }
            Err(err) => {
                warn!("{} failed ({}): {}", self.action, err.kind(), err);
                cell.state.phase = Phase::Failed;
                cell.state.error = Some(OperationError::from(&err));
                Err(err)
            }
        }
    }

    /// Back to `Idle` with no result or error. A call still in flight will
    /// find its ticket outdated.
    pub fn reset(&self) {
        let mut cell = self.lock();
        cell.generation += 1;
        cell.state = OperationState::default();
    }

    pub fn snapshot(&self) -> OperationState<T> {
        self.lock().state.clone()
    }

    pub fn result(&self) -> Option<T> {
        self.lock().state.result.clone()
    }
}
