// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Client-side search view state, kept framework-free so any front-end
//! driving the search API can embed it.
//!
//! Filter, sort, and page edits each fire a new asynchronous search request,
//! so responses can return out of order. Every request is issued with a
//! monotonically increasing sequence number, and only the response matching
//! the latest issued number is applied; anything older is discarded. This is
//! a correctness requirement, not a style choice: without it, a slow early
//! response can overwrite the result of a later search.
//!
//! `OptimisticList` models the saved-search-list / outgoing-message pattern:
//! the local change applies immediately, and the pre-mutation snapshot is
//! kept until the remote call resolves (`Applying -> Committed | RolledBack`).

/// Ticket identifying one issued search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestSeq(u64);

/// Observable state of the search view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Idle,
    Searching,
    /// A page arrived with at least one row.
    Populated { result_count: usize },
    /// The search succeeded with zero results.
    Empty,
    /// The search failed; distinct from `Empty`.
    Failed { message: String },
}

/// The search view: issues sequence-numbered requests and applies only the
/// freshest response.
#[derive(Debug)]
pub struct SearchView {
    last_issued: u64,
    state: ViewState,
}

impl Default for SearchView {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchView {
    pub fn new() -> Self {
        Self {
            last_issued: 0,
            state: ViewState::Idle,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Record that a search request is being issued. Re-entrant: calling this
    /// while a request is in flight supersedes the earlier request.
    pub fn begin(&mut self) -> RequestSeq {
        self.last_issued += 1;
        self.state = ViewState::Searching;
        RequestSeq(self.last_issued)
    }

    /// Apply a response. Returns `true` if the response was applied, `false`
    /// if it was stale (superseded by a later `begin`) and discarded.
    pub fn resolve(&mut self, seq: RequestSeq, outcome: Result<usize, String>) -> bool {
        if seq.0 != self.last_issued {
            return false;
        }
        if self.state != ViewState::Searching {
            // Same-sequence duplicate delivery; the first one won.
            return false;
        }
        self.state = match outcome {
            Ok(0) => ViewState::Empty,
            Ok(result_count) => ViewState::Populated { result_count },
            Err(message) => ViewState::Failed { message },
        };
        true
    }
}

/// Phase of an optimistic mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationPhase {
    Applying,
    Committed,
    RolledBack,
}

/// Snapshot held while a remote mutation is in flight.
#[derive(Debug)]
pub struct PendingMutation<T> {
    snapshot: Vec<T>,
    phase: MutationPhase,
}

impl<T> PendingMutation<T> {
    pub fn phase(&self) -> MutationPhase {
        self.phase
    }
}

/// A locally-owned list mutated optimistically: the change lands immediately,
/// and the caller commits or rolls back once the backing store answers.
#[derive(Debug, Default)]
pub struct OptimisticList<T: Clone> {
    items: Vec<T>,
}

impl<T: Clone> OptimisticList<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Remove all items matching the predicate, keeping the pre-mutation
    /// snapshot for a possible rollback.
    pub fn begin_remove<F: Fn(&T) -> bool>(&mut self, predicate: F) -> PendingMutation<T> {
        let snapshot = self.items.clone();
        self.items.retain(|item| !predicate(item));
        PendingMutation {
            snapshot,
            phase: MutationPhase::Applying,
        }
    }

    /// Append an item, keeping the pre-mutation snapshot for a possible
    /// rollback.
    pub fn begin_append(&mut self, item: T) -> PendingMutation<T> {
        let snapshot = self.items.clone();
        self.items.push(item);
        PendingMutation {
            snapshot,
            phase: MutationPhase::Applying,
        }
    }

    /// The remote mutation succeeded; the local change stands.
    pub fn commit(&mut self, mut pending: PendingMutation<T>) -> MutationPhase {
        pending.phase = MutationPhase::Committed;
        pending.phase
    }

    /// The remote mutation failed; restore the pre-mutation snapshot.
    pub fn rollback(&mut self, mut pending: PendingMutation<T>) -> MutationPhase {
        self.items = std::mem::take(&mut pending.snapshot);
        pending.phase = MutationPhase::RolledBack;
        pending.phase
    }
}
