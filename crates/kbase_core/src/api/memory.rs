//! In-process knowledge collection.
//!
//! # Responsibility
//! - Provide a `KnowledgeApi` with the reference collection's semantics
//!   without a network, for tests and offline demos.
//! - Count calls per operation and inject failures on demand.
//!
//! # Invariants
//! - New ids are `max(id) + 1` (or 1 when empty); new records go first.
//! - Unknown ids yield `404` for get/update/delete.

use super::{ApiError, ApiOp, ApiResult, KnowledgeApi};
use crate::model::knowledge::{KnowledgeId, KnowledgePayload, KnowledgeRecord};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

const NOT_FOUND_MESSAGE: &str = "Knowledge not found";

#[derive(Default)]
struct MemoryState {
    records: Vec<KnowledgeRecord>,
    calls: BTreeMap<ApiOp, usize>,
    failing: BTreeMap<ApiOp, u16>,
    unreachable: BTreeSet<ApiOp>,
}

/// Mutex-guarded in-memory collection implementing `KnowledgeApi`.
#[derive(Default)]
pub struct MemoryKnowledgeApi {
    state: Mutex<MemoryState>,
}

impl MemoryKnowledgeApi {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a collection holding `records` in the given order.
    pub fn with_records(records: Vec<KnowledgeRecord>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                records,
                ..MemoryState::default()
            }),
        }
    }

    /// Makes every subsequent `op` call answer with HTTP `status`.
    pub fn fail_with_status(&self, op: ApiOp, status: u16) {
        if let Ok(mut state) = self.state.lock() {
            state.failing.insert(op, status);
        }
    }

    /// Makes every subsequent `op` call fail at the transport level.
    pub fn fail_transport(&self, op: ApiOp) {
        if let Ok(mut state) = self.state.lock() {
            state.unreachable.insert(op);
        }
    }

    /// Clears injected failures for `op`.
    pub fn recover(&self, op: ApiOp) {
        if let Ok(mut state) = self.state.lock() {
            state.failing.remove(&op);
            state.unreachable.remove(&op);
        }
    }

    /// Number of calls made for `op`, failed ones included.
    pub fn call_count(&self, op: ApiOp) -> usize {
        self.state
            .lock()
            .map(|state| state.calls.get(&op).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Number of calls made across all operations.
    pub fn total_calls(&self) -> usize {
        self.state
            .lock()
            .map(|state| state.calls.values().sum())
            .unwrap_or(0)
    }

    /// Copy of the current collection contents.
    pub fn records(&self) -> Vec<KnowledgeRecord> {
        self.state
            .lock()
            .map(|state| state.records.clone())
            .unwrap_or_default()
    }

    fn begin(&self, op: ApiOp) -> ApiResult<MutexGuard<'_, MemoryState>> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| ApiError::Transport("memory collection lock poisoned".to_string()))?;
        *state.calls.entry(op).or_insert(0) += 1;
        if state.unreachable.contains(&op) {
            return Err(ApiError::Transport(format!(
                "connection refused for `{}`",
                op.as_str()
            )));
        }
        if let Some(status) = state.failing.get(&op).copied() {
            return Err(ApiError::Status {
                status,
                message: "injected failure".to_string(),
            });
        }
        Ok(state)
    }
}

fn not_found() -> ApiError {
    ApiError::Status {
        status: 404,
        message: NOT_FOUND_MESSAGE.to_string(),
    }
}

impl KnowledgeApi for MemoryKnowledgeApi {
    fn list(&self) -> ApiResult<Vec<KnowledgeRecord>> {
        let state = self.begin(ApiOp::List)?;
        Ok(state.records.clone())
    }

    fn get(&self, id: KnowledgeId) -> ApiResult<KnowledgeRecord> {
        let state = self.begin(ApiOp::Get)?;
        state
            .records
            .iter()
            .find(|record| record.id == id)
            .cloned()
            .ok_or_else(not_found)
    }

    fn create(&self, payload: &KnowledgePayload) -> ApiResult<KnowledgeRecord> {
        let mut state = self.begin(ApiOp::Create)?;
        let next_id = state
            .records
            .iter()
            .map(|record| record.id)
            .max()
            .unwrap_or(0)
            + 1;
        let record = KnowledgeRecord {
            id: next_id,
            title: payload.title.clone(),
            content: payload.content.clone(),
            tags: payload.tags.clone(),
            date: payload.date.clone(),
            author: payload.author.clone(),
        };
        state.records.insert(0, record.clone());
        Ok(record)
    }

    fn update(&self, id: KnowledgeId, payload: &KnowledgePayload) -> ApiResult<KnowledgeRecord> {
        let mut state = self.begin(ApiOp::Update)?;
        let record = state
            .records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(not_found)?;
        record.title = payload.title.clone();
        record.content = payload.content.clone();
        record.tags = payload.tags.clone();
        record.date = payload.date.clone();
        record.author = payload.author.clone();
        Ok(record.clone())
    }

    fn delete(&self, id: KnowledgeId) -> ApiResult<()> {
        let mut state = self.begin(ApiOp::Delete)?;
        let index = state
            .records
            .iter()
            .position(|record| record.id == id)
            .ok_or_else(not_found)?;
        state.records.remove(index);
        Ok(())
    }
}
