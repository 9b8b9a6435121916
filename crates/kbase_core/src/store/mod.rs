//! Client-side knowledge cache and request mediation.
//!
//! # Responsibility
//! - Hold the list slot and the single detail slot.
//! - Issue ticketed `Dispatch` values for every intent.
//! - Validate drafts before a create/update request is built.
//!
//! # Invariants
//! - A slot is cleared before its request is issued; stale data is never
//!   shown behind a loading or failed state.
//! - An outcome is applied only when its ticket is the one the slot awaits.
//! - Tickets increase monotonically and are never reused.

use crate::api::{ApiError, Request};
use crate::model::knowledge::{
    validate_title, DraftValidationError, KnowledgeId, KnowledgePayload, KnowledgeRecord,
};
use chrono::NaiveDate;
use log::{debug, error, info};
use std::fmt::{Display, Formatter};

/// Page-scoped message shown when the list fetch fails.
pub const LIST_LOAD_FAILED: &str = "failed to load knowledge list";
/// Page-scoped message shown when the detail fetch fails.
pub const DETAIL_LOAD_FAILED: &str = "failed to load knowledge detail";

/// Correlates one dispatched request with its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl Display for Ticket {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A request that is due, tagged with the ticket its outcome must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub ticket: Ticket,
    pub request: Request,
}

/// Lifecycle of one fetched slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState<T> {
    Idle,
    Loading(Ticket),
    Ready(T),
    Failed(String),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading(_))
    }

    /// Loaded value, if any.
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// Failure message, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    pub(crate) fn awaits(&self, ticket: Ticket) -> bool {
        matches!(self, Self::Loading(pending) if *pending == ticket)
    }
}

/// In-memory list + detail cache owned by the view controller.
#[derive(Debug, Default)]
pub struct KnowledgeStore {
    last_ticket: u64,
    list: LoadState<Vec<KnowledgeRecord>>,
    detail: LoadState<KnowledgeRecord>,
}

impl KnowledgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self) -> &LoadState<Vec<KnowledgeRecord>> {
        &self.list
    }

    pub fn detail(&self) -> &LoadState<KnowledgeRecord> {
        &self.detail
    }

    fn issue(&mut self, request: Request) -> Dispatch {
        self.last_ticket += 1;
        let ticket = Ticket(self.last_ticket);
        info!(
            "event=intent_dispatch module=store status=start op={} ticket={}",
            request.op().as_str(),
            ticket.value()
        );
        Dispatch { ticket, request }
    }

    /// Clears the list and issues `List()`.
    pub fn begin_list(&mut self) -> Dispatch {
        let dispatch = self.issue(Request::List);
        self.list = LoadState::Loading(dispatch.ticket);
        dispatch
    }

    /// Drops the cached list and abandons any in-flight list fetch.
    pub fn clear_list(&mut self) {
        self.list = LoadState::Idle;
    }

    /// Applies a list outcome. Returns `false` when `ticket` is stale.
    pub fn finish_list(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<KnowledgeRecord>, ApiError>,
    ) -> bool {
        if !self.list.awaits(ticket) {
            return false;
        }
        self.list = match result {
            Ok(records) => {
                info!(
                    "event=intent_resolve module=store status=ok op=list ticket={} count={}",
                    ticket.value(),
                    records.len()
                );
                LoadState::Ready(records)
            }
            Err(err) => {
                error!(
                    "event=intent_resolve module=store status=error op=list ticket={} error={}",
                    ticket.value(),
                    err
                );
                LoadState::Failed(LIST_LOAD_FAILED.to_string())
            }
        };
        true
    }

    /// Discards the current detail and issues `Get(id)`.
    pub fn begin_detail(&mut self, id: KnowledgeId) -> Dispatch {
        self.detail = LoadState::Idle;
        let dispatch = self.issue(Request::Get(id));
        self.detail = LoadState::Loading(dispatch.ticket);
        dispatch
    }

    /// Drops the detail slot and abandons any in-flight detail fetch.
    pub fn clear_detail(&mut self) {
        self.detail = LoadState::Idle;
    }

    /// Applies a detail outcome. Returns `false` when `ticket` is stale.
    pub fn finish_detail(
        &mut self,
        ticket: Ticket,
        result: Result<KnowledgeRecord, ApiError>,
    ) -> bool {
        if !self.detail.awaits(ticket) {
            return false;
        }
        self.detail = match result {
            Ok(record) => {
                info!(
                    "event=intent_resolve module=store status=ok op=get ticket={} id={}",
                    ticket.value(),
                    record.id
                );
                LoadState::Ready(record)
            }
            Err(err) => {
                error!(
                    "event=intent_resolve module=store status=error op=get ticket={} error={}",
                    ticket.value(),
                    err
                );
                LoadState::Failed(DETAIL_LOAD_FAILED.to_string())
            }
        };
        true
    }

    /// Validates the draft and issues `Create(payload)`.
    ///
    /// `content` is materialized only after the title passed validation.
    pub fn begin_create(
        &mut self,
        title: &str,
        tags: &[String],
        content: impl FnOnce() -> String,
        date: NaiveDate,
    ) -> Result<Dispatch, DraftValidationError> {
        if let Err(err) = validate_title(title) {
            debug!("event=intent_dispatch module=store status=rejected op=create reason=empty_title");
            return Err(err);
        }
        let payload = KnowledgePayload::for_create(title, content(), tags.to_vec(), date)?;
        Ok(self.issue(Request::Create(payload)))
    }

    /// Validates the draft and issues `Update(target.id, payload)`.
    pub fn begin_update(
        &mut self,
        target: &KnowledgeRecord,
        title: &str,
        tags: &[String],
        content: impl FnOnce() -> String,
    ) -> Result<Dispatch, DraftValidationError> {
        if let Err(err) = validate_title(title) {
            debug!("event=intent_dispatch module=store status=rejected op=update reason=empty_title");
            return Err(err);
        }
        let payload = KnowledgePayload::for_update(target, title, content(), tags.to_vec())?;
        Ok(self.issue(Request::Update(target.id, payload)))
    }

    /// Issues `Delete(id)`. Confirmation happens before this is called.
    pub fn begin_delete(&mut self, id: KnowledgeId) -> Dispatch {
        self.issue(Request::Delete(id))
    }
}

#[cfg(test)]
mod tests {
    use super::{KnowledgeStore, LoadState, DETAIL_LOAD_FAILED, LIST_LOAD_FAILED};
    use crate::api::{ApiError, Request};
    use crate::model::knowledge::{DraftValidationError, KnowledgeRecord};
    use chrono::NaiveDate;
    use std::cell::Cell;

    fn record(id: i64) -> KnowledgeRecord {
        KnowledgeRecord {
            id,
            title: format!("record {id}"),
            content: String::new(),
            tags: Vec::new(),
            date: "2024/07/18".to_string(),
            author: "田中".to_string(),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 22).expect("valid date")
    }

    #[test]
    fn tickets_increase_across_intents() {
        let mut store = KnowledgeStore::new();
        let first = store.begin_list();
        let second = store.begin_detail(3);
        let third = store.begin_delete(3);
        assert!(first.ticket < second.ticket);
        assert!(second.ticket < third.ticket);
        assert_eq!(second.request, Request::Get(3));
    }

    #[test]
    fn list_failure_replaces_previous_list() {
        let mut store = KnowledgeStore::new();
        let first = store.begin_list();
        assert!(store.finish_list(first.ticket, Ok(vec![record(1)])));
        assert_eq!(store.list().ready().map(Vec::len), Some(1));

        let second = store.begin_list();
        assert!(store.list().is_loading());
        assert!(store.list().ready().is_none());
        assert!(store.finish_list(
            second.ticket,
            Err(ApiError::Transport("refused".to_string()))
        ));
        assert_eq!(store.list().error(), Some(LIST_LOAD_FAILED));
        assert!(store.list().ready().is_none());
    }

    #[test]
    fn stale_list_outcome_is_ignored() {
        let mut store = KnowledgeStore::new();
        let old = store.begin_list();
        let current = store.begin_list();
        assert!(!store.finish_list(old.ticket, Ok(vec![record(1)])));
        assert_eq!(*store.list(), LoadState::Loading(current.ticket));
    }

    #[test]
    fn detail_is_discarded_before_refetch() {
        let mut store = KnowledgeStore::new();
        let first = store.begin_detail(1);
        assert!(store.finish_detail(first.ticket, Ok(record(1))));
        let second = store.begin_detail(2);
        assert_eq!(*store.detail(), LoadState::Loading(second.ticket));
        assert!(store.finish_detail(
            second.ticket,
            Err(ApiError::Status {
                status: 404,
                message: "Knowledge not found".to_string()
            })
        ));
        assert_eq!(store.detail().error(), Some(DETAIL_LOAD_FAILED));
    }

    #[test]
    fn cleared_detail_turns_late_outcome_stale() {
        let mut store = KnowledgeStore::new();
        let pending = store.begin_detail(1);
        store.clear_detail();
        assert!(!store.finish_detail(pending.ticket, Ok(record(1))));
        assert_eq!(*store.detail(), LoadState::Idle);
    }

    #[test]
    fn blank_title_never_materializes_content() {
        let mut store = KnowledgeStore::new();
        let pulled = Cell::new(0);
        let err = store
            .begin_create(
                "   ",
                &[],
                || {
                    pulled.set(pulled.get() + 1);
                    String::new()
                },
                date(),
            )
            .unwrap_err();
        assert_eq!(err, DraftValidationError::EmptyTitle);
        assert_eq!(pulled.get(), 0);
    }

    #[test]
    fn update_request_targets_record_id() {
        let mut store = KnowledgeStore::new();
        let target = record(5);
        let dispatch = store
            .begin_update(&target, "renamed", &["FAQ".to_string()], || "body".to_string())
            .unwrap();
        match dispatch.request {
            Request::Update(id, payload) => {
                assert_eq!(id, 5);
                assert_eq!(payload.title, "renamed");
                assert_eq!(payload.date, "2024/07/18");
                assert_eq!(payload.content, "body");
            }
            other => panic!("unexpected request {other:?}"),
        }
    }
}
