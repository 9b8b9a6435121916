//! Page/navigation state machine and data-fetch lifecycle.
//!
//! # Responsibility
//! - Own the active `Page`, the list filter and all draft state.
//! - Decide which fetches are due on each transition and hand them out as
//!   ticketed `Dispatch` values; never perform I/O itself.
//! - Apply outcomes through `resolve`, dropping the ones whose page or slot
//!   has moved on.
//!
//! # Invariants
//! - Entering `List` always issues exactly one list fetch, from any page.
//! - Entering `Detail` always issues exactly one detail fetch.
//! - Fetch/mutation failures become page-scoped messages, never errors.
//! - Confirmation aborts and validation failures issue no request.

pub mod confirm;
pub mod error;
pub mod page;

use self::confirm::confirm_delete;
use self::error::{IntentError, TransitionError};
use self::page::{ChatPage, CreatePage, DetailPage, EditPage, Page, PageKind};
use crate::api::{ApiError, ApiOp, ApiResult, Outcome};
use crate::model::knowledge::{today, KnowledgeId, KnowledgeRecord};
use crate::ports::{ChatResponder, Confirmer, MarkdownSource};
use crate::search::filter::ListFilter;
use crate::store::{Dispatch, KnowledgeStore, Ticket};
use chrono::NaiveDate;
use log::{debug, error, info};

/// Page-scoped message shown when a create request fails.
pub const CREATE_FAILED: &str = "failed to create knowledge";
/// Page-scoped message shown when an update request fails.
pub const UPDATE_FAILED: &str = "failed to update knowledge";
/// Page-scoped message shown when a delete request fails.
pub const DELETE_FAILED: &str = "failed to delete knowledge";

/// Top-level controller owning page state and the knowledge cache.
#[derive(Debug)]
pub struct ViewController {
    page: Page,
    store: KnowledgeStore,
    filter: ListFilter,
    clock: fn() -> NaiveDate,
}

impl Default for ViewController {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewController {
    /// Creates a controller on the `List` page with nothing loaded yet.
    ///
    /// Call [`ViewController::start`] to issue the initial list fetch.
    pub fn new() -> Self {
        Self::with_clock(today)
    }

    /// Creates a controller whose create-date stamps come from `clock`.
    pub fn with_clock(clock: fn() -> NaiveDate) -> Self {
        Self {
            page: Page::List,
            store: KnowledgeStore::new(),
            filter: ListFilter::default(),
            clock,
        }
    }

    /// Issues the initial list fetch.
    pub fn start(&mut self) -> Dispatch {
        self.enter_list()
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_kind(&self) -> PageKind {
        self.page.kind()
    }

    pub fn store(&self) -> &KnowledgeStore {
        &self.store
    }

    pub fn filter(&self) -> &ListFilter {
        &self.filter
    }

    /// Updates the list search string. Never fetches.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.set_search(search);
    }

    /// Updates the list tag filter; empty clears it. Never fetches.
    pub fn set_tag_filter(&mut self, tag: &str) {
        self.filter.set_tag(tag);
    }

    /// Records the list page shows: filtered, in fetch order.
    ///
    /// Empty unless the list page is active and its fetch succeeded.
    pub fn visible_records(&self) -> Vec<&KnowledgeRecord> {
        if self.page.kind() != PageKind::List {
            return Vec::new();
        }
        self.store
            .list()
            .ready()
            .map(|records| self.filter.apply(records))
            .unwrap_or_default()
    }

    /// Returns to `List` from any page; always refetches.
    pub fn back(&mut self) -> Dispatch {
        self.enter_list()
    }

    /// `List -> Detail` for the selected record identity.
    pub fn select(&mut self, id: KnowledgeId) -> Result<Dispatch, TransitionError> {
        self.require(PageKind::List, "select")?;
        self.store.clear_list();
        self.page = Page::Detail(DetailPage::new(id));
        log_page_enter(PageKind::Detail);
        Ok(self.store.begin_detail(id))
    }

    /// `List -> Create` with a fresh draft.
    pub fn open_create(&mut self) -> Result<(), TransitionError> {
        self.require(PageKind::List, "open_create")?;
        self.store.clear_list();
        self.page = Page::Create(CreatePage::default());
        log_page_enter(PageKind::Create);
        Ok(())
    }

    /// `List -> Chat` with a fresh conversation.
    pub fn open_chat(&mut self) -> Result<(), TransitionError> {
        self.require(PageKind::List, "open_chat")?;
        self.store.clear_list();
        self.page = Page::Chat(ChatPage::default());
        log_page_enter(PageKind::Chat);
        Ok(())
    }

    /// `Detail -> Edit`, seeded from the loaded detail record.
    ///
    /// Returns the markdown the editing surface should start from.
    ///
    /// # Errors
    /// - `NotAllowed` outside the detail page.
    /// - `DetailNotLoaded` while the detail fetch is pending or failed.
    pub fn open_edit(&mut self) -> Result<String, TransitionError> {
        self.require(PageKind::Detail, "open_edit")?;
        let target = self
            .store
            .detail()
            .ready()
            .cloned()
            .ok_or(TransitionError::DetailNotLoaded)?;
        self.store.clear_detail();
        let page = EditPage::seeded_from(target);
        let initial = page.initial_markdown().to_string();
        self.page = Page::Edit(page);
        log_page_enter(PageKind::Edit);
        Ok(initial)
    }

    /// Replaces the create/edit form title.
    pub fn set_form_title(&mut self, title: impl Into<String>) -> Result<(), TransitionError> {
        match &mut self.page {
            Page::Create(page) => page.draft.title = title.into(),
            Page::Edit(page) => page.draft.title = title.into(),
            other => {
                return Err(TransitionError::NotAllowed {
                    from: other.kind(),
                    action: "set_form_title",
                })
            }
        }
        Ok(())
    }

    /// Toggles one tag in the create/edit form.
    pub fn toggle_form_tag(&mut self, tag: &str) -> Result<(), TransitionError> {
        match &mut self.page {
            Page::Create(page) => page.draft.toggle_tag(tag),
            Page::Edit(page) => page.draft.toggle_tag(tag),
            other => {
                return Err(TransitionError::NotAllowed {
                    from: other.kind(),
                    action: "toggle_form_tag",
                })
            }
        }
        Ok(())
    }

    /// Replaces the chat question.
    pub fn set_chat_question(&mut self, question: impl Into<String>) -> Result<(), TransitionError> {
        let Page::Chat(page) = &mut self.page else {
            return Err(self.not_allowed("set_chat_question"));
        };
        page.question = question.into();
        Ok(())
    }

    /// Answers the current chat question; blank questions are ignored.
    pub fn send_chat(&mut self, responder: &dyn ChatResponder) -> Result<(), TransitionError> {
        let Page::Chat(page) = &mut self.page else {
            return Err(self.not_allowed("send_chat"));
        };
        if page.question.trim().is_empty() {
            return Ok(());
        }
        page.answer = Some(responder.respond(&page.question));
        Ok(())
    }

    /// Validates the create draft, pulls the editor content once and issues
    /// `Create`.
    ///
    /// # Errors
    /// - `Validation` for a blank title (also shown on the page).
    /// - `Busy` while a previous create is in flight.
    pub fn submit_create(&mut self, editor: &dyn MarkdownSource) -> Result<Dispatch, IntentError> {
        let Page::Create(page) = &mut self.page else {
            return Err(self.not_allowed("submit_create").into());
        };
        if page.submit.is_loading() {
            return Err(IntentError::Busy);
        }
        let date = (self.clock)();
        match self.store.begin_create(
            &page.draft.title,
            &page.draft.tags,
            || editor.current_markdown(),
            date,
        ) {
            Ok(dispatch) => {
                page.submit.start(dispatch.ticket);
                Ok(dispatch)
            }
            Err(err) => {
                page.submit.fail(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Validates the edit draft, pulls the editor content once and issues
    /// `Update` for the edit target.
    pub fn submit_edit(&mut self, editor: &dyn MarkdownSource) -> Result<Dispatch, IntentError> {
        let Page::Edit(page) = &mut self.page else {
            return Err(self.not_allowed("submit_edit").into());
        };
        if page.submit.is_loading() {
            return Err(IntentError::Busy);
        }
        match self.store.begin_update(
            page.target(),
            &page.draft.title,
            &page.draft.tags,
            || editor.current_markdown(),
        ) {
            Ok(dispatch) => {
                page.submit.start(dispatch.ticket);
                Ok(dispatch)
            }
            Err(err) => {
                page.submit.fail(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Runs the two-step confirmation and issues `Delete` for the record on
    /// the detail page.
    ///
    /// # Errors
    /// - `ConfirmationAborted` when either step fails; nothing changes.
    /// - `Busy` while a previous delete is in flight.
    pub fn request_delete(
        &mut self,
        confirmer: &mut dyn Confirmer,
    ) -> Result<Dispatch, IntentError> {
        let Page::Detail(page) = &mut self.page else {
            return Err(self.not_allowed("request_delete").into());
        };
        if page.delete.is_loading() {
            return Err(IntentError::Busy);
        }
        let Some(record) = self.store.detail().ready() else {
            return Err(TransitionError::DetailNotLoaded.into());
        };

        let id = record.id;
        if let Err(reason) = confirm_delete(confirmer, &record.title) {
            info!(
                "event=delete_aborted module=controller status=ok id={} reason={}",
                id,
                reason.as_str()
            );
            return Err(IntentError::ConfirmationAborted(reason));
        }

        let dispatch = self.store.begin_delete(id);
        page.delete.start(dispatch.ticket);
        Ok(dispatch)
    }

    /// Applies the outcome of a dispatched request.
    ///
    /// Returns the list fetch that is due when a mutation succeeded and the
    /// controller moved to `List`. Outcomes whose ticket no longer matches
    /// the awaiting slot or page are dropped.
    pub fn resolve(&mut self, ticket: Ticket, result: ApiResult<Outcome>) -> Option<Dispatch> {
        if self.store.list().awaits(ticket) {
            let listed = result.and_then(|outcome| match outcome {
                Outcome::Listed(records) => Ok(records),
                _ => Err(unexpected("list")),
            });
            self.store.finish_list(ticket, listed);
            return None;
        }
        if self.store.detail().awaits(ticket) {
            let fetched = result.and_then(|outcome| match outcome {
                Outcome::Fetched(record) => Ok(record),
                _ => Err(unexpected("get")),
            });
            self.store.finish_detail(ticket, fetched);
            return None;
        }
        self.resolve_mutation(ticket, result)
    }

    fn resolve_mutation(&mut self, ticket: Ticket, result: ApiResult<Outcome>) -> Option<Dispatch> {
        let (status, failure_message, expected) = match &mut self.page {
            Page::Create(page) => (&mut page.submit, CREATE_FAILED, ApiOp::Create),
            Page::Edit(page) => (&mut page.submit, UPDATE_FAILED, ApiOp::Update),
            Page::Detail(page) => (&mut page.delete, DELETE_FAILED, ApiOp::Delete),
            Page::List | Page::Chat(_) => {
                log_stale(ticket);
                return None;
            }
        };
        if !status.awaits(ticket) {
            log_stale(ticket);
            return None;
        }

        let result = result.and_then(|outcome| match (expected, outcome) {
            (ApiOp::Create, Outcome::Created(_))
            | (ApiOp::Update, Outcome::Updated(_))
            | (ApiOp::Delete, Outcome::Deleted) => Ok(()),
            _ => Err(unexpected(expected.as_str())),
        });
        match result {
            Ok(()) => {
                info!(
                    "event=intent_resolve module=controller status=ok ticket={} page={}",
                    ticket.value(),
                    self.page.kind().as_str()
                );
                Some(self.enter_list())
            }
            Err(err) => {
                error!(
                    "event=intent_resolve module=controller status=error ticket={} error={}",
                    ticket.value(),
                    err
                );
                status.fail(failure_message);
                None
            }
        }
    }

    fn enter_list(&mut self) -> Dispatch {
        self.store.clear_detail();
        self.page = Page::List;
        log_page_enter(PageKind::List);
        self.store.begin_list()
    }

    fn require(&self, kind: PageKind, action: &'static str) -> Result<(), TransitionError> {
        if self.page.kind() == kind {
            Ok(())
        } else {
            Err(self.not_allowed(action))
        }
    }

    fn not_allowed(&self, action: &'static str) -> TransitionError {
        TransitionError::NotAllowed {
            from: self.page.kind(),
            action,
        }
    }
}

fn log_page_enter(kind: PageKind) {
    info!(
        "event=page_enter module=controller status=ok page={}",
        kind.as_str()
    );
}

fn log_stale(ticket: Ticket) {
    debug!(
        "event=stale_result module=controller status=stale ticket={}",
        ticket.value()
    );
}

fn unexpected(op: &str) -> ApiError {
    ApiError::Decode(format!("unexpected outcome for `{op}`"))
}

#[cfg(test)]
mod tests {
    use super::{ViewController, CREATE_FAILED};
    use crate::api::{Outcome, Request};
    use crate::ports::BufferEditor;
    use crate::controller::error::TransitionError;
    use crate::controller::page::{Page, PageKind};
    use crate::model::knowledge::KnowledgeRecord;
    use crate::store::LIST_LOAD_FAILED;

    fn record() -> KnowledgeRecord {
        KnowledgeRecord {
            id: 4,
            title: "障害対応フロー".to_string(),
            content: "1. 連絡\n2. 切り分け".to_string(),
            tags: vec!["トラブル".to_string()],
            date: "2024/07/10".to_string(),
            author: "高橋".to_string(),
        }
    }

    #[test]
    fn start_requests_the_list() {
        let mut controller = ViewController::new();
        let dispatch = controller.start();
        assert_eq!(dispatch.request, Request::List);
        assert!(controller.store().list().is_loading());
    }

    #[test]
    fn form_edits_are_rejected_outside_forms() {
        let mut controller = ViewController::new();
        assert_eq!(
            controller.set_form_title("x"),
            Err(TransitionError::NotAllowed {
                from: PageKind::List,
                action: "set_form_title"
            })
        );
        assert!(controller.open_edit().is_err());
    }

    #[test]
    fn wrong_outcome_shape_fails_the_slot() {
        let mut controller = ViewController::new();
        let dispatch = controller.start();
        controller.resolve(dispatch.ticket, Ok(Outcome::Deleted));
        assert_eq!(controller.store().list().error(), Some(LIST_LOAD_FAILED));
    }

    #[test]
    fn mismatched_mutation_outcome_is_a_failure() {
        let mut controller = ViewController::new();
        controller.start();
        controller.open_create().expect("on list");
        controller.set_form_title("新規").expect("on create");
        let dispatch = controller
            .submit_create(&BufferEditor::new("body"))
            .expect("valid draft");

        let next = controller.resolve(dispatch.ticket, Ok(Outcome::Listed(Vec::new())));
        assert!(next.is_none());
        match controller.page() {
            Page::Create(page) => {
                assert_eq!(page.submit_status().error(), Some(CREATE_FAILED));
                assert!(!page.submit_status().is_loading());
            }
            other => panic!("expected create page, got {other:?}"),
        }

        let retry = controller
            .submit_create(&BufferEditor::new("body"))
            .expect("not busy after failure");
        let next = controller.resolve(retry.ticket, Ok(Outcome::Created(record())));
        assert!(next.is_some());
        assert_eq!(controller.page_kind(), PageKind::List);
    }

    #[test]
    fn edit_is_seeded_from_loaded_detail() {
        let mut controller = ViewController::new();
        controller.start();
        let dispatch = controller.select(4).expect("on list");
        controller.resolve(dispatch.ticket, Ok(Outcome::Fetched(record())));

        let initial = controller.open_edit().expect("detail loaded");
        assert_eq!(initial, record().content);
        assert!(controller.store().detail().ready().is_none());
        match controller.page() {
            Page::Edit(page) => {
                assert_eq!(page.draft().title, "障害対応フロー");
                assert_eq!(page.draft().tags, vec!["トラブル".to_string()]);
                assert_eq!(page.target(), &record());
            }
            other => panic!("expected edit page, got {other:?}"),
        }
    }
}
