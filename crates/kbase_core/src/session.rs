//! Synchronous driver pairing a view controller with a knowledge API.
//!
//! # Responsibility
//! - Execute every `Dispatch` the controller hands out against the API.
//! - Feed outcomes back through `ViewController::resolve` until no further
//!   request is due.
//!
//! # Invariants
//! - Each dispatch is executed exactly once; nothing is retried.
//! - The session never inspects outcomes itself.

use crate::api::{execute, KnowledgeApi};
use crate::controller::error::{IntentError, TransitionError};
use crate::controller::ViewController;
use crate::model::knowledge::KnowledgeId;
use crate::ports::{Confirmer, MarkdownSource};
use crate::store::Dispatch;

/// Use-case wrapper that runs controller intents to completion.
pub struct KnowledgeSession<A: KnowledgeApi> {
    controller: ViewController,
    api: A,
}

impl<A: KnowledgeApi> KnowledgeSession<A> {
    pub fn new(api: A) -> Self {
        Self::with_controller(ViewController::new(), api)
    }

    /// Uses a pre-built controller, e.g. one with a fixed clock.
    pub fn with_controller(controller: ViewController, api: A) -> Self {
        Self { controller, api }
    }

    pub fn controller(&self) -> &ViewController {
        &self.controller
    }

    /// Direct access for intents that issue no request (form edits, filters).
    pub fn controller_mut(&mut self) -> &mut ViewController {
        &mut self.controller
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Loads the initial list.
    pub fn start(&mut self) {
        let dispatch = self.controller.start();
        self.run(dispatch);
    }

    /// Executes `dispatch` and every follow-up request it triggers.
    pub fn run(&mut self, dispatch: Dispatch) {
        let mut next = Some(dispatch);
        while let Some(Dispatch { ticket, request }) = next {
            let result = execute(&self.api, &request);
            next = self.controller.resolve(ticket, result);
        }
    }

    pub fn back(&mut self) {
        let dispatch = self.controller.back();
        self.run(dispatch);
    }

    pub fn select(&mut self, id: KnowledgeId) -> Result<(), TransitionError> {
        let dispatch = self.controller.select(id)?;
        self.run(dispatch);
        Ok(())
    }

    pub fn submit_create(&mut self, editor: &dyn MarkdownSource) -> Result<(), IntentError> {
        let dispatch = self.controller.submit_create(editor)?;
        self.run(dispatch);
        Ok(())
    }

    pub fn submit_edit(&mut self, editor: &dyn MarkdownSource) -> Result<(), IntentError> {
        let dispatch = self.controller.submit_edit(editor)?;
        self.run(dispatch);
        Ok(())
    }

    pub fn request_delete(&mut self, confirmer: &mut dyn Confirmer) -> Result<(), IntentError> {
        let dispatch = self.controller.request_delete(confirmer)?;
        self.run(dispatch);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::KnowledgeSession;
    use crate::api::memory::MemoryKnowledgeApi;
    use crate::api::ApiOp;
    use crate::controller::page::PageKind;
    use crate::model::knowledge::KnowledgeRecord;
    use crate::ports::BufferEditor;

    fn record(id: i64, title: &str) -> KnowledgeRecord {
        KnowledgeRecord {
            id,
            title: title.to_string(),
            content: format!("# {title}"),
            tags: vec!["FAQ".to_string()],
            date: "2024/07/18".to_string(),
            author: "田中".to_string(),
        }
    }

    #[test]
    fn start_loads_list_once() {
        let api = MemoryKnowledgeApi::with_records(vec![record(1, "a"), record(2, "b")]);
        let mut session = KnowledgeSession::new(&api);
        session.start();
        assert_eq!(api.call_count(ApiOp::List), 1);
        assert_eq!(session.controller().visible_records().len(), 2);
    }

    #[test]
    fn successful_create_chains_into_list_refetch() {
        let api = MemoryKnowledgeApi::with_records(vec![record(1, "a")]);
        let mut session = KnowledgeSession::new(&api);
        session.start();
        session.controller_mut().open_create().expect("on list");
        session
            .controller_mut()
            .set_form_title("new entry")
            .expect("on create");
        session
            .submit_create(&BufferEditor::new("body"))
            .expect("valid draft");

        assert_eq!(session.controller().page_kind(), PageKind::List);
        assert_eq!(api.call_count(ApiOp::Create), 1);
        assert_eq!(api.call_count(ApiOp::List), 2);
        let visible = session.controller().visible_records();
        assert_eq!(visible[0].title, "new entry");
    }
}
