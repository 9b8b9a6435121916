use kbase_core::{
    execute, ApiError, BufferEditor, IntentError, KnowledgeRecord, LoadState, MemoryKnowledgeApi,
    Outcome, Page, PageKind, ViewController,
};

fn record(id: i64, title: &str) -> KnowledgeRecord {
    KnowledgeRecord {
        id,
        title: title.to_string(),
        content: "本文".to_string(),
        tags: Vec::new(),
        date: "2024/07/18".to_string(),
        author: "佐藤".to_string(),
    }
}

fn api() -> MemoryKnowledgeApi {
    MemoryKnowledgeApi::with_records(vec![record(1, "一"), record(2, "二")])
}

#[test]
fn list_outcome_after_leaving_list_is_dropped() {
    let api = api();
    let mut controller = ViewController::new();
    let list = controller.start();
    let detail = controller.select(1).expect("list page accepts select");

    let follow_up = controller.resolve(list.ticket, execute(&api, &list.request));
    assert!(follow_up.is_none());
    assert_eq!(*controller.store().list(), LoadState::Idle);
    assert!(controller.visible_records().is_empty());

    controller.resolve(detail.ticket, execute(&api, &detail.request));
    assert_eq!(
        controller.store().detail().ready().map(|r| r.id),
        Some(1)
    );
}

#[test]
fn detail_outcome_after_going_back_is_dropped() {
    let api = api();
    let mut controller = ViewController::new();
    controller.start();
    let detail = controller.select(2).expect("on list");
    let list = controller.back();

    assert!(controller
        .resolve(detail.ticket, execute(&api, &detail.request))
        .is_none());
    assert_eq!(*controller.store().detail(), LoadState::Idle);
    assert_eq!(controller.page_kind(), PageKind::List);

    controller.resolve(list.ticket, execute(&api, &list.request));
    assert_eq!(controller.visible_records().len(), 2);
}

#[test]
fn superseded_detail_outcome_cannot_overwrite_newer_selection() {
    let api = api();
    let mut controller = ViewController::new();
    controller.start();
    let first = controller.select(1).expect("on list");
    controller.back();
    let second = controller.select(2).expect("on list");

    controller.resolve(first.ticket, Ok(Outcome::Fetched(record(1, "一"))));
    assert_eq!(*controller.store().detail(), LoadState::Loading(second.ticket));

    controller.resolve(second.ticket, execute(&api, &second.request));
    assert_eq!(
        controller.store().detail().ready().map(|r| r.id),
        Some(2)
    );
}

#[test]
fn late_failure_for_abandoned_list_sets_no_error() {
    let mut controller = ViewController::new();
    let old = controller.start();
    let current = controller.back();

    controller.resolve(old.ticket, Err(ApiError::Transport("reset".to_string())));
    assert_eq!(*controller.store().list(), LoadState::Loading(current.ticket));
    assert!(controller.store().list().error().is_none());
}

#[test]
fn mutation_outcome_after_leaving_form_is_inert() {
    let api = api();
    let mut controller = ViewController::new();
    controller.start();
    controller.open_create().expect("on list");
    controller.set_form_title("途中").expect("on create");
    let create = controller
        .submit_create(&BufferEditor::new("body"))
        .expect("valid draft");
    let list = controller.back();

    let outcome = execute(&api, &create.request);
    assert!(matches!(outcome, Ok(Outcome::Created(_))));
    assert!(controller.resolve(create.ticket, outcome).is_none());
    assert_eq!(controller.page_kind(), PageKind::List);
    assert_eq!(*controller.store().list(), LoadState::Loading(list.ticket));
}

#[test]
fn second_submit_while_pending_is_busy() {
    let mut controller = ViewController::new();
    controller.start();
    controller.open_create().expect("on list");
    controller.set_form_title("重複").expect("on create");
    let editor = BufferEditor::new("body");
    let first = controller.submit_create(&editor).expect("valid draft");

    assert_eq!(controller.submit_create(&editor), Err(IntentError::Busy));
    match controller.page() {
        Page::Create(page) => assert!(page.submit_status().is_loading()),
        other => panic!("expected create page, got {other:?}"),
    }

    let next = controller
        .resolve(first.ticket, Ok(Outcome::Created(record(3, "重複"))))
        .expect("success returns to list");
    assert!(next.ticket > first.ticket);
    assert_eq!(controller.page_kind(), PageKind::List);
}

#[test]
fn pending_mutation_never_blocks_navigation() {
    let mut controller = ViewController::new();
    controller.start();
    controller.open_create().expect("on list");
    controller.set_form_title("保留").expect("on create");
    let pending = controller
        .submit_create(&BufferEditor::new(""))
        .expect("valid draft");

    controller.back();
    controller.open_create().expect("on list");
    match controller.page() {
        Page::Create(page) => {
            assert!(!page.submit_status().is_loading());
            assert!(page.draft().title.is_empty());
        }
        other => panic!("expected create page, got {other:?}"),
    }

    let late = controller.resolve(
        pending.ticket,
        Err(ApiError::Status {
            status: 500,
            message: "Internal Server Error".to_string(),
        }),
    );
    assert!(late.is_none());
    match controller.page() {
        Page::Create(page) => assert!(page.submit_status().error().is_none()),
        other => panic!("expected create page, got {other:?}"),
    }
}
