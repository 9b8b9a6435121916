//! Text rendering of the active page.

use kbase_core::{
    render_safe_html, BufferEditor, FormDraft, KnowledgeRecord, LoadState, MutationStatus, Page,
    ViewController, TAG_OPTIONS,
};

pub fn render_page(controller: &ViewController, editor: &BufferEditor) -> String {
    let mut out = Vec::new();
    match controller.page() {
        Page::List => render_list(controller, &mut out),
        Page::Detail(page) => {
            out.push(format!("== knowledge #{} ==", page.id()));
            render_detail(controller.store().detail(), &mut out);
            push_status(page.delete_status(), "deleting...", &mut out);
        }
        Page::Create(page) => {
            out.push("== new knowledge ==".to_string());
            render_form(page.draft(), editor, &mut out);
            push_status(page.submit_status(), "saving...", &mut out);
        }
        Page::Edit(page) => {
            out.push(format!("== edit knowledge #{} ==", page.target().id));
            render_form(page.draft(), editor, &mut out);
            push_status(page.submit_status(), "saving...", &mut out);
        }
        Page::Chat(page) => {
            out.push("== ask the knowledge base ==".to_string());
            out.push(format!("question: {}", page.question()));
            if let Some(answer) = page.answer() {
                out.push(format!("answer:\n{answer}"));
            }
        }
    }
    out.join("\n")
}

fn render_list(controller: &ViewController, out: &mut Vec<String>) {
    out.push("== knowledge ==".to_string());
    let filter = controller.filter();
    out.push(format!(
        "search: {:?}  tag: {}",
        filter.search(),
        filter.tag().unwrap_or("(all)")
    ));
    match controller.store().list() {
        LoadState::Idle => {}
        LoadState::Loading(_) => out.push("loading...".to_string()),
        LoadState::Failed(message) => out.push(format!("error: {message}")),
        LoadState::Ready(_) => {
            let visible = controller.visible_records();
            if visible.is_empty() {
                out.push("(no knowledge)".to_string());
            }
            out.extend(visible.into_iter().map(list_line));
        }
    }
}

fn list_line(record: &KnowledgeRecord) -> String {
    format!(
        "  [{}] {}  {} {}  {}",
        record.id,
        record.title,
        record.date,
        record.author,
        hash_tags(&record.tags)
    )
}

fn render_detail(detail: &LoadState<KnowledgeRecord>, out: &mut Vec<String>) {
    match detail {
        LoadState::Idle | LoadState::Loading(_) => out.push("loading...".to_string()),
        LoadState::Failed(message) => out.push(format!("error: {message}")),
        LoadState::Ready(record) => {
            out.push(record.title.clone());
            out.push(format!("{} {}  {}", record.date, record.author, hash_tags(&record.tags)));
            out.push(String::new());
            out.push(render_safe_html(&record.content));
        }
    }
}

fn render_form(draft: &FormDraft, editor: &BufferEditor, out: &mut Vec<String>) {
    out.push(format!("title: {}", draft.title));
    let tags = TAG_OPTIONS
        .iter()
        .map(|tag| {
            let mark = if draft.tags.iter().any(|selected| selected == tag) {
                "x"
            } else {
                " "
            };
            format!("[{mark}] {tag}")
        })
        .collect::<Vec<_>>()
        .join("  ");
    out.push(format!("tags:  {tags}"));
    out.push("body:".to_string());
    out.push(editor.text().to_string());
}

fn push_status(status: &MutationStatus, busy: &str, out: &mut Vec<String>) {
    if status.is_loading() {
        out.push(busy.to_string());
    }
    if let Some(message) = status.error() {
        out.push(format!("error: {message}"));
    }
}

fn hash_tags(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| format!("#{tag}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::render_page;
    use kbase_core::{
        execute, BufferEditor, KnowledgeRecord, MemoryKnowledgeApi, ViewController,
    };

    fn record() -> KnowledgeRecord {
        KnowledgeRecord {
            id: 7,
            title: "社内システムの使い方".to_string(),
            content: "# 手順\n\n<script>alert(1)</script>".to_string(),
            tags: vec!["システム".to_string()],
            date: "2024/07/18".to_string(),
            author: "田中".to_string(),
        }
    }

    #[test]
    fn list_page_shows_loaded_records() {
        let api = MemoryKnowledgeApi::with_records(vec![record()]);
        let mut controller = ViewController::new();
        let dispatch = controller.start();
        assert!(render_page(&controller, &BufferEditor::default()).contains("loading..."));
        controller.resolve(dispatch.ticket, execute(&api, &dispatch.request));

        let text = render_page(&controller, &BufferEditor::default());
        assert!(text.contains("[7] 社内システムの使い方"));
        assert!(text.contains("#システム"));
    }

    #[test]
    fn detail_page_never_shows_raw_script() {
        let api = MemoryKnowledgeApi::with_records(vec![record()]);
        let mut controller = ViewController::new();
        controller.start();
        let dispatch = controller.select(7).expect("on list");
        controller.resolve(dispatch.ticket, execute(&api, &dispatch.request));

        let text = render_page(&controller, &BufferEditor::default());
        assert!(text.contains("<h1>手順</h1>"));
        assert!(!text.contains("<script"));
    }
}
