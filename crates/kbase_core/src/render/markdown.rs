//! Markdown to HTML rendering backed by pulldown-cmark.

use pulldown_cmark::{html, Event, Options, Parser};

fn render_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Renders markdown `source` to an HTML fragment.
///
/// Raw HTML blocks and inline HTML in the source are emitted as escaped
/// text, never as markup.
pub fn render_markdown(source: &str) -> String {
    let parser = Parser::new_ext(source, render_options()).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut output = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut output, parser);
    output
}
