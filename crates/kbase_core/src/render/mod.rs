//! Detail-page content rendering.
//!
//! # Responsibility
//! - Turn record markdown into display HTML (`markdown`).
//! - Strip executable or unsafe markup from any HTML (`sanitize`).
//!
//! # Invariants
//! - Both stages are pure and synchronous.
//! - Display HTML always passes through `sanitize_html`, regardless of source.

pub mod markdown;
pub mod sanitize;

pub use markdown::render_markdown;
pub use sanitize::sanitize_html;

/// Renders `source` markdown and sanitizes the result for display.
pub fn render_safe_html(source: &str) -> String {
    sanitize_html(&render_markdown(source))
}

#[cfg(test)]
mod tests {
    use super::render_safe_html;

    #[test]
    fn safe_html_contains_rendered_markup_only() {
        let html = render_safe_html("# 社内システムの使い方\n\n[x](javascript:alert(1))");
        assert!(html.contains("<h1>社内システムの使い方</h1>"));
        assert!(!html.to_ascii_lowercase().contains("javascript:"));
    }
}
