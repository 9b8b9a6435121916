//! HTML sanitization for rendered record content.
//!
//! # Invariants
//! - Output never contains script-capable elements (`script`, `style`,
//!   `iframe`, `object`, `embed`, ...), `on*` handler attributes or
//!   `javascript:`/`vbscript:`/`data:` URL attributes.
//! - Text outside tags is left untouched.

use once_cell::sync::Lazy;
use regex::Regex;

const BLOCKED_ELEMENTS: &[&str] = &["script", "style", "iframe", "object", "embed", "template"];

static BLOCKED_ELEMENT_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    BLOCKED_ELEMENTS
        .iter()
        .map(|name| {
            Regex::new(&format!(r"(?is)<{name}\b[^>]*>.*?</{name}\s*>"))
                .expect("valid blocked element regex")
        })
        .collect()
});
static BLOCKED_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)</?(?:script|style|iframe|object|embed|template|frame|frameset|meta|link|base|form|svg|math)\b[^>]*>",
    )
    .expect("valid blocked tag regex")
});
static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[A-Za-z][^>]*>").expect("valid tag regex"));
static EVENT_HANDLER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)[\s/]+on[a-z]+\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+)"#)
        .expect("valid event handler regex")
});
static URL_ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)([\s/])(href|src|action|formaction|xlink:href|poster|background)\s*=\s*("[^"]*"|'[^']*'|[^\s>]+)"#,
    )
    .expect("valid url attribute regex")
});
static ENTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)&#x([0-9a-f]+);?|&#([0-9]+);?|&(colon|tab|newline);")
        .expect("valid entity regex")
});

const UNSAFE_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:"];

/// Strips executable or unsafe markup from an HTML fragment.
///
/// Passes repeat until the fragment stops changing, so markup rebuilt by a
/// removal (`<scr<iframe>ipt>`) is caught on the next pass.
pub fn sanitize_html(html: &str) -> String {
    let mut current = html.to_string();
    loop {
        let next = sanitize_pass(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn sanitize_pass(html: &str) -> String {
    let mut cleaned = html.to_string();
    for re in BLOCKED_ELEMENT_RES.iter() {
        cleaned = re.replace_all(&cleaned, "").into_owned();
    }
    let cleaned = BLOCKED_TAG_RE.replace_all(&cleaned, "");

    TAG_RE
        .replace_all(&cleaned, |caps: &regex::Captures<'_>| {
            let without_handlers = EVENT_HANDLER_RE.replace_all(&caps[0], "");
            URL_ATTR_RE
                .replace_all(&without_handlers, |attr: &regex::Captures<'_>| {
                    if is_unsafe_url(unquote(&attr[3])) {
                        format!("{}{}=\"#\"", &attr[1], &attr[2])
                    } else {
                        attr[0].to_string()
                    }
                })
                .into_owned()
        })
        .into_owned()
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value)
}

/// Checks the scheme the way a browser resolves it: entities decoded,
/// whitespace and control characters ignored, case-insensitive.
fn is_unsafe_url(value: &str) -> bool {
    let normalized = decode_entities(value)
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    UNSAFE_SCHEMES
        .iter()
        .any(|scheme| normalized.starts_with(scheme))
}

fn decode_entities(value: &str) -> String {
    ENTITY_RE
        .replace_all(value, |caps: &regex::Captures<'_>| {
            let code = if let Some(hex) = caps.get(1) {
                u32::from_str_radix(hex.as_str(), 16).ok()
            } else if let Some(dec) = caps.get(2) {
                dec.as_str().parse::<u32>().ok()
            } else {
                match caps[3].to_ascii_lowercase().as_str() {
                    "colon" => Some(u32::from(':')),
                    "tab" => Some(u32::from('\t')),
                    _ => Some(u32::from('\n')),
                }
            };
            code.and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_default()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::sanitize_html;

    #[test]
    fn removes_script_elements_with_content() {
        let cleaned = sanitize_html("<p>a</p><SCRIPT type=\"x\">alert(1)</script><p>b</p>");
        assert_eq!(cleaned, "<p>a</p><p>b</p>");
    }

    #[test]
    fn removes_unterminated_blocked_tags() {
        let cleaned = sanitize_html("<p>a<iframe src=\"https://evil\"></p>");
        assert_eq!(cleaned, "<p>a</p>");
    }

    #[test]
    fn strips_event_handlers_inside_tags() {
        let cleaned = sanitize_html("<img src=\"a.png\" onerror=\"alert(1)\" alt='x' onload=y>");
        assert_eq!(cleaned, "<img src=\"a.png\" alt='x'>");
    }

    #[test]
    fn neutralizes_script_urls() {
        let cleaned = sanitize_html("<a href=\" JavaScript:alert(1)\">x</a><a href=\"https://ok\">y</a>");
        assert_eq!(cleaned, "<a href=\"#\">x</a><a href=\"https://ok\">y</a>");
    }

    #[test]
    fn nested_blocked_tags_cannot_rebuild_a_script() {
        let cleaned = sanitize_html("<scr<iframe>ipt>alert(1)</scr<iframe>ipt>");
        assert!(!cleaned.to_ascii_lowercase().contains("<script"));
        assert!(!cleaned.contains("alert(1)"));
    }

    #[test]
    fn slash_separated_handler_is_stripped() {
        let cleaned = sanitize_html("<img/onerror=alert(1) src=x>");
        assert_eq!(cleaned, "<img src=x>");
    }

    #[test]
    fn entity_encoded_script_urls_are_neutralized() {
        for html in [
            "<a href=\"&#106;avascript:alert(1)\">x</a>",
            "<a href=\"&#x6A;avascript:alert(1)\">x</a>",
            "<a href='javascript&colon;alert(1)'>x</a>",
            "<a href=\"java&#9;script:alert(1)\">x</a>",
        ] {
            assert_eq!(sanitize_html(html), "<a href=\"#\">x</a>", "input: {html}");
        }
    }

    #[test]
    fn safe_urls_keep_their_original_spelling() {
        let html = "<a href='https://kb.internal/a?b=1&amp;c=2'>x</a><img src=/img/a.png>";
        assert_eq!(sanitize_html(html), html);
    }

    #[test]
    fn leaves_text_outside_tags_untouched() {
        let text = "<p>use onclick= carefully &amp; javascript: is text</p>";
        assert_eq!(sanitize_html(text), text);
    }
}
