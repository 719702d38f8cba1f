//! Whitelist HTML filter for user supplied free text.
//!
//! Tags on the whitelist survive with their attributes reduced to a per tag
//! whitelist. Every other tag, and any stray angle bracket, is escaped so the
//! browser renders it as text. Running the filter over its own output is a no-op.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::model::Bookmark;

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9]*)([^<>]*)>").expect("tag pattern is valid"));

static ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#)
        .expect("attribute pattern is valid")
});

const SAFE_URL_PREFIXES: &[&str] = &["http://", "https://", "mailto:", "#", "/"];

fn allowed_attributes(tag: &str) -> Option<&'static [&'static str]> {
    let attrs: &'static [&'static str] = match tag {
        "a" => &["href", "title", "target"],
        "img" => &["src", "alt", "title", "width", "height"],
        "abbr" => &["title"],
        "b" | "blockquote" | "br" | "code" | "del" | "em" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "hr"
        | "i" | "li" | "ol" | "p" | "pre" | "s" | "small" | "span" | "strong" | "sub" | "sup" | "u" | "ul" => &[],
        _ => return None,
    };
    Some(attrs)
}

fn escape_text(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    value.replace('"', "&quot;").replace('<', "&lt;").replace('>', "&gt;")
}

fn is_safe_url(value: &str) -> bool {
    let value = value.trim().to_ascii_lowercase();
    SAFE_URL_PREFIXES.iter().any(|prefix| value.starts_with(prefix))
}

fn render_tag(caps: &Captures<'_>) -> String {
    let whole = &caps[0];
    let name = caps[2].to_ascii_lowercase();
    let Some(allowed) = allowed_attributes(&name) else {
        return escape_text(whole);
    };

    if &caps[1] == "/" {
        return format!("</{name}>");
    }

    let raw_attrs = &caps[3];
    let mut tag = format!("<{name}");
    for attr in ATTR.captures_iter(raw_attrs) {
        let attr_name = attr[1].to_ascii_lowercase();
        if !allowed.contains(&attr_name.as_str()) {
            continue;
        }

        let value = attr
            .get(2)
            .or_else(|| attr.get(3))
            .or_else(|| attr.get(4))
            .map(|m| m.as_str())
            .unwrap_or_default();
        if (attr_name == "href" || attr_name == "src") && !is_safe_url(value) {
            continue;
        }

        tag.push_str(&format!(" {}=\"{}\"", attr_name, escape_attribute(value)));
    }

    if raw_attrs.trim_end().ends_with('/') {
        tag.push_str(" /");
    }
    tag.push('>');
    tag
}

pub fn sanitize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last = 0;

    for caps in TAG.captures_iter(input) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&escape_text(&input[last..whole.start()]));
        out.push_str(&render_tag(&caps));
        last = whole.end();
    }
    out.push_str(&escape_text(&input[last..]));

    out
}

/// Sanitizes the free text columns. `id`, `url` and `rating` are left untouched.
pub fn sanitize_bookmark(bookmark: Bookmark) -> Bookmark {
    Bookmark {
        title: sanitize(&bookmark.title),
        description: sanitize(&bookmark.description),
        ..bookmark
    }
}
