//! HTML boundary for chatbot replies.
//!
//! The backend answers with small HTML fragments (paragraphs, bold names,
//! lists, "navigate here" links). [`sanitize_html`] reduces a reply to that
//! vocabulary before anything renders it, and [`html_to_text`] flattens a
//! reply for terminal output.

use regex::{Captures, Regex};

/// Elements removed together with everything inside them.
const DROPPED_ELEMENTS: &[&str] = &["script", "style", "iframe", "object", "embed", "template"];

/// Elements kept (without attributes, except `a`).
const ALLOWED_TAGS: &[&str] = &[
    "a", "b", "strong", "i", "em", "u", "p", "br", "ul", "ol", "li", "span", "div", "h1", "h2",
    "h3", "h4", "h5", "h6", "code", "pre",
];

const SAFE_URL_SCHEMES: &[&str] = &["http", "https", "mailto", "tel"];

/// Marks a paragraph boundary while flattening; becomes one blank line.
const PARAGRAPH_BREAK: &str = "\u{1}";

/// Reduces `input` to an allowlisted subset of HTML.
///
/// Script-like elements are removed with their content, unknown tags are
/// dropped (their text is kept), attributes are stripped except
/// `href`/`target`/`rel`/`title` on anchors, and anchors with unsafe URL
/// schemes lose their `href`. Stray angle brackets in text are escaped.
#[must_use]
pub fn sanitize_html(input: &str) -> String {
    let stripped = strip_dropped_elements(input);
    let tag_re =
        Regex::new(r"(?s)<(/?)([a-zA-Z][a-zA-Z0-9]*)\b([^<>]*)>").expect("valid tag regex");

    let mut out = String::with_capacity(stripped.len());
    let mut last = 0;
    for caps in tag_re.captures_iter(&stripped) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        out.push_str(&escape_text(&stripped[last..whole.start()]));
        last = whole.end();

        let closing = !caps[1].is_empty();
        let name = caps[2].to_ascii_lowercase();
        if !ALLOWED_TAGS.contains(&name.as_str()) {
            continue;
        }
        if closing {
            if name != "br" {
                out.push_str(&format!("</{name}>"));
            }
        } else if name == "a" {
            out.push_str(&rebuild_anchor(&caps[3]));
        } else {
            out.push_str(&format!("<{name}>"));
        }
    }
    out.push_str(&escape_text(&stripped[last..]));
    out
}

/// Flattens an HTML reply into plain text for a terminal.
///
/// Line breaks and block ends become newlines, list items become `- ` lines,
/// links render as `text (url)`, entities are decoded and blank-line runs are
/// collapsed.
#[must_use]
pub fn html_to_text(input: &str) -> String {
    let stripped = strip_dropped_elements(input).replace(PARAGRAPH_BREAK, "");
    // Source whitespace is insignificant; structure comes from tags only.
    let space_re = Regex::new(r"\s+").expect("valid whitespace regex");
    let normalized = space_re.replace_all(&stripped, " ");

    let anchor_re = Regex::new(r"(?is)<a\b([^<>]*)>(.*?)</a\s*>").expect("valid anchor regex");
    let with_links = anchor_re.replace_all(&normalized, |caps: &Captures<'_>| {
        let text = strip_tags(&caps[2]);
        let text = text.trim();
        match find_attribute(&caps[1], "href").filter(|href| is_safe_url(href)) {
            Some(href) if text.is_empty() => href,
            Some(href) if decode_entities(text) != decode_entities(&href) => {
                format!("{text} ({href})")
            }
            _ => text.to_string(),
        }
    });

    let br_re = Regex::new(r"(?i)<br\s*/?>").expect("valid br regex");
    let li_re = Regex::new(r"(?i)<li\b[^<>]*>").expect("valid li regex");
    let para_end_re = Regex::new(r"(?i)</(p|h[1-6])\s*>").expect("valid paragraph end regex");
    let block_re = Regex::new(r"(?i)</?(p|div|ul|ol|h[1-6]|pre|tr|table)\b[^<>]*>|</li\s*>")
        .expect("valid block regex");

    let text = br_re.replace_all(&with_links, "\n");
    let text = li_re.replace_all(&text, "\n- ");
    let text = para_end_re.replace_all(&text, format!("\n{PARAGRAPH_BREAK}\n"));
    let text = block_re.replace_all(&text, "\n");
    let text = decode_entities(&strip_tags(&text));

    let mut lines: Vec<String> = Vec::new();
    for line in text.lines() {
        let line = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if line == PARAGRAPH_BREAK {
            if lines.last().is_some_and(|last| !last.is_empty()) {
                lines.push(String::new());
            }
        } else if !line.is_empty() {
            lines.push(line);
        }
    }
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines.join("\n")
}

fn strip_dropped_elements(input: &str) -> String {
    let comment_re = Regex::new(r"(?s)<!--.*?-->").expect("valid comment regex");
    let mut out = comment_re.replace_all(input, "").into_owned();
    for tag in DROPPED_ELEMENTS {
        let element_re = Regex::new(&format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}\s*>"))
            .expect("valid dropped element regex");
        out = element_re.replace_all(&out, "").into_owned();
        // Unterminated element: drop to end of input.
        let open_re =
            Regex::new(&format!(r"(?is)<{tag}\b.*$")).expect("valid dropped open tag regex");
        out = open_re.replace_all(&out, "").into_owned();
    }
    out
}

fn strip_tags(input: &str) -> String {
    let tags = Regex::new(r"(?s)</?[a-zA-Z][^<>]*>").expect("valid tags regex");
    tags.replace_all(input, "").into_owned()
}

fn escape_text(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn rebuild_anchor(raw_attrs: &str) -> String {
    let mut out = String::from("<a");

    if let Some(href) = find_attribute(raw_attrs, "href").filter(|href| is_safe_url(href)) {
        out.push_str(&format!(" href=\"{}\"", escape_attribute(&decode_entities(&href))));
    }
    if let Some(title) = find_attribute(raw_attrs, "title") {
        out.push_str(&format!(" title=\"{}\"", escape_attribute(&decode_entities(&title))));
    }
    match find_attribute(raw_attrs, "target") {
        Some(target) => {
            out.push_str(&format!(" target=\"{}\"", escape_attribute(&target)));
            out.push_str(" rel=\"noopener noreferrer\"");
        }
        None => {
            if let Some(rel) = find_attribute(raw_attrs, "rel") {
                out.push_str(&format!(" rel=\"{}\"", escape_attribute(&rel)));
            }
        }
    }

    out.push('>');
    out
}

/// Returns the raw (still entity-encoded) value of attribute `name`.
fn find_attribute(raw_attrs: &str, name: &str) -> Option<String> {
    let attr_re = Regex::new(
        r#"(?s)([a-zA-Z_:][-a-zA-Z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#,
    )
    .expect("valid attribute regex");

    let found = attr_re.captures_iter(raw_attrs).find_map(|caps| {
        if !caps[1].eq_ignore_ascii_case(name) {
            return None;
        }
        caps.get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| m.as_str().trim().to_string())
    });
    found
}

/// Relative URLs and `http`/`https`/`mailto`/`tel` are safe; any other scheme,
/// including entity- or whitespace-obfuscated ones, is not.
fn is_safe_url(raw: &str) -> bool {
    let decoded: String = decode_entities(raw)
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect();

    let scheme_end = decoded.find(':');
    let path_start = decoded.find(['/', '?', '#']);
    match (scheme_end, path_start) {
        (None, _) => true,
        (Some(colon), Some(path)) if path < colon => true,
        (Some(colon), _) => {
            let scheme = decoded[..colon].to_ascii_lowercase();
            SAFE_URL_SCHEMES.contains(&scheme.as_str())
        }
    }
}

/// Decodes the named entities the backend emits plus numeric references.
fn decode_entities(input: &str) -> String {
    let entity_re = Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]{2,8});?")
        .expect("valid entity regex");

    entity_re
        .replace_all(input, |caps: &Captures<'_>| {
            let body = &caps[1];
            let hex = body
                .strip_prefix("#x")
                .or_else(|| body.strip_prefix("#X"));
            let decoded = if let Some(hex) = hex {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match body {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some(' '),
                    "colon" => Some(':'),
                    "Tab" => Some('\t'),
                    "NewLine" => Some('\n'),
                    _ => None,
                }
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}
