//! Allowlist-based HTML sanitizer for note text.
//!
//! Notes are persisted verbatim; every read re-runs this filter before the
//! text is serialized into a response. Tags outside the allowlist get their
//! angle brackets entity-escaped (the inner text is left untouched), while
//! allowlisted tags are rebuilt keeping only their permitted attributes.
//! The output contains no raw `<` or `>` except inside rebuilt tags, which
//! re-parse to themselves — so the filter is idempotent.

const NO_ATTRS: &[&str] = &[];
const A_ATTRS: &[&str] = &["href", "title", "target"];
const ABBR_ATTRS: &[&str] = &["title"];
const BLOCKQUOTE_ATTRS: &[&str] = &["cite"];
const IMG_ATTRS: &[&str] = &["src", "alt", "title", "width", "height"];

/// Attributes permitted for a tag, or `None` when the tag itself is not allowed.
fn allowed_attrs(tag: &str) -> Option<&'static [&'static str]> {
    match tag {
        "a" => Some(A_ATTRS),
        "abbr" => Some(ABBR_ATTRS),
        "blockquote" => Some(BLOCKQUOTE_ATTRS),
        "img" => Some(IMG_ATTRS),
        "b" | "br" | "code" | "div" | "em" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "hr"
        | "i" | "li" | "ol" | "p" | "pre" | "small" | "span" | "strong" | "sub" | "sup" | "u"
        | "ul" => Some(NO_ATTRS),
        _ => None,
    }
}

/// Sanitize a free-text field for HTML embedding.
pub fn sanitize_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        let rest = &input[i..];
        let ch = match rest.chars().next() {
            Some(ch) => ch,
            None => break,
        };
        match ch {
            '<' => match parse_tag(rest) {
                Some((rendered, consumed)) => {
                    out.push_str(&rendered);
                    i += consumed;
                }
                None => {
                    out.push_str("&lt;");
                    i += 1;
                }
            },
            '>' => {
                out.push_str("&gt;");
                i += 1;
            }
            _ => {
                out.push(ch);
                i += ch.len_utf8();
            }
        }
    }
    out
}

/// Try to parse a complete tag at the start of `s` (which begins with `<`).
///
/// Returns the rebuilt tag and the number of input bytes consumed, or `None`
/// when the text is not a well-formed allowlisted tag — in which case the
/// caller escapes the `<` and carries on scanning.
fn parse_tag(s: &str) -> Option<(String, usize)> {
    let rest = s.strip_prefix('<')?;
    let (closing, body) = match rest.strip_prefix('/') {
        Some(r) => (true, r),
        None => (false, rest),
    };

    let name_len = body
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .count();
    if name_len == 0 {
        return None;
    }
    let name = body[..name_len].to_ascii_lowercase();
    let allowed = allowed_attrs(&name)?;

    // Scan to the terminating '>', honoring quoted attribute values.
    let after_name = &body[name_len..];
    let mut quote: Option<char> = None;
    let mut close_at = None;
    for (idx, ch) in after_name.char_indices() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => {}
            None => match ch {
                '"' | '\'' => quote = Some(ch),
                '>' => {
                    close_at = Some(idx);
                    break;
                }
                '<' => return None,
                _ => {}
            },
        }
    }
    let close_at = close_at?;
    let attrs_src = &after_name[..close_at];
    let consumed = 1 + usize::from(closing) + name_len + close_at + 1;

    if closing {
        if !attrs_src.trim().is_empty() {
            return None;
        }
        return Some((format!("</{name}>"), consumed));
    }

    let (attrs_src, self_closing) = match attrs_src.trim_end().strip_suffix('/') {
        Some(stripped) => (stripped, true),
        None => (attrs_src, false),
    };

    let mut rendered = format!("<{name}");
    for (attr, value) in parse_attrs(attrs_src)? {
        if attr.starts_with("on") || !allowed.contains(&attr.as_str()) {
            continue;
        }
        if matches!(attr.as_str(), "href" | "src") {
            match value.as_deref() {
                Some(url) if is_safe_url(url) => {}
                _ => continue,
            }
        }
        match value {
            Some(v) => {
                rendered.push(' ');
                rendered.push_str(&attr);
                rendered.push_str("=\"");
                rendered.push_str(&v.replace('"', "&quot;"));
                rendered.push('"');
            }
            None => {
                rendered.push(' ');
                rendered.push_str(&attr);
            }
        }
    }
    rendered.push_str(if self_closing { " />" } else { ">" });
    Some((rendered, consumed))
}

/// Parse `name`, `name=bare`, `name="value"`, and `name='value'` attribute
/// forms. `None` means the attribute text is malformed and the whole tag
/// should be escaped instead of rebuilt.
fn parse_attrs(s: &str) -> Option<Vec<(String, Option<String>)>> {
    let mut attrs = Vec::new();
    let mut chars = s.char_indices().peekable();

    while let Some(&(start, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }

        // Attribute name.
        let mut end = start;
        while let Some(&(j, c)) = chars.peek() {
            if c.is_whitespace() || c == '=' {
                break;
            }
            if matches!(c, '"' | '\'' | '<' | '>') {
                return None;
            }
            chars.next();
            end = j + c.len_utf8();
        }
        if end == start {
            return None;
        }
        let name = s[start..end].to_ascii_lowercase();

        while matches!(chars.peek(), Some(&(_, c)) if c.is_whitespace()) {
            chars.next();
        }

        let value = if matches!(chars.peek(), Some(&(_, '='))) {
            chars.next();
            while matches!(chars.peek(), Some(&(_, c)) if c.is_whitespace()) {
                chars.next();
            }
            match chars.peek().copied() {
                Some((qstart, q)) if q == '"' || q == '\'' => {
                    chars.next();
                    let vstart = qstart + 1;
                    let mut vend = None;
                    for (j, c) in chars.by_ref() {
                        if c == q {
                            vend = Some(j);
                            break;
                        }
                    }
                    // Unterminated quote: malformed.
                    Some(s[vstart..vend?].to_string())
                }
                Some((vstart, _)) => {
                    let mut vend = s.len();
                    while let Some(&(j, c)) = chars.peek() {
                        if c.is_whitespace() {
                            vend = j;
                            break;
                        }
                        if matches!(c, '"' | '\'') {
                            return None;
                        }
                        chars.next();
                        vend = j + c.len_utf8();
                    }
                    Some(s[vstart..vend].to_string())
                }
                None => Some(String::new()),
            }
        } else {
            None
        };

        attrs.push((name, value));
    }

    Some(attrs)
}

/// Reject URL schemes that execute script when dereferenced.
fn is_safe_url(url: &str) -> bool {
    let compact: String = url
        .chars()
        .filter(|c| !c.is_ascii_control() && !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    !(compact.starts_with("javascript:")
        || compact.starts_with("vbscript:")
        || compact.starts_with("data:"))
}
