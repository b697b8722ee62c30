//! Inline markdown ↔ inline spans.
//!
//! Recognized at each position, in priority order:
//!
//! | Source          | Span                 |
//! |-----------------|----------------------|
//! | `***x***`       | `BoldItalic`         |
//! | `**x**`         | `Bold`               |
//! | `*x*`           | `Italic`             |
//! | `` `x` ``       | `Code`               |
//! | `[text](href)`  | `Link`               |
//!
//! Scanning is left to right and greedy: the first valid closer wins and a
//! resolved span is never revisited. Emphasis needs non-empty content, an opener
//! not followed by whitespace and a closer not preceded by whitespace. A `*`
//! closer skips over `**` pairs so bold can nest inside italic. Anything
//! unmatched stays literal text.
//!
//! Nothing is escaped in either direction, so for every string `x`:
//! `to_markdown(&to_inline(x)) == x`.

use crate::ir::nodes::InlineSpan;

/// Parses a run of inline markdown into spans.
pub fn to_inline(text: &str) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    let mut literal_start = 0;
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];
        let matched = match rest.as_bytes()[0] {
            b'*' => match_emphasis(text, pos),
            b'`' => match_code(text, pos),
            b'[' => match_link(text, pos),
            _ => None,
        };

        match matched {
            Some((span, end)) => {
                push_text(&mut spans, &text[literal_start..pos]);
                spans.push(span);
                pos = end;
                literal_start = end;
            }
            None => {
                pos += rest.chars().next().map_or(1, char::len_utf8);
            }
        }
    }

    push_text(&mut spans, &text[literal_start..]);
    spans
}

/// Renders spans back to inline markdown.
pub fn to_markdown(spans: &[InlineSpan]) -> String {
    let mut out = String::new();
    for span in spans {
        write_span(span, &mut out);
    }
    out
}

fn write_span(span: &InlineSpan, out: &mut String) {
    match span {
        InlineSpan::PlainText(text) => out.push_str(text),
        InlineSpan::Bold(children) => wrap("**", children, out),
        InlineSpan::Italic(children) => wrap("*", children, out),
        InlineSpan::BoldItalic(children) => wrap("***", children, out),
        InlineSpan::Code(code) => {
            out.push('`');
            out.push_str(code);
            out.push('`');
        }
        InlineSpan::Link { href, children } => {
            out.push('[');
            for child in children {
                write_span(child, out);
            }
            out.push_str("](");
            out.push_str(href);
            out.push(')');
        }
    }
}

fn wrap(delimiter: &str, children: &[InlineSpan], out: &mut String) {
    out.push_str(delimiter);
    for child in children {
        write_span(child, out);
    }
    out.push_str(delimiter);
}

/// Appends literal text, merging with a preceding literal.
fn push_text(spans: &mut Vec<InlineSpan>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(InlineSpan::PlainText(last)) = spans.last_mut() {
        last.push_str(text);
    } else {
        spans.push(InlineSpan::PlainText(text.to_string()));
    }
}

fn match_emphasis(text: &str, pos: usize) -> Option<(InlineSpan, usize)> {
    let rest = &text[pos..];
    if rest.starts_with("***") {
        if let Some(found) = match_delimited(text, pos, "***", InlineSpan::BoldItalic) {
            return Some(found);
        }
    }
    if rest.starts_with("**") {
        if let Some(found) = match_delimited(text, pos, "**", InlineSpan::Bold) {
            return Some(found);
        }
    }
    match_delimited(text, pos, "*", InlineSpan::Italic)
}

/// Matches `delimiter content delimiter` starting at `pos`.
fn match_delimited(
    text: &str,
    pos: usize,
    delimiter: &str,
    build: fn(Vec<InlineSpan>) -> InlineSpan,
) -> Option<(InlineSpan, usize)> {
    let open_end = pos + delimiter.len();
    let first = text[open_end..].chars().next()?;
    if first.is_whitespace() || first == '*' {
        return None;
    }

    let close = find_closer(text, open_end, delimiter)?;
    let content = &text[open_end..close];
    Some((build(to_inline(content)), close + delimiter.len()))
}

/// Finds the first valid closing delimiter at or after `from`.
fn find_closer(text: &str, from: usize, delimiter: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = from + 1;
    while i < bytes.len() {
        if bytes[i] != b'*' {
            i += 1;
            continue;
        }
        if delimiter == "*" && text[i..].starts_with("**") {
            i += 2;
            continue;
        }
        let preceded_by_space = text[..i].chars().next_back().is_some_and(char::is_whitespace);
        if text[i..].starts_with(delimiter) && !preceded_by_space {
            return Some(i);
        }
        i += 1;
    }
    None
}

fn match_code(text: &str, pos: usize) -> Option<(InlineSpan, usize)> {
    let start = pos + 1;
    let len = text[start..].find('`')?;
    if len == 0 {
        return None;
    }
    let code = &text[start..start + len];
    Some((InlineSpan::Code(code.to_string()), start + len + 1))
}

fn match_link(text: &str, pos: usize) -> Option<(InlineSpan, usize)> {
    let label_start = pos + 1;
    let label_len = text[label_start..].find("](")?;
    let href_start = label_start + label_len + 2;
    let href_len = text[href_start..].find(')')?;

    let label = &text[label_start..label_start + label_len];
    let href = &text[href_start..href_start + href_len];
    Some((
        InlineSpan::Link {
            href: href.to_string(),
            children: to_inline(label),
        },
        href_start + href_len + 1,
    ))
}
