//! Finding `@mentions` in text

use std::sync::LazyLock;

use regex::Regex;

/// `@` at the start of text or after anything but a word character, `@` or a
/// backtick, so email addresses and code spans do not match
#[allow(clippy::expect_used)]
static MENTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\w@`])(@[A-Za-z0-9_~.][A-Za-z0-9_./~:-]*)").expect("valid mention regex")
});

const TRAILING_PUNCTUATION: &[char] = &['.', ',', ':', ';'];

/// Extract mention tokens (including the `@`) in order of appearance.
///
/// Mentions inside fenced code blocks and inline code are ignored. Repeated
/// mentions are all returned.
pub fn parse_mentions(text: &str) -> Vec<String> {
    let masked = mask_code(text);
    MENTION_RE
        .captures_iter(&masked)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim_end_matches(TRAILING_PUNCTUATION))
        .filter(|token| token.len() > 1)
        .map(str::to_string)
        .collect()
}

/// Blank out fenced code blocks and the inside of inline code spans
fn mask_code(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_fence = false;

    for line in text.split_inclusive('\n') {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
            out.push_str(&blank(line));
            continue;
        }
        if in_fence {
            out.push_str(&blank(line));
            continue;
        }

        let mut in_inline = false;
        for c in line.chars() {
            if c == '`' {
                in_inline = !in_inline;
                out.push(c);
            } else if in_inline && c != '\n' {
                out.push(' ');
            } else {
                out.push(c);
            }
        }
    }
    out
}

fn blank(line: &str) -> String {
    line.chars()
        .map(|c| if c == '\n' { '\n' } else { ' ' })
        .collect()
}
