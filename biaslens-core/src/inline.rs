//! Inline markdown tokenizer.
//!
//! Recognises `**bold**`, `*italic*`, `` `code` `` and `[label](url)` with a
//! greedy left-to-right scan. At each position the forms are tried in that
//! priority order, each closing on the nearest delimiter and never crossing a
//! newline. Anything else becomes plain text. A special character that opens
//! nothing is emitted on its own, so every input character lands in exactly
//! one run.

/// A styled piece of inline text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Run {
    Plain(String),
    Bold(String),
    Italic(String),
    Code(String),
    Link { label: String, url: String },
}

impl Run {
    /// The visible text of this run, without markup.
    pub fn text(&self) -> &str {
        match self {
            Run::Plain(s) | Run::Bold(s) | Run::Italic(s) | Run::Code(s) => s,
            Run::Link { label, .. } => label,
        }
    }
}

const SPECIAL: [char; 3] = ['*', '`', '['];

/// Splits `text` into styled runs.
pub fn tokenize(text: &str) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let (run, consumed) = next_run(rest);
        runs.push(run);
        rest = &rest[consumed..];
    }

    runs
}

/// Concatenates the visible text of `runs`.
pub fn plain_text(runs: &[Run]) -> String {
    runs.iter().map(Run::text).collect()
}

/// Recognises the run at the start of `rest` and returns it with its byte length.
fn next_run(rest: &str) -> (Run, usize) {
    if let Some((inner, used)) = delimited(rest, "**", "**") {
        return (Run::Bold(inner.to_owned()), used);
    }
    if let Some((inner, used)) = delimited(rest, "*", "*") {
        return (Run::Italic(inner.to_owned()), used);
    }
    if let Some((inner, used)) = delimited(rest, "`", "`") {
        return (Run::Code(inner.to_owned()), used);
    }
    if let Some((label, url, used)) = link(rest) {
        return (Run::Link { label: label.to_owned(), url: url.to_owned() }, used);
    }

    let plain_len = rest.find(SPECIAL).unwrap_or(rest.len());
    if plain_len > 0 {
        return (Run::Plain(rest[..plain_len].to_owned()), plain_len);
    }

    // Stray special character: all three are ASCII, one byte.
    (Run::Plain(rest[..1].to_owned()), 1)
}

/// Matches `open … close` at the start of `rest` on a single line.
fn delimited<'a>(rest: &'a str, open: &str, close: &str) -> Option<(&'a str, usize)> {
    let body = rest.strip_prefix(open)?;
    let line = body.split('\n').next().unwrap_or(body);
    let end = line.find(close)?;
    Some((&body[..end], open.len() + end + close.len()))
}

/// Matches `[label](url)` at the start of `rest` on a single line.
///
/// The label is the shortest one followed by `](` for which a closing `)`
/// exists; the url closes on the first `)`.
fn link(rest: &str) -> Option<(&str, &str, usize)> {
    let body = rest.strip_prefix('[')?;
    let line = body.split('\n').next().unwrap_or(body);

    let mut search_from = 0;
    while let Some(found) = line[search_from..].find("](") {
        let label_end = search_from + found;
        let url_start = label_end + 2;
        if let Some(url_len) = line[url_start..].find(')') {
            let url_end = url_start + url_len;
            return Some((&line[..label_end], &line[url_start..url_end], 1 + url_end + 1));
        }
        search_from = label_end + 1;
    }
    None
}
