//! Summary normalization: strip formatting artifacts from model output and
//! cut it to a sentence budget. Pure functions; safe to call from any worker.

/// Line prefixes that mark markdown structure or chatty preambles.
const DROPPED_PREFIXES: [&str; 6] = [
    "#",
    "**",
    "-",
    "* ",
    "Here's a breakdown",
    "The following",
];

const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Drop blank and formatting lines, then join the rest with single spaces.
pub fn clean(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !DROPPED_PREFIXES.iter().any(|p| line.starts_with(p)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Keep the first `n` sentences. Text with fewer than `n` terminators is
/// returned whole (trimmed).
pub fn truncate_sentences(text: &str, n: usize) -> String {
    if n == 0 {
        return String::new();
    }
    let mut seen = 0;
    for (i, ch) in text.char_indices() {
        if SENTENCE_TERMINATORS.contains(&ch) {
            seen += 1;
            if seen == n {
                return text[..i + ch.len_utf8()].trim().to_string();
            }
        }
    }
    text.trim().to_string()
}

/// [`clean`] then [`truncate_sentences`].
pub fn normalize(raw: &str, max_sentences: usize) -> String {
    truncate_sentences(&clean(raw), max_sentences)
}
