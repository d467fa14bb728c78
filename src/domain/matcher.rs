//! Substring relevance matching
//!
//! Case-insensitive scoring of a search pattern against a task name
//! using the KMP prefix function: one left-to-right scan of the text,
//! tracking the longest pattern prefix matched so far and returning
//! early once the whole pattern occurs. The prefix table is rebuilt per
//! call; scoring is O(|pattern| + |text|).

/// Returns the length (in characters) of the longest prefix of
/// `pattern` matched anywhere in `text`, ignoring case.
///
/// Zero when either input is empty or the pattern is longer than the
/// text. A score equal to the pattern length means the pattern occurs
/// verbatim as a substring.
pub fn relevance(pattern: &str, text: &str) -> usize {
    let pattern: Vec<char> = pattern.to_lowercase().chars().collect();
    let text: Vec<char> = text.to_lowercase().chars().collect();
    if pattern.is_empty() || text.is_empty() || pattern.len() > text.len() {
        return 0;
    }

    let table = prefix_table(&pattern);
    let mut matched = 0;
    let mut best = 0;

    for &c in &text {
        while matched > 0 && pattern[matched] != c {
            matched = table[matched - 1];
        }
        if pattern[matched] == c {
            matched += 1;
        }
        if matched > best {
            best = matched;
        }
        if matched == pattern.len() {
            return matched;
        }
    }
    best
}

/// Returns true if `pattern` occurs in `text` as a case-insensitive
/// substring, i.e. the relevance score reaches the full pattern length.
pub fn is_match(pattern: &str, text: &str) -> bool {
    relevance(pattern, text) == pattern.to_lowercase().chars().count()
}

/// Standard KMP failure function: `table[i]` is the length of the
/// longest proper prefix of `pattern[..=i]` that is also a suffix.
fn prefix_table(pattern: &[char]) -> Vec<usize> {
    let mut table = vec![0; pattern.len()];
    let mut len = 0;

    for i in 1..pattern.len() {
        while len > 0 && pattern[i] != pattern[len] {
            len = table[len - 1];
        }
        if pattern[i] == pattern[len] {
            len += 1;
        }
        table[i] = len;
    }
    table
}
