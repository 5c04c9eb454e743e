/// Greedy word wrap on whitespace. Words longer than `width` get a line of their own.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Shortens `s` to at most `max_chars` characters, marking the cut with `…`.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }

    let mut out: String = s.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_breaks_between_words() {
        assert_eq!(wrap("the quick brown fox", 10), vec!["the quick", "brown fox"]);
        assert_eq!(wrap("C[C@@H](C(=O)O)N", 5), vec!["C[C@@H](C(=O)O)N"]);
    }

    #[test]
    fn wrap_of_blank_text_is_one_empty_line() {
        assert_eq!(wrap("   ", 10), vec![String::new()]);
    }

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("CCO", 3), "CCO");
        assert_eq!(truncate("CCO", 10), "CCO");
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("c1ccccc1O", 5), "c1cc…");
        assert_eq!(truncate("αβγδε", 3), "αβ…");
        assert_eq!(truncate("CCO", 0), "");
    }
}
