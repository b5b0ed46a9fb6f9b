/// Greedy word wrap at `width` columns. Always returns at least one line.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();

    for word in text.split_whitespace() {
        match lines.last_mut() {
            Some(line) if line.chars().count() + 1 + word.chars().count() <= width => {
                line.push(' ');
                line.push_str(word);
            }
            _ => lines.push(word.to_string()),
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Shortens `s` to at most `max_chars` characters, marking the cut with `…`.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let keep = max_chars.saturating_sub(1);
    let mut out: String = s.chars().take(keep).collect();
    if max_chars > 0 {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_keeps_short_text() {
        assert_eq!(wrap("neighbor map", 20), vec!["neighbor map"]);
    }

    #[test]
    fn wrap_breaks_at_width() {
        assert_eq!(
            wrap("unknown compound in ordering", 16),
            vec!["unknown compound", "in ordering"]
        );
    }

    #[test]
    fn wrap_empty_gives_one_line() {
        assert_eq!(wrap("   ", 10), vec![""]);
    }

    #[test]
    fn truncate_fits() {
        assert_eq!(truncate("CHEMBL25", 8), "CHEMBL25");
    }

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate("CHEMBL1201583", 8), "CHEMBL1…");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn truncate_counts_chars() {
        assert_eq!(truncate("αβγδε", 3), "αβ…");
    }
}
