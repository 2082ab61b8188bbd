/// Greedy word-wrap on character counts.
///
/// Runs of whitespace collapse to one space. Hyphenated words may break
/// after an inner hyphen (`state-of-the-art` → `state-of-the-` / `art`).
/// A word longer than `width` fills what is left of the current line and
/// continues on the next. Blank input yields no lines.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for (index, chunk) in text
        .split_whitespace()
        .flat_map(|word| hyphen_chunks(word).into_iter().enumerate())
    {
        // Chunks after the first continue the same word: no space before them.
        let glued = index > 0;
        let mut rest = chunk;
        loop {
            let rest_len = rest.chars().count();
            let sep = usize::from(current_len > 0 && !glued);

            if current_len + sep + rest_len <= width {
                if sep == 1 {
                    current.push(' ');
                }
                current.push_str(rest);
                current_len += sep + rest_len;
                break;
            }

            let room = width.saturating_sub(current_len + sep);
            if rest_len <= width || room == 0 {
                // Start a fresh line and retry the word there.
                lines.push(std::mem::take(&mut current));
                current_len = 0;
                continue;
            }

            // Over-long word: fill the remaining room and carry the tail over.
            let split_at = rest
                .char_indices()
                .nth(room)
                .map(|(i, _)| i)
                .unwrap_or(rest.len());
            if sep == 1 {
                current.push(' ');
            }
            current.push_str(&rest[..split_at]);
            lines.push(std::mem::take(&mut current));
            current_len = 0;
            rest = &rest[split_at..];
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Splits after every hyphen that sits between a word character and a letter.
fn hyphen_chunks(word: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    let mut chars = word.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c == '-' {
            let joins_word = prev.is_some_and(char::is_alphanumeric);
            let before_letter = chars.peek().is_some_and(|&(_, next)| next.is_alphabetic());
            if joins_word && before_letter {
                let end = i + c.len_utf8();
                chunks.push(&word[start..end]);
                start = end;
            }
        }
        prev = Some(c);
    }
    chunks.push(&word[start..]);
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_text_has_no_lines() {
        assert!(wrap_text("", 60).is_empty());
        assert!(wrap_text("   \n\t ", 60).is_empty());
    }

    #[test]
    fn test_short_text_is_one_line() {
        assert_eq!(wrap_text("- Learn Rust", 60), vec!["- Learn Rust"]);
    }

    #[test]
    fn test_whitespace_collapses() {
        assert_eq!(wrap_text("a   b\n\nc", 60), vec!["a b c"]);
    }

    #[test]
    fn test_breaks_at_word_boundary_within_width() {
        let lines = wrap_text("aaaa bbbb cccc", 9);
        assert_eq!(lines, vec!["aaaa bbbb", "cccc"]);
    }

    #[test]
    fn test_exact_width_fits() {
        let text = "x".repeat(60);
        assert_eq!(wrap_text(&text, 60), vec![text]);
    }

    #[test]
    fn test_long_word_is_split() {
        let lines = wrap_text("- abcdefghij", 5);
        assert_eq!(lines, vec!["- abc", "defgh", "ij"]);
    }

    #[test]
    fn test_no_line_exceeds_width() {
        let text = "Contribute regularly to open source Rust crates and eventually maintain one \
                    supercalifragilisticexpialidociouslyunreasonablylongidentifier too";
        for line in wrap_text(text, 20) {
            assert!(line.chars().count() <= 20, "line too long: {line:?}");
        }
    }

    #[test]
    fn test_breaks_after_inner_hyphen() {
        let lines = wrap_text("- Contribute to state-of-the-art open-source projects", 30);
        assert_eq!(
            lines,
            vec!["- Contribute to state-of-the-", "art open-source projects"]
        );
    }

    #[test]
    fn test_hyphen_chunks() {
        assert_eq!(hyphen_chunks("state-of-the-art"), vec!["state-", "of-", "the-", "art"]);
        assert_eq!(hyphen_chunks("-"), vec!["-"]);
        assert_eq!(hyphen_chunks("covid-19"), vec!["covid-19"]);
        assert_eq!(hyphen_chunks("--flag"), vec!["--flag"]);
        assert_eq!(hyphen_chunks("trailing-"), vec!["trailing-"]);
    }

    #[test]
    fn test_hyphenated_word_that_fits_stays_whole() {
        assert_eq!(wrap_text("well-known crate", 60), vec!["well-known crate"]);
    }

    #[test]
    fn test_multibyte_characters_count_as_one() {
        let lines = wrap_text("ééééé ééééé", 5);
        assert_eq!(lines, vec!["ééééé", "ééééé"]);
    }
}
