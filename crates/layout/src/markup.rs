//! Splitting dialogue text into words, spaces and emoji markers.

/// One token of dialogue text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    /// A run of non-whitespace characters.
    Word(&'a str),
    /// A run of whitespace.
    Space,
    /// `{name}` marker; carries the name without braces.
    Emoji(&'a str),
}

/// Tokenize dialogue text.
///
/// A marker runs from a `{` to the nearest following `}`. An unmatched `{`
/// is ordinary text.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let marker = rest
            .find('{')
            .and_then(|open| rest[open..].find('}').map(|close| (open, open + close)));

        match marker {
            Some((open, close)) => {
                split_plain(&rest[..open], &mut tokens);
                tokens.push(Token::Emoji(&rest[open + 1..close]));
                rest = &rest[close + 1..];
            }
            None => {
                split_plain(rest, &mut tokens);
                break;
            }
        }
    }

    tokens
}

fn split_plain<'a>(text: &'a str, tokens: &mut Vec<Token<'a>>) {
    let mut word_start: Option<usize> = None;
    let mut in_space = false;

    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some(start) = word_start.take() {
                tokens.push(Token::Word(&text[start..i]));
            }
            if !in_space {
                tokens.push(Token::Space);
                in_space = true;
            }
        } else {
            in_space = false;
            word_start.get_or_insert(i);
        }
    }

    if let Some(start) = word_start {
        tokens.push(Token::Word(&text[start..]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Token::*;

    #[test]
    fn test_words_and_markers() {
        assert_eq!(
            tokenize("Hello {smile} world"),
            vec![Word("Hello"), Space, Emoji("smile"), Space, Word("world")]
        );
    }

    #[test]
    fn test_adjacent_markers() {
        assert_eq!(
            tokenize("{a}{b}end"),
            vec![Emoji("a"), Emoji("b"), Word("end")]
        );
    }

    #[test]
    fn test_whitespace_runs_collapse() {
        assert_eq!(
            tokenize("  two \t words "),
            vec![Space, Word("two"), Space, Word("words"), Space]
        );
    }

    #[test]
    fn test_unclosed_brace_is_text() {
        assert_eq!(tokenize("oops {smile"), vec![Word("oops"), Space, Word("{smile")]);
    }

    #[test]
    fn test_marker_is_shortest_match() {
        assert_eq!(
            tokenize("x{a{b}c}"),
            vec![Word("x"), Emoji("a{b"), Word("c}")]
        );
        assert_eq!(tokenize("{}"), vec![Emoji("")]);
    }

    #[test]
    fn test_empty_text() {
        assert!(tokenize("").is_empty());
    }
}
