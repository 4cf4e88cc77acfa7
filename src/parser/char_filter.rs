/// `CharFilter` - Iterator that filters out strings and comments
///
/// Wraps a string iterator and maintains state about whether we're inside
/// string literals or comments, across line boundaries. It's used to ensure
/// the rewrite stages only touch actual C# code, not string contents or
/// comments.

/// Type of string delimiter we're currently inside
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StringDelimiter {
    #[default]
    None,
    Single,   // '...'
    Double,   // "..."
    Verbatim, // @"..."
}

/// Type of comment we're currently inside
#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum CommentState {
    #[default]
    None,
    Line,  // // ...
    Block, // /* ... */
}

/// Iterator adapter that filters out strings and comments
///
/// Yields (position, character) pairs for only the actual C# code,
/// skipping over string contents and comments.
pub struct CharFilter<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    state: FilterState,
    filter_comments: bool,
    filter_strings: bool,
}

#[derive(Debug, Default)]
struct FilterState {
    instring: StringDelimiter,
    incomment: CommentState,
    /// Next character is string content regardless of its value (the
    /// character after a backslash escape, the opening quote of @"...",
    /// or the second quote of a "" escape)
    literal_next: bool,
    /// Next character is the '*' of a /* opener
    opener_next: bool,
    /// Previous block-comment character was '*'
    star_seen: bool,
}

impl<'a> CharFilter<'a> {
    /// Create a new `CharFilter`
    ///
    /// # Arguments
    /// * `content` - The string to iterate over
    /// * `filter_comments` - Whether to filter out comment contents
    /// * `filter_strings` - Whether to filter out string contents
    #[must_use]
    pub fn new(content: &'a str, filter_comments: bool, filter_strings: bool) -> Self {
        Self {
            chars: content.char_indices().peekable(),
            state: FilterState::default(),
            filter_comments,
            filter_strings,
        }
    }

    /// Check if we're currently inside a string
    #[must_use]
    pub fn instring(&self) -> bool {
        self.state.instring != StringDelimiter::None
    }

    /// Peek at the next character without consuming
    fn peek_next_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn skip_or_yield(&mut self, skip: bool, item: (usize, char)) -> Option<(usize, char)> {
        if skip {
            self.next()
        } else {
            Some(item)
        }
    }
}

impl Iterator for CharFilter<'_> {
    type Item = (usize, char);

    fn next(&mut self) -> Option<Self::Item> {
        let (pos, c) = self.chars.next()?;

        // Comments (quotes inside a comment are content, not delimiters)
        match self.state.incomment {
            CommentState::Line => {
                if c == '\n' {
                    // The newline terminates the comment and is itself code
                    self.state.incomment = CommentState::None;
                    return Some((pos, c));
                }
                return self.skip_or_yield(self.filter_comments, (pos, c));
            }
            CommentState::Block => {
                if self.state.opener_next {
                    // The '*' of the opener never pairs with a following '/'
                    self.state.opener_next = false;
                    return self.skip_or_yield(self.filter_comments, (pos, c));
                }
                if c == '/' && self.state.star_seen {
                    self.state.incomment = CommentState::None;
                    self.state.star_seen = false;
                    return self.skip_or_yield(self.filter_comments, (pos, c));
                }
                self.state.star_seen = c == '*';
                return self.skip_or_yield(self.filter_comments, (pos, c));
            }
            CommentState::None => {}
        }

        // Inside a string (comment markers inside a string are content)
        match self.state.instring {
            StringDelimiter::Single | StringDelimiter::Double => {
                if self.state.literal_next {
                    self.state.literal_next = false;
                    return self.skip_or_yield(self.filter_strings, (pos, c));
                }
                if c == '\\' {
                    self.state.literal_next = true;
                    return self.skip_or_yield(self.filter_strings, (pos, c));
                }
                let closing = if self.state.instring == StringDelimiter::Single {
                    '\''
                } else {
                    '"'
                };
                if c == closing {
                    self.state.instring = StringDelimiter::None;
                    return self.skip_or_yield(self.filter_strings, (pos, c));
                }
                if c == '\n' {
                    // Regular strings and char literals cannot span lines;
                    // treat the literal as unterminated and resume as code
                    self.state.instring = StringDelimiter::None;
                    return Some((pos, c));
                }
                return self.skip_or_yield(self.filter_strings, (pos, c));
            }
            StringDelimiter::Verbatim => {
                if self.state.literal_next {
                    self.state.literal_next = false;
                    return self.skip_or_yield(self.filter_strings, (pos, c));
                }
                if c == '"' {
                    if self.peek_next_char() == Some('"') {
                        // "" is an escaped quote inside a verbatim string
                        self.state.literal_next = true;
                    } else {
                        self.state.instring = StringDelimiter::None;
                    }
                }
                return self.skip_or_yield(self.filter_strings, (pos, c));
            }
            StringDelimiter::None => {}
        }

        // Comment open
        if c == '/' {
            match self.peek_next_char() {
                Some('/') => {
                    self.state.incomment = CommentState::Line;
                    return self.skip_or_yield(self.filter_comments, (pos, c));
                }
                Some('*') => {
                    self.state.incomment = CommentState::Block;
                    self.state.opener_next = true;
                    return self.skip_or_yield(self.filter_comments, (pos, c));
                }
                _ => {}
            }
        }

        // String open
        match c {
            '"' => {
                self.state.instring = StringDelimiter::Double;
                return self.skip_or_yield(self.filter_strings, (pos, c));
            }
            '\'' => {
                self.state.instring = StringDelimiter::Single;
                return self.skip_or_yield(self.filter_strings, (pos, c));
            }
            '@' if self.peek_next_char() == Some('"') => {
                self.state.instring = StringDelimiter::Verbatim;
                self.state.literal_next = true;
                return self.skip_or_yield(self.filter_strings, (pos, c));
            }
            _ => {}
        }

        Some((pos, c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_of(input: &str) -> String {
        CharFilter::new(input, true, true).map(|(_, c)| c).collect()
    }

    #[test]
    fn test_no_filtering_is_identity() {
        let input = "var x = \"hi\"; // done\n/* block */ 'c' @\"v\"";
        let filter = CharFilter::new(input, false, false);
        let result: String = filter.map(|(_, c)| c).collect();
        assert_eq!(result, input);
    }

    #[test]
    fn test_filter_strings() {
        assert_eq!(code_of(r#"var x = "hello" + 5;"#), "var x =  + 5;");
    }

    #[test]
    fn test_filter_char_literal() {
        assert_eq!(code_of("var c = 'x';"), "var c = ;");
    }

    #[test]
    fn test_filter_escaped_quote() {
        assert_eq!(code_of(r#"var s = "a\"b";"#), "var s = ;");
    }

    #[test]
    fn test_filter_line_comment() {
        assert_eq!(code_of("x = 5; // comment\ny = 6;"), "x = 5; \ny = 6;");
    }

    #[test]
    fn test_filter_block_comment_multiline() {
        assert_eq!(code_of("a /* one\ntwo */ b"), "a  b");
    }

    #[test]
    fn test_slash_star_slash_does_not_close() {
        // The '*' of the opener cannot also close the comment
        assert_eq!(code_of("a /*/ still comment */ b"), "a  b");
    }

    #[test]
    fn test_comment_marker_inside_string() {
        assert_eq!(code_of(r#"var s = "// not a comment"; x"#), "var s = ; x");
    }

    #[test]
    fn test_quote_inside_comment() {
        assert_eq!(code_of("x // say \"hi\"\ny"), "x \ny");
    }

    #[test]
    fn test_verbatim_string_spans_lines() {
        assert_eq!(code_of("a = @\"one\ntwo\"; b"), "a = ; b");
    }

    #[test]
    fn test_verbatim_escaped_quote() {
        assert_eq!(code_of(r#"a = @"he said ""hi"""; b"#), "a = ; b");
    }

    #[test]
    fn test_unterminated_string_resets_at_newline() {
        assert_eq!(code_of("var s = \"oops\nnext;"), "var s = \nnext;");
    }

    #[test]
    fn test_instring_check() {
        let input = r#"x = "hello""#;
        let mut filter = CharFilter::new(input, false, false);
        assert!(!filter.instring());
        for (_, c) in filter.by_ref() {
            if c == 'h' {
                break;
            }
        }
        assert!(filter.instring());
    }

    #[test]
    fn test_position_tracking() {
        let input = "x = 5";
        let filter = CharFilter::new(input, false, false);
        let positions: Vec<usize> = filter.map(|(pos, _)| pos).collect();
        assert_eq!(positions, vec![0, 1, 2, 3, 4]);
    }
}
