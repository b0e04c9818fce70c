/// Character cursor with line/column tracking.
///
/// Wraps a source string and provides character-by-character iteration.
/// Positions are 1-based line/column pairs; columns count characters, not
/// bytes, so multi-byte identifiers report sensible positions.
pub struct Cursor<'src> {
    chars: std::str::Chars<'src>,
    line: u32,
    col: u32,
}

impl<'src> Cursor<'src> {
    /// Create a new cursor at the start of the source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            chars: source.chars(),
            line: 1,
            col: 1,
        }
    }

    /// Look at the current character without consuming it.
    pub fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    /// Look at the character after the current one without consuming anything.
    pub fn peek_next(&self) -> Option<char> {
        let mut iter = self.chars.clone();
        iter.next();
        iter.next()
    }

    /// Consume the current character and advance the position.
    pub fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    /// Current position.
    pub fn pos(&self) -> aster_common::Pos {
        aster_common::Pos::new(self.line, self.col)
    }

    /// Whether there are no more characters to consume.
    pub fn is_eof(&self) -> bool {
        self.peek().is_none()
    }

    /// Advance while the predicate holds, collecting the consumed text.
    pub fn eat_while(&mut self, predicate: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if predicate(c) {
                self.advance();
                out.push(c);
            } else {
                break;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aster_common::Pos;

    #[test]
    fn starts_at_line_one_col_one() {
        let cursor = Cursor::new("abc");
        assert_eq!(cursor.pos(), Pos::new(1, 1));
        assert!(!cursor.is_eof());
    }

    #[test]
    fn peek_does_not_advance() {
        let cursor = Cursor::new("ab");
        assert_eq!(cursor.peek(), Some('a'));
        assert_eq!(cursor.peek(), Some('a'));
        assert_eq!(cursor.pos(), Pos::new(1, 1));
    }

    #[test]
    fn newline_resets_column() {
        let mut cursor = Cursor::new("a\nb");
        cursor.advance();
        assert_eq!(cursor.pos(), Pos::new(1, 2));
        cursor.advance();
        assert_eq!(cursor.pos(), Pos::new(2, 1));
        cursor.advance();
        assert_eq!(cursor.pos(), Pos::new(2, 2));
    }

    #[test]
    fn multibyte_counts_one_column() {
        let mut cursor = Cursor::new("\u{6a21}\u{5757}");
        cursor.advance();
        assert_eq!(cursor.pos(), Pos::new(1, 2));
    }

    #[test]
    fn eat_while_collects_text() {
        let mut cursor = Cursor::new("abc123");
        let word = cursor.eat_while(|c| c.is_alphabetic());
        assert_eq!(word, "abc");
        assert_eq!(cursor.peek(), Some('1'));
    }
}
