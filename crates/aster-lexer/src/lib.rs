// Aster lexer -- canonicalizer, tokenizer, and keyword translator.

mod canonical;
mod cursor;
mod translate;

pub use canonical::canonicalize;
pub use translate::translate_keywords;

use aster_common::{
    Channel, CommentPlacement, CompileError, ErrorCode, Pos, Span, Token, TokenKind,
};
use aster_lexicon::{Lexicon, LiteralWord};
use cursor::Cursor;

/// Tokenize canonicalized source into a stream terminated by one `Eof`.
///
/// Indentation is significant and must come in two-space multiples; the
/// lexer maintains a depth stack and emits `Indent`/`Dedent` tokens around
/// it. Comments ride the trivia channel and never affect indentation.
pub fn tokenize(source: &str, lexicon: &Lexicon) -> Result<Vec<Token>, CompileError> {
    let mut lexer = Lexer::new(source, lexicon);
    lexer.run()?;
    Ok(lexer.tokens)
}

struct Lexer<'src, 'lex> {
    cursor: Cursor<'src>,
    lexicon: &'lex Lexicon,
    tokens: Vec<Token>,
    /// Stack of open indentation widths. Never empty; starts at [0].
    indents: Vec<u32>,
    /// Whether a main-channel token has been emitted on the current line.
    line_has_code: bool,
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl<'src, 'lex> Lexer<'src, 'lex> {
    fn new(source: &'src str, lexicon: &'lex Lexicon) -> Self {
        Self {
            cursor: Cursor::new(source),
            lexicon,
            tokens: Vec::new(),
            indents: vec![0],
            line_has_code: false,
        }
    }

    fn run(&mut self) -> Result<(), CompileError> {
        while !self.cursor.is_eof() {
            self.lex_line()?;
        }
        let at = Span::point(self.cursor.pos());
        while self.indents.len() > 1 {
            self.indents.pop();
            self.tokens.push(Token::new(TokenKind::Dedent, "", at));
        }
        self.tokens.push(Token::new(TokenKind::Eof, "", at));
        Ok(())
    }

    // ── Line handling ──────────────────────────────────────────────────

    fn lex_line(&mut self) -> Result<(), CompileError> {
        self.line_has_code = false;
        let indent_start = self.cursor.pos();
        let mut width = 0u32;
        while let Some(c) = self.cursor.peek() {
            match c {
                ' ' => {
                    self.cursor.advance();
                    width += 1;
                }
                '\t' => {
                    return Err(CompileError::new(
                        ErrorCode::INDENTATION_ERROR,
                        "tabs are not allowed in indentation",
                        Span::point(self.cursor.pos()),
                    ));
                }
                _ => break,
            }
        }

        // Blank and comment-only lines leave the indent stack untouched.
        match self.cursor.peek() {
            None => return Ok(()),
            Some('\n') => {
                self.emit_newline();
                return Ok(());
            }
            Some('#') => {
                self.lex_comment();
                if self.cursor.peek() == Some('\n') {
                    self.emit_newline();
                }
                return Ok(());
            }
            Some('/') if self.cursor.peek_next() == Some('/') => {
                self.lex_comment();
                if self.cursor.peek() == Some('\n') {
                    self.emit_newline();
                }
                return Ok(());
            }
            Some(_) => {}
        }

        self.apply_indent(width, indent_start)?;

        while let Some(c) = self.cursor.peek() {
            match c {
                '\n' => {
                    self.emit_newline();
                    return Ok(());
                }
                ' ' | '\t' => {
                    self.cursor.advance();
                }
                '#' => self.lex_comment(),
                '/' if self.cursor.peek_next() == Some('/') => self.lex_comment(),
                '"' => self.lex_string()?,
                '.' => self.punct(TokenKind::Dot),
                ':' => self.punct(TokenKind::Colon),
                ',' => self.punct(TokenKind::Comma),
                '(' => self.punct(TokenKind::LParen),
                ')' => self.punct(TokenKind::RParen),
                '[' => self.punct(TokenKind::LBracket),
                ']' => self.punct(TokenKind::RBracket),
                '=' => self.punct(TokenKind::Equals),
                '<' => self.punct(TokenKind::Lt),
                '>' => self.punct(TokenKind::Gt),
                c if c.is_ascii_digit() => self.lex_number(),
                c if is_ident_start(c) => self.lex_word(),
                other => {
                    return Err(CompileError::new(
                        ErrorCode::UNEXPECTED_CHARACTER,
                        format!("unexpected character: {other:?}"),
                        Span::point(self.cursor.pos()),
                    ));
                }
            }
        }
        Ok(())
    }

    fn apply_indent(&mut self, width: u32, at: Pos) -> Result<(), CompileError> {
        if width % 2 != 0 {
            return Err(CompileError::new(
                ErrorCode::INDENTATION_ERROR,
                format!("indentation must be a multiple of two spaces, found {width}"),
                Span::point(at),
            ));
        }
        let top = *self.indents.last().expect("indent stack is never empty");
        let span = Span::new(at, self.cursor.pos());
        if width > top {
            self.indents.push(width);
            self.tokens.push(Token::new(TokenKind::Indent, "", span));
        } else if width < top {
            while *self.indents.last().expect("indent stack is never empty") > width {
                self.indents.pop();
                self.tokens.push(Token::new(TokenKind::Dedent, "", span));
            }
            if *self.indents.last().expect("indent stack is never empty") != width {
                return Err(CompileError::new(
                    ErrorCode::INDENTATION_ERROR,
                    format!("dedent to width {width} does not match any outer level"),
                    Span::point(at),
                ));
            }
        }
        Ok(())
    }

    fn emit_newline(&mut self) {
        let start = self.cursor.pos();
        self.cursor.advance();
        self.tokens
            .push(Token::new(TokenKind::Newline, "\n", Span::new(start, self.cursor.pos())));
    }

    // ── Token lexing ───────────────────────────────────────────────────

    fn punct(&mut self, kind: TokenKind) {
        let start = self.cursor.pos();
        let c = self.cursor.advance().expect("peeked before punct");
        self.line_has_code = true;
        self.tokens
            .push(Token::new(kind, c.to_string(), Span::new(start, self.cursor.pos())));
    }

    fn lex_comment(&mut self) {
        let start = self.cursor.pos();
        let placement = if self.line_has_code {
            CommentPlacement::Inline
        } else {
            CommentPlacement::Standalone
        };
        let text = self.cursor.eat_while(|c| c != '\n');
        self.tokens
            .push(Token::comment(text, Span::new(start, self.cursor.pos()), placement));
    }

    fn lex_string(&mut self) -> Result<(), CompileError> {
        let start = self.cursor.pos();
        self.cursor.advance(); // opening quote
        let mut value = String::new();
        loop {
            match self.cursor.peek() {
                None | Some('\n') => {
                    return Err(CompileError::new(
                        ErrorCode::UNTERMINATED_STRING,
                        "unterminated string literal",
                        Span::point(start),
                    ));
                }
                Some('"') => {
                    self.cursor.advance();
                    break;
                }
                Some('\\') => {
                    self.cursor.advance();
                    // Backslash escapes the next character, whatever it is.
                    if let Some(c) = self.cursor.advance() {
                        value.push(c);
                    }
                }
                Some(c) => {
                    self.cursor.advance();
                    value.push(c);
                }
            }
        }
        self.line_has_code = true;
        self.tokens
            .push(Token::new(TokenKind::Str, value, Span::new(start, self.cursor.pos())));
        Ok(())
    }

    fn lex_number(&mut self) {
        let start = self.cursor.pos();
        let mut text = self.cursor.eat_while(|c| c.is_ascii_digit());
        let mut kind = TokenKind::Int;
        if self.cursor.peek() == Some('.')
            && self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            kind = TokenKind::Float;
            text.push(self.cursor.advance().expect("peeked above"));
            text.push_str(&self.cursor.eat_while(|c| c.is_ascii_digit()));
        }
        if matches!(self.cursor.peek(), Some('e') | Some('E'))
            && self
                .cursor
                .peek_next()
                .is_some_and(|c| c.is_ascii_digit() || c == '+' || c == '-')
        {
            kind = TokenKind::Float;
            text.push(self.cursor.advance().expect("peeked above"));
            if matches!(self.cursor.peek(), Some('+') | Some('-')) {
                text.push(self.cursor.advance().expect("peeked above"));
            }
            text.push_str(&self.cursor.eat_while(|c| c.is_ascii_digit()));
        }
        if kind == TokenKind::Int && self.cursor.peek() == Some('L') {
            kind = TokenKind::Long;
            text.push(self.cursor.advance().expect("peeked above"));
        }
        self.line_has_code = true;
        self.tokens
            .push(Token::new(kind, text, Span::new(start, self.cursor.pos())));
    }

    fn lex_word(&mut self) {
        let start = self.cursor.pos();
        let text = self.cursor.eat_while(is_ident_continue);
        let lower = text.to_lowercase();
        let kind = if let Some(lit) = self.lexicon.literal_of(&lower) {
            match lit {
                LiteralWord::True | LiteralWord::False => TokenKind::Bool,
                LiteralWord::Null => TokenKind::Null,
            }
        } else if self.lexicon.is_keyword(&lower) {
            TokenKind::Keyword
        } else if text.chars().next().is_some_and(|c| c.is_uppercase()) {
            TokenKind::TypeIdent
        } else {
            TokenKind::Ident
        };
        self.line_has_code = true;
        self.tokens
            .push(Token::new(kind, text, Span::new(start, self.cursor.pos())));
    }
}

/// The significant (main-channel) tokens of a stream.
pub fn significant(tokens: &[Token]) -> impl Iterator<Item = &Token> {
    tokens.iter().filter(|t| t.channel == Channel::Main)
}
