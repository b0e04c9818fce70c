//! Post-lex keyword translation.
//!
//! Rewrites non-English keyword tokens to their canonical English phrase so
//! the parser operates on one fixed vocabulary. Localized phrases may span
//! several tokens ("h\u{00e4}ngt ab von" -> "depends on") or expand a single
//! token into several English words ("\u{5b83}\u{6267}\u{884c}" ->
//! "it performs"); matching is greedy longest-first over consecutive
//! main-channel tokens.

use aster_common::{Channel, Token, TokenKind};
use aster_lexicon::{Lexicon, LiteralWord};

/// Translate a token stream lexed under a non-English lexicon into the
/// canonical English keyword vocabulary. English streams pass through
/// unchanged.
pub fn translate_keywords(tokens: Vec<Token>, lexicon: &Lexicon) -> Vec<Token> {
    if lexicon.is_english() {
        return tokens;
    }
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        let tok = &tokens[i];
        match tok.kind {
            TokenKind::Keyword => {
                if let Some((consumed, english)) = match_phrase(&tokens, i, lexicon) {
                    let span = tokens[i..i + consumed]
                        .iter()
                        .fold(tok.span, |acc, t| acc.cover(t.span));
                    for word in english.split(' ') {
                        let mut t = Token::new(TokenKind::Keyword, word, span);
                        t.channel = Channel::Main;
                        out.push(t);
                    }
                    i += consumed;
                } else {
                    // No translation recorded; pass the token through.
                    out.push(tok.clone());
                    i += 1;
                }
            }
            TokenKind::Bool | TokenKind::Null => {
                let mut t = tok.clone();
                if let Some(lit) = lexicon.literal_of(&tok.lower()) {
                    t.text = Lexicon::english_literal(lit).to_string();
                } else if tok.kind == TokenKind::Bool {
                    // Already English (e.g. mixed-locale source).
                    t.text = tok.lower();
                }
                out.push(t);
                i += 1;
            }
            _ => {
                out.push(tok.clone());
                i += 1;
            }
        }
    }
    out
}

/// Try to match a localized keyword phrase starting at `start`. Returns the
/// number of tokens consumed and the English phrase.
fn match_phrase(tokens: &[Token], start: usize, lexicon: &Lexicon) -> Option<(usize, String)> {
    for (words, english) in lexicon.phrase_translations() {
        if phrase_matches(tokens, start, words) {
            return Some((words.len(), english.clone()));
        }
    }
    None
}

fn phrase_matches(tokens: &[Token], start: usize, words: &[String]) -> bool {
    let mut idx = start;
    for word in words {
        let Some(tok) = tokens.get(idx) else {
            return false;
        };
        // Phrases only span consecutive word tokens on the main channel.
        if tok.channel != Channel::Main
            || !matches!(tok.kind, TokenKind::Keyword | TokenKind::Ident | TokenKind::TypeIdent)
            || tok.lower() != *word
        {
            return false;
        }
        idx += 1;
    }
    true
}
