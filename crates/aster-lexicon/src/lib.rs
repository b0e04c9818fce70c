// Aster lexicon -- keyword registry and locale tables.

mod domain;
mod keyword;
mod locales;

pub use domain::DomainTable;
pub use keyword::KeywordKind;

use rustc_hash::{FxHashMap, FxHashSet};

/// A literal word recognized by a lexicon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralWord {
    True,
    False,
    Null,
}

/// A mapping from the abstract keyword kinds to concrete strings in one
/// human locale, plus the derived indices the pipeline stages need:
/// the word set for lexing, multi-word phrases for the canonicalizer, and
/// the phrase translation table for the keyword translator.
#[derive(Debug, Clone)]
pub struct Lexicon {
    locale: &'static str,
    /// Lowercased single words that participate in any keyword phrase.
    words: FxHashSet<String>,
    /// Localized word sequences mapped to their canonical English phrase,
    /// sorted longest-first for greedy matching.
    phrases: Vec<(Vec<String>, String)>,
    /// Localized phrases of two or more words, for canonicalizer lowercasing.
    multiword: Vec<String>,
    /// Function words removed by the canonicalizer (English articles).
    removable: Vec<String>,
    true_word: String,
    false_word: String,
    null_word: String,
}

impl Lexicon {
    fn build(
        locale: &'static str,
        table: &[(KeywordKind, &str)],
        removable: &[&str],
        true_word: &str,
        false_word: &str,
        null_word: &str,
    ) -> Self {
        let mut words = FxHashSet::default();
        let mut phrases: Vec<(Vec<String>, String)> = Vec::new();
        let mut multiword = Vec::new();
        for (kind, localized) in table {
            let parts: Vec<String> = localized.split(' ').map(|w| w.to_lowercase()).collect();
            for part in &parts {
                words.insert(part.clone());
            }
            if parts.len() > 1 {
                multiword.push(parts.join(" "));
            }
            phrases.push((parts, kind.english().to_string()));
        }
        // Longest phrases first so greedy matching prefers "as one of"
        // over "as".
        phrases.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        multiword.sort_by(|a, b| b.len().cmp(&a.len()));
        Self {
            locale,
            words,
            phrases,
            multiword,
            removable: removable.iter().map(|w| w.to_string()).collect(),
            true_word: true_word.to_lowercase(),
            false_word: false_word.to_lowercase(),
            null_word: null_word.to_lowercase(),
        }
    }

    pub fn english() -> Self {
        Self::build(
            "en",
            locales::ENGLISH,
            &["a", "an", "the"],
            "true",
            "false",
            "null",
        )
    }

    pub fn german() -> Self {
        Self::build(
            "de",
            locales::GERMAN,
            &["der", "die", "das", "ein", "eine", "einen", "einer", "dem", "den"],
            "wahr",
            "falsch",
            "nichts",
        )
    }

    pub fn chinese() -> Self {
        Self::build("zh", locales::CHINESE, &[], "真", "假", "空")
    }

    pub fn locale(&self) -> &'static str {
        self.locale
    }

    pub fn is_english(&self) -> bool {
        self.locale == "en"
    }

    /// Whether `word` (already lowercased) is a keyword word in this locale.
    pub fn is_keyword(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Classify a lowercased word as a literal, if it is one.
    pub fn literal_of(&self, word: &str) -> Option<LiteralWord> {
        if word == self.true_word {
            Some(LiteralWord::True)
        } else if word == self.false_word {
            Some(LiteralWord::False)
        } else if word == self.null_word {
            Some(LiteralWord::Null)
        } else {
            None
        }
    }

    /// English spellings of the boolean/null literals for translation.
    pub fn english_literal(word: LiteralWord) -> &'static str {
        match word {
            LiteralWord::True => "true",
            LiteralWord::False => "false",
            LiteralWord::Null => "null",
        }
    }

    /// Function words the canonicalizer strips (whole-word).
    pub fn removable_words(&self) -> &[String] {
        &self.removable
    }

    /// Localized multi-word keyword phrases, longest first.
    pub fn multiword_phrases(&self) -> &[String] {
        &self.multiword
    }

    /// Localized phrase -> canonical English phrase table, longest first.
    pub fn phrase_translations(&self) -> &[(Vec<String>, String)] {
        &self.phrases
    }
}

/// Holds the known lexicons; callers thread a registry (or a single
/// lexicon) through compile options rather than consulting global state.
#[derive(Debug)]
pub struct LexiconRegistry {
    lexicons: FxHashMap<&'static str, Lexicon>,
}

impl LexiconRegistry {
    /// A registry with the built-in locales: `en`, `de`, `zh`.
    pub fn builtin() -> Self {
        let mut lexicons = FxHashMap::default();
        for lex in [Lexicon::english(), Lexicon::german(), Lexicon::chinese()] {
            lexicons.insert(lex.locale(), lex);
        }
        Self { lexicons }
    }

    pub fn get(&self, locale: &str) -> Option<&Lexicon> {
        self.lexicons.get(locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_keywords_include_phrase_parts() {
        let lex = Lexicon::english();
        for word in ["define", "as", "one", "of", "it", "performs", "return"] {
            assert!(lex.is_keyword(word), "missing keyword word {word}");
        }
        assert!(!lex.is_keyword("banana"));
    }

    #[test]
    fn english_literals() {
        let lex = Lexicon::english();
        assert_eq!(lex.literal_of("true"), Some(LiteralWord::True));
        assert_eq!(lex.literal_of("null"), Some(LiteralWord::Null));
        assert_eq!(lex.literal_of("none"), None);
    }

    #[test]
    fn multiword_phrases_sorted_longest_first() {
        let lex = Lexicon::english();
        let phrases = lex.multiword_phrases();
        assert!(phrases.contains(&"as one of".to_string()));
        assert!(phrases.contains(&"it performs".to_string()));
        for pair in phrases.windows(2) {
            assert!(pair[0].len() >= pair[1].len());
        }
    }

    #[test]
    fn german_translates_to_english_phrases() {
        let lex = Lexicon::german();
        let hit = lex
            .phrase_translations()
            .iter()
            .find(|(words, _)| words == &["gib", "zur\u{00fc}ck"]);
        assert_eq!(hit.map(|(_, en)| en.as_str()), Some("return"));
    }

    #[test]
    fn registry_knows_builtin_locales() {
        let reg = LexiconRegistry::builtin();
        assert!(reg.get("en").is_some());
        assert!(reg.get("de").is_some());
        assert!(reg.get("zh").is_some());
        assert!(reg.get("fr").is_none());
    }
}
