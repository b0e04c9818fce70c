//! Locale keyword tables.
//!
//! Each table maps every [`KeywordKind`] to its concrete phrase in one
//! locale. The English table is the canonical vocabulary; the German and
//! Chinese tables exist so prose written in those locales lexes to the same
//! keyword stream after translation.

use crate::keyword::KeywordKind;

pub(crate) const ENGLISH: &[(KeywordKind, &str)] = &[
    (KeywordKind::Module, "module"),
    (KeywordKind::ThisModuleIs, "this module is"),
    (KeywordKind::Define, "define"),
    (KeywordKind::With, "with"),
    (KeywordKind::Has, "has"),
    (KeywordKind::AsOneOf, "as one of"),
    (KeywordKind::Or, "or"),
    (KeywordKind::And, "and"),
    (KeywordKind::Rule, "rule"),
    (KeywordKind::Given, "given"),
    (KeywordKind::Produce, "produce"),
    (KeywordKind::Of, "of"),
    (KeywordKind::ItPerforms, "it performs"),
    (KeywordKind::Use, "use"),
    (KeywordKind::As, "as"),
    (KeywordKind::Let, "let"),
    (KeywordKind::Be, "be"),
    (KeywordKind::Set, "set"),
    (KeywordKind::To, "to"),
    (KeywordKind::Return, "return"),
    (KeywordKind::If, "if"),
    (KeywordKind::Otherwise, "otherwise"),
    (KeywordKind::Match, "match"),
    (KeywordKind::When, "when"),
    (KeywordKind::Workflow, "workflow"),
    (KeywordKind::Step, "step"),
    (KeywordKind::DependsOn, "depends on"),
    (KeywordKind::Compensate, "compensate"),
    (KeywordKind::Retry, "retry"),
    (KeywordKind::MaxAttempts, "max attempts"),
    (KeywordKind::Backoff, "backoff"),
    (KeywordKind::Exponential, "exponential"),
    (KeywordKind::Linear, "linear"),
    (KeywordKind::Timeout, "timeout"),
    (KeywordKind::Seconds, "seconds"),
    (KeywordKind::Start, "start"),
    (KeywordKind::Async, "async"),
    (KeywordKind::WaitFor, "wait for"),
    (KeywordKind::Within, "within"),
    (KeywordKind::Scope, "scope"),
    (KeywordKind::Await, "await"),
    (KeywordKind::Ok, "ok"),
    (KeywordKind::Err, "err"),
    (KeywordKind::Some, "some"),
    (KeywordKind::None, "none"),
    (KeywordKind::Plus, "plus"),
    (KeywordKind::Minus, "minus"),
    (KeywordKind::Times, "times"),
    (KeywordKind::DividedBy, "divided by"),
    (KeywordKind::LessThan, "less than"),
    (KeywordKind::GreaterThan, "greater than"),
    (KeywordKind::EqualsTo, "equals to"),
    (KeywordKind::AtLeast, "at least"),
    (KeywordKind::AtMost, "at most"),
    (KeywordKind::Not, "not"),
    (KeywordKind::Function, "function"),
    (KeywordKind::OptionOf, "option of"),
    (KeywordKind::MaybeOf, "maybe of"),
    (KeywordKind::ListOf, "list of"),
    (KeywordKind::MapOf, "map of"),
    (KeywordKind::ResultOf, "result of"),
    (KeywordKind::Between, "between"),
    (KeywordKind::Matching, "matching"),
    (KeywordKind::Pattern, "pattern"),
    (KeywordKind::Required, "required"),
];

pub(crate) const GERMAN: &[(KeywordKind, &str)] = &[
    (KeywordKind::Module, "modul"),
    (KeywordKind::ThisModuleIs, "dieses modul ist"),
    (KeywordKind::Define, "definiere"),
    (KeywordKind::With, "mit"),
    (KeywordKind::Has, "hat"),
    (KeywordKind::AsOneOf, "als eines von"),
    (KeywordKind::Or, "oder"),
    (KeywordKind::And, "und"),
    (KeywordKind::Rule, "regel"),
    (KeywordKind::Given, "gegeben"),
    (KeywordKind::Produce, "erzeuge"),
    (KeywordKind::Of, "von"),
    (KeywordKind::ItPerforms, "es leistet"),
    (KeywordKind::Use, "nutze"),
    (KeywordKind::As, "als"),
    (KeywordKind::Let, "lass"),
    (KeywordKind::Be, "sei"),
    (KeywordKind::Set, "setze"),
    (KeywordKind::To, "auf"),
    (KeywordKind::Return, "gib zur\u{00fc}ck"),
    (KeywordKind::If, "wenn"),
    (KeywordKind::Otherwise, "sonst"),
    (KeywordKind::Match, "vergleiche"),
    (KeywordKind::When, "falls"),
    (KeywordKind::Workflow, "ablauf"),
    (KeywordKind::Step, "schritt"),
    (KeywordKind::DependsOn, "h\u{00e4}ngt ab von"),
    (KeywordKind::Compensate, "kompensiere"),
    (KeywordKind::Retry, "wiederhole"),
    (KeywordKind::MaxAttempts, "maximal versuche"),
    (KeywordKind::Backoff, "r\u{00fc}ckzug"),
    (KeywordKind::Exponential, "exponentiell"),
    (KeywordKind::Linear, "linear"),
    (KeywordKind::Timeout, "zeitlimit"),
    (KeywordKind::Seconds, "sekunden"),
    (KeywordKind::Start, "starte"),
    (KeywordKind::Async, "asynchron"),
    (KeywordKind::WaitFor, "warte auf"),
    (KeywordKind::Within, "innerhalb"),
    (KeywordKind::Scope, "bereich"),
    (KeywordKind::Await, "erwarte"),
    (KeywordKind::Ok, "ok"),
    (KeywordKind::Err, "fehler"),
    (KeywordKind::Some, "etwas"),
    (KeywordKind::None, "keines"),
    (KeywordKind::Plus, "plus"),
    (KeywordKind::Minus, "minus"),
    (KeywordKind::Times, "mal"),
    (KeywordKind::DividedBy, "geteilt durch"),
    (KeywordKind::LessThan, "kleiner als"),
    (KeywordKind::GreaterThan, "gr\u{00f6}\u{00df}er als"),
    (KeywordKind::EqualsTo, "gleich"),
    (KeywordKind::AtLeast, "mindestens"),
    (KeywordKind::AtMost, "h\u{00f6}chstens"),
    (KeywordKind::Not, "nicht"),
    (KeywordKind::Function, "funktion"),
    (KeywordKind::OptionOf, "option von"),
    (KeywordKind::MaybeOf, "vielleicht von"),
    (KeywordKind::ListOf, "liste von"),
    (KeywordKind::MapOf, "abbildung von"),
    (KeywordKind::ResultOf, "ergebnis von"),
    (KeywordKind::Between, "zwischen"),
    (KeywordKind::Matching, "passend"),
    (KeywordKind::Pattern, "muster"),
    (KeywordKind::Required, "erforderlich"),
];

pub(crate) const CHINESE: &[(KeywordKind, &str)] = &[
    (KeywordKind::Module, "\u{6a21}\u{5757}"),
    (KeywordKind::ThisModuleIs, "\u{6b64}\u{6a21}\u{5757}\u{662f}"),
    (KeywordKind::Define, "\u{5b9a}\u{4e49}"),
    (KeywordKind::With, "\u{5177}\u{6709}"),
    (KeywordKind::Has, "\u{5305}\u{542b}"),
    (KeywordKind::AsOneOf, "\u{4e3a}\u{5176}\u{4e2d}\u{4e4b}\u{4e00}"),
    (KeywordKind::Or, "\u{6216}"),
    (KeywordKind::And, "\u{548c}"),
    (KeywordKind::Rule, "\u{89c4}\u{5219}"),
    (KeywordKind::Given, "\u{7ed9}\u{5b9a}"),
    (KeywordKind::Produce, "\u{4ea7}\u{751f}"),
    (KeywordKind::Of, "\u{7684}"),
    (KeywordKind::ItPerforms, "\u{5b83}\u{6267}\u{884c}"),
    (KeywordKind::Use, "\u{4f7f}\u{7528}"),
    (KeywordKind::As, "\u{4f5c}\u{4e3a}"),
    (KeywordKind::Let, "\u{8ba9}"),
    (KeywordKind::Be, "\u{4e3a}"),
    (KeywordKind::Set, "\u{8bbe}\u{7f6e}"),
    (KeywordKind::To, "\u{5230}"),
    (KeywordKind::Return, "\u{8fd4}\u{56de}"),
    (KeywordKind::If, "\u{5982}\u{679c}"),
    (KeywordKind::Otherwise, "\u{5426}\u{5219}"),
    (KeywordKind::Match, "\u{5339}\u{914d}"),
    (KeywordKind::When, "\u{5f53}"),
    (KeywordKind::Workflow, "\u{5de5}\u{4f5c}\u{6d41}"),
    (KeywordKind::Step, "\u{6b65}\u{9aa4}"),
    (KeywordKind::DependsOn, "\u{4f9d}\u{8d56}\u{4e8e}"),
    (KeywordKind::Compensate, "\u{8865}\u{507f}"),
    (KeywordKind::Retry, "\u{91cd}\u{8bd5}"),
    (KeywordKind::MaxAttempts, "\u{6700}\u{5927}\u{5c1d}\u{8bd5}"),
    (KeywordKind::Backoff, "\u{9000}\u{907f}"),
    (KeywordKind::Exponential, "\u{6307}\u{6570}"),
    (KeywordKind::Linear, "\u{7ebf}\u{6027}"),
    (KeywordKind::Timeout, "\u{8d85}\u{65f6}"),
    (KeywordKind::Seconds, "\u{79d2}"),
    (KeywordKind::Start, "\u{542f}\u{52a8}"),
    (KeywordKind::Async, "\u{5f02}\u{6b65}"),
    (KeywordKind::WaitFor, "\u{7b49}\u{5f85}"),
    (KeywordKind::Within, "\u{5728}"),
    (KeywordKind::Scope, "\u{8303}\u{56f4}"),
    (KeywordKind::Await, "\u{7b49}\u{5019}"),
    (KeywordKind::Ok, "\u{6210}\u{529f}"),
    (KeywordKind::Err, "\u{9519}\u{8bef}"),
    (KeywordKind::Some, "\u{6709}\u{503c}"),
    (KeywordKind::None, "\u{65e0}\u{503c}"),
    (KeywordKind::Plus, "\u{52a0}"),
    (KeywordKind::Minus, "\u{51cf}"),
    (KeywordKind::Times, "\u{4e58}"),
    (KeywordKind::DividedBy, "\u{9664}\u{4ee5}"),
    (KeywordKind::LessThan, "\u{5c0f}\u{4e8e}"),
    (KeywordKind::GreaterThan, "\u{5927}\u{4e8e}"),
    (KeywordKind::EqualsTo, "\u{7b49}\u{4e8e}"),
    (KeywordKind::AtLeast, "\u{81f3}\u{5c11}"),
    (KeywordKind::AtMost, "\u{81f3}\u{591a}"),
    (KeywordKind::Not, "\u{975e}"),
    (KeywordKind::Function, "\u{51fd}\u{6570}"),
    (KeywordKind::OptionOf, "\u{53ef}\u{9009}\u{7684}"),
    (KeywordKind::MaybeOf, "\u{6216}\u{8bb8}\u{7684}"),
    (KeywordKind::ListOf, "\u{5217}\u{8868}\u{7684}"),
    (KeywordKind::MapOf, "\u{6620}\u{5c04}\u{7684}"),
    (KeywordKind::ResultOf, "\u{7ed3}\u{679c}\u{7684}"),
    (KeywordKind::Between, "\u{4ecb}\u{4e8e}"),
    (KeywordKind::Matching, "\u{7b26}\u{5408}"),
    (KeywordKind::Pattern, "\u{6a21}\u{5f0f}"),
    (KeywordKind::Required, "\u{5fc5}\u{586b}"),
];
