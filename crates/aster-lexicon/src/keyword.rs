//! Abstract keyword kinds.
//!
//! Each kind names a semantic role in the grammar; lexicons map kinds to
//! concrete strings in some locale. The English phrase is the canonical
//! form every later stage operates on.

/// The abstract semantic keyword kinds of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordKind {
    Module,
    ThisModuleIs,
    Define,
    With,
    Has,
    AsOneOf,
    Or,
    And,
    Rule,
    Given,
    Produce,
    Of,
    ItPerforms,
    Use,
    As,
    Let,
    Be,
    Set,
    To,
    Return,
    If,
    Otherwise,
    Match,
    When,
    Workflow,
    Step,
    DependsOn,
    Compensate,
    Retry,
    MaxAttempts,
    Backoff,
    Exponential,
    Linear,
    Timeout,
    Seconds,
    Start,
    Async,
    WaitFor,
    Within,
    Scope,
    Await,
    Ok,
    Err,
    Some,
    None,
    Plus,
    Minus,
    Times,
    DividedBy,
    LessThan,
    GreaterThan,
    EqualsTo,
    AtLeast,
    AtMost,
    Not,
    Function,
    OptionOf,
    MaybeOf,
    ListOf,
    MapOf,
    ResultOf,
    Between,
    Matching,
    Pattern,
    Required,
}

impl KeywordKind {
    /// The canonical English phrase for this kind.
    pub fn english(&self) -> &'static str {
        match self {
            KeywordKind::Module => "module",
            KeywordKind::ThisModuleIs => "this module is",
            KeywordKind::Define => "define",
            KeywordKind::With => "with",
            KeywordKind::Has => "has",
            KeywordKind::AsOneOf => "as one of",
            KeywordKind::Or => "or",
            KeywordKind::And => "and",
            KeywordKind::Rule => "rule",
            KeywordKind::Given => "given",
            KeywordKind::Produce => "produce",
            KeywordKind::Of => "of",
            KeywordKind::ItPerforms => "it performs",
            KeywordKind::Use => "use",
            KeywordKind::As => "as",
            KeywordKind::Let => "let",
            KeywordKind::Be => "be",
            KeywordKind::Set => "set",
            KeywordKind::To => "to",
            KeywordKind::Return => "return",
            KeywordKind::If => "if",
            KeywordKind::Otherwise => "otherwise",
            KeywordKind::Match => "match",
            KeywordKind::When => "when",
            KeywordKind::Workflow => "workflow",
            KeywordKind::Step => "step",
            KeywordKind::DependsOn => "depends on",
            KeywordKind::Compensate => "compensate",
            KeywordKind::Retry => "retry",
            KeywordKind::MaxAttempts => "max attempts",
            KeywordKind::Backoff => "backoff",
            KeywordKind::Exponential => "exponential",
            KeywordKind::Linear => "linear",
            KeywordKind::Timeout => "timeout",
            KeywordKind::Seconds => "seconds",
            KeywordKind::Start => "start",
            KeywordKind::Async => "async",
            KeywordKind::WaitFor => "wait for",
            KeywordKind::Within => "within",
            KeywordKind::Scope => "scope",
            KeywordKind::Await => "await",
            KeywordKind::Ok => "ok",
            KeywordKind::Err => "err",
            KeywordKind::Some => "some",
            KeywordKind::None => "none",
            KeywordKind::Plus => "plus",
            KeywordKind::Minus => "minus",
            KeywordKind::Times => "times",
            KeywordKind::DividedBy => "divided by",
            KeywordKind::LessThan => "less than",
            KeywordKind::GreaterThan => "greater than",
            KeywordKind::EqualsTo => "equals to",
            KeywordKind::AtLeast => "at least",
            KeywordKind::AtMost => "at most",
            KeywordKind::Not => "not",
            KeywordKind::Function => "function",
            KeywordKind::OptionOf => "option of",
            KeywordKind::MaybeOf => "maybe of",
            KeywordKind::ListOf => "list of",
            KeywordKind::MapOf => "map of",
            KeywordKind::ResultOf => "result of",
            KeywordKind::Between => "between",
            KeywordKind::Matching => "matching",
            KeywordKind::Pattern => "pattern",
            KeywordKind::Required => "required",
        }
    }
}
