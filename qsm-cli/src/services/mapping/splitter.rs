//! Heuristic split of "name and/or email" free text
//!
//! The applicant field is filled in by hand, so it shows up as a bare
//! address, "Name, mail", "Name mail" or just a name. The rules below are
//! tried in order and the first one whose shape matches decides the result.

use super::models::NameEmailPair;

/// One step of the split cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitRule {
    /// Null or blank input
    Empty,
    /// Exactly one `@` and no whitespace: the whole string is the address
    BareEmail,
    /// "Name, email": split on the first comma only
    CommaSeparated,
    /// First whitespace token containing `@` is the address, tokens before it the name
    TokenScan,
    /// No `@` anywhere: the whole string is the name
    NameOnly,
}

impl SplitRule {
    /// Rules in priority order
    pub const CASCADE: [SplitRule; 5] = [
        SplitRule::Empty,
        SplitRule::BareEmail,
        SplitRule::CommaSeparated,
        SplitRule::TokenScan,
        SplitRule::NameOnly,
    ];

    /// Whether this rule applies to the trimmed input
    fn matches(&self, trimmed: &str) -> bool {
        match self {
            SplitRule::Empty => trimmed.is_empty(),
            SplitRule::BareEmail => {
                trimmed.matches('@').count() == 1 && !trimmed.chars().any(char::is_whitespace)
            }
            SplitRule::CommaSeparated => trimmed.contains(','),
            SplitRule::TokenScan => trimmed.split_whitespace().any(|t| t.contains('@')),
            SplitRule::NameOnly => true,
        }
    }

    /// First rule of the cascade that applies to `raw`
    pub fn classify(raw: Option<&str>) -> SplitRule {
        let trimmed = raw.map(str::trim).unwrap_or_default();
        Self::CASCADE
            .into_iter()
            .find(|rule| rule.matches(trimmed))
            .unwrap_or(SplitRule::NameOnly)
    }

    /// Produce the pair for input already classified under this rule
    pub fn apply(&self, raw: Option<&str>) -> NameEmailPair {
        let trimmed = raw.map(str::trim).unwrap_or_default();

        match self {
            SplitRule::Empty => NameEmailPair::default(),
            SplitRule::BareEmail => NameEmailPair::new("", trimmed),
            SplitRule::CommaSeparated => match trimmed.split_once(',') {
                Some((name, email)) => NameEmailPair::new(name.trim(), email.trim()),
                None => NameEmailPair::new(trimmed, ""),
            },
            SplitRule::TokenScan => {
                let tokens: Vec<&str> = trimmed.split_whitespace().collect();
                match tokens.iter().position(|t| t.contains('@')) {
                    // Tokens after the address are dropped
                    Some(at) => NameEmailPair::new(tokens[..at].join(" "), tokens[at]),
                    None => NameEmailPair::new(trimmed, ""),
                }
            }
            SplitRule::NameOnly => NameEmailPair::new(trimmed, ""),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SplitRule::Empty => "empty",
            SplitRule::BareEmail => "bare email",
            SplitRule::CommaSeparated => "comma separated",
            SplitRule::TokenScan => "token scan",
            SplitRule::NameOnly => "name only",
        }
    }
}

impl std::fmt::Display for SplitRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Splits combined name/email strings. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameEmailSplitter;

impl NameEmailSplitter {
    pub fn new() -> Self {
        Self
    }

    pub fn split(&self, raw: Option<&str>) -> NameEmailPair {
        self.split_explained(raw).1
    }

    /// Split and report which rule decided
    pub fn split_explained(&self, raw: Option<&str>) -> (SplitRule, NameEmailPair) {
        let rule = SplitRule::classify(raw);
        (rule, rule.apply(raw))
    }
}
