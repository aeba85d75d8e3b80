//! SKU patterns with `{COLOR}` and `{PATTERN}` placeholders.
//!
//! A pattern such as `SHL-LS-SEAT-{COLOR}` is parsed once into literal runs and
//! placeholders. Filling and matching then operate on that structure, so a
//! color code is never confused with template text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::sku::SEGMENT_SEPARATOR;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Placeholder {
    /// Fabric color code, e.g. `CBN`.
    Color,
    /// Fabric pattern family of the color, e.g. `SPTM`.
    Pattern,
}

impl Placeholder {
    pub fn token(self) -> &'static str {
        match self {
            Placeholder::Color => "{COLOR}",
            Placeholder::Pattern => "{PATTERN}",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "COLOR" => Some(Placeholder::Color),
            "PATTERN" => Some(Placeholder::Pattern),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatternPart {
    Literal(String),
    Placeholder(Placeholder),
}

/// Values substituted for placeholders when a pattern is filled or matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bindings<'a> {
    pub color: &'a str,
    pub pattern: &'a str,
}

impl<'a> Bindings<'a> {
    pub fn new(color: &'a str, pattern: &'a str) -> Self {
        Self { color, pattern }
    }

    pub fn value(&self, placeholder: Placeholder) -> &'a str {
        match placeholder {
            Placeholder::Color => self.color,
            Placeholder::Pattern => self.pattern,
        }
    }
}

/// Placeholder values read back out of a concrete SKU.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Captures<'s> {
    pub color: Option<&'s str>,
    pub pattern: Option<&'s str>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("pattern is empty")]
    Empty,

    #[error("unterminated placeholder in '{0}'")]
    Unterminated(String),

    #[error("unknown placeholder '{{{name}}}' in '{pattern}' (expected {{COLOR}} or {{PATTERN}})")]
    UnknownPlaceholder { name: String, pattern: String },

    #[error("unexpected '}}' in '{0}'")]
    StrayBrace(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SkuPattern {
    source: String,
    parts: Vec<PatternPart>,
}

impl SkuPattern {
    pub fn parse(source: &str) -> Result<Self, PatternError> {
        if source.is_empty() {
            return Err(PatternError::Empty);
        }

        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut rest = source;

        while let Some(ch) = rest.chars().next() {
            match ch {
                '{' => {
                    let close = rest
                        .find('}')
                        .ok_or_else(|| PatternError::Unterminated(source.to_string()))?;
                    let name = &rest[1..close];
                    let placeholder = Placeholder::from_name(name).ok_or_else(|| {
                        PatternError::UnknownPlaceholder {
                            name: name.to_string(),
                            pattern: source.to_string(),
                        }
                    })?;
                    if !literal.is_empty() {
                        parts.push(PatternPart::Literal(std::mem::take(&mut literal)));
                    }
                    parts.push(PatternPart::Placeholder(placeholder));
                    rest = &rest[close + 1..];
                }
                '}' => return Err(PatternError::StrayBrace(source.to_string())),
                _ => {
                    literal.push(ch);
                    rest = &rest[ch.len_utf8()..];
                }
            }
        }
        if !literal.is_empty() {
            parts.push(PatternPart::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            parts,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn parts(&self) -> &[PatternPart] {
        &self.parts
    }

    /// Placeholders in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = Placeholder> + '_ {
        self.parts.iter().filter_map(|part| match part {
            PatternPart::Placeholder(p) => Some(*p),
            PatternPart::Literal(_) => None,
        })
    }

    pub fn has_placeholders(&self) -> bool {
        self.placeholders().next().is_some()
    }

    pub fn uses(&self, placeholder: Placeholder) -> bool {
        self.placeholders().any(|p| p == placeholder)
    }

    /// The pattern text when it has no placeholders.
    pub fn as_literal(&self) -> Option<&str> {
        (!self.has_placeholders()).then_some(self.source.as_str())
    }

    /// Substitute every placeholder.
    pub fn fill(&self, bindings: &Bindings<'_>) -> String {
        let mut out = String::with_capacity(self.source.len());
        for part in &self.parts {
            match part {
                PatternPart::Literal(text) => out.push_str(text),
                PatternPart::Placeholder(p) => out.push_str(bindings.value(*p)),
            }
        }
        out
    }

    /// Structural comparison of `sku` against this pattern.
    ///
    /// Without bindings only a placeholder-free pattern can match, and then
    /// only by exact equality.
    pub fn matches(&self, sku: &str, bindings: Option<&Bindings<'_>>) -> bool {
        let mut rest = sku;
        for part in &self.parts {
            let piece = match (part, bindings) {
                (PatternPart::Literal(text), _) => text.as_str(),
                (PatternPart::Placeholder(p), Some(b)) => b.value(*p),
                (PatternPart::Placeholder(_), None) => return false,
            };
            match rest.strip_prefix(piece) {
                Some(tail) => rest = tail,
                None => return false,
            }
        }
        rest.is_empty()
    }

    /// Read placeholder values out of `sku`, each placeholder taking one
    /// separator-free run. `None` if the SKU does not fit the pattern or a
    /// placeholder would need two different values.
    pub fn capture<'s>(&self, sku: &'s str) -> Option<Captures<'s>> {
        let mut captures = Captures::default();
        let mut rest = sku;
        for part in &self.parts {
            match part {
                PatternPart::Literal(text) => rest = rest.strip_prefix(text.as_str())?,
                PatternPart::Placeholder(p) => {
                    let end = rest.find(SEGMENT_SEPARATOR).unwrap_or(rest.len());
                    if end == 0 {
                        return None;
                    }
                    let (value, tail) = rest.split_at(end);
                    let slot = match p {
                        Placeholder::Color => &mut captures.color,
                        Placeholder::Pattern => &mut captures.pattern,
                    };
                    if matches!(*slot, Some(prev) if prev != value) {
                        return None;
                    }
                    *slot = Some(value);
                    rest = tail;
                }
            }
        }
        rest.is_empty().then_some(captures)
    }
}

impl FromStr for SkuPattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SkuPattern {
    type Error = PatternError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SkuPattern> for String {
    fn from(pattern: SkuPattern) -> Self {
        pattern.source
    }
}

impl fmt::Display for SkuPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
