//! Rn templates
//!
//! A template such as `tn-{name}` or `fv-[{epgPKey}]` is parsed once, at
//! registry load, into a token list. Formatting and matching are then a
//! single pass over those tokens.

use std::collections::BTreeMap;
use std::fmt;

use crate::errors::{MoError, Result};

/// One piece of a parsed Rn template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RnToken {
    /// Text emitted and matched verbatim
    Literal(String),
    /// `{attr}`: value runs up to the next literal (or the end)
    Value(String),
    /// `[{attr}]`: value is wrapped in brackets and may contain `/`
    Bracketed(String),
}

/// Parsed Rn template of one class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RnTemplate {
    source: String,
    tokens: Vec<RnToken>,
}

impl RnTemplate {
    /// Parse a template string
    ///
    /// # Errors
    ///
    /// `InvalidTemplate` for an unclosed or empty placeholder, two
    /// placeholders with no literal between them, or a repeated placeholder.
    pub fn parse(source: &str) -> Result<Self> {
        let invalid = |reason: &str| MoError::InvalidTemplate {
            template: source.to_string(),
            reason: reason.to_string(),
        };

        let mut tokens: Vec<RnToken> = Vec::new();
        let mut literal = String::new();
        let mut rest = source;

        while !rest.is_empty() {
            let bracketed = rest.starts_with("[{");
            if bracketed || rest.starts_with('{') {
                let open = if bracketed { 2 } else { 1 };
                let close_pat = if bracketed { "}]" } else { "}" };
                let close = rest[open..]
                    .find(close_pat)
                    .ok_or_else(|| invalid("unclosed placeholder"))?;
                let name = &rest[open..open + close];
                if name.is_empty() || name.contains(['{', '}', '[', ']']) {
                    return Err(invalid("empty or malformed placeholder name"));
                }
                if !literal.is_empty() {
                    tokens.push(RnToken::Literal(std::mem::take(&mut literal)));
                } else if matches!(
                    tokens.last(),
                    Some(RnToken::Value(_) | RnToken::Bracketed(_))
                ) {
                    return Err(invalid("placeholders must be separated by a literal"));
                }
                let duplicate = tokens.iter().any(|t| match t {
                    RnToken::Value(n) | RnToken::Bracketed(n) => n == name,
                    RnToken::Literal(_) => false,
                });
                if duplicate {
                    return Err(invalid("placeholder used twice"));
                }
                tokens.push(if bracketed {
                    RnToken::Bracketed(name.to_string())
                } else {
                    RnToken::Value(name.to_string())
                });
                rest = &rest[open + close + close_pat.len()..];
            } else {
                let mut chars = rest.chars();
                if let Some(c) = chars.next() {
                    if c == '}' {
                        return Err(invalid("unbalanced '}'"));
                    }
                    literal.push(c);
                }
                rest = chars.as_str();
            }
        }
        if !literal.is_empty() {
            tokens.push(RnToken::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            tokens,
        })
    }

    /// Template text as declared
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[RnToken] {
        &self.tokens
    }

    /// Attribute names referenced by placeholders, in template order
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().filter_map(|t| match t {
            RnToken::Value(n) | RnToken::Bracketed(n) => Some(n.as_str()),
            RnToken::Literal(_) => None,
        })
    }

    /// Template without placeholders always renders the same Rn
    pub fn is_fixed(&self) -> bool {
        self.placeholders().next().is_none()
    }

    /// Render an Rn, looking each placeholder up through `value_of`
    ///
    /// # Errors
    ///
    /// `Naming` if a placeholder has no value.
    pub fn format<'v, F>(&self, class_name: &str, value_of: F) -> Result<String>
    where
        F: Fn(&str) -> Option<&'v str>,
    {
        let mut rn = String::new();
        for token in &self.tokens {
            match token {
                RnToken::Literal(text) => rn.push_str(text),
                RnToken::Value(name) | RnToken::Bracketed(name) => {
                    let value = value_of(name.as_str()).ok_or_else(|| {
                        MoError::naming(class_name, name, "naming attribute has no value")
                    })?;
                    if matches!(token, RnToken::Bracketed(_)) {
                        rn.push('[');
                        rn.push_str(value);
                        rn.push(']');
                    } else {
                        rn.push_str(value);
                    }
                }
            }
        }
        Ok(rn)
    }

    /// Check that `value` can stand in the placeholder for `attribute`
    ///
    /// A plain value may not be empty or contain `/`, `[` or `]`. When more
    /// of the template follows, the literal after the value must first occur
    /// right where the value ends. A bracketed
    /// value may contain `/` but its brackets must balance. Attributes the
    /// template does not reference are accepted.
    ///
    /// # Errors
    ///
    /// `Naming` with the reason the value would not survive Dn parsing.
    pub fn check_value(&self, class_name: &str, attribute: &str, value: &str) -> Result<()> {
        let index = self.tokens.iter().position(|t| match t {
            RnToken::Value(n) | RnToken::Bracketed(n) => n == attribute,
            RnToken::Literal(_) => false,
        });
        match index.and_then(|i| self.value_problem(i, value)) {
            Some(reason) => Err(MoError::naming(class_name, attribute, reason)),
            None => Ok(()),
        }
    }

    fn value_problem(&self, index: usize, value: &str) -> Option<&'static str> {
        if value.is_empty() {
            return Some("naming value is empty");
        }
        match &self.tokens[index] {
            RnToken::Value(_) => {
                if value.contains(['/', '[', ']']) {
                    return Some("naming value contains '/', '[' or ']'");
                }
                match self.tokens.get(index + 1) {
                    // matching stops at the first occurrence of `next`
                    Some(RnToken::Literal(next))
                        if index + 2 < self.tokens.len()
                            && format!("{value}{next}").find(next.as_str())
                                != Some(value.len()) =>
                    {
                        Some("naming value runs into the literal that follows it")
                    }
                    _ => None,
                }
            }
            RnToken::Bracketed(_) if !brackets_balance(value) => {
                Some("naming value has unbalanced brackets")
            }
            _ => None,
        }
    }

    /// Recover naming attribute bindings from an Rn segment
    ///
    /// # Errors
    ///
    /// `RnMismatch` when the segment does not fit the template.
    pub fn match_rn(&self, class_name: &str, rn: &str) -> Result<BTreeMap<String, String>> {
        let mismatch = || MoError::RnMismatch {
            class_name: class_name.to_string(),
            template: self.source.clone(),
            rn: rn.to_string(),
        };

        let mut bindings = BTreeMap::new();
        let mut rest = rn;
        for (i, token) in self.tokens.iter().enumerate() {
            match token {
                RnToken::Literal(text) => {
                    rest = rest.strip_prefix(text.as_str()).ok_or_else(mismatch)?;
                }
                RnToken::Value(name) => {
                    let end = match self.tokens.get(i + 1) {
                        None => rest.len(),
                        Some(RnToken::Literal(next)) if i + 2 == self.tokens.len() => {
                            if !rest.ends_with(next.as_str()) {
                                return Err(mismatch());
                            }
                            rest.len() - next.len()
                        }
                        Some(RnToken::Literal(next)) => {
                            rest.find(next.as_str()).ok_or_else(mismatch)?
                        }
                        // parse() rejects adjacent placeholders
                        Some(_) => return Err(mismatch()),
                    };
                    let value = &rest[..end];
                    if self.value_problem(i, value).is_some() {
                        return Err(mismatch());
                    }
                    bindings.insert(name.clone(), value.to_string());
                    rest = &rest[end..];
                }
                RnToken::Bracketed(name) => {
                    let close = matching_bracket(rest).ok_or_else(mismatch)?;
                    let value = &rest[1..close];
                    if value.is_empty() {
                        return Err(mismatch());
                    }
                    bindings.insert(name.clone(), value.to_string());
                    rest = &rest[close + 1..];
                }
            }
        }

        if rest.is_empty() {
            Ok(bindings)
        } else {
            Err(mismatch())
        }
    }
}

impl fmt::Display for RnTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn brackets_balance(text: &str) -> bool {
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '[' => depth += 1,
            ']' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

/// Byte index of the `]` closing the `[` that `text` starts with
fn matching_bracket(text: &str) -> Option<usize> {
    if !text.starts_with('[') {
        return None;
    }
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
