//! Declarative per-field rules.
//!
//! Each [`Field`] reads one value from the body, path or query, checks it,
//! and either records a [`FieldError`](super::FieldError) or stores the
//! sanitized value in `Exchange::validated`. Rules never short-circuit the
//! request; failures accumulate until the aggregated check.

use async_trait::async_trait;
use serde_json::Value;

use super::dispatch::Step;
use super::exchange::{Exchange, Location};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Trimmed string whose character count lies in `min..=max`.
    Text { min: usize, max: usize },
    /// String stored verbatim (no trimming), e.g. passwords.
    Secret { min: usize, max: usize },
    /// Integer, or a string holding one, within optional bounds.
    Integer { min: Option<i64>, max: Option<i64> },
    /// Integer from a fixed set.
    OneOf(&'static [i64]),
}

#[derive(Debug, Clone)]
pub struct Field {
    location: Location,
    name: &'static str,
    rule: Rule,
    optional: bool,
    message: String,
}

impl Field {
    fn new(location: Location, name: &'static str, rule: Rule) -> Self {
        let message = default_message(name, &rule);
        Self {
            location,
            name,
            rule,
            optional: false,
            message,
        }
    }

    pub fn text(location: Location, name: &'static str, min: usize, max: usize) -> Self {
        Self::new(location, name, Rule::Text { min, max })
    }

    pub fn secret(location: Location, name: &'static str, min: usize, max: usize) -> Self {
        Self::new(location, name, Rule::Secret { min, max })
    }

    pub fn integer(
        location: Location,
        name: &'static str,
        min: Option<i64>,
        max: Option<i64>,
    ) -> Self {
        Self::new(location, name, Rule::Integer { min, max })
    }

    pub fn one_of(location: Location, name: &'static str, allowed: &'static [i64]) -> Self {
        Self::new(location, name, Rule::OneOf(allowed))
    }

    /// Absent (or `null`) values pass without being recorded.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Check the field against `ex`, recording the outcome.
    pub fn apply(&self, ex: &mut Exchange) {
        let raw = match ex.raw(self.location, self.name) {
            None | Some(Value::Null) if self.optional => return,
            None => {
                ex.fail(self.location, self.name, None, self.message.clone());
                return;
            }
            Some(raw) => raw,
        };

        match sanitize(&self.rule, &raw) {
            Some(clean) => {
                ex.validated.insert(self.name.to_string(), clean);
            }
            None => ex.fail(self.location, self.name, Some(raw), self.message.clone()),
        }
    }
}

#[async_trait(?Send)]
impl Step for Field {
    async fn run(&self, ex: &mut Exchange) -> Result<(), AppError> {
        self.apply(ex);
        Ok(())
    }
}

fn default_message(name: &str, rule: &Rule) -> String {
    match rule {
        Rule::Text { min, max } | Rule::Secret { min, max } => {
            format!("{name} must be between {min} and {max} characters")
        }
        Rule::Integer {
            min: Some(min),
            max: Some(max),
        } => format!("{name} must be between {min} and {max}"),
        Rule::Integer {
            min: Some(min),
            max: None,
        } => format!("{name} must be above {min}"),
        Rule::Integer {
            min: None,
            max: Some(max),
        } => format!("{name} must be below {max}"),
        Rule::Integer {
            min: None,
            max: None,
        } => format!("{name} must be an integer"),
        Rule::OneOf(allowed) => {
            let list: Vec<String> = allowed.iter().map(i64::to_string).collect();
            format!("{name} must be an integer, one of {}", list.join(", "))
        }
    }
}

/// The cleaned value, or `None` when the rule rejects `raw`.
fn sanitize(rule: &Rule, raw: &Value) -> Option<Value> {
    match rule {
        Rule::Text { min, max } => {
            let trimmed = raw.as_str()?.trim();
            let len = trimmed.chars().count();
            (len >= *min && len <= *max).then(|| Value::String(trimmed.to_string()))
        }
        Rule::Secret { min, max } => {
            let raw = raw.as_str()?;
            let len = raw.chars().count();
            (len >= *min && len <= *max).then(|| Value::String(raw.to_string()))
        }
        Rule::Integer { min, max } => {
            let n = as_integer(raw)?;
            let in_range = min.map_or(true, |m| n >= m) && max.map_or(true, |m| n <= m);
            in_range.then(|| Value::from(n))
        }
        Rule::OneOf(allowed) => {
            let n = as_integer(raw)?;
            allowed.contains(&n).then(|| Value::from(n))
        }
    }
}

fn as_integer(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
