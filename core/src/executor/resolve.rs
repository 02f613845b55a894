//! Argument placeholder resolution.
//!
//! The scheduler orders invocations by their declared `dependencies` only.
//! Substituting `$<invocation_id>.result` references with the values produced
//! by earlier levels is a separate step, installed on the executor through
//! [`ArgumentResolver`].

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde_json::Value;
use thiserror::Error;

use super::types::{ToolInvocation, ToolResult};

lazy_static! {
    static ref PLACEHOLDER: Regex =
        Regex::new(r"\$([A-Za-z0-9_.:\-]+?)\.result((?:\.[A-Za-z0-9_\-]+)*)")
            .expect("placeholder pattern is valid");
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("unresolved reference '{reference}': no result for invocation '{invocation_id}'")]
    MissingResult {
        reference: String,
        invocation_id: String,
    },

    #[error("unresolved reference '{reference}': invocation '{invocation_id}' failed")]
    FailedDependency {
        reference: String,
        invocation_id: String,
    },

    #[error("unresolved reference '{reference}': field '{field}' not found")]
    MissingField { reference: String, field: String },
}

/// Rewrites an invocation's arguments using results of completed invocations.
pub trait ArgumentResolver: Send + Sync {
    fn name(&self) -> &str;

    fn resolve(
        &self,
        invocation: &ToolInvocation,
        completed: &HashMap<String, ToolResult>,
    ) -> Result<ToolInvocation, ResolveError>;
}

/// Resolves `$<id>.result` and `$<id>.result.<field>...` references.
///
/// A string that is exactly one reference is replaced by the referenced JSON
/// value. References embedded in a longer string are substituted as text.
/// Numeric path segments index into arrays.
///
/// Invocation ids in references may contain ASCII letters, digits and
/// `_ - . :`. The id ends at the first `.result`, so `$search.v2.result.hits`
/// reads field `hits` of invocation `search.v2`. References to ids with other
/// characters are left as literal text.
#[derive(Debug, Default, Clone)]
pub struct PlaceholderResolver;

impl PlaceholderResolver {
    pub fn new() -> Self {
        Self
    }

    fn resolve_value(
        &self,
        value: &Value,
        completed: &HashMap<String, ToolResult>,
    ) -> Result<Value, ResolveError> {
        match value {
            Value::String(s) => self.resolve_string(s, completed),
            Value::Array(items) => items
                .iter()
                .map(|item| self.resolve_value(item, completed))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Value::Object(map) => map
                .iter()
                .map(|(k, v)| Ok((k.clone(), self.resolve_value(v, completed)?)))
                .collect::<Result<serde_json::Map<String, Value>, ResolveError>>()
                .map(Value::Object),
            other => Ok(other.clone()),
        }
    }

    fn resolve_string(
        &self,
        s: &str,
        completed: &HashMap<String, ToolResult>,
    ) -> Result<Value, ResolveError> {
        if let Some(caps) = PLACEHOLDER.captures(s) {
            let whole = caps.get(0).map(|m| m.range());
            if whole == Some(0..s.len()) {
                return lookup(&caps, completed);
            }
        } else {
            return Ok(Value::String(s.to_string()));
        }

        let mut out = String::with_capacity(s.len());
        let mut last = 0;
        for caps in PLACEHOLDER.captures_iter(s) {
            let Some(m) = caps.get(0) else {
                continue;
            };
            out.push_str(&s[last..m.start()]);
            match lookup(&caps, completed)? {
                Value::String(text) => out.push_str(&text),
                other => out.push_str(&other.to_string()),
            }
            last = m.end();
        }
        out.push_str(&s[last..]);

        Ok(Value::String(out))
    }
}

impl ArgumentResolver for PlaceholderResolver {
    fn name(&self) -> &str {
        "placeholder"
    }

    fn resolve(
        &self,
        invocation: &ToolInvocation,
        completed: &HashMap<String, ToolResult>,
    ) -> Result<ToolInvocation, ResolveError> {
        let mut resolved = invocation.clone();
        for (name, value) in &invocation.arguments {
            let new_value = self.resolve_value(value, completed)?;
            resolved.arguments.insert(name.clone(), new_value);
        }
        Ok(resolved)
    }
}

fn lookup(caps: &Captures<'_>, completed: &HashMap<String, ToolResult>) -> Result<Value, ResolveError> {
    let reference = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
    let invocation_id = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    let path = caps.get(2).map(|m| m.as_str()).unwrap_or_default();

    let result = completed
        .get(invocation_id)
        .ok_or_else(|| ResolveError::MissingResult {
            reference: reference.to_string(),
            invocation_id: invocation_id.to_string(),
        })?;

    let value = match (&result.result, result.success) {
        (Some(value), true) => value,
        _ => {
            return Err(ResolveError::FailedDependency {
                reference: reference.to_string(),
                invocation_id: invocation_id.to_string(),
            })
        }
    };

    let mut current = value;
    for field in path.split('.').filter(|s| !s.is_empty()) {
        let next = match current {
            Value::Object(map) => map.get(field),
            Value::Array(items) => field.parse::<usize>().ok().and_then(|idx| items.get(idx)),
            _ => None,
        };
        current = next.ok_or_else(|| ResolveError::MissingField {
            reference: reference.to_string(),
            field: field.to_string(),
        })?;
    }

    Ok(current.clone())
}
