//! Variable interpolation for instance inputs.
//!
//! Strings inside `inputs` may reference variables with `${...}` syntax.
//!
//! # Syntax
//!
//! - `${env:NAME}` or `${env.NAME}` - environment variable (required)
//! - `${name}`, `${component}`, `${org}`, `${app}`, `${stage}` - resolved instance fields
//! - `$${escaped}` - produces literal `${escaped}` in output
//!
//! Any other reference, such as `${output:dev:app:api.url}`, is left as
//! written for the platform to resolve.
//!
//! # Example
//!
//! ```yaml
//! inputs:
//!   region: ${env:TENCENT_REGION}
//!   functionName: ${name}-${stage}
//! ```

use crate::config::environment::Environment;
use crate::error::{SlsError, Result};
use serde_yaml::Value;

/// A segment of an interpolated string.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text
    Literal(String),
    /// Variable reference: ${name}
    Variable(String),
}

/// Parse a string containing ${var} interpolations.
///
/// Only `$${` is an escape; any other `$$` is kept as written. An
/// unterminated `${` is literal text.
pub fn parse_interpolation(input: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut chars = input.chars().peekable();
    let mut current_literal = String::new();

    while let Some(c) = chars.next() {
        if c != '$' {
            current_literal.push(c);
            continue;
        }

        match chars.peek() {
            Some('$') => {
                chars.next();
                if chars.peek() == Some(&'{') {
                    // $${...} -> literal ${...}
                    chars.next();
                    current_literal.push_str("${");
                    for c in chars.by_ref() {
                        current_literal.push(c);
                        if c == '}' {
                            break;
                        }
                    }
                } else {
                    current_literal.push_str("$$");
                }
            }
            Some('{') => {
                chars.next();

                let mut var_name = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    var_name.push(c);
                }

                if !closed {
                    current_literal.push_str("${");
                    current_literal.push_str(&var_name);
                    continue;
                }

                if !current_literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut current_literal)));
                }
                segments.push(Segment::Variable(var_name.trim().to_string()));
            }
            _ => current_literal.push(c),
        }
    }

    if !current_literal.is_empty() {
        segments.push(Segment::Literal(current_literal));
    }

    segments
}

/// Check if a string contains any interpolation.
pub fn has_interpolation(input: &str) -> bool {
    parse_interpolation(input)
        .iter()
        .any(|seg| matches!(seg, Segment::Variable(_)))
}

/// Values visible to `${...}` references while resolving one instance.
pub struct VariableScope<'a> {
    /// Environment for `${env:...}` lookups.
    pub env: &'a dyn Environment,
    pub name: &'a str,
    pub component: &'a str,
    pub org: &'a str,
    pub app: &'a str,
    pub stage: Option<&'a str>,
}

impl VariableScope<'_> {
    /// Resolve a variable reference.
    ///
    /// Returns `Ok(None)` for references this scope does not own; those are
    /// kept verbatim.
    pub fn lookup(&self, reference: &str) -> Result<Option<String>> {
        let env_name = reference
            .strip_prefix("env:")
            .or_else(|| reference.strip_prefix("env."));

        if let Some(var) = env_name {
            return self
                .env
                .get(var.trim())
                .map(Some)
                .ok_or_else(|| SlsError::UnresolvedVariable {
                    name: reference.to_string(),
                });
        }

        let value = match reference {
            "name" => self.name,
            "component" => self.component,
            "org" => self.org,
            "app" => self.app,
            "stage" => self.stage.ok_or_else(|| SlsError::UnresolvedVariable {
                name: reference.to_string(),
            })?,
            _ => return Ok(None),
        };
        Ok(Some(value.to_string()))
    }
}

/// Resolves `${...}` references inside an `inputs` value.
pub trait VariableResolver {
    /// Return `inputs` with every resolvable reference substituted.
    fn resolve(&self, inputs: Value, scope: &VariableScope<'_>) -> Result<Value>;
}

/// Default [`VariableResolver`] that walks every string in the value tree.
///
/// # Example
///
/// ```
/// use slsctl::config::{Interpolator, MemoryEnvironment, VariableResolver, VariableScope};
///
/// let env = MemoryEnvironment::new().with_var("REGION", "ap-guangzhou");
/// let scope = VariableScope {
///     env: &env,
///     name: "api",
///     component: "scf",
///     org: "acme",
///     app: "shop",
///     stage: Some("dev"),
/// };
///
/// let inputs: serde_yaml::Value =
///     serde_yaml::from_str("region: ${env:REGION}\nfn: ${name}-${stage}").unwrap();
/// let resolved = Interpolator.resolve(inputs, &scope).unwrap();
/// assert_eq!(resolved["region"], "ap-guangzhou");
/// assert_eq!(resolved["fn"], "api-dev");
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct Interpolator;

impl Interpolator {
    fn resolve_string(input: &str, scope: &VariableScope<'_>) -> Result<String> {
        let mut result = String::new();

        for segment in parse_interpolation(input) {
            match segment {
                Segment::Literal(text) => result.push_str(&text),
                Segment::Variable(name) => match scope.lookup(&name)? {
                    Some(value) => result.push_str(&value),
                    None => {
                        result.push_str("${");
                        result.push_str(&name);
                        result.push('}');
                    }
                },
            }
        }

        Ok(result)
    }
}

impl VariableResolver for Interpolator {
    fn resolve(&self, inputs: Value, scope: &VariableScope<'_>) -> Result<Value> {
        Ok(match inputs {
            Value::String(s) if s.contains('$') => Value::String(Self::resolve_string(&s, scope)?),
            Value::Sequence(items) => Value::Sequence(
                items
                    .into_iter()
                    .map(|item| self.resolve(item, scope))
                    .collect::<Result<_>>()?,
            ),
            Value::Mapping(map) => {
                let mut resolved = serde_yaml::Mapping::with_capacity(map.len());
                for (key, value) in map {
                    resolved.insert(key, self.resolve(value, scope)?);
                }
                Value::Mapping(resolved)
            }
            Value::Tagged(mut tagged) => {
                tagged.value = self.resolve(tagged.value, scope)?;
                Value::Tagged(tagged)
            }
            other => other,
        })
    }
}
