//! Resource names addressing platform objects.
//!
//! A resource name is an ordered chain of `type:value` segments from the
//! outermost owner to the addressed object, for example
//! `project:p1/application:app1/component:web`. Policies carry the same
//! shape as patterns, where a value of `*` matches any instance and a type of
//! `*` matches the whole remaining chain.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Wildcard marker used for both segment types and segment values.
pub const WILDCARD: &str = "*";

/// Resource type of the segment that roots project-scoped names.
pub const PROJECT_RESOURCE_TYPE: &str = "project";

/// One `type:value` segment of a resource name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceSegment {
    resource_type: String,
    value: String,
}

impl ResourceSegment {
    /// Creates a segment from a type and a value.
    #[must_use]
    pub fn new(resource_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            value: value.into(),
        }
    }

    /// Returns the resource type of the segment.
    #[must_use]
    pub fn resource_type(&self) -> &str {
        self.resource_type.as_str()
    }

    /// Returns the instance value of the segment.
    #[must_use]
    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    fn has_wildcard_type(&self) -> bool {
        self.resource_type == WILDCARD
    }

    fn has_wildcard_value(&self) -> bool {
        self.value == WILDCARD
    }
}

/// Parsed resource name, outer segment first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceName {
    segments: Vec<ResourceSegment>,
}

impl ResourceName {
    /// Builds a resource name from already split segments.
    #[must_use]
    pub fn from_segments(segments: Vec<ResourceSegment>) -> Self {
        Self { segments }
    }

    /// Parses a `/`-joined chain of `type:value` tokens.
    ///
    /// A token without a colon addresses every instance of its type, so
    /// `cloudshell` parses as `cloudshell:*`. Empty tokens produced by leading
    /// or trailing slashes are skipped. The chain ends at the first token
    /// with more than one colon or an empty type.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let segments = value
            .split('/')
            .filter(|token| !token.is_empty())
            .map_while(|token| {
                let mut parts = token.split(':');
                let segment = match (parts.next(), parts.next(), parts.next()) {
                    (Some(resource_type), None, None) => {
                        ResourceSegment::new(resource_type, WILDCARD)
                    }
                    (Some(resource_type), Some(value), None) => {
                        ResourceSegment::new(resource_type, value)
                    }
                    _ => return None,
                };
                (!segment.resource_type.is_empty()).then_some(segment)
            })
            .collect();

        Self { segments }
    }

    /// Substitutes every `{name}` placeholder of `template` and parses the result.
    ///
    /// Placeholders the lookup resolves to an empty string become `*`.
    pub fn instantiate<F>(template: &str, lookup: F) -> Self
    where
        F: FnMut(&str) -> String,
    {
        Self::parse(substitute_placeholders(template, lookup).as_str())
    }

    /// Returns the ordered segments.
    #[must_use]
    pub fn segments(&self) -> &[ResourceSegment] {
        self.segments.as_slice()
    }

    /// Returns whether the name has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns whether the chain starts at the concrete project `project`.
    ///
    /// Names that start elsewhere, or at `project:*`, reach beyond a single
    /// project.
    #[must_use]
    pub fn is_within_project(&self, project: &str) -> bool {
        self.segments.first().is_some_and(|segment| {
            segment.resource_type == PROJECT_RESOURCE_TYPE && segment.value == project
        })
    }

    /// Returns whether this pattern covers `target`.
    ///
    /// `self` is the policy side and `target` the requested resource; the
    /// relation is not symmetric. `project:*` covers `project:p1` but a
    /// pattern never covers a target longer than itself unless it reaches a
    /// wildcard type first.
    #[must_use]
    pub fn matches(&self, target: &ResourceName) -> bool {
        let mut targets = target.segments.iter();

        for pattern in &self.segments {
            if pattern.has_wildcard_type() {
                return true;
            }

            let Some(requested) = targets.next() else {
                return false;
            };

            if pattern.resource_type != requested.resource_type {
                return false;
            }

            if pattern.value != requested.value && !pattern.has_wildcard_value() {
                return false;
            }
        }

        targets.next().is_none()
    }
}

impl Display for ResourceName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, segment) in self.segments.iter().enumerate() {
            if index > 0 {
                formatter.write_str("/")?;
            }
            if segment.has_wildcard_type() {
                formatter.write_str(WILDCARD)?;
            } else {
                write!(formatter, "{}:{}", segment.resource_type, segment.value)?;
            }
        }

        Ok(())
    }
}

/// Replaces `{name}` placeholders using `lookup`, falling back to `*`.
pub fn substitute_placeholders<F>(template: &str, mut lookup: F) -> String
where
    F: FnMut(&str) -> String,
{
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}').map(|offset| open + offset) else {
            break;
        };

        output.push_str(&rest[..open]);
        let value = lookup(&rest[open + 1..close]);
        if value.is_empty() {
            output.push_str(WILDCARD);
        } else {
            output.push_str(value.as_str());
        }
        rest = &rest[close + 1..];
    }

    output.push_str(rest);
    output
}
