//! Permission policies and their evaluation against one request.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use kubedeck_core::AppError;
use serde::{Deserialize, Serialize};

use crate::resource::{ResourceName, WILDCARD};

/// Outcome a policy asserts when it matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyEffect {
    /// Grants the matched request unless a deny policy also matches.
    #[default]
    Allow,
    /// Rejects the matched request regardless of allow policies.
    Deny,
}

impl PolicyEffect {
    /// Returns the stable storage value for this effect.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "Allow",
            Self::Deny => "Deny",
        }
    }

    /// Parses an optional transport value, defaulting to `Allow` when absent.
    pub fn from_optional(value: Option<&str>) -> Result<Self, AppError> {
        match value.map(str::trim) {
            None | Some("") => Ok(Self::Allow),
            Some(value) => Self::from_str(value),
        }
    }
}

impl FromStr for PolicyEffect {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.eq_ignore_ascii_case("allow") {
            Ok(Self::Allow)
        } else if value.eq_ignore_ascii_case("deny") {
            Ok(Self::Deny)
        } else {
            Err(AppError::Validation(format!(
                "unknown policy effect '{value}', expected 'Allow' or 'Deny'"
            )))
        }
    }
}

impl Display for PolicyEffect {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// A named permission policy, scoped to the platform or to one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    /// Unique name within its scope.
    pub name: String,
    /// Human readable alias.
    pub alias: String,
    /// Owning project, `None` for platform permissions.
    pub project: Option<String>,
    /// Resource patterns the policy applies to.
    pub resources: Vec<String>,
    /// Action names, or `*` for all actions.
    pub actions: Vec<String>,
    /// Effect asserted on match.
    pub effect: PolicyEffect,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Permission {
    /// Creates a permission stamped with the current time.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        alias: impl Into<String>,
        project: Option<String>,
        resources: Vec<String>,
        actions: Vec<String>,
        effect: PolicyEffect,
    ) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            alias: alias.into(),
            project,
            resources,
            actions,
            effect,
            created_at: now,
            updated_at: now,
        }
    }

    /// Policy granting every action on the web terminal to any user.
    #[must_use]
    pub fn cloudshell() -> Self {
        Self::new(
            "cloudshell",
            "",
            None,
            vec!["cloudshell".to_owned()],
            vec![WILDCARD.to_owned()],
            PolicyEffect::Allow,
        )
    }

    /// Returns whether every resource pattern stays inside the owning scope.
    ///
    /// Platform permissions may address anything. Project permissions must
    /// root every pattern at their own project.
    #[must_use]
    pub fn is_confined_to_scope(&self) -> bool {
        match self.project.as_deref() {
            None => true,
            Some(project) => self
                .resources
                .iter()
                .all(|resource| ResourceName::parse(resource).is_within_project(project)),
        }
    }

    fn grants_actions(&self, requested: &[String]) -> bool {
        self.actions.iter().any(|action| action == WILDCARD)
            || requested
                .iter()
                .all(|action| self.actions.iter().any(|granted| granted == action))
    }

    fn covers_resource(&self, resource: &ResourceName) -> bool {
        self.resources
            .iter()
            .any(|pattern| ResourceName::parse(pattern).matches(resource))
    }
}

/// The resource and actions one request asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestResourceAction {
    resource: ResourceName,
    actions: Vec<String>,
}

impl RequestResourceAction {
    /// Creates a request descriptor.
    #[must_use]
    pub fn new(resource: ResourceName, actions: Vec<String>) -> Self {
        Self { resource, actions }
    }

    /// Returns the resolved resource.
    #[must_use]
    pub fn resource(&self) -> &ResourceName {
        &self.resource
    }

    /// Returns the requested actions.
    #[must_use]
    pub fn actions(&self) -> &[String] {
        self.actions.as_slice()
    }

    /// Returns whether `policy` applies to this request.
    #[must_use]
    pub fn matched_by(&self, policy: &Permission) -> bool {
        policy.grants_actions(&self.actions) && policy.covers_resource(&self.resource)
    }

    /// Decides the request against a policy set.
    ///
    /// Any matching deny policy rejects. Otherwise the first matching allow
    /// policy permits. No match rejects.
    #[must_use]
    pub fn is_allowed(&self, policies: &[Permission]) -> bool {
        let denied = policies
            .iter()
            .filter(|policy| policy.effect == PolicyEffect::Deny)
            .any(|policy| self.matched_by(policy));
        if denied {
            return false;
        }

        policies
            .iter()
            .filter(|policy| policy.effect == PolicyEffect::Allow)
            .any(|policy| self.matched_by(policy))
    }
}
