use std::str::FromStr;

use chrono::{DateTime, Utc};
use kubedeck_core::AppError;
use serde::{Deserialize, Serialize};

use crate::policy::{Permission, PolicyEffect};
use crate::resource::ResourceName;

/// Placeholder substituted with the owning project name.
pub const PROJECT_PATH_PARAM: &str = "projectName";

/// Name of the platform role seeded for the first administrator.
pub const ADMIN_ROLE_NAME: &str = "admin";

/// Applicability of a role or permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionScope {
    /// Global, not bound to any project.
    Platform,
    /// Namespaced to one project.
    Project,
}

impl PermissionScope {
    /// Returns a stable storage value for this scope.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Platform => "platform",
            Self::Project => "project",
        }
    }

    /// Returns the scope a project name implies.
    #[must_use]
    pub fn of(project: Option<&str>) -> Self {
        match project {
            Some(_) => Self::Project,
            None => Self::Platform,
        }
    }
}

impl FromStr for PermissionScope {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "platform" => Ok(Self::Platform),
            "project" => Ok(Self::Project),
            _ => Err(AppError::Validation(format!(
                "unknown permission scope '{value}'"
            ))),
        }
    }
}

/// A named set of permissions granted together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Unique name within its scope.
    pub name: String,
    /// Human readable alias.
    pub alias: String,
    /// Owning project, `None` for platform roles.
    pub project: Option<String>,
    /// Names of permissions in the same scope.
    pub permissions: Vec<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Role {
    /// Creates a role stamped with the current time.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        alias: impl Into<String>,
        project: Option<String>,
        permissions: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            alias: alias.into(),
            project,
            permissions,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the scope of the role.
    #[must_use]
    pub fn scope(&self) -> PermissionScope {
        PermissionScope::of(self.project.as_deref())
    }
}

/// Built-in permission definition used for seeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionTemplate {
    /// Permission name.
    pub name: &'static str,
    /// Human readable alias.
    pub alias: &'static str,
    /// Resource patterns, possibly with `{projectName}` placeholders.
    pub resources: &'static [&'static str],
    /// Granted actions.
    pub actions: &'static [&'static str],
    /// Asserted effect.
    pub effect: PolicyEffect,
    /// Target scope.
    pub scope: PermissionScope,
}

impl PermissionTemplate {
    /// Returns the default templates for a scope.
    #[must_use]
    pub fn defaults(scope: PermissionScope) -> &'static [PermissionTemplate] {
        match scope {
            PermissionScope::Platform => PLATFORM_PERMISSION_TEMPLATES,
            PermissionScope::Project => PROJECT_PERMISSION_TEMPLATES,
        }
    }

    /// Returns the template resources with placeholders bound for `project`.
    ///
    /// `{projectName}` becomes the project and other placeholders become `*`.
    /// Platform templates carry no placeholders and are returned verbatim.
    #[must_use]
    pub fn resources_for(&self, project: Option<&str>) -> Vec<String> {
        let Some(project) = project else {
            return self
                .resources
                .iter()
                .map(|resource| (*resource).to_owned())
                .collect();
        };

        self.resources
            .iter()
            .map(|resource| {
                ResourceName::instantiate(resource, |key| {
                    if key == PROJECT_PATH_PARAM {
                        project.to_owned()
                    } else {
                        String::new()
                    }
                })
                .to_string()
            })
            .collect()
    }

    /// Materialises the template as a permission for `project`.
    #[must_use]
    pub fn instantiate(&self, project: Option<&str>) -> Permission {
        Permission::new(
            self.name,
            self.alias,
            project.map(ToOwned::to_owned),
            self.resources_for(project),
            self.actions.iter().map(|action| (*action).to_owned()).collect(),
            self.effect,
        )
    }
}

/// Built-in project role seeded on the first project sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectRoleTemplate {
    /// Role name.
    pub name: &'static str,
    /// Human readable alias.
    pub alias: &'static str,
    /// Permission template names granted by the role.
    pub permissions: &'static [&'static str],
}

impl ProjectRoleTemplate {
    /// Role granted to the project owner.
    pub const OWNER_ROLE: &'static str = "project-admin";

    /// Returns the default project roles.
    #[must_use]
    pub fn defaults() -> &'static [ProjectRoleTemplate] {
        PROJECT_ROLE_TEMPLATES
    }

    /// Materialises the template as a role of `project`.
    #[must_use]
    pub fn instantiate(&self, project: &str) -> Role {
        Role::new(
            self.name,
            self.alias,
            Some(project.to_owned()),
            self.permissions
                .iter()
                .map(|permission| (*permission).to_owned())
                .collect(),
        )
    }
}

const PROJECT_PERMISSION_TEMPLATES: &[PermissionTemplate] = &[
    PermissionTemplate {
        name: "project-view",
        alias: "Project View",
        resources: &[
            "project:{projectName}",
            "project:{projectName}/config:*",
            "project:{projectName}/provider:*",
            "project:{projectName}/role:*",
            "project:{projectName}/projectUser:*",
            "project:{projectName}/permission:*",
            "project:{projectName}/environment:*",
            "project:{projectName}/application:*/*",
            "project:{projectName}/pipeline:*/*",
        ],
        actions: &["detail", "list"],
        effect: PolicyEffect::Allow,
        scope: PermissionScope::Project,
    },
    PermissionTemplate {
        name: "app-management",
        alias: "App Management",
        resources: &["project:{projectName}/application:*/*"],
        actions: &["*"],
        effect: PolicyEffect::Allow,
        scope: PermissionScope::Project,
    },
    PermissionTemplate {
        name: "env-management",
        alias: "Environment Management",
        resources: &["project:{projectName}/environment:*"],
        actions: &["*"],
        effect: PolicyEffect::Allow,
        scope: PermissionScope::Project,
    },
    PermissionTemplate {
        name: "role-management",
        alias: "Role Management",
        resources: &[
            "project:{projectName}/role:*",
            "project:{projectName}/projectUser:*",
            "project:{projectName}/permission:*",
        ],
        actions: &["*"],
        effect: PolicyEffect::Allow,
        scope: PermissionScope::Project,
    },
    PermissionTemplate {
        name: "config-management",
        alias: "Config Management",
        resources: &[
            "project:{projectName}/config:*",
            "project:{projectName}/provider:*",
        ],
        actions: &["*"],
        effect: PolicyEffect::Allow,
        scope: PermissionScope::Project,
    },
    PermissionTemplate {
        name: "pipeline-management",
        alias: "Pipeline Management",
        resources: &["project:{projectName}/pipeline:*/*"],
        actions: &["*"],
        effect: PolicyEffect::Allow,
        scope: PermissionScope::Project,
    },
];

const PLATFORM_PERMISSION_TEMPLATES: &[PermissionTemplate] = &[
    PermissionTemplate {
        name: "disable-cloudshell",
        alias: "Disable CloudShell",
        resources: &["cloudshell"],
        actions: &["*"],
        effect: PolicyEffect::Deny,
        scope: PermissionScope::Platform,
    },
    PermissionTemplate {
        name: "cluster-management",
        alias: "Cluster Management",
        resources: &["cluster:*/*"],
        actions: &["*"],
        effect: PolicyEffect::Allow,
        scope: PermissionScope::Platform,
    },
    PermissionTemplate {
        name: "project-management",
        alias: "Project Management",
        resources: &["project:*"],
        actions: &["*"],
        effect: PolicyEffect::Allow,
        scope: PermissionScope::Platform,
    },
    PermissionTemplate {
        name: "project-list",
        alias: "Project List",
        resources: &["project:*"],
        actions: &["list"],
        effect: PolicyEffect::Allow,
        scope: PermissionScope::Platform,
    },
    PermissionTemplate {
        name: "addon-management",
        alias: "Addon Management",
        resources: &["addon:*", "addonRegistry:*"],
        actions: &["*"],
        effect: PolicyEffect::Allow,
        scope: PermissionScope::Platform,
    },
    PermissionTemplate {
        name: "target-management",
        alias: "Target Management",
        resources: &["target:*", "cluster:*/namespace:*"],
        actions: &["*"],
        effect: PolicyEffect::Allow,
        scope: PermissionScope::Platform,
    },
    PermissionTemplate {
        name: "user-management",
        alias: "User Management",
        resources: &["user:*"],
        actions: &["*"],
        effect: PolicyEffect::Allow,
        scope: PermissionScope::Platform,
    },
    PermissionTemplate {
        name: "role-management",
        alias: "Platform Role Management",
        resources: &["role:*", "permission:*"],
        actions: &["*"],
        effect: PolicyEffect::Allow,
        scope: PermissionScope::Platform,
    },
    PermissionTemplate {
        name: "config-management",
        alias: "Config Management",
        resources: &["config:*/*"],
        actions: &["*"],
        effect: PolicyEffect::Allow,
        scope: PermissionScope::Platform,
    },
    PermissionTemplate {
        name: "admin",
        alias: "Admin",
        resources: &["*"],
        actions: &["*"],
        effect: PolicyEffect::Allow,
        scope: PermissionScope::Platform,
    },
];

const PROJECT_ROLE_TEMPLATES: &[ProjectRoleTemplate] = &[
    ProjectRoleTemplate {
        name: "app-developer",
        alias: "App Developer",
        permissions: &[
            "project-view",
            "app-management",
            "env-management",
            "config-management",
            "pipeline-management",
        ],
    },
    ProjectRoleTemplate {
        name: "project-admin",
        alias: "Project Admin",
        permissions: &[
            "project-view",
            "app-management",
            "env-management",
            "pipeline-management",
            "config-management",
            "role-management",
        ],
    },
    ProjectRoleTemplate {
        name: "project-viewer",
        alias: "Project Viewer",
        permissions: &["project-view"],
    },
];
