//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod policy;
mod resource;
mod resource_schema;
mod security;
mod user;

pub use policy::{Permission, PolicyEffect, RequestResourceAction};
pub use resource::{ResourceName, ResourceSegment, WILDCARD, substitute_placeholders};
pub use resource_schema::{ResourceSchema, ResourceSchemaRegistry};
pub use security::{
    ADMIN_ROLE_NAME, PROJECT_PATH_PARAM, PermissionScope, PermissionTemplate,
    ProjectRoleTemplate, Role,
};
pub use user::{
    DEFAULT_ADMIN_USERNAME, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, Project, ProjectUser, User,
    normalize_email, validate_name, validate_password,
};
