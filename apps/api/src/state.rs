use std::sync::Arc;

use kubedeck_application::{
    AuthorizationService, RbacService, ResourceActionRegistry, UserService,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub authorization_service: AuthorizationService,
    pub rbac_service: RbacService,
    pub user_service: UserService,
    pub resource_actions: Arc<ResourceActionRegistry>,
}
