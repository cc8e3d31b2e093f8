use std::sync::Arc;

use kubedeck_core::{AppError, AppResult};
use kubedeck_domain::{PermissionScope, PolicyEffect, User};

use crate::test_support::FakeStore;
use crate::{
    CreatePermissionInput, CreateProjectInput, CreateRoleInput, PermissionRepository,
    ProjectRepository, RoleRepository, UpdatePermissionInput, UpdateRoleInput, UserRepository,
};

use super::RbacService;

fn service(store: &Arc<FakeStore>) -> RbacService {
    RbacService::new(store.clone(), store.clone(), store.clone(), store.clone())
}

fn project_input(name: &str, owner: Option<&str>) -> CreateProjectInput {
    CreateProjectInput {
        name: name.to_owned(),
        alias: name.to_uppercase(),
        owner: owner.map(ToOwned::to_owned),
        description: String::new(),
    }
}

fn permission_input(name: &str, resources: &[&str]) -> CreatePermissionInput {
    CreatePermissionInput {
        name: name.to_owned(),
        alias: name.to_owned(),
        resources: resources.iter().map(|value| (*value).to_owned()).collect(),
        actions: Vec::new(),
        effect: None,
    }
}

#[tokio::test]
async fn init_seeds_platform_defaults_once() -> AppResult<()> {
    let store = Arc::new(FakeStore::default());
    let service = service(&store);

    service.init().await?;
    let seeded = store.list_permissions(None).await?;
    assert_eq!(
        seeded.len(),
        service
            .list_permission_templates(PermissionScope::Platform)
            .len()
    );
    assert!(seeded.iter().any(|permission| permission.name == "admin"));

    let admin = store.find_roles(None, &["admin".to_owned()]).await?;
    assert_eq!(admin.len(), 1);
    assert_eq!(admin[0].permissions, vec!["admin".to_owned()]);

    service.init().await?;
    assert_eq!(store.list_permissions(None).await?.len(), seeded.len());
    Ok(())
}

#[tokio::test]
async fn create_permission_applies_defaults() -> AppResult<()> {
    let store = Arc::new(FakeStore::default());
    let permission = service(&store)
        .create_permission(None, permission_input("cluster-view", &["cluster:*"]))
        .await?;

    assert_eq!(permission.actions, vec!["*".to_owned()]);
    assert_eq!(permission.effect, PolicyEffect::Allow);
    assert!(permission.project.is_none());
    Ok(())
}

#[tokio::test]
async fn create_permission_validates_input() -> AppResult<()> {
    let store = Arc::new(FakeStore::default());
    let service = service(&store);

    let without_resources = service
        .create_permission(None, permission_input("empty", &[" "]))
        .await;
    assert!(matches!(without_resources, Err(AppError::Validation(_))));

    let mut bad_effect = permission_input("odd", &["cluster:*"]);
    bad_effect.effect = Some("maybe".to_owned());
    assert!(matches!(
        service.create_permission(None, bad_effect).await,
        Err(AppError::Validation(_))
    ));

    let missing_project = service
        .create_permission(Some("ghost"), permission_input("view", &["project:ghost"]))
        .await;
    assert!(matches!(missing_project, Err(AppError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn role_requires_known_permissions() -> AppResult<()> {
    let store = Arc::new(FakeStore::default());
    let service = service(&store);
    service.init().await?;

    let unknown = service
        .create_role(
            None,
            CreateRoleInput {
                name: "ops".to_owned(),
                alias: "Ops".to_owned(),
                permissions: vec!["cluster-management".to_owned(), "nope".to_owned()],
            },
        )
        .await;
    assert!(matches!(unknown, Err(AppError::Validation(message)) if message.contains("nope")));

    let empty = service
        .create_role(
            None,
            CreateRoleInput {
                name: "ops".to_owned(),
                alias: "Ops".to_owned(),
                permissions: Vec::new(),
            },
        )
        .await;
    assert!(matches!(empty, Err(AppError::Validation(_))));

    let role = service
        .create_role(
            None,
            CreateRoleInput {
                name: "ops".to_owned(),
                alias: "Ops".to_owned(),
                permissions: vec!["cluster-management".to_owned()],
            },
        )
        .await?;
    assert_eq!(role.name, "ops");

    let duplicate = service
        .create_role(
            None,
            CreateRoleInput {
                name: "ops".to_owned(),
                alias: "Ops".to_owned(),
                permissions: vec!["cluster-management".to_owned()],
            },
        )
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
    Ok(())
}

#[tokio::test]
async fn update_role_replaces_permissions() -> AppResult<()> {
    let store = Arc::new(FakeStore::default());
    let service = service(&store);
    service.init().await?;

    let updated = service
        .update_role(
            None,
            "admin",
            UpdateRoleInput {
                alias: "Administrators".to_owned(),
                permissions: vec!["admin".to_owned(), "disable-cloudshell".to_owned()],
            },
        )
        .await?;
    assert_eq!(updated.alias, "Administrators");
    assert_eq!(updated.permissions.len(), 2);

    let missing = service
        .update_role(
            None,
            "ghost",
            UpdateRoleInput {
                alias: String::new(),
                permissions: vec!["admin".to_owned()],
            },
        )
        .await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn referenced_permission_cannot_be_deleted() -> AppResult<()> {
    let store = Arc::new(FakeStore::default());
    let service = service(&store);
    service.init().await?;

    let in_use = service.delete_permission(None, "admin").await;
    assert!(matches!(in_use, Err(AppError::Conflict(_))));

    service.delete_permission(None, "target-management").await?;
    assert!(
        store
            .find_permissions(None, &["target-management".to_owned()])
            .await?
            .is_empty()
    );
    Ok(())
}

#[tokio::test]
async fn update_permission_rewrites_policy() -> AppResult<()> {
    let store = Arc::new(FakeStore::default());
    let service = service(&store);
    service
        .create_permission(None, permission_input("cluster-view", &["cluster:*"]))
        .await?;

    let updated = service
        .update_permission(
            None,
            "cluster-view",
            UpdatePermissionInput {
                alias: "Cluster View".to_owned(),
                resources: vec!["cluster:*/namespace:*".to_owned()],
                actions: vec!["list".to_owned()],
                effect: Some("deny".to_owned()),
            },
        )
        .await?;

    assert_eq!(updated.effect, PolicyEffect::Deny);
    assert_eq!(updated.actions, vec!["list".to_owned()]);
    assert!(updated.updated_at >= updated.created_at);
    Ok(())
}

#[tokio::test]
async fn project_permissions_stay_inside_their_project() -> AppResult<()> {
    let store = Arc::new(FakeStore::default());
    let service = service(&store);
    service.create_project(project_input("demo", None)).await?;

    for escaping in ["*", "user:*", "project:*/role:*", "project:other/application:*/*"] {
        let created = service
            .create_permission(
                Some("demo"),
                permission_input("escape", &["project:demo", escaping]),
            )
            .await;
        assert!(
            matches!(created, Err(AppError::Validation(_))),
            "{escaping}"
        );
    }

    let view = service
        .create_permission(
            Some("demo"),
            permission_input("app-view", &["project:demo/application:*/*"]),
        )
        .await?;
    assert_eq!(view.project.as_deref(), Some("demo"));

    let widened = service
        .update_permission(
            Some("demo"),
            "app-view",
            UpdatePermissionInput {
                alias: "App View".to_owned(),
                resources: vec!["*".to_owned()],
                actions: Vec::new(),
                effect: None,
            },
        )
        .await;
    assert!(matches!(widened, Err(AppError::Validation(_))));

    let stored = store
        .find_permissions(Some("demo"), &["app-view".to_owned()])
        .await?;
    assert_eq!(
        stored.first().map(|permission| permission.resources.clone()),
        Some(vec!["project:demo/application:*/*".to_owned()])
    );
    Ok(())
}

#[tokio::test]
async fn create_project_seeds_roles_and_owner_membership() -> AppResult<()> {
    let store = Arc::new(FakeStore::default());
    store
        .create_user(User::new("alice", "Alice", None, "hash", Vec::new()))
        .await?;
    let service = service(&store);

    let project = service
        .create_project(project_input("demo", Some("alice")))
        .await?;
    assert_eq!(project.owner.as_deref(), Some("alice"));

    let permissions = store.list_permissions(Some("demo")).await?;
    assert_eq!(
        permissions.len(),
        service
            .list_permission_templates(PermissionScope::Project)
            .len()
    );
    assert!(permissions.iter().all(|permission| {
        permission
            .resources
            .iter()
            .all(|resource| resource.starts_with("project:demo"))
    }));

    let roles = store.list_roles(Some("demo")).await?;
    let mut role_names: Vec<&str> = roles.iter().map(|role| role.name.as_str()).collect();
    role_names.sort_unstable();
    assert_eq!(role_names, vec!["app-developer", "project-admin", "project-viewer"]);

    let owner = store.find_project_user("demo", "alice").await?;
    assert_eq!(
        owner.map(|member| member.roles),
        Some(vec!["project-admin".to_owned()])
    );
    Ok(())
}

#[tokio::test]
async fn create_project_rejects_unknown_owner_and_duplicates() -> AppResult<()> {
    let store = Arc::new(FakeStore::default());
    let service = service(&store);

    let unknown_owner = service
        .create_project(project_input("demo", Some("ghost")))
        .await;
    assert!(matches!(unknown_owner, Err(AppError::Validation(_))));

    service.create_project(project_input("demo", None)).await?;
    let duplicate = service.create_project(project_input("demo", None)).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
    Ok(())
}

#[tokio::test]
async fn sync_is_idempotent_and_repairs_drift() -> AppResult<()> {
    let store = Arc::new(FakeStore::default());
    let service = service(&store);
    let project = service.create_project(project_input("demo", None)).await?;

    let before = store.list_permissions(Some("demo")).await?;
    service.sync_default_roles_for_project(&project).await?;
    let after = store.list_permissions(Some("demo")).await?;
    assert_eq!(before, after);
    assert_eq!(store.list_roles(Some("demo")).await?.len(), 3);

    let mut drifted = store
        .find_permissions(Some("demo"), &["app-management".to_owned()])
        .await?;
    if let Some(permission) = drifted.first_mut() {
        permission.actions = vec!["list".to_owned()];
        store.save_permission(permission.clone()).await?;
    }

    service.sync_default_roles_for_project(&project).await?;
    let repaired = store
        .find_permissions(Some("demo"), &["app-management".to_owned()])
        .await?;
    assert_eq!(
        repaired.first().map(|permission| permission.actions.clone()),
        Some(vec!["*".to_owned()])
    );

    let mut removed = store.list_permissions(Some("demo")).await?;
    removed.retain(|permission| permission.name == "env-management");
    store.delete_permission(Some("demo"), "env-management").await?;
    service.sync_default_roles_for_project(&project).await?;
    assert_eq!(
        store
            .find_permissions(Some("demo"), &["env-management".to_owned()])
            .await?
            .len(),
        removed.len()
    );
    Ok(())
}

#[tokio::test]
async fn project_scoped_roles_require_project() -> AppResult<()> {
    let store = Arc::new(FakeStore::default());
    let service = service(&store);

    let result = service.list_roles(Some("ghost")).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    service.create_project(project_input("demo", None)).await?;
    assert_eq!(service.list_roles(Some("demo")).await?.len(), 3);
    assert!(service.list_roles(None).await?.is_empty());
    assert_eq!(service.list_projects().await?.len(), 1);
    Ok(())
}
