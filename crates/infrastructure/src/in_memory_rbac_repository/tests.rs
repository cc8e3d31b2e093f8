use kubedeck_application::{
    PermissionRepository, ProjectRepository, RoleRepository, UserRepository,
};
use kubedeck_core::{AppError, AppResult};
use kubedeck_domain::{
    Permission, PolicyEffect, Project, ProjectUser, Role, User,
};

use super::InMemoryRbacRepository;

fn permission(name: &str, project: Option<&str>) -> Permission {
    Permission::new(
        name,
        name,
        project.map(ToOwned::to_owned),
        vec!["project:*".to_owned()],
        vec!["*".to_owned()],
        PolicyEffect::Allow,
    )
}

#[tokio::test]
async fn users_enforce_unique_names() -> AppResult<()> {
    let repository = InMemoryRbacRepository::new();
    repository
        .create_user(User::new("dev", "Dev", None, "hash", Vec::new()))
        .await?;

    let duplicate = repository
        .create_user(User::new("dev", "Other", None, "hash", Vec::new()))
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let missing = repository
        .save_user(User::new("ghost", "Ghost", None, "hash", Vec::new()))
        .await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    repository.delete_user("dev").await?;
    assert!(repository.find_user("dev").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn permissions_are_isolated_per_scope() -> AppResult<()> {
    let repository = InMemoryRbacRepository::new();
    repository.create_permission(permission("view", None)).await?;
    repository
        .create_permission(permission("view", Some("p1")))
        .await?;
    repository
        .create_permission(permission("edit", Some("p1")))
        .await?;

    assert_eq!(repository.list_permissions(None).await?.len(), 1);
    let project = repository.list_permissions(Some("p1")).await?;
    assert_eq!(
        project
            .iter()
            .map(|permission| permission.name.as_str())
            .collect::<Vec<_>>(),
        vec!["edit", "view"]
    );

    let found = repository
        .find_permissions(Some("p1"), &["view".to_owned(), "missing".to_owned()])
        .await?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].project.as_deref(), Some("p1"));

    repository.delete_permission(None, "view").await?;
    assert!(repository.list_permissions(None).await?.is_empty());
    assert_eq!(repository.list_permissions(Some("p1")).await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn roles_are_isolated_per_scope() -> AppResult<()> {
    let repository = InMemoryRbacRepository::new();
    repository
        .create_role(Role::new("viewer", "Viewer", None, vec!["view".to_owned()]))
        .await?;
    repository
        .create_role(Role::new(
            "viewer",
            "Viewer",
            Some("p1".to_owned()),
            vec!["view".to_owned()],
        ))
        .await?;

    let duplicate = repository
        .create_role(Role::new("viewer", "Viewer", None, Vec::new()))
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    repository.delete_role(Some("p1"), "viewer").await?;
    assert!(repository.list_roles(Some("p1")).await?.is_empty());
    assert_eq!(repository.list_roles(None).await?.len(), 1);

    let missing = repository.delete_role(Some("p1"), "viewer").await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn memberships_and_context_lookups() -> AppResult<()> {
    let repository = InMemoryRbacRepository::new();
    repository
        .create_project(Project {
            name: "p1".to_owned(),
            alias: "P1".to_owned(),
            owner: None,
            description: String::new(),
            created_at: chrono::Utc::now(),
        })
        .await?;
    for project in ["p1", "p2"] {
        repository
            .save_project_user(ProjectUser {
                project_name: project.to_owned(),
                username: "dev".to_owned(),
                roles: vec!["project-viewer".to_owned()],
            })
            .await?;
    }
    repository.register_application("app1", "p1").await;
    repository.register_environment("env1", "p2").await;

    assert_eq!(repository.list_memberships("dev").await?.len(), 2);
    assert_eq!(
        repository.application_project("app1").await?.as_deref(),
        Some("p1")
    );
    assert_eq!(
        repository.environment_project("env1").await?.as_deref(),
        Some("p2")
    );
    assert!(repository.application_project("other").await?.is_none());

    repository.delete_memberships("dev").await?;
    assert!(repository.find_project_user("p1", "dev").await?.is_none());
    Ok(())
}
