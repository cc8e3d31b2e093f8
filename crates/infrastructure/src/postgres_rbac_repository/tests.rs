use chrono::Utc;
use kubedeck_application::{
    PermissionRepository, ProjectRepository, RoleRepository, UserRepository,
};
use kubedeck_core::AppError;
use kubedeck_domain::{Permission, PolicyEffect, Project, ProjectUser, Role, User};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use super::PostgresRbacRepository;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres rbac repository tests: {error}");
    }

    Some(pool)
}

fn unique_name(prefix: &str) -> String {
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{prefix}-{nanos:x}")
}

#[tokio::test]
async fn users_round_trip_and_conflict() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresRbacRepository::new(pool);
    let name = unique_name("dev");

    let mut user = User::new(&name, "Dev", None, "hash", vec!["admin".to_owned()]);
    assert!(repository.create_user(user.clone()).await.is_ok());
    assert!(matches!(
        repository.create_user(user.clone()).await,
        Err(AppError::Conflict(_))
    ));

    user.disabled = true;
    user.last_login_at = Some(Utc::now());
    assert!(repository.save_user(user.clone()).await.is_ok());

    let stored = repository.find_user(&name).await;
    assert!(matches!(
        stored,
        Ok(Some(ref stored)) if stored.disabled && stored.roles == vec!["admin".to_owned()]
    ));

    assert!(repository.delete_user(&name).await.is_ok());
    assert!(matches!(
        repository.delete_user(&name).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn roles_and_permissions_are_scoped_by_project() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresRbacRepository::new(pool);
    let project = unique_name("demo");
    let permission_name = unique_name("app-management");

    let platform = Permission::new(
        &permission_name,
        "Platform",
        None,
        vec!["project:*".to_owned()],
        vec!["*".to_owned()],
        PolicyEffect::Allow,
    );
    let scoped = Permission::new(
        &permission_name,
        "Scoped",
        Some(project.clone()),
        vec![format!("project:{project}/application:*")],
        vec!["list".to_owned(), "detail".to_owned()],
        PolicyEffect::Deny,
    );
    assert!(repository.create_permission(platform).await.is_ok());
    assert!(repository.create_permission(scoped.clone()).await.is_ok());
    assert!(matches!(
        repository.create_permission(scoped).await,
        Err(AppError::Conflict(_))
    ));

    let found = repository
        .find_permissions(Some(&project), &[permission_name.clone()])
        .await;
    assert!(matches!(
        found.as_deref(),
        Ok([permission]) if permission.effect == PolicyEffect::Deny
            && permission.project.as_deref() == Some(project.as_str())
    ));

    let role = Role::new(
        "project-viewer",
        "Viewer",
        Some(project.clone()),
        vec![permission_name.clone()],
    );
    assert!(repository.create_role(role).await.is_ok());
    let roles = repository.list_roles(Some(&project)).await;
    assert!(matches!(roles.as_deref(), Ok([role]) if role.name == "project-viewer"));

    assert!(
        repository
            .delete_role(Some(&project), "project-viewer")
            .await
            .is_ok()
    );
    assert!(
        repository
            .delete_permission(Some(&project), &permission_name)
            .await
            .is_ok()
    );
    let platform = repository
        .find_permissions(None, &[permission_name.clone()])
        .await;
    assert!(matches!(platform.as_deref(), Ok([permission]) if permission.project.is_none()));
    assert!(
        repository
            .delete_permission(None, &permission_name)
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn memberships_upsert_and_resolve_project_context() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresRbacRepository::new(pool.clone());
    let project = unique_name("demo");
    let username = unique_name("dev");

    assert!(
        repository
            .create_project(Project {
                name: project.clone(),
                alias: "Demo".to_owned(),
                owner: None,
                description: String::new(),
                created_at: Utc::now(),
            })
            .await
            .is_ok()
    );

    for roles in [vec!["project-viewer"], vec!["project-admin"]] {
        let member = ProjectUser {
            project_name: project.clone(),
            username: username.clone(),
            roles: roles.into_iter().map(ToOwned::to_owned).collect(),
        };
        assert!(repository.save_project_user(member).await.is_ok());
    }

    let member = repository.find_project_user(&project, &username).await;
    assert!(matches!(
        member,
        Ok(Some(ref member)) if member.roles == vec!["project-admin".to_owned()]
    ));

    let app_name = unique_name("app");
    let insert = sqlx::query("INSERT INTO applications (name, project) VALUES ($1, $2)")
        .bind(&app_name)
        .bind(&project)
        .execute(&pool)
        .await;
    assert!(insert.is_ok());
    assert!(matches!(
        repository.application_project(&app_name).await,
        Ok(Some(ref owner)) if owner == &project
    ));
    assert!(matches!(
        repository.environment_project("missing-env").await,
        Ok(None)
    ));

    assert!(repository.delete_memberships(&username).await.is_ok());
    assert!(matches!(
        repository.list_memberships(&username).await.as_deref(),
        Ok([])
    ));
}
