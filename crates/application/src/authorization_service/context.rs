use super::*;

/// Path parameter naming an application.
const APPLICATION_PATH_PARAM: &str = "appName";

/// Path parameter naming an environment.
const ENVIRONMENT_PATH_PARAM: &str = "envName";

impl AuthorizationService {
    /// Finds the project a request operates in.
    ///
    /// Explicit parameters win over the owners of named applications and
    /// environments. Lookup failures fall through to the next source.
    pub(super) async fn resolve_project_context(
        &self,
        params: &dyn RequestParameters,
    ) -> Option<String> {
        let explicit = [
            params.path_param(PROJECT_PATH_PARAM),
            params.query_param("project"),
            params.query_param(PROJECT_PATH_PARAM),
        ];
        if let Some(project) = explicit.into_iter().find(|value| !value.is_empty()) {
            return Some(project);
        }

        let app_name = params.path_param(APPLICATION_PATH_PARAM);
        if !app_name.is_empty() {
            match self.projects.application_project(&app_name).await {
                Ok(Some(project)) => return Some(project),
                Ok(None) => {}
                Err(error) => {
                    tracing::warn!(application = %app_name, error = %error, "failed to resolve application project");
                }
            }
        }

        let env_name = params.path_param(ENVIRONMENT_PATH_PARAM);
        if !env_name.is_empty() {
            match self.projects.environment_project(&env_name).await {
                Ok(Some(project)) => return Some(project),
                Ok(None) => {}
                Err(error) => {
                    tracing::warn!(environment = %env_name, error = %error, "failed to resolve environment project");
                }
            }
        }

        None
    }
}
