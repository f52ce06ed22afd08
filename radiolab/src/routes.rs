use radiolab_api::endpoints::{ProjectId, ReportId};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// Addressable pages of the console. The binary accepts one of these paths as its
/// starting point, e.g. `radiolab /projects/12/analyze`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Projects,
    ProjectCreate,
    ProjectDetail(ProjectId),
    ProjectEdit(ProjectId),
    Upload(ProjectId),
    Analyze(ProjectId),
    Reports,
    ReportDetail(ReportId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("unknown path '{0}'")]
    Unknown(String),

    #[error("invalid identifier in '{path}': {reason}")]
    InvalidId { path: String, reason: String },

    #[error("'{0}' needs a projectId query parameter")]
    MissingProject(String),
}

/// Paths kept working after the create page moved to `/projects/create`.
const LEGACY_CREATE_PATHS: [&str; 2] = ["/projects/new", "/new-project"];

impl Route {
    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let trimmed = path.trim();
        let (path_part, query) = match trimmed.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (trimmed, None),
        };
        let normalized = path_part.trim_end_matches('/');

        if LEGACY_CREATE_PATHS.contains(&normalized) {
            tracing::info!("Redirecting legacy path {} to /projects/create", normalized);
            return Ok(Route::ProjectCreate);
        }

        let segments: Vec<&str> = normalized
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Ok(Route::Home),
            ["projects"] => Ok(Route::Projects),
            ["projects", "create"] => Ok(Route::ProjectCreate),
            ["projects", id] => parse_id(trimmed, id).map(Route::ProjectDetail),
            ["projects", id, "edit"] => parse_id(trimmed, id).map(Route::ProjectEdit),
            ["projects", id, "analyze"] => parse_id(trimmed, id).map(Route::Analyze),
            ["upload"] => {
                let id = query
                    .into_iter()
                    .flat_map(|q| q.split('&'))
                    .find_map(|pair| pair.strip_prefix("projectId="))
                    .ok_or_else(|| RouteError::MissingProject(trimmed.to_string()))?;
                parse_id(trimmed, id).map(Route::Upload)
            }
            ["reports"] => Ok(Route::Reports),
            ["reports", id] => parse_id(trimmed, id).map(Route::ReportDetail),
            _ => Err(RouteError::Unknown(trimmed.to_string())),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Projects => "/projects".to_string(),
            Route::ProjectCreate => "/projects/create".to_string(),
            Route::ProjectDetail(id) => format!("/projects/{id}"),
            Route::ProjectEdit(id) => format!("/projects/{id}/edit"),
            Route::Upload(id) => format!("/upload?projectId={id}"),
            Route::Analyze(id) => format!("/projects/{id}/analyze"),
            Route::Reports => "/reports".to_string(),
            Route::ReportDetail(id) => format!("/reports/{id}"),
        }
    }
}

fn parse_id<T>(path: &str, raw: &str) -> Result<T, RouteError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse().map_err(|e: T::Err| RouteError::InvalidId {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_static_paths() {
        assert_eq!(Route::parse("/"), Ok(Route::Home));
        assert_eq!(Route::parse(""), Ok(Route::Home));
        assert_eq!(Route::parse("/projects"), Ok(Route::Projects));
        assert_eq!(Route::parse("/projects/"), Ok(Route::Projects));
        assert_eq!(Route::parse("/projects/create"), Ok(Route::ProjectCreate));
        assert_eq!(Route::parse("/reports"), Ok(Route::Reports));
    }

    #[test]
    fn test_parse_identifier_paths() {
        let id = ProjectId::new(12);
        assert_eq!(Route::parse("/projects/12"), Ok(Route::ProjectDetail(id)));
        assert_eq!(Route::parse("/projects/12/edit"), Ok(Route::ProjectEdit(id)));
        assert_eq!(Route::parse("/projects/12/analyze"), Ok(Route::Analyze(id)));
        assert_eq!(
            Route::parse("/reports/3"),
            Ok(Route::ReportDetail(ReportId::new(3)))
        );
    }

    #[test]
    fn test_upload_takes_project_from_query() {
        assert_eq!(
            Route::parse("/upload?projectId=5"),
            Ok(Route::Upload(ProjectId::new(5)))
        );
        assert_eq!(
            Route::parse("/upload?tab=x&projectId=6"),
            Ok(Route::Upload(ProjectId::new(6)))
        );
        assert!(matches!(
            Route::parse("/upload"),
            Err(RouteError::MissingProject(_))
        ));
    }

    #[test]
    fn test_legacy_create_paths_redirect() {
        assert_eq!(Route::parse("/projects/new"), Ok(Route::ProjectCreate));
        assert_eq!(Route::parse("/new-project"), Ok(Route::ProjectCreate));
    }

    #[test]
    fn test_invalid_ids_and_unknown_paths() {
        assert!(matches!(
            Route::parse("/projects/abc"),
            Err(RouteError::InvalidId { .. })
        ));
        assert!(matches!(
            Route::parse("/settings"),
            Err(RouteError::Unknown(_))
        ));
    }

    #[test]
    fn test_path_parses_back_to_route() {
        let routes = [
            Route::Home,
            Route::Projects,
            Route::ProjectCreate,
            Route::ProjectDetail(ProjectId::new(1)),
            Route::ProjectEdit(ProjectId::new(2)),
            Route::Upload(ProjectId::new(3)),
            Route::Analyze(ProjectId::new(4)),
            Route::Reports,
            Route::ReportDetail(ReportId::new(5)),
        ];
        for route in routes {
            assert_eq!(Route::parse(&route.path()), Ok(route));
        }
    }
}
