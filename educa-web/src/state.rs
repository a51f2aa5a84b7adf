//! Application state shared by every handler

use crate::{
    auth::{TokenCodec, UserService, UserStore},
    middleware::InterceptorPipeline,
    WebError, WebResult,
};
use chrono::Duration;
use educa_applications::{AnnouncementManager, CourseRepository, GalleryManager, GradeManager};
use educa_core::EducaConfig;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    /// Configuration
    pub config: Arc<EducaConfig>,
    /// Token issuing and verification
    pub token_codec: Arc<TokenCodec>,
    /// Login
    pub user_service: Arc<UserService>,
    /// Interceptors run in front of protected routes
    pub pipeline: Arc<InterceptorPipeline>,
    pub courses: Arc<CourseRepository>,
    pub grades: GradeManager,
    pub gallery: GalleryManager,
    pub announcements: AnnouncementManager,
}

impl AppState {
    /// Build state from configuration, opening the configured storage
    pub async fn new(config: EducaConfig) -> WebResult<Self> {
        let courses = match config.storage.database_url.as_deref() {
            #[cfg(feature = "sqlite")]
            Some(url) => {
                info!("Using SQLite course storage: {}", url);
                CourseRepository::with_sqlite(url).await?
            }
            #[cfg(not(feature = "sqlite"))]
            Some(_) => {
                return Err(WebError::Config(
                    "database_url is set but the sqlite feature is disabled".to_string(),
                ))
            }
            None => {
                info!("Using in-memory course storage");
                CourseRepository::in_memory()
            }
        };

        Self::with_repository(config, Arc::new(courses))
    }

    /// Build state around an existing repository
    pub fn with_repository(config: EducaConfig, courses: Arc<CourseRepository>) -> WebResult<Self> {
        let ttl = Duration::try_hours(config.auth.token_ttl_hours).ok_or_else(|| {
            WebError::Config(format!(
                "token lifetime of {} hours is out of range",
                config.auth.token_ttl_hours
            ))
        })?;
        let token_codec = Arc::new(TokenCodec::new(&config.auth.jwt_secret, ttl)?);

        let store = UserStore::from_seed(&config.auth.seed_users)?;
        let user_service = Arc::new(UserService::new(store, Arc::clone(&token_codec))?);
        let pipeline = Arc::new(InterceptorPipeline::protected(Arc::clone(&token_codec)));

        Ok(Self {
            config: Arc::new(config),
            token_codec,
            user_service,
            pipeline,
            grades: GradeManager::new(Arc::clone(&courses)),
            gallery: GalleryManager::new(Arc::clone(&courses)),
            announcements: AnnouncementManager::new(Arc::clone(&courses)),
            courses,
        })
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("address", &self.config.address())
            .field("interceptors", &self.pipeline.names())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn default_config_builds_in_memory_state() {
        let state = AppState::new(EducaConfig::default()).await.unwrap();
        assert_eq!(state.user_service.store().len(), 1);
        assert!(state.courses.list().await.unwrap().is_empty());
    }

    #[test]
    fn huge_token_lifetime_is_an_error_not_a_panic() {
        let mut config = EducaConfig::default();
        config.auth.token_ttl_hours = i64::MAX / 2;

        let result = AppState::with_repository(config, Arc::new(CourseRepository::in_memory()));
        assert!(matches!(result, Err(WebError::Config(_))));
    }

    #[tokio::test]
    async fn oversized_ttl_from_config_is_rejected_at_startup() {
        let mut config = EducaConfig::default();
        config.auth.token_ttl_hours = i64::MAX / 2;
        assert!(crate::EducaServer::new(config).await.is_err());
    }

    #[tokio::test]
    async fn empty_secret_is_a_startup_error() {
        let mut config = EducaConfig::default();
        config.auth.jwt_secret.clear();

        assert!(matches!(
            AppState::new(config).await,
            Err(WebError::Auth(_))
        ));
    }
}
