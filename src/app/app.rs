use axum::{http::HeaderValue, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use crate::app::AppState;
use crate::config::admin_user_conf::AdminUserConfig;
use crate::config::{AppConfig, JwtConfig, MongoConfig, UploadConfig};
use crate::handler::system_handler::fallback_handler;
use crate::middlewares::auth_middleware::AuthState;
use crate::model::admin::Admin;
use crate::repository::admin_repo::{AdminRepository, AdminRepositoryImpl};
use crate::repository::project_repo::MongoProjectRepository;
use crate::repository::user_repo::{UserRepository, UserRepositoryImpl};
use crate::router::admin_router::admin_router;
use crate::router::project_router::project_router;
use crate::router::system_router::system_router;
use crate::router::user_router::user_router;
use crate::service::admin_service::AdminServiceImpl;
use crate::service::project_service::ProjectServiceImpl;
use crate::service::user_service::{NewUser, UserService, UserServiceImpl};
use crate::util::jwt::JwtTokenUtilsImpl;
use crate::util::storage::LocalStorageService;

pub struct App {
    config: AppConfig,
    router: Router,
    user_service: Arc<UserServiceImpl>,
    admin_repo: Arc<AdminRepositoryImpl>,
}

impl App {
    pub async fn new() -> Self {
        let config = AppConfig::from_env();
        let jwt_config = JwtConfig::from_env().expect("JWT config error");
        let mongo_config = MongoConfig::from_env().expect("Mongo config error");
        let upload_config = UploadConfig::from_env().expect("Upload config error");

        // A failed initial connection aborts startup; there is no
        // reconnect loop.
        let db = mongo_config
            .connect()
            .await
            .expect("Failed to connect to MongoDB");

        let user_repo = Arc::new(
            UserRepositoryImpl::new(&db)
                .await
                .expect("User repo error"),
        );
        let admin_repo = Arc::new(
            AdminRepositoryImpl::new(&db)
                .await
                .expect("Admin repo error"),
        );
        let project_repo = MongoProjectRepository::new(&db)
            .await
            .expect("Project repo error");

        let storage = Arc::new(
            LocalStorageService::new(upload_config.clone()).expect("Storage init error"),
        );
        let jwt_utils = Arc::new(JwtTokenUtilsImpl::new(jwt_config));

        let user_service = Arc::new(UserServiceImpl::new(user_repo.clone(), jwt_utils.clone()));
        let project_service = Arc::new(ProjectServiceImpl::new(
            project_repo,
            user_repo.clone(),
            storage,
        ));
        let admin_service = Arc::new(AdminServiceImpl::new(admin_repo.clone()));

        let auth_state = Arc::new(AuthState {
            jwt_utils: jwt_utils.clone(),
        });

        let state = AppState {
            project_service,
            user_service: user_service.clone(),
            admin_service,
            config: config.clone(),
        };

        let router = Self::create_router(state, auth_state, &upload_config);

        let app = App {
            config,
            router,
            user_service,
            admin_repo,
        };
        app.ensure_first_admin().await;
        app
    }

    fn create_router(
        state: AppState,
        auth_state: Arc<AuthState>,
        upload_config: &UploadConfig,
    ) -> Router {
        let cors = if state.config.frontend_origin == "*" {
            CorsLayer::new()
                .allow_methods(Any)
                .allow_origin(Any)
                .allow_headers(Any)
        } else {
            let origin = state
                .config
                .frontend_origin
                .parse::<HeaderValue>()
                .expect("Invalid FRONTEND_ORIGIN");
            CorsLayer::new()
                .allow_methods(Any)
                .allow_origin(origin)
                .allow_headers(Any)
        };

        Router::new()
            .merge(project_router(state.clone(), auth_state.clone()))
            .merge(user_router(state.clone(), auth_state.clone()))
            .merge(admin_router(state.clone(), auth_state))
            .merge(system_router(state))
            .nest_service(
                upload_config.public_path.as_str(),
                ServeDir::new(&upload_config.upload_dir),
            )
            .fallback(fallback_handler)
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    pub async fn start(self) {
        let addr = SocketAddr::new(
            self.config.host.parse().expect("Invalid host"),
            self.config.port,
        );
        info!("🚀 Server running at http://{}", addr);
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .expect("Failed to bind address");
        axum::serve(listener, self.router)
            .await
            .expect("Failed to start server");
    }

    /// Create the bootstrap admin account (user + admin record) when the
    /// ADMIN_* environment variables are present and the account does not
    /// exist yet. Failures are logged, never fatal.
    async fn ensure_first_admin(&self) {
        let admin_conf = match AdminUserConfig::from_env() {
            Ok(c) => c,
            Err(e) => {
                warn!("Admin user config not loaded: {e}");
                return;
            }
        };

        let user_repo = self.user_service.user_repo.clone();
        match user_repo.find_by_email(&admin_conf.email.to_lowercase()).await {
            Ok(Some(_)) => {
                info!("Admin user already exists, skipping creation.");
                return;
            }
            Ok(None) => { /* continue to create */ }
            Err(e) => {
                error!("Failed to check for existing admin user: {e}");
                return;
            }
        }

        let new_user = NewUser {
            username: admin_conf.username.clone(),
            email: admin_conf.email.clone(),
            is_admin: true,
        };
        let created = match self
            .user_service
            .register(new_user, admin_conf.password.clone())
            .await
        {
            Ok(res) => res,
            Err(e) => {
                error!("Failed to create admin user: {e}");
                return;
            }
        };

        let user_id = match bson::oid::ObjectId::parse_str(&created.user.id) {
            Ok(id) => id,
            Err(e) => {
                error!("Created admin user has an invalid id: {e}");
                return;
            }
        };
        match self.admin_repo.insert(Admin::new(user_id)).await {
            Ok(_) => info!("First admin user created."),
            Err(e) => error!("Failed to create admin record: {e}"),
        }
    }
}
