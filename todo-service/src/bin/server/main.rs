use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use auth::PasswordHasher;
use axum::Router;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgPoolOptions;
use todo_service::config::Config;
use todo_service::config::StorageBackend;
use todo_service::domain::session::service::SessionService;
use todo_service::domain::todo::ports::TodoRepository;
use todo_service::domain::todo::service::TodoService;
use todo_service::domain::user::ports::UserRepository;
use todo_service::domain::user::service::UserService;
use todo_service::inbound::http::create_router;
use todo_service::outbound::repositories::InMemoryTodoRepository;
use todo_service::outbound::repositories::InMemoryUserRepository;
use todo_service::outbound::repositories::PostgresTodoRepository;
use todo_service::outbound::repositories::PostgresUserRepository;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "todo-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        backend = ?config.database.backend,
        http_port = config.server.http_port,
        token_ttl_hours = config.jwt.expiration_hours,
        max_sessions_per_user = ?config.sessions.max_per_user,
        "Configuration loaded"
    );

    let password_hasher = PasswordHasher::with_cost(
        config.password.memory_kib,
        config.password.iterations,
        config.password.parallelism,
    )?;
    let authenticator = Arc::new(Authenticator::new(
        config.jwt.secret.as_bytes(),
        password_hasher,
    ));

    let http_application = match config.database.backend {
        StorageBackend::Postgres => {
            let database_url = config.database.url.as_deref().ok_or_else(|| {
                anyhow::anyhow!("database.url is required for the postgres backend")
            })?;

            let connect_options = database_url.parse::<PgConnectOptions>()?.options([(
                "statement_timeout",
                config.database.statement_timeout_ms.to_string(),
            )]);

            let pg_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
                .connect_with(connect_options)
                .await?;
            tracing::info!(
                max_connections = config.database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            build_application(
                Arc::new(PostgresUserRepository::new(pg_pool.clone())),
                Arc::new(PostgresTodoRepository::new(pg_pool)),
                authenticator,
                &config,
            )
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");

            build_application(
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryTodoRepository::new()),
                authenticator,
                &config,
            )
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, http_application)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server exited successfully");

    Ok(())
}

fn build_application<UR, TR>(
    user_repository: Arc<UR>,
    todo_repository: Arc<TR>,
    authenticator: Arc<Authenticator>,
    config: &Config,
) -> Router
where
    UR: UserRepository,
    TR: TodoRepository,
{
    let session_service = Arc::new(SessionService::new(
        Arc::clone(&user_repository),
        Arc::clone(&authenticator),
        config.jwt.expiration_hours,
        config.sessions.max_per_user,
    ));
    let user_service = Arc::new(UserService::new(
        user_repository,
        Arc::clone(&session_service),
        authenticator,
    ));
    let todo_service = Arc::new(TodoService::new(todo_repository));

    create_router(user_service, todo_service, session_service)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
