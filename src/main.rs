use hospital_cms::{
    AppState, NotificationDispatcher, SupabaseIdentity,
    config::{AppConfig, Env},
    create_router,
    identity::IdentityState,
    repository::{PostgresRepository, RepositoryState},
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Loads configuration, sets up logging, connects to Postgres (optionally migrating),
/// wires the identity and notification services and serves the router.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    // Panics on missing production secrets.
    let config = AppConfig::load();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "hospital_cms=debug,tower_http=info".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.db_url)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to connect to Postgres. Check DATABASE_URL."))?;

    if config.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let repo = Arc::new(PostgresRepository::new(pool)) as RepositoryState;

    let identity = Arc::new(SupabaseIdentity::new(
        config.supabase_url.clone(),
        config.supabase_service_key.clone(),
    )) as IdentityState;

    let dispatcher = NotificationDispatcher::from_config(&config);
    if dispatcher.email.is_none() {
        tracing::warn!("SMTP_HOST not set: appointment emails are disabled");
    }
    if dispatcher.messaging.is_none() {
        tracing::info!("Messaging channel not configured");
    }

    let bind_addr = config.bind_addr.clone();
    let app_state = AppState {
        repo,
        identity,
        notifier: Arc::new(dispatcher),
        config,
    };

    let app = create_router(app_state);

    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at /swagger-ui");

    axum::serve(listener, app).await?;
    Ok(())
}
