use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use rustls::crypto::ring::default_provider;
use sqlx::postgres::PgPoolOptions;

use lumen_core::{AppState, Settings};
use lumen_database::{CacheService, Database, MIGRATOR, MemoryStore, impls::sessions};
use lumen_llm::LlmService;
use lumen_utils::env::{env_bool, env_string, env_string_or, env_u64};
use lumen_utils::time::now_unix_secs;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(filter_fn(|metadata| {
        let target = metadata.target();

        let within_info_level = *metadata.level() <= tracing::Level::INFO;
        if !within_info_level {
            return false;
        }

        !(target.starts_with("sqlx::query") || target.starts_with("hyper_util"))
    }));

    tracing_subscriber::registry().with(fmt_layer).init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    dotenvy::dotenv().ok();

    let settings = Settings::from_env();
    let bind_addr = settings.bind_addr.clone();

    let state = match env_string("DATABASE_URL") {
        Some(database_url) => {
            let db = connect_database(&database_url).await?;
            AppState::new(db, settings)
        }
        None => {
            warn!("DATABASE_URL is not set; using the in-memory store. State is lost on restart.");
            AppState::new(MemoryStore::new(), settings)
        }
    };

    let state = match LlmService::from_env_optional()? {
        Some(llm) => {
            info!(provider = ?llm.provider(), model = llm.model(), "LLM integration enabled.");
            state.with_llm(Arc::new(llm))
        }
        None => {
            info!("LLM integration disabled (LLM_ENABLED=false or missing GROQ_API_KEY).");
            state
        }
    };

    for route in lumen_routes::ROUTES {
        info!(
            method = route.method,
            path = route.path,
            requires_session = route.requires_session,
            "{}",
            route.desc
        );
    }

    let listener = TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "Lumen is listening.");

    axum::serve(listener, lumen_routes::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Lumen has shut down.");
    Ok(())
}

async fn connect_database(database_url: &str) -> anyhow::Result<Database> {
    let max_connections = u32::try_from(env_u64(
        "DATABASE_MAX_CONNECTIONS",
        u64::from(DEFAULT_MAX_CONNECTIONS),
    ))
    .unwrap_or(DEFAULT_MAX_CONNECTIONS);

    let db_pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    info!(max_connections, "PostgreSQL connection established.");

    let cache = build_cache().await;
    let db = Database::with_cache(db_pool, cache);

    if env_bool("AUTO_RUN_MIGRATIONS", true) {
        MIGRATOR.run(db.pool()).await?;
        info!("Database migrations applied.");
    } else {
        info!("Auto migrations disabled (set AUTO_RUN_MIGRATIONS=true to run at startup).");
    }

    match sessions::purge_expired_sessions(&db, now_unix_secs()).await {
        Ok(purged) => info!(purged, "Expired sessions purged."),
        Err(err) => warn!(?err, "Failed to purge expired sessions."),
    }

    Ok(db)
}

async fn build_cache() -> CacheService {
    let redis_key_prefix = env_string_or("REDIS_KEY_PREFIX", "lumen:prod");

    if !env_bool("REDIS_ENABLED", false) {
        info!("Redis cache disabled (set REDIS_ENABLED=true to enable).");
        return CacheService::disabled(redis_key_prefix);
    }

    let cache = match env_string("REDIS_URL") {
        Some(redis_url) => match CacheService::redis(&redis_url, redis_key_prefix.clone()) {
            Ok(cache) => {
                info!(key_prefix = %redis_key_prefix, "Redis cache enabled.");
                cache
            }
            Err(err) => {
                warn!(?err, key_prefix = %redis_key_prefix, "Failed to initialize Redis cache; continuing with DB-only mode.");
                CacheService::disabled(redis_key_prefix)
            }
        },
        None => {
            warn!(key_prefix = %redis_key_prefix, "REDIS_ENABLED=true but REDIS_URL is missing; continuing with DB-only mode.");
            CacheService::disabled(redis_key_prefix)
        }
    };

    if cache.is_redis_enabled() {
        if let Err(err) = cache.ping().await {
            warn!(
                ?err,
                "Redis cache ping failed; session lookups will fall back to the database."
            );
        } else {
            info!("Redis cache health check passed.");
        }
    }

    cache
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(?err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received.");
}
