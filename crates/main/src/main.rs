//! PeriConecta server entry point.

use std::sync::Arc;

use application::{
    DemoSeeder, DemoSeederDependencies, NotifyPolicy, PostService, PostServiceDependencies,
    SeedOutcome, SystemClock, UserService, UserServiceDependencies,
};
use config::AppConfig;
use infrastructure::Infrastructure;
use tracing_subscriber::EnvFilter;
use web_api::{router, AppState, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    let config = AppConfig::load()?;
    config.validate()?;
    if config.uses_development_secret() {
        tracing::warn!("JWT secret is the development default, set JWT_SECRET in production");
    }

    let infra = Infrastructure::connect(&config).await?;
    let clock = Arc::new(SystemClock);

    if config.seed.enabled {
        let seeder = DemoSeeder::new(DemoSeederDependencies {
            user_repository: infra.user_repository(),
            post_repository: infra.post_repository(),
            password_hasher: infra.password_hasher_trait(),
            clock: clock.clone(),
        });
        match seeder.seed().await? {
            SeedOutcome::Seeded { users, posts } => {
                tracing::info!(users, posts, "demo data seeded")
            }
            SeedOutcome::Skipped => {}
        }
    }

    let user_service = Arc::new(UserService::new(UserServiceDependencies {
        user_repository: infra.user_repository(),
        password_hasher: infra.password_hasher_trait(),
        clock: clock.clone(),
    }));
    let post_service = Arc::new(PostService::new(PostServiceDependencies {
        post_repository: infra.post_repository(),
        like_repository: infra.like_repository(),
        user_repository: infra.user_repository(),
        clock,
        broadcaster: infra.broadcaster.clone(),
        notify_policy: NotifyPolicy::from_strict(config.broadcast.strict),
    }));
    let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));

    let state = AppState::new(
        user_service,
        post_service,
        infra.broadcaster.clone(),
        jwt_service,
    );

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(%address, "PeriConecta listening");
    axum::serve(listener, router(state)).await?;

    Ok(())
}
