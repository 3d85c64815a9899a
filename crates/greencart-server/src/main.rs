use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;

use greencart::ImageStorage;
use greencart_server::{
    adapters::{
        CloudinaryStorage, MockPaymentGateway, PgCartRepository, PgOrderRepository,
        PgProductRepository, PgReviewRepository, PgUserRepository,
    },
    build_router,
    config::AppConfig,
    AppState, Repositories,
};

#[shuttle_runtime::main]
async fn main(
    #[shuttle_shared_db::Postgres] pool: PgPool,
    #[shuttle_runtime::Secrets] secrets: shuttle_runtime::SecretStore,
) -> shuttle_axum::ShuttleAxum {
    tracing::info!("🌱 GreenCart API initializing...");

    let config = AppConfig::from_lookup(|key| secrets.get(key)).context("Invalid configuration")?;

    // Run migrations
    sqlx::migrate!()
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("✅ Database migrations completed");

    // Image hosting is optional; product uploads answer 503 without it
    let images: Option<Arc<dyn ImageStorage>> = match config.cloudinary.clone() {
        Some(cloudinary) => match CloudinaryStorage::new(cloudinary) {
            Ok(storage) => {
                tracing::info!("🖼️  Cloudinary image storage enabled");
                Some(Arc::new(storage))
            }
            Err(e) => {
                tracing::warn!("⚠️  Failed to set up Cloudinary: {}", e);
                None
            }
        },
        None => {
            tracing::warn!("⚠️  No CLOUDINARY_* secrets set - image uploads disabled");
            None
        }
    };

    let repos = Repositories {
        users: Arc::new(PgUserRepository::new(pool.clone())),
        products: Arc::new(PgProductRepository::new(pool.clone())),
        carts: Arc::new(PgCartRepository::new(pool.clone())),
        orders: Arc::new(PgOrderRepository::new(pool.clone())),
        reviews: Arc::new(PgReviewRepository::new(pool)),
    };

    tracing::info!(
        "🔐 JWT lifetime {}s, CORS origin {}",
        config.jwt_expire.as_secs(),
        config.frontend_url
    );

    let state = AppState::new(config, repos, images, Arc::new(MockPaymentGateway));
    let router = build_router(state);

    tracing::info!("📚 Swagger UI: /swagger-ui");
    tracing::info!("✅ GreenCart API ready");

    Ok(router.into())
}
