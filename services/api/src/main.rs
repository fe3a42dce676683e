use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use common::database::{DatabaseConfig, init_pool};

use api::{
    jwt::{JwtConfig, JwtService},
    mailer::Mailer,
    repositories::{
        CategoryRepository, CommentRepository, GenreRepository, ReviewRepository, TitleRepository,
        UserRepository,
    },
    routes,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting Revue API service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    // Apply pending migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| common::error::DatabaseError::Migration(e.to_string()))?;

    info!("Revue API service initialized successfully");

    // Initialize JWT service and mailer
    let jwt_config = JwtConfig::from_env()?;
    let jwt_service = JwtService::new(jwt_config);
    let mailer = Mailer::from_env();

    // Initialize repositories
    let user_repository = UserRepository::new(pool.clone());
    let category_repository = CategoryRepository::new(pool.clone());
    let genre_repository = GenreRepository::new(pool.clone());
    let title_repository = TitleRepository::new(pool.clone());
    let review_repository = ReviewRepository::new(pool.clone());
    let comment_repository = CommentRepository::new(pool.clone());

    let app_state = AppState {
        db_pool: pool,
        user_repository,
        category_repository,
        genre_repository,
        title_repository,
        review_repository,
        comment_repository,
        jwt_service,
        mailer,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    info!("Revue API service listening on 0.0.0.0:3000");

    axum::serve(listener, app).await?;

    Ok(())
}
