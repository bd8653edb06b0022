use std::net::SocketAddr;

use engine::Money;
use migration::{Migrator, MigratorTrait};

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "clinic={level},server={level},engine={level},tower_http={level}",
            level = settings.app.level
        ))
        .init();

    let http = settings.server;
    let fee: Money = http.appointment_fee.parse()?;
    let addr: SocketAddr = format!("{}:{}", http.bind, http.port).parse()?;

    tracing::info!("Opening database {}", http.database_url);
    let db = sea_orm::Database::connect(&http.database_url).await?;
    Migrator::up(&db, None).await?;

    let engine = engine::Engine::builder()
        .database(db)
        .appointment_fee(fee)
        .build()
        .await?;

    server::run(engine, http.upload_dir, addr).await;
    Ok(())
}
