use std::env;

use config::Config;
use dotenvy::dotenv;

use shipping_tickets::models::config::ServerConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from `.env` in local development.
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let settings = Config::builder()
        .add_source(config::File::with_name("config/default"))
        .add_source(config::File::with_name(&format!("config/{app_env}")).required(false))
        .add_source(config::Environment::with_prefix("APP"))
        .build()
        .map_err(|e| std::io::Error::other(format!("Failed to load configuration: {e}")))?;

    let server_config = settings
        .try_deserialize::<ServerConfig>()
        .map_err(|e| std::io::Error::other(format!("Invalid configuration: {e}")))?;

    log::info!("Starting shipping-tickets ({app_env})");
    shipping_tickets::run(server_config).await
}
