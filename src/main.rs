use dotenvy::dotenv;
use order_service::config::Config;
use order_service::{build_server, build_store};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().expect("Invalid configuration");
    let store = build_store(&config).expect("Failed to connect to the order store");

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    build_server(store, &config.host, config.port)?.await
}
