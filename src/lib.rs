pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;

use std::sync::Arc;

use actix_web::{error, middleware::Logger, web, App, HttpServer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::order_service::OrderService;
use config::{Config, StoreKind};
use infrastructure::kv::{KeyValueStore, KvError};
use infrastructure::memory::MemoryStore;
use infrastructure::order_repo::KvOrderRepository;
use infrastructure::redis_store::RedisStore;

pub use db::{create_pool, RedisPool};

pub type AppService = OrderService<KvOrderRepository>;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::orders::create_order,
        handlers::orders::list_orders,
        handlers::orders::get_order,
        handlers::orders::update_order,
        handlers::orders::delete_order,
    ),
    components(schemas(
        domain::order::Order,
        domain::order::LineItem,
        domain::order::OrderStatus,
        handlers::orders::CreateOrderRequest,
        handlers::orders::UpdateOrderRequest,
        handlers::orders::ListOrdersResponse,
    )),
    tags((name = "orders", description = "Order management"))
)]
pub struct ApiDoc;

/// Opens the backend selected by `config`.
///
/// For Redis this fills the connection pool and pings the server, so an
/// unreachable store fails here rather than on the first request.
pub fn build_store(config: &Config) -> Result<Arc<dyn KeyValueStore>, KvError> {
    match config.store {
        StoreKind::Redis => {
            let pool = create_pool(&config.redis_url, config.redis_pool_size, config.redis_timeout)?;
            let store = RedisStore::new(pool);
            store.ping()?;
            Ok(Arc::new(store))
        }
        StoreKind::Memory => {
            log::warn!("Using the in-memory order store; orders are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    store: Arc<dyn KeyValueStore>,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let service = web::Data::new(OrderService::new(KvOrderRepository::new(store)));

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .app_data(
                web::PathConfig::default().error_handler(|err, _| error::ErrorBadRequest(err)),
            )
            .wrap(Logger::default())
            .route("/", web::get().to(handlers::health::health))
            .service(
                web::scope("/orders")
                    .route("", web::post().to(handlers::orders::create_order))
                    .route("", web::get().to(handlers::orders::list_orders))
                    .route("/{id}", web::get().to(handlers::orders::get_order))
                    .route("/{id}", web::put().to(handlers::orders::update_order))
                    .route("/{id}", web::delete().to(handlers::orders::delete_order)),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .shutdown_timeout(10)
    .bind((host.to_string(), port))?
    .run())
}
