use std::io;
use std::sync::Arc;

use actix_web::{middleware::Logger, App, HttpServer};
use tasklist::{
    app::{self, AppState},
    auth::{BcryptHasher, CsrfGuard},
    config::Config,
    store::{MemoryStore, PgStore, TaskStore, UserStore},
};

fn to_io_error(err: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err.to_string())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(to_io_error)?;

    let (users, tasks): (Arc<dyn UserStore>, Arc<dyn TaskStore>) = match &config.database_url {
        Some(database_url) => {
            let store = PgStore::connect(database_url).await.map_err(to_io_error)?;
            store.migrate().await.map_err(to_io_error)?;
            log::info!("Using Postgres store");
            let store = Arc::new(store);
            (store.clone() as Arc<dyn UserStore>, store as Arc<dyn TaskStore>)
        }
        None => {
            log::warn!("DATABASE_URL not set, data will live in memory only");
            let store = Arc::new(MemoryStore::new());
            (store.clone() as Arc<dyn UserStore>, store as Arc<dyn TaskStore>)
        }
    };

    let hasher = Arc::new(BcryptHasher::new(config.bcrypt_cost));
    let state = AppState::new(config.clone(), users, tasks, hasher);

    log::info!("Starting tasklist server at {}", config.server_url());
    let bind = (config.server_host.clone(), config.server_port);
    HttpServer::new(move || {
        App::new()
            .wrap(CsrfGuard::from_config(state.config()))
            .wrap(app::cors(state.config()))
            .wrap(Logger::default())
            .configure(|cfg| state.configure(cfg))
    })
    .bind(bind)?
    .run()
    .await
}
