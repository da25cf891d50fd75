pub use crate::common::RouteResult;

use std::sync::Arc;

use axum::Router;
use config::ServerConfig;
use navigation::{admin::AdminGate, database::Database, storage::ImageStore, Client};
use session::Sessions;
use storage::FileImageStore;
use tokio::net::TcpListener;
use tower_cookies::CookieManagerLayer;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

pub mod api;
pub mod common;
pub mod config;
pub mod hateoas;
pub mod middleware;
pub mod session;
pub mod storage;

#[derive(Clone)]
pub struct WebState<D>
where
    D: Database,
{
    pub client: Client<D>,
    pub gate: AdminGate,
    pub sessions: Sessions,
    pub images: Arc<dyn ImageStore>,
}

impl<D> WebState<D>
where
    D: Database,
{
    pub fn new(database: D, config: &ServerConfig) -> Self {
        Self {
            client: Client::new(database),
            gate: AdminGate::new(config.admin_password.clone()),
            sessions: Sessions::default(),
            images: Arc::new(FileImageStore::new(
                config.upload_dir.clone(),
                config.public_upload_prefix.clone(),
            )),
        }
    }
}

/// The complete application: the JSON api below `/api`, uploaded images
/// and the static frontend for everything else.
pub fn app<D>(state: WebState<D>, config: &ServerConfig) -> Router
where
    D: Database,
{
    Router::new()
        .nest_service("/api", api::routes(state))
        .nest_service(
            &config.public_upload_prefix,
            ServeDir::new(&config.upload_dir),
        )
        .fallback_service(static_content(config))
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
}

pub async fn start_web_server<D>(state: WebState<D>, config: &ServerConfig) -> std::io::Result<()>
where
    D: Database,
{
    let routes = app(state, config);

    let listener = TcpListener::bind(config.address).await?;
    log::info!("Listening on {}", config.address);
    axum::serve(listener, routes.into_make_service()).await?;

    Ok(())
}

// Paths the frontend routes itself, like `/navigate/{slug}`, fall through
// to its index page.
fn static_content(config: &ServerConfig) -> ServeDir<ServeFile> {
    ServeDir::new(&config.static_dir)
        .fallback(ServeFile::new(config.static_dir.join("index.html")))
}
