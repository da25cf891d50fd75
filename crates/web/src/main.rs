use database::{DatabaseConnectionInfo, PgDatabase};
use web::{config::ServerConfig, start_web_server, WebState};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = ServerConfig::from_env().expect("invalid server configuration");

    // database
    let database_connection_info = DatabaseConnectionInfo::from_env()
        .expect("expected database connection info in env.");
    let database = PgDatabase::connect(database_connection_info)
        .await
        .expect("could not connect to database.");

    // web server
    let state = WebState::new(database, &config);
    if let Err(why) = start_web_server(state, &config).await {
        log::error!("Web server stopped: {}", why);
    }
}
