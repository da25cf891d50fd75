use std::{env, error::Error};

pub mod data_model;
pub mod queries;

const DEFAULT_PORT: u16 = 5432;

/// Where the campus store lives. Either a complete `DATABASE_URL` or its
/// parts, `DATABASE_USER`, `DATABASE_PASSWORD`, `DATABASE_HOST`,
/// `DATABASE_PORT` (default 5432) and `DATABASE_NAME`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseConnectionInfo {
    Url(String),
    Parts {
        username: String,
        password: String,
        hostname: String,
        port: u16,
        database: String,
    },
}

impl DatabaseConnectionInfo {
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL").filter(|url| !url.is_empty()) {
            return Some(Self::Url(url));
        }
        let port = match lookup("DATABASE_PORT") {
            Some(port) => port.parse().ok()?,
            None => DEFAULT_PORT,
        };
        Some(Self::Parts {
            username: lookup("DATABASE_USER")?,
            password: lookup("DATABASE_PASSWORD")?,
            hostname: lookup("DATABASE_HOST")?,
            port,
            database: lookup("DATABASE_NAME")?,
        })
    }

    fn postgres_url(self) -> String {
        match self {
            Self::Url(url) => url,
            Self::Parts {
                username,
                password,
                hostname,
                port,
                database,
            } => format!(
                "postgres://{}:{}@{}:{}/{}",
                username, password, hostname, port, database
            ),
        }
    }
}

/// The Postgres backed campus store. Every table is reached through the
/// `Repo` implementations in [`data_model`].
#[derive(Clone)]
pub struct PgDatabase {
    pool: sqlx::PgPool,
}

impl PgDatabase {
    pub async fn connect(
        database_connection_info: DatabaseConnectionInfo,
    ) -> Result<Self, Box<dyn Error>> {
        let url = database_connection_info.postgres_url();
        let pool = sqlx::postgres::PgPool::connect(&url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        log::info!("Connected to the campus database, migrations are up to date");

        Ok(Self { pool })
    }
}
