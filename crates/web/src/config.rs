use std::{env, net::SocketAddr, path::PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is not valid: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Web server configuration, read from the environment (and a `.env` file,
/// if present).
///
/// | Env Var                | Default              |
/// |------------------------|----------------------|
/// | `SERVER_ADDRESS`       | `0.0.0.0:8080`       |
/// | `ADMIN_PASSWORD`       | required             |
/// | `STATIC_DIR`           | `./resources/www`    |
/// | `UPLOAD_DIR`           | `./resources/uploads`|
/// | `PUBLIC_UPLOAD_PREFIX` | `/uploads`           |
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub address: SocketAddr,
    pub admin_password: String,
    pub static_dir: PathBuf,
    pub upload_dir: PathBuf,
    /// URL path under which `upload_dir` is served.
    pub public_upload_prefix: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let address = var_or("SERVER_ADDRESS", "0.0.0.0:8080");
        let address = address.parse().map_err(|_| ConfigError::Invalid {
            name: "SERVER_ADDRESS",
            value: address,
        })?;

        let admin_password = env::var("ADMIN_PASSWORD")
            .ok()
            .filter(|password| !password.is_empty())
            .ok_or(ConfigError::Missing("ADMIN_PASSWORD"))?;

        let public_upload_prefix = var_or("PUBLIC_UPLOAD_PREFIX", "/uploads");
        if !public_upload_prefix.starts_with('/') || public_upload_prefix.len() < 2 {
            return Err(ConfigError::Invalid {
                name: "PUBLIC_UPLOAD_PREFIX",
                value: public_upload_prefix,
            });
        }

        Ok(Self {
            address,
            admin_password,
            static_dir: var_or("STATIC_DIR", "./resources/www").into(),
            upload_dir: var_or("UPLOAD_DIR", "./resources/uploads").into(),
            public_upload_prefix: public_upload_prefix.trim_end_matches('/').to_owned(),
        })
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_owned())
}
