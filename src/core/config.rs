//! Configuration loaded from environment variables (.env supported)

use dotenv::dotenv;
use std::env;
use tracing::info;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub max_connections: u32,
    /// Upper bound on the number of ids per `IN` clause of the collection
    /// batch loader. Must stay within the store's parameter-list budget.
    pub batch_fetch_size: usize,
}

impl Config {
    /// Loads the configuration from environment variables, calling
    /// dotenv() first.
    pub fn from_env() -> Result<Self, String> {
        dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:shop.db".to_string());

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| "Invalid SERVER_PORT: must be a number between 0-65535".to_string())?;

        let max_connections = env::var("MAX_DB_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()
            .map_err(|_| "Invalid MAX_DB_CONNECTIONS: must be a positive number".to_string())?;

        let batch_fetch_size = env::var("BATCH_FETCH_SIZE")
            .unwrap_or_else(|_| "100".to_string())
            .parse::<usize>()
            .map_err(|_| "Invalid BATCH_FETCH_SIZE: must be a positive number".to_string())?;

        if !(1..=1000).contains(&batch_fetch_size) {
            return Err("Invalid BATCH_FETCH_SIZE: must be between 1 and 1000".to_string());
        }

        Ok(Config {
            database_url,
            server_host,
            server_port,
            max_connections,
            batch_fetch_size,
        })
    }

    /// Logs the effective configuration
    pub fn print_info(&self) {
        info!("Server Address: {}:{}", self.server_host, self.server_port);
        info!("Database: {}", self.database_url);
        info!("Max DB Connections: {}", self.max_connections);
        info!("Batch Fetch Size: {}", self.batch_fetch_size);
    }
}
