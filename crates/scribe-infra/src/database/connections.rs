use std::time::Duration;

#[cfg(feature = "postgres")]
use sea_orm::{ConnectOptions, Database, DbConn, DbErr};

/// Configuration for the blog database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 20,
            min_connections: 2,
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Connection pool shared by all repositories.
#[cfg(feature = "postgres")]
#[derive(Clone)]
pub struct DatabaseConnections {
    pub main: DbConn,
}

#[cfg(not(feature = "postgres"))]
#[derive(Clone)]
pub struct DatabaseConnections;

#[cfg(feature = "postgres")]
impl DatabaseConnections {
    /// Open the pool described by `config`.
    pub async fn init(config: &DatabaseConfig) -> Result<Self, DbErr> {
        tracing::info!("Initializing database connection pool...");

        let opts = ConnectOptions::new(&config.url)
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(config.connect_timeout)
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(false)
            .to_owned();

        let main = Database::connect(opts).await?;
        tracing::info!(pool = config.max_connections, "Database connected");

        Ok(Self { main })
    }

    /// Check that the database still answers.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.main.ping().await
    }
}
