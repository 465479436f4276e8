//! MongoDB handle shared by the repositories, plus the readiness check used
//! by `/health/ready`.

use std::time::Duration;

use mongodb::{
    bson::doc,
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client, Collection,
};

use crate::{config::Config, errors::AppResult};

pub mod collections {
    pub const USERS: &str = "users";
    pub const TESTS: &str = "tests";
    pub const ATTEMPT_STARTS: &str = "attempt_starts";
    pub const RESULTS: &str = "results";
    pub const PDFS: &str = "pdfs";
    pub const DESCRIPTIVE_ATTEMPTS: &str = "descriptive_attempts";
}

const APP_NAME: &str = "examforge-server";
const MAX_POOL_SIZE: u32 = 10;
const MIN_POOL_SIZE: u32 = 2;
const STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings every examforge client runs with, on top of whatever the
/// connection string carries.
pub fn tune_client_options(options: &mut ClientOptions) {
    options.app_name.get_or_insert_with(|| APP_NAME.to_string());
    options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());
    options.max_pool_size = Some(MAX_POOL_SIZE);
    options.min_pool_size = Some(MIN_POOL_SIZE);
    options.connect_timeout = Some(STORE_TIMEOUT);
    options.server_selection_timeout = Some(STORE_TIMEOUT);
}

#[derive(Clone)]
pub struct Database {
    client: Client,
    db_name: String,
}

impl Database {
    /// Connects and pings once, so a bad connection string fails startup
    /// instead of the first request.
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let mut options = ClientOptions::parse(&config.mongo_conn_string).await?;
        tune_client_options(&mut options);

        let db = Self {
            client: Client::with_options(options)?,
            db_name: config.mongo_db_name.clone(),
        };
        db.ping().await?;

        log::info!("Connected to MongoDB database {}", db.db_name);
        Ok(db)
    }

    pub fn collection<T>(&self, name: &str) -> Collection<T>
    where
        T: Send + Sync,
    {
        self.client.database(&self.db_name).collection(name)
    }

    async fn ping(&self) -> AppResult<()> {
        self.client
            .database(&self.db_name)
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreStatus {
    Ok,
    Unreachable,
    NotConfigured,
}

impl StoreStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StoreStatus::Ok => "ok",
            StoreStatus::Unreachable => "error",
            StoreStatus::NotConfigured => "not_configured",
        }
    }

    /// In-memory deployments have no store and are still ready.
    pub fn is_ready(self) -> bool {
        self != StoreStatus::Unreachable
    }
}

pub async fn store_status(db: Option<&Database>) -> StoreStatus {
    let Some(db) = db else {
        return StoreStatus::NotConfigured;
    };

    match db.ping().await {
        Ok(()) => StoreStatus::Ok,
        Err(e) => {
            log::error!("Readiness check failed: {}", e);
            StoreStatus::Unreachable
        }
    }
}
