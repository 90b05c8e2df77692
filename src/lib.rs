pub mod api;
pub mod config;
pub mod db;
pub mod profile;
pub mod ui;
pub mod utils;

pub use db::DbPool;

use config::Config;

pub struct AppState {
    pub config: Config,
    pub db: DbPool,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config, db: DbPool) -> Self {
        Self {
            config,
            db,
            http: reqwest::Client::new(),
        }
    }
}
