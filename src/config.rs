use anyhow::Result;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub static_dir: String,
    pub sync_rounds: Option<i64>,
}

pub fn load() -> Result<Config> {
    let database_url =
        env::var("LOTTERY_DB_PATH").unwrap_or_else(|_| "data/lottery.db".to_string());
    let bind_addr =
        env::var("LOTTERY_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    let static_dir = env::var("LOTTERY_STATIC_DIR").unwrap_or_else(|_| "static".to_string());
    let sync_rounds = match env::var("LOTTERY_SYNC_ROUNDS") {
        Ok(value) => Some(value.parse::<i64>()?),
        Err(_) => None,
    };

    Ok(Config {
        database_url,
        bind_addr,
        static_dir,
        sync_rounds,
    })
}
