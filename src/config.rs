use std::{env, path::PathBuf, time::Duration};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub catalog_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub auth_latency: Duration,
    pub page_size: usize,
    pub currency: String,
    pub delivery_fee: i64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let data_dir = env::var("STOREFRONT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));
        let catalog_path = env::var("CATALOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("catalog.json"));
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let auth_latency = env::var("AUTH_LATENCY_MS")
            .ok()
            .and_then(|ms| ms.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(1000));
        let page_size = env::var("PAGE_SIZE")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|s| *s > 0)
            .unwrap_or(12);
        let currency = env::var("CURRENCY").unwrap_or_else(|_| "$".to_string());
        let delivery_fee = match env::var("DELIVERY_FEE") {
            Ok(fee) => fee.parse::<i64>()?,
            Err(_) => 10,
        };
        Ok(Self {
            data_dir,
            catalog_path,
            host,
            port,
            auth_latency,
            page_size,
            currency,
            delivery_fee,
        })
    }
}
