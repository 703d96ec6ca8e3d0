use std::net::IpAddr;
use std::path::PathBuf;

pub const DEFAULT_SECRET_KEY: &str = "change-this-in-production-12345";

#[derive(Debug, Clone)]
pub struct Config {
    pub secret_key: String,
    pub host: IpAddr,
    pub port: u16,
    pub debug: bool,
    pub data_dir: PathBuf,
    pub static_dir: PathBuf,
    pub max_body_size: usize,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let secret_key = env_or("SECRET_KEY", DEFAULT_SECRET_KEY);

        let host: IpAddr = env_or("HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid HOST: {e}"))?;

        let port: u16 = env_or("PORT", "5000")
            .parse()
            .map_err(|e| format!("Invalid PORT: {e}"))?;

        let debug = env_or("APP_ENV", "production") == "development";

        let data_dir = PathBuf::from(env_or("REPORT_DATA_DIR", "."));
        let static_dir = PathBuf::from(env_or("REPORT_STATIC_DIR", "static"));

        let max_body_size: usize = env_or("MAX_CONTENT_LENGTH", "33554432")
            .parse()
            .map_err(|e| format!("Invalid MAX_CONTENT_LENGTH: {e}"))?;

        let log_level = env_or("REPORT_LOG_LEVEL", if debug { "debug" } else { "info" });

        Ok(Config {
            secret_key,
            host,
            port,
            debug,
            data_dir,
            static_dir,
            max_body_size,
            log_level,
        })
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.data_dir.join("uploads")
    }

    pub fn generated_dir(&self) -> PathBuf {
        self.data_dir.join("generated")
    }

    /// Optional header logo; the report falls back to text when absent.
    pub fn logo_path(&self) -> PathBuf {
        self.static_dir.join("img").join("logo.png")
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
