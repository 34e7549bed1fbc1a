//! Gateway configuration.

use std::path::PathBuf;

use clap::Parser;
use courseinfo_core::query::{PageLimits, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use courseinfo_core::StorageConfig;

/// Environment variable holding API keys.
pub const API_KEYS_ENV: &str = "COURSEINFO_API_KEYS";

/// courseinfo HTTP/JSON gateway command line arguments.
#[derive(Debug, Parser)]
#[command(name = "courseinfo-gateway")]
#[command(about = "HTTP/JSON gateway for course-registration records")]
pub struct Args {
    /// Address to listen on for HTTP requests.
    #[arg(short, long, default_value = "0.0.0.0:8080")]
    pub listen: String,

    /// Directory holding the record store.
    #[arg(short, long, default_value = "./courseinfo_data")]
    pub data_dir: PathBuf,

    /// Use a temporary store that is discarded on exit.
    #[arg(long)]
    pub temporary: bool,

    /// Page size used when a listing names none.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub default_page_size: usize,

    /// Largest page size a listing may request.
    #[arg(long, default_value_t = MAX_PAGE_SIZE)]
    pub max_page_size: usize,

    /// API keys as `username:key:perm,perm;...`; `admin` grants everything.
    #[arg(long, env = API_KEYS_ENV, hide_env_values = true)]
    pub api_keys: Option<String>,

    /// Log level used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Address to listen on for HTTP requests.
    pub listen_addr: String,
    /// Directory holding the record store.
    pub data_dir: PathBuf,
    /// Whether the store is temporary.
    pub temporary: bool,
    /// Listing page size bounds.
    pub page_limits: PageLimits,
    /// API key specification.
    pub api_keys: Option<String>,
}

impl GatewayConfig {
    /// Storage configuration for the record store.
    pub fn storage_config(&self) -> StorageConfig {
        if self.temporary {
            StorageConfig::temporary()
        } else {
            StorageConfig::new(&self.data_dir)
        }
    }

    /// Check settings that clap cannot express.
    pub fn validate(&self) -> Result<(), String> {
        let limits = &self.page_limits;
        if limits.max_page_size == 0 {
            return Err("max_page_size must be at least 1".to_string());
        }
        if limits.default_page_size == 0 || limits.default_page_size > limits.max_page_size {
            return Err(format!(
                "default_page_size must be between 1 and max_page_size ({})",
                limits.max_page_size
            ));
        }
        Ok(())
    }
}

impl From<&Args> for GatewayConfig {
    fn from(args: &Args) -> Self {
        Self {
            listen_addr: args.listen.clone(),
            data_dir: args.data_dir.clone(),
            temporary: args.temporary,
            page_limits: PageLimits {
                default_page_size: args.default_page_size,
                max_page_size: args.max_page_size,
            },
            api_keys: args.api_keys.clone(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            data_dir: PathBuf::from("./courseinfo_data"),
            temporary: false,
            page_limits: PageLimits::default(),
            api_keys: None,
        }
    }
}
