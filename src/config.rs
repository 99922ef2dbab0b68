use clap::Parser;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Wishwall celebration server
#[derive(Parser, Serialize, Deserialize, Clone, Debug)]
#[command(name = "wishwall-server", version, about = "Realtime New Year wish wall server")]
pub struct Config {
    /// Port to listen on
    #[arg(long, env = "WISHWALL_PORT", default_value = "8000")]
    pub port: u16,

    /// Bind address
    #[arg(long, env = "WISHWALL_BIND_ADDRESS", default_value = "0.0.0.0")]
    pub bind_address: String,

    /// Path to TOML config file
    #[arg(long, default_value = "./wishwall.toml")]
    pub config: String,

    /// Enable structured JSON logging (for Docker/production)
    #[arg(long, env = "WISHWALL_JSON_LOGS")]
    pub json_logs: bool,

    /// Output a commented TOML config template and exit
    #[arg(long)]
    pub generate_config: bool,

    /// Data directory for persistent state (capsules, quotes, poll counters)
    #[arg(long, env = "WISHWALL_DATA_DIR", default_value = "./data")]
    pub data_dir: String,

    /// Seconds a push connection may stay open before the server closes it
    #[arg(long, env = "WISHWALL_SESSION_TIMEOUT_SECS", default_value = "300")]
    pub session_timeout_secs: u64,

    /// Maximum wish message length in characters
    #[arg(long, env = "WISHWALL_MAX_MESSAGE_CHARS", default_value = "200")]
    pub max_message_chars: usize,

    /// Seconds a wish is retained before age-based eviction
    #[arg(long, env = "WISHWALL_RETENTION_SECS", default_value = "86400")]
    pub retention_secs: u64,

    /// Maximum number of wishes kept in the rolling store
    #[arg(long, env = "WISHWALL_MAX_WISHES", default_value = "50")]
    pub max_wishes: usize,

    /// Interval in seconds between age-based eviction passes
    #[arg(long, env = "WISHWALL_EVICTION_INTERVAL_SECS", default_value = "300")]
    pub eviction_interval_secs: u64,

    /// Allowed cross-origin callers, comma-separated ("*" = unrestricted)
    #[arg(long, env = "WISHWALL_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            bind_address: "0.0.0.0".to_string(),
            config: "./wishwall.toml".to_string(),
            json_logs: false,
            generate_config: false,
            data_dir: "./data".to_string(),
            session_timeout_secs: 300,
            max_message_chars: 200,
            retention_secs: 86400,
            max_wishes: 50,
            eviction_interval_secs: 300,
            cors_origins: "*".to_string(),
        }
    }
}

impl Config {
    /// Load config with layered precedence:
    /// built-in defaults < TOML file < env vars (WISHWALL_*) < CLI args
    pub fn load() -> Result<Self, figment::Error> {
        let cli = Config::parse();
        let config_path = cli.config.clone();

        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_path))
            .merge(Env::prefixed("WISHWALL_"))
            .merge(Serialized::defaults(cli))
            .extract()
    }
}

/// Generate a commented TOML config template
pub fn generate_config_template() -> String {
    r#"# Wishwall Server Configuration
# Place this file at ./wishwall.toml or specify with --config <path>
# All settings can be overridden via environment variables (WISHWALL_PORT, etc.)
# or CLI flags (--port, etc.)

# Server port (default: 8000)
# port = 8000

# Bind address (default: 0.0.0.0 — all interfaces)
# bind_address = "0.0.0.0"

# Enable structured JSON logging for Docker/production
# json_logs = false

# Data directory for the SQLite database (capsules, quotes, poll counters)
# data_dir = "./data"

# Seconds a push connection may stay open before the server closes it
# with a "going away" frame (default: 300)
# session_timeout_secs = 300

# Maximum wish message length in characters (default: 200)
# max_message_chars = 200

# Seconds a wish is retained before age-based eviction (default: 86400 = 24 hours)
# retention_secs = 86400

# Maximum number of wishes kept in the rolling store (default: 50)
# max_wishes = 50

# Interval in seconds between age-based eviction passes (default: 300)
# eviction_interval_secs = 300

# Allowed cross-origin callers, comma-separated. "*" allows any origin.
# cors_origins = "*"
"#
    .to_string()
}
