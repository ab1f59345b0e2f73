use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 5001;
pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Top-level config (focuslock.toml + FOCUSLOCK_* env overrides).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FocusConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    /// Remote store. When absent the gateway falls back to the local
    /// SQLite file in `database`.
    #[serde(default)]
    pub supabase: Option<SupabaseConfig>,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default)]
    pub cors: CorsConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
            cors: CorsConfig::default(),
        }
    }
}

/// Browser origins allowed to call `/api/*`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_cors_origins")]
    pub origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origins: default_cors_origins(),
        }
    }
}

/// Supabase project credentials (PostgREST endpoint under `/rest/v1`).
///
/// Both fields default to empty so a half-filled section still parses;
/// [`FocusConfig::load`] discards it unless both are set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupabaseConfig {
    /// Project URL without trailing slash, e.g. `https://xyz.supabase.co`.
    #[serde(default)]
    pub url: String,
    /// Service or anon key, sent both as `apikey` and as bearer token.
    #[serde(default)]
    pub key: String,
}

impl SupabaseConfig {
    fn is_complete(&self) -> bool {
        !self.url.trim().is_empty() && !self.key.trim().is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_cors_origins() -> Vec<String> {
    vec![DEFAULT_CORS_ORIGIN.to_string()]
}
fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.focuslock/focuslock.db", home)
}

/// Load a `.env` file from the working directory, if there is one.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("ignoring unreadable .env: {e}"),
    }
}

impl FocusConfig {
    /// Load config from a TOML file with env var overrides.
    ///
    /// Later sources win:
    ///   1. TOML file (explicit path, else ~/.focuslock/focuslock.toml)
    ///   2. SUPABASE_URL / SUPABASE_KEY / PORT  (plain deployment vars)
    ///   3. FOCUSLOCK_* (e.g. FOCUSLOCK_GATEWAY_PORT, FOCUSLOCK_DATABASE_PATH)
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let mut config: FocusConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::raw().only(&["SUPABASE_URL", "SUPABASE_KEY"]).split("_"))
            .merge(Env::raw().only(&["PORT"]).map(|_| "gateway.port".into()))
            .merge(Env::prefixed("FOCUSLOCK_").split("_"))
            .extract()
            .map_err(|e| crate::error::FocusError::Config(e.to_string()))?;

        if let Some(supabase) = config.supabase.take() {
            if supabase.is_complete() {
                config.supabase = Some(supabase);
            } else {
                tracing::warn!(
                    url_set = !supabase.url.trim().is_empty(),
                    key_set = !supabase.key.trim().is_empty(),
                    "incomplete Supabase settings, need both url and key; ignoring them"
                );
            }
        }

        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.focuslock/focuslock.toml", home)
}
