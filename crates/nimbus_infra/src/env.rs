use std::path::{Path, PathBuf};
use std::str::FromStr;

use nimbus_domain::{Environment, MetadataConfig, RetryConfig};
use nimbus_services::EnvironmentInfra;
use tracing::warn;
use url::Url;

const CONFIG_FILE_NAME: &str = "config.ini";

#[derive(Clone)]
pub struct NimbusEnvironmentInfra {
    config_path: Option<PathBuf>,
}

impl NimbusEnvironmentInfra {
    /// Creates the environment resolver.
    ///
    /// # Arguments
    /// * `config_path` - Explicit location of `config.ini`. Takes precedence
    ///   over `NIMBUS_CONFIG_PATH` and the install-root default.
    pub fn new(config_path: Option<PathBuf>) -> Self {
        if let Ok(cwd) = std::env::current_dir() {
            Self::dot_env(&cwd);
        }
        Self { config_path }
    }

    fn get(&self) -> Environment {
        resolve_environment(self.config_path.clone(), |key| std::env::var(key).ok())
    }

    /// Loads `.env` files found between `cwd` and the home directory.
    fn dot_env(cwd: &Path) {
        for env_file in env_files(cwd, dirs::home_dir().as_deref()) {
            if let Err(err) = dotenvy::from_path(&env_file) {
                warn!(path = %env_file.display(), error = %err, "Ignoring unreadable .env file");
            }
        }
    }
}

/// `.env` files from `cwd` upwards, closest first, stopping at `home` when
/// `cwd` lies below it. Closer files win since `dotenvy` keeps variables that
/// are already set.
fn env_files(cwd: &Path, home: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for dir in cwd.ancestors() {
        let env_file = dir.join(".env");
        if env_file.is_file() {
            files.push(env_file);
        }
        if Some(dir) == home {
            break;
        }
    }
    files
}

impl EnvironmentInfra for NimbusEnvironmentInfra {
    fn get_environment(&self) -> Environment {
        self.get()
    }
}

/// `config.ini` one level above the directory holding the executable, i.e.
/// the install root for a `<root>/bin/<exe>` layout.
fn default_config_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| {
            exe.parent()
                .and_then(Path::parent)
                .map(|root| root.join(CONFIG_FILE_NAME))
        })
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}

fn resolve_environment(
    config_path: Option<PathBuf>,
    var: impl Fn(&str) -> Option<String>,
) -> Environment {
    let config_path = config_path
        .or_else(|| parse_env::<String>(&var, "NIMBUS_CONFIG_PATH").map(PathBuf::from))
        .unwrap_or_else(default_config_path);

    Environment {
        config_path,
        retry_config: resolve_retry_config(&var),
        metadata: resolve_metadata_config(&var),
    }
}

/// Trait for parsing environment variable values
trait FromEnvStr: Sized {
    fn from_env_str(s: &str) -> Option<Self>;
}

// Macro to implement FromEnvStr for types that already implement FromStr
macro_rules! impl_from_env_str_via_from_str {
    ($($t:ty),* $(,)?) => {
        $(
            impl FromEnvStr for $t {
                fn from_env_str(s: &str) -> Option<Self> {
                    <$t as FromStr>::from_str(s.trim()).ok()
                }
            }
        )*
    };
}

impl_from_env_str_via_from_str! {
    u64, usize,
    Url,
}

impl FromEnvStr for String {
    fn from_env_str(s: &str) -> Option<Self> {
        let s = s.trim();
        (!s.is_empty()).then(|| s.to_string())
    }
}

fn parse_env<T: FromEnvStr>(var: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    var(name).and_then(|val| T::from_env_str(&val))
}

/// Resolves retry configuration from environment variables or returns defaults
fn resolve_retry_config(var: &impl Fn(&str) -> Option<String>) -> RetryConfig {
    let mut config = RetryConfig::default();

    if let Some(parsed) = parse_env::<usize>(var, "NIMBUS_RETRY_MAX_ATTEMPTS") {
        config.max_attempts = parsed;
    }
    if let Some(parsed) = parse_env::<u64>(var, "NIMBUS_RETRY_INITIAL_BACKOFF_MS") {
        config.initial_backoff_ms = parsed;
    }
    if let Some(parsed) = parse_env::<u64>(var, "NIMBUS_RETRY_BACKOFF_FACTOR") {
        config.backoff_factor = parsed;
    }
    if let Some(parsed) = parse_env::<u64>(var, "NIMBUS_RETRY_MAX_DELAY_MS") {
        config.max_delay_ms = Some(parsed);
    }

    config
}

fn resolve_metadata_config(var: &impl Fn(&str) -> Option<String>) -> MetadataConfig {
    let mut config = MetadataConfig::default();

    if let Some(parsed) = parse_env::<Url>(var, "NIMBUS_IMDS_ENDPOINT") {
        config.endpoint = parsed;
    }
    if let Some(parsed) = parse_env::<u64>(var, "NIMBUS_IMDS_TOKEN_TTL") {
        config.token_ttl_secs = parsed;
    }
    if let Some(parsed) = parse_env::<u64>(var, "NIMBUS_IMDS_CONNECT_TIMEOUT_MS") {
        config.connect_timeout_ms = parsed;
    }
    if let Some(parsed) = parse_env::<u64>(var, "NIMBUS_IMDS_READ_TIMEOUT_MS") {
        config.read_timeout_ms = parsed;
    }

    config
}
