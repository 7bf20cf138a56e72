use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::de::DeserializeOwned;

/// Environment variable naming the optional TOML configuration file.
pub const CONFIG_FILE_ENV: &str = "FLOATING_TAB_CONFIG";

/// Configuration file read when `FLOATING_TAB_CONFIG` is not set.
pub const DEFAULT_CONFIG_FILE: &str = "floating_tab.toml";

/// Prefix for environment variables that override file configuration.
pub const ENV_PREFIX: &str = "FLOATING_TAB_";

pub trait ContextProvider<Config>: Sized {
    type Error: From<figment::Error>;

    fn new(config: Config) -> impl Future<Output = Result<Self, Self::Error>>;
}

/// Install the tracing subscriber used by every host binary.
///
/// Log output goes to stderr so that stdout stays free for the rendered
/// widget. The level can be overridden through `RUST_LOG`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        // allow log level to be overridden by RUST_LOG env var
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// Build the figment used for host configuration.
///
/// Values come from the TOML file named by `FLOATING_TAB_CONFIG` (or
/// `floating_tab.toml`, if present) and are overridden by
/// `FLOATING_TAB_*` environment variables.
pub fn figment() -> Figment {
    let config_file = std::env::var(CONFIG_FILE_ENV)
        .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

    Figment::new()
        .merge(Toml::file(config_file))
        .merge(Env::prefixed(ENV_PREFIX))
}

/// Initialize the application context with configuration from the config
/// file and environment variables.
/// The configuration is extracted using figment.
///
/// # Errors
/// If the configuration cannot be extracted or the context provider fails
/// to construct the context.
///
pub async fn create_app_context<A, Config>() -> Result<A, A::Error>
where
    A: ContextProvider<Config>,
    Config: DeserializeOwned,
{
    init_tracing();

    let config: Config = figment().extract()?;

    A::new(config).await
}

#[cfg(test)]
mod tests {
    use figment::Jail;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct HostConfig {
        action_url: String,
        #[serde(default)]
        dev_mode: bool,
    }

    #[test]
    fn test_reads_config_file_named_by_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "custom.toml",
                r#"action_url = "https://example.com/shop""#,
            )?;
            jail.set_env(CONFIG_FILE_ENV, "custom.toml");

            let config: HostConfig = figment().extract()?;

            assert_eq!(config.action_url, "https://example.com/shop");
            assert!(!config.dev_mode);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_config_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                DEFAULT_CONFIG_FILE,
                r#"
                    action_url = "https://example.com/shop"
                    dev_mode = false
                "#,
            )?;
            jail.set_env("FLOATING_TAB_DEV_MODE", "true");

            let config: HostConfig = figment().extract()?;

            assert!(config.dev_mode);
            Ok(())
        });
    }

    #[test]
    fn test_missing_config_file_is_not_an_error() {
        Jail::expect_with(|jail| {
            jail.set_env("FLOATING_TAB_ACTION_URL", "https://example.com");

            let config: HostConfig = figment().extract()?;

            assert_eq!(config.action_url, "https://example.com");
            Ok(())
        });
    }
}
