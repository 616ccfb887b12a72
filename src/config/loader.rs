//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::WalletConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse and validate configuration from TOML text.
///
/// The built-in faucet catalogue targets the built-in chains. When the file
/// declares `chains` but no `faucets`, default native faucets for chains it
/// does not declare are dropped.
pub fn parse_config(content: &str) -> Result<WalletConfig, ConfigError> {
    let table: toml::Table = toml::from_str(content).map_err(ConfigError::Parse)?;
    let default_faucets = !table.contains_key("faucets");
    let mut config: WalletConfig = toml::Value::Table(table)
        .try_into()
        .map_err(ConfigError::Parse)?;

    if default_faucets {
        for name in config.retain_reachable_faucets() {
            tracing::warn!(faucet = %name, "Default faucet dropped, its chain is not configured");
        }
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<WalletConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}

/// Load configuration, falling back to built-in defaults when the file is absent.
///
/// Used for the implicit default path; an explicitly requested file must exist.
pub fn load_or_default(path: &Path) -> Result<WalletConfig, ConfigError> {
    match fs::read_to_string(path) {
        Ok(content) => parse_config(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            Ok(WalletConfig::default())
        }
        Err(e) => Err(ConfigError::Io(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            wallet_file = "my-wallet.json"

            [[chains]]
            name = "local"
            chain_id = 31337
            rpc_url = "http://localhost:8545"

            [destinations]
            iexec = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
            "#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.wallet_file, "my-wallet.json");
        assert_eq!(config.chains[0].name, "local");
        assert!(config.destinations.contains_key("iexec"));
        assert!(config
            .faucets
            .iter()
            .all(|f| f.kind == crate::config::FaucetKind::Token));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.chains.len(), 4);

        let err = load_config(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_validation_errors_are_reported() {
        let err = parse_config(
            r#"
            [transactions]
            poll_interval_ms = 0
            "#,
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("transactions.poll_interval_ms"));
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("chains = 12").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
