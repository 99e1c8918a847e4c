//! Configuration types for catalog client construction.
//!
//! [CatalogClientConfig] is what the client is built from.
//! [CatalogSettings] is the user facing configuration,
//! read from a TOML file and `GLOBAL_CATALOG_*` environment variables.

use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Debug, Display};
use std::path::PathBuf;
use std::str::FromStr;
use std::{env, io};

use config::{Config as HierarchicalConfig, Environment};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;
use tracing::debug;

use crate::auth::AuthMethod;

pub const DEFAULT_SERVICE_URL: &str = "https://globalcatalog.cloud.ibm.com/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Name of the config file looked up in the working directory.
pub const CATALOG_CONFIG_FILE: &str = "global-catalog.toml";
/// Points at an explicit config file, read before the working directory one.
pub const CATALOG_CONFIG_FILE_VAR: &str = "GLOBAL_CATALOG_CONFIG_FILE";
const CATALOG_ENV_PREFIX: &str = "GLOBAL_CATALOG";

/// Configuration for catalog client construction.
#[derive(Debug, Clone)]
pub struct CatalogClientConfig {
    /// Base URL of the service, without the `/v1/catalog` suffix.
    pub service_url: String,
    pub auth: AuthMethod,
    /// Account to scope requests to, sent as the `account` query parameter.
    pub account: Option<String>,
    /// Additional headers to include in requests.
    pub extra_headers: BTreeMap<String, String>,
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Mock mode for testing.
    pub mock_mode: CatalogMockMode,
}

impl CatalogClientConfig {
    /// A config with defaults for everything but the service URL.
    pub fn new(service_url: impl Into<String>) -> Self {
        Self {
            service_url: service_url.into(),
            auth: AuthMethod::NoAuth,
            account: None,
            extra_headers: BTreeMap::new(),
            user_agent: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            mock_mode: CatalogMockMode::None,
        }
    }
}

/// Mock recording/replay mode for integration testing.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub enum CatalogMockMode {
    /// Use a real server without any mock recording or replaying.
    #[default]
    None,
    /// Proxy via a mock server and record interactions to a path.
    Record(PathBuf),
    /// Replay interactions from a path using a mock server.
    Replay(PathBuf),
}

/// How requests are authenticated, as named in configuration.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, DeserializeFromStr, SerializeDisplay)]
pub enum AuthType {
    #[default]
    NoAuth,
    BearerToken,
    /// IAM API key exchange. Recognized so it can be rejected by name.
    Iam,
}

impl FromStr for AuthType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "noauth" | "none" => Ok(AuthType::NoAuth),
            "bearertoken" | "bearer" => Ok(AuthType::BearerToken),
            "iam" => Ok(AuthType::Iam),
            other => Err(ConfigError::UnknownAuthType(other.to_string())),
        }
    }
}

impl Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthType::NoAuth => write!(f, "noauth"),
            AuthType::BearerToken => write!(f, "bearertoken"),
            AuthType::Iam => write!(f, "iam"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read catalog configuration")]
    Read(#[from] config::ConfigError),
    #[error("unknown auth type '{0}'")]
    UnknownAuthType(String),
    #[error("auth type 'bearertoken' requires 'bearer_token' to be set")]
    MissingBearerToken,
    #[error("auth type '{0}' is not supported by this client")]
    UnsupportedAuthType(AuthType),
    #[error("could not determine working directory")]
    WorkingDirectory(#[source] io::Error),
}

/// User facing catalog settings.
///
/// Sources, later ones override earlier ones:
/// built-in defaults, the file named by `$GLOBAL_CATALOG_CONFIG_FILE`,
/// `./global-catalog.toml`, and `GLOBAL_CATALOG_*` environment variables
/// (e.g. `GLOBAL_CATALOG_URL`, `GLOBAL_CATALOG_AUTH_TYPE`).
#[derive(Clone, Deserialize, Serialize)]
pub struct CatalogSettings {
    pub url: String,
    #[serde(default)]
    pub auth_type: AuthType,
    pub bearer_token: Option<String>,
    pub account: Option<String>,
    pub user_agent: Option<String>,
    pub timeout_secs: u64,
}

impl Debug for CatalogSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogSettings")
            .field("url", &self.url)
            .field("auth_type", &self.auth_type)
            .field("has_bearer_token", &self.bearer_token.is_some())
            .field("account", &self.account)
            .field("user_agent", &self.user_agent)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl CatalogSettings {
    /// Read settings from the process environment and config files.
    pub fn load() -> Result<Self, ConfigError> {
        let working_dir = env::current_dir().map_err(ConfigError::WorkingDirectory)?;
        Self::load_from(env::vars().collect(), working_dir)
    }

    /// Read settings from the given variables instead of the process
    /// environment, looking for the config file in `working_dir`.
    pub fn load_from(
        vars: HashMap<String, String>,
        working_dir: PathBuf,
    ) -> Result<Self, ConfigError> {
        let mut builder = HierarchicalConfig::builder()
            .set_default("url", DEFAULT_SERVICE_URL)?
            .set_default("auth_type", AuthType::default().to_string())?
            .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS)?;

        if let Some(file) = vars.get(CATALOG_CONFIG_FILE_VAR) {
            debug!(file, "reading catalog config file");
            builder = builder.add_source(
                config::File::from(PathBuf::from(file)).format(config::FileFormat::Toml),
            );
        }

        builder = builder.add_source(
            config::File::from(working_dir.join(CATALOG_CONFIG_FILE))
                .format(config::FileFormat::Toml)
                .required(false),
        );

        let catalog_vars = vars
            .into_iter()
            .filter(|(key, _)| key != CATALOG_CONFIG_FILE_VAR)
            .collect::<HashMap<_, _>>();

        builder = builder.add_source(
            Environment::with_prefix(CATALOG_ENV_PREFIX)
                .source(Some(catalog_vars))
                .try_parsing(true),
        );

        let settings: CatalogSettings = builder.build()?.try_deserialize()?;
        debug!(?settings, "loaded catalog settings");
        Ok(settings)
    }
}

impl TryFrom<CatalogSettings> for CatalogClientConfig {
    type Error = ConfigError;

    fn try_from(settings: CatalogSettings) -> Result<Self, Self::Error> {
        let auth = match settings.auth_type {
            AuthType::NoAuth => AuthMethod::NoAuth,
            AuthType::BearerToken => AuthMethod::Bearer(
                settings
                    .bearer_token
                    .ok_or(ConfigError::MissingBearerToken)?,
            ),
            unsupported @ AuthType::Iam => {
                return Err(ConfigError::UnsupportedAuthType(unsupported));
            },
        };

        Ok(CatalogClientConfig {
            service_url: settings.url,
            auth,
            account: settings.account,
            extra_headers: BTreeMap::new(),
            user_agent: settings.user_agent,
            timeout_secs: settings.timeout_secs,
            mock_mode: CatalogMockMode::None,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;

    fn vars<const N: usize>(pairs: [(&str, &str); N]) -> HashMap<String, String> {
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_without_any_source() {
        let tempdir = tempfile::tempdir().unwrap();
        let settings =
            CatalogSettings::load_from(HashMap::new(), tempdir.path().to_path_buf()).unwrap();
        assert_eq!(settings.url, DEFAULT_SERVICE_URL);
        assert_eq!(settings.auth_type, AuthType::NoAuth);
        assert_eq!(settings.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(settings.bearer_token, None);
    }

    #[test]
    fn env_overrides_config_file() {
        let tempdir = tempfile::tempdir().unwrap();
        fs::write(
            tempdir.path().join(CATALOG_CONFIG_FILE),
            indoc! {r#"
                url = "https://file.example/api"
                auth_type = "bearertoken"
                bearer_token = "from-file"
                account = "file-account"
            "#},
        )
        .unwrap();

        let settings = CatalogSettings::load_from(
            vars([
                ("GLOBAL_CATALOG_URL", "https://env.example/api"),
                ("GLOBAL_CATALOG_TIMEOUT_SECS", "5"),
                ("UNRELATED", "ignored"),
            ]),
            tempdir.path().to_path_buf(),
        )
        .unwrap();

        assert_eq!(settings.url, "https://env.example/api");
        assert_eq!(settings.auth_type, AuthType::BearerToken);
        assert_eq!(settings.bearer_token.as_deref(), Some("from-file"));
        assert_eq!(settings.account.as_deref(), Some("file-account"));
        assert_eq!(settings.timeout_secs, 5);
    }

    #[test]
    fn explicit_config_file_is_read() {
        let tempdir = tempfile::tempdir().unwrap();
        let file = tempdir.path().join("custom.toml");
        fs::write(&file, "url = \"https://custom.example/api\"\n").unwrap();

        let settings = CatalogSettings::load_from(
            vars([(CATALOG_CONFIG_FILE_VAR, file.to_str().unwrap())]),
            tempdir.path().to_path_buf(),
        )
        .unwrap();
        assert_eq!(settings.url, "https://custom.example/api");
    }

    #[test]
    fn missing_explicit_config_file_is_an_error() {
        let tempdir = tempfile::tempdir().unwrap();
        let result = CatalogSettings::load_from(
            vars([(CATALOG_CONFIG_FILE_VAR, "/does/not/exist.toml")]),
            tempdir.path().to_path_buf(),
        );
        assert!(matches!(result, Err(ConfigError::Read(_))), "{result:?}");
    }

    #[test]
    fn load_reads_process_environment() {
        let tempdir = tempfile::tempdir().unwrap();
        let file = tempdir.path().join("env.toml");
        fs::write(&file, "account = \"from-env-file\"\n").unwrap();

        temp_env::with_vars(
            [
                (CATALOG_CONFIG_FILE_VAR, Some(file.to_str().unwrap())),
                ("GLOBAL_CATALOG_AUTH_TYPE", Some("BEARERTOKEN")),
                ("GLOBAL_CATALOG_BEARER_TOKEN", Some("secret")),
            ],
            || {
                let settings = CatalogSettings::load().unwrap();
                assert_eq!(settings.auth_type, AuthType::BearerToken);
                assert_eq!(settings.account.as_deref(), Some("from-env-file"));
                assert!(!format!("{settings:?}").contains("secret"));
            },
        );
    }

    #[test]
    fn auth_type_parses_case_insensitively() {
        assert_eq!("IAM".parse::<AuthType>().unwrap(), AuthType::Iam);
        assert_eq!("NoAuth".parse::<AuthType>().unwrap(), AuthType::NoAuth);
        assert!(matches!(
            "basic".parse::<AuthType>(),
            Err(ConfigError::UnknownAuthType(t)) if t == "basic"
        ));
    }

    #[test]
    fn bearer_token_settings_become_bearer_auth() {
        let tempdir = tempfile::tempdir().unwrap();
        let settings = CatalogSettings::load_from(
            vars([
                ("GLOBAL_CATALOG_AUTH_TYPE", "bearertoken"),
                ("GLOBAL_CATALOG_BEARER_TOKEN", "token"),
                ("GLOBAL_CATALOG_ACCOUNT", "acct"),
            ]),
            tempdir.path().to_path_buf(),
        )
        .unwrap();

        let config = CatalogClientConfig::try_from(settings).unwrap();
        assert_eq!(config.auth, AuthMethod::Bearer("token".to_string()));
        assert_eq!(config.account.as_deref(), Some("acct"));
        assert_eq!(config.mock_mode, CatalogMockMode::None);
    }

    #[test]
    fn bearer_token_is_required_for_bearer_auth() {
        let tempdir = tempfile::tempdir().unwrap();
        let settings = CatalogSettings::load_from(
            vars([("GLOBAL_CATALOG_AUTH_TYPE", "bearertoken")]),
            tempdir.path().to_path_buf(),
        )
        .unwrap();
        assert!(matches!(
            CatalogClientConfig::try_from(settings),
            Err(ConfigError::MissingBearerToken)
        ));
    }

    #[test]
    fn iam_auth_is_rejected() {
        let tempdir = tempfile::tempdir().unwrap();
        let settings = CatalogSettings::load_from(
            vars([("GLOBAL_CATALOG_AUTH_TYPE", "iam")]),
            tempdir.path().to_path_buf(),
        )
        .unwrap();
        assert!(matches!(
            CatalogClientConfig::try_from(settings),
            Err(ConfigError::UnsupportedAuthType(AuthType::Iam))
        ));
    }
}
