//! Client for the Global Catalog REST API.
//!
//! This crate provides:
//! - HTTP client construction with bearer token authentication
//! - Typed catalog operations on entries, visibility, pricing,
//!   audit logs and artifacts ([CatalogOperations])
//! - Error mapping from transport and API failures into [CatalogClientError]
//! - Layered configuration from defaults, a TOML file and the environment
//! - Mock server recording/replay of catalog traffic
//!
//! ## Usage
//!
//! ```ignore
//! use global_catalog::{CatalogClient, CatalogClientConfig, CatalogOperations, CatalogSettings};
//!
//! let config = CatalogClientConfig::try_from(CatalogSettings::load()?)?;
//! let client = CatalogClient::new(config)?;
//! let entry = client.get_entry("my-entry", &Default::default()).await?;
//! ```

mod auth;
mod client;
mod config;
mod error;
mod mock;
pub mod types;

pub use global_catalog_api_v1::{Client as ApiClient, Error as ApiError};

pub use self::auth::{AuthError, AuthMethod, AuthStrategy};
pub use self::client::{str_to_entry_id, CatalogClient, CatalogOperations};
pub use self::config::{
    AuthType,
    CatalogClientConfig,
    CatalogMockMode,
    CatalogSettings,
    ConfigError,
    CATALOG_CONFIG_FILE,
    CATALOG_CONFIG_FILE_VAR,
    DEFAULT_SERVICE_URL,
    DEFAULT_TIMEOUT_SECS,
};
pub use self::error::{ApiErrorResponse, CatalogClientError, MapApiErrorExt, ValidationError};
