//! Types used as operation parameters and responses.
//!
//! Field names follow the JSON the Global Catalog service sends and accepts.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Error types.
pub mod error {
    /// Error from a TryFrom or FromStr implementation.
    pub struct ConversionError(std::borrow::Cow<'static, str>);
    impl std::error::Error for ConversionError {}
    impl std::fmt::Display for ConversionError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
            std::fmt::Display::fmt(&self.0, f)
        }
    }
    impl std::fmt::Debug for ConversionError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
            std::fmt::Debug::fmt(&self.0, f)
        }
    }
    impl From<&'static str> for ConversionError {
        fn from(value: &'static str) -> Self {
            Self(value.into())
        }
    }
    impl From<String> for ConversionError {
        fn from(value: String) -> Self {
            Self(value.into())
        }
    }
}

const CATALOG_ENTRY_ID_PATTERN: &str = "^[A-Za-z0-9][A-Za-z0-9_.:\\-]{0,127}$";

static CATALOG_ENTRY_ID_REGEX: LazyLock<regress::Regex> = LazyLock::new(|| {
    regress::Regex::new(CATALOG_ENTRY_ID_PATTERN).expect("catalog entry id pattern is valid")
});

/// Identifier of a catalog entry.
///
/// Ids are chosen by the caller when the entry is created and
/// must be unique across the whole catalog.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct CatalogEntryId(String);

impl std::ops::Deref for CatalogEntryId {
    type Target = String;

    fn deref(&self) -> &String {
        &self.0
    }
}

impl std::fmt::Display for CatalogEntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<CatalogEntryId> for String {
    fn from(value: CatalogEntryId) -> Self {
        value.0
    }
}

impl std::str::FromStr for CatalogEntryId {
    type Err = self::error::ConversionError;

    fn from_str(value: &str) -> Result<Self, self::error::ConversionError> {
        if CATALOG_ENTRY_ID_REGEX.find(value).is_none() {
            return Err(format!("doesn't match pattern \"{CATALOG_ENTRY_ID_PATTERN}\"").into());
        }
        Ok(Self(value.to_string()))
    }
}

impl TryFrom<&str> for CatalogEntryId {
    type Error = self::error::ConversionError;

    fn try_from(value: &str) -> Result<Self, self::error::ConversionError> {
        value.parse()
    }
}

impl TryFrom<String> for CatalogEntryId {
    type Error = self::error::ConversionError;

    fn try_from(value: String) -> Result<Self, self::error::ConversionError> {
        value.parse()
    }
}

impl<'de> Deserialize<'de> for CatalogEntryId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse()
            .map_err(|e: self::error::ConversionError| {
                <D::Error as serde::de::Error>::custom(e.to_string())
            })
    }
}

/// A catalog entry, as created, updated and returned by the service.
///
/// Fields the service assigns (`url`, `catalog_crn`, `created`, ...)
/// are ignored when sent on create.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    /// `service`, `template`, `dashboard`, `plan`, ...
    pub kind: String,
    /// Display text keyed by locale, e.g. `en`.
    #[serde(default)]
    pub overview_ui: BTreeMap<String, Overview>,
    #[serde(default)]
    pub images: Image,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<bool>,
    #[serde(default)]
    pub provider: Provider,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ObjectMetadataSet>,
    /// Self link of the entry, echoed back on update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_crn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub geo_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pricing_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CatalogEntry>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Overview {
    pub display_name: String,
    pub description: String,
    pub long_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_description: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Image {
    /// URL of the default image.
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_image: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Provider {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Versioned, mostly free-form metadata attached to an entry.
///
/// The blocks this client reads are typed; `service`, `plan`, `ui`,
/// `sla`, `callbacks` and anything newer pass through `extra` untouched.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ObjectMetadataSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rc_compatible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub compliance: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<PricingSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment: Option<DeploymentBase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<TemplateMetaData>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub other: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct PricingSet {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_price: Option<StartingPrice>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct StartingPrice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub amount: Vec<Amount>,
}

/// Prices for one country and currency.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Amount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prices: Vec<Price>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Price {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity_tier: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct DeploymentBase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_crn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_crn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mccp_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broker: Option<Broker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supports_rc_migration: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_network: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Broker {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct TemplateMetaData {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_memory: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_cmd: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceMetaData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_catalog_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cf_runtime_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executable_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buildpack: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment_variables: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct SourceMetaData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A page of catalog entries.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct EntrySearchResult {
    #[serde(default)]
    pub offset: i64,
    #[serde(default)]
    pub limit: i64,
    /// Total number of matching entries across all pages.
    #[serde(default)]
    pub count: i64,
    /// Number of entries on this page.
    #[serde(default)]
    pub resource_count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default)]
    pub resources: Vec<CatalogEntry>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Visibility {
    /// `public`, `ibm_only` or `private`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrictions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extendable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<VisibilityDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<VisibilityDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved: Option<bool>,
}

/// Accounts a visibility rule applies to.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct VisibilityDetail {
    #[serde(default)]
    pub accounts: BTreeMap<String, String>,
}

/// Body of a visibility update.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct VisibilityUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrictions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extendable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<VisibilityDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<VisibilityDetail>,
}

/// Pricing of an entry, optionally for a single deployment.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct PricingGet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_price: Option<StartingPrice>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metrics: Vec<Metrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_region: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Metrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge_unit_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge_unit_quantity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge_unit_display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_cap_qty: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_cap: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_from: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_until: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub amounts: Vec<Amount>,
}

/// A page of pricing deployments.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct PricingSearchResult {
    #[serde(default)]
    pub offset: i64,
    #[serde(default)]
    pub limit: i64,
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub resource_count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default)]
    pub resources: Vec<PricingGet>,
}

/// A page of audit log messages.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct AuditSearchResult {
    #[serde(default)]
    pub offset: i64,
    #[serde(default)]
    pub limit: i64,
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub resource_count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default)]
    pub resources: Vec<Message>,
}

/// One change record in the audit log of an entry.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Message {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub who_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub who_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub who_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gid: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Artifacts {
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub resources: Vec<Artifact>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Artifact {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
}

/// Error body returned with non-2xx responses.
///
/// The service is not consistent about where the human readable message
/// lives, see [ErrorResponse::message].
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ErrorResponse {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "errorMessage", default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ErrorDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub more_info: Option<String>,
}

impl ErrorResponse {
    /// The most specific message in the body.
    ///
    /// Checked in order: the first entry of `errors`, `error`,
    /// `message`, `errorMessage`.
    pub fn message(&self) -> Option<&str> {
        self.errors
            .first()
            .and_then(|detail| detail.message.as_deref())
            .or(self.error.as_deref())
            .or(self.message.as_deref())
            .or(self.error_message.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn entry_id_accepts_generated_ids() {
        for id in [
            "a",
            "example-service",
            "0b8b9dd1-5a37-4d43-a4c1-d5b8f4f0c5f3",
            "crn:v1:entry.x_y",
        ] {
            assert!(id.parse::<CatalogEntryId>().is_ok(), "expected {id} to parse");
        }
    }

    #[test]
    fn entry_id_rejects_malformed_ids() {
        let too_long = "a".repeat(129);
        for id in ["", "-leading-dash", "has space", "slash/in/id", too_long.as_str()] {
            assert!(id.parse::<CatalogEntryId>().is_err(), "expected {id} to be rejected");
        }
    }

    #[test]
    fn error_message_prefers_errors_array() {
        let response: ErrorResponse = serde_json::from_value(json!({
            "errors": [{"code": "not_found", "message": "entry not found"}],
            "message": "fallback",
            "status_code": 404,
        }))
        .unwrap();
        assert_eq!(response.message(), Some("entry not found"));
    }

    #[test]
    fn error_message_falls_back_in_order() {
        let response: ErrorResponse =
            serde_json::from_value(json!({"errorMessage": "last resort", "code": 500})).unwrap();
        assert_eq!(response.message(), Some("last resort"));

        let response: ErrorResponse =
            serde_json::from_value(json!({"message": "plain", "errorMessage": "ignored"})).unwrap();
        assert_eq!(response.message(), Some("plain"));

        assert_eq!(ErrorResponse::default().message(), None);
    }

    #[test]
    fn metadata_keeps_unknown_blocks() {
        let value = json!({
            "version": "1.0.0",
            "other": {"anyKey": "anyValue"},
            "ui": {"hidden": true},
        });
        let metadata: ObjectMetadataSet = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(metadata.version.as_deref(), Some("1.0.0"));
        assert_eq!(metadata.extra.get("ui"), Some(&json!({"hidden": true})));
        assert_eq!(serde_json::to_value(&metadata).unwrap(), value);
    }

    #[test]
    fn entry_deserializes_server_fields() {
        let entry: CatalogEntry = serde_json::from_value(json!({
            "id": "example",
            "name": "example",
            "kind": "service",
            "tags": ["a", "b"],
            "url": "https://globalcatalog.example/api/v1/catalog/example",
            "created": "2019-01-01T12:00:00Z",
        }))
        .unwrap();
        assert_eq!(entry.tags, vec!["a".to_string(), "b".to_string()]);
        assert!(entry.overview_ui.is_empty());
        assert!(entry.created.is_some());
        assert!(!entry.disabled);
    }
}
