//! Catalog interaction types.
//!
//! These types describe the inputs and results of catalog operations,
//! wrapping the API types where the client needs richer semantics.

use std::collections::BTreeMap;
use std::num::NonZeroU32;

use global_catalog_api_v1::types as api_types;
pub use global_catalog_api_v1::types::{
    Artifact,
    Artifacts,
    AuditSearchResult,
    CatalogEntry,
    CatalogEntryId,
    EntrySearchResult,
    Image,
    Message as AuditLogEntry,
    ObjectMetadataSet,
    Overview,
    PricingGet,
    PricingSearchResult,
    Provider,
    Visibility,
    VisibilityDetail,
    VisibilityUpdate,
};
use global_catalog_api_v1::ResponseValue;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Status and headers of the HTTP exchange behind a result.
#[derive(Debug, Clone)]
pub struct Transport {
    pub status: StatusCode,
    pub headers: HeaderMap,
}

/// A successful operation result together with its [Transport] metadata.
#[derive(Debug, Clone)]
pub struct Response<T> {
    pub result: T,
    pub transport: Transport,
}

impl<T> Response<T> {
    pub fn status(&self) -> StatusCode {
        self.transport.status
    }

    pub fn into_inner(self) -> T {
        self.result
    }
}

impl<T> From<ResponseValue<T>> for Response<T> {
    fn from(value: ResponseValue<T>) -> Self {
        let transport = Transport {
            status: value.status(),
            headers: value.headers().clone(),
        };
        Response {
            result: value.into_inner(),
            transport,
        }
    }
}

/// Content of an artifact, fully read from the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactContent {
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Result / pagination types
// ---------------------------------------------------------------------------

pub type SearchLimit = Option<NonZeroU32>;
pub type ResultCount = Option<u64>;

/// Generic paginated result container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsPage<T> {
    pub results: Vec<T>,
    pub count: ResultCount,
}

pub type SearchResults = ResultsPage<CatalogEntry>;

// ---------------------------------------------------------------------------
// Operation inputs
// ---------------------------------------------------------------------------

/// A catalog entry to be created.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewCatalogEntry {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub overview_ui: BTreeMap<String, Overview>,
    pub images: Image,
    pub disabled: bool,
    pub tags: Vec<String>,
    pub provider: Provider,
    pub parent_id: Option<String>,
    pub group: Option<bool>,
    pub active: Option<bool>,
    pub metadata: Option<ObjectMetadataSet>,
}

impl From<NewCatalogEntry> for api_types::CatalogEntry {
    fn from(entry: NewCatalogEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.name,
            kind: entry.kind,
            overview_ui: entry.overview_ui,
            images: entry.images,
            parent_id: entry.parent_id,
            disabled: entry.disabled,
            tags: entry.tags,
            group: entry.group,
            provider: entry.provider,
            active: entry.active,
            metadata: entry.metadata,
            ..Default::default()
        }
    }
}

/// New state of an existing catalog entry.
///
/// `url` must be the self link of the entry as last returned by the service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdatedCatalogEntry {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub overview_ui: BTreeMap<String, Overview>,
    pub images: Image,
    pub disabled: bool,
    pub tags: Vec<String>,
    pub provider: Provider,
    pub group: Option<bool>,
    pub active: Option<bool>,
    pub metadata: Option<ObjectMetadataSet>,
    pub url: String,
    /// Move the entry under a new parent.
    pub move_to: Option<String>,
}

impl UpdatedCatalogEntry {
    /// Start an update from the current state of an entry.
    pub fn from_current(entry: &CatalogEntry) -> Self {
        Self {
            id: entry.id.clone(),
            name: entry.name.clone(),
            kind: entry.kind.clone(),
            overview_ui: entry.overview_ui.clone(),
            images: entry.images.clone(),
            disabled: entry.disabled,
            tags: entry.tags.clone(),
            provider: entry.provider.clone(),
            group: entry.group,
            active: entry.active,
            metadata: entry.metadata.clone(),
            url: entry.url.clone().unwrap_or_default(),
            move_to: None,
        }
    }
}

impl From<UpdatedCatalogEntry> for api_types::CatalogEntry {
    fn from(entry: UpdatedCatalogEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.name,
            kind: entry.kind,
            overview_ui: entry.overview_ui,
            images: entry.images,
            disabled: entry.disabled,
            tags: entry.tags,
            group: entry.group,
            provider: entry.provider,
            active: entry.active,
            metadata: entry.metadata,
            url: Some(entry.url),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetEntryOptions {
    /// Return the fully expanded entry rather than a summary.
    pub complete: Option<bool>,
    /// `|` separated list of fields to include, e.g. `metadata.pricing`.
    pub include: Option<String>,
    pub languages: Option<String>,
    pub depth: Option<i64>,
}

impl GetEntryOptions {
    pub fn complete() -> Self {
        Self {
            complete: Some(true),
            ..Default::default()
        }
    }
}

/// Options for listing entries and child objects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    /// Filter such as `kind:template tag:example-tag-1`.
    pub q: Option<String>,
    pub complete: Option<bool>,
    pub include: Option<String>,
    pub sort_by: Option<String>,
    pub descending: Option<bool>,
    pub languages: Option<String>,
    /// Only return entries of the account's private catalog.
    pub catalog: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditLogOptions {
    pub ascending: Option<bool>,
    /// Id of the first message to return.
    pub startat: Option<String>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn update_from_current_keeps_url() {
        let current = CatalogEntry {
            id: "entry".into(),
            name: "entry".into(),
            kind: "service".into(),
            tags: vec!["tag".into()],
            url: Some("https://catalog.example/v1/catalog/entry".into()),
            ..Default::default()
        };

        let update = UpdatedCatalogEntry::from_current(&current);
        assert_eq!(update.url, "https://catalog.example/v1/catalog/entry");
        assert_eq!(update.tags, vec!["tag".to_string()]);

        let body = api_types::CatalogEntry::from(update);
        assert_eq!(body.url, current.url);
        assert_eq!(body.catalog_crn, None);
    }

    #[test]
    fn new_entry_drops_server_fields() {
        let entry = NewCatalogEntry {
            id: "entry".into(),
            name: "entry".into(),
            kind: "template".into(),
            ..Default::default()
        };
        let body = serde_json::to_value(api_types::CatalogEntry::from(entry)).unwrap();
        assert!(body.get("url").is_none());
        assert!(body.get("created").is_none());
        assert_eq!(body["kind"], "template");
    }
}
