//! Catalog client wrapper around the low-level API client.

use std::fmt::Debug;
use std::future::{ready, Future};
use std::num::NonZeroU32;
use std::str::FromStr;
use std::time::Duration;

use async_stream::try_stream;
use futures::stream::Stream;
use futures::{StreamExt, TryStreamExt};
use global_catalog_api_v1::types::{self as api_types};
use global_catalog_api_v1::Client as APIClient;
use reqwest::header::{self, HeaderMap};
use tracing::{debug, instrument};

use crate::auth::AuthStrategy;
use crate::config::CatalogClientConfig;
use crate::error::{not_found_as, CatalogClientError, ValidationError};
use crate::mock::MockGuard;
use crate::types::*;
use crate::MapApiErrorExt;

/// Largest page the service hands out.
const RESPONSE_PAGE_SIZE: NonZeroU32 = NonZeroU32::new(200).unwrap();

/// A client for the Global Catalog service.
///
/// This is a wrapper around the low-level APIClient that handles:
/// - HTTP client configuration with timeouts
/// - Authentication headers
/// - Mapping transport and API errors into [CatalogClientError]
/// - Mock server recording/replay for testing
pub struct CatalogClient {
    client: APIClient,
    config: CatalogClientConfig,

    _mock_guard: Option<MockGuard>,
}

impl Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("service_url", &self.config.service_url)
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Create a new catalog client from configuration.
    pub fn new(config: CatalogClientConfig) -> Result<Self, CatalogClientError> {
        // create a mock server if configured
        let mock_guard = MockGuard::new(&config);
        let effective_url = match mock_guard {
            Some(ref mock) => mock.url(),
            None => config.service_url.clone(),
        };

        let http_client = build_http_client(&config)?;
        let client = APIClient::new_with_client(&effective_url, http_client);

        Ok(Self {
            client,
            config,
            _mock_guard: mock_guard,
        })
    }

    /// Access the underlying API client for making requests.
    pub fn api(&self) -> &APIClient {
        &self.client
    }

    /// Get the configured service URL.
    pub fn service_url(&self) -> &str {
        &self.config.service_url
    }

    fn account(&self) -> Option<&str> {
        self.config.account.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Catalog trait
// ---------------------------------------------------------------------------

/// The complete catalog API interface.
///
/// One operation per endpoint of the service.
/// Every operation is a single request/response round trip;
/// errors are returned to the caller unmodified.
#[allow(async_fn_in_trait)]
pub trait CatalogOperations {
    /// Create a catalog entry under the id chosen by the caller.
    async fn create_entry(
        &self,
        entry: &NewCatalogEntry,
    ) -> Result<Response<CatalogEntry>, CatalogClientError>;

    /// Get a catalog entry.
    async fn get_entry(
        &self,
        id: impl AsRef<str> + Send + Sync,
        options: &GetEntryOptions,
    ) -> Result<Response<CatalogEntry>, CatalogClientError>;

    /// Update a catalog entry; requires the current `url` of the entry.
    async fn update_entry(
        &self,
        entry: &UpdatedCatalogEntry,
    ) -> Result<Response<CatalogEntry>, CatalogClientError>;

    /// Get one page of top level entries.
    async fn list_entries(
        &self,
        options: &ListOptions,
    ) -> Result<Response<EntrySearchResult>, CatalogClientError>;

    /// Collect entries matching `q` across pages, up to `limit` entries.
    async fn search_entries(
        &self,
        q: impl AsRef<str> + Send + Sync,
        complete: bool,
        limit: SearchLimit,
    ) -> Result<SearchResults, CatalogClientError>;

    /// Get one page of the children of an entry; `kind` may be `*`.
    async fn get_child_objects(
        &self,
        id: impl AsRef<str> + Send + Sync,
        kind: impl AsRef<str> + Send + Sync,
        options: &ListOptions,
    ) -> Result<Response<EntrySearchResult>, CatalogClientError>;

    /// Restore a soft deleted entry.
    async fn restore_entry(
        &self,
        id: impl AsRef<str> + Send + Sync,
    ) -> Result<Response<()>, CatalogClientError>;

    async fn get_visibility(
        &self,
        id: impl AsRef<str> + Send + Sync,
    ) -> Result<Response<Visibility>, CatalogClientError>;

    async fn update_visibility(
        &self,
        id: impl AsRef<str> + Send + Sync,
        visibility: &VisibilityUpdate,
    ) -> Result<Response<()>, CatalogClientError>;

    async fn get_pricing(
        &self,
        id: impl AsRef<str> + Send + Sync,
    ) -> Result<Response<PricingGet>, CatalogClientError>;

    async fn get_pricing_deployments(
        &self,
        id: impl AsRef<str> + Send + Sync,
    ) -> Result<Response<PricingSearchResult>, CatalogClientError>;

    async fn get_audit_logs(
        &self,
        id: impl AsRef<str> + Send + Sync,
        options: &AuditLogOptions,
    ) -> Result<Response<AuditSearchResult>, CatalogClientError>;

    async fn upload_artifact(
        &self,
        id: impl AsRef<str> + Send + Sync,
        name: impl AsRef<str> + Send + Sync,
        content: Vec<u8>,
        content_type: impl AsRef<str> + Send + Sync,
    ) -> Result<Response<()>, CatalogClientError>;

    /// Download an artifact; the body is read completely before returning.
    async fn get_artifact(
        &self,
        id: impl AsRef<str> + Send + Sync,
        name: impl AsRef<str> + Send + Sync,
    ) -> Result<Response<ArtifactContent>, CatalogClientError>;

    async fn list_artifacts(
        &self,
        id: impl AsRef<str> + Send + Sync,
    ) -> Result<Response<Artifacts>, CatalogClientError>;

    async fn delete_artifact(
        &self,
        id: impl AsRef<str> + Send + Sync,
        name: impl AsRef<str> + Send + Sync,
    ) -> Result<Response<()>, CatalogClientError>;

    /// Delete an entry; without `force` the entry can be restored.
    async fn delete_entry(
        &self,
        id: impl AsRef<str> + Send + Sync,
        force: bool,
    ) -> Result<Response<()>, CatalogClientError>;
}

// ---------------------------------------------------------------------------
// CatalogOperations implementation for CatalogClient
// ---------------------------------------------------------------------------

impl CatalogOperations for CatalogClient {
    #[instrument(skip_all, fields(id = %entry.id, kind = %entry.kind))]
    async fn create_entry(
        &self,
        entry: &NewCatalogEntry,
    ) -> Result<Response<CatalogEntry>, CatalogClientError> {
        let id = str_to_entry_id(&entry.id)?;
        require("name", &entry.name)?;
        require("kind", &entry.kind)?;
        if entry.overview_ui.is_empty() {
            return Err(ValidationError::MissingField("overview_ui").into());
        }

        let body = api_types::CatalogEntry::from(entry.clone());
        let response = self
            .client
            .create_catalog_entry(&id, self.account(), &body)
            .await
            .map_api_error()
            .await?;

        debug!("created catalog entry");
        Ok(response.into())
    }

    #[instrument(skip_all, fields(id = %id.as_ref()))]
    async fn get_entry(
        &self,
        id: impl AsRef<str> + Send + Sync,
        options: &GetEntryOptions,
    ) -> Result<Response<CatalogEntry>, CatalogClientError> {
        let id = str_to_entry_id(id)?;
        let response = self
            .client
            .get_catalog_entry(
                &id,
                self.account(),
                options.include.as_deref(),
                options.languages.as_deref(),
                options.complete,
                options.depth,
            )
            .await
            .map_api_error()
            .await
            .map_err(not_found_as(format!("catalog entry '{id}'")))?;
        Ok(response.into())
    }

    #[instrument(skip_all, fields(id = %entry.id))]
    async fn update_entry(
        &self,
        entry: &UpdatedCatalogEntry,
    ) -> Result<Response<CatalogEntry>, CatalogClientError> {
        let id = str_to_entry_id(&entry.id)?;
        require("name", &entry.name)?;
        require("kind", &entry.kind)?;
        require("url", &entry.url)?;

        let body = api_types::CatalogEntry::from(entry.clone());
        let response = self
            .client
            .update_catalog_entry(&id, self.account(), entry.move_to.as_deref(), &body)
            .await
            .map_api_error()
            .await
            .map_err(not_found_as(format!("catalog entry '{id}'")))?;

        debug!("updated catalog entry");
        Ok(response.into())
    }

    async fn list_entries(
        &self,
        options: &ListOptions,
    ) -> Result<Response<EntrySearchResult>, CatalogClientError> {
        debug!(?options, "listing catalog entries");
        let response = self
            .client
            .list_catalog_entries(
                self.account(),
                options.include.as_deref(),
                options.q.as_deref(),
                options.sort_by.as_deref(),
                options.descending,
                options.languages.as_deref(),
                options.catalog,
                options.complete,
                options.offset,
                options.limit,
            )
            .await
            .map_api_error()
            .await?;
        Ok(response.into())
    }

    #[instrument(skip_all, fields(q = %q.as_ref()))]
    async fn search_entries(
        &self,
        q: impl AsRef<str> + Send + Sync,
        complete: bool,
        limit: SearchLimit,
    ) -> Result<SearchResults, CatalogClientError> {
        let q = q.as_ref();
        let page_size = limit
            .unwrap_or(RESPONSE_PAGE_SIZE)
            .min(RESPONSE_PAGE_SIZE);

        let stream = make_depaging_stream(
            |offset, page_size| async move {
                let page = self
                    .list_entries(&ListOptions {
                        q: Some(q.to_string()),
                        complete: Some(complete),
                        offset: Some(offset),
                        limit: Some(page_size),
                        ..Default::default()
                    })
                    .await?
                    .into_inner();
                Ok::<_, CatalogClientError>((page.count, page.resources))
            },
            page_size,
        );

        let (count, results) = collect_search_results(stream, limit).await?;
        debug!(n_results = results.len(), ?count, "collected search results");
        Ok(SearchResults { results, count })
    }

    #[instrument(skip_all, fields(id = %id.as_ref(), kind = %kind.as_ref()))]
    async fn get_child_objects(
        &self,
        id: impl AsRef<str> + Send + Sync,
        kind: impl AsRef<str> + Send + Sync,
        options: &ListOptions,
    ) -> Result<Response<EntrySearchResult>, CatalogClientError> {
        let id = str_to_entry_id(id)?;
        require("kind", kind.as_ref())?;
        let response = self
            .client
            .get_child_objects(
                &id,
                kind.as_ref(),
                self.account(),
                options.include.as_deref(),
                options.q.as_deref(),
                options.sort_by.as_deref(),
                options.descending,
                options.languages.as_deref(),
                options.complete,
                options.offset,
                options.limit,
            )
            .await
            .map_api_error()
            .await
            .map_err(not_found_as(format!("catalog entry '{id}'")))?;
        Ok(response.into())
    }

    #[instrument(skip_all, fields(id = %id.as_ref()))]
    async fn restore_entry(
        &self,
        id: impl AsRef<str> + Send + Sync,
    ) -> Result<Response<()>, CatalogClientError> {
        let id = str_to_entry_id(id)?;
        let response = self
            .client
            .restore_catalog_entry(&id, self.account())
            .await
            .map_api_error()
            .await
            .map_err(not_found_as(format!("catalog entry '{id}'")))?;

        debug!("restored catalog entry");
        Ok(response.into())
    }

    async fn get_visibility(
        &self,
        id: impl AsRef<str> + Send + Sync,
    ) -> Result<Response<Visibility>, CatalogClientError> {
        let id = str_to_entry_id(id)?;
        let response = self
            .client
            .get_visibility(&id, self.account())
            .await
            .map_api_error()
            .await
            .map_err(not_found_as(format!("visibility of '{id}'")))?;
        Ok(response.into())
    }

    #[instrument(skip_all, fields(id = %id.as_ref()))]
    async fn update_visibility(
        &self,
        id: impl AsRef<str> + Send + Sync,
        visibility: &VisibilityUpdate,
    ) -> Result<Response<()>, CatalogClientError> {
        let id = str_to_entry_id(id)?;
        let response = self
            .client
            .update_visibility(&id, self.account(), visibility)
            .await
            .map_api_error()
            .await
            .map_err(not_found_as(format!("visibility of '{id}'")))?;

        debug!(restrictions = ?visibility.restrictions, "updated visibility");
        Ok(response.into())
    }

    async fn get_pricing(
        &self,
        id: impl AsRef<str> + Send + Sync,
    ) -> Result<Response<PricingGet>, CatalogClientError> {
        let id = str_to_entry_id(id)?;
        let response = self
            .client
            .get_pricing(&id, self.account(), None)
            .await
            .map_api_error()
            .await
            .map_err(not_found_as(format!("pricing of '{id}'")))?;
        Ok(response.into())
    }

    async fn get_pricing_deployments(
        &self,
        id: impl AsRef<str> + Send + Sync,
    ) -> Result<Response<PricingSearchResult>, CatalogClientError> {
        let id = str_to_entry_id(id)?;
        let response = self
            .client
            .get_pricing_deployments(&id, self.account())
            .await
            .map_api_error()
            .await
            .map_err(not_found_as(format!("pricing deployments of '{id}'")))?;
        Ok(response.into())
    }

    async fn get_audit_logs(
        &self,
        id: impl AsRef<str> + Send + Sync,
        options: &AuditLogOptions,
    ) -> Result<Response<AuditSearchResult>, CatalogClientError> {
        let id = str_to_entry_id(id)?;
        let response = self
            .client
            .get_audit_logs(
                &id,
                self.account(),
                options.ascending,
                options.startat.as_deref(),
                options.offset,
                options.limit,
            )
            .await
            .map_api_error()
            .await
            .map_err(not_found_as(format!("audit logs of '{id}'")))?;
        Ok(response.into())
    }

    #[instrument(skip_all, fields(id = %id.as_ref(), name = %name.as_ref(), size = content.len()))]
    async fn upload_artifact(
        &self,
        id: impl AsRef<str> + Send + Sync,
        name: impl AsRef<str> + Send + Sync,
        content: Vec<u8>,
        content_type: impl AsRef<str> + Send + Sync,
    ) -> Result<Response<()>, CatalogClientError> {
        let id = str_to_entry_id(id)?;
        let name = validate_artifact_name(name.as_ref())?;
        require("content_type", content_type.as_ref())?;

        let response = self
            .client
            .upload_artifact(&id, name, content_type.as_ref(), content, self.account())
            .await
            .map_api_error()
            .await
            .map_err(not_found_as(format!("catalog entry '{id}'")))?;

        debug!("uploaded artifact");
        Ok(response.into())
    }

    #[instrument(skip_all, fields(id = %id.as_ref(), name = %name.as_ref()))]
    async fn get_artifact(
        &self,
        id: impl AsRef<str> + Send + Sync,
        name: impl AsRef<str> + Send + Sync,
    ) -> Result<Response<ArtifactContent>, CatalogClientError> {
        let id = str_to_entry_id(id)?;
        let name = validate_artifact_name(name.as_ref())?;

        let response: Response<_> = self
            .client
            .get_artifact(&id, name, None, self.account())
            .await
            .map_api_error()
            .await
            .map_err(not_found_as(format!("artifact '{name}' of '{id}'")))?
            .into();

        let content_type = response
            .transport
            .headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string);

        let Response { result, transport } = response;
        let mut stream = result.into_inner();
        let mut bytes = Vec::new();
        while let Some(chunk) = stream
            .try_next()
            .await
            .map_err(CatalogClientError::Transport)?
        {
            bytes.extend_from_slice(&chunk);
        }

        debug!(size = bytes.len(), ?content_type, "downloaded artifact");
        Ok(Response {
            result: ArtifactContent {
                content_type,
                bytes,
            },
            transport,
        })
    }

    async fn list_artifacts(
        &self,
        id: impl AsRef<str> + Send + Sync,
    ) -> Result<Response<Artifacts>, CatalogClientError> {
        let id = str_to_entry_id(id)?;
        let response = self
            .client
            .list_artifacts(&id, self.account())
            .await
            .map_api_error()
            .await
            .map_err(not_found_as(format!("catalog entry '{id}'")))?;
        Ok(response.into())
    }

    #[instrument(skip_all, fields(id = %id.as_ref(), name = %name.as_ref()))]
    async fn delete_artifact(
        &self,
        id: impl AsRef<str> + Send + Sync,
        name: impl AsRef<str> + Send + Sync,
    ) -> Result<Response<()>, CatalogClientError> {
        let id = str_to_entry_id(id)?;
        let name = validate_artifact_name(name.as_ref())?;
        let response = self
            .client
            .delete_artifact(&id, name, self.account())
            .await
            .map_api_error()
            .await
            .map_err(not_found_as(format!("artifact '{name}' of '{id}'")))?;

        debug!("deleted artifact");
        Ok(response.into())
    }

    #[instrument(skip_all, fields(id = %id.as_ref(), force))]
    async fn delete_entry(
        &self,
        id: impl AsRef<str> + Send + Sync,
        force: bool,
    ) -> Result<Response<()>, CatalogClientError> {
        let id = str_to_entry_id(id)?;
        let response = self
            .client
            .delete_catalog_entry(&id, self.account(), Some(force))
            .await
            .map_api_error()
            .await
            .map_err(not_found_as(format!("catalog entry '{id}'")))?;

        debug!("deleted catalog entry");
        Ok(response.into())
    }
}

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// Converts an entry id to a semantic type with API format validation.
pub fn str_to_entry_id(
    id: impl AsRef<str>,
) -> Result<api_types::CatalogEntryId, CatalogClientError> {
    api_types::CatalogEntryId::from_str(id.as_ref()).map_err(|source| {
        ValidationError::InvalidId {
            id: id.as_ref().to_string(),
            source,
        }
        .into()
    })
}

fn validate_artifact_name(name: &str) -> Result<&str, CatalogClientError> {
    if name.is_empty() || name.contains('/') || name.trim() != name {
        return Err(ValidationError::InvalidArtifactName(name.to_string()).into());
    }
    Ok(name)
}

fn require(field: &'static str, value: &str) -> Result<(), CatalogClientError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field).into());
    }
    Ok(())
}

/// Collects a stream of results into a container, returning the total count.
async fn collect_search_results<T, E>(
    stream: impl Stream<Item = Result<StreamItem<T>, E>>,
    limit: SearchLimit,
) -> Result<(ResultCount, Vec<T>), E> {
    let mut count = None;
    let actual_limit = if let Some(checked_limit) = limit {
        checked_limit.get() as usize
    } else {
        usize::MAX
    };
    let results = stream
        .try_filter_map(|item| {
            let new_item = match item {
                StreamItem::TotalCount(total) => {
                    count = Some(total);
                    None
                },
                StreamItem::Result(res) => Some(res),
            };
            ready(Ok(new_item))
        })
        .take(actual_limit)
        .try_collect::<Vec<_>>()
        .await?;
    Ok((count, results))
}

#[derive(Debug, Clone, PartialEq)]
enum StreamItem<T> {
    TotalCount(u64),
    Result(T),
}

impl<T> From<T> for StreamItem<T> {
    fn from(value: T) -> Self {
        Self::Result(value)
    }
}

/// Create a depaging stream from a page-fetching function.
///
/// Takes a function that returns `(total_count, items)` for a given
/// `(offset, limit)`, and yields `TotalCount` once followed by all
/// `Result` items across pages.
fn make_depaging_stream<T, E, Fut>(
    generator: impl Fn(i64, i64) -> Fut,
    page_size: NonZeroU32,
) -> impl Stream<Item = Result<StreamItem<T>, E>>
where
    Fut: Future<Output = Result<(i64, Vec<T>), E>>,
{
    try_stream! {
        let page_size = i64::from(page_size.get());
        let mut offset = 0;
        let mut total_count_yielded = false;

        loop {
            let (total_count, results) = generator(offset, page_size).await?;

            let items_on_page = results.len() as i64;

            if !total_count_yielded {
                yield StreamItem::TotalCount(total_count.max(0) as u64);
                total_count_yielded = true;
            }

            for result in results {
                yield StreamItem::Result(result)
            }

            if items_on_page < page_size {
                break;
            }
            offset += items_on_page;
            if offset >= total_count {
                break;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// HTTP client builder
// ---------------------------------------------------------------------------

/// Build HTTP client with authentication and extra headers for the catalog API.
fn build_http_client(config: &CatalogClientConfig) -> Result<reqwest::Client, CatalogClientError> {
    let mut headers = HeaderMap::new();

    config
        .auth
        .add_auth_headers(&mut headers)
        .map_err(|e| CatalogClientError::Other(e.to_string()))?;

    for (key, value) in &config.extra_headers {
        headers.insert(
            header::HeaderName::from_str(key).map_err(
                |e: reqwest::header::InvalidHeaderName| CatalogClientError::Other(e.to_string()),
            )?,
            header::HeaderValue::from_str(value).map_err(
                |e: reqwest::header::InvalidHeaderValue| CatalogClientError::Other(e.to_string()),
            )?,
        );
    }

    debug!(
        service_url = %config.service_url,
        auth = ?config.auth,
        extra_headers = config.extra_headers.len(),
        timeout_secs = config.timeout_secs,
        "building catalog HTTP client"
    );

    let client_builder = reqwest::Client::builder()
        .default_headers(headers)
        .connect_timeout(Duration::from_secs(15))
        .timeout(Duration::from_secs(config.timeout_secs));

    let client_builder = if let Some(ref user_agent) = config.user_agent {
        client_builder.user_agent(user_agent)
    } else {
        client_builder
    };

    client_builder
        .build()
        .map_err(|e| CatalogClientError::Other(e.to_string()))
}
