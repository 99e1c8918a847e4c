use progenitor_client::encode_path;
pub use progenitor_client::{ByteStream, Error, ResponseValue};
use reqwest::header::HeaderValue;

use crate::types;

/// Client for the Global Catalog API
///
/// The Global Catalog holds the entries (services, templates, plans, ...)
/// of the cloud catalog along with their visibility, pricing,
/// audit logs and artifacts.
///
/// Version: 1.0.0
#[derive(Clone, Debug)]
pub struct Client {
    pub(crate) baseurl: String,
    pub(crate) client: reqwest::Client,
}

impl Client {
    /// Create a new client.
    ///
    /// `baseurl` is the base URL provided to the internal
    /// `reqwest::Client`, and should include a scheme and hostname,
    /// as well as port and a path stem if applicable.
    pub fn new(baseurl: &str) -> Result<Self, reqwest::Error> {
        let dur = std::time::Duration::from_secs(15);
        let client = reqwest::ClientBuilder::new()
            .connect_timeout(dur)
            .timeout(dur)
            .build()?;
        Ok(Self::new_with_client(baseurl, client))
    }

    /// Construct a new client with an existing `reqwest::Client`,
    /// allowing more control over its configuration.
    pub fn new_with_client(baseurl: &str, client: reqwest::Client) -> Self {
        Self {
            baseurl: baseurl.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL to which requests are made.
    pub fn baseurl(&self) -> &String {
        &self.baseurl
    }

    /// Get the internal `reqwest::Client` used to make requests.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Get the version of this API.
    pub fn api_version(&self) -> &'static str {
        "1.0.0"
    }

    fn entry_url(&self, id: &types::CatalogEntryId) -> String {
        format!("{}/v1/catalog/{}", self.baseurl, encode_path(id))
    }

    fn artifact_url(&self, id: &types::CatalogEntryId, artifact_name: &str) -> String {
        format!(
            "{}/v1/catalog/{}/artifacts/{}",
            self.baseurl,
            encode_path(id),
            encode_path(artifact_name),
        )
    }
}

/// Statuses for which the service documents an [types::ErrorResponse] body.
fn is_documented_error(status: u16) -> bool {
    matches!(status, 400 | 401 | 403 | 404 | 409 | 410 | 412 | 422 | 500)
}

/// Classify a response with an error status.
///
/// Documented statuses become [Error::ErrorResponse] if the body holds an
/// [types::ErrorResponse]. Everything else, including documented statuses
/// with an empty, plain text or HTML body, becomes [Error::UnexpectedResponse]
/// with the original status and headers but without the body.
async fn error_response<T>(
    response: reqwest::Response,
) -> Result<T, Error<types::ErrorResponse>> {
    let status = response.status();
    if !is_documented_error(status.as_u16()) {
        return Err(Error::UnexpectedResponse(response));
    }

    let headers = response.headers().clone();
    let body = response.bytes().await.map_err(Error::ResponseBodyError)?;
    match serde_json::from_slice::<types::ErrorResponse>(&body) {
        Ok(parsed) => Err(Error::ErrorResponse(ResponseValue::new(
            parsed, status, headers,
        ))),
        Err(_) => {
            let mut bare = http::Response::new("response body omitted by error parsing");
            *bare.status_mut() = status;
            *bare.headers_mut() = headers;
            Err(Error::UnexpectedResponse(bare.into()))
        },
    }
}

fn push_account(query: &mut Vec<(&'static str, String)>, account: Option<&str>) {
    if let Some(v) = account {
        query.push(("account", v.to_string()));
    }
}

#[allow(clippy::too_many_arguments)]
impl Client {
    /**Create a catalog entry

The entry id is chosen by the caller and must not exist yet.

Sends a `POST` request to `/v1/catalog/{id}`

*/
    pub async fn create_catalog_entry<'a>(
        &'a self,
        id: &'a types::CatalogEntryId,
        account: Option<&'a str>,
        body: &'a types::CatalogEntry,
    ) -> Result<ResponseValue<types::CatalogEntry>, Error<types::ErrorResponse>> {
        let url = self.entry_url(id);
        let mut query = Vec::with_capacity(1usize);
        push_account(&mut query, account);
        let request = self
            .client
            .post(url)
            .header(
                reqwest::header::ACCEPT,
                HeaderValue::from_static("application/json"),
            )
            .query(&query)
            .json(&body)
            .build()?;
        let response = self.client.execute(request).await?;
        match response.status().as_u16() {
            201u16 => ResponseValue::from_response(response).await,
            _ => error_response(response).await,
        }
    }

    /**Get a specific catalog object

`complete` returns the fully expanded entry instead of a summary,
`depth` controls how many levels of children are included.

Sends a `GET` request to `/v1/catalog/{id}`

*/
    pub async fn get_catalog_entry<'a>(
        &'a self,
        id: &'a types::CatalogEntryId,
        account: Option<&'a str>,
        include: Option<&'a str>,
        languages: Option<&'a str>,
        complete: Option<bool>,
        depth: Option<i64>,
    ) -> Result<ResponseValue<types::CatalogEntry>, Error<types::ErrorResponse>> {
        let url = self.entry_url(id);
        let mut query = Vec::with_capacity(5usize);
        push_account(&mut query, account);
        if let Some(v) = &include {
            query.push(("include", v.to_string()));
        }
        if let Some(v) = &languages {
            query.push(("languages", v.to_string()));
        }
        if let Some(v) = &complete {
            query.push(("complete", v.to_string()));
        }
        if let Some(v) = &depth {
            query.push(("depth", v.to_string()));
        }
        let request = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                HeaderValue::from_static("application/json"),
            )
            .query(&query)
            .build()?;
        let response = self.client.execute(request).await?;
        match response.status().as_u16() {
            200u16 => ResponseValue::from_response(response).await,
            _ => error_response(response).await,
        }
    }

    /**Update a catalog entry

The body must carry the `url` of the entry as last returned by the service.

Sends a `PUT` request to `/v1/catalog/{id}`

*/
    pub async fn update_catalog_entry<'a>(
        &'a self,
        id: &'a types::CatalogEntryId,
        account: Option<&'a str>,
        move_: Option<&'a str>,
        body: &'a types::CatalogEntry,
    ) -> Result<ResponseValue<types::CatalogEntry>, Error<types::ErrorResponse>> {
        let url = self.entry_url(id);
        let mut query = Vec::with_capacity(2usize);
        push_account(&mut query, account);
        if let Some(v) = &move_ {
            query.push(("move", v.to_string()));
        }
        let request = self
            .client
            .put(url)
            .header(
                reqwest::header::ACCEPT,
                HeaderValue::from_static("application/json"),
            )
            .query(&query)
            .json(&body)
            .build()?;
        let response = self.client.execute(request).await?;
        match response.status().as_u16() {
            200u16 => ResponseValue::from_response(response).await,
            _ => error_response(response).await,
        }
    }

    /**Delete a catalog entry

Without `force` the entry is archived and can be restored.

Sends a `DELETE` request to `/v1/catalog/{id}`

*/
    pub async fn delete_catalog_entry<'a>(
        &'a self,
        id: &'a types::CatalogEntryId,
        account: Option<&'a str>,
        force: Option<bool>,
    ) -> Result<ResponseValue<()>, Error<types::ErrorResponse>> {
        let url = self.entry_url(id);
        let mut query = Vec::with_capacity(2usize);
        push_account(&mut query, account);
        if let Some(v) = &force {
            query.push(("force", v.to_string()));
        }
        let request = self
            .client
            .delete(url)
            .header(
                reqwest::header::ACCEPT,
                HeaderValue::from_static("application/json"),
            )
            .query(&query)
            .build()?;
        let response = self.client.execute(request).await?;
        match response.status().as_u16() {
            200u16 => Ok(ResponseValue::empty(response)),
            _ => error_response(response).await,
        }
    }

    /**Returns parent catalog entries

`q` is a structured filter such as `kind:template tag:example`.

Sends a `GET` request to `/v1/catalog`

*/
    pub async fn list_catalog_entries<'a>(
        &'a self,
        account: Option<&'a str>,
        include: Option<&'a str>,
        q: Option<&'a str>,
        sort_by: Option<&'a str>,
        descending: Option<bool>,
        languages: Option<&'a str>,
        catalog: Option<bool>,
        complete: Option<bool>,
        offset: Option<i64>,
        limit: Option<i64>,
    ) -> Result<ResponseValue<types::EntrySearchResult>, Error<types::ErrorResponse>> {
        let url = format!("{}/v1/catalog", self.baseurl);
        let mut query = Vec::with_capacity(10usize);
        push_account(&mut query, account);
        if let Some(v) = &include {
            query.push(("include", v.to_string()));
        }
        if let Some(v) = &q {
            query.push(("q", v.to_string()));
        }
        if let Some(v) = &sort_by {
            query.push(("sort-by", v.to_string()));
        }
        if let Some(v) = &descending {
            query.push(("descending", v.to_string()));
        }
        if let Some(v) = &languages {
            query.push(("languages", v.to_string()));
        }
        if let Some(v) = &catalog {
            query.push(("catalog", v.to_string()));
        }
        if let Some(v) = &complete {
            query.push(("complete", v.to_string()));
        }
        if let Some(v) = &offset {
            query.push(("offset", v.to_string()));
        }
        if let Some(v) = &limit {
            query.push(("limit", v.to_string()));
        }
        let request = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                HeaderValue::from_static("application/json"),
            )
            .query(&query)
            .build()?;
        let response = self.client.execute(request).await?;
        match response.status().as_u16() {
            200u16 => ResponseValue::from_response(response).await,
            _ => error_response(response).await,
        }
    }

    /**Get child catalog entries of a specific kind

`kind` may be `*` to return children of any kind.

Sends a `GET` request to `/v1/catalog/{id}/{kind}`

*/
    pub async fn get_child_objects<'a>(
        &'a self,
        id: &'a types::CatalogEntryId,
        kind: &'a str,
        account: Option<&'a str>,
        include: Option<&'a str>,
        q: Option<&'a str>,
        sort_by: Option<&'a str>,
        descending: Option<bool>,
        languages: Option<&'a str>,
        complete: Option<bool>,
        offset: Option<i64>,
        limit: Option<i64>,
    ) -> Result<ResponseValue<types::EntrySearchResult>, Error<types::ErrorResponse>> {
        let url = format!("{}/{}", self.entry_url(id), encode_path(kind));
        let mut query = Vec::with_capacity(9usize);
        push_account(&mut query, account);
        if let Some(v) = &include {
            query.push(("include", v.to_string()));
        }
        if let Some(v) = &q {
            query.push(("q", v.to_string()));
        }
        if let Some(v) = &sort_by {
            query.push(("sort-by", v.to_string()));
        }
        if let Some(v) = &descending {
            query.push(("descending", v.to_string()));
        }
        if let Some(v) = &languages {
            query.push(("languages", v.to_string()));
        }
        if let Some(v) = &complete {
            query.push(("complete", v.to_string()));
        }
        if let Some(v) = &offset {
            query.push(("offset", v.to_string()));
        }
        if let Some(v) = &limit {
            query.push(("limit", v.to_string()));
        }
        let request = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                HeaderValue::from_static("application/json"),
            )
            .query(&query)
            .build()?;
        let response = self.client.execute(request).await?;
        match response.status().as_u16() {
            200u16 => ResponseValue::from_response(response).await,
            _ => error_response(response).await,
        }
    }

    /**Restore archived catalog entry

Sends a `POST` request to `/v1/catalog/{id}/restore`

*/
    pub async fn restore_catalog_entry<'a>(
        &'a self,
        id: &'a types::CatalogEntryId,
        account: Option<&'a str>,
    ) -> Result<ResponseValue<()>, Error<types::ErrorResponse>> {
        let url = format!("{}/restore", self.entry_url(id));
        let mut query = Vec::with_capacity(1usize);
        push_account(&mut query, account);
        let request = self
            .client
            .post(url)
            .header(
                reqwest::header::ACCEPT,
                HeaderValue::from_static("application/json"),
            )
            .query(&query)
            .build()?;
        let response = self.client.execute(request).await?;
        match response.status().as_u16() {
            200u16 => Ok(ResponseValue::empty(response)),
            _ => error_response(response).await,
        }
    }

    /**Get the visibility constraints for an object

Sends a `GET` request to `/v1/catalog/{id}/visibility`

*/
    pub async fn get_visibility<'a>(
        &'a self,
        id: &'a types::CatalogEntryId,
        account: Option<&'a str>,
    ) -> Result<ResponseValue<types::Visibility>, Error<types::ErrorResponse>> {
        let url = format!("{}/visibility", self.entry_url(id));
        let mut query = Vec::with_capacity(1usize);
        push_account(&mut query, account);
        let request = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                HeaderValue::from_static("application/json"),
            )
            .query(&query)
            .build()?;
        let response = self.client.execute(request).await?;
        match response.status().as_u16() {
            200u16 => ResponseValue::from_response(response).await,
            _ => error_response(response).await,
        }
    }

    /**Update visibility

Sends a `PUT` request to `/v1/catalog/{id}/visibility`

*/
    pub async fn update_visibility<'a>(
        &'a self,
        id: &'a types::CatalogEntryId,
        account: Option<&'a str>,
        body: &'a types::VisibilityUpdate,
    ) -> Result<ResponseValue<()>, Error<types::ErrorResponse>> {
        let url = format!("{}/visibility", self.entry_url(id));
        let mut query = Vec::with_capacity(1usize);
        push_account(&mut query, account);
        let request = self
            .client
            .put(url)
            .header(
                reqwest::header::ACCEPT,
                HeaderValue::from_static("application/json"),
            )
            .query(&query)
            .json(&body)
            .build()?;
        let response = self.client.execute(request).await?;
        match response.status().as_u16() {
            200u16 => Ok(ResponseValue::empty(response)),
            _ => error_response(response).await,
        }
    }

    /**Get the pricing for an object

Sends a `GET` request to `/v1/catalog/{id}/pricing`

*/
    pub async fn get_pricing<'a>(
        &'a self,
        id: &'a types::CatalogEntryId,
        account: Option<&'a str>,
        deployment_region: Option<&'a str>,
    ) -> Result<ResponseValue<types::PricingGet>, Error<types::ErrorResponse>> {
        let url = format!("{}/pricing", self.entry_url(id));
        let mut query = Vec::with_capacity(2usize);
        push_account(&mut query, account);
        if let Some(v) = &deployment_region {
            query.push(("deployment_region", v.to_string()));
        }
        let request = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                HeaderValue::from_static("application/json"),
            )
            .query(&query)
            .build()?;
        let response = self.client.execute(request).await?;
        match response.status().as_u16() {
            200u16 => ResponseValue::from_response(response).await,
            _ => error_response(response).await,
        }
    }

    /**Get the pricing deployments for a plan

Sends a `GET` request to `/v1/catalog/{id}/pricing/deployment`

*/
    pub async fn get_pricing_deployments<'a>(
        &'a self,
        id: &'a types::CatalogEntryId,
        account: Option<&'a str>,
    ) -> Result<ResponseValue<types::PricingSearchResult>, Error<types::ErrorResponse>> {
        let url = format!("{}/pricing/deployment", self.entry_url(id));
        let mut query = Vec::with_capacity(1usize);
        push_account(&mut query, account);
        let request = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                HeaderValue::from_static("application/json"),
            )
            .query(&query)
            .build()?;
        let response = self.client.execute(request).await?;
        match response.status().as_u16() {
            200u16 => ResponseValue::from_response(response).await,
            _ => error_response(response).await,
        }
    }

    /**Get the audit logs for an object

`startat` is the id of the first message to return.

Sends a `GET` request to `/v1/catalog/{id}/logs`

*/
    pub async fn get_audit_logs<'a>(
        &'a self,
        id: &'a types::CatalogEntryId,
        account: Option<&'a str>,
        ascending: Option<bool>,
        startat: Option<&'a str>,
        offset: Option<i64>,
        limit: Option<i64>,
    ) -> Result<ResponseValue<types::AuditSearchResult>, Error<types::ErrorResponse>> {
        let url = format!("{}/logs", self.entry_url(id));
        let mut query = Vec::with_capacity(5usize);
        push_account(&mut query, account);
        if let Some(v) = &ascending {
            query.push(("ascending", v.to_string()));
        }
        if let Some(v) = &startat {
            query.push(("startat", v.to_string()));
        }
        if let Some(v) = &offset {
            query.push(("offset", v.to_string()));
        }
        if let Some(v) = &limit {
            query.push(("limit", v.to_string()));
        }
        let request = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                HeaderValue::from_static("application/json"),
            )
            .query(&query)
            .build()?;
        let response = self.client.execute(request).await?;
        match response.status().as_u16() {
            200u16 => ResponseValue::from_response(response).await,
            _ => error_response(response).await,
        }
    }

    /**Get artifacts

Sends a `GET` request to `/v1/catalog/{id}/artifacts`

*/
    pub async fn list_artifacts<'a>(
        &'a self,
        id: &'a types::CatalogEntryId,
        account: Option<&'a str>,
    ) -> Result<ResponseValue<types::Artifacts>, Error<types::ErrorResponse>> {
        let url = format!("{}/artifacts", self.entry_url(id));
        let mut query = Vec::with_capacity(1usize);
        push_account(&mut query, account);
        let request = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                HeaderValue::from_static("application/json"),
            )
            .query(&query)
            .build()?;
        let response = self.client.execute(request).await?;
        match response.status().as_u16() {
            200u16 => ResponseValue::from_response(response).await,
            _ => error_response(response).await,
        }
    }

    /**Get artifact

The body is returned as a raw byte stream;
its content type is in the response headers.

Sends a `GET` request to `/v1/catalog/{id}/artifacts/{artifact_id}`

*/
    pub async fn get_artifact<'a>(
        &'a self,
        id: &'a types::CatalogEntryId,
        artifact_id: &'a str,
        accept: Option<&'a str>,
        account: Option<&'a str>,
    ) -> Result<ResponseValue<ByteStream>, Error<types::ErrorResponse>> {
        let url = self.artifact_url(id, artifact_id);
        let mut query = Vec::with_capacity(1usize);
        push_account(&mut query, account);
        let request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, accept.unwrap_or("*/*"))
            .query(&query)
            .build()?;
        let response = self.client.execute(request).await?;
        match response.status().as_u16() {
            200u16 => Ok(ResponseValue::stream(response)),
            _ => error_response(response).await,
        }
    }

    /**Upload artifact

Sends a `PUT` request to `/v1/catalog/{id}/artifacts/{artifact_id}`

*/
    pub async fn upload_artifact<'a, B: Into<reqwest::Body>>(
        &'a self,
        id: &'a types::CatalogEntryId,
        artifact_id: &'a str,
        content_type: &'a str,
        body: B,
        account: Option<&'a str>,
    ) -> Result<ResponseValue<()>, Error<types::ErrorResponse>> {
        let url = self.artifact_url(id, artifact_id);
        let mut query = Vec::with_capacity(1usize);
        push_account(&mut query, account);
        let request = self
            .client
            .put(url)
            .header(
                reqwest::header::ACCEPT,
                HeaderValue::from_static("application/json"),
            )
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .query(&query)
            .body(body)
            .build()?;
        let response = self.client.execute(request).await?;
        match response.status().as_u16() {
            200u16 => Ok(ResponseValue::empty(response)),
            _ => error_response(response).await,
        }
    }

    /**Delete artifact

Sends a `DELETE` request to `/v1/catalog/{id}/artifacts/{artifact_id}`

*/
    pub async fn delete_artifact<'a>(
        &'a self,
        id: &'a types::CatalogEntryId,
        artifact_id: &'a str,
        account: Option<&'a str>,
    ) -> Result<ResponseValue<()>, Error<types::ErrorResponse>> {
        let url = self.artifact_url(id, artifact_id);
        let mut query = Vec::with_capacity(1usize);
        push_account(&mut query, account);
        let request = self
            .client
            .delete(url)
            .header(
                reqwest::header::ACCEPT,
                HeaderValue::from_static("application/json"),
            )
            .query(&query)
            .build()?;
        let response = self.client.execute(request).await?;
        match response.status().as_u16() {
            200u16 => Ok(ResponseValue::empty(response)),
            _ => error_response(response).await,
        }
    }
}
