//! The example lifecycle of a catalog entry.
//!
//! Every step prints the JSON it got back and checks the HTTP status.
//! The first failing step ends the run.

use std::collections::BTreeMap;

use anyhow::{ensure, Context, Result};
use global_catalog::types::{
    AuditLogOptions,
    CatalogEntry,
    GetEntryOptions,
    Image,
    ListOptions,
    NewCatalogEntry,
    ObjectMetadataSet,
    Overview,
    Provider,
    Response,
    UpdatedCatalogEntry,
    VisibilityUpdate,
};
use global_catalog::CatalogOperations;
use serde::Serialize;
use tracing::{debug, instrument};

const ARTIFACT_NAME: &str = "artifact.txt";
const ARTIFACT_CONTENT: &[u8] = b"This is an example artifact.";
const TAG: &str = "example-tag-1";
const UPDATED_TAG: &str = "example-tag-2";
const SEARCH_QUERY: &str = "kind:template tag:example-tag-1";

/// Run all steps against `client` for a new entry `id`.
///
/// The entry is deleted at the end unless `keep` is set.
pub async fn run(client: &impl CatalogOperations, id: &str, keep: bool) -> Result<()> {
    let created = create_and_get(client, id).await?;
    update_and_search(client, &created).await?;
    delete_and_restore(client, id).await?;
    sub_resources(client, id).await?;
    artifacts(client, id).await?;

    if keep {
        println!("keeping entry '{id}'");
        return Ok(());
    }
    let deleted = client
        .delete_entry(id, true)
        .await
        .context("failed to delete entry")?;
    check_status("delete entry", &deleted, 200)?;
    println!("deleted entry '{id}'");
    Ok(())
}

fn new_entry(id: &str) -> NewCatalogEntry {
    NewCatalogEntry {
        id: id.to_string(),
        name: id.to_string(),
        kind: "template".to_string(),
        overview_ui: BTreeMap::from([("en".to_string(), Overview {
            display_name: "Example Entry".to_string(),
            description: "An example catalog entry".to_string(),
            long_description: "An example catalog entry created by the client example".to_string(),
            featured_description: None,
        })]),
        images: Image {
            image: "https://globalcatalog.test.cloud.ibm.com/api/v1/1G4QLBFY/artifacts/image.svg"
                .to_string(),
            ..Default::default()
        },
        disabled: false,
        tags: vec![TAG.to_string()],
        provider: Provider {
            name: "Example Provider".to_string(),
            email: "provider@example.com".to_string(),
            ..Default::default()
        },
        active: Some(true),
        metadata: Some(ObjectMetadataSet {
            version: Some("1.0.0".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[instrument(skip(client))]
async fn create_and_get(client: &impl CatalogOperations, id: &str) -> Result<CatalogEntry> {
    let created = client
        .create_entry(&new_entry(id))
        .await
        .context("failed to create entry")?;
    check_status("create entry", &created, 201)?;
    print_json("created entry", &created.result)?;

    let fetched = client
        .get_entry(id, &GetEntryOptions::complete())
        .await
        .context("failed to get entry")?;
    check_status("get entry", &fetched, 200)?;
    print_json("entry", &fetched.result)?;

    Ok(fetched.into_inner())
}

#[instrument(skip_all, fields(id = %current.id))]
async fn update_and_search(client: &impl CatalogOperations, current: &CatalogEntry) -> Result<()> {
    let mut update = UpdatedCatalogEntry::from_current(current);
    update.tags.push(UPDATED_TAG.to_string());
    if let Some(overview) = update.overview_ui.get_mut("en") {
        overview.display_name = "Updated Example Entry".to_string();
    }
    update.metadata = Some(ObjectMetadataSet {
        version: Some("1.0.1".to_string()),
        ..update.metadata.unwrap_or_default()
    });

    let updated = client
        .update_entry(&update)
        .await
        .context("failed to update entry")?;
    check_status("update entry", &updated, 200)?;
    print_json("updated entry", &updated.result)?;

    let found = client
        .list_entries(&ListOptions {
            q: Some(SEARCH_QUERY.to_string()),
            ..Default::default()
        })
        .await
        .context("failed to list entries")?;
    check_status("list entries", &found, 200)?;
    print_json("matching entries", &found.result)?;

    let children = client
        .get_child_objects(&current.id, "*", &ListOptions::default())
        .await
        .context("failed to get child objects")?;
    check_status("get child objects", &children, 200)?;
    print_json("child objects", &children.result)?;
    Ok(())
}

#[instrument(skip(client))]
async fn delete_and_restore(client: &impl CatalogOperations, id: &str) -> Result<()> {
    let deleted = client
        .delete_entry(id, false)
        .await
        .context("failed to soft delete entry")?;
    check_status("soft delete entry", &deleted, 200)?;
    println!("soft deleted entry '{id}'");

    let restored = client
        .restore_entry(id)
        .await
        .context("failed to restore entry")?;
    check_status("restore entry", &restored, 200)?;
    println!("restored entry '{id}'");
    Ok(())
}

#[instrument(skip(client))]
async fn sub_resources(client: &impl CatalogOperations, id: &str) -> Result<()> {
    let visibility = client
        .get_visibility(id)
        .await
        .context("failed to get visibility")?;
    check_status("get visibility", &visibility, 200)?;
    print_json("visibility", &visibility.result)?;

    let updated = client
        .update_visibility(id, &VisibilityUpdate {
            extendable: Some(false),
            ..Default::default()
        })
        .await
        .context("failed to update visibility")?;
    check_status("update visibility", &updated, 200)?;
    println!("updated visibility of '{id}'");

    let pricing = client
        .get_pricing(id)
        .await
        .context("failed to get pricing")?;
    check_status("get pricing", &pricing, 200)?;
    print_json("pricing", &pricing.result)?;

    let deployments = client
        .get_pricing_deployments(id)
        .await
        .context("failed to get pricing deployments")?;
    check_status("get pricing deployments", &deployments, 200)?;
    print_json("pricing deployments", &deployments.result)?;

    let logs = client
        .get_audit_logs(id, &AuditLogOptions::default())
        .await
        .context("failed to get audit logs")?;
    check_status("get audit logs", &logs, 200)?;
    print_json("audit logs", &logs.result)?;
    Ok(())
}

#[instrument(skip(client))]
async fn artifacts(client: &impl CatalogOperations, id: &str) -> Result<()> {
    let uploaded = client
        .upload_artifact(id, ARTIFACT_NAME, ARTIFACT_CONTENT.to_vec(), "text/plain")
        .await
        .context("failed to upload artifact")?;
    check_status("upload artifact", &uploaded, 200)?;
    println!("uploaded artifact '{ARTIFACT_NAME}'");

    let listed = client
        .list_artifacts(id)
        .await
        .context("failed to list artifacts")?;
    check_status("list artifacts", &listed, 200)?;
    print_json("artifacts", &listed.result)?;
    ensure!(
        listed.result.resources.iter().any(|a| a.name == ARTIFACT_NAME),
        "uploaded artifact '{ARTIFACT_NAME}' is not listed"
    );

    let downloaded = client
        .get_artifact(id, ARTIFACT_NAME)
        .await
        .context("failed to get artifact")?;
    check_status("get artifact", &downloaded, 200)?;
    ensure!(
        downloaded.result.bytes == ARTIFACT_CONTENT,
        "downloaded artifact differs from the uploaded one ({} bytes, expected {})",
        downloaded.result.bytes.len(),
        ARTIFACT_CONTENT.len()
    );
    println!(
        "artifact '{ARTIFACT_NAME}': {}",
        String::from_utf8_lossy(&downloaded.result.bytes)
    );

    let deleted = client
        .delete_artifact(id, ARTIFACT_NAME)
        .await
        .context("failed to delete artifact")?;
    check_status("delete artifact", &deleted, 200)?;

    let listed = client
        .list_artifacts(id)
        .await
        .context("failed to list artifacts")?;
    check_status("list artifacts", &listed, 200)?;
    ensure!(
        listed.result.resources.iter().all(|a| a.name != ARTIFACT_NAME),
        "deleted artifact '{ARTIFACT_NAME}' is still listed"
    );
    println!("deleted artifact '{ARTIFACT_NAME}'");
    Ok(())
}

fn check_status<T>(step: &str, response: &Response<T>, expected: u16) -> Result<()> {
    let status = response.status();
    debug!(step, %status, "checking status");
    ensure!(
        status.as_u16() == expected,
        "{step}: expected status {expected}, got {status}"
    );
    Ok(())
}

fn print_json(title: &str, value: &impl Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize response")?;
    println!("{title}:\n{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use global_catalog::types::{
        ArtifactContent,
        Artifacts,
        AuditSearchResult,
        EntrySearchResult,
        PricingGet,
        PricingSearchResult,
        SearchLimit,
        SearchResults,
        Visibility,
    };
    use global_catalog::{CatalogClient, CatalogClientConfig, CatalogClientError};
    use httpmock::prelude::*;
    use httpmock::Mock;
    use serde_json::json;

    use super::*;

    const ID: &str = "scenario-entry";

    fn entry_json() -> serde_json::Value {
        json!({
            "id": ID,
            "name": ID,
            "kind": "template",
            "overview_ui": {
                "en": {
                    "display_name": "Example Entry",
                    "description": "An example catalog entry",
                    "long_description": "An example catalog entry created by the client example",
                }
            },
            "images": {"image": "https://example.com/image.svg"},
            "disabled": false,
            "tags": [TAG],
            "provider": {"name": "Example Provider", "email": "provider@example.com"},
            "url": format!("https://globalcatalog.example/api/v1/catalog/{ID}"),
        })
    }

    fn client(server: &MockServer) -> CatalogClient {
        CatalogClient::new(CatalogClientConfig::new(server.base_url())).unwrap()
    }

    fn artifact_list_mock<'a>(server: &'a MockServer, names: &[&str]) -> Mock<'a> {
        let resources: Vec<_> = names.iter().map(|name| json!({"name": name})).collect();
        server.mock(|when, then| {
            when.method(GET).path(format!("/v1/catalog/{ID}/artifacts"));
            then.status(200)
                .json_body(json!({"count": resources.len(), "resources": resources}));
        })
    }

    /// A [CatalogClient] that replaces the artifact list mock once the
    /// artifact is deleted, as mocks keep no state between requests.
    struct StatefulCatalog<'a> {
        client: CatalogClient,
        server: &'a MockServer,
        artifact_list: Mutex<Mock<'a>>,
    }

    impl CatalogOperations for StatefulCatalog<'_> {
        async fn create_entry(
            &self,
            entry: &NewCatalogEntry,
        ) -> Result<Response<CatalogEntry>, CatalogClientError> {
            self.client.create_entry(entry).await
        }

        async fn get_entry(
            &self,
            id: impl AsRef<str> + Send + Sync,
            options: &GetEntryOptions,
        ) -> Result<Response<CatalogEntry>, CatalogClientError> {
            self.client.get_entry(id, options).await
        }

        async fn update_entry(
            &self,
            entry: &UpdatedCatalogEntry,
        ) -> Result<Response<CatalogEntry>, CatalogClientError> {
            self.client.update_entry(entry).await
        }

        async fn list_entries(
            &self,
            options: &ListOptions,
        ) -> Result<Response<EntrySearchResult>, CatalogClientError> {
            self.client.list_entries(options).await
        }

        async fn search_entries(
            &self,
            q: impl AsRef<str> + Send + Sync,
            complete: bool,
            limit: SearchLimit,
        ) -> Result<SearchResults, CatalogClientError> {
            self.client.search_entries(q, complete, limit).await
        }

        async fn get_child_objects(
            &self,
            id: impl AsRef<str> + Send + Sync,
            kind: impl AsRef<str> + Send + Sync,
            options: &ListOptions,
        ) -> Result<Response<EntrySearchResult>, CatalogClientError> {
            self.client.get_child_objects(id, kind, options).await
        }

        async fn restore_entry(
            &self,
            id: impl AsRef<str> + Send + Sync,
        ) -> Result<Response<()>, CatalogClientError> {
            self.client.restore_entry(id).await
        }

        async fn get_visibility(
            &self,
            id: impl AsRef<str> + Send + Sync,
        ) -> Result<Response<Visibility>, CatalogClientError> {
            self.client.get_visibility(id).await
        }

        async fn update_visibility(
            &self,
            id: impl AsRef<str> + Send + Sync,
            visibility: &VisibilityUpdate,
        ) -> Result<Response<()>, CatalogClientError> {
            self.client.update_visibility(id, visibility).await
        }

        async fn get_pricing(
            &self,
            id: impl AsRef<str> + Send + Sync,
        ) -> Result<Response<PricingGet>, CatalogClientError> {
            self.client.get_pricing(id).await
        }

        async fn get_pricing_deployments(
            &self,
            id: impl AsRef<str> + Send + Sync,
        ) -> Result<Response<PricingSearchResult>, CatalogClientError> {
            self.client.get_pricing_deployments(id).await
        }

        async fn get_audit_logs(
            &self,
            id: impl AsRef<str> + Send + Sync,
            options: &AuditLogOptions,
        ) -> Result<Response<AuditSearchResult>, CatalogClientError> {
            self.client.get_audit_logs(id, options).await
        }

        async fn upload_artifact(
            &self,
            id: impl AsRef<str> + Send + Sync,
            name: impl AsRef<str> + Send + Sync,
            content: Vec<u8>,
            content_type: impl AsRef<str> + Send + Sync,
        ) -> Result<Response<()>, CatalogClientError> {
            self.client
                .upload_artifact(id, name, content, content_type)
                .await
        }

        async fn get_artifact(
            &self,
            id: impl AsRef<str> + Send + Sync,
            name: impl AsRef<str> + Send + Sync,
        ) -> Result<Response<ArtifactContent>, CatalogClientError> {
            self.client.get_artifact(id, name).await
        }

        async fn list_artifacts(
            &self,
            id: impl AsRef<str> + Send + Sync,
        ) -> Result<Response<Artifacts>, CatalogClientError> {
            self.client.list_artifacts(id).await
        }

        async fn delete_artifact(
            &self,
            id: impl AsRef<str> + Send + Sync,
            name: impl AsRef<str> + Send + Sync,
        ) -> Result<Response<()>, CatalogClientError> {
            let response = self.client.delete_artifact(id, name).await?;
            let mut list = self.artifact_list.lock().unwrap();
            list.assert_hits(1);
            list.delete();
            *list = artifact_list_mock(self.server, &[]);
            Ok(response)
        }

        async fn delete_entry(
            &self,
            id: impl AsRef<str> + Send + Sync,
            force: bool,
        ) -> Result<Response<()>, CatalogClientError> {
            self.client.delete_entry(id, force).await
        }
    }

    #[tokio::test]
    async fn full_run_visits_every_endpoint() {
        let server = MockServer::start_async().await;
        let entry_path = format!("/v1/catalog/{ID}");
        let artifact_path = format!("{entry_path}/artifacts/{ARTIFACT_NAME}");
        let empty_page = json!({"count": 0, "resources": []});

        let create = server.mock(|when, then| {
            when.method(POST).path(&entry_path);
            then.status(201).json_body(entry_json());
        });
        let get = server.mock(|when, then| {
            when.method(GET)
                .path(&entry_path)
                .query_param("complete", "true");
            then.status(200).json_body(entry_json());
        });
        let update = server.mock(|when, then| {
            when.method(PUT)
                .path(&entry_path)
                .body_includes(UPDATED_TAG);
            then.status(200).json_body(entry_json());
        });
        let search = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/catalog")
                .query_param("q", SEARCH_QUERY);
            then.status(200)
                .json_body(json!({"count": 1, "resources": [entry_json()]}));
        });
        let children = server.mock(|when, then| {
            when.method(GET).path(format!("{entry_path}/*"));
            then.status(200).json_body(empty_page.clone());
        });
        let soft_delete = server.mock(|when, then| {
            when.method(DELETE)
                .path(&entry_path)
                .query_param("force", "false");
            then.status(200);
        });
        let restore = server.mock(|when, then| {
            when.method(POST).path(format!("{entry_path}/restore"));
            then.status(200);
        });
        let get_visibility = server.mock(|when, then| {
            when.method(GET).path(format!("{entry_path}/visibility"));
            then.status(200).json_body(json!({"restrictions": "public"}));
        });
        let update_visibility = server.mock(|when, then| {
            when.method(PUT)
                .path(format!("{entry_path}/visibility"))
                .json_body(json!({"extendable": false}));
            then.status(200);
        });
        let pricing = server.mock(|when, then| {
            when.method(GET).path(format!("{entry_path}/pricing"));
            then.status(200).json_body(json!({}));
        });
        let deployments = server.mock(|when, then| {
            when.method(GET).path(format!("{entry_path}/pricing/deployment"));
            then.status(200).json_body(empty_page.clone());
        });
        let logs = server.mock(|when, then| {
            when.method(GET).path(format!("{entry_path}/logs"));
            then.status(200).json_body(empty_page.clone());
        });
        let upload = server.mock(|when, then| {
            when.method(PUT)
                .path(&artifact_path)
                .header("content-type", "text/plain");
            then.status(200);
        });
        let download = server.mock(|when, then| {
            when.method(GET).path(&artifact_path);
            then.status(200)
                .header("content-type", "text/plain")
                .body(ARTIFACT_CONTENT);
        });
        let delete_artifact = server.mock(|when, then| {
            when.method(DELETE).path(&artifact_path);
            then.status(200);
        });
        let hard_delete = server.mock(|when, then| {
            when.method(DELETE)
                .path(&entry_path)
                .query_param("force", "true");
            then.status(200);
        });

        let catalog = StatefulCatalog {
            client: client(&server),
            server: &server,
            artifact_list: Mutex::new(artifact_list_mock(&server, &[ARTIFACT_NAME])),
        };
        run(&catalog, ID, false).await.unwrap();

        for mock in [
            create,
            get,
            update,
            search,
            children,
            soft_delete,
            restore,
            get_visibility,
            update_visibility,
            pricing,
            deployments,
            logs,
            upload,
            download,
            delete_artifact,
            hard_delete,
        ] {
            mock.assert();
        }
        catalog.artifact_list.into_inner().unwrap().assert_hits(1);
    }

    #[tokio::test]
    async fn create_failure_stops_the_run() {
        let server = MockServer::start_async().await;
        let create = server.mock(|when, then| {
            when.method(POST).path(format!("/v1/catalog/{ID}"));
            then.status(409)
                .json_body(json!({"message": "entry already exists"}));
        });
        let others = server.mock(|when, then| {
            when.method(GET);
            then.status(200).json_body(entry_json());
        });

        let err = run(&client(&server), ID, false).await.unwrap_err();

        create.assert();
        others.assert_hits(0);
        assert!(format!("{err:#}").contains("entry already exists"), "{err:#}");
    }

    #[tokio::test]
    async fn unexpected_status_is_an_error() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path(format!("/v1/catalog/{ID}"));
            then.status(200).json_body(entry_json());
        });
        // the service answers 200 where 201 is documented
        let result = create_and_get(&client(&server), ID).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn create_and_get_returns_entry() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path(format!("/v1/catalog/{ID}"));
            then.status(201).json_body(entry_json());
        });
        let get = server.mock(|when, then| {
            when.method(GET)
                .path(format!("/v1/catalog/{ID}"))
                .query_param("complete", "true");
            then.status(200).json_body(entry_json());
        });

        let entry = create_and_get(&client(&server), ID).await.unwrap();

        get.assert();
        assert_eq!(entry.tags, vec![TAG.to_string()]);
    }

    #[tokio::test]
    async fn update_visibility_failure_is_fatal() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path(format!("/v1/catalog/{ID}/visibility"));
            then.status(200).json_body(json!({"restrictions": "public"}));
        });
        server.mock(|when, then| {
            when.method(PUT).path(format!("/v1/catalog/{ID}/visibility"));
            then.status(403)
                .json_body(json!({"message": "not allowed"}));
        });
        let pricing = server.mock(|when, then| {
            when.method(GET).path(format!("/v1/catalog/{ID}/pricing"));
            then.status(200).json_body(json!({}));
        });

        let err = sub_resources(&client(&server), ID).await.unwrap_err();

        pricing.assert_hits(0);
        assert!(format!("{err:#}").contains("not allowed"), "{err:#}");
    }

    #[tokio::test]
    async fn artifact_still_listed_after_delete_fails() {
        let server = MockServer::start_async().await;
        let artifact_path = format!("/v1/catalog/{ID}/artifacts/{ARTIFACT_NAME}");
        server.mock(|when, then| {
            when.method(PUT).path(&artifact_path);
            then.status(200);
        });
        server.mock(|when, then| {
            when.method(GET).path(&artifact_path);
            then.status(200)
                .header("content-type", "text/plain")
                .body(ARTIFACT_CONTENT);
        });
        server.mock(|when, then| {
            when.method(DELETE).path(&artifact_path);
            then.status(200);
        });
        let list = server.mock(|when, then| {
            when.method(GET).path(format!("/v1/catalog/{ID}/artifacts"));
            then.status(200)
                .json_body(json!({"count": 1, "resources": [{"name": ARTIFACT_NAME}]}));
        });

        let err = artifacts(&client(&server), ID).await.unwrap_err();

        list.assert_hits(2);
        assert!(err.to_string().contains("still listed"), "{err}");
    }

    #[tokio::test]
    async fn corrupted_artifact_fails() {
        let server = MockServer::start_async().await;
        let artifact_path = format!("/v1/catalog/{ID}/artifacts/{ARTIFACT_NAME}");
        server.mock(|when, then| {
            when.method(PUT).path(&artifact_path);
            then.status(200);
        });
        server.mock(|when, then| {
            when.method(GET).path(format!("/v1/catalog/{ID}/artifacts"));
            then.status(200)
                .json_body(json!({"count": 1, "resources": [{"name": ARTIFACT_NAME}]}));
        });
        server.mock(|when, then| {
            when.method(GET).path(&artifact_path);
            then.status(200).body("something else");
        });

        let err = artifacts(&client(&server), ID).await.unwrap_err();
        assert!(err.to_string().contains("differs"), "{err}");
    }
}
