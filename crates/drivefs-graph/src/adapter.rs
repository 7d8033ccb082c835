//! Graph-backed implementation of the storage adapter port
//!
//! Composes [`GraphClient`] requests into the filesystem contract defined by
//! [`IStorageAdapter`]. Every Graph failure is wrapped in the
//! operation-specific [`StorageError`] with the original error as source.

use std::io::Cursor;
use std::sync::Arc;

use async_stream::stream;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use reqwest::Method;
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use drivefs_core::domain::{
    ConflictBehavior, Credentials, MetadataKind, StorageAttributes, StorageError, UploadSession,
    Visibility,
};
use drivefs_core::ports::{ByteStream, IStorageAdapter, ITokenCache, ListingStream};

use crate::auth::TokenProvider;
use crate::client::{GraphClient, RequestBody};
use crate::item::{ChildrenPage, RemoteItem};
use crate::paths;
use crate::GraphError;

/// Property controlling name collisions on item creation
const CONFLICT_BEHAVIOR_KEY: &str = "@microsoft.graph.conflictBehavior";

/// Viewer page used when no sharing link can be obtained
const FALLBACK_VIEW_URL: &str = "https://onedrive.live.com/view.aspx";

const VISIBILITY_UNSUPPORTED: &str = "OneDrive does not support per-item visibility";

/// Storage adapter over one user's OneDrive / SharePoint drive
pub struct GraphStorageAdapter {
    client: GraphClient,
}

impl GraphStorageAdapter {
    pub fn new(client: GraphClient) -> Self {
        Self { client }
    }

    /// Wires a client-credentials token provider and a client against the
    /// public Graph and identity endpoints
    pub fn from_credentials(credentials: Credentials, cache: Arc<dyn ITokenCache>) -> Self {
        let tokens = Arc::new(TokenProvider::new(credentials.clone(), cache));
        Self::new(GraphClient::new(&credentials, tokens))
    }

    pub fn client(&self) -> &GraphClient {
        &self.client
    }

    async fn fetch_item(&self, path: &str) -> Result<RemoteItem, GraphError> {
        let url = self.client.resolver().item_url(path);
        self.client.fetch(Method::GET, &url, None).await
    }

    async fn download(&self, path: &str) -> Result<Bytes, GraphError> {
        let url = self.client.resolver().content_url(path);
        let response = self
            .client
            .execute(Method::GET, &url, RequestBody::Empty)
            .await?;
        Ok(response.bytes().await?)
    }

    async fn upload(&self, path: &str, body: reqwest::Body) -> Result<(), GraphError> {
        let url = self.client.resolver().content_url(path);
        self.client
            .execute(Method::PUT, &url, RequestBody::Binary(body))
            .await?;
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<(), GraphError> {
        let url = self.client.resolver().item_url(path);
        self.client.send_json(Method::DELETE, &url, None).await?;
        Ok(())
    }

    /// Requests a sharing link; `None` when the answer carries no URL
    async fn sharing_link(&self, path: &str) -> Result<Option<String>, GraphError> {
        let item = self.fetch_item(path).await?;
        let id = item
            .id
            .ok_or_else(|| GraphError::InvalidResponse("item has no id".to_string()))?;

        let url = format!("{}/createLink", self.client.resolver().item_by_id_url(&id));
        let body = json!({ "type": "view", "scope": "anonymous" });
        let response = self.client.send_json(Method::POST, &url, Some(body)).await?;

        Ok(response
            .get("link")
            .and_then(|link| link.get("webUrl"))
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .map(str::to_string))
    }

    /// Viewer URL for the logical path; the base path is not applied
    fn fallback_url(&self, path: &str) -> Result<String, StorageError> {
        let logical = paths::normalize(path);
        url::Url::parse_with_params(
            FALLBACK_VIEW_URL,
            &[("resid", self.client.user_id()), ("path", logical.as_str())],
        )
        .map(String::from)
        .map_err(|e| StorageError::metadata(path, MetadataKind::Url, e))
    }

    /// Pages through one folder, descending into subfolders first when `deep`
    ///
    /// A folder that cannot be listed yields one `Err` and stops; its
    /// parent then carries on with the next sibling.
    fn list_directory(&self, dir: String, deep: bool) -> ListingStream<'_> {
        Box::pin(stream! {
            let mut next_url = Some(self.client.resolver().children_url(&dir));

            while let Some(url) = next_url.take() {
                let page: ChildrenPage = match self.client.fetch(Method::GET, &url, None).await {
                    Ok(page) => page,
                    Err(err) => {
                        warn!(path = %dir, error = %err, "Listing failed");
                        yield Err(StorageError::UnableToListContents {
                            path: dir.clone(),
                            source: Box::new(err),
                        });
                        return;
                    }
                };

                debug!(path = %dir, count = page.value.len(), "Received listing page");

                for item in page.value {
                    let item_path = join_path(&dir, &item.name);
                    let descend = deep && item.is_directory();

                    yield Ok(item.into_attributes(item_path.clone()));

                    if descend {
                        let mut children = self.list_directory(item_path, true);
                        while let Some(child) = children.next().await {
                            yield child;
                        }
                    }
                }

                next_url = page.next_link;
            }
        })
    }
}

fn join_path(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

#[async_trait::async_trait]
impl IStorageAdapter for GraphStorageAdapter {
    async fn file_exists(&self, path: &str) -> bool {
        match self.fetch_item(path).await {
            Ok(_) => true,
            Err(e) => {
                debug!(path, error = %e, "Item lookup failed, treating as absent");
                false
            }
        }
    }

    async fn directory_exists(&self, path: &str) -> bool {
        match self.fetch_item(path).await {
            Ok(item) => item.is_directory(),
            Err(e) => {
                debug!(path, error = %e, "Folder lookup failed, treating as absent");
                false
            }
        }
    }

    async fn write(&self, path: &str, contents: Bytes) -> Result<(), StorageError> {
        let size = contents.len();
        self.upload(path, reqwest::Body::from(contents))
            .await
            .map_err(|e| StorageError::UnableToWriteFile {
                path: path.to_string(),
                source: Box::new(e),
            })?;
        info!(path, size, "Uploaded file");
        Ok(())
    }

    async fn write_stream(&self, path: &str, contents: ByteStream) -> Result<(), StorageError> {
        self.upload(path, reqwest::Body::wrap_stream(contents))
            .await
            .map_err(|e| StorageError::UnableToWriteFile {
                path: path.to_string(),
                source: Box::new(e),
            })?;
        info!(path, "Uploaded file from stream");
        Ok(())
    }

    async fn read(&self, path: &str) -> Result<Bytes, StorageError> {
        self.download(path)
            .await
            .map_err(|e| StorageError::UnableToReadFile {
                path: path.to_string(),
                source: Box::new(e),
            })
    }

    async fn read_stream(&self, path: &str) -> Result<Cursor<Bytes>, StorageError> {
        self.read(path).await.map(Cursor::new)
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        self.remove(path)
            .await
            .map_err(|e| StorageError::UnableToDeleteFile {
                path: path.to_string(),
                source: Box::new(e),
            })?;
        info!(path, "Deleted file");
        Ok(())
    }

    async fn delete_directory(&self, path: &str) -> Result<(), StorageError> {
        self.remove(path)
            .await
            .map_err(|e| StorageError::UnableToDeleteDirectory {
                path: path.to_string(),
                source: Box::new(e),
            })?;
        info!(path, "Deleted directory");
        Ok(())
    }

    async fn create_directory(&self, path: &str) -> Result<(), StorageError> {
        let remote = self.client.resolver().remote_path(path);
        let (parent, name) = remote.split();

        if name.is_empty() {
            return Err(StorageError::UnableToCreateDirectory {
                path: path.to_string(),
                source: "the drive root already exists".into(),
            });
        }

        let url = self.client.resolver().url_for(&parent, Some("children"));
        let body = json!({
            "name": name,
            "folder": {},
            CONFLICT_BEHAVIOR_KEY: "fail",
        });

        self.client
            .send_json(Method::POST, &url, Some(body))
            .await
            .map_err(|e| StorageError::UnableToCreateDirectory {
                path: path.to_string(),
                source: Box::new(e),
            })?;

        info!(path, "Created directory");
        Ok(())
    }

    fn list_contents(&self, path: &str, deep: bool) -> ListingStream<'_> {
        self.list_directory(paths::normalize(path), deep)
    }

    async fn move_file(&self, source: &str, destination: &str) -> Result<(), StorageError> {
        if let Err(e) = self.copy(source, destination).await {
            return Err(StorageError::UnableToMoveFile {
                from: source.to_string(),
                to: destination.to_string(),
                partial: false,
                source: Box::new(e),
            });
        }

        if let Err(e) = self.delete(source).await {
            warn!(
                source,
                destination,
                error = %e,
                "Copied but could not remove source; item now exists at both paths"
            );
            return Err(StorageError::UnableToMoveFile {
                from: source.to_string(),
                to: destination.to_string(),
                partial: true,
                source: Box::new(e),
            });
        }

        info!(source, destination, "Moved file");
        Ok(())
    }

    async fn copy(&self, source: &str, destination: &str) -> Result<(), StorageError> {
        let resolver = self.client.resolver();
        let target = resolver.remote_path(destination);
        let (parent, name) = target.split();

        let url = resolver.action_url(source, "copy");
        let body = json!({
            "parentReference": { "path": resolver.parent_reference(&parent) },
            "name": name,
        });

        self.client
            .send_json(Method::POST, &url, Some(body))
            .await
            .map_err(|e| StorageError::UnableToCopyFile {
                from: source.to_string(),
                to: destination.to_string(),
                source: Box::new(e),
            })?;

        debug!(source, destination, "Copy accepted");
        Ok(())
    }

    async fn metadata(&self, path: &str) -> Result<StorageAttributes, StorageError> {
        let item = self
            .fetch_item(path)
            .await
            .map_err(|e| StorageError::metadata(path, MetadataKind::Metadata, e))?;
        Ok(item.into_attributes(paths::normalize(path)))
    }

    async fn last_modified(&self, path: &str) -> Result<DateTime<Utc>, StorageError> {
        let item = self
            .fetch_item(path)
            .await
            .map_err(|e| StorageError::metadata(path, MetadataKind::LastModified, e))?;
        item.last_modified()
            .ok_or_else(|| StorageError::missing_metadata(path, MetadataKind::LastModified))
    }

    async fn file_size(&self, path: &str) -> Result<u64, StorageError> {
        let item = self
            .fetch_item(path)
            .await
            .map_err(|e| StorageError::metadata(path, MetadataKind::FileSize, e))?;
        item.size
            .ok_or_else(|| StorageError::missing_metadata(path, MetadataKind::FileSize))
    }

    async fn mime_type(&self, path: &str) -> Result<String, StorageError> {
        let item = self
            .fetch_item(path)
            .await
            .map_err(|e| StorageError::metadata(path, MetadataKind::MimeType, e))?;
        item.mime_type()
            .map(str::to_string)
            .ok_or_else(|| StorageError::missing_metadata(path, MetadataKind::MimeType))
    }

    async fn create_upload_session(
        &self,
        path: &str,
        overrides: Map<String, Value>,
    ) -> Result<UploadSession, StorageError> {
        let mut item = Map::new();
        item.insert(CONFLICT_BEHAVIOR_KEY.to_string(), Value::from("rename"));
        item.extend(overrides);

        let conflict_behavior = item
            .get(CONFLICT_BEHAVIOR_KEY)
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<ConflictBehavior>().ok())
            .unwrap_or_default();

        let url = self.client.resolver().action_url(path, "createUploadSession");
        let response = self
            .client
            .send_json(Method::POST, &url, Some(json!({ "item": item })))
            .await
            .map_err(|e| StorageError::UnableToCreateUploadSession {
                path: path.to_string(),
                source: Box::new(e),
            })?;

        let upload_url = response
            .get("uploadUrl")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        if upload_url.is_empty() {
            warn!(path, "Upload session response carried no uploadUrl");
        }

        let expiration = response
            .get("expirationDateTime")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Ok(UploadSession {
            upload_url,
            conflict_behavior,
            expiration,
        })
    }

    async fn get_url(&self, path: &str) -> Result<String, StorageError> {
        match self.sharing_link(path).await {
            Ok(Some(url)) => Ok(url),
            Ok(None) => {
                warn!(path, "Sharing link response carried no webUrl, using viewer URL");
                self.fallback_url(path)
            }
            Err(e) => {
                warn!(path, error = %e, "Could not create sharing link, using viewer URL");
                self.fallback_url(path)
            }
        }
    }

    async fn set_visibility(
        &self,
        path: &str,
        _visibility: Visibility,
    ) -> Result<(), StorageError> {
        Err(StorageError::UnableToSetVisibility {
            path: path.to_string(),
            reason: VISIBILITY_UNSUPPORTED.to_string(),
        })
    }

    async fn visibility(&self, path: &str) -> Result<Visibility, StorageError> {
        Err(StorageError::UnableToRetrieveMetadata {
            path: path.to_string(),
            kind: MetadataKind::Visibility,
            reason: VISIBILITY_UNSUPPORTED.to_string(),
            source: None,
        })
    }
}
