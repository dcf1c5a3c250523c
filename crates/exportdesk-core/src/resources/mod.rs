//! Generic CRUD synchronizer for server-owned resources.
//!
//! One engine backs both the product catalog and the contact inbox. The
//! server is the sole source of truth: `list` replaces the held collection
//! wholesale, mutations never patch it locally, and callers refetch after
//! every successful write.

pub mod message;
pub mod product;

pub use message::{resolve_phone, Message, Messages, PhoneFields, ResolvedPhone};
pub use product::{Product, Products};

use std::marker::PhantomData;
use std::sync::RwLock;

use reqwest::{multipart, Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::http;
use crate::session::{CredentialStore, SessionStore};

/// Capability descriptor for a resource kind.
///
/// The synchronizer is generic over this instead of duplicating CRUD logic
/// per kind.
pub trait ResourceKind {
    /// Deserialized server record.
    type Record: DeserializeOwned + Clone + Send + Sync + 'static;

    /// Collection path under the API base URL, e.g. `/products`.
    const PATH: &'static str;

    /// Singular display name used in messages.
    const NAME: &'static str;

    /// Whether submissions for this kind may carry an image part.
    const ACCEPTS_IMAGE: bool;

    /// The server-assigned opaque identifier of a record.
    fn id(record: &Self::Record) -> &str;
}

/// Binary image attached to a create/update submission.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("bytes", &format_args!("{} bytes", self.bytes.len()))
            .finish()
    }
}

/// Finished submission payload: named scalar fields plus an optional image.
///
/// Pending-edit state stays with the calling surface; the synchronizer only
/// ever sees this finished form.
#[derive(Debug, Clone, Default)]
pub struct ResourcePayload {
    fields: Vec<(String, String)>,
    image: Option<ImageUpload>,
}

impl ResourcePayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named scalar field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Attaches the image part.
    #[must_use]
    pub fn image(mut self, image: ImageUpload) -> Self {
        self.image = Some(image);
        self
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub const fn has_image(&self) -> bool {
        self.image.is_some()
    }
}

/// CRUD engine for one resource kind.
///
/// Holds the last full fetch; the in-memory collection always equals it.
/// Mutations carry a per-kind mutual-exclusion token: a second call while
/// one is outstanding fails fast with `Busy` instead of racing.
pub struct ResourceClient<K: ResourceKind, S: SessionStore> {
    config: ApiConfig,
    client: Client,
    credentials: CredentialStore<S>,
    collection: RwLock<Vec<K::Record>>,
    mutation: Mutex<()>,
    _kind: PhantomData<K>,
}

impl<K: ResourceKind, S: SessionStore> ResourceClient<K, S> {
    pub fn new(config: ApiConfig, credentials: CredentialStore<S>) -> Result<Self> {
        Ok(Self {
            config,
            client: Client::builder().build()?,
            credentials,
            collection: RwLock::new(Vec::new()),
            mutation: Mutex::new(()),
            _kind: PhantomData,
        })
    }

    /// Snapshot of the last full fetch (empty before the first `list`).
    pub fn records(&self) -> Vec<K::Record> {
        self.collection.read().map_or_else(
            |poisoned| poisoned.into_inner().clone(),
            |guard| guard.clone(),
        )
    }

    /// Full fetch. Replaces the held collection atomically - never merges -
    /// and returns the new snapshot.
    pub async fn list(&self) -> Result<Vec<K::Record>> {
        let response = self.request(Method::GET, &self.collection_url()).send().await?;
        let response = http::check(response).await?;
        let records = response.json::<Vec<K::Record>>().await?;

        match self.collection.write() {
            Ok(mut guard) => *guard = records.clone(),
            Err(poisoned) => *poisoned.into_inner() = records.clone(),
        }
        Ok(records)
    }

    /// Creates a record from a finished submission payload.
    ///
    /// The held collection is not touched; re-run `list` on success.
    pub async fn create(&self, payload: ResourcePayload) -> Result<K::Record> {
        let _guard = self.begin_mutation()?;
        let form = self.form_for(&payload)?;
        let response = self
            .request(Method::POST, &self.collection_url())
            .multipart(form)
            .send()
            .await?;
        let response = http::check(response).await?;
        Ok(response.json::<K::Record>().await?)
    }

    /// Updates the record with the given server id.
    pub async fn update(&self, id: &str, payload: ResourcePayload) -> Result<K::Record> {
        let id = normalize_id::<K>(id)?;
        let _guard = self.begin_mutation()?;
        let form = self.form_for(&payload)?;
        let response = self
            .request(Method::PUT, &self.record_url(&id))
            .multipart(form)
            .send()
            .await?;
        let response = http::check(response).await?;
        Ok(response.json::<K::Record>().await?)
    }

    /// Deletes the record with the given server id.
    ///
    /// User confirmation is the caller's concern; this goes straight to the
    /// endpoint.
    pub async fn remove(&self, id: &str) -> Result<()> {
        let id = normalize_id::<K>(id)?;
        let _guard = self.begin_mutation()?;
        let response = self.request(Method::DELETE, &self.record_url(&id)).send().await?;
        http::check(response).await?;
        Ok(())
    }

    fn collection_url(&self) -> String {
        self.config.endpoint(K::PATH)
    }

    fn record_url(&self, id: &str) -> String {
        format!("{}/{id}", self.collection_url())
    }

    /// Attaches the bearer header once a token exists in the store.
    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let request = self.client.request(method, url);
        match self.credentials.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn begin_mutation(&self) -> Result<tokio::sync::MutexGuard<'_, ()>> {
        self.mutation.try_lock().map_err(|_| Error::Busy)
    }

    /// Encodes the submission as multipart form-data; the image part is
    /// omitted when absent.
    fn form_for(&self, payload: &ResourcePayload) -> Result<multipart::Form> {
        let mut form = multipart::Form::new();
        for (name, value) in &payload.fields {
            form = form.text(name.clone(), value.clone());
        }
        if let Some(image) = &payload.image {
            if !K::ACCEPTS_IMAGE {
                return Err(Error::Validation(format!(
                    "A {} submission does not accept an image",
                    K::NAME
                )));
            }
            let part = multipart::Part::bytes(image.bytes.clone())
                .file_name(image.file_name.clone())
                .mime_str(&image.content_type)
                .map_err(|_| {
                    Error::Validation(format!(
                        "Invalid image content type: {}",
                        image.content_type
                    ))
                })?;
            form = form.part("image", part);
        }
        Ok(form)
    }
}

fn normalize_id<K: ResourceKind>(id: &str) -> Result<String> {
    let id = id.trim();
    if id.is_empty() {
        return Err(Error::Validation(format!(
            "A {} id is required",
            K::NAME
        )));
    }
    Ok(id.to_string())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::session::{MemorySessionStore, Session};

    fn product_json(id: &str, title: &str) -> serde_json::Value {
        serde_json::json!({
            "_id": id,
            "title": title,
            "description": format!("{title} description"),
            "imageSrc": format!("/uploads/{id}.jpg"),
        })
    }

    fn signed_in_store() -> CredentialStore<MemorySessionStore> {
        let backend = MemorySessionStore::new();
        backend.save(&Session::new("tok-1", false)).unwrap();
        CredentialStore::new(backend).unwrap()
    }

    fn anonymous_store() -> CredentialStore<MemorySessionStore> {
        CredentialStore::new(MemorySessionStore::new()).unwrap()
    }

    async fn products_client(
        server: &MockServer,
        credentials: CredentialStore<MemorySessionStore>,
    ) -> ResourceClient<Products, MemorySessionStore> {
        ResourceClient::new(ApiConfig::new(server.uri()).unwrap(), credentials).unwrap()
    }

    #[tokio::test]
    async fn list_replaces_the_held_collection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                product_json("p1", "Teak table"),
                product_json("p2", "Rattan chair"),
            ])))
            .mount(&server)
            .await;

        let client = products_client(&server, signed_in_store()).await;
        assert!(client.records().is_empty());

        let fetched = client.list().await.unwrap();
        assert_eq!(fetched.len(), 2);
        assert_eq!(client.records(), fetched);
        assert_eq!(fetched[0].id, "p1");
        assert_eq!(fetched[1].title, "Rattan chair");
    }

    #[tokio::test]
    async fn list_attaches_bearer_once_a_token_exists() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .and(header("Authorization", "Bearer tok-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = products_client(&server, signed_in_store()).await;
        client.list().await.unwrap();
    }

    #[tokio::test]
    async fn list_without_token_sends_no_authorization_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let client = products_client(&server, anonymous_store()).await;
        client.list().await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get("Authorization").is_none());
    }

    #[tokio::test]
    async fn create_then_list_round_trips_the_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/products"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(product_json("srv-9", "Teak table")),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                product_json("srv-9", "Teak table"),
            ])))
            .mount(&server)
            .await;

        let client = products_client(&server, signed_in_store()).await;
        let payload = ResourcePayload::new()
            .field("title", "Teak table")
            .field("description", "Teak table description");
        let created = client.create(payload).await.unwrap();

        // id is server-assigned; compare fields only
        let listed = client.list().await.unwrap();
        let found = listed
            .iter()
            .find(|product| product.title == "Teak table")
            .unwrap();
        assert_eq!(found.title, created.title);
        assert_eq!(found.description, "Teak table description");
    }

    #[tokio::test]
    async fn create_submits_multipart_fields_and_image() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/products"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(product_json("p1", "Teak table")),
            )
            .mount(&server)
            .await;

        let client = products_client(&server, signed_in_store()).await;
        let payload = ResourcePayload::new()
            .field("title", "Teak table")
            .field("description", "desc")
            .image(ImageUpload {
                file_name: "table.png".to_string(),
                content_type: "image/png".to_string(),
                bytes: vec![0x89, 0x50, 0x4e, 0x47],
            });
        client.create(payload).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let request = &requests[0];
        let content_type = request
            .headers
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap();
        assert!(content_type.starts_with("multipart/form-data"));

        let body = String::from_utf8_lossy(&request.body);
        assert!(body.contains("name=\"title\""));
        assert!(body.contains("Teak table"));
        assert!(body.contains("name=\"image\""));
        assert!(body.contains("filename=\"table.png\""));
    }

    #[tokio::test]
    async fn update_hits_the_record_url() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/products/p1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(product_json("p1", "Renamed")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = products_client(&server, signed_in_store()).await;
        let payload = ResourcePayload::new()
            .field("title", "Renamed")
            .field("description", "desc");
        let updated = client.update(" p1 ", payload).await.unwrap();
        assert_eq!(updated.title, "Renamed");
    }

    #[tokio::test]
    async fn remove_then_list_drops_the_record() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/products/p1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                product_json("p2", "Rattan chair"),
            ])))
            .mount(&server)
            .await;

        let client = products_client(&server, signed_in_store()).await;
        client.remove("p1").await.unwrap();

        let listed = client.list().await.unwrap();
        assert!(listed.iter().all(|product| product.id != "p1"));
    }

    #[tokio::test]
    async fn remove_with_empty_id_fails_locally() {
        let server = MockServer::start().await;
        let client = products_client(&server, signed_in_store()).await;

        let error = client.remove("  ").await.unwrap_err();
        assert!(matches!(error, Error::Validation(_)));
        assert_eq!(server.received_requests().await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn overlapping_mutations_fail_fast_with_busy() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/products/p1"))
            .respond_with(
                ResponseTemplate::new(204).set_delay(Duration::from_millis(200)),
            )
            .mount(&server)
            .await;

        let client = products_client(&server, signed_in_store()).await;
        let (first, second) = tokio::join!(client.remove("p1"), client.remove("p1"));

        let results = [first, second];
        assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|result| matches!(result, Err(Error::Busy))));
    }

    #[tokio::test]
    async fn mutation_failure_surfaces_server_message_and_keeps_collection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                product_json("p1", "Teak table"),
            ])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "message": "Title is required",
            })))
            .mount(&server)
            .await;

        let client = products_client(&server, signed_in_store()).await;
        client.list().await.unwrap();

        let error = client
            .create(ResourcePayload::new().field("description", "desc"))
            .await
            .unwrap_err();
        assert!(matches!(error, Error::ServerMessage(message) if message == "Title is required"));
        assert_eq!(client.records().len(), 1);
    }

    #[tokio::test]
    async fn image_on_an_imageless_kind_fails_locally() {
        let server = MockServer::start().await;
        let client: ResourceClient<Messages, MemorySessionStore> =
            ResourceClient::new(ApiConfig::new(server.uri()).unwrap(), signed_in_store())
                .unwrap();

        let payload = ResourcePayload::new().field("name", "x").image(ImageUpload {
            file_name: "x.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![0],
        });
        let error = client.create(payload).await.unwrap_err();
        assert!(matches!(error, Error::Validation(_)));
        assert_eq!(server.received_requests().await.unwrap().len(), 0);
    }
}
