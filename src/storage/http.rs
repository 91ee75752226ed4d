//! REST implementation of the record and upload services

use crate::config::ApiConfig;
use crate::core::auth::Session;
use crate::core::entity::{Entity, RecordId};
use crate::core::error::{ApiError, DeskResult, StorageError};
use crate::core::service::{PhotoUpload, PhotoUploader, RecordService};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::marker::PhantomData;
use std::time::Duration;

/// Build the shared HTTP client for `config`
pub fn build_client(config: &ApiConfig) -> DeskResult<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?)
}

/// Record service backed by `/api/{resource}` endpoints
pub struct HttpRecordService<T> {
    client: Client,
    base_url: String,
    token: Option<String>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for HttpRecordService<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: self.token.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> HttpRecordService<T> {
    pub fn new(config: &ApiConfig) -> DeskResult<Self> {
        Ok(Self::with_client(build_client(config)?, &config.base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            _entity: PhantomData,
        }
    }

    /// Send the session's token as a bearer credential
    pub fn with_session(mut self, session: &Session) -> Self {
        self.token = session.token().ok().map(str::to_string);
        self
    }

    pub fn collection_url(&self) -> String {
        format!("{}/api/{}", self.base_url, T::resource_name())
    }

    pub fn item_url(&self, id: &RecordId) -> String {
        format!("{}/{}", self.collection_url(), id)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder, id: Option<&RecordId>) -> DeskResult<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        tracing::warn!(status = status.as_u16(), url = %url, "request failed");

        match id {
            Some(id) if status == StatusCode::NOT_FOUND => Err(StorageError::NotFound {
                kind: T::resource_name_singular().to_string(),
                id: id.to_string(),
            }
            .into()),
            _ => Err(ApiError::Status {
                status: status.as_u16(),
                url,
            }
            .into()),
        }
    }

    /// Entity echoed by a save, or `fallback` when the body carries none
    async fn saved_entity(&self, response: Response, fallback: T) -> DeskResult<T> {
        let url = response.url().to_string();
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(fallback);
        }

        let value: Value = serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode {
            url: url.clone(),
            message: e.to_string(),
        })?;
        match serde_json::from_value::<T>(value) {
            Ok(saved) if saved.id().is_some() => Ok(saved),
            Ok(_) => Ok(fallback),
            Err(e) => Err(ApiError::Decode {
                url,
                message: e.to_string(),
            }
            .into()),
        }
    }
}

#[async_trait]
impl<T: Entity> RecordService<T> for HttpRecordService<T> {
    async fn list(&self) -> DeskResult<Vec<T>> {
        let url = self.collection_url();
        tracing::debug!(url = %url, "listing");

        let response = self.send(self.request(Method::GET, &url), None).await?;
        let items: Vec<T> = response.json().await?;

        tracing::debug!(url = %url, count = items.len(), "listed");
        Ok(items)
    }

    async fn get(&self, id: &RecordId) -> DeskResult<T> {
        let url = self.item_url(id);
        let response = self.send(self.request(Method::GET, &url), Some(id)).await?;
        Ok(response.json().await?)
    }

    async fn create(&self, entity: T) -> DeskResult<T> {
        let url = self.collection_url();
        let response = self
            .send(self.request(Method::POST, &url).json(&entity), None)
            .await?;

        tracing::info!(kind = T::resource_name_singular(), "created");
        self.saved_entity(response, entity).await
    }

    async fn update(&self, id: &RecordId, mut entity: T) -> DeskResult<T> {
        let url = self.item_url(id);
        let response = self
            .send(self.request(Method::PUT, &url).json(&entity), Some(id))
            .await?;

        tracing::info!(kind = T::resource_name_singular(), id = %id, "updated");
        entity.set_id(id.clone());
        self.saved_entity(response, entity).await
    }

    async fn delete(&self, id: &RecordId) -> DeskResult<()> {
        let url = self.item_url(id);
        self.send(self.request(Method::DELETE, &url), Some(id)).await?;

        tracing::info!(kind = T::resource_name_singular(), id = %id, "deleted");
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    photo_urls: Vec<String>,
}

/// Multipart photo upload to `/api/uploads/upload`
#[derive(Clone)]
pub struct HttpPhotoUploader {
    client: Client,
    upload_url: String,
}

impl HttpPhotoUploader {
    pub fn new(config: &ApiConfig) -> DeskResult<Self> {
        Ok(Self::with_client(build_client(config)?, &config.base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            upload_url: format!("{}/api/uploads/upload", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl PhotoUploader for HttpPhotoUploader {
    async fn upload(&self, photo: &PhotoUpload) -> DeskResult<String> {
        let part = Part::bytes(photo.bytes.clone())
            .file_name(photo.file_name.clone())
            .mime_str(&photo.content_type)?;
        let form = Form::new().part("photos", part);

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), file = %photo.file_name, "photo upload failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: self.upload_url.clone(),
            }
            .into());
        }

        let body: UploadResponse = response.json().await?;
        body.photo_urls.into_iter().next().ok_or_else(|| {
            ApiError::UnexpectedResponse {
                url: self.upload_url.clone(),
                message: "upload response has no photo_urls".to_string(),
            }
            .into()
        })
    }
}
