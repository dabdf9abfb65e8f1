//! Interactive client for the FoodLens API
//!
//! [`ApiClient`] talks to the facade over HTTP; [`Session`] holds what the
//! user has uploaded and what came back, and [`render`] turns it into text.

pub mod render;
pub mod session;

pub use session::{NutritionOutcome, Session, SessionState};

use crate::ai::ImageMime;
use crate::models::{NutritionRecord, Predictions};
use crate::Result;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::path::Path;

/// An image picked by the user, kept in memory for the session.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedImage {
    pub name: String,
    pub mime: ImageMime,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    pub fn new(name: impl Into<String>, mime: ImageMime, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime,
            bytes,
        }
    }

    /// Read a `.jpg`, `.jpeg` or `.png` file from disk.
    pub async fn from_file(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let mime = ImageMime::for_file(path, &bytes)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(name, mime, bytes))
    }
}

/// Calls the client makes against the facade.
#[async_trait]
pub trait FacadeApi: Send + Sync {
    async fn recognize_food(&self, image: &UploadedImage) -> Result<Vec<String>>;
    async fn get_nutrition(&self, food_name: &str) -> Result<NutritionRecord>;
}

/// reqwest implementation of [`FacadeApi`]. Any non-2xx status is an error.
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::new_with_client(base_url, Client::new())
    }

    pub fn new_with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl FacadeApi for ApiClient {
    async fn recognize_food(&self, image: &UploadedImage) -> Result<Vec<String>> {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.name.clone())
            .mime_str(image.mime.as_str())?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.url("/recognize-food/"))
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        let body: Predictions = response.json().await?;
        Ok(body.predictions)
    }

    async fn get_nutrition(&self, food_name: &str) -> Result<NutritionRecord> {
        let response = self
            .client
            .get(self.url("/get-nutrition/"))
            .query(&[("food_name", food_name)])
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }
}
