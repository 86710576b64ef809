// API client module: talks to the remote product API over HTTP and
// decodes its JSON into `Product` values. Views never use the client
// directly; they are written against the `CatalogApi` trait so tests can
// hand them a double instead.

use std::future::Future;
use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::validation::Field;

/// A catalog product as the server serializes it. Field names on the wire
/// are PascalCase and must match the server exactly.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Product {
    #[serde(rename = "ProductId")]
    pub id: u64,
    #[serde(rename = "ProductName")]
    pub name: String,
    /// URL, path or identifier of the stored image.
    #[serde(rename = "Productimg", default)]
    pub image: Option<String>,
    pub price: f64,
    pub description: String,
    pub stock_quantity: u32,
    pub category_id: u32,
    pub created_by_admin_id: u32,
}

/// An image file picked locally, ready to be uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Validated values of the product form.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPayload {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock_quantity: u32,
    pub category_id: u32,
    pub created_by_admin_id: u32,
    pub image: Option<ImageFile>,
}

impl ProductPayload {
    /// Scalar multipart fields, in the order they are sent.
    pub fn text_fields(&self) -> [(&'static str, String); 6] {
        [
            (Field::ProductName.wire_name(), self.name.clone()),
            (Field::Description.wire_name(), self.description.clone()),
            (Field::Price.wire_name(), self.price.to_string()),
            (Field::StockQuantity.wire_name(), self.stock_quantity.to_string()),
            (Field::CategoryId.wire_name(), self.category_id.to_string()),
            ("CreatedByAdminId", self.created_by_admin_id.to_string()),
        ]
    }

    fn into_multipart(self) -> Result<Form, ApiError> {
        let mut form = Form::new();
        for (name, value) in self.text_fields() {
            form = form.text(name, value);
        }
        if let Some(image) = self.image {
            let part = Part::bytes(image.bytes)
                .file_name(image.file_name)
                .mime_str(&image.mime)?;
            form = form.part(Field::Productimg.wire_name(), part);
        }
        Ok(form)
    }
}

/// Operations the views need from the remote catalog.
pub trait CatalogApi {
    fn list_products(&self) -> impl Future<Output = Result<Vec<Product>, ApiError>> + Send;

    fn get_product(&self, id: u64) -> impl Future<Output = Result<Product, ApiError>> + Send;

    fn create_product(
        &self,
        payload: ProductPayload,
    ) -> impl Future<Output = Result<Product, ApiError>> + Send;

    fn update_product(
        &self,
        id: u64,
        payload: ProductPayload,
    ) -> impl Future<Output = Result<Product, ApiError>> + Send;

    fn delete_product(&self, id: u64) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Display URL of the stored image of product `id`.
    fn image_url(&self, id: u64) -> String;
}

impl<T: CatalogApi + Send + Sync + ?Sized> CatalogApi for Arc<T> {
    fn list_products(&self) -> impl Future<Output = Result<Vec<Product>, ApiError>> + Send {
        (**self).list_products()
    }

    fn get_product(&self, id: u64) -> impl Future<Output = Result<Product, ApiError>> + Send {
        (**self).get_product(id)
    }

    fn create_product(
        &self,
        payload: ProductPayload,
    ) -> impl Future<Output = Result<Product, ApiError>> + Send {
        (**self).create_product(payload)
    }

    fn update_product(
        &self,
        id: u64,
        payload: ProductPayload,
    ) -> impl Future<Output = Result<Product, ApiError>> + Send {
        (**self).update_product(id, payload)
    }

    fn delete_product(&self, id: u64) -> impl Future<Output = Result<(), ApiError>> + Send {
        (**self).delete_product(id)
    }

    fn image_url(&self, id: u64) -> String {
        (**self).image_url(id)
    }
}

/// HTTP implementation of `CatalogApi`. Holds a reqwest client and the
/// base URL of the catalog server.
#[derive(Clone, Debug)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    /// Build a client from the startup configuration.
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;
        Ok(CatalogClient {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Client with default options pointed at `base_url`.
    pub fn with_base_url(base_url: &str) -> Result<Self, ApiError> {
        Self::new(&AppConfig {
            api_base_url: base_url.to_string(),
            ..AppConfig::default()
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn products_url(&self) -> String {
        format!("{}/api/Product", self.base_url)
    }

    fn product_url(&self, id: u64) -> String {
        format!("{}/api/Product/{}", self.base_url, id)
    }
}

/// Turn non-success statuses into `ApiError::Status`, keeping the body
/// text for the log.
async fn check_status(res: Response) -> Result<Response, ApiError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().await.unwrap_or_default();
    Err(ApiError::Status { status, body })
}

impl CatalogApi for CatalogClient {
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        let url = self.products_url();
        debug!(%url, "GET products");
        let res = check_status(self.client.get(&url).send().await?).await?;
        Ok(res.json().await?)
    }

    async fn get_product(&self, id: u64) -> Result<Product, ApiError> {
        let url = self.product_url(id);
        debug!(%url, "GET product");
        let res = check_status(self.client.get(&url).send().await?).await?;
        Ok(res.json().await?)
    }

    async fn create_product(&self, payload: ProductPayload) -> Result<Product, ApiError> {
        let url = format!("{}/upload", self.products_url());
        debug!(%url, with_image = payload.image.is_some(), "POST product");
        let form = payload.into_multipart()?;
        let res = check_status(self.client.post(&url).multipart(form).send().await?).await?;
        Ok(res.json().await?)
    }

    async fn update_product(&self, id: u64, payload: ProductPayload) -> Result<Product, ApiError> {
        let url = self.product_url(id);
        debug!(%url, with_image = payload.image.is_some(), "PUT product");
        let form = payload.into_multipart()?;
        let res = check_status(self.client.put(&url).multipart(form).send().await?).await?;
        Ok(res.json().await?)
    }

    async fn delete_product(&self, id: u64) -> Result<(), ApiError> {
        let url = self.product_url(id);
        debug!(%url, "DELETE product");
        check_status(self.client.delete(&url).send().await?).await?;
        Ok(())
    }

    fn image_url(&self, id: u64) -> String {
        format!("{}/image", self.product_url(id))
    }
}
