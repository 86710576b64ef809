use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use catalog_admin::api::{CatalogApi, Product, ProductPayload};
use catalog_admin::error::ApiError;
use reqwest::StatusCode;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List,
    Get(u64),
    Create(ProductPayload),
    Update(u64, ProductPayload),
    Delete(u64),
}

/// In-memory catalog that records every call made against it.
#[derive(Default)]
pub struct MockCatalog {
    products: Mutex<Vec<Product>>,
    calls: Mutex<Vec<Call>>,
    pub fail_list: AtomicBool,
    pub fail_delete: AtomicBool,
    pub fail_write: AtomicBool,
}

fn status(code: StatusCode) -> ApiError {
    ApiError::Status {
        status: code,
        body: String::new(),
    }
}

impl MockCatalog {
    pub fn with_products(products: Vec<Product>) -> Self {
        MockCatalog {
            products: Mutex::new(products),
            ..MockCatalog::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fail(flag: &AtomicBool) {
        flag.store(true, Ordering::SeqCst);
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn from_payload(id: u64, payload: &ProductPayload) -> Product {
        Product {
            id,
            name: payload.name.clone(),
            image: payload.image.as_ref().map(|f| format!("/images/{}", f.file_name)),
            price: payload.price,
            description: payload.description.clone(),
            stock_quantity: payload.stock_quantity,
            category_id: payload.category_id,
            created_by_admin_id: payload.created_by_admin_id,
        }
    }
}

impl CatalogApi for MockCatalog {
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.record(Call::List);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(status(StatusCode::INTERNAL_SERVER_ERROR));
        }
        Ok(self.products.lock().unwrap().clone())
    }

    async fn get_product(&self, id: u64) -> Result<Product, ApiError> {
        self.record(Call::Get(id));
        let products = self.products.lock().unwrap();
        products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| status(StatusCode::NOT_FOUND))
    }

    async fn create_product(&self, payload: ProductPayload) -> Result<Product, ApiError> {
        self.record(Call::Create(payload.clone()));
        if self.fail_write.load(Ordering::SeqCst) {
            return Err(status(StatusCode::BAD_REQUEST));
        }
        let mut products = self.products.lock().unwrap();
        let id = products.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let product = Self::from_payload(id, &payload);
        products.push(product.clone());
        Ok(product)
    }

    async fn update_product(&self, id: u64, payload: ProductPayload) -> Result<Product, ApiError> {
        self.record(Call::Update(id, payload.clone()));
        if self.fail_write.load(Ordering::SeqCst) {
            return Err(status(StatusCode::BAD_REQUEST));
        }
        let mut products = self.products.lock().unwrap();
        let existing = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| status(StatusCode::NOT_FOUND))?;
        let mut updated = Self::from_payload(id, &payload);
        if updated.image.is_none() {
            updated.image = existing.image.clone();
        }
        *existing = updated.clone();
        Ok(updated)
    }

    async fn delete_product(&self, id: u64) -> Result<(), ApiError> {
        self.record(Call::Delete(id));
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(status(StatusCode::INTERNAL_SERVER_ERROR));
        }
        let mut products = self.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| p.id != id);
        if products.len() == before {
            return Err(status(StatusCode::NOT_FOUND));
        }
        Ok(())
    }

    fn image_url(&self, id: u64) -> String {
        format!("http://catalog.test/api/Product/{}/image", id)
    }
}
