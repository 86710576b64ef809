// Fake catalog server for exercising `CatalogClient` over real HTTP.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use catalog_admin::api::Product;

#[derive(Default)]
struct Store {
    products: BTreeMap<u64, Product>,
    images: HashMap<u64, Vec<u8>>,
    next_id: u64,
    /// Field names of the last multipart body, in arrival order.
    last_fields: Vec<String>,
}

#[derive(Clone, Default)]
pub struct FakeCatalog {
    store: Arc<Mutex<Store>>,
}

impl FakeCatalog {
    pub fn last_fields(&self) -> Vec<String> {
        self.store.lock().unwrap().last_fields.clone()
    }

    pub fn image(&self, id: u64) -> Option<Vec<u8>> {
        self.store.lock().unwrap().images.get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.store.lock().unwrap().products.len()
    }
}

/// Start the fake server on a random local port. Returns its base URL.
pub async fn spawn() -> (String, FakeCatalog) {
    let catalog = FakeCatalog::default();
    let app = Router::new()
        .route("/api/Product", get(list))
        .route("/api/Product/upload", post(create))
        .route("/api/Product/:id", get(fetch).put(update).delete(remove))
        .route("/api/Product/:id/image", get(image))
        .with_state(catalog.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake catalog");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), catalog)
}

#[derive(Default)]
struct UploadForm {
    names: Vec<String>,
    fields: HashMap<String, String>,
    image: Option<(String, Vec<u8>)>,
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, StatusCode> {
    let mut form = UploadForm::default();
    while let Some(field) = multipart.next_field().await.map_err(|_| StatusCode::BAD_REQUEST)? {
        let name = field.name().unwrap_or_default().to_string();
        form.names.push(name.clone());
        if name == "Productimg" {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let bytes = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
            form.image = Some((file_name, bytes.to_vec()));
        } else {
            let text = field.text().await.map_err(|_| StatusCode::BAD_REQUEST)?;
            form.fields.insert(name, text);
        }
    }
    Ok(form)
}

fn parse<T: std::str::FromStr>(form: &UploadForm, name: &str) -> Result<T, StatusCode> {
    form.fields
        .get(name)
        .and_then(|v| v.parse().ok())
        .ok_or(StatusCode::BAD_REQUEST)
}

fn build(id: u64, form: &UploadForm, image: Option<String>) -> Result<Product, StatusCode> {
    Ok(Product {
        id,
        name: parse(form, "ProductName")?,
        image,
        price: parse(form, "Price")?,
        description: parse(form, "Description")?,
        stock_quantity: parse(form, "StockQuantity")?,
        category_id: parse(form, "CategoryId")?,
        created_by_admin_id: parse(form, "CreatedByAdminId")?,
    })
}

async fn list(State(catalog): State<FakeCatalog>) -> Json<Vec<Product>> {
    let store = catalog.store.lock().unwrap();
    Json(store.products.values().cloned().collect())
}

async fn fetch(State(catalog): State<FakeCatalog>, Path(id): Path<u64>) -> Result<Json<Product>, StatusCode> {
    let store = catalog.store.lock().unwrap();
    store.products.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn create(State(catalog): State<FakeCatalog>, multipart: Multipart) -> Result<Json<Product>, StatusCode> {
    let form = read_form(multipart).await?;
    let mut store = catalog.store.lock().unwrap();
    store.next_id += 1;
    let id = store.next_id;
    let image = form.image.as_ref().map(|(name, _)| format!("/images/{}", name));
    let product = build(id, &form, image)?;
    if let Some((_, bytes)) = &form.image {
        store.images.insert(id, bytes.clone());
    }
    store.last_fields = form.names;
    store.products.insert(id, product.clone());
    Ok(Json(product))
}

async fn update(
    State(catalog): State<FakeCatalog>,
    Path(id): Path<u64>,
    multipart: Multipart,
) -> Result<Json<Product>, StatusCode> {
    let form = read_form(multipart).await?;
    let mut store = catalog.store.lock().unwrap();
    let existing = store.products.get(&id).cloned().ok_or(StatusCode::NOT_FOUND)?;
    let image = match &form.image {
        Some((name, _)) => Some(format!("/images/{}", name)),
        None => existing.image,
    };
    let product = build(id, &form, image)?;
    if let Some((_, bytes)) = &form.image {
        store.images.insert(id, bytes.clone());
    }
    store.last_fields = form.names;
    store.products.insert(id, product.clone());
    Ok(Json(product))
}

async fn remove(State(catalog): State<FakeCatalog>, Path(id): Path<u64>) -> StatusCode {
    let mut store = catalog.store.lock().unwrap();
    match store.products.remove(&id) {
        Some(_) => {
            store.images.remove(&id);
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn image(State(catalog): State<FakeCatalog>, Path(id): Path<u64>) -> Result<Vec<u8>, StatusCode> {
    let store = catalog.store.lock().unwrap();
    store.images.get(&id).cloned().ok_or(StatusCode::NOT_FOUND)
}
