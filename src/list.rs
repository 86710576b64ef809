// Product list view model: loads the catalog, keeps the displayed
// products and turns add/edit/delete actions into routes or requests.

use tracing::{error, info, warn};

use crate::api::{CatalogApi, Product};
use crate::error::ViewError;
use crate::gate::RequestGate;
use crate::route::FormRoute;

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this product?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    Idle,
    Loading,
    Loaded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

/// One rendered line of the product table.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRow {
    pub id: u64,
    pub name: String,
    pub price: f64,
    pub stock_quantity: u32,
    pub category_id: u32,
    pub image_url: String,
}

/// Where to display an image from. Embedded data URLs and absolute URLs
/// are used as they are; anything else is served by the catalog's
/// per-product image endpoint.
pub fn resolve_image<C: CatalogApi>(catalog: &C, product_id: u64, image: Option<&str>) -> String {
    match image.map(str::trim) {
        Some(src) if src.starts_with("data:image") => src.to_string(),
        Some(src) if src.starts_with("http://") || src.starts_with("https://") => src.to_string(),
        _ => catalog.image_url(product_id),
    }
}

pub struct ProductList<C> {
    catalog: C,
    products: Vec<Product>,
    state: ListState,
    gate: RequestGate,
}

impl<C: CatalogApi> ProductList<C> {
    pub fn new(catalog: C) -> Self {
        ProductList {
            catalog,
            products: Vec::new(),
            state: ListState::Idle,
            gate: RequestGate::default(),
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn state(&self) -> ListState {
        self.state
    }

    pub fn gate(&self) -> &RequestGate {
        &self.gate
    }

    /// Fetch the product list. Can be called again to refresh.
    pub async fn activate(&mut self) -> Result<(), ViewError> {
        let Some(_permit) = self.gate.try_acquire() else {
            warn!("Product list is already busy");
            return Err(ViewError::Busy);
        };
        self.state = ListState::Loading;

        match self.catalog.list_products().await {
            Ok(products) => {
                info!(count = products.len(), "Fetched products");
                self.products = products;
                self.state = ListState::Loaded;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Error fetching products");
                self.products.clear();
                self.state = ListState::Failed;
                Err(e.into())
            }
        }
    }

    pub fn request_add(&self) -> FormRoute {
        FormRoute::add()
    }

    pub fn request_edit(&self, product: &Product) -> FormRoute {
        FormRoute::edit(product.id)
    }

    /// Ask `confirm` before deleting product `id`. On success the product is
    /// dropped from the local list without re-fetching it.
    pub async fn request_delete(
        &mut self,
        id: u64,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<DeleteOutcome, ViewError> {
        if !confirm(DELETE_PROMPT) {
            return Ok(DeleteOutcome::Cancelled);
        }
        let Some(_permit) = self.gate.try_acquire() else {
            warn!(id, "Delete rejected, another request is in flight");
            return Err(ViewError::Busy);
        };

        match self.catalog.delete_product(id).await {
            Ok(()) => {
                self.products.retain(|p| p.id != id);
                info!(id, "Product deleted");
                Ok(DeleteOutcome::Deleted)
            }
            Err(e) => {
                error!(id, error = %e, "Error deleting product");
                Err(e.into())
            }
        }
    }

    pub fn resolve_image(&self, product: &Product) -> String {
        resolve_image(&self.catalog, product.id, product.image.as_deref())
    }

    pub fn rows(&self) -> Vec<ProductRow> {
        self.products
            .iter()
            .map(|p| ProductRow {
                id: p.id,
                name: p.name.clone(),
                price: p.price,
                stock_quantity: p.stock_quantity,
                category_id: p.category_id,
                image_url: self.resolve_image(p),
            })
            .collect()
    }
}
