// Product form view model. Handles both adding and editing: in edit mode
// the product is loaded first and the submission becomes an update.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use mime_guess::mime;
use tracing::{error, info, warn};

use crate::api::{CatalogApi, ImageFile, Product, ProductPayload};
use crate::error::ViewError;
use crate::gate::RequestGate;
use crate::list::resolve_image;
use crate::route::FormRoute;
use crate::session::AdminSession;
use crate::validation::{self, Field, FieldError, ValidationErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Uninitialized,
    EditLoading,
    Ready,
    Submitting,
    Succeeded,
    Failed,
}

/// What the image preview currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ImagePreview {
    None,
    /// Reference stored on the server.
    Remote(String),
    /// `data:` URL of a locally picked file.
    Data(String),
    /// The picked file could not be used.
    Unreadable(String),
}

/// Raw form input, as typed by the user.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductFields {
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock_quantity: String,
    pub category_id: String,
    pub created_by_admin_id: u32,
}

impl ProductFields {
    pub fn empty(session: &AdminSession) -> Self {
        ProductFields {
            created_by_admin_id: session.admin_id(),
            ..ProductFields::default()
        }
    }

    pub fn from_product(product: &Product) -> Self {
        ProductFields {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
            stock_quantity: product.stock_quantity.to_string(),
            category_id: product.category_id.to_string(),
            created_by_admin_id: product.created_by_admin_id,
        }
    }

    pub fn value(&self, field: Field) -> Option<&str> {
        match field {
            Field::ProductName => Some(&self.name),
            Field::Description => Some(&self.description),
            Field::Price => Some(&self.price),
            Field::StockQuantity => Some(&self.stock_quantity),
            Field::CategoryId => Some(&self.category_id),
            Field::Productimg => None,
        }
    }

    /// Convert already validated input into the typed payload.
    fn to_payload(&self, image: Option<ImageFile>) -> Result<ProductPayload, ValidationErrors> {
        let out_of_range = |field| ValidationErrors(vec![FieldError::new(field, "is out of range")]);
        Ok(ProductPayload {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            price: self
                .price
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|price| price.is_finite())
                .ok_or_else(|| out_of_range(Field::Price))?,
            stock_quantity: self
                .stock_quantity
                .trim()
                .parse()
                .map_err(|_| out_of_range(Field::StockQuantity))?,
            category_id: self
                .category_id
                .trim()
                .parse()
                .map_err(|_| out_of_range(Field::CategoryId))?,
            created_by_admin_id: self.created_by_admin_id,
            image,
        })
    }
}

pub struct ProductForm<C> {
    catalog: C,
    session: AdminSession,
    mode: FormMode,
    phase: FormPhase,
    pub fields: ProductFields,
    preview: ImagePreview,
    /// Existing image reference of the edited product.
    stored_image: Option<String>,
    selected_file: Option<ImageFile>,
    load_error: Option<String>,
    gate: RequestGate,
}

impl<C: CatalogApi> ProductForm<C> {
    pub fn new(catalog: C, session: AdminSession, route: FormRoute) -> Self {
        let mode = match route.product_id {
            Some(id) => FormMode::Edit(id),
            None => FormMode::Add,
        };
        ProductForm {
            catalog,
            session,
            mode,
            phase: FormPhase::Uninitialized,
            fields: ProductFields::empty(&session),
            preview: ImagePreview::None,
            stored_image: None,
            selected_file: None,
            load_error: None,
            gate: RequestGate::default(),
        }
    }

    pub fn session(&self) -> &AdminSession {
        &self.session
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn preview(&self) -> &ImagePreview {
        &self.preview
    }

    pub fn selected_file(&self) -> Option<&ImageFile> {
        self.selected_file.as_ref()
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn gate(&self) -> &RequestGate {
        &self.gate
    }

    /// Where the preview can be displayed from, if there is one.
    pub fn preview_src(&self) -> Option<String> {
        match (&self.preview, self.mode) {
            (ImagePreview::Data(src), _) => Some(src.clone()),
            (ImagePreview::Remote(src), FormMode::Edit(id)) => {
                Some(resolve_image(&self.catalog, id, Some(src.as_str())))
            }
            (ImagePreview::Remote(src), FormMode::Add) => Some(src.clone()),
            _ => None,
        }
    }

    /// Get the form ready. In edit mode this loads the product; if that
    /// fails the fields keep their initial values and the error is returned.
    pub async fn activate(&mut self) -> Result<(), ViewError> {
        let FormMode::Edit(id) = self.mode else {
            self.phase = FormPhase::Ready;
            return Ok(());
        };
        let Some(_permit) = self.gate.try_acquire() else {
            return Err(ViewError::Busy);
        };
        self.phase = FormPhase::EditLoading;

        let result = self.catalog.get_product(id).await;
        self.phase = FormPhase::Ready;
        match result {
            Ok(product) => {
                self.fields = ProductFields::from_product(&product);
                self.preview = match &product.image {
                    Some(image) => ImagePreview::Remote(image.clone()),
                    None => ImagePreview::None,
                };
                self.stored_image = product.image;
                self.load_error = None;
                Ok(())
            }
            Err(e) => {
                error!(id, error = %e, "Error loading product for edit");
                self.load_error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Read the picked image, show it as a `data:` URL preview and keep it
    /// for upload. A rejected file also drops any earlier pick.
    pub async fn select_image(&mut self, path: &Path) -> Result<(), ViewError> {
        let mime_type = mime_guess::from_path(path).first_or_octet_stream();
        if mime_type.type_() != mime::IMAGE {
            warn!(path = %path.display(), mime = %mime_type, "Selected file is not an image");
            self.preview = ImagePreview::Unreadable(format!("not an image ({})", mime_type));
            self.selected_file = None;
            return Err(ViewError::NotAnImage {
                path: path.to_path_buf(),
                mime: mime_type.to_string(),
            });
        }

        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(source) => {
                error!(path = %path.display(), error = %source, "Failed to read image");
                self.preview = ImagePreview::Unreadable(source.to_string());
                self.selected_file = None;
                return Err(ViewError::ImageRead {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        self.preview = ImagePreview::Data(format!("data:{};base64,{}", mime_type, STANDARD.encode(&bytes)));
        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("image")
            .to_string();
        self.selected_file = Some(ImageFile {
            file_name,
            mime: mime_type.to_string(),
            bytes,
        });
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let has_image = self.selected_file.is_some() || self.stored_image.is_some();
        validation::validate(
            |field| match field {
                Field::Productimg => has_image.then_some("present"),
                other => self.fields.value(other),
            },
            self.mode == FormMode::Add,
        )
    }

    /// Validate and send the form. Only a freshly picked file is uploaded;
    /// the stored image of an edited product is left as it is.
    pub async fn submit(&mut self) -> Result<Product, ViewError> {
        if matches!(self.phase, FormPhase::Uninitialized | FormPhase::EditLoading) {
            return Err(ViewError::NotReady);
        }
        let Some(_permit) = self.gate.try_acquire() else {
            warn!("Submit rejected, another request is in flight");
            return Err(ViewError::Busy);
        };
        let payload = match self
            .validate()
            .and_then(|()| self.fields.to_payload(self.selected_file.clone()))
        {
            Ok(payload) => payload,
            Err(errors) => {
                warn!(%errors, "Form is invalid");
                return Err(errors.into());
            }
        };

        self.phase = FormPhase::Submitting;
        let result = match self.mode {
            FormMode::Edit(id) => self.catalog.update_product(id, payload).await,
            FormMode::Add => self.catalog.create_product(payload).await,
        };

        match result {
            Ok(product) => {
                match self.mode {
                    FormMode::Edit(_) => info!(id = product.id, "Product updated successfully"),
                    FormMode::Add => info!(id = product.id, "Product added successfully"),
                }
                self.phase = FormPhase::Succeeded;
                Ok(product)
            }
            Err(e) => {
                error!(error = %e, "Error saving product");
                self.phase = FormPhase::Failed;
                Err(e.into())
            }
        }
    }
}
