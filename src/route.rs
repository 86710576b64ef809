use reqwest::Url;

pub const FORM_PATH: &str = "/admin-product-form";

/// Navigation target of the product form. Carries the id of the product
/// to edit as the `id` query parameter; no id means add mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormRoute {
    pub product_id: Option<u64>,
}

impl FormRoute {
    pub fn add() -> Self {
        FormRoute { product_id: None }
    }

    pub fn edit(product_id: u64) -> Self {
        FormRoute {
            product_id: Some(product_id),
        }
    }

    pub fn path(&self) -> String {
        match self.product_id {
            Some(id) => format!("{}?id={}", FORM_PATH, id),
            None => FORM_PATH.to_string(),
        }
    }

    /// Parse a path such as `/admin-product-form?id=7`. Returns `None` for
    /// other paths. An `id` that is not a number is ignored.
    pub fn parse(path: &str) -> Option<Self> {
        let url = Url::parse("http://localhost").ok()?.join(path).ok()?;
        if url.path() != FORM_PATH {
            return None;
        }
        let product_id = url
            .query_pairs()
            .find(|(key, _)| key == "id")
            .and_then(|(_, value)| value.parse().ok());
        Some(FormRoute { product_id })
    }
}
