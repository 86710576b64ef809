// Validation rules of the product form, kept as a table keyed by field so
// the constraints live in one place instead of being spread over the view.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static DECIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d+(\.\d+)?$").unwrap());
static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d+$").unwrap());

/// Form fields, named after their multipart wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    ProductName,
    Productimg,
    Description,
    Price,
    StockQuantity,
    CategoryId,
}

impl Field {
    pub fn wire_name(self) -> &'static str {
        match self {
            Field::ProductName => "ProductName",
            Field::Productimg => "Productimg",
            Field::Description => "Description",
            Field::Price => "Price",
            Field::StockQuantity => "StockQuantity",
            Field::CategoryId => "CategoryId",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::ProductName => "Name",
            Field::Productimg => "Image",
            Field::Description => "Description",
            Field::Price => "Price",
            Field::StockQuantity => "Stock quantity",
            Field::CategoryId => "Category id",
        }
    }
}

#[derive(Debug)]
pub enum Rule {
    Required,
    /// Required only when creating a product.
    RequiredOnCreate,
    Min(f64),
    Pattern(&'static Lazy<Regex>, &'static str),
}

pub static FORM_RULES: &[(Field, &[Rule])] = &[
    (Field::ProductName, &[Rule::Required]),
    (Field::Productimg, &[Rule::RequiredOnCreate]),
    (Field::Description, &[Rule::Required]),
    (
        Field::Price,
        &[Rule::Required, Rule::Pattern(&DECIMAL, "a number"), Rule::Min(0.0)],
    ),
    (
        Field::StockQuantity,
        &[Rule::Required, Rule::Pattern(&INTEGER, "a whole number"), Rule::Min(0.0)],
    ),
    (
        Field::CategoryId,
        &[Rule::Required, Rule::Pattern(&INTEGER, "a whole number"), Rule::Min(1.0)],
    ),
];

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{} {message}", .field.label())]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        FieldError {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn has(&self, field: Field) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

/// Check every field of `FORM_RULES`. `value_of` yields the raw value of a
/// field, `None` when it has none. The first broken rule of a field is
/// reported; all fields are checked.
pub fn validate<'a>(
    value_of: impl Fn(Field) -> Option<&'a str>,
    creating: bool,
) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    for (field, rules) in FORM_RULES {
        let value = value_of(*field).map(str::trim).unwrap_or("");
        if let Some(message) = rules.iter().find_map(|rule| check(rule, value, creating)) {
            errors.push(FieldError::new(*field, message));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}

fn check(rule: &Rule, value: &str, creating: bool) -> Option<String> {
    match rule {
        Rule::Required if value.is_empty() => Some("is required".to_string()),
        Rule::RequiredOnCreate if creating && value.is_empty() => Some("is required".to_string()),
        Rule::Pattern(regex, what) if !value.is_empty() && !regex.is_match(value) => {
            Some(format!("must be {}", what))
        }
        Rule::Min(min) if !value.is_empty() => match value.parse::<f64>() {
            Ok(n) if n < *min => Some(format!("must be at least {}", min)),
            Ok(_) => None,
            Err(_) => Some("must be a number".to_string()),
        },
        _ => None,
    }
}
