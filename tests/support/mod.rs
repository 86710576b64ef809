#![allow(dead_code)]

pub mod mock;
pub mod server;

use catalog_admin::api::Product;

pub fn product(id: u64, name: &str) -> Product {
    Product {
        id,
        name: name.to_string(),
        image: Some(format!("/images/{}.png", id)),
        price: 10.0 + id as f64,
        description: format!("{} description", name),
        stock_quantity: 5,
        category_id: 1,
        created_by_admin_id: 1,
    }
}

/// A file under the temp dir, removed again when dropped.
pub struct TempFile {
    path: std::path::PathBuf,
}

impl std::ops::Deref for TempFile {
    type Target = std::path::Path;

    fn deref(&self) -> &std::path::Path {
        &self.path
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Write a small file under the temp dir.
pub fn temp_file(name: &str, bytes: &[u8]) -> TempFile {
    let path = std::env::temp_dir().join(format!("catalog-admin-{}-{}", std::process::id(), name));
    std::fs::write(&path, bytes).expect("Failed to write temp file");
    TempFile { path }
}
