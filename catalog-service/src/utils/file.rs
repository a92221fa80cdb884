use crate::models::book::RawCatalog;
use crate::models::catalog::{Catalog, CatalogError};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_CATALOG_PATH: &str = "data/catalog.json";

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Data integrity error: {0}")]
    Integrity(#[from] CatalogError),
}

pub fn read_raw_catalog(path: impl AsRef<Path>) -> Result<RawCatalog, LoadError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn load_catalog_file(path: impl AsRef<Path>) -> Result<Catalog, LoadError> {
    let raw = read_raw_catalog(path)?;
    Ok(Catalog::load(raw)?)
}
