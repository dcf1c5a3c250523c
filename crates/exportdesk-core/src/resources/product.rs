//! Product catalog records.

use serde::Deserialize;

use super::ResourceKind;

/// A catalog product as the server returns it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_src: Option<String>,
}

/// Kind descriptor for the `/products` collection.
#[derive(Debug, Clone, Copy)]
pub struct Products;

impl ResourceKind for Products {
    type Record = Product;
    const PATH: &'static str = "/products";
    const NAME: &'static str = "product";
    const ACCEPTS_IMAGE: bool = true;

    fn id(record: &Self::Record) -> &str {
        &record.id
    }
}
