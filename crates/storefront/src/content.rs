//! Static catalog and testimonial content.
//!
//! Loaded once at startup from JSON files in the content directory:
//!
//! ```text
//! content/
//!   products.json       [{ "id", "slug", "name", "price", "image", "description", "featured", "stock" }]
//!   testimonials.json   [{ "rating", "text", "author" }]
//! ```
//!
//! Nothing here is mutable at runtime. Products with zero stock stay in the
//! catalog but are hidden from listings and detail pages, and cannot be
//! added to the cart.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use martabak_core::{Price, ProductId, ProductSlug, Testimonial};
use serde::Deserialize;
use thiserror::Error;

const PRODUCTS_FILE: &str = "products.json";
const TESTIMONIALS_FILE: &str = "testimonials.json";

/// Errors loading content at startup.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("duplicate product {field}: {value}")]
    Duplicate { field: &'static str, value: String },
}

/// A catalog product.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub slug: ProductSlug,
    pub name: String,
    pub price: Price,
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub featured: bool,
    /// Units on hand; zero hides the product.
    pub stock: u32,
}

impl Product {
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Listing order requested by `?sort=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductSort {
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
}

impl ProductSort {
    /// Parse a sort key (`price`, `-price`, `name`, `-name`).
    ///
    /// Unknown keys yield `None` and the catalog order is kept.
    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        match key.trim() {
            "price" => Some(Self::PriceAsc),
            "-price" => Some(Self::PriceDesc),
            "name" => Some(Self::NameAsc),
            "-name" => Some(Self::NameDesc),
            _ => None,
        }
    }

    /// The key this order is requested with.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::PriceAsc => "price",
            Self::PriceDesc => "-price",
            Self::NameAsc => "name",
            Self::NameDesc => "-name",
        }
    }
}

/// Price bounds and ordering for the product listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Inclusive lower price bound.
    pub min_price: Option<Price>,
    /// Inclusive upper price bound.
    pub max_price: Option<Price>,
    pub sort: Option<ProductSort>,
}

impl ProductFilter {
    fn matches(&self, product: &Product) -> bool {
        self.min_price.is_none_or(|min| product.price >= min)
            && self.max_price.is_none_or(|max| product.price <= max)
    }
}

/// All static content.
#[derive(Debug, Clone, Default)]
pub struct Content {
    products: Vec<Product>,
    testimonials: Vec<Testimonial>,
}

impl Content {
    /// Load content from a directory.
    ///
    /// # Errors
    ///
    /// Returns an error if a file is missing or malformed, or if two products
    /// share an id or slug.
    pub fn load(dir: &Path) -> Result<Self, ContentError> {
        let products: Vec<Product> = read_json(&dir.join(PRODUCTS_FILE))?;
        let testimonials: Vec<Testimonial> = read_json(&dir.join(TESTIMONIALS_FILE))?;
        let content = Self::new(products, testimonials)?;

        tracing::info!(
            products = content.products.len(),
            testimonials = content.testimonials.len(),
            "Content loaded"
        );
        Ok(content)
    }

    /// Build content from already-parsed values.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Duplicate` if two products share an id or slug.
    pub fn new(
        products: Vec<Product>,
        testimonials: Vec<Testimonial>,
    ) -> Result<Self, ContentError> {
        let mut ids = HashSet::new();
        let mut slugs = HashSet::new();
        for product in &products {
            if !ids.insert(&product.id) {
                return Err(ContentError::Duplicate {
                    field: "id",
                    value: product.id.to_string(),
                });
            }
            if !slugs.insert(&product.slug) {
                return Err(ContentError::Duplicate {
                    field: "slug",
                    value: product.slug.to_string(),
                });
            }
        }

        Ok(Self {
            products,
            testimonials,
        })
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// In-stock products flagged for the home page.
    pub fn featured_products(&self) -> impl Iterator<Item = &Product> {
        self.products
            .iter()
            .filter(|product| product.featured && product.in_stock())
    }

    /// In-stock products within the filter's price bounds, in the requested
    /// order. Ties keep catalog order.
    #[must_use]
    pub fn listed_products(&self, filter: &ProductFilter) -> Vec<&Product> {
        let mut products: Vec<&Product> = self
            .products
            .iter()
            .filter(|product| product.in_stock() && filter.matches(product))
            .collect();

        match filter.sort {
            Some(ProductSort::PriceAsc) => products.sort_by_key(|p| p.price),
            Some(ProductSort::PriceDesc) => products.sort_by(|a, b| b.price.cmp(&a.price)),
            Some(ProductSort::NameAsc) => products.sort_by(|a, b| a.name.cmp(&b.name)),
            Some(ProductSort::NameDesc) => products.sort_by(|a, b| b.name.cmp(&a.name)),
            None => {}
        }
        products
    }

    /// Look up an in-stock product by slug.
    #[must_use]
    pub fn product_by_slug(&self, slug: &str) -> Option<&Product> {
        self.products
            .iter()
            .find(|product| product.slug.as_str() == slug && product.in_stock())
    }

    /// Look up any catalog product by id, in stock or not.
    #[must_use]
    pub fn product_by_id(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }

    #[must_use]
    pub fn testimonials(&self) -> &[Testimonial] {
        &self.testimonials
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ContentError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ContentError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
