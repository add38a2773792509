//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use martabak_core::Price;
use serde::Deserialize;
use tracing::instrument;

use crate::content::{Product, ProductFilter, ProductSort};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::CspNonce;
use crate::state::AppState;
use crate::store::CartStore;

/// Product display data for templates.
///
/// `price_value` is the plain number the add-to-cart control posts; `price`
/// is the formatted label.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub price: String,
    pub price_value: String,
    pub image: String,
    pub description: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            slug: product.slug.to_string(),
            name: product.name.clone(),
            price: product.price.display(),
            price_value: product.price.to_plain_string(),
            image: product.image.clone(),
            description: product.description.clone(),
        }
    }
}

/// Listing query string: `?min_price=&max_price=&sort=`.
///
/// Values are kept as strings so that an unparseable bound or unknown sort
/// key is ignored instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub sort: Option<String>,
}

impl ProductQuery {
    /// The filter this query asks for, dropping values that do not parse.
    #[must_use]
    pub fn filter(&self) -> ProductFilter {
        let price = |raw: &Option<String>| {
            raw.as_deref()
                .filter(|value| !value.trim().is_empty())
                .and_then(|value| value.parse::<Price>().ok())
        };
        ProductFilter {
            min_price: price(&self.min_price),
            max_price: price(&self.max_price),
            sort: self.sort.as_deref().and_then(ProductSort::parse),
        }
    }
}

/// The applied filter, echoed back into the listing form.
#[derive(Clone, Default)]
pub struct FilterView {
    pub min_price: String,
    pub max_price: String,
    pub sort: String,
}

impl From<&ProductFilter> for FilterView {
    fn from(filter: &ProductFilter) -> Self {
        Self {
            min_price: filter
                .min_price
                .map(|p| p.to_plain_string())
                .unwrap_or_default(),
            max_price: filter
                .max_price
                .map(|p| p.to_plain_string())
                .unwrap_or_default(),
            sort: filter.sort.map(ProductSort::key).unwrap_or_default().to_string(),
        }
    }
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductView>,
    pub filter: FilterView,
    pub cart_count: u32,
    pub nonce: String,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductView,
    pub cart_count: u32,
    pub nonce: String,
}

/// Display product listing page.
///
/// Only in-stock products are listed, optionally bounded by price and
/// sorted.
#[instrument(skip(state, store, nonce))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
    store: CartStore,
    CspNonce(nonce): CspNonce,
) -> impl IntoResponse {
    let filter = query.filter();

    ProductsIndexTemplate {
        products: state
            .content()
            .listed_products(&filter)
            .into_iter()
            .map(ProductView::from)
            .collect(),
        filter: FilterView::from(&filter),
        cart_count: store.load().item_count(),
        nonce,
    }
}

/// Display product detail page.
///
/// # Errors
///
/// Returns 404 if no in-stock product has this slug.
#[instrument(skip(state, store, nonce))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    store: CartStore,
    CspNonce(nonce): CspNonce,
) -> Result<impl IntoResponse> {
    let product = state
        .content()
        .product_by_slug(&slug)
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))?;

    Ok(ProductShowTemplate {
        product: ProductView::from(product),
        cart_count: store.load().item_count(),
        nonce,
    })
}
