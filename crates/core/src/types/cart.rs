//! Shopping cart: a map of product id to line item.
//!
//! The cart is plain data. Persistence (the browser cookie) lives in the
//! storefront crate; this module only knows how to mutate the map and how to
//! read and write its JSON representation.
//!
//! # Wire format
//!
//! ```json
//! {
//!   "12": { "id": "12", "name": "Martabak Telur", "price": 10000, "image": "/static/img/telur.jpg", "quantity": 2 }
//! }
//! ```
//!
//! The object key is authoritative for the id. Legacy values written by the
//! old site store `id` as a number, so the inner field is ignored on read.

use std::collections::BTreeMap;
use std::num::NonZeroU32;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::ProductId;
use super::price::Price;

/// Errors decoding a persisted cart.
#[derive(Debug, Error)]
pub enum CartCodecError {
    #[error("cart JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// One product's entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    pub id: ProductId,
    pub name: String,
    #[serde(rename = "price")]
    pub unit_price: Price,
    pub image: String,
    quantity: NonZeroU32,
}

impl LineItem {
    /// Quantity of this product in the cart (always at least one).
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity.get()
    }

    /// Unit price × quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity())
    }
}

/// A line item as it appears in a persisted cart, before validation.
#[derive(Deserialize)]
struct StoredLine {
    name: String,
    #[serde(deserialize_with = "rust_decimal::serde::float::deserialize")]
    price: Decimal,
    #[serde(default)]
    image: String,
    quantity: i64,
}

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: BTreeMap<ProductId, LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` of a product.
    ///
    /// An existing entry keeps its name, price and image and has its quantity
    /// increased; repeated calls accumulate.
    pub fn add_item(
        &mut self,
        id: ProductId,
        name: impl Into<String>,
        unit_price: Price,
        image: impl Into<String>,
        quantity: NonZeroU32,
    ) {
        self.items
            .entry(id.clone())
            .and_modify(|item| item.quantity = item.quantity.saturating_add(quantity.get()))
            .or_insert_with(|| LineItem {
                id,
                name: name.into(),
                unit_price,
                image: image.into(),
                quantity,
            });
    }

    /// Set the quantity of an existing entry.
    ///
    /// A quantity of zero or less removes the entry. Unknown ids are ignored.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: i64) {
        if quantity <= 0 {
            self.items.remove(id);
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        let Some(quantity) = NonZeroU32::new(quantity) else {
            return;
        };

        if let Some(item) = self.items.get_mut(id) {
            item.quantity = quantity;
        }
    }

    /// Remove an entry. Returns the removed item, if any.
    pub fn remove_item(&mut self, id: &ProductId) -> Option<LineItem> {
        self.items.remove(id)
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of quantities across all entries.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .values()
            .fold(0u32, |acc, item| acc.saturating_add(item.quantity()))
    }

    /// Sum of unit price × quantity across all entries.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.values().map(LineItem::line_total).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.get(id)
    }

    /// Iterate entries in ascending id order.
    pub fn items(&self) -> impl Iterator<Item = &LineItem> {
        self.items.values()
    }

    /// Serialize to the persisted JSON representation.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, CartCodecError> {
        Ok(serde_json::to_string(&self.items)?)
    }

    /// Parse the persisted JSON representation.
    ///
    /// Entries with a non-positive quantity or a negative price are dropped
    /// so the line item invariants hold after hydration.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a JSON object of line items.
    pub fn from_json(raw: &str) -> Result<Self, CartCodecError> {
        let stored: BTreeMap<String, StoredLine> = serde_json::from_str(raw)?;

        let items = stored
            .into_iter()
            .filter_map(|(key, line)| {
                let quantity = u32::try_from(line.quantity)
                    .ok()
                    .and_then(NonZeroU32::new)?;
                let unit_price = Price::new(line.price).ok()?;
                let id = ProductId::new(key);
                Some((
                    id.clone(),
                    LineItem {
                        id,
                        name: line.name,
                        unit_price,
                        image: line.image,
                        quantity,
                    },
                ))
            })
            .collect();

        Ok(Self { items })
    }
}
