//! Newtype identifiers for type-safe catalog references.
//!
//! Use the `define_id!` macro to create type-safe string wrappers that prevent
//! accidentally mixing a product id with a URL slug.

/// Macro to define a type-safe string identifier.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`
/// - `From<String>`, `From<&str>`, `Display` and `AsRef<str>` implementations
///
/// # Example
///
/// ```rust
/// # use martabak_core::define_id;
/// define_id!(SkuId);
/// define_id!(BundleId);
///
/// let sku = SkuId::new("12");
/// let bundle = BundleId::new("12");
///
/// // These are different types, so this won't compile:
/// // let _: SkuId = bundle;
/// assert_eq!(sku.as_str(), bundle.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::convert::AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(ProductSlug);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_as_str() {
        let id = ProductId::new("42");
        assert_eq!(id.as_str(), "42");
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_serde_is_transparent() {
        let slug = ProductSlug::from("martabak-manis");
        let json = serde_json::to_string(&slug).unwrap();
        assert_eq!(json, "\"martabak-manis\"");

        let parsed: ProductSlug = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, slug);
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let mut ids = vec![ProductId::new("b"), ProductId::new("a")];
        ids.sort();
        assert_eq!(ids, vec![ProductId::new("a"), ProductId::new("b")]);
    }
}
