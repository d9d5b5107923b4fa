//! Identifier types for elements, pages and fonts
//!
//! Identifiers are opaque strings so that documents written by other tools
//! (for example the initial `page-1`) survive a load/save cycle unchanged.
//! Freshly allocated ids carry a kind prefix and a UUID v4.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Allocate a new, globally unique id
            pub fn new() -> Self {
                Self(format!(concat!($prefix, "-{}"), Uuid::new_v4().simple()))
            }

            /// Wrap an existing id string
            pub fn from_string(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Borrow the id as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Unique identifier of a design element
    ElementId,
    "element"
);

string_id!(
    /// Unique identifier of a page
    PageId,
    "page"
);

string_id!(
    /// Unique identifier of a registered custom font
    FontId,
    "font"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_are_unique_and_prefixed() {
        let a = ElementId::new();
        let b = ElementId::new();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("element-"));
        assert!(PageId::new().as_str().starts_with("page-"));
        assert!(FontId::new().as_str().starts_with("font-"));
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = PageId::from("page-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"page-1\"");
        let back: PageId = serde_json::from_str("\"page-1\"").unwrap();
        assert_eq!(back, id);
    }
}
