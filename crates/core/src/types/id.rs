//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

use thiserror::Error;

/// Error returned when an ID string is not a valid UUID.
#[derive(Debug, Clone, Error)]
#[error("invalid {kind}: {reason}")]
pub struct IdError {
    /// Name of the ID type that failed to parse.
    pub kind: &'static str,
    /// Parser error message.
    pub reason: String,
}

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `uuid::Uuid` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `generate()`, `as_uuid()`
/// - `FromStr` (via `parse()`), `Display`, and `From<Uuid>` implementations
///
/// # Example
///
/// ```rust
/// # use stayhub_core::define_id;
/// define_id!(PropertyId);
/// define_id!(UserId);
///
/// let property_id = PropertyId::generate();
/// let user_id = UserId::generate();
///
/// // These are different types, so this won't compile:
/// // let _: UserId = property_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Create a new ID from a UUID value.
            #[must_use]
            pub const fn new(id: ::uuid::Uuid) -> Self {
                Self(id)
            }

            /// Generate a fresh random (v4) ID.
            #[must_use]
            pub fn generate() -> Self {
                Self(::uuid::Uuid::new_v4())
            }

            /// Get the underlying UUID value.
            #[must_use]
            pub const fn as_uuid(&self) -> ::uuid::Uuid {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::IdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                ::uuid::Uuid::parse_str(s.trim())
                    .map(Self)
                    .map_err(|e| $crate::IdError {
                        kind: stringify!($name),
                        reason: e.to_string(),
                    })
            }
        }

        impl From<::uuid::Uuid> for $name {
            fn from(id: ::uuid::Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for ::uuid::Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(PropertyId);
define_id!(UserId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_id() {
        let id: PropertyId = "6f1c2a4e-8a7b-4c1d-9e2f-3a4b5c6d7e8f".parse().unwrap();
        assert_eq!(id.to_string(), "6f1c2a4e-8a7b-4c1d-9e2f-3a4b5c6d7e8f");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let id: UserId = "  6f1c2a4e-8a7b-4c1d-9e2f-3a4b5c6d7e8f\n".parse().unwrap();
        assert_eq!(id.to_string(), "6f1c2a4e-8a7b-4c1d-9e2f-3a4b5c6d7e8f");
    }

    #[test]
    fn test_parse_invalid_id_names_kind() {
        let err = "not-a-uuid".parse::<PropertyId>().unwrap_err();
        assert_eq!(err.kind, "PropertyId");
        assert!(err.to_string().starts_with("invalid PropertyId"));
    }

    #[test]
    fn test_generate_is_unique() {
        assert_ne!(PropertyId::generate(), PropertyId::generate());
    }

    #[test]
    fn test_serde_is_transparent() {
        let id: PropertyId = "6f1c2a4e-8a7b-4c1d-9e2f-3a4b5c6d7e8f".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"6f1c2a4e-8a7b-4c1d-9e2f-3a4b5c6d7e8f\"");
    }
}
