//! Newtype IDs for type-safe entity references.
//!
//! The T-Express API uses auto-increment integer keys for every resource.
//! `define_id!` wraps them so a `ProduitId` can never be passed where a
//! `LignePanierId` is expected.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Ord`
/// - Conversion methods: `new()`, `as_i64()`
/// - `From<i64>`, `Into<i64>` and `FromStr` implementations
///
/// # Example
///
/// ```rust
/// # use texpress_core::define_id;
/// define_id!(ClientId);
/// define_id!(CommandeId);
///
/// let client_id = ClientId::new(1);
/// let commande_id = CommandeId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: ClientId = commande_id;
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
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from an i64 value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(ClientId);
define_id!(ProduitId);
define_id!(CategorieId);
define_id!(LignePanierId);
define_id!(FavoriId);
define_id!(AdresseId);
define_id!(CommandeId);
define_id!(LivraisonId);
define_id!(PaiementId);
define_id!(RetourId);
define_id!(StockId);
define_id!(AvisId);
define_id!(HeroSectionId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_serializes_as_bare_integer() {
        let id = ProduitId::new(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
        let back: ProduitId = serde_json::from_str("42").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_id_from_str_trims_whitespace() {
        assert_eq!(" 7 ".parse::<LignePanierId>().unwrap(), LignePanierId::new(7));
        assert!("sept".parse::<LignePanierId>().is_err());
    }

    #[test]
    fn test_id_display() {
        assert_eq!(CommandeId::new(1_024).to_string(), "1024");
    }
}
