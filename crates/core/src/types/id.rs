//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around the given inner type with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - `new()`, `into_inner()`, `Display`, `FromStr`
/// - `From` conversions in both directions
///
/// IDs wrapping `Uuid` also get `generate()`. The calling crate must depend
/// on `uuid` for that form.
///
/// # Example
///
/// ```rust
/// # use backlink_vista_core::define_id;
/// define_id!(ReviewId(i32));
/// define_id!(InvoiceId(Uuid));
///
/// let review = ReviewId::new(7);
/// assert_eq!(review.to_string(), "7");
///
/// let invoice = InvoiceId::generate();
/// assert_eq!(invoice, invoice.to_string().parse().unwrap());
/// ```
#[macro_export]
macro_rules! define_id {
    (@base $(#[$meta:meta])* $name:ident($inner:ty)) => {
        $(#[$meta])*
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
        pub struct $name($inner);

        impl $name {
            /// Wrap a raw id value.
            #[must_use]
            pub const fn new(id: $inner) -> Self {
                Self(id)
            }

            /// Get the underlying value.
            #[must_use]
            pub const fn into_inner(self) -> $inner {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = <$inner as ::core::str::FromStr>::Err;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.trim().parse::<$inner>().map(Self)
            }
        }

        impl From<$inner> for $name {
            fn from(id: $inner) -> Self {
                Self(id)
            }
        }

        impl From<$name> for $inner {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
    ($(#[$meta:meta])* $name:ident(Uuid)) => {
        $crate::define_id!(@base $(#[$meta])* $name(::uuid::Uuid));

        impl $name {
            /// Generate a fresh random (v4) id.
            #[must_use]
            pub fn generate() -> Self {
                Self(::uuid::Uuid::new_v4())
            }
        }
    };
    ($(#[$meta:meta])* $name:ident($inner:ty)) => {
        $crate::define_id!(@base $(#[$meta])* $name($inner));
    };
}

define_id!(
    /// Registered marketplace user.
    UserId(Uuid)
);
define_id!(
    /// Order placed at checkout.
    OrderId(Uuid)
);
define_id!(
    /// Entry in a client-side cart (distinct from the listing it holds).
    CartItemId(Uuid)
);
define_id!(
    /// Wallet transaction.
    TransactionId(Uuid)
);
define_id!(
    /// Catalog listing. Catalog ids are small sequential integers.
    ListingId(i32)
);
