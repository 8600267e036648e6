//! Macro for implementing wire-name conversions on closed enums
//!
//! Degreed identifies resources by lowercase, sometimes hyphenated names
//! (`required-learning`). The macro generates `as_str`, `Display`, `FromStr`
//! and the list of supported names from a single mapping, so the three never
//! drift apart.
//!
//! # Example
//!
//! ```rust
//! use degreed_domain::impl_wire_name_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Scope {
//!     UsersRead,
//!     LoginsRead,
//! }
//!
//! impl_wire_name_conversions!(Scope {
//!     UsersRead => "users:read",
//!     LoginsRead => "logins:read",
//! });
//!
//! assert_eq!("USERS:READ".parse::<Scope>().unwrap(), Scope::UsersRead);
//! assert_eq!(Scope::ALL_NAMES, &["users:read", "logins:read"]);
//! ```

/// Implements `as_str`, `Display` and case-insensitive `FromStr` for an enum
///
/// Parsing failures are [`DegreedError::Config`](crate::DegreedError::Config)
/// naming the rejected input and the supported values.
#[macro_export]
macro_rules! impl_wire_name_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Every supported wire name, in declaration order.
            pub const ALL_NAMES: &'static [&'static str] = &[$($str),+];

            /// Wire name of this variant.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $crate::DegreedError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err($crate::DegreedError::Config(format!(
                        "unsupported {} '{}' (expected one of: {})",
                        stringify!($enum_name),
                        s,
                        Self::ALL_NAMES.join(", ")
                    ))),
                }
            }
        }
    };
}
