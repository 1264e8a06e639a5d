//! Label conversions for closed domain enums
//!
//! Event types, granularities and tags all travel as short snake_case labels
//! in config files, logs and query strings. This macro generates the label
//! table once per enum: `label()`, `ALL`, `Display` and a case-insensitive
//! `FromStr`.
//!
//! # Example
//!
//! ```rust
//! use cyclarc_domain::impl_label_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Phase {
//!     Follicular,
//!     Luteal,
//! }
//!
//! impl_label_conversions!(Phase {
//!     Follicular => "follicular",
//!     Luteal => "luteal",
//! });
//!
//! assert_eq!(Phase::Luteal.label(), "luteal");
//! assert_eq!("FOLLICULAR".parse::<Phase>(), Ok(Phase::Follicular));
//! assert_eq!(Phase::ALL.len(), 2);
//! ```

/// Implements `label()`, `ALL`, `Display` and `FromStr` for a fieldless enum.
#[macro_export]
macro_rules! impl_label_conversions {
    ($enum_name:ident { $($variant:ident => $label:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$enum_name] = &[$(Self::$variant),+];

            /// Stable snake_case label.
            pub const fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                let wanted = s.trim().to_ascii_lowercase();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.label() == wanted)
                    .ok_or_else(|| format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}
