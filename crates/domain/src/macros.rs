//! Macro for implementing Display and FromStr for wire-name enums
//!
//! Generates a single implementation for both traits so the string form used
//! on the wire and in logs stays consistent. Parsing is case-insensitive.
//!
//! # Example
//!
//! ```rust
//! use tunewire_domain::impl_wire_name_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum GrantType {
//!     ClientCredentials,
//!     AuthorizationCode,
//! }
//!
//! impl_wire_name_conversions!(GrantType {
//!     ClientCredentials => "client_credentials",
//!     AuthorizationCode => "authorization_code",
//! });
//!
//! assert_eq!(GrantType::ClientCredentials.to_string(), "client_credentials");
//! assert_eq!("AUTHORIZATION_CODE".parse::<GrantType>().unwrap(), GrantType::AuthorizationCode);
//! ```

/// Implements Display and FromStr traits for enums with a fixed wire name
///
/// This macro generates:
/// - Display trait: writes the mapped string verbatim
/// - FromStr trait: parses case-insensitive strings to enum variants
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their string
///   representations
#[macro_export]
macro_rules! impl_wire_name_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Wire representation of this value.
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
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($str) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}
