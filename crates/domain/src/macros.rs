//! Macro for implementing Display and FromStr for setting enums
//!
//! Config choices (storage backend, log format) are read both from files via
//! serde and from environment variables as plain strings. This macro gives
//! them one case-insensitive string form for the latter.
//!
//! # Example
//!
//! ```rust
//! use songlink_domain::impl_choice_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Mode {
//!     Fast,
//!     Safe,
//! }
//!
//! impl_choice_conversions!(Mode {
//!     Fast => "fast",
//!     Safe => "safe",
//! });
//!
//! assert_eq!("SAFE".parse::<Mode>(), Ok(Mode::Safe));
//! ```

/// Implements Display and FromStr for a fieldless enum
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their lowercase string
///   representations
#[macro_export]
macro_rules! impl_choice_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Shade {
        Light,
        Dark,
    }

    impl_choice_conversions!(Shade {
        Light => "light",
        Dark => "dark",
    });

    #[test]
    fn test_display_conversion() {
        assert_eq!(Shade::Light.to_string(), "light");
        assert_eq!(Shade::Dark.to_string(), "dark");
    }

    #[test]
    fn test_fromstr_ignores_case_and_whitespace() {
        assert_eq!(Shade::from_str("DARK").unwrap(), Shade::Dark);
        assert_eq!(Shade::from_str(" Light ").unwrap(), Shade::Light);
    }

    #[test]
    fn test_fromstr_invalid() {
        let result = Shade::from_str("grey");
        assert!(result.unwrap_err().contains("Invalid Shade: grey"));
        assert!(Shade::from_str("").is_err());
    }
}
