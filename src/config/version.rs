//! Storefront API version selection.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// A Storefront API version.
///
/// Shopify cuts a release every quarter, named after its month (`2024-04`).
/// `Unstable` targets the preview channel and sorts after every release.
///
/// # Example
///
/// ```rust
/// use storefront_gateway::ApiVersion;
///
/// let version: ApiVersion = "2024-01".parse().unwrap();
/// assert_eq!(version, ApiVersion::V2024_01);
/// assert_eq!(version.to_string(), "2024-01");
/// assert!(version < ApiVersion::Unstable);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ApiVersion {
    /// A quarterly release.
    Release {
        /// Release year.
        year: u16,
        /// Release month: 1, 4, 7 or 10.
        month: u8,
    },
    /// The unstable preview channel.
    Unstable,
}

impl ApiVersion {
    /// The 2024-01 release.
    pub const V2024_01: Self = Self::Release {
        year: 2024,
        month: 1,
    };
    /// The 2024-04 release.
    pub const V2024_04: Self = Self::Release {
        year: 2024,
        month: 4,
    };

    /// Returns the version the gateway is built against.
    ///
    /// This is the last release that serves the checkout node fields and
    /// card-completion mutation used by the checkout operations.
    #[must_use]
    pub const fn latest() -> Self {
        Self::V2024_04
    }

    /// Returns `true` for quarterly releases.
    #[must_use]
    pub const fn is_stable(&self) -> bool {
        matches!(self, Self::Release { .. })
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self::latest()
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Release { year, month } => write!(f, "{year:04}-{month:02}"),
            Self::Unstable => f.write_str("unstable"),
        }
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if s == "unstable" {
            return Ok(Self::Unstable);
        }

        let invalid = || ConfigError::InvalidApiVersion { version: s.clone() };
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: u16 = year.parse().map_err(|_| invalid())?;
        let month: u8 = month.parse().map_err(|_| invalid())?;
        if !matches!(month, 1 | 4 | 7 | 10) {
            return Err(invalid());
        }

        Ok(Self::Release { year, month })
    }
}
