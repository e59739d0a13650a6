//! Product identity: the key that distinguishes one cart line from another.
//!
//! The catalog has no stable product ID that survives reseeding, so a line
//! is keyed by the pair of product name and image reference. The pair is
//! carried explicitly from the catalog through every surface and is never
//! re-derived from rendered text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator used by the compact `img|name` text form.
pub const IDENTITY_SEPARATOR: char = '|';

/// Composite identity of a product: image reference plus display name.
///
/// Field names match the persisted cart layout (`img`, `name`), which lets a
/// [`LineItem`](crate::LineItem) flatten the identity into its record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductIdentity {
    /// Image reference (URL or asset path).
    pub img: String,
    /// Product display name.
    pub name: String,
}

impl ProductIdentity {
    /// Create an identity from an image reference and a name.
    #[must_use]
    pub fn new(img: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            img: img.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ProductIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{IDENTITY_SEPARATOR}{}", self.img, self.name)
    }
}

/// Error parsing the `img|name` text form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityParseError {
    #[error("identity must be written as `img|name`, got {0:?}")]
    MissingSeparator(String),
    #[error("identity has an empty product name")]
    EmptyName,
}

impl FromStr for ProductIdentity {
    type Err = IdentityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (img, name) = s
            .split_once(IDENTITY_SEPARATOR)
            .ok_or_else(|| IdentityParseError::MissingSeparator(s.to_string()))?;

        // Identity equality is exact, so the name is kept as written.
        if name.trim().is_empty() {
            return Err(IdentityParseError::EmptyName);
        }

        Ok(Self::new(img.trim(), name))
    }
}
