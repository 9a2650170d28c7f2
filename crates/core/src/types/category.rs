//! Product categories.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a string is not a known category slug.
#[derive(thiserror::Error, Debug, Clone)]
#[error("unknown category: {0}")]
pub struct CategoryError(pub String);

/// The fixed set of product categories.
///
/// Serialized (and stored) as the URL slug, e.g. `new` for New Arrivals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Streetwear,
    Essentials,
    Outerwear,
    /// New Arrivals.
    New,
    /// Limited Edition.
    Limited,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Self; 5] = [
        Self::Streetwear,
        Self::Essentials,
        Self::Outerwear,
        Self::New,
        Self::Limited,
    ];

    /// The URL slug for this category (also the stored value).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Streetwear => "streetwear",
            Self::Essentials => "essentials",
            Self::Outerwear => "outerwear",
            Self::New => "new",
            Self::Limited => "limited",
        }
    }

    /// The human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Streetwear => "Streetwear",
            Self::Essentials => "Essentials",
            Self::Outerwear => "Outerwear",
            Self::New => "New Arrivals",
            Self::Limited => "Limited Edition",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "streetwear" => Ok(Self::Streetwear),
            "essentials" => Ok(Self::Essentials),
            "outerwear" => Ok(Self::Outerwear),
            "new" => Ok(Self::New),
            "limited" => Ok(Self::Limited),
            other => Err(CategoryError(other.to_owned())),
        }
    }
}

// SQLx support (with postgres feature): stored as TEXT slugs.
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Category {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Category {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(s.parse()?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Category {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_round_trip() {
        for cat in Category::ALL {
            assert_eq!(cat.as_str().parse::<Category>().unwrap(), cat);
        }
    }

    #[test]
    fn test_unknown_slug_rejected() {
        assert!("accessories".parse::<Category>().is_err());
    }

    #[test]
    fn test_labels() {
        assert_eq!(Category::New.label(), "New Arrivals");
        assert_eq!(Category::Limited.label(), "Limited Edition");
    }
}
