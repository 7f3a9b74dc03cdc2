//! Food category facet used as the place search keyword.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Closed set of food categories offered on the map screen.
///
/// Changing the active category invalidates the current place list and
/// triggers a new search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodCategory {
    #[default]
    Cafe,
    Korean,
    Chinese,
    Japanese,
    Western,
    Snack,
    Chicken,
    Bakery,
}

impl FoodCategory {
    /// Every category in display order.
    pub const ALL: [FoodCategory; 8] = [
        Self::Cafe,
        Self::Korean,
        Self::Chinese,
        Self::Japanese,
        Self::Western,
        Self::Snack,
        Self::Chicken,
        Self::Bakery,
    ];

    /// Keyword sent to the place search endpoint.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Cafe => "카페",
            Self::Korean => "한식",
            Self::Chinese => "중식",
            Self::Japanese => "일식",
            Self::Western => "양식",
            Self::Snack => "분식",
            Self::Chicken => "치킨",
            Self::Bakery => "베이커리",
        }
    }

    /// Stable snake_case identifier used by config and FFI callers.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cafe => "cafe",
            Self::Korean => "korean",
            Self::Chinese => "chinese",
            Self::Japanese => "japanese",
            Self::Western => "western",
            Self::Snack => "snack",
            Self::Chicken => "chicken",
            Self::Bakery => "bakery",
        }
    }
}

impl Display for FoodCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown category identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl Display for UnknownCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown food category `{}`", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for FoodCategory {
    type Err = UnknownCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
            .ok_or(UnknownCategory(normalized))
    }
}

#[cfg(test)]
mod tests {
    use super::FoodCategory;

    #[test]
    fn default_category_is_cafe() {
        assert_eq!(FoodCategory::default(), FoodCategory::Cafe);
    }

    #[test]
    fn parse_accepts_every_identifier() {
        for category in FoodCategory::ALL {
            assert_eq!(category.as_str().parse::<FoodCategory>(), Ok(category));
        }
        assert_eq!(" KOREAN ".parse::<FoodCategory>(), Ok(FoodCategory::Korean));
        assert!("sushi-bar".parse::<FoodCategory>().is_err());
    }
}
