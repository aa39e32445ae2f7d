//! COICOP expenditure category taxonomy.
//!
//! The granular CPI dataset keys rows by COICOP 1999 division codes
//! (`CP01`, `CP04`, ...). This module maps the divisions the dashboard
//! carries to display labels; codes outside the taxonomy are preserved
//! verbatim by the loader.

use serde::{Deserialize, Serialize};

/// COICOP divisions present in the granular CPI dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoicopCategory {
    /// CP01: Food and non-alcoholic beverages
    Food,
    /// CP04: Housing, water, electricity, gas and other fuels
    Housing,
    /// CP06: Health
    Health,
    /// CP07: Transport
    Transport,
    /// CP09: Recreation and culture
    Recreation,
    /// CP11: Restaurants and hotels
    Restaurants,
}

impl CoicopCategory {
    /// Returns the COICOP 1999 division code for this category.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Food => "CP01",
            Self::Housing => "CP04",
            Self::Health => "CP06",
            Self::Transport => "CP07",
            Self::Recreation => "CP09",
            Self::Restaurants => "CP11",
        }
    }

    /// Returns the human-readable label for this category.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Food => "Food & Non-Alcoholic Beverages",
            Self::Housing => "Housing",
            Self::Health => "Health",
            Self::Transport => "Transport",
            Self::Recreation => "Recreation & Culture",
            Self::Restaurants => "Restaurants & Hotels",
        }
    }

    /// Looks up a category by its COICOP division code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().iter().copied().find(|c| c.code() == code)
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Food,
            Self::Housing,
            Self::Health,
            Self::Transport,
            Self::Recreation,
            Self::Restaurants,
        ]
    }
}

impl std::fmt::Display for CoicopCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Returns the display label for a raw COICOP code, falling back to the
/// code itself for divisions outside the taxonomy.
#[must_use]
pub fn display_label(code: &str) -> String {
    CoicopCategory::from_code(code).map_or_else(|| code.to_string(), |c| c.label().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_lookup_round_trips() {
        for category in CoicopCategory::all() {
            assert_eq!(CoicopCategory::from_code(category.code()), Some(*category));
        }
    }

    #[test]
    fn unknown_code_falls_back_verbatim() {
        assert_eq!(display_label("CP99"), "CP99");
    }

    #[test]
    fn known_code_maps_to_label() {
        assert_eq!(display_label("CP01"), "Food & Non-Alcoholic Beverages");
    }
}
