//! Colours of the care board.
//!
//! The board shows care records as cards coloured by category and residents
//! as chips coloured by their presence. Important records always use the
//! alert colour so they stand out from their category.

use serde::Serialize;
use strum::{Display, EnumIter};

use crate::domains::care_record::CareRecordForm;
use crate::status::ResidentStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum BoardColor {
    Orange,
    Yellow,
    Blue,
    Purple,
    Pink,
    Green,
    Gray,
    Red,
}

impl BoardColor {
    /// CSS colour of the card background.
    pub fn hex(self) -> &'static str {
        match self {
            BoardColor::Orange => "#FFE0B2",
            BoardColor::Yellow => "#FFF9C4",
            BoardColor::Blue => "#BBDEFB",
            BoardColor::Purple => "#E1BEE7",
            BoardColor::Pink => "#F8BBD0",
            BoardColor::Green => "#C8E6C9",
            BoardColor::Gray => "#E0E0E0",
            BoardColor::Red => "#FFCDD2",
        }
    }
}

/// Colour of a care record category; unknown categories are gray.
pub fn category_color(category: &str) -> BoardColor {
    match category {
        "食事" => BoardColor::Orange,
        "排泄" => BoardColor::Yellow,
        "入浴" => BoardColor::Blue,
        "睡眠" => BoardColor::Purple,
        "バイタル" => BoardColor::Pink,
        "レクリエーション" => BoardColor::Green,
        _ => BoardColor::Gray,
    }
}

pub fn record_color(record: &CareRecordForm) -> BoardColor {
    if record.is_important {
        BoardColor::Red
    } else {
        category_color(&record.category)
    }
}

pub fn status_color(status: ResidentStatus) -> BoardColor {
    match status {
        ResidentStatus::Present => BoardColor::Green,
        ResidentStatus::Out => BoardColor::Blue,
        ResidentStatus::Overnight => BoardColor::Purple,
        ResidentStatus::AtClinic => BoardColor::Yellow,
        ResidentStatus::Hospitalized => BoardColor::Gray,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::care_record::CATEGORIES;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;
    use strum::IntoEnumIterator;

    #[test]
    fn categories_get_distinct_colors() {
        let named: Vec<_> = CATEGORIES.iter().filter(|c| **c != "その他").collect();
        let colors: HashSet<_> = named.iter().map(|c| category_color(c)).collect();
        assert_eq!(colors.len(), named.len());
        assert!(!colors.contains(&BoardColor::Red));
        assert_eq!(category_color("その他"), BoardColor::Gray);
        assert_eq!(category_color("散歩"), BoardColor::Gray);
    }

    #[test]
    fn important_records_are_red() {
        let mut record = CareRecordForm {
            category: "食事".into(),
            ..CareRecordForm::default()
        };
        assert_eq!(record_color(&record), BoardColor::Orange);
        record.is_important = true;
        assert_eq!(record_color(&record), BoardColor::Red);
    }

    #[test]
    fn statuses_and_hex_values() {
        assert_eq!(status_color(ResidentStatus::Present), BoardColor::Green);
        assert_eq!(status_color(ResidentStatus::Hospitalized), BoardColor::Gray);
        assert_eq!(BoardColor::Pink.to_string(), "pink");

        let hexes: HashSet<_> = BoardColor::iter().map(BoardColor::hex).collect();
        assert_eq!(hexes.len(), BoardColor::iter().count());
    }
}
