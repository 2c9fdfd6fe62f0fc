//! Table categories and the projection of parsed rows onto them.

use crate::config::UcdResource;
use crate::error::{Error, Result};
use crate::parse::PropertyRow;
use crate::ranges::{Range, ValuedRange};

/// Grapheme_Cluster_Break values carried in the generated table.
///
/// `Other` is implicit (anything not covered by a range), so it has no variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GraphemeBreak {
    CR,
    LF,
    Control,
    Extend,
    ZWJ,
    RegionalIndicator,
    Prepend,
    SpacingMark,
    L,
    V,
    T,
    LV,
    LVT,
}

impl GraphemeBreak {
    pub const ALL: [GraphemeBreak; 13] = [
        GraphemeBreak::CR,
        GraphemeBreak::LF,
        GraphemeBreak::Control,
        GraphemeBreak::Extend,
        GraphemeBreak::ZWJ,
        GraphemeBreak::RegionalIndicator,
        GraphemeBreak::Prepend,
        GraphemeBreak::SpacingMark,
        GraphemeBreak::L,
        GraphemeBreak::V,
        GraphemeBreak::T,
        GraphemeBreak::LV,
        GraphemeBreak::LVT,
    ];

    /// Property value name as spelled in `GraphemeBreakProperty.txt`.
    pub const fn ucd_name(self) -> &'static str {
        match self {
            GraphemeBreak::CR => "CR",
            GraphemeBreak::LF => "LF",
            GraphemeBreak::Control => "Control",
            GraphemeBreak::Extend => "Extend",
            GraphemeBreak::ZWJ => "ZWJ",
            GraphemeBreak::RegionalIndicator => "Regional_Indicator",
            GraphemeBreak::Prepend => "Prepend",
            GraphemeBreak::SpacingMark => "SpacingMark",
            GraphemeBreak::L => "L",
            GraphemeBreak::V => "V",
            GraphemeBreak::T => "T",
            GraphemeBreak::LV => "LV",
            GraphemeBreak::LVT => "LVT",
        }
    }

    /// Enumerator the consuming library declares for this value.
    pub const fn symbol(self) -> &'static str {
        match self {
            GraphemeBreak::CR => "ZR_GCB_CR",
            GraphemeBreak::LF => "ZR_GCB_LF",
            GraphemeBreak::Control => "ZR_GCB_CONTROL",
            GraphemeBreak::Extend => "ZR_GCB_EXTEND",
            GraphemeBreak::ZWJ => "ZR_GCB_ZWJ",
            GraphemeBreak::RegionalIndicator => "ZR_GCB_REGIONAL_INDICATOR",
            GraphemeBreak::Prepend => "ZR_GCB_PREPEND",
            GraphemeBreak::SpacingMark => "ZR_GCB_SPACINGMARK",
            GraphemeBreak::L => "ZR_GCB_L",
            GraphemeBreak::V => "ZR_GCB_V",
            GraphemeBreak::T => "ZR_GCB_T",
            GraphemeBreak::LV => "ZR_GCB_LV",
            GraphemeBreak::LVT => "ZR_GCB_LVT",
        }
    }

    pub fn from_ucd_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|value| value.ucd_name() == name)
    }
}

const GRAPHEME_BREAK_NAMES: [&str; 13] = {
    let mut names = [""; 13];
    let mut i = 0;
    while i < GraphemeBreak::ALL.len() {
        names[i] = GraphemeBreak::ALL[i].ucd_name();
        i += 1;
    }
    names
};

/// The table families the generator emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    GraphemeBreak,
    ExtendedPictographic,
    EmojiPresentation,
    /// East_Asian_Width `W` or `F`.
    EastAsianWide,
}

impl Category {
    pub const fn resource(self) -> UcdResource {
        match self {
            Category::GraphemeBreak => UcdResource::GraphemeBreakProperty,
            Category::ExtendedPictographic | Category::EmojiPresentation => UcdResource::EmojiData,
            Category::EastAsianWide => UcdResource::EastAsianWidth,
        }
    }

    /// UCD property names that place a codepoint in this category.
    pub const fn property_names(self) -> &'static [&'static str] {
        match self {
            Category::GraphemeBreak => &GRAPHEME_BREAK_NAMES,
            Category::ExtendedPictographic => &["Extended_Pictographic"],
            Category::EmojiPresentation => &["Emoji_Presentation"],
            Category::EastAsianWide => &["W", "F"],
        }
    }

    /// Label used in diagnostics and log events.
    pub const fn label(self) -> &'static str {
        match self {
            Category::GraphemeBreak => "GCB",
            Category::ExtendedPictographic => "ExtPict",
            Category::EmojiPresentation => "EmojiPresentation",
            Category::EastAsianWide => "EAW",
        }
    }

    pub fn matches(self, property: &str) -> bool {
        self.property_names().contains(&property)
    }
}

/// Project rows belonging to `category` onto bare intervals.
pub fn select_ranges(rows: &[PropertyRow], category: Category) -> Vec<Range> {
    rows.iter()
        .filter(|row| category.matches(&row.property))
        .map(|row| Range::new(row.lo, row.hi))
        .collect()
}

/// Project rows onto intervals tagged with their grapheme break value.
///
/// # Errors
/// [`Error::UnmappedSymbol`] when a row names a value outside [`GraphemeBreak`].
pub fn select_grapheme_ranges(rows: &[PropertyRow]) -> Result<Vec<ValuedRange<GraphemeBreak>>> {
    rows.iter()
        .map(|row| {
            let value = GraphemeBreak::from_ucd_name(&row.property).ok_or_else(|| {
                Error::UnmappedSymbol {
                    table: Category::GraphemeBreak.label().to_string(),
                    property: row.property.clone(),
                }
            })?;
            Ok(ValuedRange::new(row.lo, row.hi, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(lo: u32, hi: u32, property: &str) -> PropertyRow {
        PropertyRow {
            lo,
            hi,
            property: property.to_string(),
        }
    }

    #[test]
    fn every_grapheme_value_round_trips_through_its_ucd_name() {
        for value in GraphemeBreak::ALL {
            assert_eq!(GraphemeBreak::from_ucd_name(value.ucd_name()), Some(value));
            assert!(value.symbol().starts_with("ZR_GCB_"));
        }
        assert_eq!(GraphemeBreak::from_ucd_name("Other"), None);
        assert_eq!(
            GraphemeBreak::RegionalIndicator.symbol(),
            "ZR_GCB_REGIONAL_INDICATOR"
        );
    }

    #[test]
    fn grapheme_category_wants_exactly_the_enumerated_names() {
        let names = Category::GraphemeBreak.property_names();
        assert_eq!(names.len(), GraphemeBreak::ALL.len());
        assert!(names.contains(&"Regional_Indicator"));
        assert!(!names.contains(&"Other"));
    }

    #[test]
    fn select_ranges_keeps_only_matching_properties() {
        let rows = vec![
            row(0x1100, 0x115F, "W"),
            row(0x00A1, 0x00A1, "A"),
            row(0xFF01, 0xFF60, "F"),
            row(0x20A9, 0x20A9, "H"),
        ];
        assert_eq!(
            select_ranges(&rows, Category::EastAsianWide),
            vec![Range::new(0x1100, 0x115F), Range::new(0xFF01, 0xFF60)]
        );
        assert!(select_ranges(&rows, Category::EmojiPresentation).is_empty());
    }

    #[test]
    fn emoji_categories_share_a_resource_but_not_rows() {
        let rows = vec![
            row(0x1F600, 0x1F64F, "Emoji_Presentation"),
            row(0x1F000, 0x1FAFF, "Extended_Pictographic"),
        ];
        assert_eq!(
            Category::EmojiPresentation.resource(),
            Category::ExtendedPictographic.resource()
        );
        assert_eq!(
            select_ranges(&rows, Category::ExtendedPictographic),
            vec![Range::new(0x1F000, 0x1FAFF)]
        );
    }

    #[test]
    fn unknown_grapheme_value_is_unmapped() {
        let rows = vec![row(0x0D, 0x0D, "CR"), row(0x41, 0x41, "Other")];
        match select_grapheme_ranges(&rows) {
            Err(Error::UnmappedSymbol { table, property }) => {
                assert_eq!(table, "GCB");
                assert_eq!(property, "Other");
            }
            other => panic!("expected unmapped symbol, got {other:?}"),
        }
    }

    #[test]
    fn grapheme_rows_become_valued_ranges() {
        let rows = vec![row(0x0D, 0x0D, "CR"), row(0x200D, 0x200D, "ZWJ")];
        assert_eq!(
            select_grapheme_ranges(&rows).unwrap(),
            vec![
                ValuedRange::new(0x0D, 0x0D, GraphemeBreak::CR),
                ValuedRange::new(0x200D, 0x200D, GraphemeBreak::ZWJ)
            ]
        );
    }
}
