//! Category display preferences and render toggles.
//!
//! The document is loaded once, edited in place by its single owner and
//! handed to the layout engine by reference for each render pass.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    constants::{DEFAULT_CATEGORY_COLOR, WEIGHT_SETTINGS},
    domain::Activity,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT_WHITE: Rgba = Rgba {
        r: 255,
        g: 255,
        b: 255,
        a: 0,
    };

    /// Parses `#RRGGBB` (opaque) or `#AARRGGBB`.
    pub fn parse(value: &str) -> Option<Self> {
        let hex = value.trim().strip_prefix('#')?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let byte = |at: usize| u8::from_str_radix(&hex[at..at + 2], 16).ok();
        match hex.len() {
            6 => Some(Rgba {
                r: byte(0)?,
                g: byte(2)?,
                b: byte(4)?,
                a: 255,
            }),
            8 => Some(Rgba {
                a: byte(0)?,
                r: byte(2)?,
                g: byte(4)?,
                b: byte(6)?,
            }),
            _ => None,
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::parse(DEFAULT_CATEGORY_COLOR).unwrap_or(Rgba::TRANSPARENT_WHITE)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryPreference {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl CategoryPreference {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn rgba(&self) -> Rgba {
        self.color
            .as_deref()
            .and_then(Rgba::parse)
            .unwrap_or_default()
    }

    fn matches_alias(&self, key: &str) -> bool {
        self.aliases.iter().any(|alias| alias.trim() == key)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub categories: Vec<CategoryPreference>,
    pub show_labels: bool,
    pub rotate_labels: bool,
    pub show_overlay: bool,
    pub use_custom_weight: bool,
    pub auto_save: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            show_labels: true,
            rotate_labels: true,
            show_overlay: true,
            use_custom_weight: false,
            auto_save: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedStyle {
    pub color: Rgba,
    pub weight: f64,
}

impl Preferences {
    /// Finds a category by name, then by alias.
    pub fn category(&self, key: &str) -> Option<&CategoryPreference> {
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        self.categories
            .iter()
            .find(|category| category.name.trim() == key)
            .or_else(|| {
                self.categories
                    .iter()
                    .find(|category| category.matches_alias(key))
            })
    }

    /// Effective color and weight for one activity.
    pub fn resolve_style(&self, activity: &Activity) -> ResolvedStyle {
        let category = self.category(&activity.category);

        let color = category.map(CategoryPreference::rgba).unwrap_or_default();
        let weight = if self.use_custom_weight {
            activity.weight
        } else {
            category
                .and_then(|category| category.weight)
                .unwrap_or(activity.weight)
        };

        ResolvedStyle { color, weight }
    }

    pub fn category_cell(&self, row: usize, column: PreferenceColumn) -> Option<String> {
        let category = self.categories.get(row)?;
        Some(match column {
            PreferenceColumn::Category => category.name.clone(),
            PreferenceColumn::Color => category.color.clone().unwrap_or_default(),
            PreferenceColumn::Weight => category
                .weight
                .map(|weight| weight.to_string())
                .unwrap_or_default(),
        })
    }

    /// Edits one category cell. Returns `false` when the input is rejected.
    ///
    /// Colors must parse as hex, weights as numbers within `[0, 10]`; an empty
    /// color or weight clears the setting.
    pub fn set_category_cell(&mut self, row: usize, column: PreferenceColumn, input: &str) -> bool {
        let Some(category) = self.categories.get_mut(row) else {
            return false;
        };
        let input = input.trim();

        match column {
            PreferenceColumn::Category => category.name = input.to_string(),
            PreferenceColumn::Color if input.is_empty() => category.color = None,
            PreferenceColumn::Color => {
                if Rgba::parse(input).is_none() {
                    return false;
                }
                category.color = Some(input.to_string());
            }
            PreferenceColumn::Weight if input.is_empty() => category.weight = None,
            PreferenceColumn::Weight => match input.parse::<f64>() {
                Ok(weight) if (WEIGHT_SETTINGS.min..=WEIGHT_SETTINGS.max).contains(&weight) => {
                    category.weight = Some(weight)
                }
                _ => return false,
            },
        }
        true
    }

    pub fn insert_category(&mut self, position: usize) -> bool {
        if position > self.categories.len() {
            return false;
        }
        self.categories
            .insert(position, CategoryPreference::default());
        true
    }

    pub fn remove_category(&mut self, position: usize) -> Option<CategoryPreference> {
        if position < self.categories.len() {
            Some(self.categories.remove(position))
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreferenceColumn {
    Category,
    Color,
    Weight,
}

impl PreferenceColumn {
    pub const ALL: [PreferenceColumn; 3] = [
        PreferenceColumn::Category,
        PreferenceColumn::Color,
        PreferenceColumn::Weight,
    ];

    pub fn title(self) -> &'static str {
        match self {
            PreferenceColumn::Category => "Category",
            PreferenceColumn::Color => "Color",
            PreferenceColumn::Weight => "Weight",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Preferences {
        Preferences {
            categories: vec![
                CategoryPreference::new("work")
                    .with_color("#FF0000FF")
                    .with_weight(4.0)
                    .with_aliases(["job", "office"]),
                CategoryPreference::new("fun").with_color("#00FF00"),
                CategoryPreference::new("sleep").with_color("not a color"),
            ],
            ..Preferences::default()
        }
    }

    #[test]
    fn test_rgba_parse() {
        assert_eq!(
            Rgba::parse("#80102030"),
            Some(Rgba {
                a: 0x80,
                r: 0x10,
                g: 0x20,
                b: 0x30
            })
        );
        assert_eq!(Rgba::parse("#102030").map(|c| c.a), Some(255));
        assert_eq!(Rgba::parse("102030"), None);
        assert_eq!(Rgba::parse("#12345"), None);
        assert_eq!(Rgba::parse("#GG2030"), None);
        assert_eq!(Rgba::default(), Rgba::TRANSPARENT_WHITE);
        assert_eq!(Rgba::default().to_string(), "#00FFFFFF");
    }

    #[test]
    fn test_category_lookup_by_name_and_alias() {
        let prefs = sample();
        assert_eq!(prefs.category("work").map(|c| c.name.as_str()), Some("work"));
        assert_eq!(prefs.category(" job ").map(|c| c.name.as_str()), Some("work"));
        assert!(prefs.category("").is_none());
        assert!(prefs.category("chores").is_none());
    }

    #[test]
    fn test_resolve_uses_category_weight() {
        let prefs = sample();
        let activity = Activity::new(9.0, 10.0, "office", "", 8.0);
        let style = prefs.resolve_style(&activity);
        assert_eq!(style.weight, 4.0);
        assert_eq!(style.color, Rgba::parse("#FF0000FF").unwrap());
    }

    #[test]
    fn test_resolve_falls_back_to_activity_weight() {
        let prefs = sample();
        let activity = Activity::new(9.0, 10.0, "fun", "", 8.0);
        assert_eq!(prefs.resolve_style(&activity).weight, 8.0);
    }

    #[test]
    fn test_resolve_custom_weight_flag() {
        let prefs = Preferences {
            use_custom_weight: true,
            ..sample()
        };
        let activity = Activity::new(9.0, 10.0, "work", "", 8.0);
        assert_eq!(prefs.resolve_style(&activity).weight, 8.0);
    }

    #[test]
    fn test_resolve_default_color() {
        let prefs = sample();
        for category in ["", "unknown", "sleep"] {
            let activity = Activity::new(9.0, 10.0, category, "", 8.0);
            assert_eq!(prefs.resolve_style(&activity).color, Rgba::TRANSPARENT_WHITE);
        }
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let prefs: Preferences =
            serde_json::from_str(r#"{"categories":[{"name":"work"}],"auto_save":true}"#).unwrap();
        assert!(prefs.auto_save);
        assert!(prefs.show_labels);
        assert_eq!(prefs.categories[0].weight, None);
        assert_eq!(prefs.categories[0].rgba(), Rgba::TRANSPARENT_WHITE);
    }

    #[test]
    fn test_category_table_edits() {
        let mut prefs = sample();

        assert!(prefs.insert_category(1));
        assert_eq!(prefs.categories.len(), 4);
        assert!(prefs.set_category_cell(1, PreferenceColumn::Category, " chores "));
        assert!(prefs.set_category_cell(1, PreferenceColumn::Color, "#336699"));
        assert!(!prefs.set_category_cell(1, PreferenceColumn::Color, "blue"));
        assert!(prefs.set_category_cell(1, PreferenceColumn::Weight, "6"));
        assert!(!prefs.set_category_cell(1, PreferenceColumn::Weight, "heavy"));
        assert!(!prefs.set_category_cell(1, PreferenceColumn::Weight, "11"));

        assert_eq!(
            prefs.category_cell(1, PreferenceColumn::Category).as_deref(),
            Some("chores")
        );
        assert_eq!(
            prefs.category_cell(1, PreferenceColumn::Color).as_deref(),
            Some("#336699")
        );
        assert_eq!(
            prefs.category_cell(1, PreferenceColumn::Weight).as_deref(),
            Some("6")
        );

        assert!(prefs.set_category_cell(1, PreferenceColumn::Weight, ""));
        assert_eq!(prefs.categories[1].weight, None);

        assert_eq!(prefs.remove_category(1).map(|c| c.name), Some("chores".to_string()));
        assert!(prefs.remove_category(10).is_none());
        assert!(!prefs.insert_category(10));
        assert!(!prefs.set_category_cell(10, PreferenceColumn::Category, "x"));
    }
}
