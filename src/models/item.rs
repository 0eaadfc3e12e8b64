use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::contains_ignore_case;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Tops,
    Bottoms,
    Outerwear,
    Dresses,
    Shoes,
    Accessories,
}

impl Category {
    /// All categories in form/filter cycling order
    pub const ALL: [Category; 6] = [
        Category::Tops,
        Category::Bottoms,
        Category::Outerwear,
        Category::Dresses,
        Category::Shoes,
        Category::Accessories,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Tops => "Tops",
            Category::Bottoms => "Bottoms",
            Category::Outerwear => "Outerwear",
            Category::Dresses => "Dresses",
            Category::Shoes => "Shoes",
            Category::Accessories => "Accessories",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|c| c == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    White,
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Pink,
    Brown,
    Gray,
    Silver,
    Multicolor,
    Other,
}

impl Color {
    pub const ALL: [Color; 13] = [
        Color::Black,
        Color::White,
        Color::Red,
        Color::Blue,
        Color::Green,
        Color::Yellow,
        Color::Purple,
        Color::Pink,
        Color::Brown,
        Color::Gray,
        Color::Silver,
        Color::Multicolor,
        Color::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Color::Black => "Black",
            Color::White => "White",
            Color::Red => "Red",
            Color::Blue => "Blue",
            Color::Green => "Green",
            Color::Yellow => "Yellow",
            Color::Purple => "Purple",
            Color::Pink => "Pink",
            Color::Brown => "Brown",
            Color::Gray => "Gray",
            Color::Silver => "Silver",
            Color::Multicolor => "Multicolor",
            Color::Other => "Other",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|c| c == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
    All,
}

impl Season {
    pub const ALL: [Season; 5] = [
        Season::Spring,
        Season::Summer,
        Season::Fall,
        Season::Winter,
        Season::All,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
            Season::All => "All",
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Occasion {
    Casual,
    Formal,
    Business,
    Athletic,
    Special,
    Other,
}

impl Occasion {
    pub const ALL: [Occasion; 6] = [
        Occasion::Casual,
        Occasion::Formal,
        Occasion::Business,
        Occasion::Athletic,
        Occasion::Special,
        Occasion::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Occasion::Casual => "Casual",
            Occasion::Formal => "Formal",
            Occasion::Business => "Business",
            Occasion::Athletic => "Athletic",
            Occasion::Special => "Special",
            Occasion::Other => "Other",
        }
    }
}

impl std::fmt::Display for Occasion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClothingItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub image_url: String,
    pub category: Category,
    pub color: Color,
    pub season: Vec<Season>,
    pub occasion: Vec<Occasion>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub last_worn: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ClothingItem {
    /// Check if this item matches the search query.
    /// Query should already be lowercased.
    pub fn matches_search(&self, query: &str) -> bool {
        contains_ignore_case(&self.name, query)
            || self
                .description
                .as_ref()
                .map(|s| contains_ignore_case(s, query))
                .unwrap_or(false)
            || self
                .brand
                .as_ref()
                .map(|s| contains_ignore_case(s, query))
                .unwrap_or(false)
            || contains_ignore_case(self.category.label(), query)
            || contains_ignore_case(self.color.label(), query)
            || self.season.iter().any(|s| contains_ignore_case(s.label(), query))
            || self.occasion.iter().any(|o| contains_ignore_case(o.label(), query))
    }

    /// Comma-separated season list for the detail panel
    pub fn seasons_display(&self) -> String {
        self.season
            .iter()
            .map(|s| s.label())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Comma-separated occasion list for the detail panel
    pub fn occasions_display(&self) -> String {
        self.occasion
            .iter()
            .map(|o| o.label())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn added_display(&self) -> String {
        self.created_at.format("%b %d, %Y").to_string()
    }

    /// "Jan 05" for the table, "never" when the item has not been worn
    pub fn worn_display(&self) -> String {
        match self.last_worn {
            Some(dt) => dt.format("%b %d").to_string(),
            None => "never".to_string(),
        }
    }

    /// Apply a partial update in place.
    /// Mirrors what the server does with the same patch, so optimistic
    /// and offline updates stay consistent with a later refresh.
    pub fn apply(&mut self, patch: &ItemPatch) {
        if let Some(ref name) = patch.name {
            self.name = name.clone();
        }
        if let Some(ref description) = patch.description {
            self.description = Some(description.clone());
        }
        if let Some(ref image_url) = patch.image_url {
            self.image_url = image_url.clone();
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(ref season) = patch.season {
            self.season = season.clone();
        }
        if let Some(ref occasion) = patch.occasion {
            self.occasion = occasion.clone();
        }
        if let Some(ref brand) = patch.brand {
            self.brand = Some(brand.clone());
        }
        if let Some(favorite) = patch.favorite {
            self.favorite = favorite;
        }
        if let Some(last_worn) = patch.last_worn {
            self.last_worn = Some(last_worn);
        }
    }
}

/// Create payload - the server assigns id and createdAt
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub image_url: String,
    pub category: Category,
    pub color: Color,
    pub season: Vec<Season>,
    pub occasion: Vec<Occasion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub favorite: bool,
}

/// Partial update payload - only set fields are serialized
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<Vec<Season>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occasion: Option<Vec<Occasion>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_worn: Option<DateTime<Utc>>,
}

// Sorting options for the closet table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemSortColumn {
    #[default]
    Name,
    Category,
    Color,
    Added,
    Worn,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item() -> ClothingItem {
        ClothingItem {
            id: "a1".to_string(),
            name: "White T-Shirt".to_string(),
            description: Some("Basic cotton t-shirt".to_string()),
            image_url: "/placeholder.svg".to_string(),
            category: Category::Tops,
            color: Color::White,
            season: vec![Season::Spring, Season::Summer],
            occasion: vec![Occasion::Casual],
            brand: Some("Basics Co".to_string()),
            favorite: true,
            last_worn: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_item_parses_camel_case_wire_format() {
        let json = r#"{
            "id": "3f2b",
            "name": "Blue Jeans",
            "description": "Classic blue denim jeans",
            "imageUrl": "/img/jeans.png",
            "category": "bottoms",
            "color": "blue",
            "season": ["spring", "fall", "winter"],
            "occasion": ["casual"],
            "brand": "Denim Life",
            "favorite": true,
            "lastWorn": null,
            "createdAt": "2025-11-02T18:30:00Z"
        }"#;

        let item: ClothingItem = serde_json::from_str(json).expect("item should parse");
        assert_eq!(item.id, "3f2b");
        assert_eq!(item.category, Category::Bottoms);
        assert_eq!(item.color, Color::Blue);
        assert_eq!(item.season, vec![Season::Spring, Season::Fall, Season::Winter]);
        assert!(item.favorite);
        assert!(item.last_worn.is_none());
    }

    #[test]
    fn test_item_rejects_unknown_category() {
        let json = r#"{
            "id": "x",
            "name": "Hat",
            "imageUrl": "/x.png",
            "category": "headwear",
            "color": "black",
            "season": ["all"],
            "occasion": ["casual"],
            "createdAt": "2025-11-02T18:30:00Z"
        }"#;

        assert!(serde_json::from_str::<ClothingItem>(json).is_err());
    }

    #[test]
    fn test_patch_serializes_only_set_fields() {
        let patch = ItemPatch {
            favorite: Some(false),
            ..Default::default()
        };
        let json = serde_json::to_string(&patch).expect("patch should serialize");
        assert_eq!(json, r#"{"favorite":false}"#);
    }

    #[test]
    fn test_patch_uses_camel_case_keys() {
        let patch = ItemPatch {
            image_url: Some("/new.png".to_string()),
            last_worn: Some("2026-01-05T00:00:00Z".parse().expect("valid timestamp")),
            ..Default::default()
        };
        let json = serde_json::to_string(&patch).expect("patch should serialize");
        assert!(json.contains("\"imageUrl\""));
        assert!(json.contains("\"lastWorn\""));
    }

    #[test]
    fn test_matches_search_across_fields() {
        let item = sample_item();
        assert!(item.matches_search("shirt"));
        assert!(item.matches_search("cotton")); // description
        assert!(item.matches_search("basics")); // brand
        assert!(item.matches_search("tops")); // category
        assert!(item.matches_search("white")); // color
        assert!(item.matches_search("summer")); // season
        assert!(item.matches_search("casual")); // occasion
        assert!(!item.matches_search("winter"));
    }

    #[test]
    fn test_category_cycle_wraps() {
        assert_eq!(Category::Tops.next(), Category::Bottoms);
        assert_eq!(Category::Accessories.next(), Category::Tops);
        assert_eq!(Category::Tops.prev(), Category::Accessories);
    }

    #[test]
    fn test_enum_wire_format_is_lowercase() {
        assert_eq!(
            serde_json::to_string(&Category::Outerwear).expect("serializes"),
            r#""outerwear""#
        );
        assert_eq!(
            serde_json::to_string(&Color::Multicolor).expect("serializes"),
            r#""multicolor""#
        );
    }

    #[test]
    fn test_apply_patch_changes_only_set_fields() {
        let mut item = sample_item();
        let patch = ItemPatch {
            favorite: Some(false),
            color: Some(Color::Gray),
            ..Default::default()
        };
        item.apply(&patch);
        assert!(!item.favorite);
        assert_eq!(item.color, Color::Gray);
        // Untouched fields survive
        assert_eq!(item.name, "White T-Shirt");
        assert_eq!(item.brand.as_deref(), Some("Basics Co"));
    }

    #[test]
    fn test_worn_display() {
        let mut item = sample_item();
        assert_eq!(item.worn_display(), "never");
        item.last_worn = Some("2026-01-05T12:00:00Z".parse().expect("valid timestamp"));
        assert_eq!(item.worn_display(), "Jan 05");
    }
}
