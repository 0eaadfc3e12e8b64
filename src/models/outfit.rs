use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::contains_ignore_case;

use super::{Occasion, Season};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outfit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Weak references to ClothingItem ids - dangling ids are filtered
    /// at render time, never rejected
    pub items: Vec<String>,
    pub occasion: Vec<Occasion>,
    pub season: Vec<Season>,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub last_worn: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Outfit {
    /// Check if this outfit matches the search query.
    /// Query should already be lowercased.
    pub fn matches_search(&self, query: &str) -> bool {
        contains_ignore_case(&self.name, query)
            || self
                .description
                .as_ref()
                .map(|s| contains_ignore_case(s, query))
                .unwrap_or(false)
            || self.season.iter().any(|s| contains_ignore_case(s.label(), query))
            || self.occasion.iter().any(|o| contains_ignore_case(o.label(), query))
    }

    pub fn seasons_display(&self) -> String {
        self.season
            .iter()
            .map(|s| s.label())
            .collect::<Vec<_>>()
            .join(", ")
    }

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

    /// Apply a partial update in place.
    /// Mirrors what the server does with the same patch, so optimistic
    /// and offline updates stay consistent with a later refresh.
    pub fn apply(&mut self, patch: &OutfitPatch) {
        if let Some(ref name) = patch.name {
            self.name = name.clone();
        }
        if let Some(ref description) = patch.description {
            self.description = Some(description.clone());
        }
        if let Some(ref items) = patch.items {
            self.items = items.clone();
        }
        if let Some(ref occasion) = patch.occasion {
            self.occasion = occasion.clone();
        }
        if let Some(ref season) = patch.season {
            self.season = season.clone();
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
pub struct OutfitDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub items: Vec<String>,
    pub occasion: Vec<Occasion>,
    pub season: Vec<Season>,
    pub favorite: bool,
}

/// Partial update payload - only set fields are serialized
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutfitPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occasion: Option<Vec<Occasion>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<Vec<Season>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_worn: Option<DateTime<Utc>>,
}

// Sorting options for the outfits table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutfitSortColumn {
    #[default]
    Name,
    Added,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_outfit() -> Outfit {
        Outfit {
            id: "o1".to_string(),
            name: "Casual Weekend".to_string(),
            description: Some("Comfortable outfit for weekend errands".to_string()),
            items: vec!["1".to_string(), "2".to_string(), "5".to_string()],
            occasion: vec![Occasion::Casual],
            season: vec![Season::Spring, Season::Fall],
            favorite: true,
            last_worn: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_outfit_parses_wire_format() {
        let json = r#"{
            "id": "9c",
            "name": "Night Out",
            "description": "Elegant outfit for evening events",
            "items": ["3", "6"],
            "occasion": ["formal", "special"],
            "season": ["all"],
            "favorite": false,
            "createdAt": "2025-12-24T09:00:00Z"
        }"#;

        let outfit: Outfit = serde_json::from_str(json).expect("outfit should parse");
        assert_eq!(outfit.items, vec!["3", "6"]);
        assert_eq!(outfit.occasion, vec![Occasion::Formal, Occasion::Special]);
        assert!(outfit.last_worn.is_none());
    }

    #[test]
    fn test_matches_search() {
        let outfit = sample_outfit();
        assert!(outfit.matches_search("weekend"));
        assert!(outfit.matches_search("errands")); // description
        assert!(outfit.matches_search("fall")); // season
        assert!(outfit.matches_search("casual")); // occasion
        assert!(!outfit.matches_search("formal"));
    }

    #[test]
    fn test_patch_serializes_only_set_fields() {
        let patch = OutfitPatch {
            items: Some(vec!["1".to_string()]),
            ..Default::default()
        };
        let json = serde_json::to_string(&patch).expect("patch should serialize");
        assert_eq!(json, r#"{"items":["1"]}"#);
    }

    #[test]
    fn test_apply_patch_changes_only_set_fields() {
        let mut outfit = sample_outfit();
        let patch = OutfitPatch {
            items: Some(vec!["7".to_string()]),
            favorite: Some(false),
            ..Default::default()
        };
        outfit.apply(&patch);
        assert_eq!(outfit.items, vec!["7"]);
        assert!(!outfit.favorite);
        assert_eq!(outfit.name, "Casual Weekend");
    }
}
