//! Starter wardrobe used when there is nothing else to show.
//!
//! A fresh install that cannot reach the backend and has no cache
//! would otherwise render an empty closet. These sample entries keep
//! the UI explorable until a real sync succeeds; they are replaced
//! wholesale by the first successful refresh.

use chrono::Utc;

use crate::models::{Category, ClothingItem, Color, Occasion, Outfit, Season};

fn item(
    id: &str,
    name: &str,
    description: &str,
    category: Category,
    color: Color,
    season: Vec<Season>,
    occasion: Vec<Occasion>,
    brand: &str,
    favorite: bool,
) -> ClothingItem {
    ClothingItem {
        id: id.to_string(),
        name: name.to_string(),
        description: Some(description.to_string()),
        image_url: "/placeholder.svg".to_string(),
        category,
        color,
        season,
        occasion,
        brand: Some(brand.to_string()),
        favorite,
        last_worn: None,
        created_at: Utc::now(),
    }
}

pub fn sample_items() -> Vec<ClothingItem> {
    vec![
        item(
            "seed-1",
            "White T-Shirt",
            "Basic cotton t-shirt",
            Category::Tops,
            Color::White,
            vec![Season::Spring, Season::Summer, Season::Fall],
            vec![Occasion::Casual],
            "Basics Co",
            true,
        ),
        item(
            "seed-2",
            "Blue Jeans",
            "Classic blue denim jeans",
            Category::Bottoms,
            Color::Blue,
            vec![Season::Spring, Season::Fall, Season::Winter],
            vec![Occasion::Casual],
            "Denim Life",
            true,
        ),
        item(
            "seed-3",
            "Black Dress",
            "Elegant black dress for formal occasions",
            Category::Dresses,
            Color::Black,
            vec![Season::All],
            vec![Occasion::Formal, Occasion::Special],
            "Elegance",
            false,
        ),
        item(
            "seed-4",
            "Brown Leather Jacket",
            "Vintage style leather jacket",
            Category::Outerwear,
            Color::Brown,
            vec![Season::Fall, Season::Winter],
            vec![Occasion::Casual],
            "Leather Co",
            true,
        ),
        item(
            "seed-5",
            "Running Shoes",
            "Athletic shoes for running",
            Category::Shoes,
            Color::Multicolor,
            vec![Season::All],
            vec![Occasion::Athletic, Occasion::Casual],
            "Runner Pro",
            false,
        ),
        item(
            "seed-6",
            "Silver Necklace",
            "Simple silver pendant necklace",
            Category::Accessories,
            Color::Silver,
            vec![Season::All],
            vec![Occasion::Casual, Occasion::Formal],
            "Silver Crafts",
            true,
        ),
    ]
}

pub fn sample_outfits() -> Vec<Outfit> {
    vec![
        Outfit {
            id: "seed-o1".to_string(),
            name: "Casual Weekend".to_string(),
            description: Some("Comfortable outfit for weekend errands".to_string()),
            items: vec!["seed-1".to_string(), "seed-2".to_string(), "seed-5".to_string()],
            occasion: vec![Occasion::Casual],
            season: vec![Season::Spring, Season::Fall],
            favorite: true,
            last_worn: None,
            created_at: Utc::now(),
        },
        Outfit {
            id: "seed-o2".to_string(),
            name: "Night Out".to_string(),
            description: Some("Elegant outfit for evening events".to_string()),
            items: vec!["seed-3".to_string(), "seed-6".to_string()],
            occasion: vec![Occasion::Formal, Occasion::Special],
            season: vec![Season::All],
            favorite: false,
            last_worn: None,
            created_at: Utc::now(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_outfits_reference_sample_items() {
        let items = sample_items();
        let outfits = sample_outfits();

        for outfit in &outfits {
            for item_id in &outfit.items {
                assert!(
                    items.iter().any(|i| &i.id == item_id),
                    "outfit {} references missing item {}",
                    outfit.name,
                    item_id
                );
            }
        }
    }
}
