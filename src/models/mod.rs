//! Data models for wardrobe entities.
//!
//! This module contains all the data structures used to represent
//! wardrobe data including:
//!
//! - `ClothingItem`: a single piece of clothing with category, color,
//!   season and occasion tags
//! - `Outfit`: a named combination of clothing items (by id)
//! - `User`: the authenticated account
//!
//! All wire types use the backend's camelCase JSON field names.

pub mod item;
pub mod outfit;
pub mod user;

pub use item::{
    Category, ClothingItem, Color, ItemDraft, ItemPatch, ItemSortColumn, Occasion, Season,
};
pub use outfit::{Outfit, OutfitDraft, OutfitPatch, OutfitSortColumn};
pub use user::User;
