//! Per-tab rendering: the closet table, outfit list, and profile page.

pub mod closet;
pub mod outfits;
pub mod profile;
