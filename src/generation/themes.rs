//! # Themes
//!
//! Name tables that flavour generated content.

use crate::DressingCategory;
use serde::{Deserialize, Serialize};

/// Flavour of a dungeon; picks the tables content passes draw names from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Theme {
    #[default]
    #[serde(alias = "dungeon")]
    Dungeon,
    #[serde(alias = "crypt")]
    Crypt,
    #[serde(alias = "cavern")]
    Cavern,
    #[serde(alias = "ruins")]
    Ruins,
}

impl Theme {
    pub fn trap_names(self) -> &'static [&'static str] {
        match self {
            Theme::Dungeon => &[
                "pressure-plate darts",
                "collapsing floor",
                "swinging blade",
                "poison needle lock",
            ],
            Theme::Crypt => &[
                "necrotic glyph",
                "sealed sarcophagus gas",
                "grasping bone pit",
                "cursed offering bowl",
            ],
            Theme::Cavern => &[
                "loose scree slide",
                "hidden sinkhole",
                "spore cloud",
                "stalactite drop",
            ],
            Theme::Ruins => &[
                "crumbling archway",
                "rusted bear trap",
                "unstable pillar",
                "flooded cellar drop",
            ],
        }
    }

    pub fn creatures(self) -> &'static [&'static str] {
        match self {
            Theme::Dungeon => &["goblin", "hobgoblin", "giant rat", "bugbear", "ogre"],
            Theme::Crypt => &["skeleton", "zombie", "ghoul", "wight", "shadow"],
            Theme::Cavern => &["giant spider", "cave troll", "darkmantle", "hook horror", "grick"],
            Theme::Ruins => &["bandit", "kobold", "gnoll", "harpy", "animated armor"],
        }
    }

    pub fn dressing(self, category: DressingCategory) -> &'static [&'static str] {
        match (self, category) {
            (_, DressingCategory::Furniture) => &[
                "a splintered table",
                "a toppled bookshelf",
                "a row of rotting cots",
                "an iron-banded chest, empty",
            ],
            (_, DressingCategory::Light) => &[
                "a guttering brazier",
                "a cold iron sconce",
                "a ring of melted candles",
            ],
            (Theme::Crypt, DressingCategory::Debris) => &[
                "scattered finger bones",
                "shattered funerary urns",
                "a heap of grave cloth",
            ],
            (Theme::Cavern, DressingCategory::Debris) => &[
                "a drift of guano",
                "fallen boulders",
                "a tangle of pale roots",
            ],
            (_, DressingCategory::Debris) => &[
                "broken masonry",
                "a pile of rubble",
                "shredded tapestries",
            ],
            (Theme::Crypt, DressingCategory::Feature) => &[
                "a carved burial niche",
                "a defaced shrine",
                "an ossuary wall",
            ],
            (Theme::Cavern, DressingCategory::Feature) => &[
                "a glowing fungus bed",
                "a still underground pool",
                "a column of flowstone",
            ],
            (_, DressingCategory::Feature) => &[
                "a dry fountain",
                "a cracked statue",
                "a mosaic floor",
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_theme_has_names() {
        for theme in [Theme::Dungeon, Theme::Crypt, Theme::Cavern, Theme::Ruins] {
            assert!(!theme.trap_names().is_empty());
            assert!(!theme.creatures().is_empty());
            for category in [
                DressingCategory::Furniture,
                DressingCategory::Debris,
                DressingCategory::Light,
                DressingCategory::Feature,
            ] {
                assert!(!theme.dressing(category).is_empty());
            }
        }
    }

    #[test]
    fn test_theme_parses_lowercase() {
        let theme: Theme = serde_json::from_str("\"crypt\"").unwrap();
        assert_eq!(theme, Theme::Crypt);
    }
}
