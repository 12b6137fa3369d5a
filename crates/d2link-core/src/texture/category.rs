//! Texture categories and draw-routine refinement.

use serde::{Deserialize, Serialize};
use strum::{Display, FromRepr, IntoStaticStr};

use crate::game::DrawRoutine;

/// What a texture is used for.
///
/// Floor and wall tiles are too numerous to enumerate by hash; they are only
/// ever assigned through [`refine_category`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    FromRepr,
    Display,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[repr(u8)]
pub enum TextureCategory {
    #[default]
    Unknown = 0,
    MousePointer = 1,
    LoadingScreen = 2,
    Floor = 3,
    TitleScreen = 4,
    Wall = 5,
    UserInterface = 6,
}

impl TextureCategory {
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::from_repr(value)
    }
}

/// Refine a hash-derived category with the draw routine that submitted the
/// texture. A category already known from the hash always stands; only
/// unknown textures pick up floor/wall from their draw routine.
pub fn refine_category(previous: TextureCategory, routine: DrawRoutine) -> TextureCategory {
    if previous != TextureCategory::Unknown {
        return previous;
    }
    match routine {
        DrawRoutine::Floor => TextureCategory::Floor,
        DrawRoutine::Wall1 | DrawRoutine::Wall2 => TextureCategory::Wall,
        _ => previous,
    }
}
