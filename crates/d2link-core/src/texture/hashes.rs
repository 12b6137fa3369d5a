//! Curated texture hash lists.
//!
//! Collected by observing which hashes the game submits on each screen.
//! Floor and wall tiles are deliberately absent; they are identified by draw
//! routine instead.

use super::TextureCategory;

pub(super) const TITLE_SCREEN: &[u32] = &[
    0x0836BFF0, 0x0D609152, 0x1DF19DD6, 0x2C779942, 0x3A174CB2, 0x3D35F3C5, 0x3D4C8C14,
    0x605F521F, 0x6B69636D, 0x73059F7C, 0x8766B77A, 0x8AF2178A, 0x90BDD994, 0x94E77D2D,
    0xA66AC09C, 0xBE1A20C3, 0xC158E602, 0xC2625261, 0xCCF7CC94, 0xCEE4C170, 0xD38A63DF,
    0xD4579523, 0xDA6E064E, 0xE22A8BC4, 0xE2E6B0C7, 0xE9263199, 0xE1E211F9, 0x2AC72136,
    0x2F15F9DE, 0x2DBA4381, 0x5BBE76AB, 0x5FA60772, 0x7BB42E90, 0x08B64561, 0x8A09DE96,
    0x8B255624, 0x8BCEB8C5, 0x8BE41271, 0x8C93DC24, 0x38AC989C, 0x42F99404, 0x49D1F478,
    0x49F4099D, 0x57FF0B65, 0x87C0B98D, 0x89AAF047, 0x128BD717, 0x169C4B8E, 0x234CAE2E,
    0x264FC41C, 0x282FE954, 0x467C7521, 0x614D3948, 0x874FB06E, 0x968DB1CE, 0x969ED6E4,
    0x3034ACFA, 0x18793782, 0x32561192, 0x23206047, 0xA6A88D0E, 0xA8B86316, 0xA8BA2A4F,
    0xA13C32B5, 0xAFAA7B74, 0xB1450CB1, 0xBC7F5DDB, 0xBCF633E8, 0xBE9C50D5, 0xBEC03B1C,
    0xC0821E4C, 0xC5638E07, 0xCAE3F8E8, 0xD113D34D, 0xD4032A7F, 0xD5206C21, 0xD1149259,
    0xE15C8E53, 0xE9174A70, 0xEDF6F578, 0xF13DD4FB, 0xF045CD36, 0xF169106C, 0xC9D4E158,
];

pub(super) const LOADING_SCREEN: &[u32] = &[
    0x0AA1834D, 0x1A7964A9, 0x2F5B86A7, 0x70A8CB14, 0x32965CE1, 0x897794CE, 0x3136B0EE,
    0x32965CE1, 0xC2CC7E28, 0x2A683B29, 0x01C37FF8,
];

pub(super) const MOUSE_POINTER: &[u32] = &[
    0xFE34F8B7, 0x5CAC0E94, 0x4B661CD1, 0xCC96742E, 0x9BAEFE96, 0xAEC74213, 0x45885F72,
    0x049925AC, 0x4B661CD1, 0xFE34F8B7,
];

pub(super) const USER_INTERFACE: &[u32] = &[
    0x2FF1FD61, 0x54CC8B72, 0xFC253C88, 0xABE12614, 0xA22F5459, 0xA0D8FB2A, 0x20526487,
    0x8A3B7D58, 0x2FF1FD61, 0x54CC8B72, 0x76AA9AAC, 0xEF8D8978, 0x45E0AF79, 0x9A008B35,
    0x2A53BD89, 0x13D2C082, 0xAB6AB811, 0xEE7D31BA, 0x6D1E37CF, 0xA4E86125, 0xA769824B,
    0xB4119F58, 0xC2DA4379, 0xDFBF045F, 0x88021112, 0x726EEAA0, 0x49E4E24E, 0x3B50F3B6,
    0x1E623206, 0xAE502740, 0xD16D7F9A, 0xF6EC6116, 0x56ACD7E4, 0x7656C190, 0xB0D15023,
    0xB2C6E5FB, 0x27D5991A, 0x21D8D615, 0x2BBF74BE, 0x9AB19E53, 0x9BA9EEB2, 0x109348C9,
    0x0F37086A, 0x10AC28D0, 0x5C121175, 0x5C4D1125, 0xA1990293, 0xAE25BFF7, 0xB5855728,
    0xC8F9D3F1, 0x2172D939, 0x0BD8D550, 0x62CFB0B8, 0x93E92B00, 0x815A6925, 0x135190AF,
    0x3408446D, 0xAA265B2E, 0x316149FE, 0x63556155, 0xA9BA1EB0, 0xA9E34142, 0xA0564010,
    0xB0A058C2, 0xB037844A, 0xBBFEE318, 0xC95D3136, 0xCEADB1CD, 0xCEF62AB8, 0xCFD7F4DD,
    0xD8A1F81B, 0xD8DF8F4B, 0xD9DC1BDD, 0xDFE365F3, 0xEE4F10D9, 0x4C389B09, 0x4C049E57,
    0x4C8BDA35, 0x4D234FFB, 0x4B2E9D5B, 0x1FFB1615, 0x0A90D031, 0x5ED2FC41, 0x6B7E62EF,
    0x6D05DE67, 0x7ACFC435, 0x7A742B36, 0x8D3366EC, 0x9AB19E5E, 0x933BA45C, 0x977C13BE,
    0x7820EA79, 0x9643D531, 0x7111312A, 0x25534537, 0xC723C18E, 0xFA170B3F, 0x97C7E7F4,
    0x8CE7EF63, 0x45C78147, 0x5CA62551, 0xF8D429FB, 0xFEE40E62,
];

/// All hash lists with their categories. Listing order decides bucket order
/// but never lookup results; the lists are disjoint across categories.
pub(super) const HASHES_PER_CATEGORY: &[(TextureCategory, &[u32])] = &[
    (TextureCategory::MousePointer, MOUSE_POINTER),
    (TextureCategory::LoadingScreen, LOADING_SCREEN),
    (TextureCategory::TitleScreen, TITLE_SCREEN),
    (TextureCategory::UserInterface, USER_INTERFACE),
];
