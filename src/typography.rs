//! Typography Selector
//!
//! Picks a heading/body pairing from a curated table. Selection is
//! deterministic in `(industry, mood, name)`; no font catalog is consulted.

use crate::brand::{BrandTypography, FontSpec};
use crate::hashing::name_fingerprint;

pub const HEADING_WEIGHT: u16 = 700;
pub const BODY_WEIGHT: u16 = 400;
pub const MONO_FAMILY: &str = "JetBrains Mono";

type Pairing = (&'static str, &'static str);

/// Industry -> (heading, body) pairings. `technology` is the fallback.
static CURATED_PAIRINGS: &[(&str, &[Pairing])] = &[
    (
        "technology",
        &[
            ("Inter", "Source Sans 3"),
            ("Space Grotesk", "IBM Plex Sans"),
            ("Outfit", "Nunito Sans"),
        ],
    ),
    (
        "finance",
        &[
            ("Playfair Display", "Source Sans 3"),
            ("Libre Baskerville", "Open Sans"),
            ("Cormorant Garamond", "Lato"),
        ],
    ),
    (
        "health",
        &[("Nunito", "Open Sans"), ("Poppins", "Roboto"), ("Raleway", "Source Sans 3")],
    ),
    (
        "education",
        &[("Merriweather", "Source Sans 3"), ("Lora", "Open Sans"), ("PT Serif", "PT Sans")],
    ),
    (
        "ecommerce",
        &[("Montserrat", "Open Sans"), ("Poppins", "Roboto"), ("DM Sans", "Inter")],
    ),
    (
        "creative",
        &[("Space Grotesk", "DM Sans"), ("Sora", "Inter"), ("Clash Display", "Satoshi")],
    ),
    (
        "food",
        &[
            ("Playfair Display", "Lato"),
            ("Josefin Sans", "Open Sans"),
            ("Cormorant Garamond", "Montserrat"),
        ],
    ),
    (
        "travel",
        &[("Abril Fatface", "Open Sans"), ("Oswald", "Lato"), ("Raleway", "Roboto")],
    ),
    (
        "real_estate",
        &[
            ("Playfair Display", "Lato"),
            ("Libre Baskerville", "Montserrat"),
            ("Cormorant Garamond", "Open Sans"),
        ],
    ),
    (
        "consulting",
        &[
            ("Inter", "Source Sans 3"),
            ("Libre Baskerville", "Open Sans"),
            ("DM Sans", "IBM Plex Sans"),
        ],
    ),
];

/// Mood -> preferred heading category. Unlisted moods prefer sans-serif.
static MOOD_FONT_STYLE: &[(&str, &str)] = &[
    ("modern", "sans-serif"),
    ("classic", "serif"),
    ("playful", "sans-serif"),
    ("professional", "serif"),
    ("bold", "sans-serif"),
    ("minimal", "sans-serif"),
    ("luxury", "serif"),
    ("warm", "serif"),
    ("cool", "sans-serif"),
    ("energetic", "sans-serif"),
];

static SERIF_FAMILIES: &[&str] = &[
    "Playfair Display",
    "Libre Baskerville",
    "Cormorant Garamond",
    "Merriweather",
    "Lora",
    "PT Serif",
    "Abril Fatface",
];

static MONO_FAMILIES: &[&str] = &["JetBrains Mono", "Fira Code", "Source Code Pro"];

pub fn infer_category(family: &str) -> &'static str {
    if SERIF_FAMILIES.contains(&family) {
        "serif"
    } else if MONO_FAMILIES.contains(&family) {
        "monospace"
    } else {
        "sans-serif"
    }
}

pub fn google_fonts_url(family: &str, weight: u16) -> String {
    format!(
        "https://fonts.googleapis.com/css2?family={}:wght@{}&display=swap",
        family.replace(' ', "+"),
        weight
    )
}

fn font(family: &str, weight: u16) -> FontSpec {
    FontSpec {
        family: family.to_string(),
        category: infer_category(family).to_string(),
        weight,
        google_fonts_url: google_fonts_url(family, weight),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TypographySelector;

impl TypographySelector {
    pub fn new() -> Self {
        Self
    }

    pub fn select(&self, industry: &str, mood: &str, name: &str) -> BrandTypography {
        let (heading, body) = self.pick_pairing(industry, mood, name);
        BrandTypography {
            heading: font(heading, HEADING_WEIGHT),
            body: font(body, BODY_WEIGHT),
            mono: font(MONO_FAMILY, BODY_WEIGHT),
        }
    }

    fn pick_pairing(&self, industry: &str, mood: &str, name: &str) -> Pairing {
        let pairings = lookup(CURATED_PAIRINGS, industry)
            .or_else(|| lookup(CURATED_PAIRINGS, "technology"))
            .unwrap_or(&[("Inter", "Source Sans 3")]);
        let style = lookup(MOOD_FONT_STYLE, mood).unwrap_or("sans-serif");

        let matching: Vec<Pairing> = pairings
            .iter()
            .copied()
            .filter(|(heading, _)| infer_category(heading) == style)
            .collect();
        let candidates: &[Pairing] = if matching.is_empty() { pairings } else { &matching };

        let idx = name_fingerprint(name) as usize % candidates.len();
        candidates[idx]
    }
}

fn lookup<V: Copy>(table: &[(&str, V)], key: &str) -> Option<V> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}
