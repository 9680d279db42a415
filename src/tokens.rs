//! Design Tokens
//!
//! Flattens a palette and typography into the key/value form consumed by
//! token exporters and site theming.

use std::collections::BTreeMap;

use crate::brand::{BrandPalette, BrandTokens, BrandTypography, ColorRole};

static SPACING: &[(&str, &str)] = &[
    ("xs", "0.25rem"),
    ("sm", "0.5rem"),
    ("md", "1rem"),
    ("lg", "1.5rem"),
    ("xl", "2rem"),
    ("2xl", "3rem"),
    ("3xl", "4rem"),
    ("section", "6rem"),
];

static RADII: &[(&str, &str)] = &[
    ("sm", "0.25rem"),
    ("md", "0.5rem"),
    ("lg", "1rem"),
    ("xl", "1.5rem"),
    ("full", "9999px"),
];

fn scale(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// `{role}` -> hex and `{role}-oklch` -> CSS `oklch()` for every role.
pub fn color_scale(palette: &BrandPalette) -> BTreeMap<String, String> {
    let mut colors = BTreeMap::new();
    for role in ColorRole::ALL {
        let color = palette.get(role);
        colors.insert(role.as_str().to_string(), color.hex.clone());
        colors.insert(format!("{}-oklch", role.as_str()), color.oklch_css());
    }
    colors
}

pub fn create_tokens(palette: &BrandPalette, typography: &BrandTypography) -> BrandTokens {
    let fonts = [
        ("heading", &typography.heading.family),
        ("body", &typography.body.family),
        ("mono", &typography.mono.family),
    ]
    .into_iter()
    .map(|(role, family)| (role.to_string(), family.clone()))
    .collect();

    BrandTokens {
        colors: color_scale(palette),
        fonts,
        spacing: scale(SPACING),
        radii: scale(RADII),
    }
}
