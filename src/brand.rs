//! Brand Domain Model
//!
//! Plain immutable data handed between the engine and its downstream
//! consumers (token exporters, card renderers, site theming).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_INDUSTRY: &str = "technology";
pub const DEFAULT_MOOD: &str = "modern";

/// Role a color plays in a palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorRole {
    Primary,
    Secondary,
    Accent,
    NeutralLight,
    NeutralDark,
}

impl ColorRole {
    pub const ALL: [ColorRole; 5] = [
        ColorRole::Primary,
        ColorRole::Secondary,
        ColorRole::Accent,
        ColorRole::NeutralLight,
        ColorRole::NeutralDark,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ColorRole::Primary => "primary",
            ColorRole::Secondary => "secondary",
            ColorRole::Accent => "accent",
            ColorRole::NeutralLight => "neutral-light",
            ColorRole::NeutralDark => "neutral-dark",
        }
    }
}

impl fmt::Display for ColorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("unknown color role: {s}"))
    }
}

/// A single palette color. `hex` is always derived from the OKLCH triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandColor {
    pub name: String,
    pub hex: String,
    pub oklch_l: f64,
    pub oklch_c: f64,
    pub oklch_h: f64,
    pub role: ColorRole,
}

impl BrandColor {
    /// CSS Color 4 `oklch()` notation.
    pub fn oklch_css(&self) -> String {
        format!(
            "oklch({:.3} {:.3} {:.1})",
            self.oklch_l, self.oklch_c, self.oklch_h
        )
    }

    /// 8-bit channels. Falls back to black for a malformed hex, which the
    /// engine never produces.
    pub fn rgb(&self) -> (u8, u8, u8) {
        crate::color::Srgb::from_hex(&self.hex)
            .map(|c| c.to_rgb8())
            .unwrap_or((0, 0, 0))
    }
}

/// Exactly one color per [`ColorRole`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandPalette {
    pub primary: BrandColor,
    pub secondary: BrandColor,
    pub accent: BrandColor,
    pub neutral_light: BrandColor,
    pub neutral_dark: BrandColor,
}

impl BrandPalette {
    pub fn all_colors(&self) -> [&BrandColor; 5] {
        [
            &self.primary,
            &self.secondary,
            &self.accent,
            &self.neutral_light,
            &self.neutral_dark,
        ]
    }

    pub fn get(&self, role: ColorRole) -> &BrandColor {
        match role {
            ColorRole::Primary => &self.primary,
            ColorRole::Secondary => &self.secondary,
            ColorRole::Accent => &self.accent,
            ColorRole::NeutralLight => &self.neutral_light,
            ColorRole::NeutralDark => &self.neutral_dark,
        }
    }

    pub fn to_hex_map(&self) -> BTreeMap<String, String> {
        ColorRole::ALL
            .into_iter()
            .map(|role| (role.as_str().to_string(), self.get(role).hex.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandContact {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
}

/// The brief a package is generated from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandInput {
    pub name: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default = "default_industry")]
    pub industry: String,
    #[serde(default = "default_mood")]
    pub mood: String,
    #[serde(default)]
    pub contact: BrandContact,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub description: String,
}

fn default_industry() -> String {
    DEFAULT_INDUSTRY.to_string()
}

fn default_mood() -> String {
    DEFAULT_MOOD.to_string()
}

impl BrandInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tagline: String::new(),
            industry: default_industry(),
            mood: default_mood(),
            contact: BrandContact::default(),
            domain: String::new(),
            description: String::new(),
        }
    }

    pub fn slug(&self) -> String {
        self.name.to_lowercase().replace([' ', '_'], "-")
    }

    /// Domain names are compared case-insensitively.
    pub fn normalized(mut self) -> Self {
        self.domain = self.domain.to_lowercase();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub category: String,
    pub weight: u16,
    pub google_fonts_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandTypography {
    pub heading: FontSpec,
    pub body: FontSpec,
    pub mono: FontSpec,
}

/// Design tokens. Maps are ordered so serialized output is stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandTokens {
    pub colors: BTreeMap<String, String>,
    pub fonts: BTreeMap<String, String>,
    pub spacing: BTreeMap<String, String>,
    pub radii: BTreeMap<String, String>,
}
