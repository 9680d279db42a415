//! Palette Engine - Deterministic OKLCH Palettes
//!
//! Same `(industry, mood, name)` always yields the same palette. The only
//! per-brand variation is a hue shift derived from a hash of the name.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::brand::{BrandColor, BrandPalette, ColorRole};
use crate::color::{contrast_ratio, ColorError, Oklch, Srgb};
use crate::hashing::name_fingerprint;

/// WCAG AA threshold for normal text.
pub const WCAG_AA_NORMAL: f64 = 4.5;
pub const REPAIR_BACKGROUND: &str = "#ffffff";

const REPAIR_STEP: f64 = 0.02;
const REPAIR_FLOOR: f64 = 0.1;
const MAX_CHROMA: f64 = 0.4;
const HUE_SPREAD: u32 = 30;

/// Industry -> base hue in degrees. `other` is the fallback.
pub static INDUSTRY_HUES: &[(&str, f64)] = &[
    ("technology", 250.0),
    ("finance", 220.0),
    ("health", 150.0),
    ("education", 270.0),
    ("ecommerce", 30.0),
    ("creative", 320.0),
    ("food", 50.0),
    ("travel", 180.0),
    ("real_estate", 40.0),
    ("consulting", 210.0),
    ("other", 200.0),
];
pub const FALLBACK_HUE: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoodAdjustment {
    pub chroma: f64,
    pub lightness_offset: f64,
}

const fn adjustment(chroma: f64, lightness_offset: f64) -> MoodAdjustment {
    MoodAdjustment { chroma, lightness_offset }
}

/// Mood -> chroma and lightness offset. `modern` is the fallback.
pub static MOOD_ADJUSTMENTS: &[(&str, MoodAdjustment)] = &[
    ("modern", adjustment(0.14, 0.0)),
    ("classic", adjustment(0.10, 0.05)),
    ("playful", adjustment(0.20, -0.05)),
    ("professional", adjustment(0.12, 0.05)),
    ("bold", adjustment(0.22, -0.10)),
    ("minimal", adjustment(0.08, 0.10)),
    ("luxury", adjustment(0.12, -0.05)),
    ("warm", adjustment(0.16, 0.0)),
    ("cool", adjustment(0.14, 0.05)),
    ("energetic", adjustment(0.20, -0.05)),
];
pub const FALLBACK_MOOD: MoodAdjustment = adjustment(0.14, 0.0);

pub fn industry_hue(industry: &str) -> f64 {
    INDUSTRY_HUES
        .iter()
        .find(|(key, _)| *key == industry)
        .map_or(FALLBACK_HUE, |(_, hue)| *hue)
}

pub fn mood_adjustment(mood: &str) -> MoodAdjustment {
    MOOD_ADJUSTMENTS
        .iter()
        .find(|(key, _)| *key == mood)
        .map_or(FALLBACK_MOOD, |(_, adj)| *adj)
}

pub fn is_known_industry(industry: &str) -> bool {
    INDUSTRY_HUES.iter().any(|(key, _)| *key == industry)
}

pub fn is_known_mood(mood: &str) -> bool {
    MOOD_ADJUSTMENTS.iter().any(|(key, _)| *key == mood)
}

/// Hue shift in `[-15, +14]` degrees.
pub fn hue_perturbation(name: &str) -> f64 {
    (name_fingerprint(name) % HUE_SPREAD) as f64 - 15.0
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

/// Builds a color from raw OKLCH, clamping L to [0,1], C to [0,0.4] and
/// wrapping H into [0,360).
pub fn create_color(
    name: &str,
    lightness: f64,
    chroma: f64,
    hue: f64,
    role: ColorRole,
) -> BrandColor {
    let lightness = lightness.clamp(0.0, 1.0);
    let chroma = chroma.clamp(0.0, MAX_CHROMA);
    let hue = hue.rem_euclid(360.0);

    let hex = Oklch::new(lightness, chroma, hue).to_srgb_fitted().to_hex();

    BrandColor {
        name: name.to_string(),
        hex,
        oklch_l: round_to(lightness, 3),
        oklch_c: round_to(chroma, 3),
        oklch_h: round_to(hue, 1).rem_euclid(360.0),
        role,
    }
}

/// Generate the deterministic five-role palette.
pub fn generate(industry: &str, mood: &str, name: &str) -> BrandPalette {
    let MoodAdjustment { chroma, lightness_offset } = mood_adjustment(mood);
    let base = (industry_hue(industry) + hue_perturbation(name)).rem_euclid(360.0);

    debug!(industry, mood, base_hue = base, "generating deterministic palette");

    let primary = create_color(
        "Brand Primary",
        0.45 + lightness_offset,
        chroma,
        base,
        ColorRole::Primary,
    );
    let secondary = create_color(
        "Brand Secondary",
        0.50 + lightness_offset,
        chroma * 0.5,
        base + 30.0,
        ColorRole::Secondary,
    );
    let accent = create_color(
        "Brand Accent",
        0.65 + lightness_offset,
        chroma * 1.3,
        base + 180.0,
        ColorRole::Accent,
    );
    let neutral_light = create_color("Neutral Light", 0.97, 0.005, base, ColorRole::NeutralLight);
    let neutral_dark = create_color("Neutral Dark", 0.20, 0.03, base, ColorRole::NeutralDark);

    let primary = repair_against(primary, Srgb::WHITE).color;

    BrandPalette {
        primary,
        secondary,
        accent,
        neutral_light,
        neutral_dark,
    }
}

/// Outcome of an accessibility repair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContrastRepair {
    pub color: BrandColor,
    pub ratio: f64,
    pub compliant: bool,
    /// Darkening steps taken; 0 when the input already passed or the repair
    /// gave up.
    pub steps: u32,
}

/// Darken `color` until it reaches AA contrast against `against`.
///
/// Gives up once lightness reaches the floor and hands back the input
/// color with `compliant == false`.
pub fn repair_contrast(color: &BrandColor, against: &str) -> Result<ContrastRepair, ColorError> {
    let background = Srgb::from_hex(against)?;
    Ok(repair_against(color.clone(), background))
}

/// Best-effort form of [`repair_contrast`] that only returns the color.
pub fn ensure_accessible(color: &BrandColor, against: &str) -> Result<BrandColor, ColorError> {
    repair_contrast(color, against).map(|repair| repair.color)
}

fn color_contrast(color: &BrandColor, background: Srgb) -> f64 {
    // Hex produced by create_color always parses; treat anything else as
    // maximally failing so the loop keeps darkening.
    Srgb::from_hex(&color.hex)
        .map(|fg| contrast_ratio(fg, background))
        .unwrap_or(1.0)
}

fn repair_against(color: BrandColor, background: Srgb) -> ContrastRepair {
    let ratio = color_contrast(&color, background);
    if ratio >= WCAG_AA_NORMAL {
        return ContrastRepair { color, ratio, compliant: true, steps: 0 };
    }

    let mut lightness = color.oklch_l;
    let mut steps = 0;
    while lightness > REPAIR_FLOOR {
        lightness -= REPAIR_STEP;
        steps += 1;
        let candidate = create_color(
            &color.name,
            lightness,
            color.oklch_c,
            color.oklch_h,
            color.role,
        );
        let candidate_ratio = color_contrast(&candidate, background);
        if candidate_ratio >= WCAG_AA_NORMAL {
            debug!(role = %color.role, steps, ratio = candidate_ratio, "repaired contrast");
            return ContrastRepair {
                color: candidate,
                ratio: candidate_ratio,
                compliant: true,
                steps,
            };
        }
    }

    debug!(role = %color.role, hex = %color.hex, ratio, "contrast repair exhausted");
    ContrastRepair { color, ratio, compliant: false, steps: 0 }
}

/// WCAG contrast ratio between two hex colors.
pub fn check_contrast(hex_a: &str, hex_b: &str) -> Result<f64, ColorError> {
    let a = Srgb::from_hex(hex_a)?;
    let b = Srgb::from_hex(hex_b)?;
    Ok(contrast_ratio(a, b))
}

/// Reads an arbitrary hex color into the stored OKLCH form
/// (L in [0,1], C in [0,0.5], H in [0,360), rounded like generated colors).
pub fn hex_to_oklch(hex: &str) -> Result<Oklch, ColorError> {
    let lch = Oklch::from_srgb(Srgb::from_hex(hex)?);
    let h = if lch.h.is_nan() { 0.0 } else { lch.h.rem_euclid(360.0) };
    Ok(Oklch {
        l: round_to(lch.l.clamp(0.0, 1.0), 3),
        c: round_to(lch.c.clamp(0.0, 0.5), 3),
        h: round_to(h, 1).rem_euclid(360.0),
    })
}
