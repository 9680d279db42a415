//! Contract Invariant Tests
//!
//! These tests verify the non-negotiable guarantees.

use std::collections::HashSet;
use std::sync::Arc;

use thenine_core::{
    check_contrast, generate,
    palette::{INDUSTRY_HUES, MOOD_ADJUSTMENTS},
    BrandContact, BrandInput, BrandPalette, BrandPipeline, ColorRole, EngineConfig, FailureMode,
    PaletteOrigin, PaletteRequest, PaletteSource, SourceError,
};

fn hex_is_valid(hex: &str) -> bool {
    hex.len() == 7
        && hex.starts_with('#')
        && hex[1..].chars().all(|c| c.is_ascii_hexdigit())
}

fn create_brief() -> BrandInput {
    BrandInput {
        name: "Acme Corp".to_string(),
        tagline: "Widgets for everyone".to_string(),
        industry: "technology".to_string(),
        mood: "modern".to_string(),
        contact: BrandContact {
            name: "Jordan Lee".to_string(),
            title: "Founder".to_string(),
            email: "jordan@acme.com".to_string(),
            phone: "+1 555 0100".to_string(),
            website: "acme.com".to_string(),
        },
        domain: "Acme.com".to_string(),
        description: String::new(),
    }
}

#[test]
fn invariant_generation_is_deterministic() {
    for (industry, _) in INDUSTRY_HUES {
        let a = generate(industry, "bold", "Repeatable");
        let b = generate(industry, "bold", "Repeatable");
        assert_eq!(a, b);
    }
}

#[test]
fn invariant_every_role_present_once() {
    let palette = generate("finance", "classic", "Ledger");
    let roles: HashSet<ColorRole> = palette.all_colors().iter().map(|c| c.role).collect();
    assert_eq!(roles.len(), 5);
    for role in ColorRole::ALL {
        assert_eq!(palette.get(role).role, role);
    }
}

#[test]
fn invariant_gamut_and_neutral_bounds_for_every_category() {
    let mut industries: Vec<&str> = INDUSTRY_HUES.iter().map(|(k, _)| *k).collect();
    industries.push("unlisted");
    let mut moods: Vec<&str> = MOOD_ADJUSTMENTS.iter().map(|(k, _)| *k).collect();
    moods.push("unlisted");

    for industry in &industries {
        for mood in &moods {
            let palette = generate(industry, mood, "Test");
            for color in palette.all_colors() {
                assert!(hex_is_valid(&color.hex), "{industry}/{mood}: {}", color.hex);
                assert!((0.0..=1.0).contains(&color.oklch_l));
                assert!((0.0..=0.4).contains(&color.oklch_c));
                assert!((0.0..360.0).contains(&color.oklch_h));
            }
            assert!(palette.neutral_light.oklch_l > 0.9, "{industry}/{mood}");
            assert!(palette.neutral_dark.oklch_l < 0.3, "{industry}/{mood}");
        }
    }
}

#[test]
fn invariant_primary_meets_aa_on_white() {
    for industry in ["technology", "finance", "health", "creative"] {
        let palette = generate(industry, "modern", "Test");
        let ratio = check_contrast(&palette.primary.hex, "#ffffff").unwrap();
        assert!(ratio >= 4.5, "{industry} primary failed WCAG AA: {ratio}");
    }
}

#[test]
fn invariant_name_changes_palette() {
    let alpha = generate("technology", "modern", "Alpha");
    let beta = generate("technology", "modern", "Beta");
    assert_ne!(alpha.primary.hex, beta.primary.hex);
}

#[test]
fn invariant_industry_changes_palette() {
    let tech = generate("technology", "modern", "Test");
    let health = generate("health", "modern", "Test");
    assert_ne!(tech.primary.hex, health.primary.hex);
}

#[test]
fn invariant_contrast_bounds() {
    let max = check_contrast("#000000", "#ffffff").unwrap();
    assert!((max - 21.0).abs() < 1e-6, "black/white = {max}");
    for hex in ["#000000", "#ffffff", "#1a56db", "#AAAAAA"] {
        assert_eq!(check_contrast(hex, hex).unwrap(), 1.0);
    }
    assert!(check_contrast("#zzzzzz", "#ffffff").is_err());
}

#[test]
fn scenario_acme_corp() {
    let palette = generate("technology", "modern", "Acme Corp");
    assert!(check_contrast(&palette.primary.hex, "#ffffff").unwrap() >= 4.5);
    assert!(palette.neutral_light.oklch_l > 0.9);
    assert!(palette.neutral_dark.oklch_l < 0.3);
    let hexes: HashSet<&str> = palette.all_colors().iter().map(|c| c.hex.as_str()).collect();
    assert_eq!(hexes.len(), 5);
}

#[test]
fn invariant_build_calls_validate() {
    let pipeline = BrandPipeline::default();
    let mut brief = create_brief();
    brief.contact.email = "jordan-at-acme".to_string();

    let err = pipeline.build(&brief).unwrap_err();
    assert!(err.to_string().contains("Validation failed"));
    assert!(err.to_string().contains("contact"));
}

#[test]
fn invariant_valid_brief_builds() {
    let pipeline = BrandPipeline::default();
    let package = pipeline.build(&create_brief()).unwrap();

    assert!(package.validation.valid);
    assert!(!package.manifest_hash.is_empty());
    assert!(package.palette_audit.is_empty());
    assert_eq!(package.slug, "acme-corp");
    assert_eq!(package.input.domain, "acme.com");
    assert_eq!(package.palette, generate("technology", "modern", "Acme Corp"));
    assert_eq!(package.tokens.colors["primary"], package.palette.primary.hex);
    assert_eq!(
        package.palette_origin,
        PaletteOrigin::Deterministic { fallback_reason: None }
    );
}

#[test]
fn invariant_job_hash_stable() {
    let pipeline = BrandPipeline::default();
    let p1 = pipeline.build(&create_brief()).unwrap();
    let p2 = pipeline.build(&create_brief()).unwrap();

    // Same brief, same job; ids and timestamps differ per build.
    assert_eq!(p1.job_hash, p2.job_hash);
    assert_eq!(p1.palette, p2.palette);
    assert_ne!(p1.id, p2.id);

    let mut other = create_brief();
    other.mood = "bold".to_string();
    assert_ne!(pipeline.build(&other).unwrap().job_hash, p1.job_hash);
}

#[test]
fn invariant_warn_mode_builds_flagged_brief() {
    let config = EngineConfig {
        failure_mode: FailureMode::Warn,
        ..EngineConfig::default()
    };
    let pipeline = BrandPipeline::new(&config);
    let mut brief = create_brief();
    brief.contact.email = "jordan-at-acme".to_string();

    let package = pipeline.build(&brief).unwrap();
    assert!(package.validation.has_errors());
}

struct Offline;

impl PaletteSource for Offline {
    fn name(&self) -> &str {
        "offline"
    }

    fn generate(&self, _request: &PaletteRequest) -> Result<BrandPalette, SourceError> {
        Err(SourceError::Network("dns lookup failed".to_string()))
    }
}

#[test]
fn invariant_failed_source_falls_back_to_deterministic() {
    let pipeline = BrandPipeline::with_source(&EngineConfig::default(), Arc::new(Offline));
    let package = pipeline.build(&create_brief()).unwrap();

    assert_eq!(package.palette, generate("technology", "modern", "Acme Corp"));
    assert!(matches!(
        package.palette_origin,
        PaletteOrigin::Deterministic { fallback_reason: Some(SourceError::Network(_)) }
    ));
}
