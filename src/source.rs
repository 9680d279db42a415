//! Palette Strategy - External Source, Deterministic Fallback
//!
//! Stage one asks an optional [`PaletteSource`] (typically a generative
//! model behind a network client the caller owns) under a timeout and a
//! consecutive-failure breaker. Stage two is [`palette::generate`], taken
//! explicitly for every [`SourceError`] kind.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

use crate::brand::{BrandColor, BrandPalette, ColorRole};
use crate::color::Srgb;
use crate::config::SourceConfig;
use crate::palette::{self, hex_to_oklch};

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SourceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unparseable palette reply: {0}")]
    Parse(String),

    #[error("Palette source timed out after {0} ms")]
    Timeout(u64),

    #[error("Palette source unavailable: {0}")]
    Unavailable(String),

    #[error("Circuit open after {0} consecutive failures")]
    CircuitOpen(u32),
}

/// What a source is asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteRequest {
    pub industry: String,
    pub mood: String,
    pub name: String,
}

impl PaletteRequest {
    pub fn new(industry: &str, mood: &str, name: &str) -> Self {
        Self {
            industry: industry.to_string(),
            mood: mood.to_string(),
            name: name.to_string(),
        }
    }

    /// Prompt text for generative sources. Replies are read with
    /// [`parse_palette_reply`].
    pub fn prompt(&self) -> String {
        format!(
            "Generate a professional 5-color brand palette for:\n\
             Name: {}\nIndustry: {}\nMood: {}\n\n\
             Return ONLY valid JSON (no markdown) with this structure:\n\
             {{\"colors\": [\n  {{\"name\": \"Color Name\", \"hex\": \"#RRGGBB\", \
             \"purpose\": \"primary/secondary/accent/neutral-light/neutral-dark\", \
             \"psychology\": \"Why this color\"}}\n]}}\n\n\
             Requirements:\n\
             - 1 primary, 1 secondary, 1 accent, 1 neutral-light, 1 neutral-dark\n\
             - All hex codes must be valid 6-digit hex\n\
             - Primary should work on white bg (WCAG AA contrast)\n\
             - Neutral-light should be very light (near white)\n\
             - Neutral-dark should be very dark (near black)",
            self.name, self.industry, self.mood
        )
    }
}

/// An external palette provider.
pub trait PaletteSource: Send + Sync {
    fn name(&self) -> &str;
    fn generate(&self, request: &PaletteRequest) -> Result<BrandPalette, SourceError>;
}

#[derive(Debug, Deserialize)]
struct PaletteReply {
    colors: Vec<ReplyColor>,
}

#[derive(Debug, Deserialize)]
struct ReplyColor {
    name: String,
    hex: String,
    purpose: String,
}

/// Longest color name accepted from a source.
pub const MAX_COLOR_NAME_LEN: usize = 50;

/// Parses a `{"colors": [{"name", "hex", "purpose"}, ...]}` reply.
///
/// Every role must be present with a `#rrggbb` hex and a 1-50 character
/// name. Extra fields are ignored; a repeated role keeps the last entry.
pub fn parse_palette_reply(text: &str) -> Result<BrandPalette, SourceError> {
    let reply: PaletteReply =
        serde_json::from_str(text.trim()).map_err(|e| SourceError::Parse(e.to_string()))?;

    let mut by_role: HashMap<ColorRole, BrandColor> = HashMap::new();
    for entry in reply.colors {
        let role: ColorRole = entry.purpose.parse().map_err(SourceError::Parse)?;

        let name_len = entry.name.chars().count();
        if name_len == 0 || name_len > MAX_COLOR_NAME_LEN {
            return Err(SourceError::Parse(format!(
                "{role} color name must be 1-{MAX_COLOR_NAME_LEN} characters"
            )));
        }
        if !entry.hex.starts_with('#') {
            return Err(SourceError::Parse(format!(
                "{role} hex {:?} must start with '#'",
                entry.hex
            )));
        }
        let hex = Srgb::from_hex(&entry.hex)
            .map_err(|e| SourceError::Parse(e.to_string()))?
            .to_hex();
        let lch = hex_to_oklch(&hex).map_err(|e| SourceError::Parse(e.to_string()))?;
        by_role.insert(
            role,
            BrandColor {
                name: entry.name,
                hex,
                oklch_l: lch.l,
                oklch_c: lch.c,
                oklch_h: lch.h,
                role,
            },
        );
    }

    let mut take = |role: ColorRole| {
        by_role
            .remove(&role)
            .ok_or_else(|| SourceError::Parse(format!("missing {role} color")))
    };

    Ok(BrandPalette {
        primary: take(ColorRole::Primary)?,
        secondary: take(ColorRole::Secondary)?,
        accent: take(ColorRole::Accent)?,
        neutral_light: take(ColorRole::NeutralLight)?,
        neutral_dark: take(ColorRole::NeutralDark)?,
    })
}

/// Where a palette came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PaletteOrigin {
    External { source: String },
    Deterministic { fallback_reason: Option<SourceError> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPalette {
    pub palette: BrandPalette,
    pub origin: PaletteOrigin,
}

/// Two-stage palette generation.
///
/// The breaker opens after `failure_threshold` consecutive failures. Once
/// `reset_after_ms` has passed one trial call goes through: success closes
/// the breaker, failure re-opens it for another cooldown.
pub struct PaletteGenerator {
    source: Option<Arc<dyn PaletteSource>>,
    config: SourceConfig,
    consecutive_failures: AtomicU32,
    opened_at: Mutex<Option<Instant>>,
}

impl PaletteGenerator {
    /// Deterministic generation only.
    pub fn deterministic() -> Self {
        Self {
            source: None,
            config: SourceConfig::default(),
            consecutive_failures: AtomicU32::new(0),
            opened_at: Mutex::new(None),
        }
    }

    pub fn with_source(source: Arc<dyn PaletteSource>, config: SourceConfig) -> Self {
        Self {
            source: Some(source),
            config,
            consecutive_failures: AtomicU32::new(0),
            opened_at: Mutex::new(None),
        }
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures.load(Ordering::SeqCst)
    }

    pub fn generate(&self, industry: &str, mood: &str, name: &str) -> GeneratedPalette {
        let source = match (&self.source, self.config.enabled) {
            (Some(source), true) => source,
            _ => return Self::fallback(industry, mood, name, None),
        };

        if let Err(open) = self.admit() {
            debug!(source = source.name(), error = %open, "palette source circuit open");
            return Self::fallback(industry, mood, name, Some(open));
        }

        let request = PaletteRequest::new(industry, mood, name);
        match self.call_with_timeout(Arc::clone(source), request) {
            Ok(palette) => {
                self.record_success();
                GeneratedPalette {
                    palette,
                    origin: PaletteOrigin::External {
                        source: source.name().to_string(),
                    },
                }
            }
            Err(err) => {
                let failures = self.record_failure();
                warn!(
                    source = source.name(),
                    failures,
                    error = %err,
                    "palette source failed, using deterministic palette"
                );
                Self::fallback(industry, mood, name, Some(err))
            }
        }
    }

    /// Decides whether the source may be called. While the breaker is open
    /// only the first caller after the cooldown gets through.
    fn admit(&self) -> Result<(), SourceError> {
        let failures = self.consecutive_failures();
        if failures < self.config.failure_threshold {
            return Ok(());
        }

        let cooldown = Duration::from_millis(self.config.reset_after_ms);
        let mut opened_at = self.opened_at.lock().unwrap_or_else(PoisonError::into_inner);
        match *opened_at {
            Some(at) if at.elapsed() < cooldown => Err(SourceError::CircuitOpen(failures)),
            _ => {
                // Re-arm so concurrent callers stay out while the trial runs.
                *opened_at = Some(Instant::now());
                debug!(failures, "palette source circuit half-open, trying once");
                Ok(())
            }
        }
    }

    fn record_success(&self) {
        self.consecutive_failures.store(0, Ordering::SeqCst);
        *self.opened_at.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn record_failure(&self) -> u32 {
        let failures = self.consecutive_failures.fetch_add(1, Ordering::SeqCst) + 1;
        if failures >= self.config.failure_threshold {
            *self.opened_at.lock().unwrap_or_else(PoisonError::into_inner) = Some(Instant::now());
        }
        failures
    }

    fn call_with_timeout(
        &self,
        source: Arc<dyn PaletteSource>,
        request: PaletteRequest,
    ) -> Result<BrandPalette, SourceError> {
        let timeout_ms = self.config.timeout_ms;
        let (tx, rx) = mpsc::channel();

        thread::Builder::new()
            .name("palette-source".to_string())
            .spawn(move || {
                // The receiver is gone if we already timed out.
                let _ = tx.send(source.generate(&request));
            })
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;

        match rx.recv_timeout(Duration::from_millis(timeout_ms)) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => Err(SourceError::Timeout(timeout_ms)),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(SourceError::Unavailable(
                "palette source worker exited without a reply".to_string(),
            )),
        }
    }

    fn fallback(
        industry: &str,
        mood: &str,
        name: &str,
        reason: Option<SourceError>,
    ) -> GeneratedPalette {
        GeneratedPalette {
            palette: palette::generate(industry, mood, name),
            origin: PaletteOrigin::Deterministic { fallback_reason: reason },
        }
    }
}

impl Default for PaletteGenerator {
    fn default() -> Self {
        Self::deterministic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    const REPLY: &str = r##"{"colors": [
        {"name": "Deep Blue", "hex": "#1A56DB", "purpose": "primary", "psychology": "Trust"},
        {"name": "Slate", "hex": "#64748b", "purpose": "secondary"},
        {"name": "Amber", "hex": "#f59e0b", "purpose": "accent"},
        {"name": "Snow", "hex": "#f8fafc", "purpose": "neutral-light"},
        {"name": "Ink", "hex": "#0f172a", "purpose": "neutral-dark"}
    ]}"##;

    struct Fixed(Result<&'static str, SourceError>);

    impl PaletteSource for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn generate(&self, _request: &PaletteRequest) -> Result<BrandPalette, SourceError> {
            match &self.0 {
                Ok(text) => parse_palette_reply(text),
                Err(e) => Err(e.clone()),
            }
        }
    }

    struct Counting {
        calls: AtomicUsize,
        error: SourceError,
    }

    impl PaletteSource for Counting {
        fn name(&self) -> &str {
            "counting"
        }

        fn generate(&self, _request: &PaletteRequest) -> Result<BrandPalette, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(self.error.clone())
        }
    }

    /// Fails the first `failures` calls, then answers with `REPLY`.
    struct Flaky {
        calls: AtomicUsize,
        failures: usize,
    }

    impl PaletteSource for Flaky {
        fn name(&self) -> &str {
            "flaky"
        }

        fn generate(&self, _request: &PaletteRequest) -> Result<BrandPalette, SourceError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) < self.failures {
                Err(SourceError::Network("connection reset".to_string()))
            } else {
                parse_palette_reply(REPLY)
            }
        }
    }

    struct Slow;

    impl PaletteSource for Slow {
        fn name(&self) -> &str {
            "slow"
        }

        fn generate(&self, _request: &PaletteRequest) -> Result<BrandPalette, SourceError> {
            thread::sleep(Duration::from_millis(500));
            parse_palette_reply(REPLY)
        }
    }

    fn config(timeout_ms: u64, failure_threshold: u32) -> SourceConfig {
        SourceConfig {
            enabled: true,
            timeout_ms,
            failure_threshold,
            reset_after_ms: 60_000,
        }
    }

    #[test]
    fn parses_reply_into_roles() {
        let palette = parse_palette_reply(REPLY).unwrap();
        assert_eq!(palette.primary.name, "Deep Blue");
        assert_eq!(palette.primary.hex, "#1a56db");
        assert_eq!(palette.neutral_dark.role, ColorRole::NeutralDark);
        assert!(palette.neutral_light.oklch_l > 0.9);
    }

    #[test]
    fn reply_missing_role_is_rejected() {
        let text =
            r##"{"colors": [{"name": "Deep Blue", "hex": "#1a56db", "purpose": "primary"}]}"##;
        let err = parse_palette_reply(text).unwrap_err();
        assert!(matches!(err, SourceError::Parse(ref m) if m.contains("secondary")), "{err}");
    }

    #[test]
    fn reply_with_bad_hex_or_role_is_rejected() {
        let bad_hex = REPLY.replace("#f59e0b", "#f59e0");
        assert!(matches!(parse_palette_reply(&bad_hex), Err(SourceError::Parse(_))));
        let bad_role = REPLY.replace("\"accent\"", "\"highlight\"");
        assert!(matches!(parse_palette_reply(&bad_role), Err(SourceError::Parse(_))));
        assert!(matches!(parse_palette_reply("```json"), Err(SourceError::Parse(_))));
    }

    #[test]
    fn reply_hex_without_hash_is_rejected() {
        let bare = REPLY.replace("\"#1A56DB\"", "\"1A56DB\"");
        let err = parse_palette_reply(&bare).unwrap_err();
        assert!(matches!(err, SourceError::Parse(ref m) if m.contains("primary")), "{err}");
    }

    #[test]
    fn reply_hex_is_stored_lowercase_with_hash() {
        let palette = parse_palette_reply(REPLY).unwrap();
        for color in palette.all_colors() {
            assert!(color.hex.starts_with('#'), "{}", color.hex);
            assert_eq!(color.hex.len(), 7);
            assert_eq!(color.hex, color.hex.to_lowercase());
        }
    }

    #[test]
    fn reply_color_name_length_is_bounded() {
        let empty = REPLY.replace("\"Deep Blue\"", "\"\"");
        assert!(matches!(parse_palette_reply(&empty), Err(SourceError::Parse(_))));

        let long_name = "B".repeat(MAX_COLOR_NAME_LEN + 1);
        let long = REPLY.replace("Deep Blue", &long_name);
        assert!(matches!(parse_palette_reply(&long), Err(SourceError::Parse(_))));

        let longest = REPLY.replace("Deep Blue", &"B".repeat(MAX_COLOR_NAME_LEN));
        assert!(parse_palette_reply(&longest).is_ok());
    }

    #[test]
    fn rejected_reply_falls_back() {
        struct Bare;

        impl PaletteSource for Bare {
            fn name(&self) -> &str {
                "bare"
            }

            fn generate(&self, _request: &PaletteRequest) -> Result<BrandPalette, SourceError> {
                parse_palette_reply(&REPLY.replace("\"#1A56DB\"", "\"1A56DB\""))
            }
        }

        let generator = PaletteGenerator::with_source(Arc::new(Bare), config(1_000, 3));
        let generated = generator.generate("technology", "modern", "Test");
        assert_eq!(generated.palette, palette::generate("technology", "modern", "Test"));
        assert!(matches!(
            generated.origin,
            PaletteOrigin::Deterministic { fallback_reason: Some(SourceError::Parse(_)) }
        ));
    }

    #[test]
    fn prompt_mentions_brief() {
        let prompt = PaletteRequest::new("food", "warm", "Crumb").prompt();
        assert!(prompt.contains("Name: Crumb"));
        assert!(prompt.contains("Industry: food"));
        assert!(prompt.contains("neutral-dark"));
    }

    #[test]
    fn no_source_is_deterministic() {
        let generated = PaletteGenerator::deterministic().generate("technology", "modern", "Test");
        assert_eq!(generated.palette, palette::generate("technology", "modern", "Test"));
        assert_eq!(
            generated.origin,
            PaletteOrigin::Deterministic { fallback_reason: None }
        );
    }

    #[test]
    fn external_success_is_used() {
        let generator = PaletteGenerator::with_source(Arc::new(Fixed(Ok(REPLY))), config(1_000, 3));
        let generated = generator.generate("technology", "modern", "Test");
        assert_eq!(generated.palette.primary.name, "Deep Blue");
        assert_eq!(
            generated.origin,
            PaletteOrigin::External { source: "fixed".to_string() }
        );
    }

    #[test]
    fn every_failure_kind_falls_back() {
        let kinds = [
            SourceError::Network("connection refused".to_string()),
            SourceError::Parse("not json".to_string()),
            SourceError::Unavailable("no api key".to_string()),
        ];
        let expected = palette::generate("health", "calm", "Clinic");
        for kind in kinds {
            let generator =
                PaletteGenerator::with_source(Arc::new(Fixed(Err(kind.clone()))), config(1_000, 3));
            let generated = generator.generate("health", "calm", "Clinic");
            assert_eq!(generated.palette, expected);
            assert_eq!(
                generated.origin,
                PaletteOrigin::Deterministic { fallback_reason: Some(kind) }
            );
        }
    }

    #[test]
    fn slow_source_times_out() {
        let generator = PaletteGenerator::with_source(Arc::new(Slow), config(20, 3));
        let generated = generator.generate("technology", "modern", "Test");
        assert_eq!(
            generated.origin,
            PaletteOrigin::Deterministic { fallback_reason: Some(SourceError::Timeout(20)) }
        );
        assert_eq!(generated.palette, palette::generate("technology", "modern", "Test"));
    }

    #[test]
    fn breaker_opens_after_threshold() {
        let source = Arc::new(Counting {
            calls: AtomicUsize::new(0),
            error: SourceError::Network("down".to_string()),
        });
        let generator = PaletteGenerator::with_source(source.clone(), config(1_000, 2));

        generator.generate("technology", "modern", "A");
        generator.generate("technology", "modern", "B");
        let third = generator.generate("technology", "modern", "C");

        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert_eq!(generator.consecutive_failures(), 2);
        assert_eq!(
            third.origin,
            PaletteOrigin::Deterministic { fallback_reason: Some(SourceError::CircuitOpen(2)) }
        );
    }

    #[test]
    fn breaker_closes_after_cooldown_and_recovery() {
        let source = Arc::new(Flaky {
            calls: AtomicUsize::new(0),
            failures: 2,
        });
        let mut cfg = config(1_000, 2);
        cfg.reset_after_ms = 100;
        let generator = PaletteGenerator::with_source(source.clone(), cfg);

        generator.generate("technology", "modern", "A");
        generator.generate("technology", "modern", "B");
        let open = generator.generate("technology", "modern", "C");
        assert_eq!(
            open.origin,
            PaletteOrigin::Deterministic { fallback_reason: Some(SourceError::CircuitOpen(2)) }
        );
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);

        thread::sleep(Duration::from_millis(150));

        let trial = generator.generate("technology", "modern", "D");
        assert_eq!(trial.origin, PaletteOrigin::External { source: "flaky".to_string() });
        assert_eq!(generator.consecutive_failures(), 0);

        let next = generator.generate("technology", "modern", "E");
        assert_eq!(next.origin, PaletteOrigin::External { source: "flaky".to_string() });
        assert_eq!(source.calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn failed_trial_reopens_breaker() {
        let source = Arc::new(Counting {
            calls: AtomicUsize::new(0),
            error: SourceError::Network("down".to_string()),
        });
        let mut cfg = config(1_000, 2);
        cfg.reset_after_ms = 100;
        let generator = PaletteGenerator::with_source(source.clone(), cfg);

        generator.generate("technology", "modern", "A");
        generator.generate("technology", "modern", "B");
        thread::sleep(Duration::from_millis(150));

        let trial = generator.generate("technology", "modern", "C");
        assert!(matches!(
            trial.origin,
            PaletteOrigin::Deterministic { fallback_reason: Some(SourceError::Network(_)) }
        ));
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);

        let after = generator.generate("technology", "modern", "D");
        assert_eq!(
            after.origin,
            PaletteOrigin::Deterministic { fallback_reason: Some(SourceError::CircuitOpen(3)) }
        );
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn disabled_source_is_skipped() {
        let source = Arc::new(Counting {
            calls: AtomicUsize::new(0),
            error: SourceError::Network("down".to_string()),
        });
        let mut cfg = config(1_000, 3);
        cfg.enabled = false;
        let generator = PaletteGenerator::with_source(source.clone(), cfg);
        generator.generate("technology", "modern", "A");
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }
}
