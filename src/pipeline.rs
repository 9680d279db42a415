//! Brand Pipeline - Single Entry Point
//!
//! CRITICAL: build MUST call validate internally. No bypass.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::brand::{BrandInput, BrandPalette, BrandTokens, BrandTypography};
use crate::config::EngineConfig;
use crate::hashing::{compute_job_hash, compute_manifest_hash};
use crate::source::{PaletteGenerator, PaletteOrigin, PaletteSource};
use crate::tokens::create_tokens;
use crate::typography::TypographySelector;
use crate::validation::{
    audit_palette, ValidationResult, ValidationViolation, Validator, ViolationSeverity,
};
use crate::ENGINE_VERSION;

#[cfg(feature = "test-hooks")]
use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "test-hooks")]
static VALIDATION_CALL_COUNT: AtomicU32 = AtomicU32::new(0);

#[cfg(feature = "test-hooks")]
pub fn get_validation_call_count() -> u32 {
    VALIDATION_CALL_COUNT.load(Ordering::SeqCst)
}

#[cfg(feature = "test-hooks")]
pub fn reset_validation_call_count() {
    VALIDATION_CALL_COUNT.store(0, Ordering::SeqCst);
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Everything generated for one brief, plus its reproducibility manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandPackage {
    pub id: String,
    pub slug: String,
    pub engine_version: String,
    pub created_at: DateTime<Utc>,
    pub manifest_hash: String,
    pub job_hash: String,
    pub input: BrandInput,
    pub validation: ValidationResult,
    pub palette: BrandPalette,
    pub palette_origin: PaletteOrigin,
    /// Findings on the generated palette. Non-empty when the primary could
    /// not be repaired to AA contrast.
    pub palette_audit: Vec<ValidationViolation>,
    pub typography: BrandTypography,
    pub tokens: BrandTokens,
}

/// The brand pipeline - single entry point for package generation
pub struct BrandPipeline {
    palettes: PaletteGenerator,
    typography: TypographySelector,
    validator: Validator,
}

impl BrandPipeline {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            palettes: PaletteGenerator::deterministic(),
            typography: TypographySelector::new(),
            validator: Validator::new(config.failure_mode.clone()),
        }
    }

    /// Pipeline whose palettes come from `source` first.
    pub fn with_source(config: &EngineConfig, source: Arc<dyn PaletteSource>) -> Self {
        Self {
            palettes: PaletteGenerator::with_source(source, config.palette_source.clone()),
            ..Self::new(config)
        }
    }

    /// Validate a brief
    ///
    /// This is the ONLY validation entry point.
    pub fn validate_input(&self, input: &BrandInput) -> ValidationResult {
        #[cfg(feature = "test-hooks")]
        VALIDATION_CALL_COUNT.fetch_add(1, Ordering::SeqCst);

        self.validator.validate(input)
    }

    /// Build a brand package
    ///
    /// CRITICAL: This ALWAYS calls validate_input internally. No bypass possible.
    pub fn build(&self, input: &BrandInput) -> Result<BrandPackage, PipelineError> {
        let input = input.clone().normalized();

        // MANDATORY: Validation is always called. This is non-negotiable.
        let validation = self.validate_input(&input);

        if !validation.valid {
            let messages: Vec<_> = validation
                .violations
                .iter()
                .filter(|v| v.severity == ViolationSeverity::Error)
                .map(|v| format!("{}: {}", v.rule, v.message))
                .collect();
            return Err(PipelineError::ValidationFailed(messages.join("; ")));
        }

        let generated = self.palettes.generate(&input.industry, &input.mood, &input.name);
        let typography = self.typography.select(&input.industry, &input.mood, &input.name);
        let tokens = create_tokens(&generated.palette, &typography);
        let palette_audit = audit_palette(&generated.palette);

        let slug = input.slug();
        let job_hash = compute_job_hash(
            &slug,
            &input.industry,
            &input.mood,
            &input,
            ENGINE_VERSION,
        )?;

        let mut package = BrandPackage {
            id: Uuid::new_v4().to_string(),
            slug,
            engine_version: ENGINE_VERSION.to_string(),
            created_at: Utc::now(),
            manifest_hash: String::new(), // Computed after
            job_hash,
            input,
            validation,
            palette: generated.palette,
            palette_origin: generated.origin,
            palette_audit,
            typography,
            tokens,
        };

        // Compute manifest hash (includes everything)
        package.manifest_hash = compute_manifest_hash(&package)?;

        info!(
            slug = %package.slug,
            primary = %package.palette.primary.hex,
            audit_findings = package.palette_audit.len(),
            "brand package built"
        );

        Ok(package)
    }
}

impl Default for BrandPipeline {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}
