//! TheNine Core - Brand Identity Engine
//!
//! # Guarantees
//! 1. Same brief, same palette
//! 2. Every palette has all five roles
//! 3. Every hex is a displayable sRGB color
//! 4. The primary is repaired toward WCAG AA on white
//! 5. External sources are optional; the deterministic path always answers

pub mod color;
pub mod brand;
pub mod hashing;
pub mod palette;
pub mod source;
pub mod typography;
pub mod tokens;
pub mod validation;
pub mod config;
pub mod pipeline;

pub use brand::{
    BrandColor, BrandContact, BrandInput, BrandPalette, BrandTokens, BrandTypography, ColorRole,
    FontSpec,
};
pub use color::{ColorError, Oklch, Srgb};
pub use config::{ConfigError, EngineConfig, FailureMode, SourceConfig};
pub use hashing::{canonical_json, compute_job_hash, compute_manifest_hash, name_fingerprint};
pub use palette::{check_contrast, ensure_accessible, generate, repair_contrast, ContrastRepair};
pub use pipeline::{BrandPackage, BrandPipeline, PipelineError};
pub use source::{
    GeneratedPalette, PaletteGenerator, PaletteOrigin, PaletteRequest, PaletteSource, SourceError,
};
pub use tokens::create_tokens;
pub use typography::TypographySelector;
pub use validation::{ValidationResult, ValidationRule, ValidationViolation, ViolationSeverity};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
