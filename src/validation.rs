//! Validation System - Rule/Policy Separation
//!
//! Rules produce structured violations.
//! Policy maps violations to actions.

use serde::{Deserialize, Serialize};

use crate::brand::{BrandInput, BrandPalette};
use crate::config::FailureMode;
use crate::palette::{self, REPAIR_BACKGROUND, WCAG_AA_NORMAL};

pub const MAX_NAME_CHARS: usize = 100;
pub const MAX_TAGLINE_CHARS: usize = 200;
pub const MAX_CONTACT_FIELD_CHARS: usize = 100;
pub const MAX_PHONE_CHARS: usize = 30;
pub const MAX_DOMAIN_CHARS: usize = 253;
pub const MAX_DESCRIPTION_CHARS: usize = 1000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationViolation {
    pub rule: String,
    pub severity: ViolationSeverity,
    pub message: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub remediation: Vec<String>,
}

impl ValidationViolation {
    fn new(rule: &str, severity: ViolationSeverity, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            severity,
            message: message.into(),
            expected: None,
            actual: None,
            remediation: vec![],
        }
    }

    fn expected(mut self, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self.actual = Some(actual.into());
        self
    }

    fn remedy(mut self, remediation: impl Into<String>) -> Self {
        self.remediation.push(remediation.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<ValidationViolation>,
}

impl ValidationResult {
    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(|v| v.severity == ViolationSeverity::Error)
    }
}

/// Validation rule trait - produces violations
pub trait ValidationRule {
    fn name(&self) -> &'static str;
    fn validate(&self, input: &BrandInput) -> Vec<ValidationViolation>;
}

fn too_long(rule: &str, field: &str, value: &str, max: usize) -> Option<ValidationViolation> {
    let len = value.chars().count();
    (len > max).then(|| {
        ValidationViolation::new(rule, ViolationSeverity::Error, format!("{field} is too long"))
            .expected(format!("at most {max} characters"), format!("{len} characters"))
            .remedy(format!("Shorten the {field}"))
    })
}

// --- Concrete Rules ---

pub struct NameRule;

impl ValidationRule for NameRule {
    fn name(&self) -> &'static str { "name" }

    fn validate(&self, input: &BrandInput) -> Vec<ValidationViolation> {
        if input.name.trim().is_empty() {
            return vec![
                ValidationViolation::new(
                    self.name(),
                    ViolationSeverity::Error,
                    "Brand name is required",
                )
                .remedy("Provide a project or company name"),
            ];
        }
        too_long(self.name(), "name", &input.name, MAX_NAME_CHARS)
            .into_iter()
            .collect()
    }
}

pub struct CopyLengthRule;

impl ValidationRule for CopyLengthRule {
    fn name(&self) -> &'static str { "copy_length" }

    fn validate(&self, input: &BrandInput) -> Vec<ValidationViolation> {
        [
            too_long(self.name(), "tagline", &input.tagline, MAX_TAGLINE_CHARS),
            too_long(self.name(), "description", &input.description, MAX_DESCRIPTION_CHARS),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

pub struct ContactRule;

impl ValidationRule for ContactRule {
    fn name(&self) -> &'static str { "contact" }

    fn validate(&self, input: &BrandInput) -> Vec<ValidationViolation> {
        let contact = &input.contact;
        let mut violations: Vec<_> = [
            too_long(self.name(), "contact name", &contact.name, MAX_CONTACT_FIELD_CHARS),
            too_long(self.name(), "contact title", &contact.title, MAX_CONTACT_FIELD_CHARS),
            too_long(self.name(), "phone number", &contact.phone, MAX_PHONE_CHARS),
        ]
        .into_iter()
        .flatten()
        .collect();

        if !contact.email.is_empty() && !contact.email.contains('@') {
            violations.push(
                ValidationViolation::new(
                    self.name(),
                    ViolationSeverity::Error,
                    "Invalid email format",
                )
                .expected("an address containing '@'", contact.email.clone())
                .remedy("Correct or remove the contact email"),
            );
        }
        violations
    }
}

pub struct DomainRule;

impl ValidationRule for DomainRule {
    fn name(&self) -> &'static str { "domain" }

    fn validate(&self, input: &BrandInput) -> Vec<ValidationViolation> {
        let domain = &input.domain;
        let mut violations: Vec<_> = too_long(self.name(), "domain", domain, MAX_DOMAIN_CHARS)
            .into_iter()
            .collect();

        if domain.chars().any(|c| !(c.is_ascii_alphanumeric() || c == '.' || c == '-')) {
            violations.push(
                ValidationViolation::new(
                    self.name(),
                    ViolationSeverity::Error,
                    "Domain contains invalid characters",
                )
                .expected("letters, digits, '.' and '-'", domain.clone())
                .remedy("Use the bare domain, e.g. acme.com"),
            );
        }
        violations
    }
}

/// Reports categories the palette engine will silently default.
pub struct CategoryRule;

impl ValidationRule for CategoryRule {
    fn name(&self) -> &'static str { "category" }

    fn validate(&self, input: &BrandInput) -> Vec<ValidationViolation> {
        let mut violations = vec![];
        if !palette::is_known_industry(&input.industry) {
            violations.push(
                ValidationViolation::new(
                    self.name(),
                    ViolationSeverity::Info,
                    "Unrecognized industry; the default hue will be used",
                )
                .expected("a supported industry", input.industry.clone()),
            );
        }
        if !palette::is_known_mood(&input.mood) {
            violations.push(
                ValidationViolation::new(
                    self.name(),
                    ViolationSeverity::Info,
                    "Unrecognized mood; the modern adjustment will be used",
                )
                .expected("a supported mood", input.mood.clone()),
            );
        }
        violations
    }
}

/// Validator orchestrates rules and applies policy
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule + Send + Sync>>,
    failure_mode: FailureMode,
}

impl Validator {
    pub fn new(failure_mode: FailureMode) -> Self {
        Self {
            rules: vec![
                Box::new(NameRule),
                Box::new(CopyLengthRule),
                Box::new(ContactRule),
                Box::new(DomainRule),
                Box::new(CategoryRule),
            ],
            failure_mode,
        }
    }

    pub fn validate(&self, input: &BrandInput) -> ValidationResult {
        let all_violations: Vec<_> = self
            .rules
            .iter()
            .flat_map(|rule| rule.validate(input))
            .collect();

        match self.failure_mode {
            FailureMode::Block => {
                // Warnings don't block and aren't reported; info is kept.
                let kept: Vec<_> = all_violations
                    .into_iter()
                    .filter(|v| v.severity != ViolationSeverity::Warning)
                    .collect();
                let valid = !kept.iter().any(|v| v.severity == ViolationSeverity::Error);
                ValidationResult { valid, violations: kept }
            }
            FailureMode::Warn | FailureMode::Log => ValidationResult {
                valid: true,
                violations: all_violations,
            },
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(FailureMode::default())
    }
}

/// Checks a finished palette: primary legibility on white and neutral bounds.
pub fn audit_palette(palette: &BrandPalette) -> Vec<ValidationViolation> {
    let mut violations = vec![];

    match palette::check_contrast(&palette.primary.hex, REPAIR_BACKGROUND) {
        Ok(ratio) if ratio < WCAG_AA_NORMAL => violations.push(
            ValidationViolation::new(
                "primary_contrast",
                ViolationSeverity::Warning,
                "Primary color fails WCAG AA on white",
            )
            .expected(format!("{WCAG_AA_NORMAL:.1}:1"), format!("{ratio:.2}:1"))
            .remedy("Avoid the primary color for body text on white"),
        ),
        Ok(_) => {}
        Err(e) => violations.push(ValidationViolation::new(
            "primary_contrast",
            ViolationSeverity::Error,
            e.to_string(),
        )),
    }

    if palette.neutral_light.oklch_l <= 0.9 {
        violations.push(
            ValidationViolation::new(
                "neutral_bounds",
                ViolationSeverity::Error,
                "Neutral light is not light",
            )
            .expected("L > 0.9", format!("L = {:.3}", palette.neutral_light.oklch_l)),
        );
    }
    if palette.neutral_dark.oklch_l >= 0.3 {
        violations.push(
            ValidationViolation::new(
                "neutral_bounds",
                ViolationSeverity::Error,
                "Neutral dark is not dark",
            )
            .expected("L < 0.3", format!("L = {:.3}", palette.neutral_dark.oklch_l)),
        );
    }

    violations
}
