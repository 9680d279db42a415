//! Color Model - sRGB, OKLab and OKLCH
//!
//! Every hex code the engine emits is derived from an OKLCH triple through
//! [`Oklch::to_srgb_fitted`]. Out-of-gamut colors are mapped back into the
//! sRGB cube by reducing chroma, never by clipping channels independently.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Just-noticeable difference in OKLab units used by gamut fitting.
const FIT_JND: f64 = 0.02;
/// Chroma resolution of the fitting search.
const FIT_EPSILON: f64 = 0.0001;
/// Tolerance for floating-point noise at the edges of the sRGB cube.
const GAMUT_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("Invalid hex color: {0:?} (expected six hex digits, optionally prefixed by '#')")]
    InvalidHex(String),
}

/// Gamma-encoded sRGB, components nominally in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Linear-light RGB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OkLab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

/// Cylindrical OKLab. Hue is in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oklch {
    pub l: f64,
    pub c: f64,
    pub h: f64,
}

impl Srgb {
    pub const WHITE: Srgb = Srgb { r: 1.0, g: 1.0, b: 1.0 };
    pub const BLACK: Srgb = Srgb { r: 0.0, g: 0.0, b: 0.0 };

    /// Parses `#rrggbb` or `rrggbb` (case insensitive).
    pub fn from_hex(hex: &str) -> Result<Srgb, ColorError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidHex(hex.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map(|v| v as f64 / 255.0)
                .map_err(|_| ColorError::InvalidHex(hex.to_string()))
        };
        Ok(Srgb {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Quantizes to 8 bits per channel.
    pub fn to_rgb8(self) -> (u8, u8, u8) {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        (q(self.r), q(self.g), q(self.b))
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        let (r, g, b) = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    pub fn in_gamut(self) -> bool {
        let ok = |c: f64| (-GAMUT_EPSILON..=1.0 + GAMUT_EPSILON).contains(&c);
        ok(self.r) && ok(self.g) && ok(self.b)
    }

    pub fn clip(self) -> Srgb {
        Srgb {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
        }
    }

    /// WCAG 2 relative luminance.
    pub fn relative_luminance(self) -> f64 {
        let lin = srgb_to_linear(self.clip());
        0.2126 * lin.r + 0.7152 * lin.g + 0.0722 * lin.b
    }
}

impl Oklch {
    pub fn new(l: f64, c: f64, h: f64) -> Self {
        Self { l, c, h }
    }

    pub fn from_srgb(c: Srgb) -> Self {
        oklab_to_oklch(linear_to_oklab(srgb_to_linear(c)))
    }

    /// Raw conversion; the result may lie outside the sRGB cube.
    pub fn to_srgb_unbounded(self) -> Srgb {
        linear_to_srgb(oklab_to_linear(oklch_to_oklab(self)))
    }

    /// Converts to sRGB, fitting out-of-gamut colors into the cube.
    ///
    /// Lightness and hue are held; chroma is binary-searched down until the
    /// clipped candidate is within [`FIT_JND`] of the unclipped one.
    pub fn to_srgb_fitted(self) -> Srgb {
        if self.l >= 1.0 {
            return Srgb::WHITE;
        }
        if self.l <= 0.0 {
            return Srgb::BLACK;
        }

        let direct = self.to_srgb_unbounded();
        if direct.in_gamut() {
            return direct.clip();
        }

        let clipped = direct.clip();
        if delta_e_ok(oklch_to_oklab(self), srgb_to_oklab(clipped)) < FIT_JND {
            return clipped;
        }

        let mut lo = 0.0;
        let mut hi = self.c;
        let mut min_in_gamut = true;
        let mut current = direct;

        while hi - lo > FIT_EPSILON {
            let chroma = (lo + hi) / 2.0;
            let candidate = Oklch { c: chroma, ..self };
            current = candidate.to_srgb_unbounded();

            if min_in_gamut && current.in_gamut() {
                lo = chroma;
                continue;
            }

            let clipped = current.clip();
            let error = delta_e_ok(oklch_to_oklab(candidate), srgb_to_oklab(clipped));
            if error < FIT_JND {
                if FIT_JND - error < FIT_EPSILON {
                    return clipped;
                }
                min_in_gamut = false;
                lo = chroma;
            } else {
                hi = chroma;
            }
        }

        current.clip()
    }
}

fn srgb_component_to_linear(c: f64) -> f64 {
    let a = c.abs();
    let v = if a <= 0.04045 {
        a / 12.92
    } else {
        ((a + 0.055) / 1.055).powf(2.4)
    };
    v.copysign(c)
}

fn linear_component_to_srgb(c: f64) -> f64 {
    let a = c.abs();
    let v = if a <= 0.0031308 {
        a * 12.92
    } else {
        1.055 * a.powf(1.0 / 2.4) - 0.055
    };
    v.copysign(c)
}

pub fn srgb_to_linear(c: Srgb) -> LinearRgb {
    LinearRgb {
        r: srgb_component_to_linear(c.r),
        g: srgb_component_to_linear(c.g),
        b: srgb_component_to_linear(c.b),
    }
}

pub fn linear_to_srgb(c: LinearRgb) -> Srgb {
    Srgb {
        r: linear_component_to_srgb(c.r),
        g: linear_component_to_srgb(c.g),
        b: linear_component_to_srgb(c.b),
    }
}

pub fn linear_to_oklab(c: LinearRgb) -> OkLab {
    let l = (0.4122214708 * c.r + 0.5363325363 * c.g + 0.0514459929 * c.b).cbrt();
    let m = (0.2119034982 * c.r + 0.6806995451 * c.g + 0.1073969566 * c.b).cbrt();
    let s = (0.0883024619 * c.r + 0.2817188376 * c.g + 0.6299787005 * c.b).cbrt();

    OkLab {
        l: 0.2104542553 * l + 0.7936177850 * m - 0.0040720468 * s,
        a: 1.9779984951 * l - 2.4285922050 * m + 0.4505937099 * s,
        b: 0.0259040371 * l + 0.7827717662 * m - 0.8086757660 * s,
    }
}

pub fn oklab_to_linear(c: OkLab) -> LinearRgb {
    let l = c.l + 0.3963377774 * c.a + 0.2158037573 * c.b;
    let m = c.l - 0.1055613458 * c.a - 0.0638541728 * c.b;
    let s = c.l - 0.0894841775 * c.a - 1.2914855480 * c.b;

    let (l, m, s) = (l * l * l, m * m * m, s * s * s);

    LinearRgb {
        r: 4.0767416621 * l - 3.3077115913 * m + 0.2309699292 * s,
        g: -1.2684380046 * l + 2.6097574011 * m - 0.3413193965 * s,
        b: -0.0041960863 * l - 0.7034186147 * m + 1.7076147010 * s,
    }
}

/// Achromatic colors get hue 0 instead of an indeterminate `atan2(0, 0)`.
pub fn oklab_to_oklch(c: OkLab) -> Oklch {
    let chroma = (c.a * c.a + c.b * c.b).sqrt();
    let h = if chroma < 1e-10 {
        0.0
    } else {
        c.b.atan2(c.a).to_degrees().rem_euclid(360.0)
    };
    Oklch { l: c.l, c: chroma, h }
}

pub fn oklch_to_oklab(c: Oklch) -> OkLab {
    let h = c.h.to_radians();
    OkLab {
        l: c.l,
        a: c.c * h.cos(),
        b: c.c * h.sin(),
    }
}

fn srgb_to_oklab(c: Srgb) -> OkLab {
    linear_to_oklab(srgb_to_linear(c))
}

/// Euclidean distance in OKLab.
pub fn delta_e_ok(a: OkLab, b: OkLab) -> f64 {
    ((a.l - b.l).powi(2) + (a.a - b.a).powi(2) + (a.b - b.b).powi(2)).sqrt()
}

/// WCAG 2 contrast ratio, always >= 1.0.
pub fn contrast_ratio(a: Srgb, b: Srgb) -> f64 {
    let la = a.relative_luminance();
    let lb = b.relative_luminance();
    let (hi, lo) = if la >= lb { (la, lb) } else { (lb, la) };
    (hi + 0.05) / (lo + 0.05)
}
