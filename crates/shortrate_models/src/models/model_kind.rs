//! Registry of supported model kinds.
//!
//! The set is closed: adding a model means adding a variant, and every
//! `match` on [`ModelKind`] is checked by the compiler.
//!
//! ## Example
//!
//! ```
//! use shortrate_models::models::{Capability, ModelKind};
//!
//! let kind: ModelKind = "hull_white_one_factor".parse().unwrap();
//! assert_eq!(kind, ModelKind::HullWhiteOneFactor);
//! assert!(kind.supports(Capability::Simulate));
//! ```

use shortrate_core::types::ValidationError;
use std::fmt;
use std::str::FromStr;

/// Broad model family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ModelFamily {
    /// Models of the instantaneous short rate.
    StochasticShortRate,
}

/// Operations a model kind supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Capability {
    /// Fit parameters to market instruments.
    Calibrate,
    /// Generate scenario paths.
    Simulate,
}

/// Supported model kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ModelKind {
    /// Hull-White one-factor (extended Vasicek).
    HullWhiteOneFactor,
}

impl ModelKind {
    /// Every registered kind.
    pub const ALL: [ModelKind; 1] = [ModelKind::HullWhiteOneFactor];

    /// Registry name.
    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::HullWhiteOneFactor => "hull_white_one_factor",
        }
    }

    /// Model family.
    pub fn family(&self) -> ModelFamily {
        match self {
            ModelKind::HullWhiteOneFactor => ModelFamily::StochasticShortRate,
        }
    }

    /// Market inputs the model needs.
    pub fn required_risk_factors(&self) -> &'static [&'static str] {
        match self {
            ModelKind::HullWhiteOneFactor => {
                &["risk_free_rate_curve", "swaption_volatility_surface"]
            }
        }
    }

    /// Supported operations.
    pub fn capabilities(&self) -> &'static [Capability] {
        match self {
            ModelKind::HullWhiteOneFactor => &[Capability::Calibrate, Capability::Simulate],
        }
    }

    /// Whether `capability` is supported.
    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModelKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ModelKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::invalid("model", format!("unknown model kind '{wanted}'")))
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Calibrate => write!(f, "calibrate"),
            Capability::Simulate => write!(f, "simulate"),
        }
    }
}
