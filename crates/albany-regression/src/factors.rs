//! Fama-French factor universe and factor selection.
//!
//! The universe is fixed: `Mkt-RF`, `SMB`, `HML`, `RMW`, `CMA` and `Mom`.
//! A [`FactorSelection`] toggles each factor independently and always
//! iterates in universe order, so regression output columns are stable.

use crate::error::RegressionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A factor from the five-factor model plus momentum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FamaFrenchFactor {
    /// Market excess return
    #[serde(rename = "Mkt-RF")]
    MarketExcess,
    /// Small minus big
    #[serde(rename = "SMB")]
    Smb,
    /// High minus low (value)
    #[serde(rename = "HML")]
    Hml,
    /// Robust minus weak (profitability)
    #[serde(rename = "RMW")]
    Rmw,
    /// Conservative minus aggressive (investment)
    #[serde(rename = "CMA")]
    Cma,
    /// Momentum
    #[serde(rename = "Mom")]
    Momentum,
}

impl FamaFrenchFactor {
    /// Number of factors in the universe
    pub const COUNT: usize = 6;

    /// The universe in canonical order
    pub const ALL: [Self; Self::COUNT] = [
        Self::MarketExcess,
        Self::Smb,
        Self::Hml,
        Self::Rmw,
        Self::Cma,
        Self::Momentum,
    ];

    /// Panel column name for this factor
    pub const fn column_name(&self) -> &'static str {
        match self {
            Self::MarketExcess => "Mkt-RF",
            Self::Smb => "SMB",
            Self::Hml => "HML",
            Self::Rmw => "RMW",
            Self::Cma => "CMA",
            Self::Momentum => "Mom",
        }
    }

    /// Short description
    pub const fn description(&self) -> &'static str {
        match self {
            Self::MarketExcess => "Market return minus the risk-free rate",
            Self::Smb => "Small minus big (size)",
            Self::Hml => "High minus low book-to-market (value)",
            Self::Rmw => "Robust minus weak operating profitability",
            Self::Cma => "Conservative minus aggressive investment",
            Self::Momentum => "Prior winners minus prior losers",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FamaFrenchFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for FamaFrenchFactor {
    type Err = RegressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mkt-rf" | "mkt" | "market" => Ok(Self::MarketExcess),
            "smb" => Ok(Self::Smb),
            "hml" => Ok(Self::Hml),
            "rmw" => Ok(Self::Rmw),
            "cma" => Ok(Self::Cma),
            "mom" | "momentum" => Ok(Self::Momentum),
            other => Err(RegressionError::InvalidParameter(format!(
                "unknown factor '{other}'"
            ))),
        }
    }
}

/// Independent on/off toggles over the factor universe.
///
/// Serializes as the list of selected factor names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<FamaFrenchFactor>", into = "Vec<FamaFrenchFactor>")]
pub struct FactorSelection {
    selected: [bool; FamaFrenchFactor::COUNT],
}

impl Default for FactorSelection {
    /// Size and value, the default exposures of the cap-vs-equal-weight study.
    fn default() -> Self {
        Self::none()
            .with(FamaFrenchFactor::Smb)
            .with(FamaFrenchFactor::Hml)
    }
}

impl FactorSelection {
    /// No factors (intercept-only regression)
    pub const fn none() -> Self {
        Self {
            selected: [false; FamaFrenchFactor::COUNT],
        }
    }

    /// Every factor in the universe
    pub const fn all() -> Self {
        Self {
            selected: [true; FamaFrenchFactor::COUNT],
        }
    }

    /// Toggle a factor on
    pub const fn with(mut self, factor: FamaFrenchFactor) -> Self {
        self.selected[factor.index()] = true;
        self
    }

    /// Toggle a factor off
    pub const fn without(mut self, factor: FamaFrenchFactor) -> Self {
        self.selected[factor.index()] = false;
        self
    }

    /// Set a factor's toggle
    pub const fn set(&mut self, factor: FamaFrenchFactor, include: bool) {
        self.selected[factor.index()] = include;
    }

    /// Whether a factor is selected
    pub const fn contains(&self, factor: FamaFrenchFactor) -> bool {
        self.selected[factor.index()]
    }

    /// Selected factors in universe order
    pub fn iter(&self) -> impl Iterator<Item = FamaFrenchFactor> + '_ {
        FamaFrenchFactor::ALL
            .into_iter()
            .filter(|f| self.contains(*f))
    }

    /// Number of selected factors
    pub fn len(&self) -> usize {
        self.selected.iter().filter(|s| **s).count()
    }

    /// Whether no factor is selected
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Panel column names of the selected factors, in universe order
    pub fn column_names(&self) -> Vec<&'static str> {
        self.iter().map(|f| f.column_name()).collect()
    }
}

impl From<Vec<FamaFrenchFactor>> for FactorSelection {
    fn from(factors: Vec<FamaFrenchFactor>) -> Self {
        factors.into_iter().fold(Self::none(), Self::with)
    }
}

impl From<FactorSelection> for Vec<FamaFrenchFactor> {
    fn from(selection: FactorSelection) -> Self {
        selection.iter().collect()
    }
}

impl FromIterator<FamaFrenchFactor> for FactorSelection {
    fn from_iter<I: IntoIterator<Item = FamaFrenchFactor>>(iter: I) -> Self {
        iter.into_iter().fold(Self::none(), Self::with)
    }
}

impl FromStr for FactorSelection {
    type Err = RegressionError;

    /// Parse a comma-separated list such as `"SMB,HML"`.
    ///
    /// `"none"` or an empty string selects nothing; `"all"` selects the
    /// whole universe.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => return Ok(Self::none()),
            "all" => return Ok(Self::all()),
            _ => {}
        }
        s.split(',')
            .filter(|part| !part.trim().is_empty())
            .map(FamaFrenchFactor::from_str)
            .collect()
    }
}

impl fmt::Display for FactorSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        f.write_str(&self.column_names().join(","))
    }
}
