//! Run configuration.
//!
//! [`ReorderConfig`] is plain data with serde support, so a driver can load it from JSON
//! or build it from the orchestration's `key=value` parameter strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ReorderError, ReorderResult};
use crate::metrics::DensityNormalization;
use crate::permutation::IndexBase;

/// Block sizes reported when none are requested.
pub const DEFAULT_BLOCK_SIZES: [usize; 5] = [4, 8, 16, 32, 64];

/// The ordering technique to apply to each component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderingKind {
    /// The natural order `[0, 1, …, n-1]`.
    #[default]
    Identity,
    /// Reverse Cuthill–McKee.
    #[serde(alias = "rcm")]
    Bandwidth,
    /// Greedy minimum degree.
    #[serde(alias = "amd", alias = "md")]
    Fill,
}

impl OrderingKind {
    /// Canonical lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Bandwidth => "bandwidth",
            Self::Fill => "fill",
        }
    }
}

impl fmt::Display for OrderingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderingKind {
    type Err = ReorderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "identity" | "none" => Ok(Self::Identity),
            "bandwidth" | "rcm" => Ok(Self::Bandwidth),
            "fill" | "amd" | "md" => Ok(Self::Fill),
            _ => Err(ReorderError::UnknownOrdering(s.to_string())),
        }
    }
}

/// Which axes a permutation is applied to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReorderType {
    /// Rows only.
    #[serde(rename = "1D")]
    Rows,
    /// Rows and columns (symmetric permutation).
    #[default]
    #[serde(rename = "2D")]
    Symmetric,
}

impl ReorderType {
    /// `"1D"` or `"2D"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rows => "1D",
            Self::Symmetric => "2D",
        }
    }
}

impl fmt::Display for ReorderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReorderType {
    type Err = ReorderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1D" | "1d" => Ok(Self::Rows),
            "2D" | "2d" => Ok(Self::Symmetric),
            other => Err(ReorderError::InvalidParameter {
                key: "reorder_type".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Everything one reordering run needs besides the matrix.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReorderConfig {
    /// Technique applied to every component.
    pub ordering: OrderingKind,
    /// Whether the input is declared symmetric (lower or upper triangle suffices).
    pub symmetric: bool,
    /// Axes the permutation applies to when measuring and applying.
    pub reorder_type: ReorderType,
    /// Index base of emitted permutations.
    pub index_base: IndexBase,
    /// Block sizes for the density report.
    pub block_sizes: Vec<usize>,
    /// Denominator used for block density.
    pub density: DensityNormalization,
    /// Order components on the rayon pool (needs the `parallel` feature).
    pub parallel: bool,
    /// Wall-clock budget checked between components.
    pub time_budget_ms: Option<u64>,
}

impl Default for ReorderConfig {
    fn default() -> Self {
        Self {
            ordering: OrderingKind::default(),
            symmetric: true,
            reorder_type: ReorderType::default(),
            index_base: IndexBase::default(),
            block_sizes: DEFAULT_BLOCK_SIZES.to_vec(),
            density: DensityNormalization::default(),
            parallel: false,
            time_budget_ms: None,
        }
    }
}

impl ReorderConfig {
    /// Default configuration with the given technique.
    pub fn with_ordering(ordering: OrderingKind) -> Self {
        Self {
            ordering,
            ..Self::default()
        }
    }

    /// Applies a comma-separated `key=value` parameter set, e.g. `symmetric=false`.
    ///
    /// List values (`block_sizes`) are separated by `;`. An empty string or `default`
    /// leaves the configuration untouched.
    ///
    /// # Errors
    /// Returns [`ReorderError::InvalidParameter`] for unknown keys or unparsable values,
    /// and [`ReorderError::UnknownOrdering`] for an unknown technique name.
    pub fn apply_param_set(&mut self, params: &str) -> ReorderResult<()> {
        let params = params.trim();
        if params.is_empty() || params == "default" {
            return Ok(());
        }
        for pair in params.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').ok_or_else(|| invalid(pair, ""))?;
            let (key, value) = (key.trim(), value.trim());
            match key {
                "ordering" | "reorder_tech" => self.ordering = value.parse()?,
                "symmetric" => self.symmetric = parse_bool(key, value)?,
                "reorder_type" => self.reorder_type = value.parse()?,
                "index_base" => {
                    self.index_base = match value {
                        "0" | "zero" => IndexBase::Zero,
                        "1" | "one" => IndexBase::One,
                        _ => return Err(invalid(key, value)),
                    };
                }
                "block_sizes" => {
                    self.block_sizes = value
                        .split(';')
                        .map(|b| b.trim().parse::<usize>().map_err(|_| invalid(key, value)))
                        .collect::<ReorderResult<_>>()?;
                }
                "density" => {
                    self.density = match value {
                        "grid" => DensityNormalization::Grid,
                        "bounding_box" => DensityNormalization::BoundingBox,
                        "nonempty_fill" => DensityNormalization::NonEmptyFill,
                        _ => return Err(invalid(key, value)),
                    };
                }
                "parallel" => self.parallel = parse_bool(key, value)?,
                "time_budget_ms" => {
                    self.time_budget_ms = Some(value.parse().map_err(|_| invalid(key, value))?);
                }
                _ => return Err(invalid(key, value)),
            }
        }
        Ok(())
    }

    /// Directory-style id of the parameters that differ from the defaults.
    ///
    /// `"default"` when nothing but the technique differs; otherwise `key-value` pairs
    /// joined by `_`, e.g. `symmetric-false`.
    pub fn param_set_id(&self) -> String {
        let base = Self::with_ordering(self.ordering);
        let mut parts = Vec::new();
        if self.symmetric != base.symmetric {
            parts.push(format!("symmetric-{}", self.symmetric));
        }
        if self.reorder_type != base.reorder_type {
            parts.push(format!("reorder_type-{}", self.reorder_type));
        }
        if self.density != base.density {
            parts.push(format!("density-{}", self.density.as_str()));
        }
        if parts.is_empty() {
            "default".to_string()
        } else {
            parts.join("_")
        }
    }
}

fn invalid(key: &str, value: &str) -> ReorderError {
    ReorderError::InvalidParameter {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_bool(key: &str, value: &str) -> ReorderResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_aliases() {
        assert_eq!("rcm".parse::<OrderingKind>().unwrap(), OrderingKind::Bandwidth);
        assert_eq!("AMD".parse::<OrderingKind>().unwrap(), OrderingKind::Fill);
        assert_eq!("md".parse::<OrderingKind>().unwrap(), OrderingKind::Fill);
        assert!(matches!(
            "metis".parse::<OrderingKind>(),
            Err(ReorderError::UnknownOrdering(name)) if name == "metis"
        ));
    }

    #[test]
    fn test_defaults() {
        let config = ReorderConfig::default();
        assert!(config.symmetric);
        assert_eq!(config.block_sizes, vec![4, 8, 16, 32, 64]);
        assert_eq!(config.reorder_type, ReorderType::Symmetric);
        assert_eq!(config.index_base, IndexBase::One);
        assert_eq!(config.param_set_id(), "default");
    }

    #[test]
    fn test_param_set_roundtrips_to_id() {
        let mut config = ReorderConfig::with_ordering(OrderingKind::Fill);
        config.apply_param_set("symmetric=false").unwrap();
        assert!(!config.symmetric);
        assert_eq!(config.param_set_id(), "symmetric-false");
    }

    #[test]
    fn test_param_set_lists_and_errors() {
        let mut config = ReorderConfig::default();
        config
            .apply_param_set("block_sizes=4;8, reorder_type=1D, index_base=0")
            .unwrap();
        assert_eq!(config.block_sizes, vec![4, 8]);
        assert_eq!(config.reorder_type, ReorderType::Rows);
        assert_eq!(config.index_base, IndexBase::Zero);

        assert!(matches!(
            config.apply_param_set("symmetric=maybe"),
            Err(ReorderError::InvalidParameter { .. })
        ));
        assert!(config.apply_param_set("nonsense").is_err());
        config.apply_param_set("default").unwrap();
    }

    #[test]
    fn test_json_uses_lowercase_names_and_defaults() {
        let config: ReorderConfig =
            serde_json::from_str(r#"{"ordering":"rcm","reorder_type":"1D"}"#).unwrap();
        assert_eq!(config.ordering, OrderingKind::Bandwidth);
        assert_eq!(config.reorder_type, ReorderType::Rows);
        assert!(config.symmetric);

        let json = serde_json::to_string(&ReorderConfig::default()).unwrap();
        assert!(json.contains(r#""ordering":"identity""#));
        assert!(json.contains(r#""reorder_type":"2D""#));
    }
}
