use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameters: {}", .0.join(", "))]
    MissingParameters(Vec<&'static str>),
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("Invalid residue specifier '{input}': {reason}")]
    InvalidResidueSpecifier { input: String, reason: &'static str },
    #[error("Unknown selection mode '{0}' (expected 'blind' or 'targeted')")]
    UnknownSelectionMode(String),
    #[error("Targeted selection requires at least one residue")]
    EmptySelection,
}

/// Identifies residues by chain and sequence number, written `Chain:Number`.
///
/// Insertion codes are not part of the specifier: a specifier matches every residue of
/// the chain that carries the number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResidueSpecifier {
    pub chain_id: String,
    pub residue_number: isize,
}

impl ResidueSpecifier {
    pub fn new(chain_id: impl Into<String>, residue_number: isize) -> Self {
        Self {
            chain_id: chain_id.into(),
            residue_number,
        }
    }
}

impl FromStr for ResidueSpecifier {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| ConfigError::InvalidResidueSpecifier {
            input: s.to_string(),
            reason,
        };

        let parts: Vec<&str> = s.split(':').map(str::trim).collect();
        let [chain, number] = parts.as_slice() else {
            return Err(invalid("expected exactly one ':' separating chain and number"));
        };
        if chain.is_empty() {
            return Err(invalid("chain identifier is empty"));
        }
        let residue_number = number
            .parse::<isize>()
            .map_err(|_| invalid("residue number is not an integer"))?;

        Ok(Self::new(*chain, residue_number))
    }
}

impl fmt::Display for ResidueSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chain_id, self.residue_number)
    }
}

/// Which atoms of the receptor a search grid should enclose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionSpec {
    /// Every atom of the structure.
    Blind,
    /// Only atoms of the listed residues.
    Targeted(Vec<ResidueSpecifier>),
}

impl SelectionSpec {
    /// Builds a selection from a request's mode string and residue list.
    ///
    /// The mode is matched case-insensitively against `blind` and `targeted`. Residues are
    /// ignored for blind selections.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownSelectionMode`] for any other mode,
    /// [`ConfigError::EmptySelection`] for a targeted request without residues, and
    /// [`ConfigError::InvalidResidueSpecifier`] for the first malformed residue.
    pub fn from_request<S: AsRef<str>>(mode: &str, residues: &[S]) -> Result<Self, ConfigError> {
        match mode.trim().to_ascii_lowercase().as_str() {
            "blind" => Ok(SelectionSpec::Blind),
            "targeted" => {
                let specs = residues
                    .iter()
                    .map(|r| r.as_ref().parse())
                    .collect::<Result<Vec<ResidueSpecifier>, _>>()?;
                Self::targeted(specs)
            }
            _ => Err(ConfigError::UnknownSelectionMode(mode.to_string())),
        }
    }

    pub fn targeted(residues: Vec<ResidueSpecifier>) -> Result<Self, ConfigError> {
        if residues.is_empty() {
            return Err(ConfigError::EmptySelection);
        }
        Ok(SelectionSpec::Targeted(residues))
    }

    pub fn mode_name(&self) -> &'static str {
        match self {
            SelectionSpec::Blind => "blind",
            SelectionSpec::Targeted(_) => "targeted",
        }
    }
}

/// Search settings handed to the docking engine.
///
/// `gpu_enabled` is persisted under `gpu_check`, the key the engine launcher reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockingParameters {
    pub search_mode: String,
    pub scoring_method: String,
    pub num_modes: u32,
    #[serde(rename = "gpu_check", alias = "gpu_enabled")]
    pub gpu_enabled: bool,
}

impl DockingParameters {
    /// Checks field presence and ranges.
    ///
    /// Values loaded from disk bypass the builder, so consolidation re-runs this.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut missing = Vec::new();
        if self.search_mode.trim().is_empty() {
            missing.push("search_mode");
        }
        if self.scoring_method.trim().is_empty() {
            missing.push("scoring_method");
        }
        if !missing.is_empty() {
            return Err(ConfigError::MissingParameters(missing));
        }
        if self.num_modes == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "num_modes",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct DockingParametersBuilder {
    search_mode: Option<String>,
    scoring_method: Option<String>,
    num_modes: Option<u32>,
    gpu_enabled: Option<bool>,
}

impl DockingParametersBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_mode(mut self, mode: impl Into<String>) -> Self {
        self.search_mode = Some(mode.into());
        self
    }
    pub fn scoring_method(mut self, method: impl Into<String>) -> Self {
        self.scoring_method = Some(method.into());
        self
    }
    pub fn num_modes(mut self, n: u32) -> Self {
        self.num_modes = Some(n);
        self
    }
    pub fn gpu_enabled(mut self, enabled: bool) -> Self {
        self.gpu_enabled = Some(enabled);
        self
    }

    /// Builds the parameters, reporting every absent field at once.
    ///
    /// Blank strings count as absent.
    pub fn build(self) -> Result<DockingParameters, ConfigError> {
        let present = |value: &Option<String>| value.as_deref().is_some_and(|s| !s.trim().is_empty());

        let mut missing = Vec::new();
        if !present(&self.search_mode) {
            missing.push("search_mode");
        }
        if !present(&self.scoring_method) {
            missing.push("scoring_method");
        }
        if self.num_modes.is_none() {
            missing.push("num_modes");
        }
        if self.gpu_enabled.is_none() {
            missing.push("gpu_enabled");
        }

        match (
            self.search_mode,
            self.scoring_method,
            self.num_modes,
            self.gpu_enabled,
        ) {
            (Some(search_mode), Some(scoring_method), Some(num_modes), Some(gpu_enabled))
                if missing.is_empty() =>
            {
                let params = DockingParameters {
                    search_mode: search_mode.trim().to_string(),
                    scoring_method: scoring_method.trim().to_string(),
                    num_modes,
                    gpu_enabled,
                };
                params.validate()?;
                Ok(params)
            }
            _ => Err(ConfigError::MissingParameters(missing)),
        }
    }
}
