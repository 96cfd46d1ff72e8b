//! Engine configuration and loadable game definitions

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::symbols::{Symbol, SymbolSet};

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Game name
    pub name: String,
    /// Target RTP percentage the payout table was tuned against (display
    /// only, not enforced)
    pub target_rtp: f64,
    /// Scatter count that triggers free spins
    pub scatter_trigger_count: u8,
    /// Free spins awarded per scatter on the board
    pub free_spins_per_scatter: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: "SpinMath Classic".into(),
            target_rtp: 65.0,
            scatter_trigger_count: 3,
            free_spins_per_scatter: 2,
        }
    }
}

/// A complete serializable game description: configuration plus symbol
/// catalogue
///
/// This is the unit operators edit and ship. Every load path validates the
/// catalogue, so a bad table is rejected before an engine exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameDefinition {
    #[serde(default)]
    pub config: EngineConfig,
    pub symbols: Vec<Symbol>,
}

impl Default for GameDefinition {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            symbols: SymbolSet::default_catalogue().symbols().to_vec(),
        }
    }
}

impl GameDefinition {
    /// Parse a JSON definition and validate its catalogue
    pub fn from_json_str(text: &str) -> EngineResult<Self> {
        let definition: Self =
            serde_json::from_str(text).map_err(|e| EngineError::Parse(e.to_string()))?;
        definition.validate()?;
        Ok(definition)
    }

    /// Parse a YAML definition and validate its catalogue
    pub fn from_yaml_str(text: &str) -> EngineResult<Self> {
        let definition: Self =
            serde_yml::from_str(text).map_err(|e| EngineError::Parse(e.to_string()))?;
        definition.validate()?;
        Ok(definition)
    }

    /// Validate the catalogue without building an engine
    pub fn validate(&self) -> EngineResult<()> {
        SymbolSet::new(self.symbols.clone()).map(|_| ())
    }

    /// Build the validated catalogue
    pub fn build_symbols(&self) -> EngineResult<SymbolSet> {
        SymbolSet::new(self.symbols.clone())
    }
}
