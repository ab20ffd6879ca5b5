//! YAML configuration for the standalone REG-mapping front-end.
//!
//! Mirrors the shape of a cell-configuration section from a gNodeB config
//! file, trimmed to only the fields this core's REG mapping needs.

use serde::{Deserialize, Serialize};

use common::{AntennaPorts, CellId, CyclicPrefix, PhichLength, PhichResource};
use regs::{CellParameters, RegError};

/// Cell section of a `regs-cli` YAML configuration file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CellConfig {
    pub cell_id: u16,
    pub nof_prb: u16,
    pub nof_ports: u8,
    #[serde(default)]
    pub cyclic_prefix: CpConfig,
    #[serde(default)]
    pub phich_length: PhichLenConfig,
    #[serde(default)]
    pub phich_resource: PhichResConfig,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CpConfig {
    #[default]
    Normal,
    Extended,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PhichLenConfig {
    #[default]
    Normal,
    Extended,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub enum PhichResConfig {
    #[serde(rename = "1/6")]
    OneSixth,
    #[serde(rename = "1/2")]
    OneHalf,
    #[default]
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
}

impl CellConfig {
    /// Convert into validated [`CellParameters`], rejecting anything the
    /// library's own newtype constructors reject.
    pub fn into_cell_parameters(self) -> Result<CellParameters, RegError> {
        let cell_id = CellId::new(self.cell_id)
            .ok_or_else(|| RegError::InvalidParameter(format!("invalid cell_id {}", self.cell_id)))?;
        let nof_ports = AntennaPorts::new(self.nof_ports).ok_or_else(|| {
            RegError::InvalidParameter(format!("invalid nof_ports {}", self.nof_ports))
        })?;
        let cp = match self.cyclic_prefix {
            CpConfig::Normal => CyclicPrefix::Normal,
            CpConfig::Extended => CyclicPrefix::Extended,
        };
        let phich_len = match self.phich_length {
            PhichLenConfig::Normal => PhichLength::Normal,
            PhichLenConfig::Extended => PhichLength::Extended,
        };
        let phich_res = match self.phich_resource {
            PhichResConfig::OneSixth => PhichResource::OneSixth,
            PhichResConfig::OneHalf => PhichResource::OneHalf,
            PhichResConfig::One => PhichResource::One,
            PhichResConfig::Two => PhichResource::Two,
        };

        CellParameters::new(cell_id, self.nof_prb, nof_ports, cp, phich_len, phich_res)
    }
}
