//! Immutable per-cell configuration for the REG-mapping core.

use common::{AntennaPorts, CellId, CyclicPrefix, PhichLength, PhichResource};
use tracing::debug;

use crate::error::RegError;

/// Minimum PRB count for a valid LTE deployment (1.4 MHz channel, 6 PRBs).
pub const MIN_NOF_PRB: u16 = 6;
/// Maximum PRB count (20 MHz channel, 100 PRBs); the reference implementation
/// and this core both allow the full deployable range up to 110, in case of
/// non-standard channel raster configurations used in lab setups.
pub const MAX_NOF_PRB: u16 = 110;

/// Immutable configuration for one cell's downlink control-channel mapping.
///
/// Built once via [`CellParameters::new`]; every field is validated at
/// construction so downstream allocators never need to re-check them.
#[derive(Debug, Clone, Copy)]
pub struct CellParameters {
    pub cell_id: CellId,
    pub nof_prb: u16,
    pub nof_ports: AntennaPorts,
    pub cp: CyclicPrefix,
    pub phich_len: PhichLength,
    pub phich_res: PhichResource,
}

impl CellParameters {
    /// Construct validated cell parameters.
    ///
    /// `cell_id` and `nof_ports` are validated by their own newtypes; this
    /// constructor additionally range-checks `nof_prb`, the one field whose
    /// legal domain isn't already closed by a Rust type.
    pub fn new(
        cell_id: CellId,
        nof_prb: u16,
        nof_ports: AntennaPorts,
        cp: CyclicPrefix,
        phich_len: PhichLength,
        phich_res: PhichResource,
    ) -> Result<Self, RegError> {
        if !(MIN_NOF_PRB..=MAX_NOF_PRB).contains(&nof_prb) {
            return Err(RegError::InvalidParameter(format!(
                "nof_prb {nof_prb} out of range [{MIN_NOF_PRB}, {MAX_NOF_PRB}]"
            )));
        }

        debug!(
            cell_id = cell_id.value(),
            nof_prb, nof_ports = nof_ports.value(),
            "validated cell parameters"
        );

        Ok(Self {
            cell_id,
            nof_prb,
            nof_ports,
            cp,
            phich_len,
            phich_res,
        })
    }

    /// Number of control symbols the REG enumerator must cover: 4 if
    /// `nof_prb < 10`, else 3 (36.211 §6.8.5).
    pub fn max_ctrl_symbols(&self) -> usize {
        if self.nof_prb < 10 {
            4
        } else {
            3
        }
    }

    /// Per-symbol grid stride `S = 12 * nof_prb` used by REG I/O.
    pub fn grid_stride(&self) -> usize {
        12 * self.nof_prb as usize
    }

    /// Number of control symbols assigned to PDCCH for a given CFI
    /// (`cfi` in `1..=3`), per 36.211 §6.8.5: `cfi + 2` if `nof_prb < 10`,
    /// else `cfi + 1`.
    pub fn nof_ctrl_symbols(&self, cfi: u8) -> usize {
        if self.nof_prb < 10 {
            cfi as usize + 2
        } else {
            cfi as usize + 1
        }
    }

    /// Minimum CFI legal for this cell, accounting for Extended PHICH length:
    /// Extended PHICH needs REGs from control symbols 0..2 to exist, so at
    /// least 3 control symbols must be reserved for control in total.
    pub fn min_cfi(&self) -> u8 {
        if self.phich_len == PhichLength::Extended {
            if self.nof_prb < 10 {
                2
            } else {
                3
            }
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ports(n: u8) -> AntennaPorts {
        AntennaPorts::new(n).unwrap()
    }

    #[test]
    fn rejects_out_of_range_prb() {
        let err = CellParameters::new(
            CellId::new(0).unwrap(),
            5,
            ports(1),
            CyclicPrefix::Normal,
            PhichLength::Normal,
            PhichResource::One,
        )
        .unwrap_err();
        assert_eq!(
            err,
            RegError::InvalidParameter("nof_prb 5 out of range [6, 110]".to_string())
        );
    }

    #[test]
    fn accepts_valid_parameters() {
        let cell = CellParameters::new(
            CellId::new(1).unwrap(),
            25,
            ports(2),
            CyclicPrefix::Normal,
            PhichLength::Normal,
            PhichResource::One,
        )
        .unwrap();
        assert_eq!(cell.max_ctrl_symbols(), 3);
        assert_eq!(cell.grid_stride(), 300);
        assert_eq!(cell.nof_ctrl_symbols(2), 3);
    }

    #[test]
    fn small_cell_needs_four_ctrl_symbols() {
        let cell = CellParameters::new(
            CellId::new(0).unwrap(),
            6,
            ports(1),
            CyclicPrefix::Normal,
            PhichLength::Normal,
            PhichResource::OneSixth,
        )
        .unwrap();
        assert_eq!(cell.max_ctrl_symbols(), 4);
        assert_eq!(cell.nof_ctrl_symbols(1), 3);
    }

    #[test]
    fn extended_phich_min_cfi() {
        let small = CellParameters::new(
            CellId::new(0).unwrap(),
            6,
            ports(1),
            CyclicPrefix::Normal,
            PhichLength::Extended,
            PhichResource::One,
        )
        .unwrap();
        assert_eq!(small.min_cfi(), 2);

        let large = CellParameters::new(
            CellId::new(0).unwrap(),
            50,
            ports(2),
            CyclicPrefix::Normal,
            PhichLength::Extended,
            PhichResource::One,
        )
        .unwrap();
        assert_eq!(large.min_cfi(), 3);
    }
}
