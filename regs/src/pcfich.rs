//! PCFICH REG allocation: 3GPP TS 36.211 §6.7.4.

use tracing::debug;

use crate::cell::CellParameters;
use crate::error::RegError;
use crate::table::RegTable;

/// Number of REGs the PCFICH always occupies, regardless of cell size.
pub const NOF_REGS: usize = 4;
/// Data REs the PCFICH carries (4 REGs * 4 REs/REG).
pub const NOF_SYMBOLS: usize = NOF_REGS * crate::table::RE_PER_REG;

/// The four REG indices (into the cell's [`RegTable`]) carrying PCFICH.
#[derive(Debug, Clone, Copy)]
pub struct PcfichAllocation {
    pub reg_indices: [usize; NOF_REGS],
}

impl PcfichAllocation {
    /// Allocate PCFICH's four REGs in control symbol 0 and mark them assigned.
    ///
    /// `k_hat = 6 * (cell_id mod 2*nof_prb)`; REG `i`'s subcarrier is
    /// `(k_hat + ((i * nof_prb) / 2) * 6) mod (12 * nof_prb)`. The integer
    /// division `(i * nof_prb) / 2` must happen before multiplying by 6 —
    /// grouping it as `i * (nof_prb / 2)` instead changes the result for odd
    /// `nof_prb` and is not what the reference implementation computes.
    pub fn allocate(cell: &CellParameters, table: &mut RegTable) -> Result<Self, RegError> {
        let nof_prb = cell.nof_prb as u32;
        let k_hat = 6 * (cell.cell_id.value() as u32 % (2 * nof_prb));
        let stride = 12 * nof_prb;

        let mut reg_indices = [0usize; NOF_REGS];
        for (i, slot) in reg_indices.iter_mut().enumerate() {
            let k = (k_hat + ((i as u32 * nof_prb) / 2) * 6) % stride;
            let idx = table.find_by_k0(k as u16, 0).ok_or_else(|| {
                RegError::AllocationConflict(format!("PCFICH REG ({k},0) not found"))
            })?;
            if table.is_assigned(idx) {
                return Err(RegError::AllocationConflict(format!(
                    "PCFICH REG ({k},0) already allocated"
                )));
            }
            table.assign(idx);
            *slot = idx;
            debug!(reg = i, k, "assigned PCFICH REG");
        }

        Ok(Self { reg_indices })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{AntennaPorts, CellId, CyclicPrefix, PhichLength, PhichResource};

    fn cell(cell_id: u16, nof_prb: u16) -> CellParameters {
        CellParameters::new(
            CellId::new(cell_id).unwrap(),
            nof_prb,
            AntennaPorts::new(2).unwrap(),
            CyclicPrefix::Normal,
            PhichLength::Normal,
            PhichResource::One,
        )
        .unwrap()
    }

    #[test]
    fn allocates_four_distinct_regs_in_symbol_zero() {
        let cell = cell(1, 25);
        let mut table = RegTable::build(&cell).unwrap();
        let alloc = PcfichAllocation::allocate(&cell, &mut table).unwrap();
        let mut seen = std::collections::HashSet::new();
        for &idx in &alloc.reg_indices {
            assert_eq!(table.get(idx).l, 0);
            assert!(table.is_assigned(idx));
            assert!(seen.insert(idx), "PCFICH REGs must be distinct");
        }
    }

    #[test]
    fn matches_reference_formula_for_even_prb() {
        let cell = cell(0, 6);
        let mut table = RegTable::build(&cell).unwrap();
        let alloc = PcfichAllocation::allocate(&cell, &mut table).unwrap();
        // cell_id=0 -> k_hat=0; k_i = ((i*6)/2)*6 mod 72 = i*18 mod 72
        let expected_k: Vec<u16> = (0..4u32).map(|i| ((i * 6 / 2) * 6 % 72) as u16).collect();
        for (i, &idx) in alloc.reg_indices.iter().enumerate() {
            assert_eq!(table.get(idx).k0, expected_k[i]);
        }
    }

    #[test]
    fn odd_nof_prb_divides_before_multiplying() {
        // nof_prb = 15 is odd; (i*15)/2 must truncate before the *6, not
        // (15/2)*i which would be a different (wrong) sequence.
        let cell = cell(0, 15);
        let mut table = RegTable::build(&cell).unwrap();
        let alloc = PcfichAllocation::allocate(&cell, &mut table).unwrap();
        let stride = 12u32 * 15;
        for (i, &idx) in alloc.reg_indices.iter().enumerate() {
            let expected = (((i as u32 * 15) / 2) * 6) % stride;
            assert_eq!(table.get(idx).k0 as u32, expected);
        }
    }
}
