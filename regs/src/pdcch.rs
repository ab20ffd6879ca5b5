//! PDCCH REG allocation and interleaving: 3GPP TS 36.211 §6.8.5.

use tracing::debug;

use crate::cell::CellParameters;
use crate::error::RegError;
use crate::table::RegTable;

const NCOLS: usize = 32;

/// Fixed 32-column block-interleaver permutation (36.211 Table 6.8.5-1,
/// laid out 1-per-column order as in the reference implementation).
const PERM: [u8; NCOLS] = [
    1, 17, 9, 25, 5, 21, 13, 29, 3, 19, 11, 27, 7, 23, 15, 31, 0, 16, 8, 24, 4, 20, 12, 28, 2, 18,
    10, 26, 6, 22, 14, 30,
];

/// One CFI's interleaved, CCE-aligned REG allocation.
#[derive(Debug, Clone)]
pub struct PdcchAllocation {
    /// REG indices, in logical (post-interleave) order, truncated to a
    /// multiple of 9 REGs (one CCE = 9 REGs).
    reg_indices: Vec<usize>,
}

impl PdcchAllocation {
    /// Build the PDCCH allocation for one CFI value.
    ///
    /// Collects every REG in control symbols `0..nof_ctrl_symbols(cfi)` not
    /// already claimed by PCFICH/PHICH, passes them through the 32-column
    /// block interleaver with padding rows, applies the cell-ID cyclic shift
    /// `kp = (k - cell_id) mod m` while reading the pre-interleave sequence
    /// (folded into the same pass, not a separate step), then truncates the
    /// result down to a whole number of CCEs by shortening the reported
    /// length — the dropped trailing REGs are never referenced again.
    pub fn build(cell: &CellParameters, table: &RegTable, cfi: u8) -> Result<Self, RegError> {
        let nof_ctrl_symbols = cell.nof_ctrl_symbols(cfi);

        let candidates: Vec<usize> = table
            .iter()
            .filter(|(_, reg)| (reg.l as usize) < nof_ctrl_symbols && !reg.is_assigned())
            .map(|(idx, _)| idx)
            .collect();
        let m = candidates.len();
        if m == 0 {
            return Ok(Self {
                reg_indices: Vec::new(),
            });
        }

        let nrows = (m - 1) / NCOLS + 1;
        let ndummy = (NCOLS * nrows).saturating_sub(m);
        let cell_id = cell.cell_id.value() as i64;
        let m_i64 = m as i64;

        let mut interleaved = vec![usize::MAX; m];
        let mut k: i64 = 0;
        for j in 0..NCOLS {
            for i in 0..nrows {
                let pos = i * NCOLS + PERM[j] as usize;
                if pos >= ndummy {
                    let slot = pos - ndummy;
                    let mut kp = (k - cell_id) % m_i64;
                    if kp < 0 {
                        kp += m_i64;
                    }
                    interleaved[slot] = candidates[kp as usize];
                    k += 1;
                }
            }
        }

        let truncated_len = (m / 9) * 9;
        interleaved.truncate(truncated_len);

        debug!(
            cfi,
            nof_regs = interleaved.len(),
            nof_cces = interleaved.len() / 9,
            "built PDCCH allocation"
        );

        Ok(Self {
            reg_indices: interleaved,
        })
    }

    pub fn nof_regs(&self) -> usize {
        self.reg_indices.len()
    }

    pub fn nof_cces(&self) -> usize {
        self.reg_indices.len() / 9
    }

    pub(crate) fn reg_indices(&self) -> &[usize] {
        &self.reg_indices
    }
}
