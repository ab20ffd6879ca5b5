//! Composite facade: owns the REG Table and all three channels' allocations
//! for one cell, and exposes the channel-level mapping operations.

use num_complex::Complex32;
use tracing::info;

use common::PhichLength;

use crate::cell::CellParameters;
use crate::error::RegError;
use crate::io;
use crate::pcfich::{self, PcfichAllocation};
use crate::pdcch::{self, PdcchAllocation};
use crate::phich::{self, PhichAllocation};
use crate::table::{RegTable, RE_PER_REG};

/// One cell's fully-initialised control-channel REG mapping.
///
/// Built once via [`ControlChannels::init`]; the REG Table and the three
/// channels' allocations are immutable afterward (beyond the REG `assigned`
/// bits flipped during init itself). Only the active CFI is mutable, and
/// only through [`ControlChannels::set_cfi`].
pub struct ControlChannels {
    cell: CellParameters,
    table: RegTable,
    pcfich: PcfichAllocation,
    phich: PhichAllocation,
    /// Precomputed PDCCH allocation for each CFI ∈ {1,2,3}, indexed `[cfi-1]`.
    pdcch: [PdcchAllocation; 3],
    active_cfi: Option<u8>,
}

impl ControlChannels {
    /// Construct the REG Table and allocate PCFICH, PHICH, and all three
    /// PDCCH variants, in that dependency order. No active CFI is selected;
    /// call [`Self::set_cfi`] before using PDCCH operations.
    pub fn init(cell: CellParameters) -> Result<Self, RegError> {
        let mut table = RegTable::build(&cell)?;
        let pcfich = PcfichAllocation::allocate(&cell, &mut table)?;
        let phich = PhichAllocation::allocate(&cell, &mut table)?;

        let pdcch = [
            PdcchAllocation::build(&cell, &table, 1)?,
            PdcchAllocation::build(&cell, &table, 2)?,
            PdcchAllocation::build(&cell, &table, 3)?,
        ];

        info!(
            cell_id = cell.cell_id.value(),
            nof_prb = cell.nof_prb,
            nof_regs = table.len(),
            nof_phich_groups = phich.nof_groups(),
            "initialised control-channel REG mapping"
        );

        Ok(Self {
            cell,
            table,
            pcfich,
            phich,
            pdcch,
            active_cfi: None,
        })
    }

    /// Select the active CFI for subsequent PDCCH operations.
    ///
    /// Rejected if below the minimum CFI the cell's PHICH length allows
    /// (Extended PHICH length needs control symbols 0..2 to exist).
    pub fn set_cfi(&mut self, cfi: u8) -> Result<(), RegError> {
        if !(1..=3).contains(&cfi) {
            return Err(RegError::InvalidParameter(format!(
                "cfi {cfi} out of range [1, 3]"
            )));
        }
        let min_cfi = self.cell.min_cfi();
        if self.cell.phich_len == PhichLength::Extended && cfi < min_cfi {
            return Err(RegError::PhichLengthConflict { min_cfi });
        }
        self.active_cfi = Some(cfi);
        Ok(())
    }

    pub fn active_cfi(&self) -> Option<u8> {
        self.active_cfi
    }

    pub fn nof_prb(&self) -> u16 {
        self.cell.nof_prb
    }

    pub fn grid_stride(&self) -> usize {
        self.cell.grid_stride()
    }

    pub fn nof_regs(&self) -> usize {
        self.table.len()
    }

    pub fn n_groups_phich(&self) -> usize {
        self.phich.nof_groups()
    }

    /// Number of control symbols (`N_ctrl(cfi)`) occupied by the active CFI,
    /// for DSP collaborators that need to know how much of the grid's
    /// leading symbols the control region covers. `None` if no CFI is set.
    pub fn nof_ctrl_symbols(&self) -> Option<usize> {
        self.active_cfi.map(|cfi| self.cell.nof_ctrl_symbols(cfi))
    }

    fn active_pdcch(&self) -> Result<&PdcchAllocation, RegError> {
        let cfi = self.active_cfi.ok_or(RegError::CfiNotSet)?;
        Ok(&self.pdcch[cfi as usize - 1])
    }

    /// Number of REGs in the currently active PDCCH allocation.
    pub fn nof_pdcch_regs(&self) -> Result<usize, RegError> {
        Ok(self.active_pdcch()?.nof_regs())
    }

    pub fn nof_pdcch_cces(&self) -> Result<usize, RegError> {
        Ok(self.active_pdcch()?.nof_cces())
    }

    // --- PCFICH ---

    /// Map 16 PCFICH symbols (4 REGs × 4 REs) onto `grid`. Returns the number
    /// of REs written (always 16).
    pub fn pcfich_put(&self, symbols: &[Complex32; pcfich::NOF_SYMBOLS], grid: &mut [Complex32]) -> usize {
        let stride = self.grid_stride();
        for (i, &idx) in self.pcfich.reg_indices.iter().enumerate() {
            let chunk: [Complex32; RE_PER_REG] = symbols[i * RE_PER_REG..(i + 1) * RE_PER_REG]
                .try_into()
                .expect("slice has exactly RE_PER_REG elements");
            io::put_reg(self.table.get(idx), &chunk, grid, stride);
        }
        pcfich::NOF_SYMBOLS
    }

    /// Read the 16 PCFICH symbols out of `grid`.
    pub fn pcfich_get(&self, grid: &[Complex32], out: &mut [Complex32; pcfich::NOF_SYMBOLS]) -> usize {
        let stride = self.grid_stride();
        for (i, &idx) in self.pcfich.reg_indices.iter().enumerate() {
            let mut chunk = [Complex32::new(0.0, 0.0); RE_PER_REG];
            io::get_reg(self.table.get(idx), grid, &mut chunk, stride);
            out[i * RE_PER_REG..(i + 1) * RE_PER_REG].copy_from_slice(&chunk);
        }
        pcfich::NOF_SYMBOLS
    }

    // --- PHICH ---

    /// Accumulate 12 PHICH symbols (3 REGs × 4 REs) into group `group`.
    /// Callers superimpose multiple UEs' codewords by calling this more than
    /// once per group before the next `phich_reset`.
    pub fn phich_add(
        &self,
        symbols: &[Complex32; phich::NOF_SYMBOLS],
        group: usize,
        grid: &mut [Complex32],
    ) -> Result<usize, RegError> {
        let stride = self.grid_stride();
        let indices = self.phich.reg_indices(group, self.cell.cp)?;
        for (i, &idx) in indices.iter().enumerate() {
            let chunk: [Complex32; RE_PER_REG] = symbols[i * RE_PER_REG..(i + 1) * RE_PER_REG]
                .try_into()
                .expect("slice has exactly RE_PER_REG elements");
            io::add_reg(self.table.get(idx), &chunk, grid, stride);
        }
        Ok(phich::NOF_SYMBOLS)
    }

    /// Zero every PHICH group's REs. Call once per subframe before any
    /// `phich_add` calls for that subframe.
    pub fn phich_reset(&self, grid: &mut [Complex32]) -> Result<(), RegError> {
        let stride = self.grid_stride();
        let stride_step = self.phich.reset_stride(self.cell.cp);
        let mut group = 0;
        while group < self.phich.nof_groups() {
            let indices = self.phich.reg_indices(group, self.cell.cp)?;
            for &idx in indices {
                io::reset_reg(self.table.get(idx), grid, stride);
            }
            group += stride_step;
        }
        Ok(())
    }

    /// Read the 12 symbols of PHICH group `group` out of `grid`.
    pub fn phich_get(
        &self,
        grid: &[Complex32],
        group: usize,
        out: &mut [Complex32; phich::NOF_SYMBOLS],
    ) -> Result<usize, RegError> {
        let stride = self.grid_stride();
        let indices = self.phich.reg_indices(group, self.cell.cp)?;
        for (i, &idx) in indices.iter().enumerate() {
            let mut chunk = [Complex32::new(0.0, 0.0); RE_PER_REG];
            io::get_reg(self.table.get(idx), grid, &mut chunk, stride);
            out[i * RE_PER_REG..(i + 1) * RE_PER_REG].copy_from_slice(&chunk);
        }
        Ok(phich::NOF_SYMBOLS)
    }

    // --- PDCCH ---

    /// Map `symbols` (4 × active PDCCH REG count) onto `grid` using the
    /// active CFI's allocation. Requires [`Self::set_cfi`] to have been
    /// called.
    pub fn pdcch_put(&self, symbols: &[Complex32], grid: &mut [Complex32]) -> Result<usize, RegError> {
        let stride = self.grid_stride();
        let pdcch = self.active_pdcch()?;
        let expected = pdcch.nof_regs() * RE_PER_REG;
        if symbols.len() != expected {
            return Err(RegError::InvalidParameter(format!(
                "pdcch_put: symbols buffer has {} elements, expected {expected}",
                symbols.len()
            )));
        }
        for (i, &idx) in pdcch.reg_indices().iter().enumerate() {
            let chunk: [Complex32; RE_PER_REG] = symbols[i * RE_PER_REG..(i + 1) * RE_PER_REG]
                .try_into()
                .expect("slice has exactly RE_PER_REG elements");
            io::put_reg(self.table.get(idx), &chunk, grid, stride);
        }
        Ok(pdcch.nof_regs() * RE_PER_REG)
    }

    /// Read the active CFI's PDCCH symbols out of `grid`.
    pub fn pdcch_get(&self, grid: &[Complex32], out: &mut [Complex32]) -> Result<usize, RegError> {
        let stride = self.grid_stride();
        let pdcch = self.active_pdcch()?;
        let expected = pdcch.nof_regs() * RE_PER_REG;
        if out.len() != expected {
            return Err(RegError::InvalidParameter(format!(
                "pdcch_get: out buffer has {} elements, expected {expected}",
                out.len()
            )));
        }
        for (i, &idx) in pdcch.reg_indices().iter().enumerate() {
            let mut chunk = [Complex32::new(0.0, 0.0); RE_PER_REG];
            io::get_reg(self.table.get(idx), grid, &mut chunk, stride);
            out[i * RE_PER_REG..(i + 1) * RE_PER_REG].copy_from_slice(&chunk);
        }
        Ok(pdcch.nof_regs() * RE_PER_REG)
    }
}
