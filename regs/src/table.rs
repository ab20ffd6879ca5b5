//! REG enumeration: 3GPP TS 36.211 §6.2.4.
//!
//! Builds the ordered table of all Resource Element Groups in the control
//! region and each REG's four RE indices, ported from `regs_init` /
//! `regs_reg_init` / `regs_num_x_symbol` in the reference implementation
//! (`examples/original_source/lte/lib/phch/src/regs.c`).

use common::CyclicPrefix;
use tracing::debug;

use crate::cell::CellParameters;
use crate::error::RegError;

/// Subcarriers per physical resource block.
pub const RE_PER_PRB: u16 = 12;
/// Data REs per REG.
pub const RE_PER_REG: usize = 4;

/// One Resource Element Group: four data subcarriers in one OFDM symbol of
/// one PRB, skipping any reference-signal subcarrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reg {
    /// OFDM symbol index within the control region.
    pub l: u8,
    /// Lookup key: the PRB-local 4-or-6-wide group's base subcarrier offset.
    ///
    /// For REGs with no reference signal this equals `k[0]`; for REGs that
    /// share a 6-wide group with two reference REs, `k0` is the group's base
    /// offset, which may itself be a reference RE rather than the REG's
    /// first *data* RE. The PCFICH allocator looks REGs up by this field, not
    /// by `k[0]`, matching `regs_find_reg` in the reference implementation.
    pub k0: u16,
    /// The four data-RE subcarrier indices, ascending.
    pub k: [u16; 4],
    pub(crate) assigned: bool,
}

/// Number of REGs in one PRB for OFDM symbol `l`, given the antenna port
/// count and cyclic prefix (36.211 §6.2.4, Table in SPEC_FULL.md §4.2).
fn reg_count_per_symbol(
    l: u8,
    nof_ports: u8,
    cp: CyclicPrefix,
) -> Result<usize, RegError> {
    match l {
        0 => Ok(2),
        1 => match nof_ports {
            1 | 2 => Ok(3),
            4 => Ok(2),
            other => Err(RegError::InvalidParameter(format!(
                "unsupported antenna port count {other}"
            ))),
        },
        2 => Ok(3),
        3 => Ok(if cp == CyclicPrefix::Normal { 3 } else { 2 }),
        other => Err(RegError::InvalidParameter(format!(
            "control region cannot contain symbol index {other}"
        ))),
    }
}

impl Reg {
    /// Build one REG's RE indices.
    ///
    /// `prb_base` is the PRB's first subcarrier (`prb * 12`); `nreg` is the
    /// REG's position within the PRB for this symbol (0-based); `group_width`
    /// is `reg_count_per_symbol`'s value for this symbol (2 or 3); `vo` is
    /// `cell_id mod 3`, the reference-signal subcarrier offset.
    fn build(l: u8, nreg: usize, prb_base: u16, group_width: usize, vo: usize) -> Result<Self, RegError> {
        let nreg = nreg as u16;
        match group_width {
            // Two REGs share a 6-wide group with two reference REs.
            2 => {
                let k0 = prb_base + nreg * 6;
                let mut k = [0u16; 4];
                let mut j = 0usize;
                for i in 0..vo {
                    k[j] = prb_base + nreg * 6 + i as u16;
                    j += 1;
                }
                for i in 0..2 {
                    k[j] = prb_base + nreg * 6 + i as u16 + vo as u16 + 1;
                    j += 1;
                }
                let filled = j;
                for i in 0..(4 - filled) {
                    k[j] = prb_base + nreg * 6 + vo as u16 + 3 + i as u16 + 1;
                    j += 1;
                }
                if j != 4 {
                    return Err(RegError::AllocationConflict(
                        "reference-signal REG layout did not fill four data REs".to_string(),
                    ));
                }
                Ok(Self { l, k0, k, assigned: false })
            }
            // Three REGs, no reference signal in this symbol.
            3 => {
                let k0 = prb_base + nreg * 4;
                let mut k = [0u16; 4];
                for (i, slot) in k.iter_mut().enumerate() {
                    *slot = prb_base + nreg * 4 + i as u16;
                }
                Ok(Self { l, k0, k, assigned: false })
            }
            other => Err(RegError::InvalidParameter(format!(
                "invalid REG group width {other}"
            ))),
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.assigned
    }
}

/// The ordered, immutable-after-init table of every REG in the control
/// region, plus the mutable `assigned` bit each allocator flips.
#[derive(Debug, Clone)]
pub struct RegTable {
    regs: Vec<Reg>,
}

impl RegTable {
    /// Build the REG table for a cell, in PRB-then-symbol order.
    ///
    /// Ported verbatim from `regs_init`'s three-pass walk: for each PRB,
    /// three passes visit the control symbols in order `0..max_ctrl_symbols`;
    /// passes 1 and 3 emit a REG from every symbol, pass 2 only from symbols
    /// whose REG count is 3 (symbols with only 2 REGs are filled by passes 1
    /// and 3 alone). This is the structure that produces the spec-mandated
    /// order for mixed per-symbol REG counts — not a generic round-robin.
    pub fn build(cell: &CellParameters) -> Result<Self, RegError> {
        let max_ctrl_symbols = cell.max_ctrl_symbols();
        let vo = (cell.cell_id.value() % 3) as usize;

        let mut n = [0usize; 4];
        for (l, slot) in n.iter_mut().take(max_ctrl_symbols).enumerate() {
            *slot = reg_count_per_symbol(l as u8, cell.nof_ports.value(), cell.cp)?;
        }
        let nof_regs: usize = n[..max_ctrl_symbols]
            .iter()
            .map(|&count| count * cell.nof_prb as usize)
            .sum();

        let mut regs = Vec::with_capacity(nof_regs);
        let mut j = [0usize; 4];
        let mut l = 0usize;
        let mut prb = 0usize;
        let mut pass = 0usize;
        let mut k = 0usize;

        while k < nof_regs {
            if n[l] == 3 || (n[l] == 2 && pass != 1) {
                let prb_base = (prb as u16) * RE_PER_PRB;
                regs.push(Reg::build(l as u8, j[l], prb_base, n[l], vo)?);
                j[l] += 1;
                k += 1;
            }
            l += 1;
            if l == max_ctrl_symbols {
                l = 0;
                pass += 1;
            }
            if pass == 3 {
                prb += 1;
                j = [0; 4];
                pass = 0;
            }
        }

        debug!(
            nof_regs,
            nof_prb = cell.nof_prb,
            cell_id = cell.cell_id.value(),
            "indexed REG table"
        );

        Ok(Self { regs })
    }

    pub fn len(&self) -> usize {
        self.regs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regs.is_empty()
    }

    pub fn get(&self, idx: usize) -> &Reg {
        &self.regs[idx]
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Reg)> {
        self.regs.iter().enumerate()
    }

    /// Find the REG at symbol `l` whose `k0` equals `k0`, per `regs_find_reg`.
    pub fn find_by_k0(&self, k0: u16, l: u8) -> Option<usize> {
        self.regs.iter().position(|r| r.l == l && r.k0 == k0)
    }

    pub fn is_assigned(&self, idx: usize) -> bool {
        self.regs[idx].assigned
    }

    /// Mark a REG assigned. Only called during the init sequence (PCFICH,
    /// then PHICH); the table is read-only to everything else.
    pub(crate) fn assign(&mut self, idx: usize) {
        self.regs[idx].assigned = true;
    }
}
