//! PHICH REG allocation: 3GPP TS 36.211 §6.9.3.

use tracing::debug;

use common::CyclicPrefix;

use crate::cell::CellParameters;
use crate::error::RegError;
use crate::table::RegTable;

/// REGs per PHICH mapping unit (one REG per control symbol 0, 1, 2).
pub const REGS_PER_GROUP: usize = 3;
/// Data REs a PHICH mapping unit carries (3 REGs * 4 REs/REG).
pub const NOF_SYMBOLS: usize = REGS_PER_GROUP * crate::table::RE_PER_REG;

/// A cell's PHICH mapping units, plus the CP-driven group count the API
/// exposes to callers (36.211 §6.9: Extended CP doubles the user-visible
/// group count relative to the number of physically distinct mapping units).
#[derive(Debug, Clone)]
pub struct PhichAllocation {
    /// REG indices `[i0, i1, i2]` for each mapping unit, in symbols
    /// `[0, 1, 2]` (Extended PHICH length) or all in symbol 0 (Normal).
    mapping_units: Vec<[usize; REGS_PER_GROUP]>,
    nof_groups: usize,
}

/// Exact-integer mapping-unit count: `ceil(Ng * nof_prb / 8)`, computed over
/// `Ng` expressed in sixths (`Ng*6`) to avoid the reference implementation's
/// `ceilf` floating-point rounding, while producing the identical integer
/// result for every standard `Ng` value (1/6, 1/2, 1, 2).
fn nof_mapping_units(ng_sixths: u32, nof_prb: u32) -> usize {
    let numerator = ng_sixths * nof_prb;
    ((numerator + 47) / 48) as usize
}

impl PhichAllocation {
    /// Allocate PHICH mapping units from the REGs PCFICH left unassigned.
    ///
    /// Steps follow 36.211 §6.9.3 / the reference implementation's
    /// `regs_phich_init`: count and number (by ascending frequency) the
    /// unassigned REGs in control symbols 0, 1, 2; then for each mapping unit
    /// `mi` and REG position `i` in `0..3`, select REG `ni` from symbol `li`
    /// (`li = i` for Extended length, else `0`) via
    /// `ni = (cell_id*n[li]/n[0] + mi + i*n[li]/3) mod n[li]`.
    pub fn allocate(cell: &CellParameters, table: &mut RegTable) -> Result<Self, RegError> {
        let nof_mapping = nof_mapping_units(cell.phich_res.sixths(), cell.nof_prb as u32);

        let mut unassigned: [Vec<usize>; 3] = [Vec::new(), Vec::new(), Vec::new()];
        for (idx, reg) in table.iter() {
            let l = reg.l as usize;
            if l < 3 && !reg.is_assigned() {
                unassigned[l].push(idx);
            }
        }
        let n: [usize; 3] = [
            unassigned[0].len(),
            unassigned[1].len(),
            unassigned[2].len(),
        ];
        if n[0] == 0 {
            return Err(RegError::AllocationConflict(
                "no unassigned REGs available in control symbol 0 for PHICH".to_string(),
            ));
        }

        let mut mapping_units = Vec::with_capacity(nof_mapping);
        let cell_id = cell.cell_id.value() as usize;
        for mi in 0..nof_mapping {
            let mut regs = [0usize; REGS_PER_GROUP];
            for (i, slot) in regs.iter_mut().enumerate() {
                let li = if cell.phich_len == common::PhichLength::Extended {
                    i
                } else {
                    0
                };
                if n[li] == 0 {
                    return Err(RegError::AllocationConflict(format!(
                        "no unassigned REGs left in control symbol {li} for PHICH"
                    )));
                }
                let ni = (cell_id * n[li] / n[0] + mi + i * n[li] / 3) % n[li];
                let idx = unassigned[li][ni];
                if table.is_assigned(idx) {
                    return Err(RegError::AllocationConflict(format!(
                        "PHICH REG at index {idx} already allocated"
                    )));
                }
                table.assign(idx);
                *slot = idx;
                debug!(mapping_unit = mi, reg = i, symbol = li, "assigned PHICH REG");
            }
            mapping_units.push(regs);
        }

        let nof_groups = if cell.cp == CyclicPrefix::Extended {
            nof_mapping * 2
        } else {
            nof_mapping
        };

        Ok(Self {
            mapping_units,
            nof_groups,
        })
    }

    /// Number of PHICH groups visible to callers (may be double the number
    /// of physically distinct mapping units, under Extended cyclic prefix).
    pub fn nof_groups(&self) -> usize {
        self.nof_groups
    }

    /// Map a caller-visible group index to its underlying mapping unit.
    fn mapping_unit_index(&self, group: usize, cp: CyclicPrefix) -> Result<usize, RegError> {
        if group >= self.nof_groups {
            return Err(RegError::InvalidGroup(group));
        }
        Ok(if cp == CyclicPrefix::Extended {
            group / 2
        } else {
            group
        })
    }

    pub(crate) fn reg_indices(
        &self,
        group: usize,
        cp: CyclicPrefix,
    ) -> Result<&[usize; REGS_PER_GROUP], RegError> {
        let mi = self.mapping_unit_index(group, cp)?;
        Ok(&self.mapping_units[mi])
    }

    /// All caller-visible groups whose underlying mapping unit is reset
    /// together, per `regs_phich_reset`'s `ngroup += 2` stride under
    /// Extended CP (each mapping unit backs two adjacent groups, but the
    /// reset loop only visits the first of each pair since resetting the
    /// REGs is idempotent regardless of which group index was used).
    pub(crate) fn reset_stride(&self, cp: CyclicPrefix) -> usize {
        if cp == CyclicPrefix::Extended {
            2
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{AntennaPorts, CellId, PhichResource};

    fn cell(
        cell_id: u16,
        nof_prb: u16,
        cp: CyclicPrefix,
        phich_len: common::PhichLength,
        phich_res: PhichResource,
    ) -> CellParameters {
        CellParameters::new(
            CellId::new(cell_id).unwrap(),
            nof_prb,
            AntennaPorts::new(2).unwrap(),
            cp,
            phich_len,
            phich_res,
        )
        .unwrap()
    }

    #[test]
    fn mapping_unit_count_matches_ceiling_division() {
        assert_eq!(nof_mapping_units(PhichResource::One.sixths(), 25), 4);
        assert_eq!(nof_mapping_units(PhichResource::OneSixth.sixths(), 25), 1);
        assert_eq!(nof_mapping_units(PhichResource::Two.sixths(), 25), 7);
        assert_eq!(nof_mapping_units(PhichResource::OneHalf.sixths(), 100), 7);
    }

    #[test]
    fn normal_cp_groups_equal_mapping_units() {
        let c = cell(
            1,
            25,
            CyclicPrefix::Normal,
            common::PhichLength::Normal,
            PhichResource::One,
        );
        let mut table = RegTable::build(&c).unwrap();
        let pcfich = crate::pcfich::PcfichAllocation::allocate(&c, &mut table).unwrap();
        let _ = pcfich;
        let phich = PhichAllocation::allocate(&c, &mut table).unwrap();
        assert_eq!(phich.nof_groups(), 4);
    }

    #[test]
    fn extended_cp_doubles_group_count() {
        let c = cell(
            1,
            25,
            CyclicPrefix::Extended,
            common::PhichLength::Normal,
            PhichResource::One,
        );
        let mut table = RegTable::build(&c).unwrap();
        crate::pcfich::PcfichAllocation::allocate(&c, &mut table).unwrap();
        let phich = PhichAllocation::allocate(&c, &mut table).unwrap();
        assert_eq!(phich.nof_groups(), 8);
        // Adjacent groups 0 and 1 must share the same underlying mapping unit.
        let r0 = phich.reg_indices(0, CyclicPrefix::Extended).unwrap();
        let r1 = phich.reg_indices(1, CyclicPrefix::Extended).unwrap();
        assert_eq!(r0, r1);
    }

    #[test]
    fn phich_regs_disjoint_from_pcfich() {
        let c = cell(
            1,
            25,
            CyclicPrefix::Normal,
            common::PhichLength::Normal,
            PhichResource::One,
        );
        let mut table = RegTable::build(&c).unwrap();
        let pcfich = crate::pcfich::PcfichAllocation::allocate(&c, &mut table).unwrap();
        let phich = PhichAllocation::allocate(&c, &mut table).unwrap();
        let pcfich_set: std::collections::HashSet<_> = pcfich.reg_indices.iter().collect();
        for mi in &phich.mapping_units {
            for idx in mi {
                assert!(!pcfich_set.contains(idx));
            }
        }
    }

    #[test]
    fn invalid_group_index_is_rejected() {
        let c = cell(
            1,
            25,
            CyclicPrefix::Normal,
            common::PhichLength::Normal,
            PhichResource::One,
        );
        let mut table = RegTable::build(&c).unwrap();
        crate::pcfich::PcfichAllocation::allocate(&c, &mut table).unwrap();
        let phich = PhichAllocation::allocate(&c, &mut table).unwrap();
        let err = phich
            .reg_indices(phich.nof_groups(), CyclicPrefix::Normal)
            .unwrap_err();
        assert_eq!(err, RegError::InvalidGroup(phich.nof_groups()));
    }
}
