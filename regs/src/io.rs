//! REG-level data transfer between IQ payload buffers and a subframe's
//! resource grid.
//!
//! The grid is a flat, caller-owned `[Complex32]` slice of one slot (or
//! subframe, at the caller's convention) indexed by `k + l * stride`, where
//! `stride = 12 * nof_prb`. This core never owns or allocates the grid.

use num_complex::Complex32;

use crate::table::{Reg, RE_PER_REG};

fn index(reg: &Reg, re: usize, stride: usize) -> usize {
    reg.k[re] as usize + reg.l as usize * stride
}

/// Write `payload` (4 symbols) into the grid at `reg`'s four REs, overwriting
/// whatever was there. Mirrors `regs_put_reg`.
pub fn put_reg(reg: &Reg, payload: &[Complex32; RE_PER_REG], grid: &mut [Complex32], stride: usize) {
    for (re, &value) in payload.iter().enumerate() {
        grid[index(reg, re, stride)] = value;
    }
}

/// Add `payload` into the grid at `reg`'s four REs, accumulating onto
/// whatever was there. Mirrors `regs_add_reg`; used for PHICH, where several
/// UEs' codewords can be superimposed onto the same PHICH group.
pub fn add_reg(reg: &Reg, payload: &[Complex32; RE_PER_REG], grid: &mut [Complex32], stride: usize) {
    for (re, &value) in payload.iter().enumerate() {
        grid[index(reg, re, stride)] += value;
    }
}

/// Zero `reg`'s four REs in the grid. Mirrors `regs_reset_reg`.
pub fn reset_reg(reg: &Reg, grid: &mut [Complex32], stride: usize) {
    for re in 0..RE_PER_REG {
        grid[index(reg, re, stride)] = Complex32::new(0.0, 0.0);
    }
}

/// Read `reg`'s four REs out of the grid into `out`. Mirrors `regs_get_reg`.
pub fn get_reg(reg: &Reg, grid: &[Complex32], out: &mut [Complex32; RE_PER_REG], stride: usize) {
    for (re, slot) in out.iter_mut().enumerate() {
        *slot = grid[index(reg, re, stride)];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Reg;

    fn reg(l: u8, k: [u16; 4]) -> Reg {
        Reg { l, k0: k[0], k, assigned: false }
    }

    #[test]
    fn put_then_get_round_trips() {
        let stride = 72;
        let mut grid = vec![Complex32::new(0.0, 0.0); stride * 3];
        let r = reg(1, [5, 6, 7, 8]);
        let payload = [
            Complex32::new(1.0, -1.0),
            Complex32::new(2.0, 0.0),
            Complex32::new(0.0, 3.0),
            Complex32::new(-4.0, -4.0),
        ];
        put_reg(&r, &payload, &mut grid, stride);
        let mut out = [Complex32::new(0.0, 0.0); 4];
        get_reg(&r, &grid, &mut out, stride);
        assert_eq!(out, payload);
    }

    #[test]
    fn add_accumulates_onto_existing_content() {
        let stride = 72;
        let mut grid = vec![Complex32::new(1.0, 1.0); stride];
        let r = reg(0, [0, 1, 2, 3]);
        let payload = [Complex32::new(1.0, 0.0); 4];
        add_reg(&r, &payload, &mut grid, stride);
        let mut out = [Complex32::new(0.0, 0.0); 4];
        get_reg(&r, &grid, &mut out, stride);
        assert_eq!(out, [Complex32::new(2.0, 1.0); 4]);
    }

    #[test]
    fn reset_zeroes_only_the_regs_res() {
        let stride = 72;
        let mut grid = vec![Complex32::new(1.0, 1.0); stride];
        let r = reg(0, [4, 5, 6, 7]);
        reset_reg(&r, &mut grid, stride);
        let mut out = [Complex32::new(0.0, 0.0); 4];
        get_reg(&r, &grid, &mut out, stride);
        assert_eq!(out, [Complex32::new(0.0, 0.0); 4]);
        assert_eq!(grid[0], Complex32::new(1.0, 1.0));
    }
}
