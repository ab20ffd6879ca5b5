use thiserror::Error;

/// Errors surfaced by the REG-mapping core.
///
/// The core never retries internally and never panics on caller-supplied
/// data; every failure mode named in 3GPP TS 36.211 §6.2.4/§6.7.4/§6.8.5/§6.9.3
/// construction and per-subframe CFI selection is represented here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegError {
    /// Out-of-range cell ID, PRB count, port count, or CFI value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A PCFICH REG lookup missed the table, or targeted an already-assigned
    /// REG. Should be unreachable if the REG enumerator is correct; this is
    /// an integrity check, not an expected runtime condition.
    #[error("allocation conflict: {0}")]
    AllocationConflict(String),

    /// `pdcch_put`/`pdcch_get` called before `set_cfi`.
    #[error("active CFI not set; call set_cfi() first")]
    CfiNotSet,

    /// A PHICH operation referenced a group index outside `0..n_groups()`.
    #[error("invalid PHICH group index {0}")]
    InvalidGroup(usize),

    /// `set_cfi` called with a CFI below the minimum required by an
    /// Extended-length PHICH (36.211 §6.9: at least 3 control symbols must
    /// be available for PHICH REGs in symbols 0..2 to exist).
    #[error("PHICH length is extended; CFI must be at least {min_cfi}")]
    PhichLengthConflict { min_cfi: u8 },
}
