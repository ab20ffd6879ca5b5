//! Common Types for LTE Cell Configuration
//!
//! Defines the validated newtypes and enums that parameterise a cell's
//! downlink control-channel REG mapping (3GPP TS 36.211 §6.2.4, §6.7.4,
//! §6.8.5, §6.9.3).

use serde::{Deserialize, Serialize};

/// Physical Cell Identity (PCI) for an LTE cell.
///
/// Legal range is `0..=503` (`3 * 168` physical-layer cell identities, unlike
/// NR's wider `0..=1007`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellId(u16);

impl CellId {
    /// Maximum valid cell ID value.
    pub const MAX: u16 = 503;

    /// Create a new cell ID, validating the range.
    pub fn new(value: u16) -> Option<Self> {
        if value <= Self::MAX {
            Some(Self(value))
        } else {
            None
        }
    }

    /// The underlying integer value.
    pub fn value(&self) -> u16 {
        self.0
    }
}

/// Antenna port count used by the control region.
///
/// Only 1, 2, and 4 ports are defined by 36.211 §6.2.4; any other value has
/// no REG-per-symbol mapping and is rejected by [`AntennaPorts::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AntennaPorts(u8);

impl AntennaPorts {
    pub fn new(value: u8) -> Option<Self> {
        match value {
            1 | 2 | 4 => Some(Self(value)),
            _ => None,
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

/// Cyclic prefix length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CyclicPrefix {
    /// 7 OFDM symbols per slot.
    Normal,
    /// 6 OFDM symbols per slot.
    Extended,
}

/// PHICH duration, 36.211 §6.9.
///
/// Distinct from [`CyclicPrefix`]: this controls which OFDM symbol each of a
/// PHICH mapping unit's three REGs is drawn from, while `CyclicPrefix`
/// separately controls how many user-visible PHICH groups a mapping unit
/// expands to. The two "Extended" switches are independent cell parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhichLength {
    Normal,
    Extended,
}

/// PHICH resource fraction `Ng`, 36.211 §6.9.3.
///
/// Represented in sixths internally so the mapping-unit count can be derived
/// with exact integer arithmetic instead of floating-point `ceil`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhichResource {
    OneSixth,
    OneHalf,
    One,
    Two,
}

impl PhichResource {
    /// `Ng` expressed as a multiple of 1/6, i.e. `Ng * 6`.
    pub fn sixths(&self) -> u32 {
        match self {
            PhichResource::OneSixth => 1,
            PhichResource::OneHalf => 3,
            PhichResource::One => 6,
            PhichResource::Two => 12,
        }
    }

    /// `Ng` as a floating-point fraction, for display purposes only.
    pub fn as_f32(&self) -> f32 {
        self.sixths() as f32 / 6.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_id_validation() {
        assert!(CellId::new(0).is_some());
        assert!(CellId::new(503).is_some());
        assert!(CellId::new(504).is_none());
    }

    #[test]
    fn test_antenna_ports_validation() {
        assert!(AntennaPorts::new(1).is_some());
        assert!(AntennaPorts::new(2).is_some());
        assert!(AntennaPorts::new(4).is_some());
        assert!(AntennaPorts::new(3).is_none());
        assert!(AntennaPorts::new(0).is_none());
    }

    #[test]
    fn test_phich_resource_sixths() {
        assert_eq!(PhichResource::OneSixth.sixths(), 1);
        assert_eq!(PhichResource::OneHalf.sixths(), 3);
        assert_eq!(PhichResource::One.sixths(), 6);
        assert_eq!(PhichResource::Two.sixths(), 12);
    }
}
