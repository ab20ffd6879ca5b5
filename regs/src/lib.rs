//! REG-mapping core for LTE downlink control channels.
//!
//! Indexes, allocates, and maps PCFICH, PHICH, and PDCCH onto a subframe's
//! control region per 3GPP TS 36.211 §6.2.4 (REG enumeration), §6.7.4
//! (PCFICH mapping), §6.9.3 (PHICH mapping), and §6.8.5 (PDCCH mapping).

pub mod cell;
pub mod control;
pub mod error;
pub mod io;
pub mod pcfich;
pub mod pdcch;
pub mod phich;
pub mod table;

pub use cell::CellParameters;
pub use control::ControlChannels;
pub use error::RegError;
pub use table::{Reg, RegTable};
