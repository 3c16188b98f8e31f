//! Pure orbital logistics logic for Kolony.
//!
//! This crate contains the resource bookkeeping behind vessel-to-vessel
//! transfers and converter status displays. Functions take plain vessel data
//! and return results, so everything here is unit-testable without a game
//! engine. Vessels are either loaded (live part fields) or packed (text
//! snapshots); every read and write goes through the same storage-unit
//! capability, and both modes produce identical results.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`aggregate`] | Group resource records by identity and sum them |
//! | [`balance`] | Full outer join of production and consumption |
//! | [`error`] | Error types for reads, exchanges and transfers |
//! | [`exchange`] | Add or remove a resource across a vessel's storage units |
//! | [`production`] | Efficiency-scaled converter input/output rates |
//! | [`reader`] | Resource names, amounts and capacities in either mode |
//! | [`resource`] | Resource identity and amount records |
//! | [`snapshot`] | Packed-vessel name/value nodes and the amount text codec |
//! | [`storage`] | Storage-unit capability for live and snapshot resources |
//! | [`transfer`] | Transfer rules, request validation and execution |
//! | [`vessel`] | Vessel adapter: parts, snapshots, representation mode |

pub mod aggregate;
pub mod balance;
pub mod error;
pub mod exchange;
pub mod production;
pub mod reader;
pub mod resource;
pub mod snapshot;
pub mod storage;
pub mod transfer;
pub mod vessel;

pub use error::{LogisticsError, Result};
pub use resource::{ResourceId, ResourceRecord};
