//! Transformation pipeline: the three cleaning stages the Preprocessing tab
//! drives. Each stage takes the current table by reference and returns a new
//! table (or a typed error), so a failed stage never leaves the session
//! table partially mutated. Stages compose in any order and are idempotent
//! on already-conforming data.

pub mod convert;
pub mod filter;
pub mod missing;
