//! Data layer: core types, loading, and export.
//!
//! Architecture:
//! ```text
//!  .csv / .xlsx / .json
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → Table
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  Table    │  Vec<Column>, typed cells
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  export   │  Table → .csv / .xlsx / .json
//!   └──────────┘
//! ```

pub mod export;
pub mod loader;
pub mod model;
