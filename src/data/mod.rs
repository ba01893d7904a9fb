//! Data layer: traces, grids and multi-trace sets.
//!
//! Architecture:
//! ```text
//!   caller-owned x / y slices
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  Trace    │  validated, borrowed view (ascending x)
//!   └──────────┘
//!        │            ┌──────────┐
//!        ├──────────▶ │   Grid    │  start, end, count → dx
//!        ▼            └──────────┘
//!   ┌──────────┐
//!   │ TraceSet  │  concatenated traces + offset table (batch layer)
//!   └──────────┘
//! ```

pub mod model;
