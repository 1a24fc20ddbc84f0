//! # illusion-core
//!
//! Colored graph model shared by the illusion evaluator and the regular
//! illusion-graph synthesizer.
//!
//! - **Types**: `Graph` (directed or undirected), `Coloring`, `Color`, `ColorClass`
//! - **Errors**: `IllusionError` with the crate-wide `Result` alias
//! - **DIMACS**: loading external graphs for evaluation
//!
//! ```text
//! ┌─────────────────┐
//! │  illusion-core  │  ← graph + coloring model
//! └─────────────────┘
//!         ▲
//!    ┌────┴────────────┐
//! ┌──▼────────────┐ ┌──▼─────────────┐
//! │ illusion-eval │ │ illusion-synth │
//! └───────────────┘ └────────────────┘
//!         ▲                 ▲
//!         └────────┬────────┘
//!         ┌────────▼────────┐
//!         │  illusion-cli   │
//!         └─────────────────┘
//! ```

pub mod dimacs;
pub mod errors;
pub mod types;

pub use errors::{IllusionError, Result};
pub use types::{Color, ColorClass, Coloring, Graph, GraphKind, GraphStats, NodeId};
