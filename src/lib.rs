//! CircuitFlow editing core
//!
//! Board model, cubic trace curves, clearance checking with a debounced
//! scheduler, tangent continuity at junctions, project persistence and
//! G-code / SVG export. The `lsp` module exposes all of it as a
//! line-delimited JSON-RPC server.
//!
//! # Example
//! ```ignore
//! use circuitflow::project::load_project_file;
//! use circuitflow::draw::drc::{run_drc, DesignRules};
//! use circuitflow::draw::geometry::FootprintLibrary;
//! use std::sync::Arc;
//!
//! let project = load_project_file("board.json")?;
//! let board = project.into_board(Arc::new(FootprintLibrary::builtin()));
//! let report = run_drc(&board, &DesignRules::with_grid_unit(25.4));
//! println!("{} violations", report.violations.len());
//! ```

pub mod config;
pub mod draw;
pub mod error;
pub mod export;
pub mod lsp;
pub mod project;

pub use config::EngineConfig;
pub use draw::geometry::{Board, FootprintLibrary, Vector2};
pub use error::{ProjectError, ProjectResult};
pub use project::Project;
