//! Server state management for the editing server
//!
//! The state owns the currently published `Board`. Handlers build a new
//! snapshot and hand it to `publish`, which swaps it in whole and tells the
//! DRC scheduler that something changed.

use crate::config::EngineConfig;
use crate::draw::drc::{run_drc, DesignRules, DrcReport, DrcScheduler};
use crate::draw::geometry::{Board, FootprintLibrary};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

pub struct ServerState {
    pub project_path: Option<PathBuf>,
    pub config: EngineConfig,
    pub design_rules: DesignRules,
    pub scheduler: DrcScheduler,
    pub last_report: Option<DrcReport>,
    library: Arc<FootprintLibrary>,
    board: Board,
    loaded: bool,
}

impl ServerState {
    pub fn new(config: EngineConfig) -> Self {
        let library = Arc::new(FootprintLibrary::builtin());
        Self {
            project_path: None,
            design_rules: DesignRules::from_config(&config),
            scheduler: DrcScheduler::new(config.settle_duration()),
            config,
            last_report: None,
            board: Board::new(Arc::clone(&library), Vec::new(), Vec::new()),
            library,
            loaded: false,
        }
    }

    pub fn is_project_loaded(&self) -> bool {
        self.loaded
    }

    pub fn library(&self) -> Arc<FootprintLibrary> {
        Arc::clone(&self.library)
    }

    /// The published snapshot
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Swap in a new snapshot and schedule validation
    pub fn publish(&mut self, board: Board) {
        self.publish_at(board, Instant::now());
    }

    pub fn publish_at(&mut self, board: Board, now: Instant) {
        self.board = board;
        self.scheduler.notify_change(now);
    }

    /// Replace the whole project (Load or New)
    pub fn open(&mut self, board: Board, path: Option<PathBuf>, now: Instant) {
        self.project_path = path;
        self.last_report = None;
        self.loaded = true;
        self.publish_at(board, now);
    }

    /// Drop the project and any pending DRC run
    pub fn close(&mut self) {
        self.project_path = None;
        self.last_report = None;
        self.loaded = false;
        self.scheduler.cancel();
        self.board = Board::new(Arc::clone(&self.library), Vec::new(), Vec::new());
    }

    /// Run DRC right away on the published snapshot
    pub fn run_drc_now(&mut self) -> &DrcReport {
        let rules = self.design_rules.clone();
        self.run_drc_with(&rules)
    }

    /// Run DRC right away with one-off rules; scheduled runs keep the
    /// configured rules
    pub fn run_drc_with(&mut self, rules: &DesignRules) -> &DrcReport {
        self.scheduler.cancel();
        let report = run_drc(&self.board, rules);
        self.last_report.insert(report)
    }

    /// Run the scheduled DRC pass if it is due; returns the fresh report
    pub fn poll_drc(&mut self, now: Instant) -> Option<&DrcReport> {
        let board = self.board.clone();
        let rules = self.design_rules.clone();
        let report = self.scheduler.run_if_due(now, || run_drc(&board, &rules))?;
        Some(self.last_report.insert(report))
    }

    /// When the pending DRC run becomes due
    pub fn next_drc_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
