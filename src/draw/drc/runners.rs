//! DRC runner
//!
//! Samples every resolvable trace, then checks all unordered trace pairs
//! and every trace against every component's pads. Sampling and checking
//! fan out over Rayon, but results are collected in scan order so the
//! marker list and the invalid set are deterministic.
//!
//! Cost is O(T² · N²) for trace pairs plus O(T · P · N) for pads with N
//! samples per trace. Fine for hundreds of traces, not for thousands.

use rayon::prelude::*;
use std::time::Instant;

use super::checks::{check_trace_pads, check_trace_pair};
use super::distance::SampledTrace;
use super::types::{DesignRules, DrcReport, DrcStatus, DrcViolation};
use crate::draw::curve::CubicBezier;
use crate::draw::geometry::{Board, ResolvedPin};

/// Sample every trace whose endpoints resolve; dangling traces are skipped
pub fn sample_traces(board: &Board, sample_count: usize) -> Vec<SampledTrace> {
    board
        .traces()
        .par_iter()
        .filter_map(|trace| {
            let Some((start, end)) = board.trace_endpoints(trace) else {
                tracing::debug!("[DRC] Trace '{}' has a dangling endpoint, skipping", trace.id);
                return None;
            };
            let points = CubicBezier::for_trace(start, end, Some(trace)).sample(sample_count);
            Some(SampledTrace::new(trace.id.clone(), trace.from.clone(), trace.to.clone(), points))
        })
        .collect()
}

/// Run a full DRC pass over one board snapshot
pub fn run_drc(board: &Board, rules: &DesignRules) -> DrcReport {
    let start = Instant::now();
    let clearance = rules.clearance;

    let sampled = sample_traces(board, rules.sample_count);

    // Trace vs trace, each unordered pair once (i < j)
    let pair_violations: Vec<DrcViolation> = (0..sampled.len())
        .into_par_iter()
        .flat_map_iter(|i| {
            let a = &sampled[i];
            sampled[i + 1..]
                .iter()
                .filter_map(move |b| check_trace_pair(a, b, clearance))
        })
        .collect();

    // Trace vs pads, component-major
    let component_pins: Vec<Vec<ResolvedPin>> = board
        .components()
        .par_iter()
        .map(|c| board.pins_of(c))
        .collect();

    let pad_violations: Vec<DrcViolation> = component_pins
        .par_iter()
        .flat_map_iter(|pins| {
            sampled
                .iter()
                .filter_map(move |trace| check_trace_pads(trace, pins, clearance))
        })
        .collect();

    let mut report = assemble_report(
        pair_violations.into_iter().chain(pad_violations),
        board.traces().len(),
        rules,
    );
    report.elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    tracing::info!(
        "[DRC] Checked {} traces ({} sampled): {} violations, {} invalid traces in {:.2}ms",
        board.traces().len(),
        sampled.len(),
        report.violations.len(),
        report.invalid_trace_ids.len(),
        report.elapsed_ms
    );

    report
}

/// Fold violations into a report, keeping only the first `max_markers` markers
fn assemble_report(
    violations: impl IntoIterator<Item = DrcViolation>,
    trace_count: usize,
    rules: &DesignRules,
) -> DrcReport {
    let mut report = DrcReport {
        clearance: rules.clearance,
        ..DrcReport::default()
    };

    for violation in violations {
        for id in violation.trace_ids() {
            report.invalid_trace_ids.insert(id.to_string());
        }
        if report.markers.len() < rules.max_markers {
            report.markers.push(violation.location);
        }
        report.violations.push(violation);
    }

    if report.markers.len() < report.violations.len() {
        tracing::debug!(
            "[DRC] Marker cap reached: {} of {} violations marked",
            report.markers.len(),
            report.violations.len()
        );
    }

    report.status = if !report.invalid_trace_ids.is_empty() {
        DrcStatus::Fail
    } else if trace_count > 0 {
        DrcStatus::Pass
    } else {
        DrcStatus::None
    };

    report
}
