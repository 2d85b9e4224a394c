//! Immutable board snapshot
//!
//! A `Board` bundles the footprint library with the component and trace
//! collections behind `Arc`s. Edits never touch a published snapshot; they
//! build a new collection and swap it in with `with_components` /
//! `with_traces`, so a renderer or DRC run holding the old `Board` keeps a
//! consistent view.

use super::library::FootprintLibrary;
use super::transform::global_pos;
use super::types::{Component, ComponentKind, Footprint, PinRef, PinType, Trace, Vector2};
use std::collections::HashMap;
use std::sync::Arc;

/// A pin resolved to its board-global position
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPin {
    pub pin_ref: PinRef,
    pub position: Vector2,
    pub pin_type: PinType,
    pub on_junction: bool,
}

#[derive(Debug, Clone)]
pub struct Board {
    library: Arc<FootprintLibrary>,
    components: Arc<Vec<Component>>,
    traces: Arc<Vec<Trace>>,
    component_index: Arc<HashMap<String, usize>>,
}

impl Board {
    pub fn new(library: Arc<FootprintLibrary>, components: Vec<Component>, traces: Vec<Trace>) -> Self {
        let component_index = Arc::new(index_components(&components));
        Self {
            library,
            components: Arc::new(components),
            traces: Arc::new(traces),
            component_index,
        }
    }

    /// Empty board over the built-in library
    pub fn empty() -> Self {
        Self::new(Arc::new(FootprintLibrary::builtin()), Vec::new(), Vec::new())
    }

    pub fn library(&self) -> &FootprintLibrary {
        &self.library
    }

    pub fn library_arc(&self) -> Arc<FootprintLibrary> {
        Arc::clone(&self.library)
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn traces(&self) -> &[Trace] {
        &self.traces
    }

    /// New snapshot with a replaced component collection
    pub fn with_components(&self, components: Vec<Component>) -> Board {
        Board {
            library: Arc::clone(&self.library),
            component_index: Arc::new(index_components(&components)),
            components: Arc::new(components),
            traces: Arc::clone(&self.traces),
        }
    }

    /// New snapshot with a replaced trace collection
    pub fn with_traces(&self, traces: Vec<Trace>) -> Board {
        Board {
            library: Arc::clone(&self.library),
            components: Arc::clone(&self.components),
            traces: Arc::new(traces),
            component_index: Arc::clone(&self.component_index),
        }
    }

    /// True if both snapshots share the same trace allocation
    pub fn same_traces(&self, other: &Board) -> bool {
        Arc::ptr_eq(&self.traces, &other.traces)
    }

    pub fn component(&self, id: &str) -> Option<&Component> {
        self.component_index.get(id).map(|&i| &self.components[i])
    }

    pub fn trace(&self, id: &str) -> Option<&Trace> {
        self.traces.iter().find(|t| t.id == id)
    }

    /// Footprint backing a component (junctions use the system footprint)
    pub fn footprint_for(&self, component: &Component) -> Option<&Footprint> {
        match &component.kind {
            ComponentKind::Part { footprint_id } => self.library.get(footprint_id),
            ComponentKind::Junction { .. } => Some(self.library.junction()),
        }
    }

    /// Global position of a pin, or `None` when the reference dangles
    pub fn pin_position(&self, pin_ref: &PinRef) -> Option<Vector2> {
        let component = self.component(&pin_ref.component_id)?;
        let footprint = self.footprint_for(component)?;
        let pin = footprint.pin(&pin_ref.pin_id)?;
        Some(global_pos(component, pin, Some(footprint)))
    }

    /// Both endpoint positions of a trace, `None` if either end dangles
    pub fn trace_endpoints(&self, trace: &Trace) -> Option<(Vector2, Vector2)> {
        let start = self.pin_position(&trace.from)?;
        let end = self.pin_position(&trace.to)?;
        Some((start, end))
    }

    /// All pins of one component; empty if its footprint is unknown
    pub fn pins_of(&self, component: &Component) -> Vec<ResolvedPin> {
        let Some(footprint) = self.footprint_for(component) else {
            tracing::warn!(
                "[Board] Component '{}' has no resolvable footprint, skipping its pins",
                component.id
            );
            return Vec::new();
        };
        footprint
            .pins
            .iter()
            .map(|pin| ResolvedPin {
                pin_ref: PinRef::new(component.id.clone(), pin.id.clone()),
                position: global_pos(component, pin, Some(footprint)),
                pin_type: pin.pin_type,
                on_junction: component.is_junction(),
            })
            .collect()
    }

    /// Every resolvable pin on the board, component order then pin order
    pub fn resolved_pins(&self) -> Vec<ResolvedPin> {
        self.components.iter().flat_map(|c| self.pins_of(c)).collect()
    }

    /// Indices of traces attached to `pin`
    pub fn traces_at(&self, pin: &PinRef) -> Vec<usize> {
        self.traces
            .iter()
            .enumerate()
            .filter(|(_, t)| t.touches(pin))
            .map(|(i, _)| i)
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

fn index_components(components: &[Component]) -> HashMap<String, usize> {
    components
        .iter()
        .enumerate()
        .map(|(i, c)| (c.id.clone(), i))
        .collect()
}
