//! `CellScenario` — vicinity-driven assembly of a cellular coupled model.
//!
//! # Assembly contract
//!
//! Registration and synthesis are separate phases, enforced by the type
//! system: [`add_cell`][CellScenario::add_cell] takes `&mut self`, while
//! [`couple_cells`][CellScenario::couple_cells] consumes the scenario.
//! Coupling twice or registering after coupling therefore does not
//! compile, and a vicinity entry that names a never-registered neighbor
//! fails with an `UnknownReference` error instead of being silently
//! dropped.

use std::fmt;
use std::hash::Hash;

use pdevs_core::SimTime;
use pdevs_engine::{CoupledBuilder, Simulator};
use pdevs_model::AtomicModel;
use rustc_hash::FxHashMap;

use crate::{CellError, CellResult};

/// Requirements on a cell identifier: map key (`Eq + Hash`), cloneable,
/// and printable so it can be composed into a model name.
pub trait CellId: Eq + Hash + Clone + fmt::Display + 'static {}

impl<C: Eq + Hash + Clone + fmt::Display + 'static> CellId for C {}

/// Neighbor id → vicinity value, for one target cell.
pub type VicinityMap<C, V> = FxHashMap<C, V>;

/// Factory invoked once per registered cell to produce its atomic model.
///
/// Receives the cell's id, its initial state, and its vicinity map so the
/// behavior can weight neighbor contributions.
pub type CellFactory<T, C, S, V> =
    Box<dyn Fn(&C, S, &VicinityMap<C, V>) -> Box<dyn AtomicModel<T>>>;

/// Builder for a Cell-DEVS scenario.
///
/// Cells are registered one by one with their vicinity (or a plain
/// neighbor list); `couple_cells` then synthesizes one internal coupling
/// per `(target, neighbor)` pair, from the neighbor's sole output port to
/// the target's sole input port.
pub struct CellScenario<T, C, S, V>
where
    T: SimTime,
    C: CellId,
{
    id: String,
    inner: CoupledBuilder<T>,
    /// Target cell id → its vicinity map.  Populated during assembly,
    /// consumed exactly once by `couple_cells`.
    vicinities: FxHashMap<C, VicinityMap<C, V>>,
    /// Cell id → (sole input port, sole output port) of its model.
    ports: FxHashMap<C, (String, String)>,
    factory: CellFactory<T, C, S, V>,
}

impl<T, C, S, V> CellScenario<T, C, S, V>
where
    T: SimTime,
    C: CellId,
    S: 'static,
    V: Clone + 'static,
{
    /// A scenario named `id` whose cells are produced by `factory`.
    pub fn new<F>(id: &str, factory: F) -> Self
    where
        F: Fn(&C, S, &VicinityMap<C, V>) -> Box<dyn AtomicModel<T>> + 'static,
    {
        Self {
            id: id.to_string(),
            inner: CoupledBuilder::new(id),
            vicinities: FxHashMap::default(),
            ports: FxHashMap::default(),
            factory: Box::new(factory),
        }
    }

    /// Register one cell with an explicit vicinity map.
    ///
    /// Fails with [`CellError::DuplicateCell`] if `cell_id` is already
    /// present; the check precedes every mutation, so a failed call
    /// leaves the scenario exactly as it was.
    pub fn add_cell(
        &mut self,
        cell_id: C,
        initial_state: S,
        vicinity: VicinityMap<C, V>,
    ) -> CellResult<()> {
        if self.vicinities.contains_key(&cell_id) {
            return Err(CellError::DuplicateCell(cell_id.to_string()));
        }

        let name = self.cell_name(&cell_id);
        let model = (self.factory)(&cell_id, initial_state, &vicinity);
        let inputs = model.input_ports();
        let outputs = model.output_ports();
        if inputs.len() != 1 || outputs.len() != 1 {
            return Err(CellError::InvalidCellInterface {
                id: cell_id.to_string(),
                inputs: inputs.len(),
                outputs: outputs.len(),
            });
        }

        self.inner
            .add_component(Box::new(Simulator::new(&name, model)))?;
        self.ports.insert(
            cell_id.clone(),
            (inputs[0].name().to_string(), outputs[0].name().to_string()),
        );
        self.vicinities.insert(cell_id, vicinity);
        Ok(())
    }

    /// Convenience: register a cell given only its adjacency, assigning
    /// the default vicinity value to every listed neighbor.
    pub fn add_cell_with_neighbors(
        &mut self,
        cell_id: C,
        initial_state: S,
        neighbors: &[C],
    ) -> CellResult<()>
    where
        V: Default,
    {
        let mut vicinity = VicinityMap::default();
        for neighbor in neighbors {
            vicinity.insert(neighbor.clone(), V::default());
        }
        self.add_cell(cell_id, initial_state, vicinity)
    }

    /// Synthesize the coupling graph and hand back the underlying
    /// [`CoupledBuilder`], ready for [`build`][CoupledBuilder::build].
    ///
    /// For every registered target cell and every `(neighbor, vicinity)`
    /// entry in its map, exactly one internal coupling is created from
    /// the neighbor's sole output port to the target's sole input port.
    /// Consumes the scenario: cells cannot be added afterwards and the
    /// synthesis cannot run twice.
    pub fn couple_cells(mut self) -> CellResult<CoupledBuilder<T>> {
        for (cell_to, neighbors) in &self.vicinities {
            let to_name = cell_name_of(&self.id, cell_to);
            let (to_in, _) = &self.ports[cell_to];
            for cell_from in neighbors.keys() {
                let from_name = cell_name_of(&self.id, cell_from);
                let (_, from_out) = self
                    .ports
                    .get(cell_from)
                    .ok_or_else(|| pdevs_core::DevsError::UnknownReference(from_name.clone()))?;
                self.inner
                    .add_internal_coupling(&from_name, from_out, &to_name, to_in)?;
            }
        }
        Ok(self.inner)
    }

    /// Deterministic model name for a cell: `"<scenario id>_<cell id>"`.
    pub fn cell_name(&self, cell_id: &C) -> String {
        cell_name_of(&self.id, cell_id)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Number of registered cells.
    pub fn cell_count(&self) -> usize {
        self.vicinities.len()
    }

    pub fn contains_cell(&self, cell_id: &C) -> bool {
        self.vicinities.contains_key(cell_id)
    }

    /// The vicinity map registered for `cell_id`, if any.
    pub fn vicinity(&self, cell_id: &C) -> Option<&VicinityMap<C, V>> {
        self.vicinities.get(cell_id)
    }
}

fn cell_name_of<C: fmt::Display>(scenario_id: &str, cell_id: &C) -> String {
    format!("{scenario_id}_{cell_id}")
}
