//! `CoupledBuilder` — validated assembly of a coupled model.
//!
//! # Assembly rules
//!
//! - A child id may be registered at most once; a duplicate fails with
//!   [`DevsError::DuplicateEntity`] and leaves the child set untouched.
//! - A coupling may only reference already-registered children
//!   ([`DevsError::UnknownReference`]) and ports they actually declare
//!   ([`DevsError::UnknownPort`]).
//! - Both ends of a coupling must carry the same message type
//!   ([`DevsError::PortTypeMismatch`]).  Message types are erased at
//!   runtime, so this `TypeId` check at assembly time is the earliest
//!   possible enforcement point.
//!
//! Each failure aborts only the offending call; everything registered
//! before it stays valid.  [`build`][CoupledBuilder::build] consumes the
//! builder and produces a ready-to-run [`Coordinator`].

use pdevs_core::port::find_port;
use pdevs_core::{DevsError, DevsResult, PortSpec, SimTime};
use rustc_hash::FxHashMap;

use pdevs_model::AtomicModel;

use crate::coordinator::Coordinator;
use crate::{Component, EventQueue, Simulator};

// ── Coupling records ──────────────────────────────────────────────────────────

/// A child-to-child coupling inside one coupled model.
#[derive(Clone, Debug)]
pub struct InternalCoupling {
    pub(crate) from: usize,
    pub(crate) to: usize,
    pub from_model: String,
    pub from_port: String,
    pub to_model: String,
    pub to_port: String,
}

/// A coupling from the coupled model's own input boundary into a child.
#[derive(Clone, Debug)]
pub struct ExternalInputCoupling {
    pub(crate) to: usize,
    pub self_port: String,
    pub to_model: String,
    pub to_port: String,
}

/// A coupling from a child up to the coupled model's own output boundary.
#[derive(Clone, Debug)]
pub struct ExternalOutputCoupling {
    pub(crate) from: usize,
    pub from_model: String,
    pub from_port: String,
    pub self_port: String,
}

// ── CoupledBuilder ────────────────────────────────────────────────────────────

/// Builder for a coupled model: children, boundary ports, and the three
/// coupling classes, validated as they are declared.
pub struct CoupledBuilder<T: SimTime> {
    id: String,
    children: Vec<Box<dyn Component<T>>>,
    index: FxHashMap<String, usize>,
    input_ports: Vec<PortSpec>,
    output_ports: Vec<PortSpec>,
    ic: Vec<InternalCoupling>,
    eic: Vec<ExternalInputCoupling>,
    eoc: Vec<ExternalOutputCoupling>,
}

impl<T: SimTime> CoupledBuilder<T> {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            children: Vec::new(),
            index: FxHashMap::default(),
            input_ports: Vec::new(),
            output_ports: Vec::new(),
            ic: Vec::new(),
            eic: Vec::new(),
            eoc: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    // ── Boundary ports ────────────────────────────────────────────────────

    /// Declare an input port named `name` carrying `M` on this coupled
    /// model's own boundary.
    pub fn add_input_port<M: std::any::Any + Send + Sync>(&mut self, name: &str) -> DevsResult<()> {
        if find_port(&self.input_ports, name).is_some() {
            return Err(DevsError::DuplicateEntity(format!("{}.{name}", self.id)));
        }
        self.input_ports.push(PortSpec::of::<M>(name));
        Ok(())
    }

    /// Declare an output port named `name` carrying `M`.
    pub fn add_output_port<M: std::any::Any + Send + Sync>(&mut self, name: &str) -> DevsResult<()> {
        if find_port(&self.output_ports, name).is_some() {
            return Err(DevsError::DuplicateEntity(format!("{}.{name}", self.id)));
        }
        self.output_ports.push(PortSpec::of::<M>(name));
        Ok(())
    }

    // ── Children ──────────────────────────────────────────────────────────

    /// Register an already-built component (a [`Simulator`] or a nested,
    /// built [`Coordinator`]) as a child.
    pub fn add_component(&mut self, component: Box<dyn Component<T>>) -> DevsResult<()> {
        let id = component.model_id().to_string();
        if self.index.contains_key(&id) {
            return Err(DevsError::DuplicateEntity(id));
        }
        self.index.insert(id, self.children.len());
        self.children.push(component);
        Ok(())
    }

    /// Convenience: wrap `model` in a [`Simulator`] named `id` and register it.
    pub fn add_atomic<M: AtomicModel<T>>(&mut self, id: &str, model: M) -> DevsResult<()> {
        self.add_component(Box::new(Simulator::new(id, Box::new(model))))
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn contains_child(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    // ── Couplings ─────────────────────────────────────────────────────────

    /// Couple a child's output port to a sibling's input port.
    pub fn add_internal_coupling(
        &mut self,
        from_model: &str,
        from_port: &str,
        to_model: &str,
        to_port: &str,
    ) -> DevsResult<()> {
        let from = self.resolve(from_model)?;
        let to = self.resolve(to_model)?;
        let src = Self::port_on(self.children[from].as_ref(), from_port, Direction::Output)?;
        let dst = Self::port_on(self.children[to].as_ref(), to_port, Direction::Input)?;
        Self::check_types(&src, from_model, &dst, to_model)?;
        self.ic.push(InternalCoupling {
            from,
            to,
            from_model: from_model.to_string(),
            from_port: from_port.to_string(),
            to_model: to_model.to_string(),
            to_port: to_port.to_string(),
        });
        Ok(())
    }

    /// Couple this coupled model's own input port to a child's input port.
    pub fn add_external_input_coupling(
        &mut self,
        self_port: &str,
        to_model: &str,
        to_port: &str,
    ) -> DevsResult<()> {
        let src = self.boundary_port(self_port, Direction::Input)?;
        let to = self.resolve(to_model)?;
        let dst = Self::port_on(self.children[to].as_ref(), to_port, Direction::Input)?;
        Self::check_types(&src, &self.id, &dst, to_model)?;
        self.eic.push(ExternalInputCoupling {
            to,
            self_port: self_port.to_string(),
            to_model: to_model.to_string(),
            to_port: to_port.to_string(),
        });
        Ok(())
    }

    /// Couple a child's output port to this coupled model's own output port.
    pub fn add_external_output_coupling(
        &mut self,
        from_model: &str,
        from_port: &str,
        self_port: &str,
    ) -> DevsResult<()> {
        let from = self.resolve(from_model)?;
        let src = Self::port_on(self.children[from].as_ref(), from_port, Direction::Output)?;
        let dst = self.boundary_port(self_port, Direction::Output)?;
        Self::check_types(&src, from_model, &dst, &self.id)?;
        self.eoc.push(ExternalOutputCoupling {
            from,
            from_model: from_model.to_string(),
            from_port: from_port.to_string(),
            self_port: self_port.to_string(),
        });
        Ok(())
    }

    /// Declared internal couplings, in declaration order.
    pub fn internal_couplings(&self) -> &[InternalCoupling] {
        &self.ic
    }

    pub fn external_input_couplings(&self) -> &[ExternalInputCoupling] {
        &self.eic
    }

    pub fn external_output_couplings(&self) -> &[ExternalOutputCoupling] {
        &self.eoc
    }

    // ── Build ─────────────────────────────────────────────────────────────

    /// Consume the builder and produce a [`Coordinator`], precomputing the
    /// per-child routing tables and seeding the event-time index.
    pub fn build(self) -> Coordinator<T> {
        let n = self.children.len();

        // (from child, from port) → destinations, indexed by from child.
        let mut routes_ic: Vec<FxHashMap<String, Vec<(usize, String)>>> =
            vec![FxHashMap::default(); n];
        for c in &self.ic {
            routes_ic[c.from]
                .entry(c.from_port.clone())
                .or_default()
                .push((c.to, c.to_port.clone()));
        }

        let mut routes_eoc: Vec<FxHashMap<String, Vec<String>>> = vec![FxHashMap::default(); n];
        for c in &self.eoc {
            routes_eoc[c.from]
                .entry(c.from_port.clone())
                .or_default()
                .push(c.self_port.clone());
        }

        let mut routes_eic: FxHashMap<String, Vec<(usize, String)>> = FxHashMap::default();
        for c in &self.eic {
            routes_eic
                .entry(c.self_port.clone())
                .or_default()
                .push((c.to, c.to_port.clone()));
        }

        let mut schedule = EventQueue::new();
        for child in &self.children {
            schedule.register(child.next_event_time());
        }
        let next = schedule.min_time();

        Coordinator::assemble(
            self.id,
            self.children,
            self.input_ports,
            self.output_ports,
            routes_ic,
            routes_eoc,
            routes_eic,
            schedule,
            next,
        )
    }

    // ── Validation helpers ────────────────────────────────────────────────

    fn resolve(&self, model: &str) -> DevsResult<usize> {
        self.index
            .get(model)
            .copied()
            .ok_or_else(|| DevsError::UnknownReference(model.to_string()))
    }

    fn port_on(
        child: &dyn Component<T>,
        port: &str,
        direction: Direction,
    ) -> DevsResult<PortSpec> {
        let ports = match direction {
            Direction::Input => child.input_ports(),
            Direction::Output => child.output_ports(),
        };
        find_port(ports, port).cloned().ok_or_else(|| DevsError::UnknownPort {
            model: child.model_id().to_string(),
            port: port.to_string(),
            direction: direction.label(),
        })
    }

    fn boundary_port(&self, port: &str, direction: Direction) -> DevsResult<PortSpec> {
        let ports = match direction {
            Direction::Input => &self.input_ports,
            Direction::Output => &self.output_ports,
        };
        find_port(ports, port).cloned().ok_or_else(|| DevsError::UnknownPort {
            model: self.id.clone(),
            port: port.to_string(),
            direction: direction.label(),
        })
    }

    fn check_types(
        src: &PortSpec,
        src_model: &str,
        dst: &PortSpec,
        dst_model: &str,
    ) -> DevsResult<()> {
        if src.compatible_with(dst) {
            return Ok(());
        }
        Err(DevsError::PortTypeMismatch {
            from_model: src_model.to_string(),
            from_port: src.name().to_string(),
            from_type: src.type_label(),
            to_model: dst_model.to_string(),
            to_port: dst.name().to_string(),
            to_type: dst.type_label(),
        })
    }
}

#[derive(Copy, Clone)]
enum Direction {
    Input,
    Output,
}

impl Direction {
    fn label(self) -> &'static str {
        match self {
            Direction::Input => "input",
            Direction::Output => "output",
        }
    }
}
