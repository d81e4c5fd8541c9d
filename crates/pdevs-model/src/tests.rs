//! Unit tests for pdevs-model.

use pdevs_core::{Bag, PortSpec, SimTime};

use crate::{AtomicModel, Passive};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Counter that fires every 1.0, incrementing on internal transitions and
/// adding received values on external ones.  Records the order in which
/// its transitions ran.
struct Counter {
    count: u32,
    log: Vec<&'static str>,
}

impl Counter {
    fn new() -> Self {
        Self { count: 0, log: vec![] }
    }
}

impl AtomicModel<f64> for Counter {
    fn input_ports(&self) -> Vec<PortSpec> {
        vec![PortSpec::of::<u32>("in")]
    }

    fn output_ports(&self) -> Vec<PortSpec> {
        vec![PortSpec::of::<u32>("out")]
    }

    fn time_advance(&self) -> f64 {
        1.0
    }

    fn internal_transition(&mut self) {
        self.count += 1;
        self.log.push("internal");
    }

    fn external_transition(&mut self, _elapsed: f64, inputs: &Bag) {
        self.count += inputs.values::<u32>("in").sum::<u32>();
        self.log.push("external");
    }

    fn output(&self) -> Bag {
        let mut bag = Bag::new();
        bag.push("out", self.count);
        bag
    }
}

// ── Default confluent policy ──────────────────────────────────────────────────

#[test]
fn default_confluent_runs_internal_then_external() {
    let mut model = Counter::new();
    let mut inputs = Bag::new();
    inputs.push("in", 10u32);

    model.confluent_transition(&inputs);

    assert_eq!(model.log, vec!["internal", "external"]);
    // internal (+1) applied before external (+10) sees the state.
    assert_eq!(model.count, 11);
}

#[test]
fn output_reads_pre_transition_state() {
    let mut model = Counter::new();
    model.internal_transition();
    let bag = AtomicModel::<f64>::output(&model);
    assert_eq!(bag.values::<u32>("out").copied().next(), Some(1));
}

// ── Passive ───────────────────────────────────────────────────────────────────

#[test]
fn passive_never_schedules() {
    let model = Passive::sink::<u32>("in");
    assert!(AtomicModel::<f64>::time_advance(&model).is_passive());
    assert!(AtomicModel::<f64>::output(&model).is_empty());
    assert_eq!(AtomicModel::<f64>::input_ports(&model).len(), 1);
}
