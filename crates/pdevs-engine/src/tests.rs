//! Integration tests for pdevs-engine.

use std::sync::{Arc, Mutex};

use pdevs_core::{Bag, DevsError, DevsResult, PortSpec, SimTime};
use pdevs_model::{AtomicModel, Passive};

use crate::{Component, CoupledBuilder, EventQueue, NoopObserver, Runner, SimObserver, Simulator};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Emits its event count on port `out` every `period`, forever.
struct TickGenerator {
    period: f64,
    count: u32,
}

impl TickGenerator {
    fn new(period: f64) -> Self {
        Self { period, count: 0 }
    }
}

impl AtomicModel<f64> for TickGenerator {
    fn input_ports(&self) -> Vec<PortSpec> {
        vec![]
    }

    fn output_ports(&self) -> Vec<PortSpec> {
        vec![PortSpec::of::<u32>("out")]
    }

    fn time_advance(&self) -> f64 {
        self.period
    }

    fn internal_transition(&mut self) {
        self.count += 1;
    }

    fn external_transition(&mut self, _elapsed: f64, _inputs: &Bag) {}

    fn output(&self) -> Bag {
        let mut bag = Bag::new();
        bag.push("out", self.count);
        bag
    }
}

/// Passive sink that appends every `u32` received on `in`, with its
/// arrival time, to a shared log.
struct Accumulator {
    log: Arc<Mutex<Vec<(f64, u32)>>>,
    clock: f64,
}

impl Accumulator {
    fn new(log: Arc<Mutex<Vec<(f64, u32)>>>) -> Self {
        Self { log, clock: 0.0 }
    }
}

impl AtomicModel<f64> for Accumulator {
    fn input_ports(&self) -> Vec<PortSpec> {
        vec![PortSpec::of::<u32>("in")]
    }

    fn output_ports(&self) -> Vec<PortSpec> {
        vec![]
    }

    fn time_advance(&self) -> f64 {
        f64::INFINITY
    }

    fn internal_transition(&mut self) {}

    fn external_transition(&mut self, elapsed: f64, inputs: &Bag) {
        self.clock += elapsed;
        let mut log = self.log.lock().unwrap();
        for &v in inputs.values::<u32>("in") {
            log.push((self.clock, v));
        }
    }

    fn output(&self) -> Bag {
        Bag::new()
    }
}

/// Observer that records every lifecycle callback as a line.
#[derive(Default)]
struct RecordingObserver {
    lines: Vec<String>,
    global_times: Vec<f64>,
}

impl SimObserver<f64> for RecordingObserver {
    fn on_setup(&mut self, root: &str, time: f64) {
        self.lines.push(format!("setup {root} @{time}"));
    }

    fn on_run_start(&mut self, time: f64) {
        self.lines.push(format!("start @{time}"));
    }

    fn on_global_time(&mut self, time: f64) {
        self.global_times.push(time);
    }

    fn on_collect(&mut self, model: &str, time: f64) {
        self.lines.push(format!("collect {model} @{time}"));
    }

    fn on_advance(&mut self, model: &str, from: f64, to: f64) {
        self.lines.push(format!("advance {model} {from}->{to}"));
    }

    fn on_run_end(&mut self, time: f64) {
        self.lines.push(format!("end @{time}"));
    }
}

fn assert_timing_violation<V>(result: DevsResult<V>) {
    match result {
        Err(DevsError::TimingViolation { .. }) => {}
        Err(other) => panic!("expected TimingViolation, got {other}"),
        Ok(_) => panic!("expected TimingViolation, got Ok"),
    }
}

// ── EventQueue ────────────────────────────────────────────────────────────────

mod schedule {
    use super::*;

    #[test]
    fn register_and_min() {
        let mut q = EventQueue::new();
        let a = q.register(3.0);
        let b = q.register(1.0);
        q.register(2.0);
        assert_eq!(q.min_time(), 1.0);
        assert_eq!(q.time_of(a), 3.0);
        assert_eq!(q.time_of(b), 1.0);
        assert_eq!(q.len(), 3);
    }

    #[test]
    fn passive_children_are_not_scheduled() {
        let mut q: EventQueue<f64> = EventQueue::new();
        q.register(f64::INFINITY);
        q.register(f64::INFINITY);
        assert!(q.min_time().is_passive());
    }

    #[test]
    fn update_reschedules_with_lazy_invalidation() {
        let mut q = EventQueue::new();
        let a = q.register(1.0);
        let b = q.register(5.0);
        q.update(a, 9.0); // stale 1.0 entry must be skimmed
        assert_eq!(q.min_time(), 5.0);
        q.update(b, f64::INFINITY);
        assert_eq!(q.min_time(), 9.0);
    }

    #[test]
    fn pop_imminent_returns_all_children_at_now() {
        let mut q = EventQueue::new();
        let a = q.register(2.0);
        q.register(3.0);
        let c = q.register(2.0);
        let mut imminent = q.pop_imminent(2.0);
        imminent.sort_unstable();
        assert_eq!(imminent, vec![a, c]);
        // Popped children are gone until updated.
        assert_eq!(q.min_time(), 3.0);
        q.update(a, 4.0);
        q.update(c, 2.5);
        assert_eq!(q.min_time(), 2.5);
    }

    #[test]
    fn pop_imminent_off_time_returns_nothing() {
        let mut q = EventQueue::new();
        q.register(2.0);
        assert!(q.pop_imminent(1.0).is_empty());
        assert_eq!(q.min_time(), 2.0);
    }
}

// ── Simulator ─────────────────────────────────────────────────────────────────

mod simulator {
    use super::*;

    #[test]
    fn next_event_time_is_idempotent() {
        let sim = Simulator::new("gen", Box::new(TickGenerator::new(1.5)));
        for _ in 0..5 {
            assert_eq!(sim.next_event_time(), 1.5);
        }
    }

    #[test]
    fn collect_off_schedule_is_a_timing_violation() {
        let mut sim = Simulator::new("gen", Box::new(TickGenerator::new(1.0)));
        assert_timing_violation(sim.collect_output(0.5));
        // The schedule is unchanged by the failed call.
        assert_eq!(sim.next_event_time(), 1.0);
    }

    #[test]
    fn internal_transition_advances_local_clock() {
        let mut sim = Simulator::new("gen", Box::new(TickGenerator::new(1.0)));
        let out = sim.collect_output(1.0).unwrap();
        assert_eq!(out.values::<u32>("out").copied().next(), Some(0));
        sim.advance(1.0, Bag::new()).unwrap();
        assert_eq!(sim.next_event_time(), 2.0);
        // Output now reflects the post-transition count.
        let out = sim.collect_output(2.0).unwrap();
        assert_eq!(out.values::<u32>("out").copied().next(), Some(1));
    }

    #[test]
    fn external_transition_gets_elapsed_since_last_event() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut sim = Simulator::new("acc", Box::new(Accumulator::new(log.clone())));

        let mut bag = Bag::new();
        bag.push("in", 7u32);
        sim.advance(2.5, bag).unwrap();

        assert_eq!(log.lock().unwrap().as_slice(), &[(2.5, 7)]);
        // Passive model stays passive after input.
        assert!(sim.next_event_time().is_passive());
    }

    #[test]
    fn advance_with_empty_bag_off_schedule_is_a_timing_violation() {
        let mut sim = Simulator::new("gen", Box::new(TickGenerator::new(1.0)));
        assert_timing_violation(sim.advance(0.5, Bag::new()));
    }

    #[test]
    fn input_after_next_event_time_is_a_timing_violation() {
        let mut sim = Simulator::new("gen", Box::new(TickGenerator::new(1.0)));
        let mut bag = Bag::new();
        bag.push("in", 1u32);
        assert_timing_violation(sim.advance(1.5, bag));
    }
}

// ── CoupledBuilder validation ─────────────────────────────────────────────────

mod builder {
    use super::*;

    #[test]
    fn duplicate_child_is_rejected_without_side_effects() {
        let mut top = CoupledBuilder::<f64>::new("top");
        top.add_atomic("gen", TickGenerator::new(1.0)).unwrap();
        let err = top.add_atomic("gen", TickGenerator::new(2.0)).unwrap_err();
        assert!(matches!(err, DevsError::DuplicateEntity(id) if id == "gen"));
        assert_eq!(top.child_count(), 1);
        assert!(top.contains_child("gen"));
    }

    #[test]
    fn coupling_to_unknown_child_is_rejected() {
        let mut top = CoupledBuilder::<f64>::new("top");
        top.add_atomic("gen", TickGenerator::new(1.0)).unwrap();
        let err = top
            .add_internal_coupling("gen", "out", "ghost", "in")
            .unwrap_err();
        assert!(matches!(err, DevsError::UnknownReference(id) if id == "ghost"));
        assert!(top.internal_couplings().is_empty());
    }

    #[test]
    fn coupling_to_unknown_port_is_rejected() {
        let mut top = CoupledBuilder::<f64>::new("top");
        top.add_atomic("gen", TickGenerator::new(1.0)).unwrap();
        top.add_atomic("sink", Passive::sink::<u32>("in")).unwrap();
        let err = top
            .add_internal_coupling("gen", "nope", "sink", "in")
            .unwrap_err();
        assert!(matches!(
            err,
            DevsError::UnknownPort { model, direction: "output", .. } if model == "gen"
        ));
    }

    #[test]
    fn mismatched_port_types_are_rejected() {
        let mut top = CoupledBuilder::<f64>::new("top");
        top.add_atomic("gen", TickGenerator::new(1.0)).unwrap();
        top.add_atomic("sink", Passive::sink::<String>("in")).unwrap();
        let err = top
            .add_internal_coupling("gen", "out", "sink", "in")
            .unwrap_err();
        assert!(matches!(err, DevsError::PortTypeMismatch { .. }));
    }

    #[test]
    fn duplicate_boundary_port_is_rejected() {
        let mut top = CoupledBuilder::<f64>::new("top");
        top.add_output_port::<u32>("out").unwrap();
        let err = top.add_output_port::<u32>("out").unwrap_err();
        assert!(matches!(err, DevsError::DuplicateEntity(_)));
    }
}

// ── Runner ────────────────────────────────────────────────────────────────────

mod runner {
    use super::*;

    fn generator_top() -> CoupledBuilder<f64> {
        let mut top = CoupledBuilder::new("top");
        top.add_atomic("gen", TickGenerator::new(1.0)).unwrap();
        top
    }

    #[test]
    fn boundary_event_is_processed_and_end_time_returned() {
        let mut runner = Runner::new(generator_top().build(), NoopObserver);
        let reached = runner.run_until(60.0).unwrap();
        assert_eq!(reached, 60.0);
        assert_eq!(runner.current_time(), 60.0);
    }

    #[test]
    fn global_time_log_is_zero_one_two_for_a_unit_generator() {
        let mut runner = Runner::new(generator_top().build(), RecordingObserver::default());
        runner.run_until(3.0).unwrap();
        assert_eq!(runner.observer().global_times, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn lifecycle_notifications_in_order() {
        let mut runner = Runner::new(generator_top().build(), RecordingObserver::default());
        runner.run_until(2.0).unwrap();
        assert_eq!(
            runner.observer().lines,
            vec![
                "setup top @0",
                "start @0",
                "collect top @1",
                "advance top 0->1",
                "collect top @2",
                "advance top 1->2",
                "end @2",
            ]
        );
    }

    #[test]
    fn passive_tree_jumps_straight_to_end_time() {
        let mut top = CoupledBuilder::<f64>::new("top");
        top.add_atomic("sink", Passive::sink::<u32>("in")).unwrap();
        let mut runner = Runner::new(top.build(), RecordingObserver::default());
        assert_eq!(runner.run_until(5.0).unwrap(), 5.0);
        assert!(runner.observer().global_times.is_empty());
    }

    #[test]
    fn repeated_runs_resume_from_current_time() {
        let mut runner = Runner::new(generator_top().build(), RecordingObserver::default());
        runner.run_until(2.0).unwrap();
        runner.run_until(4.0).unwrap();
        assert_eq!(runner.observer().global_times, vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(runner.current_time(), 4.0);
    }
}

// ── Routing through coordinators ──────────────────────────────────────────────

mod routing {
    use super::*;

    #[test]
    fn internal_coupling_delivers_generator_output() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut top = CoupledBuilder::new("top");
        top.add_atomic("gen", TickGenerator::new(1.0)).unwrap();
        top.add_atomic("acc", Accumulator::new(log.clone())).unwrap();
        top.add_internal_coupling("gen", "out", "acc", "in").unwrap();

        let mut runner = Runner::new(top.build(), NoopObserver);
        runner.run_until(3.0).unwrap();

        // Counts 0, 1, 2 arrive at times 1, 2, 3.
        assert_eq!(
            log.lock().unwrap().as_slice(),
            &[(1.0, 0), (2.0, 1), (3.0, 2)]
        );
    }

    #[test]
    fn nested_coordinator_propagates_over_eoc() {
        let log = Arc::new(Mutex::new(Vec::new()));

        let mut inner = CoupledBuilder::new("inner");
        inner.add_output_port::<u32>("ticks").unwrap();
        inner.add_atomic("gen", TickGenerator::new(1.0)).unwrap();
        inner
            .add_external_output_coupling("gen", "out", "ticks")
            .unwrap();

        let mut top = CoupledBuilder::new("top");
        top.add_component(Box::new(inner.build())).unwrap();
        top.add_atomic("acc", Accumulator::new(log.clone())).unwrap();
        top.add_internal_coupling("inner", "ticks", "acc", "in").unwrap();

        let mut runner = Runner::new(top.build(), NoopObserver);
        runner.run_until(2.0).unwrap();

        assert_eq!(log.lock().unwrap().as_slice(), &[(1.0, 0), (2.0, 1)]);
    }

    #[test]
    fn external_input_coupling_routes_into_children() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut inner = CoupledBuilder::new("inner");
        inner.add_input_port::<u32>("feed").unwrap();
        inner.add_atomic("acc", Accumulator::new(log.clone())).unwrap();
        inner
            .add_external_input_coupling("feed", "acc", "in")
            .unwrap();
        let mut coord = inner.build();

        let mut bag = Bag::new();
        bag.push("feed", 42u32);
        coord.advance(1.5, bag).unwrap();

        assert_eq!(log.lock().unwrap().as_slice(), &[(1.5, 42)]);
        assert!(coord.next_event_time().is_passive());
    }

    #[test]
    fn coordinator_advance_without_collect_is_a_timing_violation() {
        let mut top = CoupledBuilder::<f64>::new("top");
        top.add_atomic("gen", TickGenerator::new(1.0)).unwrap();
        let mut coord = top.build();
        assert_timing_violation(coord.advance(1.0, Bag::new()));
    }
}

// ── Collect-before-advance barrier ────────────────────────────────────────────

mod barrier {
    use super::*;

    /// Fires every 1.0; emits its value, then mutates it drastically in
    /// the transition.  Everything a sibling receives must therefore be a
    /// pre-transition value.
    struct Exchanger {
        value: u32,
        seen: Arc<Mutex<Vec<u32>>>,
    }

    impl AtomicModel<f64> for Exchanger {
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
            self.value += 100;
        }

        fn external_transition(&mut self, _elapsed: f64, inputs: &Bag) {
            self.seen
                .lock()
                .unwrap()
                .extend(inputs.values::<u32>("in").copied());
        }

        fn output(&self) -> Bag {
            let mut bag = Bag::new();
            bag.push("out", self.value);
            bag
        }
    }

    #[test]
    fn mutually_coupled_imminent_models_see_pre_step_state() {
        let seen_a = Arc::new(Mutex::new(Vec::new()));
        let seen_b = Arc::new(Mutex::new(Vec::new()));

        let mut top = CoupledBuilder::new("top");
        top.add_atomic("a", Exchanger { value: 1, seen: seen_a.clone() })
            .unwrap();
        top.add_atomic("b", Exchanger { value: 2, seen: seen_b.clone() })
            .unwrap();
        top.add_internal_coupling("a", "out", "b", "in").unwrap();
        top.add_internal_coupling("b", "out", "a", "in").unwrap();

        let mut runner = Runner::new(top.build(), NoopObserver);
        runner.run_until(1.0).unwrap();

        // Both were imminent at t=1 and mutually coupled: each must have
        // received the other's pre-transition value, never value + 100.
        assert_eq!(seen_a.lock().unwrap().as_slice(), &[2]);
        assert_eq!(seen_b.lock().unwrap().as_slice(), &[1]);
    }

    #[test]
    fn confluent_applies_internal_before_external() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut top = CoupledBuilder::new("top");
        top.add_atomic("x", Exchanger { value: 5, seen: seen.clone() })
            .unwrap();
        top.add_atomic("gen", TickGenerator::new(1.0)).unwrap();
        top.add_internal_coupling("gen", "out", "x", "in").unwrap();

        let mut runner = Runner::new(top.build(), NoopObserver);
        runner.run_until(1.0).unwrap();

        // x was imminent when the generator's message (count 0) arrived:
        // the default confluent policy delivered it after the internal
        // transition, and the recorded input is the generator's pre-step
        // count.
        assert_eq!(seen.lock().unwrap().as_slice(), &[0]);
    }
}
