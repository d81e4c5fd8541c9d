//! Unit tests for pdevs-core.

use crate::{Bag, PortSpec, SimTime};

// ── SimTime ───────────────────────────────────────────────────────────────────

mod time {
    use super::*;

    #[test]
    fn zero_is_additive_identity() {
        assert_eq!(<f64 as SimTime>::ZERO + 3.5, 3.5);
    }

    #[test]
    fn infinity_is_passive_and_absorbing() {
        assert!(<f64 as SimTime>::INFINITY.is_passive());
        assert!(!1.0_f64.is_passive());
        assert!((2.0 + <f64 as SimTime>::INFINITY).is_passive());
    }

    #[test]
    fn infinity_exceeds_all_finite_times() {
        assert!(<f64 as SimTime>::INFINITY > 1e300);
    }

    #[test]
    fn time_values_are_shareable_across_threads() {
        // Coordinators hand the step time to worker closures by capture,
        // so every SimTime type must be Sync, not just Send.
        fn assert_shareable<T: SimTime>() {
            fn is_sync<S: Sync>() {}
            is_sync::<T>();
        }
        assert_shareable::<f64>();
    }
}

// ── PortSpec ──────────────────────────────────────────────────────────────────

mod port {
    use super::*;
    use crate::port::find_port;

    #[test]
    fn same_message_type_is_compatible() {
        let a = PortSpec::of::<u32>("out");
        let b = PortSpec::of::<u32>("in");
        assert!(a.compatible_with(&b));
    }

    #[test]
    fn different_message_types_are_incompatible() {
        let a = PortSpec::of::<u32>("out");
        let b = PortSpec::of::<String>("in");
        assert!(!a.compatible_with(&b));
    }

    #[test]
    fn find_port_by_name() {
        let ports = vec![PortSpec::of::<u32>("a"), PortSpec::of::<f64>("b")];
        assert_eq!(find_port(&ports, "b").map(PortSpec::name), Some("b"));
        assert!(find_port(&ports, "c").is_none());
    }
}

// ── Bag ───────────────────────────────────────────────────────────────────────

mod bag {
    use super::*;

    #[test]
    fn new_bag_is_empty() {
        let bag = Bag::new();
        assert!(bag.is_empty());
        assert_eq!(bag.len(), 0);
    }

    #[test]
    fn push_and_typed_read() {
        let mut bag = Bag::new();
        bag.push("in", 7u32);
        bag.push("in", 9u32);
        let mut got: Vec<u32> = bag.values::<u32>("in").copied().collect();
        got.sort_unstable();
        assert_eq!(got, vec![7, 9]);
        assert_eq!(bag.port_len("in"), 2);
        assert!(!bag.is_empty());
    }

    #[test]
    fn extend_raw_shares_payloads() {
        let mut src = Bag::new();
        src.push("out", String::from("hello"));
        let mut dst = Bag::new();
        dst.extend_raw("in", src.raw("out"));
        assert_eq!(
            dst.values::<String>("in").next().map(String::as_str),
            Some("hello")
        );
    }

    #[test]
    fn unknown_port_reads_empty() {
        let bag = Bag::new();
        assert!(bag.raw("nope").is_empty());
        assert_eq!(bag.values::<u32>("nope").count(), 0);
    }
}
