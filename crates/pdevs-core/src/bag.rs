//! Message bags.
//!
//! # Design
//!
//! A `Bag` is the unit of exchange for one simulation step: an unordered
//! multiset of messages grouped by port name.  Models must not rely on any
//! ordering within a port's messages — the engine gives no guarantee
//! beyond "everything collected this step is present".
//!
//! Messages are `Arc<dyn Any + Send + Sync>` so that one emitted value can
//! fan out along several couplings without cloning the payload.  Typed
//! access goes through [`Bag::values`], which downcasts and skips nothing
//! in practice: assembly-time port validation guarantees every message on
//! a routed port has the declared type.

use std::any::Any;
use std::sync::Arc;

use rustc_hash::FxHashMap;

/// A type-erased, cheaply cloneable message payload.
pub type Message = Arc<dyn Any + Send + Sync>;

/// Unordered multiset of messages, grouped by port name.
#[derive(Clone, Default)]
pub struct Bag {
    ports: FxHashMap<String, Vec<Message>>,
}

impl Bag {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no port holds any message.
    pub fn is_empty(&self) -> bool {
        self.ports.values().all(Vec::is_empty)
    }

    /// Total message count across all ports.
    pub fn len(&self) -> usize {
        self.ports.values().map(Vec::len).sum()
    }

    /// Add one typed message to `port`.
    pub fn push<M: Any + Send + Sync>(&mut self, port: &str, value: M) {
        self.push_raw(port, Arc::new(value));
    }

    /// Add an already-erased message to `port`.
    pub fn push_raw(&mut self, port: &str, message: Message) {
        self.ports.entry(port.to_string()).or_default().push(message);
    }

    /// Append clones of `messages` to `port` (Arc clones — payloads are
    /// shared, not copied).
    pub fn extend_raw(&mut self, port: &str, messages: &[Message]) {
        self.ports
            .entry(port.to_string())
            .or_default()
            .extend(messages.iter().cloned());
    }

    /// All messages currently on `port`, type-erased.
    pub fn raw(&self, port: &str) -> &[Message] {
        self.ports.get(port).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Typed view of the messages on `port`.
    ///
    /// Messages of a different type are skipped; with validated couplings
    /// this never drops anything.
    pub fn values<'a, M: Any>(&'a self, port: &str) -> impl Iterator<Item = &'a M> {
        self.raw(port).iter().filter_map(|m| m.downcast_ref::<M>())
    }

    /// Number of messages on `port`.
    pub fn port_len(&self, port: &str) -> usize {
        self.raw(port).len()
    }

    /// Iterator over `(port name, messages)` pairs with at least one
    /// message.  Iteration order is unspecified.
    pub fn ports(&self) -> impl Iterator<Item = (&str, &[Message])> {
        self.ports
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl std::fmt::Debug for Bag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (port, msgs) in self.ports() {
            map.entry(&port, &msgs.len());
        }
        map.finish()
    }
}
