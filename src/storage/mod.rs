//! Counter storage for the host's "sites checked" / "threats blocked" tallies.

mod counters;

pub use counters::{CounterKey, CounterStore, MemoryCounters, SqliteCounters};
