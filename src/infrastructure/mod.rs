//! Adapters implementing the domain ports: an in-memory registry for tests
//! and single runs, and an optional RocksDB registry for persistence.

pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
