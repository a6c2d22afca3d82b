//! udp-send-benchmark library
//!
//! Measures UDP send throughput by blasting fixed-size datagrams at a
//! target endpoint from one or more concurrent send loops for a bounded
//! duration, then reporting achieved MiB/s and the number of sends that
//! completed asynchronously.

pub mod benchmark;
pub mod config;
pub mod metrics;
pub mod utils;
