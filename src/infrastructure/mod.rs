//! Adapters behind the domain ports: in-memory stores, stock selectors and
//! the demo data set.

pub mod in_memory;
pub mod seed;
pub mod selector;
