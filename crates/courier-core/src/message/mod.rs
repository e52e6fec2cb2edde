//! Message read/write path: the caching service, the snapshot codec and
//! page slicing.

pub mod pagination;
pub mod service;
pub mod snapshot;
