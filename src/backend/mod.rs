mod api;
mod model;

pub use api::BackendClient;
pub use model::{NodeMetrics, RawEdge, RawGraph, RawNode};
