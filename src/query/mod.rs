//! Query system for knowledge graphs
//!
//! Provides filtered node and edge lookups, bounded-depth neighbor
//! traversal, and induced-subgraph extraction.

mod find;
mod traverse;
mod types;

pub use find::{EdgeQuery, NodeQuery, SortDirection};
pub use traverse::{NeighborOptions, SubgraphOptions};
pub use types::{Direction, GraphStatistics, NeighborResult, Subgraph};

pub(crate) use traverse::{neighbors, subgraph};
