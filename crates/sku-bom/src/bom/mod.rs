pub mod analytics;
mod tree;

pub use analytics::{
    aggregate_material_requirements, aggregate_material_requirements_scaled, count_nodes, depth,
    flatten, summarize, BomSummary, FlattenedBomItem, MaterialRequirement,
};
pub use tree::*;
