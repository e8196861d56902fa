pub mod chart;
pub mod color;
pub mod layout;
pub mod openalex;
pub mod physics;
pub mod util;
pub mod view;

pub use openalex::HierarchyNode;
