pub mod aabb;
pub mod detection;
pub mod manifold;
pub mod quadtree;

// Re-export key types
pub use aabb::Aabb;
pub use detection::*;
pub use manifold::*;
pub use quadtree::QuadTree;
