pub mod compare;
pub mod engine;
pub mod select;

pub use engine::BlockSimilarityEngine;
pub use select::TopKSelector;
