pub mod core;
pub mod indices;
pub mod sampler;
pub mod writer;
