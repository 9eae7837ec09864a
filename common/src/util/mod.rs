pub mod config;
pub mod generator;
pub mod logger;
pub mod preset;
pub mod profiler;
pub mod target;
