pub mod cleanup;
pub mod config;
pub mod enhancer;
pub mod http;
pub mod model;
pub mod types;
