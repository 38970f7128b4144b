pub mod config;
pub mod importers;
pub mod normalize;
pub mod output;
pub mod services;
pub mod utils;
