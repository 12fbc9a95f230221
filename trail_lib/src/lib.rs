pub mod errors;
pub mod trail_config;
