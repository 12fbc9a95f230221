pub mod elevation_profile;
pub mod feature_service;
pub mod layer_assembler;
pub mod scene;
pub mod scene_composer;
pub mod symbology;
pub mod trail_cli_opts;
pub mod view_controller;
pub mod viewpoints;
