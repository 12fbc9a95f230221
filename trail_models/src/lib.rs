pub mod geometry;
pub mod layer;
pub mod symbol;
pub mod track;
pub mod track_point;
pub mod viewpoint;
