pub mod geo_util;
pub mod poi_class;
