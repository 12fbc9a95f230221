use once_cell::sync::Lazy;
use std::collections::HashMap;

use trail_models::viewpoint::Viewpoint;

/// Camera pose the scene opens with, looking south over the valley.
pub const INITIAL_CAMERA: Viewpoint =
    Viewpoint::new(7.665_706_11, 46.483_838_10, 3424.753_47, 205.25, 72.51);

/// The named viewpoints linked from the hike description. Keys match the
/// `data-value` attributes of the story page buttons.
static VIEWPOINT_TABLE: Lazy<HashMap<&'static str, Viewpoint>> = Lazy::new(init_viewpoint_table);

fn init_viewpoint_table() -> HashMap<&'static str, Viewpoint> {
    [
        (
            "trainStation",
            Viewpoint::new(7.663_711_79, 46.506_807_37, 1944.910_65, 153.80, 66.63),
        ),
        (
            "cableCar",
            Viewpoint::new(7.669_507_66, 46.484_765_42, 1570.195_67, 207.12, 75.00),
        ),
        (
            "bergRestaurant",
            Viewpoint::new(7.651_507_84, 46.458_791_14, 1954.868_14, 219.39, 77.12),
        ),
        (
            "berghotelSchwarenbach",
            Viewpoint::new(7.638_672_05, 46.441_780_47, 2829.839_36, 221.31, 66.06),
        ),
    ]
    .iter()
    .copied()
    .collect()
}

#[must_use]
pub fn get_viewpoint(name: &str) -> Option<Viewpoint> {
    VIEWPOINT_TABLE.get(name).copied()
}

pub fn viewpoint_names() -> impl Iterator<Item = &'static str> {
    VIEWPOINT_TABLE.keys().copied()
}
