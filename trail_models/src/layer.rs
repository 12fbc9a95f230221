use serde::{Deserialize, Serialize};
use stack_string::StackString;

use crate::{
    geometry::LineGeometry,
    symbol::{LabelSymbol, LineSymbol, MarkerSymbol, Point3dSymbol, UniqueValueRenderer},
};

/// Where a layer's records come from: a remote feature service restricted by
/// an optional definition expression, or a single in-memory track graphic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum LayerSource {
    FeatureService {
        url: StackString,
        definition_expression: Option<StackString>,
    },
    TrackGraphic {
        geometry: LineGeometry,
        symbol: LineSymbol,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ElevationMode {
    RelativeToGround,
    OnTheGround,
    Absolute,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Renderer {
    UniqueValuePoi(UniqueValueRenderer<Point3dSymbol>),
    UniqueValueMarker(UniqueValueRenderer<MarkerSymbol>),
    SimplePoi(Point3dSymbol),
    SimpleLine(LineSymbol),
}

/// Labeling rule: an attribute expression plus the text symbol it is drawn
/// with. Placement is left to the display client when unset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelRule {
    pub expression: StackString,
    pub placement: Option<StackString>,
    pub symbol: LabelSymbol,
}

/// Popup content template, the expression resolves an attachment url per
/// feature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PopupTemplate {
    pub expression_name: StackString,
    pub expression: StackString,
    pub content: StackString,
    pub last_edit_info_enabled: bool,
}

/// A renderable layer description. Created at startup and never mutated
/// afterwards; the scene owns draw order through registration order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Layer {
    pub name: StackString,
    pub source: LayerSource,
    pub renderer: Renderer,
    pub labeling: Option<LabelRule>,
    pub elevation_mode: Option<ElevationMode>,
    pub popup: Option<PopupTemplate>,
    pub screen_size_perspective: bool,
}
