use log::debug;
use stack_string::StackString;

use trail_lib::errors::TrailError as Error;
use trail_models::{
    geometry::LineGeometry,
    layer::{ElevationMode, LabelRule, Layer, LayerSource, PopupTemplate, Renderer},
    symbol::LineSymbol,
};

use crate::feature_service::FeatureServiceClient;

/// Everything needed to assemble one remote feature layer.
pub struct FeatureLayerSpec {
    pub name: StackString,
    pub url: StackString,
    pub definition_expression: Option<StackString>,
    pub renderer: Renderer,
    pub labeling: Option<LabelRule>,
    pub elevation_mode: Option<ElevationMode>,
    pub popup: Option<PopupTemplate>,
    pub screen_size_perspective: bool,
}

/// Assemble a remote feature layer. The definition expression is passed to
/// the backend untouched; probing the service here means a malformed
/// predicate or an unreachable backend surfaces as `LayerLoad` at assembly
/// time instead of as a silently empty layer.
///
/// # Errors
/// Return `LayerLoad` if the probe query fails
pub async fn build_feature_layer(
    client: &FeatureServiceClient,
    spec: FeatureLayerSpec,
) -> Result<Layer, Error> {
    let features = client
        .query(&spec.url, spec.definition_expression.as_deref().map(|v| &**v))
        .await?;
    debug!("layer {} serves {} features", spec.name, features.len());
    Ok(Layer {
        name: spec.name,
        source: LayerSource::FeatureService {
            url: spec.url,
            definition_expression: spec.definition_expression,
        },
        renderer: spec.renderer,
        labeling: spec.labeling,
        elevation_mode: spec.elevation_mode,
        popup: spec.popup,
        screen_size_perspective: spec.screen_size_perspective,
    })
}

/// Wrap the parsed track polyline as an in-memory graphic layer.
#[must_use]
pub fn build_track_layer(geometry: LineGeometry) -> Layer {
    Layer {
        name: "track".into(),
        source: LayerSource::TrackGraphic {
            geometry,
            symbol: LineSymbol::track_line(),
        },
        renderer: Renderer::SimpleLine(LineSymbol::track_line()),
        labeling: None,
        elevation_mode: None,
        popup: None,
        screen_size_perspective: false,
    }
}
