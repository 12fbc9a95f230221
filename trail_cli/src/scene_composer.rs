use flate2::read::GzDecoder;
use log::{debug, warn};
use stack_string::{format_sstr, StackString};
use std::{io::Read, path::Path, time::Duration};
use tokio::sync::mpsc::Receiver;

use trail_lib::{errors::TrailError as Error, trail_config::TrailConfig};
use trail_models::{
    geometry::LineGeometry,
    layer::{ElevationMode, PopupTemplate, Renderer},
    track::Track,
};
use trail_parser::track_parse::{TrackParse, TrackParseTrait};

use crate::{
    elevation_profile::{ElevationProfile, GroundElevationClient},
    feature_service::FeatureServiceClient,
    layer_assembler::{build_feature_layer, build_track_layer, FeatureLayerSpec},
    scene::{Basemap, BasemapLayer, BasemapLayerKind, BlendMode, OverviewMap, Scene},
    symbology,
    view_controller::ViewController,
    viewpoints::INITIAL_CAMERA,
};

pub const CITIES_FILTER: &str = "KURZTEXT IN ('Bern', 'Zürich', 'Lausanne', 'Genève', \
                                 'Kandersteg', 'Luzern', 'Winterthur', 'Lugano', 'Chur')";
const HILLSHADE_PORTAL_ITEM: &str = "1b243539f4514b6ba35e7d995890db1d";
const LIGHT_GRAY_PORTAL_ITEM: &str = "378fd91096fe478cb78a4e06b639b715";

/// Events coming in from the story page ui.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    ViewpointClick { key: StackString },
    Resize { width: f64, height: f64 },
}

/// The assembled application context: one instance created at startup, torn
/// down at shutdown, no module globals.
pub struct ComposedScene {
    pub scene: Scene,
    pub overview: OverviewMap,
    pub view: ViewController,
    pub track: Option<Track>,
    pub profile: Option<ElevationProfile>,
}

pub struct SceneComposer {
    config: TrailConfig,
    client: FeatureServiceClient,
}

impl SceneComposer {
    /// # Errors
    /// Return error if the http client cannot be constructed
    pub fn new(config: TrailConfig) -> Result<Self, Error> {
        let client = FeatureServiceClient::new(&config)?;
        Ok(Self { config, client })
    }

    /// Assemble the whole display: overview map and main scene first, then
    /// the remote feature layers, then the track overlay with its elevation
    /// profile. The track is a best-effort enhancement, any failure there
    /// logs a warning and leaves the base scene fully usable.
    ///
    /// # Errors
    /// Only configuration-level failures are returned; individual layer and
    /// track failures degrade gracefully
    pub async fn compose(&self) -> Result<ComposedScene, Error> {
        let overview = self.build_overview().await;
        let mut scene = Scene::new(
            Basemap::Named("satellite".into()),
            Some("world-elevation".into()),
        );

        for spec in [self.pictures_layer_spec(), self.poi_layer_spec()] {
            let name = spec.name.clone();
            match build_feature_layer(&self.client, spec).await {
                Ok(layer) => scene.add_layer(layer),
                Err(e) => warn!("omitting layer {name}: {e}"),
            }
        }

        let view = ViewController::new(
            INITIAL_CAMERA,
            Duration::from_millis(self.config.animation_duration_ms),
        );

        let (track, profile) = match self.load_track().await {
            Ok(track) => {
                let geometry = LineGeometry::from_track(&track);
                scene.add_layer(build_track_layer(geometry.clone()));
                // the profile readout is bound to the finished graphic
                let profile = self.build_profile(&geometry).await;
                (Some(track), profile)
            }
            Err(e) => {
                warn!("skipping track overlay: {e}");
                (None, None)
            }
        };

        Ok(ComposedScene {
            scene,
            overview,
            view,
            track,
            profile,
        })
    }

    /// The locator map from the hike description: hillshade under a
    /// multiply-blended gray reference layer, plus the labeled cities.
    async fn build_overview(&self) -> OverviewMap {
        let mut scene = Scene::new(
            Basemap::Layers(vec![
                BasemapLayer {
                    kind: BasemapLayerKind::Tile,
                    portal_item_id: HILLSHADE_PORTAL_ITEM.into(),
                    opacity: 0.4,
                    blend_mode: None,
                },
                BasemapLayer {
                    kind: BasemapLayerKind::VectorTile,
                    portal_item_id: LIGHT_GRAY_PORTAL_ITEM.into(),
                    opacity: 1.0,
                    blend_mode: Some(BlendMode::Multiply),
                },
            ]),
            None,
        );
        let spec = self.cities_layer_spec();
        let name = spec.name.clone();
        match build_feature_layer(&self.client, spec).await {
            Ok(layer) => scene.add_layer(layer),
            Err(e) => warn!("omitting layer {name}: {e}"),
        }
        OverviewMap {
            scene,
            center: [8.293_69, 46.437_067],
            zoom: 7,
        }
    }

    fn pictures_layer_spec(&self) -> FeatureLayerSpec {
        let url = &self.config.poi_service_url;
        FeatureLayerSpec {
            name: "pictures".into(),
            url: url.clone(),
            definition_expression: Some("Class = 'picture'".into()),
            renderer: Renderer::SimplePoi(symbology::picture_symbol()),
            labeling: None,
            elevation_mode: Some(ElevationMode::RelativeToGround),
            popup: Some(attachment_popup(url)),
            screen_size_perspective: false,
        }
    }

    fn poi_layer_spec(&self) -> FeatureLayerSpec {
        FeatureLayerSpec {
            name: "hiking-poi".into(),
            url: self.config.poi_service_url.clone(),
            definition_expression: Some("Class <> 'picture'".into()),
            renderer: Renderer::UniqueValuePoi(symbology::poi_renderer().clone()),
            labeling: Some(symbology::poi_label_rule()),
            elevation_mode: Some(ElevationMode::RelativeToGround),
            popup: None,
            screen_size_perspective: false,
        }
    }

    fn cities_layer_spec(&self) -> FeatureLayerSpec {
        FeatureLayerSpec {
            name: "cities".into(),
            url: self.config.cities_service_url.clone(),
            definition_expression: Some(CITIES_FILTER.into()),
            renderer: Renderer::UniqueValueMarker(symbology::cities_renderer().clone()),
            labeling: Some(symbology::cities_label_rule()),
            elevation_mode: None,
            popup: None,
            screen_size_perspective: true,
        }
    }

    /// Fetch and parse the configured track, from a url or a local path,
    /// under an explicit timeout.
    async fn load_track(&self) -> Result<Track, Error> {
        let source = self.config.track_file.as_str();
        let timeout = Duration::from_secs(self.config.fetch_timeout_secs);
        if source.starts_with("http://") || source.starts_with("https://") {
            let fetch = async {
                let bytes = reqwest::get(source)
                    .await?
                    .error_for_status()?
                    .bytes()
                    .await?;
                let name = source.rsplit('/').next().unwrap_or(source);
                decode_fetched_track(name, &bytes)
            };
            tokio::time::timeout(timeout, fetch)
                .await
                .map_err(|_| Error::CustomError(format_sstr!("track fetch timed out: {source}")))?
        } else {
            TrackParse::new().with_file(Path::new(source))
        }
    }

    async fn build_profile(&self, geometry: &LineGeometry) -> Option<ElevationProfile> {
        let profile = if geometry.has_z {
            ElevationProfile::from_geometry(geometry)
        } else {
            debug!("flat track geometry, sampling ground elevation");
            match GroundElevationClient::new(&self.config) {
                Ok(source) => ElevationProfile::from_ground(geometry, &source).await,
                Err(e) => Err(e),
            }
        };
        match profile {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!("skipping elevation profile: {e}");
                None
            }
        }
    }

    /// Drive the view controller from ui events until the channel closes.
    /// Unknown viewpoint keys are logged and dropped, they never tear down
    /// the page.
    pub async fn run_ui_events(view: &ViewController, mut events: Receiver<UiEvent>) {
        while let Some(event) = events.recv().await {
            match event {
                UiEvent::ViewpointClick { key } => {
                    if let Err(e) = view.go_to_key(&key) {
                        warn!("ignoring viewpoint click: {e}");
                    }
                }
                UiEvent::Resize { width, height } => view.set_padding(width, height),
            }
        }
    }
}

/// Turn a fetched track body into a parsed track. The name decides both
/// compression and filetype, a trailing `.gz` is decoded before the document
/// reaches the xml parser.
fn decode_fetched_track(name: &str, bytes: &[u8]) -> Result<Track, Error> {
    let stem = name.trim_end_matches(".gz");
    let filetype = if stem.ends_with(".gpx") { "gpx" } else { "tcx" };
    let body = if stem.len() == name.len() {
        String::from_utf8(bytes.to_vec())?
    } else {
        let mut buf = String::new();
        GzDecoder::new(bytes).read_to_string(&mut buf)?;
        buf
    };
    TrackParse::parse_text(name, filetype, &body)
}

/// Arcade expression resolving the first attachment of a feature to an image
/// url for the popup.
fn attachment_popup(service_url: &str) -> PopupTemplate {
    PopupTemplate {
        expression_name: "image".into(),
        expression: format_sstr!(
            r#"
  var urlPart1 = "{service_url}/"
  var objectID = $feature.OBJECTID
  var urlPart2 = "/attachments/"
  var attachID = 0;
  if (Count(Attachments($feature)) > 0) {{
    attachID = (First(Attachments($feature))).id
  }}
  return urlPart1 + objectID + urlPart2 + attachID
"#
        ),
        content: "<img src='{expression/image}'%'>".into(),
        last_edit_info_enabled: false,
    }
}
