use log::debug;
use serde::{Deserialize, Serialize};
use stack_string::StackString;

use trail_models::layer::Layer;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    Multiply,
    Normal,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BasemapLayerKind {
    Tile,
    VectorTile,
}

/// A portal-item backed basemap layer of the overview map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BasemapLayer {
    pub kind: BasemapLayerKind,
    pub portal_item_id: StackString,
    pub opacity: f64,
    pub blend_mode: Option<BlendMode>,
}

/// Either a well-known basemap by name or a custom base layer stack.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Basemap {
    Named(StackString),
    Layers(Vec<BasemapLayer>),
}

/// The scene description handed to the display client: basemap, ground and
/// an ordered layer collection. Only ever mutated from the composing task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scene {
    pub basemap: Basemap,
    pub ground: Option<StackString>,
    layers: Vec<Layer>,
}

impl Scene {
    #[must_use]
    pub fn new(basemap: Basemap, ground: Option<StackString>) -> Self {
        Self {
            basemap,
            ground,
            layers: Vec::new(),
        }
    }

    /// Registration order is draw order, last added on top.
    pub fn add_layer(&mut self, layer: Layer) {
        debug!("add layer {}", layer.name);
        self.layers.push(layer);
    }

    pub fn remove_layer(&mut self, name: &str) -> Option<Layer> {
        let index = self.layers.iter().position(|l| l.name == name)?;
        Some(self.layers.remove(index))
    }

    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    #[must_use]
    pub fn layer_names(&self) -> Vec<StackString> {
        self.layers.iter().map(|l| l.name.clone()).collect()
    }
}

/// The small locator map from the hike description, fixed center and zoom,
/// no ui components.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverviewMap {
    pub scene: Scene,
    pub center: [f64; 2],
    pub zoom: u32,
}

#[cfg(test)]
mod tests {
    use trail_models::{
        layer::{Layer, LayerSource, Renderer},
        symbol::LineSymbol,
    };

    use crate::scene::{Basemap, Scene};

    fn dummy_layer(name: &str) -> Layer {
        Layer {
            name: name.into(),
            source: LayerSource::FeatureService {
                url: "https://example.org/FeatureServer/0".into(),
                definition_expression: None,
            },
            renderer: Renderer::SimpleLine(LineSymbol::track_line()),
            labeling: None,
            elevation_mode: None,
            popup: None,
            screen_size_perspective: false,
        }
    }

    #[test]
    fn test_layer_order_is_registration_order() {
        let mut scene = Scene::new(Basemap::Named("satellite".into()), None);
        scene.add_layer(dummy_layer("pictures"));
        scene.add_layer(dummy_layer("hiking-poi"));
        scene.add_layer(dummy_layer("track"));
        assert_eq!(scene.layer_names(), vec!["pictures", "hiking-poi", "track"]);

        scene.remove_layer("hiking-poi").unwrap();
        assert_eq!(scene.layer_names(), vec!["pictures", "track"]);
        assert!(scene.remove_layer("hiking-poi").is_none());
    }
}
