use once_cell::sync::Lazy;

use trail_models::symbol::{
    Font, Halo, LabelSymbol, MarkerSymbol, Point3dSymbol, Rgb, Rgba, SymbolRule,
    UniqueValueRenderer, GRAY, LIGHT_BLUE, LIGHT_BROWN, ORANGE,
};
use trail_models::layer::LabelRule;
use trail_utils::poi_class::PoiClass;

pub const POI_FIELD: &str = "Class";
pub const CITY_FIELD: &str = "KURZTEXT";

const ICON_BASE: &str = "https://static.arcgis.com/arcgis/styleItems/Icons/web/resource";

fn icon_url(name: &str) -> String {
    format!("{ICON_BASE}/{name}")
}

/// Build-time table mapping poi classes to their badge symbols; anything not
/// listed falls back to the near-invisible default dot.
static POI_RENDERER: Lazy<UniqueValueRenderer<Point3dSymbol>> = Lazy::new(init_poi_renderer);

fn init_poi_renderer() -> UniqueValueRenderer<Point3dSymbol> {
    UniqueValueRenderer::new(
        POI_FIELD.into(),
        Point3dSymbol::tiny_dot(),
        vec![
            SymbolRule {
                value: PoiClass::Restaurant.to_str().into(),
                symbol: Point3dSymbol::icon_badge(&icon_url("Restaurant.svg"), LIGHT_BROWN),
            },
            SymbolRule {
                value: PoiClass::Bus.to_str().into(),
                symbol: Point3dSymbol::icon_badge(&icon_url("Bus.svg"), LIGHT_BLUE),
            },
            SymbolRule {
                value: PoiClass::CableCar.to_str().into(),
                symbol: Point3dSymbol::icon_badge(&icon_url("AerialTram.svg"), LIGHT_BLUE),
            },
        ],
    )
    .expect("duplicate poi symbol rule")
}

static CITIES_RENDERER: Lazy<UniqueValueRenderer<MarkerSymbol>> = Lazy::new(|| {
    UniqueValueRenderer::new(
        CITY_FIELD.into(),
        MarkerSymbol::circle(Rgb(150, 150, 150)),
        vec![SymbolRule {
            value: "Kandersteg".into(),
            symbol: MarkerSymbol::circle(ORANGE),
        }],
    )
    .expect("duplicate city symbol rule")
});

#[must_use]
pub fn poi_renderer() -> &'static UniqueValueRenderer<Point3dSymbol> {
    &POI_RENDERER
}

/// Exact-match lookup against the fixed table, default descriptor on a miss.
#[must_use]
pub fn resolve_poi_symbol(value: &str) -> &'static Point3dSymbol {
    POI_RENDERER.resolve(value)
}

#[must_use]
pub fn cities_renderer() -> &'static UniqueValueRenderer<MarkerSymbol> {
    &CITIES_RENDERER
}

/// Symbol of the picture-attachment markers, a gray landmark badge.
#[must_use]
pub fn picture_symbol() -> Point3dSymbol {
    Point3dSymbol::icon_badge(&icon_url("Landmark.svg"), GRAY)
}

/// White 3d labels with a dark blue halo for the poi names.
#[must_use]
pub fn poi_label_rule() -> LabelRule {
    LabelRule {
        expression: "$feature.Name".into(),
        placement: None,
        symbol: LabelSymbol::Label3d {
            color: Rgba(255, 255, 255, 0.9),
            halo: Halo {
                size: 1.0,
                color: Rgba(27, 53, 94, 1.0),
            },
            font: Font {
                size: 10.0,
                family: "sans-serif".into(),
            },
        },
    }
}

/// Flat gray labels above the city markers on the overview map.
#[must_use]
pub fn cities_label_rule() -> LabelRule {
    LabelRule {
        expression: "$feature.KURZTEXT".into(),
        placement: Some("above-center".into()),
        symbol: LabelSymbol::Text {
            color: GRAY,
            halo_size: 1.0,
            halo_color: Rgba(255, 255, 255, 0.9),
        },
    }
}

#[cfg(test)]
mod tests {
    use trail_models::symbol::{Point3dSymbol, LIGHT_BLUE, LIGHT_BROWN};

    use crate::symbology::{cities_renderer, poi_renderer, resolve_poi_symbol};

    #[test]
    fn test_table_values_resolve_to_themselves() {
        for (class, color) in [
            ("restaurant", LIGHT_BROWN),
            ("bus", LIGHT_BLUE),
            ("cable car", LIGHT_BLUE),
        ] {
            let symbol = resolve_poi_symbol(class);
            assert_eq!(symbol.symbol_layers[0].material.color, color);
            assert!(symbol.callout.is_some());
        }
    }

    #[test]
    fn test_miss_resolves_to_default() {
        let default = Point3dSymbol::tiny_dot();
        assert_eq!(resolve_poi_symbol("viewpoint"), &default);
        assert_eq!(resolve_poi_symbol(""), &default);
        // no partial matching
        assert_eq!(resolve_poi_symbol("restaurants"), &default);
        assert_eq!(poi_renderer().rules.len(), 3);
    }

    #[test]
    fn test_tables_hold_unique_match_values() {
        let renderer = poi_renderer();
        for (i, rule) in renderer.rules.iter().enumerate() {
            assert!(!renderer.rules[..i].iter().any(|r| r.value == rule.value));
        }
        assert_eq!(cities_renderer().rules.len(), 1);
    }

    #[test]
    fn test_cities_highlight() {
        use trail_models::symbol::{Rgb, ORANGE};
        assert_eq!(cities_renderer().resolve("Kandersteg").color, ORANGE);
        assert_eq!(cities_renderer().resolve("Bern").color, Rgb(150, 150, 150));
    }
}
