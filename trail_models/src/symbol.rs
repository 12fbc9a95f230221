use serde::{Deserialize, Serialize};
use stack_string::StackString;

use trail_lib::errors::TrailError as Error;

/// Opaque color, serialized as `[r, g, b]` the way the display client
/// autocasts it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Rgba(pub u8, pub u8, pub u8, pub f32);

pub const LIGHT_BLUE: Rgb = Rgb(129, 175, 214);
pub const LIGHT_BROWN: Rgb = Rgb(161, 136, 119);
pub const ORANGE: Rgb = Rgb(245, 173, 66);
pub const GRAY: Rgb = Rgb(100, 100, 100);
pub const WHITE: Rgb = Rgb(255, 255, 255);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum IconResource {
    Primitive { primitive: StackString },
    Href { href: StackString },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Material {
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct IconOutline {
    pub color: Rgb,
    pub size: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IconSymbolLayer {
    #[serde(rename = "type")]
    pub kind: StackString,
    pub resource: IconResource,
    pub material: Material,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline: Option<IconOutline>,
    pub size: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VerticalOffset {
    pub screen_length: f64,
    pub max_world_length: f64,
    pub min_world_length: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CalloutBorder {
    pub color: Rgb,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Callout {
    #[serde(rename = "type")]
    pub kind: StackString,
    pub size: f64,
    pub color: Rgba,
    pub border: CalloutBorder,
}

/// The badge-on-a-callout poi symbol of the story page: a colored circle with
/// a white pictogram, floated above the terrain on a thin white line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Point3dSymbol {
    #[serde(rename = "type")]
    pub kind: StackString,
    pub symbol_layers: Vec<IconSymbolLayer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_offset: Option<VerticalOffset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callout: Option<Callout>,
}

impl Point3dSymbol {
    /// Badge symbol for a poi class, icon url over a tinted circle.
    #[must_use]
    pub fn icon_badge(svg_url: &str, color: Rgb) -> Self {
        Self {
            kind: "point-3d".into(),
            symbol_layers: vec![
                IconSymbolLayer {
                    kind: "icon".into(),
                    resource: IconResource::Primitive {
                        primitive: "circle".into(),
                    },
                    material: Material { color },
                    outline: Some(IconOutline {
                        color: WHITE,
                        size: 1.0,
                    }),
                    size: 20.0,
                },
                IconSymbolLayer {
                    kind: "icon".into(),
                    resource: IconResource::Href {
                        href: svg_url.into(),
                    },
                    material: Material { color: WHITE },
                    outline: None,
                    size: 10.0,
                },
            ],
            vertical_offset: Some(VerticalOffset {
                screen_length: 40.0,
                max_world_length: 500_000.0,
                min_world_length: 0.0,
            }),
            callout: Some(Callout {
                kind: "line".into(),
                size: 1.5,
                color: Rgba(255, 255, 255, 1.0),
                border: CalloutBorder { color: GRAY },
            }),
        }
    }

    /// Near-invisible fallback dot, the designated default when a poi class
    /// has no rule.
    #[must_use]
    pub fn tiny_dot() -> Self {
        Self {
            kind: "point-3d".into(),
            symbol_layers: vec![IconSymbolLayer {
                kind: "icon".into(),
                resource: IconResource::Primitive {
                    primitive: "circle".into(),
                },
                material: Material { color: WHITE },
                outline: None,
                size: 0.1,
            }],
            vertical_offset: None,
            callout: None,
        }
    }
}

/// Flat circle marker used on the overview map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarkerSymbol {
    #[serde(rename = "type")]
    pub kind: StackString,
    pub style: StackString,
    pub color: Rgb,
    pub size: StackString,
    pub outline: MarkerOutline,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MarkerOutline {
    pub width: f64,
}

impl MarkerSymbol {
    #[must_use]
    pub fn circle(color: Rgb) -> Self {
        Self {
            kind: "simple-marker".into(),
            style: "circle".into(),
            color,
            size: "8px".into(),
            outline: MarkerOutline { width: 0.0 },
        }
    }
}

/// Line symbol for the track overlay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineSymbol {
    #[serde(rename = "type")]
    pub kind: StackString,
    pub width: f64,
    pub color: StackString,
    pub style: StackString,
    pub cap: StackString,
    pub join: StackString,
}

impl LineSymbol {
    #[must_use]
    pub fn track_line() -> Self {
        Self {
            kind: "simple-line".into(),
            width: 1.0,
            color: "#ff7f00".into(),
            style: "solid".into(),
            cap: "round".into(),
            join: "round".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Halo {
    pub size: f64,
    pub color: Rgba,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Font {
    pub size: f64,
    pub family: StackString,
}

/// Label text symbols, the flat variant for map views and the halo'd 3d
/// variant for scene views.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum LabelSymbol {
    #[serde(rename_all = "camelCase")]
    Text {
        color: Rgb,
        halo_size: f64,
        halo_color: Rgba,
    },
    Label3d {
        color: Rgba,
        halo: Halo,
        font: Font,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SymbolRule<S> {
    pub value: StackString,
    pub symbol: S,
}

/// Categorical renderer: exact match against a small fixed table, designated
/// default on a miss. Construction rejects duplicate match values so the
/// table stays unambiguous.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UniqueValueRenderer<S> {
    pub field: StackString,
    pub default_symbol: S,
    pub rules: Vec<SymbolRule<S>>,
}

impl<S> UniqueValueRenderer<S> {
    /// # Errors
    /// Return error if two rules share a match value
    pub fn new(
        field: StackString,
        default_symbol: S,
        rules: Vec<SymbolRule<S>>,
    ) -> Result<Self, Error> {
        for (i, rule) in rules.iter().enumerate() {
            if rules[..i].iter().any(|r| r.value == rule.value) {
                return Err(Error::CustomError(
                    stack_string::format_sstr!("duplicate symbol rule for {}", rule.value),
                ));
            }
        }
        Ok(Self {
            field,
            default_symbol,
            rules,
        })
    }

    /// Exact-match lookup, default symbol on a miss.
    #[must_use]
    pub fn resolve(&self, value: &str) -> &S {
        self.rules
            .iter()
            .find(|r| r.value == value)
            .map_or(&self.default_symbol, |r| &r.symbol)
    }
}
