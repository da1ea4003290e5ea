// Strong typing over strings. Newtypes for region ids, product refs, pixel and percent space.
// Authored data is immutable once loaded; only SelectionState (selection.rs) mutates.

use serde::{Deserialize, Serialize};

use crate::error::HotspotError;

/// Unique key of a region within one registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(String);

impl RegionId {
    pub fn new(id: impl Into<String>) -> Self {
        RegionId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RegionId {
    fn from(id: &str) -> Self {
        RegionId::new(id)
    }
}

impl std::fmt::Display for RegionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque reference to externally-owned product data. Never interpreted here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ProductRef(String);

impl ProductRef {
    pub fn new(reference: impl Into<String>) -> Self {
        ProductRef(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier the host assigns to one physical pointer event.
/// Lets the core tell a click apart from the click-outside it would otherwise trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct PointerEventId(u32);

impl PointerEventId {
    pub fn new(id: u32) -> Self {
        PointerEventId(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

/// Point in the diagram's source pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        PixelPoint { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for PixelPoint {
    fn from((x, y): (f64, f64)) -> Self {
        PixelPoint { x, y }
    }
}

/// Resolution-independent popup anchor, in percent of the diagram.
/// Not clamped: a point outside the diagram lands outside 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct AnchorPosition {
    pub x_percent: f64,
    pub y_percent: f64,
}

impl AnchorPosition {
    pub fn new(x_percent: f64, y_percent: f64) -> Self {
        AnchorPosition {
            x_percent,
            y_percent,
        }
    }
}

/// Pixel size of the source image the polygons are authored against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiagramSpace {
    pub width: f64,
    pub height: f64,
}

impl DiagramSpace {
    /// Both axes must be finite and strictly positive.
    pub fn new(width: f64, height: f64) -> Result<Self, HotspotError> {
        let space = DiagramSpace { width, height };
        space.validate()?;
        Ok(space)
    }

    pub fn validate(&self) -> Result<(), HotspotError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if valid(self.width) && valid(self.height) {
            Ok(())
        } else {
            Err(HotspotError::InvalidDiagram {
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// One authored polygonal region and the popup content attached to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionDefinition {
    pub id: RegionId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub product_ref: ProductRef,
    /// At least three vertices. Winding and convexity don't matter.
    pub polygon: Vec<PixelPoint>,
}

impl RegionDefinition {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        polygon: Vec<PixelPoint>,
    ) -> Self {
        RegionDefinition {
            id: RegionId::new(id),
            title: title.into(),
            description: String::new(),
            product_ref: ProductRef::default(),
            polygon,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_product_ref(mut self, product_ref: impl Into<String>) -> Self {
        self.product_ref = ProductRef::new(product_ref);
        self
    }
}

/// Per-diagram scroll configuration. Units match whatever the scroll tracker emits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapSettings {
    /// Progress value at which the first region starts activating.
    #[serde(default = "default_selection_start")]
    pub selection_start: f64,
    /// Progress span each region stays active for.
    #[serde(default = "default_range_per_region")]
    pub range_per_region: f64,
}

fn default_selection_start() -> f64 {
    100.0
}

fn default_range_per_region() -> f64 {
    30.0
}

impl Default for MapSettings {
    fn default() -> Self {
        MapSettings {
            selection_start: default_selection_start(),
            range_per_region: default_range_per_region(),
        }
    }
}

impl MapSettings {
    pub fn validate(&self) -> Result<(), HotspotError> {
        if !self.selection_start.is_finite() || self.selection_start < 0.0 {
            return Err(HotspotError::InvalidSettings(format!(
                "selection_start must be finite and non-negative, got {}",
                self.selection_start
            )));
        }
        if !self.range_per_region.is_finite() || self.range_per_region <= 0.0 {
            return Err(HotspotError::InvalidSettings(format!(
                "range_per_region must be finite and positive, got {}",
                self.range_per_region
            )));
        }
        Ok(())
    }

    /// Total progress span covered by `total_regions` regions.
    pub fn total_range(&self, total_regions: usize) -> f64 {
        total_regions as f64 * self.range_per_region
    }
}

/// Full configuration of one map, as handed over by the host page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotspotMapConfig {
    #[serde(default)]
    pub name: String,
    pub diagram: DiagramSpace,
    pub regions: Vec<RegionDefinition>,
    #[serde(default)]
    pub settings: MapSettings,
}
