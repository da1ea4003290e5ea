// Hotspot registry: the ordered, validated catalog of regions for one diagram.
// Order is significant: it is the sequence in which scroll progress activates regions.

use std::collections::HashSet;

use crate::error::HotspotError;
use crate::types::*;

/// Minimum vertex count for a region polygon.
pub const MIN_POLYGON_POINTS: usize = 3;

/// Read-only list of regions authored against one diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct HotspotRegistry {
    name: String,
    diagram: DiagramSpace,
    regions: Vec<RegionDefinition>,
}

impl HotspotRegistry {
    /// Validate and freeze a set of regions.
    ///
    /// Fails on a non-positive diagram, on empty or duplicate ids, and on any polygon
    /// with fewer than three points or a non-finite or negative coordinate.
    pub fn new(
        name: impl Into<String>,
        diagram: DiagramSpace,
        regions: Vec<RegionDefinition>,
    ) -> Result<Self, HotspotError> {
        diagram.validate()?;

        let mut seen = HashSet::with_capacity(regions.len());
        for region in &regions {
            validate_region(region)?;
            if !seen.insert(region.id.clone()) {
                return Err(HotspotError::DuplicateRegionId(region.id.clone()));
            }
        }

        Ok(HotspotRegistry {
            name: name.into(),
            diagram,
            regions,
        })
    }

    /// Build from a `HotspotMapConfig` JSON document, ignoring its settings block.
    pub fn from_json(json: &str) -> Result<Self, HotspotError> {
        let config: HotspotMapConfig = serde_json::from_str(json)?;
        Self::from_config(config).map(|(registry, _)| registry)
    }

    /// Split a map configuration into a registry and validated settings.
    pub fn from_config(config: HotspotMapConfig) -> Result<(Self, MapSettings), HotspotError> {
        config.settings.validate()?;
        let registry = Self::new(config.name, config.diagram, config.regions)?;
        Ok((registry, config.settings))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn diagram(&self) -> DiagramSpace {
        self.diagram
    }

    pub fn regions(&self) -> &[RegionDefinition] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn get(&self, id: &RegionId) -> Option<&RegionDefinition> {
        self.regions.iter().find(|r| &r.id == id)
    }

    pub fn contains(&self, id: &RegionId) -> bool {
        self.get(id).is_some()
    }

    pub fn by_index(&self, index: usize) -> Option<&RegionDefinition> {
        self.regions.get(index)
    }

    pub fn index_of(&self, id: &RegionId) -> Option<usize> {
        self.regions.iter().position(|r| &r.id == id)
    }

    /// The final region in activation order.
    pub fn last(&self) -> Option<&RegionDefinition> {
        self.regions.last()
    }
}

fn validate_region(region: &RegionDefinition) -> Result<(), HotspotError> {
    let invalid = |reason: String| HotspotError::InvalidRegion {
        id: region.id.clone(),
        reason,
    };

    if region.id.as_str().is_empty() {
        return Err(invalid("id must not be empty".to_string()));
    }

    if region.polygon.len() < MIN_POLYGON_POINTS {
        return Err(invalid(format!(
            "polygon has {} points, at least {} required",
            region.polygon.len(),
            MIN_POLYGON_POINTS
        )));
    }

    for (i, point) in region.polygon.iter().enumerate() {
        if !point.is_finite() {
            return Err(invalid(format!("vertex {} is not finite", i)));
        }
        if point.x < 0.0 || point.y < 0.0 {
            return Err(invalid(format!(
                "vertex {} has negative coordinate ({}, {})",
                i, point.x, point.y
            )));
        }
    }

    Ok(())
}
