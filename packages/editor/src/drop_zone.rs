//! # Drop-Zone Registry
//!
//! Tracks the regions a dragged item can land in. Each zone is backed by a
//! [`ZoneGeometry`] provider that is asked for its rectangle on every
//! lookup; layout changes between frames are therefore always observed.
//!
//! Zones are kept in registration order. When zones overlap, the most
//! recently registered one wins: inner zones register after the section
//! that contains them has rendered.

use serde::{Deserialize, Serialize};

/// A point in page coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Largest per-axis distance to `other`
    pub fn axis_distance(&self, other: Point) -> f64 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

/// Axis-aligned rectangle in page coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn mid_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Half-open containment: the top/left edges belong to the rectangle,
    /// the bottom/right edges belong to whatever is below/right of it.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

/// Bounds of one child element inside a zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildBounds {
    pub id: String,
    pub rect: Rect,
}

/// Live geometry of a zone
pub trait ZoneGeometry {
    /// Current bounding rectangle of the zone
    fn bounds(&self) -> Rect;

    /// Current rectangles of the zone's children, in document order
    fn children(&self) -> Vec<ChildBounds>;
}

/// Geometry measured once and handed over (bindings, tests, headless replay)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StaticZone {
    pub bounds: Rect,
    #[serde(default)]
    pub children: Vec<ChildBounds>,
}

impl StaticZone {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, id: impl Into<String>, rect: Rect) -> Self {
        self.children.push(ChildBounds { id: id.into(), rect });
        self
    }
}

impl ZoneGeometry for StaticZone {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn children(&self) -> Vec<ChildBounds> {
        self.children.clone()
    }
}

/// What dropping into a zone means
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ZoneKind {
    /// Components land in this column
    #[serde(rename_all = "camelCase")]
    Column { column_id: String },
    /// Sections are reordered within the page's section list
    SectionList,
}

/// Visual state of a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ZoneState {
    Empty,
    Occupied,
}

/// Where a dragged item goes inside a zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertionPoint {
    /// Sibling the item goes in front of; `None` means the end of the list
    pub before: Option<String>,

    /// Vertical position of the insertion marker
    pub indicator_y: f64,
}

impl InsertionPoint {
    pub fn at_end(indicator_y: f64) -> Self {
        Self {
            before: None,
            indicator_y,
        }
    }
}

struct ZoneEntry {
    id: String,
    kind: ZoneKind,
    geometry: Box<dyn ZoneGeometry>,
}

/// Registered drop targets
#[derive(Default)]
pub struct DropZoneRegistry {
    zones: Vec<ZoneEntry>,
}

impl std::fmt::Debug for DropZoneRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.zones.iter().map(|z| (&z.id, &z.kind)))
            .finish()
    }
}

impl DropZoneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a zone, replacing any zone with the same id. The
    /// replacement counts as the most recent registration.
    pub fn register(
        &mut self,
        zone_id: impl Into<String>,
        kind: ZoneKind,
        geometry: impl ZoneGeometry + 'static,
    ) {
        let id = zone_id.into();
        self.zones.retain(|z| z.id != id);
        self.zones.push(ZoneEntry {
            id,
            kind,
            geometry: Box::new(geometry),
        });
    }

    /// Returns whether a zone was removed
    pub fn unregister(&mut self, zone_id: &str) -> bool {
        let before = self.zones.len();
        self.zones.retain(|z| z.id != zone_id);
        self.zones.len() != before
    }

    pub fn clear(&mut self) {
        self.zones.clear();
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn kind(&self, zone_id: &str) -> Option<&ZoneKind> {
        self.entry(zone_id).map(|z| &z.kind)
    }

    /// Innermost zone containing `(x, y)`
    pub fn find_zone_at(&self, x: f64, y: f64) -> Option<&str> {
        self.find_zone_matching(Point::new(x, y), |_| true)
    }

    /// Innermost zone containing `point` whose kind passes `accept`
    pub fn find_zone_matching(
        &self,
        point: Point,
        accept: impl Fn(&ZoneKind) -> bool,
    ) -> Option<&str> {
        self.zones
            .iter()
            .rev()
            .find(|z| accept(&z.kind) && z.geometry.bounds().contains(point))
            .map(|z| z.id.as_str())
    }

    /// Midpoint rule: the item goes before the first child whose vertical
    /// midpoint lies strictly below `y`, or at the end when none does.
    /// `exclude` (the node being dragged) never competes for a position.
    pub fn find_insertion_point(
        &self,
        zone_id: &str,
        y: f64,
        exclude: Option<&str>,
    ) -> Option<InsertionPoint> {
        let zone = self.entry(zone_id)?;
        let children: Vec<ChildBounds> = zone
            .geometry
            .children()
            .into_iter()
            .filter(|c| Some(c.id.as_str()) != exclude)
            .collect();

        let point = match children.iter().find(|c| c.rect.mid_y() > y) {
            Some(child) => InsertionPoint {
                before: Some(child.id.clone()),
                indicator_y: child.rect.y,
            },
            None => {
                let end = children
                    .last()
                    .map(|c| c.rect.bottom())
                    .unwrap_or_else(|| zone.geometry.bounds().y);
                InsertionPoint::at_end(end)
            }
        };

        Some(point)
    }

    /// `Empty` while the zone has no children
    pub fn zone_state(&self, zone_id: &str) -> Option<ZoneState> {
        let zone = self.entry(zone_id)?;
        let state = if zone.geometry.children().is_empty() {
            ZoneState::Empty
        } else {
            ZoneState::Occupied
        };
        Some(state)
    }

    fn entry(&self, zone_id: &str) -> Option<&ZoneEntry> {
        self.zones.iter().find(|z| z.id == zone_id)
    }
}
