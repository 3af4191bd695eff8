//! Live geometry handles for rendered ports.
//!
//! A rendered port registers a [`PortGeometry`] under its [`IoId`] so wires
//! can be drawn to wherever the port currently sits on screen. References
//! are back-references only: graph identity never depends on them.

use std::cell::Cell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::model::{IoId, Point};

/// Coordinate returned when a port has no usable geometry.
pub const MISSING_COORDINATE: f64 = -1.0;

/// Colour used when nothing more specific is known.
pub const DEFAULT_PORT_COLOR: &str = "white";

/// Screen-space geometry accessor supplied by the renderer.
pub trait PortGeometry {
    /// Current x, or [`MISSING_COORDINATE`] when the element is gone.
    fn x(&self) -> f64;
    /// Current y, or [`MISSING_COORDINATE`] when the element is gone.
    fn y(&self) -> f64;
    fn color(&self) -> &str {
        DEFAULT_PORT_COLOR
    }
}

/// A [`PortGeometry`] whose position is pushed in by the renderer.
#[derive(Debug)]
pub struct TrackedPort {
    x: Cell<f64>,
    y: Cell<f64>,
    color: String,
}

impl TrackedPort {
    pub fn new(position: Point, color: impl Into<String>) -> Self {
        Self {
            x: Cell::new(position.x),
            y: Cell::new(position.y),
            color: color.into(),
        }
    }

    pub fn set_position(&self, position: Point) {
        self.x.set(position.x);
        self.y.set(position.y);
    }
}

impl PortGeometry for TrackedPort {
    fn x(&self) -> f64 {
        self.x.get()
    }

    fn y(&self) -> f64 {
        self.y.get()
    }

    fn color(&self) -> &str {
        &self.color
    }
}

/// Map from port id to its geometry accessor.
#[derive(Default, Clone)]
pub struct PortReferenceRegistry {
    refs: IndexMap<IoId, Rc<dyn PortGeometry>>,
}

impl std::fmt::Debug for PortReferenceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.refs.keys()).finish()
    }
}

impl PortReferenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register geometry for `io_id`. The first registration wins; later ones
    /// are ignored and `false` is returned.
    pub fn register(&mut self, io_id: impl Into<IoId>, geometry: Rc<dyn PortGeometry>) -> bool {
        let io_id = io_id.into();
        if self.refs.contains_key(&io_id) {
            return false;
        }
        self.refs.insert(io_id, geometry);
        true
    }

    pub fn get(&self, io_id: &str) -> Option<&Rc<dyn PortGeometry>> {
        self.refs.get(io_id)
    }

    pub fn contains(&self, io_id: &str) -> bool {
        self.refs.contains_key(io_id)
    }

    /// Current position of a port, or `(-1, -1)` if it has not registered.
    pub fn position(&self, io_id: &str) -> Point {
        match self.refs.get(io_id) {
            Some(geometry) => Point::new(geometry.x(), geometry.y()),
            None => Point::new(MISSING_COORDINATE, MISSING_COORDINATE),
        }
    }

    pub fn color(&self, io_id: &str) -> &str {
        self.refs
            .get(io_id)
            .map_or(DEFAULT_PORT_COLOR, |geometry| geometry.color())
    }

    pub fn remove(&mut self, io_id: &str) -> bool {
        self.refs.shift_remove(io_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    pub fn io_ids(&self) -> impl Iterator<Item = &IoId> {
        self.refs.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_registration_wins() {
        let mut refs = PortReferenceRegistry::new();
        let first: Rc<dyn PortGeometry> = Rc::new(TrackedPort::new(Point::new(1.0, 2.0), "red"));
        let second: Rc<dyn PortGeometry> = Rc::new(TrackedPort::new(Point::new(9.0, 9.0), "blue"));
        assert!(refs.register("aOUT0", first.clone()));
        assert!(!refs.register("aOUT0", second));
        assert!(Rc::ptr_eq(refs.get("aOUT0").unwrap(), &first));
        assert_eq!(refs.position("aOUT0"), Point::new(1.0, 2.0));
        assert_eq!(refs.color("aOUT0"), "red");
    }

    #[test]
    fn test_missing_reference_is_sentinel() {
        let refs = PortReferenceRegistry::new();
        assert_eq!(refs.position("nope"), Point::new(-1.0, -1.0));
        assert_eq!(refs.color("nope"), DEFAULT_PORT_COLOR);
    }

    #[test]
    fn test_geometry_is_live() {
        let mut refs = PortReferenceRegistry::new();
        let port = Rc::new(TrackedPort::new(Point::new(1.0, 1.0), "white"));
        refs.register("aIN0", port.clone());
        port.set_position(Point::new(40.0, 50.0));
        assert_eq!(refs.position("aIN0"), Point::new(40.0, 50.0));
    }

    #[test]
    fn test_remove() {
        let mut refs = PortReferenceRegistry::new();
        refs.register("aIN0", Rc::new(TrackedPort::new(Point::default(), "white")));
        assert!(refs.remove("aIN0"));
        assert!(!refs.remove("aIN0"));
        assert!(refs.is_empty());
    }
}
