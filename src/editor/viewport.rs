//! Coordinate transforms between screen (pointer) space and world space.
//!
//! Node positions are stored once in world space; every screen placement is
//! a projection recomputed from the current zoom and pan.

use crate::config::EditorConfig;
use crate::model::Point;

/// Slack allowed when comparing an accumulated zoom against its bounds.
const ZOOM_EPSILON: f64 = 1e-9;

/// Zoom, pan and the editor's screen-space origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    zoom: f64,
    min_zoom: f64,
    max_zoom: f64,
    zoom_step: f64,
    /// Accumulated raw pointer movement while panning.
    pan: Point,
    /// Screen-space top-left corner of the editor surface.
    origin: Point,
    panning: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

impl Viewport {
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            zoom: config.initial_zoom,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            zoom_step: config.zoom_step,
            pan: Point::default(),
            origin: Point::default(),
            panning: false,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn pan(&self) -> Point {
        self.pan
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    pub fn is_panning(&self) -> bool {
        self.panning
    }

    pub fn set_panning(&mut self, panning: bool) {
        self.panning = panning;
    }

    /// Step the zoom by one increment in the direction of `delta_sign`.
    ///
    /// A step that would leave `[min_zoom, max_zoom]` is rejected outright
    /// and `false` is returned; the zoom is never clamped-and-applied.
    pub fn adjust_zoom(&mut self, delta_sign: f64) -> bool {
        if delta_sign == 0.0 || delta_sign.is_nan() {
            return false;
        }
        let next = self.zoom + self.zoom_step * delta_sign.signum();
        if next < self.min_zoom - ZOOM_EPSILON || next > self.max_zoom + ZOOM_EPSILON {
            return false;
        }
        // Only absorbs accumulation error; real overshoot was rejected above.
        self.zoom = next.clamp(self.min_zoom, self.max_zoom);
        true
    }

    /// Add raw pointer movement to the pan offset while panning is engaged.
    /// Movement is not scaled by zoom.
    pub fn accumulate_pan(&mut self, movement_x: f64, movement_y: f64) -> bool {
        if !self.panning {
            return false;
        }
        self.pan.x += movement_x;
        self.pan.y += movement_y;
        true
    }

    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.origin.x) / self.zoom - self.pan.x / self.zoom,
            y: (screen.y - self.origin.y) / self.zoom - self.pan.y / self.zoom,
        }
    }

    /// Position relative to the editor surface, used to place rendered nodes.
    pub fn world_to_local(&self, world: Point) -> Point {
        Point {
            x: world.x * self.zoom + self.pan.x,
            y: world.y * self.zoom + self.pan.y,
        }
    }

    /// Inverse of [`Viewport::screen_to_world`].
    pub fn world_to_screen(&self, world: Point) -> Point {
        let local = self.world_to_local(world);
        Point {
            x: local.x + self.origin.x,
            y: local.y + self.origin.y,
        }
    }

    /// Screen positions reported by port references, rescaled into the
    /// unzoomed space wires are drawn in.
    pub fn to_wire_space(&self, screen: Point) -> Point {
        Point {
            x: screen.x / self.zoom,
            y: screen.y / self.zoom,
        }
    }
}
