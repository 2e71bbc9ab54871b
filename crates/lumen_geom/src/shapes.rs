//! Shapes attached to scene objects
//!
//! A shape is a piece of geometry placed relative to its owner: it has its own
//! position and orientation offset, a concrete kind, and optional child shapes
//! that follow it. The same type serves as visual mesh and as collider.

use crate::collision::Quad;
use lumen_math::{Orientation, Vec2, Vec3};
use std::fmt;

/// Number of sides used when a circle is approximated by a polygon
///
/// A circle of radius `r` becomes a polygon with `r * CIRCLE_SIDES_PER_UNIT`
/// sides, never fewer than [`MIN_CIRCLE_SIDES`].
pub const CIRCLE_SIDES_PER_UNIT: f64 = 20.0;

/// Lower bound on the side count of an approximated circle
pub const MIN_CIRCLE_SIDES: u32 = 12;

/// Concrete geometry of a shape
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeKind {
    /// Arbitrary point list, drawn as an outline or a fan
    Mesh { points: Vec<Vec3> },
    /// Rectangle anchored at its top-left corner, extending right and down
    Rectangle { width: f64, height: f64 },
    /// Regular polygon centered on the shape position
    Polygon { radius: f64, sides: u32 },
    /// Truncated cone standing on the XZ plane, extruded along +Y
    Cylinder {
        base_radius: f64,
        top_radius: f64,
        height: f64,
        sides: u32,
    },
    /// Sphere centered on the shape position
    Sphere { radius: f64 },
}

impl ShapeKind {
    /// Lowercase name of the kind, used in debug dumps and logs
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Mesh { .. } => "mesh",
            ShapeKind::Rectangle { .. } => "rectangle",
            ShapeKind::Polygon { .. } => "polygon",
            ShapeKind::Cylinder { .. } => "cylinder",
            ShapeKind::Sphere { .. } => "sphere",
        }
    }

    /// Radius of the kinds that have a single one
    pub fn radius(&self) -> Option<f64> {
        match self {
            ShapeKind::Polygon { radius, .. } | ShapeKind::Sphere { radius } => Some(*radius),
            _ => None,
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeKind::Mesh { points } => write!(f, "mesh ({} points)", points.len()),
            ShapeKind::Rectangle { width, height } => write!(f, "rectangle {}x{}", width, height),
            ShapeKind::Polygon { radius, sides } => write!(f, "polygon r={} sides={}", radius, sides),
            ShapeKind::Cylinder {
                base_radius,
                top_radius,
                height,
                sides,
            } => write!(f, "cylinder r={}..{} h={} sides={}", base_radius, top_radius, height, sides),
            ShapeKind::Sphere { radius } => write!(f, "sphere r={}", radius),
        }
    }
}

/// Geometry placed relative to its owner
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    position: Vec3,
    orientation: Orientation,
    kind: ShapeKind,
    children: Vec<Shape>,
}

impl Shape {
    /// Create a shape of the given kind at `position`
    pub fn new(position: Vec3, kind: ShapeKind) -> Self {
        Self {
            position,
            orientation: Orientation::IDENTITY,
            kind,
            children: Vec::new(),
        }
    }

    /// Free-form mesh; points are relative to the shape position
    pub fn mesh(points: Vec<Vec3>) -> Self {
        Self::new(Vec3::ZERO, ShapeKind::Mesh { points })
    }

    /// Rectangle whose top-left corner sits at `top_left`
    pub fn rectangle(top_left: Vec3, width: f64, height: f64) -> Self {
        Self::new(top_left, ShapeKind::Rectangle { width, height })
    }

    /// Regular polygon around `center`
    pub fn polygon(center: Vec3, radius: f64, sides: u32) -> Self {
        Self::new(center, ShapeKind::Polygon { radius, sides: sides.max(3) })
    }

    /// Circle around `center`, approximated by a polygon
    pub fn circle(center: Vec3, radius: f64) -> Self {
        let sides = ((radius * CIRCLE_SIDES_PER_UNIT) as u32).max(MIN_CIRCLE_SIDES);
        Self::polygon(center, radius, sides)
    }

    /// Cylinder (or truncated cone) whose base ring is centered on `base_center`
    pub fn cylinder(base_center: Vec3, base_radius: f64, top_radius: f64, height: f64, sides: u32) -> Self {
        Self::new(
            base_center,
            ShapeKind::Cylinder {
                base_radius,
                top_radius,
                height,
                sides: sides.max(3),
            },
        )
    }

    /// Cone: a cylinder with a zero-radius top
    pub fn cone(base_center: Vec3, radius: f64, height: f64, sides: u32) -> Self {
        Self::cylinder(base_center, radius, 0.0, height, sides)
    }

    /// Sphere around `center`
    pub fn sphere(center: Vec3, radius: f64) -> Self {
        Self::new(center, ShapeKind::Sphere { radius })
    }

    /// Builder: set the orientation
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Builder: add a child shape
    pub fn with_child(mut self, child: Shape) -> Self {
        self.children.push(child);
        self
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    #[inline]
    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    #[inline]
    pub fn children(&self) -> &[Shape] {
        &self.children
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    pub fn add_child(&mut self, child: Shape) {
        self.children.push(child);
    }

    /// The same shape seen from a frame rotated by `orientation`
    ///
    /// Both the offset and the orientation are rotated. Children keep their
    /// offsets, which are relative to this shape.
    pub fn rotated(&self, orientation: &Orientation) -> Shape {
        Shape {
            position: orientation.rotate(self.position),
            orientation: orientation.compose(&self.orientation),
            kind: self.kind.clone(),
            children: self.children.clone(),
        }
    }

    /// Radius of circular kinds
    pub fn radius(&self) -> Option<f64> {
        self.kind.radius()
    }

    /// Whether this shape is treated as a circle by the 2D predicates
    pub fn is_circular(&self) -> bool {
        matches!(self.kind, ShapeKind::Polygon { .. } | ShapeKind::Sphere { .. })
    }

    /// Corners of a rectangle, rotated about its top-left corner
    ///
    /// Coordinates are in the owner's frame. Returns `None` for other kinds.
    pub fn quad(&self) -> Option<Quad> {
        let ShapeKind::Rectangle { width, height } = self.kind else {
            return None;
        };

        let top_left = self.position;
        let place = |dx: f64, dy: f64| {
            self.orientation
                .rotate_about(top_left + Vec3::new(dx, dy, 0.0), top_left)
        };

        Some(Quad {
            top_left,
            bottom_left: place(0.0, -height),
            bottom_right: place(width, -height),
            top_right: place(width, 0.0),
        })
    }

    /// Vertices of a regular polygon in the owner's frame, counter-clockwise
    pub fn polygon_outline(&self) -> Option<Vec<Vec3>> {
        let ShapeKind::Polygon { radius, sides } = self.kind else {
            return None;
        };
        Some(
            regular_ring(radius, sides)
                .map(|p| self.position + self.orientation.rotate(p.extend(0.0)))
                .collect(),
        )
    }

    /// Write an indented description of this shape and its children
    pub fn debug_info(&self, out: &mut impl fmt::Write, indent: usize) -> fmt::Result {
        let pad = " ".repeat(indent);
        writeln!(out, "{}Kind: {}", pad, self.kind)?;
        writeln!(out, "{}Position: {}", pad, self.position)?;
        if !self.orientation.is_identity() {
            writeln!(out, "{}Orientation: {}", pad, self.orientation.as_vec4())?;
        }
        if !self.children.is_empty() {
            writeln!(out, "{}Children:", pad)?;
            for child in &self.children {
                child.debug_info(out, indent + 1)?;
            }
        }
        Ok(())
    }

    /// Swept region of a fast circular shape over the last displacement
    ///
    /// When a circle of radius `r` moves by `travel` and `|travel|` exceeds
    /// `r`, the circle may have skipped over something thin between samples.
    /// The returned rectangle covers the band it traversed: it trails the
    /// current center by `travel`, is `|travel|` long along the direction of
    /// motion and `2r` wide. Slow or non-circular shapes have no swept region.
    pub fn collision_space(&self, travel: Vec3) -> Option<Shape> {
        let radius = self.radius()?;
        let planar = travel.xy();
        let length_squared = planar.length_squared();

        if length_squared <= radius * radius {
            return None;
        }

        let direction = planar.normalized();
        let side = direction.perp();
        let start = self.position - planar.extend(0.0);
        let top_left = start + (side * radius).extend(0.0);
        let angle = direction.y().atan2(direction.x());

        Some(
            Shape::rectangle(top_left, length_squared.sqrt(), 2.0 * radius)
                .with_orientation(Orientation::from_angle_z(angle)),
        )
    }
}

/// Points of a regular polygon of `sides` vertices around the origin
pub(crate) fn regular_ring(radius: f64, sides: u32) -> impl Iterator<Item = Vec2> {
    let step = std::f64::consts::TAU / sides.max(3) as f64;
    (0..sides.max(3)).map(move |i| {
        let angle = i as f64 * step;
        Vec2::new(angle.cos(), angle.sin()) * radius
    })
}
