//! Drawing interface
//!
//! Shapes draw themselves into a [`Canvas`], an immediate-mode sink with a
//! transform stack. The engine only needs the abstract interface; a
//! [`RecordingCanvas`] is provided that flattens everything into world-space
//! vertex batches, ready to hand to any graphics backend.

use crate::shapes::{regular_ring, Shape, ShapeKind};
use bytemuck::{Pod, Zeroable};
use lumen_math::{Orientation, Vec3};
use serde::{Deserialize, Serialize};

/// Rings and segments used to tessellate a sphere
pub const SPHERE_DETAIL: u32 = 16;

/// How a batch of vertices is assembled
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// Independent line segments, two vertices each
    Lines,
    /// Closed outline through every vertex
    LineLoop,
    /// Triangles sharing the first vertex
    TriangleFan,
    /// Triangles from every consecutive vertex triple
    TriangleStrip,
}

/// A vertex as handed to the canvas
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position (x, y, z)
    pub position: [f32; 3],
    /// Surface normal for lighting
    pub normal: [f32; 3],
    /// RGBA color
    pub color: [f32; 4],
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, color: [f32; 4]) -> Self {
        Self {
            position: position.to_f32(),
            normal: normal.to_f32(),
            color,
        }
    }

    fn position_f64(&self) -> Vec3 {
        let [x, y, z] = self.position;
        Vec3::new(x as f64, y as f64, z as f64)
    }

    fn normal_f64(&self) -> Vec3 {
        let [x, y, z] = self.normal;
        Vec3::new(x as f64, y as f64, z as f64)
    }
}

/// Visual properties of a drawn object
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    /// Base color as RGBA (each component 0.0-1.0)
    pub base_color: [f32; 4],
}

impl Default for Appearance {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Appearance {
    pub const WHITE: Self = Self { base_color: [1.0, 1.0, 1.0, 1.0] };
    pub const BLACK: Self = Self { base_color: [0.0, 0.0, 0.0, 1.0] };
    pub const RED: Self = Self { base_color: [1.0, 0.0, 0.0, 1.0] };
    pub const GREEN: Self = Self { base_color: [0.0, 1.0, 0.0, 1.0] };
    pub const BLUE: Self = Self { base_color: [0.0, 0.0, 1.0, 1.0] };
    pub const GRAY: Self = Self { base_color: [0.5, 0.5, 0.5, 1.0] };

    /// Create an appearance with the given RGBA color
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { base_color: [r, g, b, a] }
    }

    /// Create an opaque appearance with the given RGB color
    pub fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Create an opaque appearance from 8-bit channels
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }
}

/// Immediate-mode drawing sink with a transform stack
///
/// `translate` and `rotate` apply to the current frame; `push` saves it and
/// `pop` restores the last saved one. Vertices passed to `emit` are in the
/// current frame.
pub trait Canvas {
    fn push(&mut self);
    fn pop(&mut self);
    fn translate(&mut self, offset: Vec3);
    fn rotate(&mut self, orientation: &Orientation);
    fn emit(&mut self, primitive: Primitive, vertices: &[Vertex]);
}

/// One recorded `emit` call, in world space
#[derive(Clone, Debug, PartialEq)]
pub struct DrawBatch {
    pub primitive: Primitive,
    pub vertices: Vec<Vertex>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Frame {
    origin: Vec3,
    orientation: Orientation,
}

/// Canvas that records world-space batches
#[derive(Clone, Debug, Default)]
pub struct RecordingCanvas {
    current: Frame,
    stack: Vec<Frame>,
    batches: Vec<DrawBatch>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded batches in emission order
    pub fn batches(&self) -> &[DrawBatch] {
        &self.batches
    }

    /// Total number of recorded vertices
    pub fn vertex_count(&self) -> usize {
        self.batches.iter().map(|b| b.vertices.len()).sum()
    }

    /// Number of saved frames not yet popped
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// All recorded vertices as raw bytes, batch after batch
    pub fn vertex_bytes(&self) -> Vec<u8> {
        self.batches
            .iter()
            .flat_map(|b| bytemuck::cast_slice::<Vertex, u8>(&b.vertices).iter().copied())
            .collect()
    }

    /// Drop all batches and reset the transform
    pub fn clear(&mut self) {
        self.batches.clear();
        self.stack.clear();
        self.current = Frame::default();
    }
}

impl Canvas for RecordingCanvas {
    fn push(&mut self) {
        self.stack.push(self.current);
    }

    fn pop(&mut self) {
        match self.stack.pop() {
            Some(frame) => self.current = frame,
            None => log::warn!("canvas pop without matching push"),
        }
    }

    fn translate(&mut self, offset: Vec3) {
        self.current.origin += self.current.orientation.rotate(offset);
    }

    fn rotate(&mut self, orientation: &Orientation) {
        self.current.orientation = self.current.orientation.compose(orientation);
    }

    fn emit(&mut self, primitive: Primitive, vertices: &[Vertex]) {
        let Frame { origin, orientation } = self.current;
        let vertices = vertices
            .iter()
            .map(|v| {
                Vertex::new(
                    origin + orientation.rotate(v.position_f64()),
                    orientation.rotate(v.normal_f64()),
                    v.color,
                )
            })
            .collect();
        self.batches.push(DrawBatch { primitive, vertices });
    }
}

impl Shape {
    /// Draw this shape and its children
    ///
    /// The shape's own offset is applied inside a pushed frame, so the canvas
    /// transform is unchanged afterwards. With `only_border` set, outlines are
    /// emitted instead of filled surfaces.
    pub fn draw(&self, canvas: &mut dyn Canvas, appearance: &Appearance, only_border: bool) {
        canvas.push();
        if !self.position().is_zero() {
            canvas.translate(self.position());
        }
        if !self.orientation().is_identity() {
            canvas.rotate(&self.orientation());
        }

        let color = appearance.base_color;
        match self.kind() {
            ShapeKind::Mesh { points } => draw_mesh(canvas, points, color, only_border),
            ShapeKind::Rectangle { width, height } => draw_rectangle(canvas, *width, *height, color, only_border),
            ShapeKind::Polygon { radius, sides } => draw_polygon(canvas, *radius, *sides, color, only_border),
            ShapeKind::Cylinder {
                base_radius,
                top_radius,
                height,
                sides,
            } => draw_cylinder(canvas, *base_radius, *top_radius, *height, *sides, color, only_border),
            ShapeKind::Sphere { radius } => draw_sphere(canvas, *radius, color, only_border),
        }

        for child in self.children() {
            child.draw(canvas, appearance, only_border);
        }
        canvas.pop();
    }
}

fn flat(points: impl IntoIterator<Item = Vec3>, color: [f32; 4]) -> Vec<Vertex> {
    points.into_iter().map(|p| Vertex::new(p, Vec3::Z, color)).collect()
}

fn outline_or_fill(only_border: bool) -> Primitive {
    if only_border {
        Primitive::LineLoop
    } else {
        Primitive::TriangleFan
    }
}

fn draw_mesh(canvas: &mut dyn Canvas, points: &[Vec3], color: [f32; 4], only_border: bool) {
    if points.is_empty() {
        return;
    }
    canvas.emit(outline_or_fill(only_border), &flat(points.iter().copied(), color));
}

fn draw_rectangle(canvas: &mut dyn Canvas, width: f64, height: f64, color: [f32; 4], only_border: bool) {
    let corners = [
        Vec3::ZERO,
        Vec3::new(0.0, -height, 0.0),
        Vec3::new(width, -height, 0.0),
        Vec3::new(width, 0.0, 0.0),
    ];
    canvas.emit(outline_or_fill(only_border), &flat(corners, color));
}

fn draw_polygon(canvas: &mut dyn Canvas, radius: f64, sides: u32, color: [f32; 4], only_border: bool) {
    let ring = regular_ring(radius, sides).map(|p| p.extend(0.0));
    canvas.emit(outline_or_fill(only_border), &flat(ring, color));
}

fn draw_cylinder(
    canvas: &mut dyn Canvas,
    base_radius: f64,
    top_radius: f64,
    height: f64,
    sides: u32,
    color: [f32; 4],
    only_border: bool,
) {
    // Rings lie in the XZ plane, so the 2D ring's y becomes z
    let base: Vec<Vec3> = regular_ring(base_radius, sides)
        .map(|p| Vec3::new(p.x(), 0.0, p.y()))
        .collect();
    let top: Vec<Vec3> = regular_ring(top_radius, sides)
        .map(|p| Vec3::new(p.x(), height, p.y()))
        .collect();

    if only_border {
        canvas.emit(Primitive::LineLoop, &flat(base.iter().copied(), color));
        if top_radius > 0.0 {
            canvas.emit(Primitive::LineLoop, &flat(top.iter().copied(), color));
        }
        let uprights: Vec<Vec3> = base.iter().zip(&top).flat_map(|(b, t)| [*b, *t]).collect();
        canvas.emit(Primitive::Lines, &flat(uprights, color));
        return;
    }

    let slope = base_radius - top_radius;
    let mut side = Vec::with_capacity(2 * (base.len() + 1));
    for i in 0..=base.len() {
        let (b, t) = (base[i % base.len()], top[i % top.len()]);
        let radial = Vec3::new(b.x(), 0.0, b.z()).normalized();
        let normal = (radial * height + Vec3::Y * slope).normalized();
        side.push(Vertex::new(b, normal, color));
        side.push(Vertex::new(t, normal, color));
    }
    canvas.emit(Primitive::TriangleStrip, &side);

    if base_radius > 0.0 {
        let cap: Vec<Vertex> = base.iter().map(|p| Vertex::new(*p, -Vec3::Y, color)).collect();
        canvas.emit(Primitive::TriangleFan, &cap);
    }
    if top_radius > 0.0 {
        let cap: Vec<Vertex> = top.iter().map(|p| Vertex::new(*p, Vec3::Y, color)).collect();
        canvas.emit(Primitive::TriangleFan, &cap);
    }
}

fn draw_sphere(canvas: &mut dyn Canvas, radius: f64, color: [f32; 4], only_border: bool) {
    let point = |ring: u32, segment: u32| {
        let polar = std::f64::consts::PI * ring as f64 / SPHERE_DETAIL as f64;
        let azimuth = std::f64::consts::TAU * segment as f64 / SPHERE_DETAIL as f64;
        Vec3::new(polar.sin() * azimuth.cos(), polar.cos(), polar.sin() * azimuth.sin())
    };

    if only_border {
        for ring in 1..SPHERE_DETAIL {
            let loop_points: Vec<Vertex> = (0..SPHERE_DETAIL)
                .map(|s| point(ring, s))
                .map(|n| Vertex::new(n * radius, n, color))
                .collect();
            canvas.emit(Primitive::LineLoop, &loop_points);
        }
        return;
    }

    for ring in 0..SPHERE_DETAIL {
        let strip: Vec<Vertex> = (0..=SPHERE_DETAIL)
            .flat_map(|s| [point(ring, s), point(ring + 1, s)])
            .map(|n| Vertex::new(n * radius, n, color))
            .collect();
        canvas.emit(Primitive::TriangleStrip, &strip);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn approx(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn test_rectangle_world_positions() {
        let mut canvas = RecordingCanvas::new();
        Shape::rectangle(Vec3::new(1.0, 2.0, 0.0), 3.0, 1.0).draw(&mut canvas, &Appearance::RED, false);

        let batches = canvas.batches();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].primitive, Primitive::TriangleFan);
        let positions: Vec<[f32; 3]> = batches[0].vertices.iter().map(|v| v.position).collect();
        assert_eq!(positions, vec![[1.0, 2.0, 0.0], [1.0, 1.0, 0.0], [4.0, 1.0, 0.0], [4.0, 2.0, 0.0]]);
        assert_eq!(batches[0].vertices[0].color, Appearance::RED.base_color);
    }

    #[test]
    fn test_border_uses_outline() {
        let mut canvas = RecordingCanvas::new();
        Shape::polygon(Vec3::ZERO, 1.0, 6).draw(&mut canvas, &Appearance::default(), true);
        assert_eq!(canvas.batches()[0].primitive, Primitive::LineLoop);
        assert_eq!(canvas.vertex_count(), 6);
    }

    #[test]
    fn test_transform_stack_balanced() {
        let mut canvas = RecordingCanvas::new();
        let shape = Shape::circle(Vec3::new(3.0, 0.0, 0.0), 1.0)
            .with_orientation(Orientation::from_angle_z(0.3))
            .with_child(Shape::rectangle(Vec3::X, 1.0, 1.0));
        shape.draw(&mut canvas, &Appearance::default(), false);
        assert_eq!(canvas.depth(), 0);
        assert_eq!(canvas.batches().len(), 2);
    }

    #[test]
    fn test_child_inherits_parent_transform() {
        let mut canvas = RecordingCanvas::new();
        let shape = Shape::mesh(vec![Vec3::ZERO])
            .with_orientation(Orientation::from_angle_z(FRAC_PI_2))
            .with_child(Shape::mesh(vec![Vec3::X]));
        let mut parent = shape.clone();
        parent.set_position(Vec3::new(5.0, 0.0, 0.0));
        parent.draw(&mut canvas, &Appearance::default(), false);

        // Child point (1, 0) is rotated a quarter turn and offset by the parent
        let child = &canvas.batches()[1];
        assert!(approx(child.vertices[0].position, [5.0, 1.0, 0.0]));
    }

    #[test]
    fn test_unbalanced_pop_is_ignored() {
        let mut canvas = RecordingCanvas::new();
        canvas.translate(Vec3::X);
        canvas.pop();
        canvas.emit(Primitive::Lines, &[Vertex::new(Vec3::ZERO, Vec3::Z, [1.0; 4])]);
        assert_eq!(canvas.batches()[0].vertices[0].position, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_cylinder_fill_and_border() {
        let cone = Shape::cone(Vec3::ZERO, 1.0, 2.0, 8);

        let mut filled = RecordingCanvas::new();
        cone.draw(&mut filled, &Appearance::default(), false);
        // Side strip and base cap, no top cap on a cone
        assert_eq!(filled.batches().len(), 2);
        assert_eq!(filled.batches()[0].vertices.len(), 18);

        let mut outlined = RecordingCanvas::new();
        Shape::cylinder(Vec3::ZERO, 1.0, 1.0, 2.0, 8).draw(&mut outlined, &Appearance::default(), true);
        assert_eq!(outlined.batches().len(), 3);
        assert_eq!(outlined.batches()[2].primitive, Primitive::Lines);
    }

    #[test]
    fn test_sphere_tessellation() {
        let mut canvas = RecordingCanvas::new();
        Shape::sphere(Vec3::ZERO, 2.0).draw(&mut canvas, &Appearance::default(), false);
        assert_eq!(canvas.batches().len(), SPHERE_DETAIL as usize);
        for v in &canvas.batches()[0].vertices {
            let [x, y, z] = v.position;
            assert!(((x * x + y * y + z * z).sqrt() - 2.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_vertex_bytes() {
        let mut canvas = RecordingCanvas::new();
        Shape::rectangle(Vec3::ZERO, 1.0, 1.0).draw(&mut canvas, &Appearance::default(), true);
        assert_eq!(canvas.vertex_bytes().len(), 4 * std::mem::size_of::<Vertex>());
        assert_eq!(std::mem::size_of::<Vertex>(), 40);
    }

    #[test]
    fn test_appearance_from_rgb8() {
        let a = Appearance::from_rgb8(255, 0, 51);
        assert_eq!(a.base_color[0], 1.0);
        assert_eq!(a.base_color[1], 0.0);
        assert!((a.base_color[2] - 0.2).abs() < 1e-6);
        assert_eq!(a.base_color[3], 1.0);
    }
}
