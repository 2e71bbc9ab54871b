//! Lumen - headless frame driver
//!
//! Builds a small demo scene and runs it for the configured number of
//! frames, drawing every frame into a recording canvas.

use std::cell::Cell;
use std::rc::Rc;

use lumen::config::AppConfig;
use lumen_core::{
    Appearance, Behavior, Bounds, CollisionFilter, FrameTime, Object, ObjectKey, RecordingCanvas, SceneError,
    Shape, Vec3, World,
};

/// Counters shared between the demo behaviors and the driver
#[derive(Default)]
struct Stats {
    collisions: Cell<u32>,
    bounces: Cell<u32>,
    targets_down: Cell<u32>,
}

/// Fast mover that disappears on its first hit
struct Projectile {
    stats: Rc<Stats>,
}

impl Behavior for Projectile {
    fn kind(&self) -> &str {
        "projectile"
    }

    fn on_collision(&mut self, world: &mut World, me: ObjectKey, other: ObjectKey, point: Vec3) {
        self.stats.collisions.set(self.stats.collisions.get() + 1);
        log::debug!("projectile hit {} at {}", world.kind(other), point);
        world.destroy(me);
    }
}

/// Bounces back along its path on every hit
struct Puck {
    stats: Rc<Stats>,
}

impl Behavior for Puck {
    fn kind(&self) -> &str {
        "puck"
    }

    fn on_collision(&mut self, world: &mut World, me: ObjectKey, _other: ObjectKey, _point: Vec3) {
        self.stats.bounces.set(self.stats.bounces.get() + 1);
        if let Some(object) = world.get_mut(me) {
            let speed = object.speed();
            object.set_speed(-speed);
        }
    }
}

/// Goes down when anything touches it
struct Target {
    stats: Rc<Stats>,
}

impl Behavior for Target {
    fn kind(&self) -> &str {
        "target"
    }

    fn on_collision(&mut self, world: &mut World, me: ObjectKey, _other: ObjectKey, _point: Vec3) {
        world.destroy(me);
    }

    fn after_destroy(&mut self, _world: &mut World, me: ObjectKey) {
        self.stats.targets_down.set(self.stats.targets_down.get() + 1);
        log::info!("target {:?} destroyed", me);
    }
}

struct Wall;

impl Behavior for Wall {
    fn kind(&self) -> &str {
        "wall"
    }
}

/// Build the demo scene under a fresh root
fn build_scene(world: &mut World, stats: &Rc<Stats>) -> Result<ObjectKey, SceneError> {
    let arena = world.spawn(Object::new());

    world.spawn_child_with_behavior(
        arena,
        Object::new()
            .with_solid_shape(Shape::rectangle(Vec3::new(30.0, 5.0, 0.0), 1.0, 10.0))
            .with_appearance(Appearance::GRAY)
            .with_filter(CollisionFilter::scenery()),
        Wall,
    )?;

    // Covers several units per frame, more than its own radius
    world.spawn_child_with_behavior(
        arena,
        Object::new()
            .with_speed(Vec3::new(600.0, 0.0, 0.0))
            .with_solid_shape(Shape::circle(Vec3::ZERO, 0.25))
            .with_appearance(Appearance::RED)
            .with_filter(CollisionFilter::projectile()),
        Projectile { stats: Rc::clone(stats) },
    )?;

    world.spawn_child_with_behavior(
        arena,
        Object::new()
            .at(Vec3::new(0.0, -6.0, 0.0))
            .with_speed(Vec3::new(300.0, 0.0, 0.0))
            .with_solid_shape(Shape::circle(Vec3::ZERO, 0.25))
            .with_appearance(Appearance::RED)
            .with_filter(CollisionFilter::projectile()),
        Projectile { stats: Rc::clone(stats) },
    )?;

    world.spawn_child_with_behavior(
        arena,
        Object::new()
            .with_solid_shape(Shape::rectangle(Vec3::new(20.0, -5.0, 0.0), 2.0, 2.0))
            .with_appearance(Appearance::GREEN),
        Target { stats: Rc::clone(stats) },
    )?;

    for (x, dir) in [(-10.0, 1.0), (10.0, -1.0)] {
        world.spawn_child_with_behavior(
            arena,
            Object::new()
                .at(Vec3::new(x, 8.0, 0.0))
                .with_speed(Vec3::new(5.0 * dir, 0.0, 0.0))
                .with_solid_shape(Shape::circle(Vec3::ZERO, 1.0))
                .with_appearance(Appearance::BLUE)
                .with_mass(2.0),
            Puck { stats: Rc::clone(stats) },
        )?;
    }

    // Falls under gravity until it reaches terminal speed
    world.spawn_child(
        arena,
        Object::new()
            .at(Vec3::new(-20.0, 20.0, 0.0))
            .with_acceleration(Vec3::new(0.0, -9.8, 0.0))
            .with_speed_bounds(Bounds::symmetric(15.0))
            .with_shape(Shape::sphere(Vec3::ZERO, 0.5)),
    )?;

    Ok(arena)
}

fn main() {
    let config = AppConfig::load();
    let log_level = config
        .as_ref()
        .map(|c| c.debug.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());

    // RUST_LOG still wins over the configured level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = config.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });
    log::info!("Starting Lumen");

    let mut world = World::with_config(config.scheduler.to_scheduler_config());
    let stats = Rc::new(Stats::default());
    let arena = build_scene(&mut world, &stats).unwrap_or_else(|e| {
        panic!("Failed to build demo scene: {}", e);
    });

    let mut canvas = RecordingCanvas::new();
    let mut vertices_drawn = 0;
    let mut time = FrameTime::new(0.0, config.simulation.delta_time, 0);

    for _ in 0..config.simulation.frames {
        world.update_roots(time, config.scheduler.collision_detect);

        canvas.clear();
        world.draw_roots(&mut canvas, config.debug.only_border);
        vertices_drawn += canvas.vertex_count();

        time = time.next(config.simulation.delta_time);
    }

    log::info!(
        "Ran {} frames ({:.2}s): {} objects left, {} projectile hits, {} puck bounces, {} targets down",
        config.simulation.frames,
        time.now,
        world.len(),
        stats.collisions.get(),
        stats.bounces.get(),
        stats.targets_down.get(),
    );
    log::info!("Drew {} vertices in total", vertices_drawn);

    if config.debug.dump_tree {
        let mut dump = String::new();
        match world.debug_info(arena, &mut dump) {
            Ok(()) => println!("{}", dump),
            Err(e) => log::error!("Failed to dump scene tree: {}", e),
        }
    }
}
