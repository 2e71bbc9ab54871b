//! World container for scene objects
//!
//! The World owns every object in an arena keyed by generational
//! [`ObjectKey`]s. Parent and child links are keys, so a link can never
//! dangle: a key whose object was torn down simply stops resolving.
//!
//! Objects go through two phases before they disappear. [`World::destroy`]
//! marks an object (it stops drawing and colliding at once) and queues its
//! teardown; [`World::flush`] performs queued work, which the scheduler does
//! once at the end of every outermost update. Attach and detach requests made
//! while an update is running are queued the same way, so callbacks can
//! rearrange the tree without disturbing the traversal in progress.

use crate::behavior::Behavior;
use crate::error::SceneError;
use crate::object::{Object, ObjectState};
use crate::scheduler::SchedulerConfig;
use lumen_geom::Canvas;
use slotmap::{new_key_type, SlotMap};
use std::collections::VecDeque;
use std::fmt;

new_key_type! {
    /// Key to an object in the world
    ///
    /// Uses generational indexing: once an object is torn down its key never
    /// resolves again, even after the slot is reused by a new object.
    pub struct ObjectKey;
}

/// Structural change waiting for the next flush
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Destroy(ObjectKey),
    Attach { parent: ObjectKey, child: ObjectKey },
    Detach { parent: ObjectKey, child: ObjectKey },
}

pub(crate) struct Node {
    pub(crate) object: Object,
    pub(crate) behavior: Option<Box<dyn Behavior>>,
    pub(crate) state: ObjectState,
    pub(crate) parent: Option<ObjectKey>,
    pub(crate) children: Vec<ObjectKey>,
}

/// The scene: every object, their tree links and pending structural changes
pub struct World {
    nodes: SlotMap<ObjectKey, Node>,
    commands: VecDeque<Command>,
    /// Nesting depth of running update passes
    pub(crate) update_depth: usize,
    pub(crate) config: SchedulerConfig,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    /// Create an empty world with the given scheduler configuration
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            commands: VecDeque::new(),
            update_depth: 0,
            config,
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SchedulerConfig) {
        self.config = config;
    }

    // ===== Spawning =====

    /// Add a parentless object without callbacks
    pub fn spawn(&mut self, object: Object) -> ObjectKey {
        self.insert(object, None)
    }

    /// Add a parentless object with callbacks
    pub fn spawn_with_behavior(&mut self, object: Object, behavior: impl Behavior + 'static) -> ObjectKey {
        self.insert(object, Some(Box::new(behavior)))
    }

    /// Add an object and attach it under `parent`
    ///
    /// During an update the attachment is queued like any other.
    pub fn spawn_child(&mut self, parent: ObjectKey, object: Object) -> Result<ObjectKey, SceneError> {
        self.spawn_child_inner(parent, object, None)
    }

    /// Add an object with callbacks and attach it under `parent`
    pub fn spawn_child_with_behavior(
        &mut self,
        parent: ObjectKey,
        object: Object,
        behavior: impl Behavior + 'static,
    ) -> Result<ObjectKey, SceneError> {
        self.spawn_child_inner(parent, object, Some(Box::new(behavior)))
    }

    fn spawn_child_inner(
        &mut self,
        parent: ObjectKey,
        object: Object,
        behavior: Option<Box<dyn Behavior>>,
    ) -> Result<ObjectKey, SceneError> {
        if !self.is_live(parent) {
            return Err(SceneError::Destroyed(parent));
        }
        let child = self.insert(object, behavior);
        self.attach_child(parent, child)?;
        Ok(child)
    }

    fn insert(&mut self, object: Object, behavior: Option<Box<dyn Behavior>>) -> ObjectKey {
        self.nodes.insert(Node {
            object,
            behavior,
            state: ObjectState::Live,
            parent: None,
            children: Vec::new(),
        })
    }

    // ===== Lookup =====

    /// The object behind `key`, if it has not been torn down
    pub fn get(&self, key: ObjectKey) -> Option<&Object> {
        self.nodes.get(key).map(|n| &n.object)
    }

    /// Mutable access to the object behind `key`, if it has not been torn down
    pub fn get_mut(&mut self, key: ObjectKey) -> Option<&mut Object> {
        self.nodes.get_mut(key).map(|n| &mut n.object)
    }

    /// Lifecycle phase, `None` once torn down
    pub fn state(&self, key: ObjectKey) -> Option<ObjectState> {
        self.nodes.get(key).map(|n| n.state)
    }

    /// Whether `key` may still be dereferenced (live or marked)
    ///
    /// Marked objects stay readable until the next flush, which lets a
    /// callback look at an object it has just destroyed.
    #[inline]
    pub fn is_valid(&self, key: ObjectKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Whether `key` refers to an object that has not been destroyed
    #[inline]
    pub fn is_live(&self, key: ObjectKey) -> bool {
        self.state(key) == Some(ObjectState::Live)
    }

    /// Whether the object takes part in collision testing
    pub fn is_collidable(&self, key: ObjectKey) -> bool {
        self.nodes
            .get(key)
            .is_some_and(|n| n.state == ObjectState::Live && n.object.collider().is_some())
    }

    pub fn parent(&self, key: ObjectKey) -> Option<ObjectKey> {
        self.nodes.get(key).and_then(|n| n.parent)
    }

    /// Children in insertion order; empty for unknown keys
    pub fn children(&self, key: ObjectKey) -> &[ObjectKey] {
        self.nodes.get(key).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Name reported by the object's behavior
    pub fn kind(&self, key: ObjectKey) -> &str {
        self.nodes
            .get(key)
            .and_then(|n| n.behavior.as_deref())
            .map(|b| b.kind())
            .unwrap_or("object")
    }

    /// Live objects without a parent
    pub fn roots(&self) -> impl Iterator<Item = ObjectKey> + '_ {
        self.nodes
            .iter()
            .filter(|(_, n)| n.state == ObjectState::Live && n.parent.is_none())
            .map(|(key, _)| key)
    }

    /// Number of objects not yet torn down
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of queued structural changes
    #[inline]
    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }

    /// Whether an update pass is running
    #[inline]
    pub fn is_updating(&self) -> bool {
        self.update_depth > 0
    }

    // ===== Tree structure =====

    /// Make `child` the last child of `parent`
    ///
    /// A child that already has another parent is moved. Fails if either
    /// object is destroyed or if the link would create a cycle.
    pub fn attach_child(&mut self, parent: ObjectKey, child: ObjectKey) -> Result<(), SceneError> {
        self.check_attach(parent, child)?;
        if self.is_updating() {
            log::debug!("deferring attach of {:?} under {:?}", child, parent);
            self.commands.push_back(Command::Attach { parent, child });
        } else {
            self.link(parent, child);
        }
        Ok(())
    }

    /// Remove `child` from `parent`'s children
    pub fn detach_child(&mut self, parent: ObjectKey, child: ObjectKey) -> Result<(), SceneError> {
        if !self.is_valid(parent) {
            return Err(SceneError::Destroyed(parent));
        }
        if self.parent(child) != Some(parent) {
            return Err(SceneError::NotAChild { parent, child });
        }
        if self.is_updating() {
            log::debug!("deferring detach of {:?} from {:?}", child, parent);
            self.commands.push_back(Command::Detach { parent, child });
        } else {
            self.unlink(parent, child);
        }
        Ok(())
    }

    /// Detach `child` from whatever parent it has
    ///
    /// If the parent is already gone only the back-reference is cleared.
    pub fn detach_from_parent(&mut self, child: ObjectKey) {
        let Some(parent) = self.parent(child) else {
            return;
        };

        if self.is_valid(parent) {
            if let Err(err) = self.detach_child(parent, child) {
                log::warn!("{}", err);
            }
        } else if let Some(node) = self.nodes.get_mut(child) {
            node.parent = None;
        }
    }

    fn check_attach(&self, parent: ObjectKey, child: ObjectKey) -> Result<(), SceneError> {
        if parent == child {
            return Err(SceneError::SelfAttach(child));
        }
        if !self.is_live(parent) {
            return Err(SceneError::Destroyed(parent));
        }
        if !self.is_live(child) {
            return Err(SceneError::Destroyed(child));
        }

        let mut cursor = Some(parent);
        while let Some(ancestor) = cursor {
            if ancestor == child {
                return Err(SceneError::Cycle { parent, child });
            }
            cursor = self.parent(ancestor);
        }
        Ok(())
    }

    fn link(&mut self, parent: ObjectKey, child: ObjectKey) {
        match self.parent(child) {
            Some(old) if old == parent => return,
            Some(old) => self.unlink(old, child),
            None => {}
        }

        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
        }
    }

    fn unlink(&mut self, parent: ObjectKey, child: ObjectKey) {
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.retain(|&c| c != child);
        }
        if let Some(node) = self.nodes.get_mut(child) {
            if node.parent == Some(parent) {
                node.parent = None;
            }
        }
    }

    // ===== Destruction =====

    /// Mark an object for destruction
    ///
    /// The object stops drawing and colliding immediately; teardown (hooks,
    /// detaching, destroying the children) happens at the next flush.
    /// Returns `false` if the object was already destroyed or marked.
    pub fn destroy(&mut self, key: ObjectKey) -> bool {
        match self.nodes.get_mut(key) {
            Some(node) if node.state == ObjectState::Live => {
                node.state = ObjectState::Marked;
                node.object.set_display(false);
                self.commands.push_back(Command::Destroy(key));
                log::debug!("marked {:?} for destruction", key);
                true
            }
            _ => false,
        }
    }

    /// Apply every queued command in request order
    ///
    /// Runs automatically at the end of the outermost update. Calling it
    /// while an update is running does nothing.
    pub fn flush(&mut self) {
        if self.is_updating() {
            log::warn!("flush requested during an update; commands stay queued");
            return;
        }

        while let Some(command) = self.commands.pop_front() {
            log::trace!("applying {:?}", command);
            match command {
                Command::Destroy(key) => self.teardown(key),
                Command::Attach { parent, child } => match self.check_attach(parent, child) {
                    Ok(()) => self.link(parent, child),
                    Err(err) => log::warn!("dropping deferred attach: {}", err),
                },
                Command::Detach { parent, child } => self.unlink(parent, child),
            }
        }
    }

    fn teardown(&mut self, key: ObjectKey) {
        let Some(node) = self.nodes.get_mut(key) else {
            return;
        };
        node.state = ObjectState::Marked;
        node.object.set_display(false);
        log::debug!("tearing down {:?}", key);

        self.with_behavior(key, |behavior, world| behavior.before_destroy(world, key));

        if let Some(parent) = self.parent(key) {
            self.unlink(parent, key);
        }

        for child in self.children(key).to_vec() {
            self.teardown(child);
        }

        // Children attached by the hooks above lose their parent
        let leftover = self
            .nodes
            .get_mut(key)
            .map(|n| std::mem::take(&mut n.children))
            .unwrap_or_default();
        for child in leftover {
            if let Some(node) = self.nodes.get_mut(child) {
                node.parent = None;
            }
        }

        self.with_behavior(key, |behavior, world| behavior.after_destroy(world, key));
        self.nodes.remove(key);
    }

    /// Run `f` on the object's behavior with full access to the world
    ///
    /// The behavior is taken out of its node for the duration of the call and
    /// put back afterwards if the node still exists.
    pub(crate) fn with_behavior<R>(
        &mut self,
        key: ObjectKey,
        f: impl FnOnce(&mut dyn Behavior, &mut World) -> R,
    ) -> Option<R> {
        let mut behavior = self.nodes.get_mut(key)?.behavior.take()?;
        let result = f(behavior.as_mut(), self);
        if let Some(node) = self.nodes.get_mut(key) {
            node.behavior = Some(behavior);
        }
        Some(result)
    }

    // ===== Drawing =====

    /// Draw an object and its descendants
    ///
    /// Hidden and destroyed objects are skipped together with their subtree.
    pub fn draw(&self, key: ObjectKey, canvas: &mut dyn Canvas, only_border: bool) {
        let Some(node) = self.nodes.get(key) else {
            return;
        };
        if node.state != ObjectState::Live || !node.object.display() {
            return;
        }

        let object = &node.object;
        canvas.push();
        if !object.position().is_zero() {
            canvas.translate(object.position());
        }
        if !object.orientation().is_identity() {
            canvas.rotate(&object.orientation());
        }

        if let Some(behavior) = &node.behavior {
            behavior.before_draw(self, key, canvas, only_border);
        }
        if let Some(shape) = object.shape() {
            shape.draw(canvas, object.appearance(), only_border);
        }
        for &child in &node.children {
            self.draw(child, canvas, only_border);
        }
        if let Some(behavior) = &node.behavior {
            behavior.after_draw(self, key, canvas, only_border);
        }
        canvas.pop();
    }

    /// Draw every root
    pub fn draw_roots(&self, canvas: &mut dyn Canvas, only_border: bool) {
        for root in self.roots() {
            self.draw(root, canvas, only_border);
        }
    }

    // ===== Debugging =====

    /// Write an indented dump of an object and its subtree
    pub fn debug_info(&self, key: ObjectKey, out: &mut impl fmt::Write) -> fmt::Result {
        self.debug_info_at(key, out, 0)
    }

    fn debug_info_at(&self, key: ObjectKey, out: &mut impl fmt::Write, indent: usize) -> fmt::Result {
        let Some(node) = self.nodes.get(key) else {
            return Ok(());
        };
        let pad = " ".repeat(indent);

        writeln!(out, "{}Type: {}", pad, self.kind(key))?;
        writeln!(out, "{}Position: {}", pad, node.object.position())?;
        if let Some(shape) = node.object.shape() {
            writeln!(out, "{}Shape:", pad)?;
            shape.debug_info(out, indent + 1)?;
        }
        writeln!(out, "{}Speed: {}", pad, node.object.speed())?;
        if !node.children.is_empty() {
            writeln!(out, "{}Children:", pad)?;
            for &child in &node.children {
                self.debug_info_at(child, out, indent + 1)?;
            }
        }
        writeln!(out)
    }
}
