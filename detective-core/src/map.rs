//! The mansion map: a fixed binary tree of rooms.
//!
//! Rooms live in an arena and refer to their children by [`LocationId`].
//! Links only point downwards. Every room is owned by at most one parent
//! slot, so the map is always a tree. Once the map is built it is only ever
//! read.

use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Handle to a room in a [`LocationGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocationId(usize);

impl LocationId {
    /// Position of the room in its graph's arena.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which child to move to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn name(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single navigation keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Go(Direction),
    Stop,
}

impl Choice {
    /// Map a keystroke to a choice: `e` left, `d` right, `s` stop.
    ///
    /// Returns `None` for anything else; the caller reports it and asks again.
    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'e' => Some(Choice::Go(Direction::Left)),
            'd' => Some(Choice::Go(Direction::Right)),
            's' => Some(Choice::Stop),
            _ => None,
        }
    }

    /// Parse the first non-blank character of a line of input.
    pub fn from_input(line: &str) -> Option<Self> {
        line.trim().chars().next().and_then(Self::from_key)
    }
}

/// Errors from building or navigating the map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("Unknown location {0}")]
    UnknownLocation(LocationId),

    #[error("No path {direction} from {from}")]
    NoSuchPath { from: String, direction: Direction },

    #[error("{child} already belongs to {owner}")]
    AlreadyAttached { child: String, owner: String },

    #[error("Linking {child} under {parent} would create a cycle")]
    WouldCycle { parent: String, child: String },
}

/// A room in the mansion.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: String,
    left: Option<LocationId>,
    right: Option<LocationId>,
}

impl Location {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            left: None,
            right: None,
        }
    }

    /// The room reached by going left, if any.
    pub fn left(&self) -> Option<LocationId> {
        self.left
    }

    /// The room reached by going right, if any.
    pub fn right(&self) -> Option<LocationId> {
        self.right
    }

    /// The child in `direction`.
    pub fn child(&self, direction: Direction) -> Option<LocationId> {
        match direction {
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Arena-backed binary tree of rooms.
#[derive(Debug, Clone, Default)]
pub struct LocationGraph {
    nodes: Vec<Location>,
}

impl LocationGraph {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a room with no children.
    pub fn create(&mut self, name: impl Into<String>) -> LocationId {
        let id = LocationId(self.nodes.len());
        let location = Location::new(name);
        debug!(%id, name = %location.name, "created location");
        self.nodes.push(location);
        id
    }

    /// Set both children of `parent`, replacing any previous links.
    ///
    /// An unknown `parent` is ignored. Children that are unknown, owned by
    /// another room, or would close a cycle are rejected and nothing changes.
    pub fn connect(
        &mut self,
        parent: LocationId,
        left: Option<LocationId>,
        right: Option<LocationId>,
    ) -> Result<(), MapError> {
        if self.get(parent).is_none() {
            return Ok(());
        }
        if let (Some(l), Some(r)) = (left, right) {
            if l == r {
                let child = self.get(l).ok_or(MapError::UnknownLocation(l))?;
                return Err(MapError::AlreadyAttached {
                    child: child.name.clone(),
                    owner: self.nodes[parent.0].name.clone(),
                });
            }
        }
        for child in [left, right].into_iter().flatten() {
            self.check_attachable(parent, child)?;
        }

        let node = &mut self.nodes[parent.0];
        node.left = left;
        node.right = right;
        debug!(parent = %node.name, ?left, ?right, "connected location");
        Ok(())
    }

    fn check_attachable(&self, parent: LocationId, child: LocationId) -> Result<(), MapError> {
        let node = self.get(child).ok_or(MapError::UnknownLocation(child))?;
        if self.reaches(child, parent) {
            return Err(MapError::WouldCycle {
                parent: self.nodes[parent.0].name.clone(),
                child: node.name.clone(),
            });
        }
        match self.owner_of(child) {
            Some(owner) if owner != parent => Err(MapError::AlreadyAttached {
                child: node.name.clone(),
                owner: self.nodes[owner.0].name.clone(),
            }),
            _ => Ok(()),
        }
    }

    /// The room whose left or right slot holds `child`.
    fn owner_of(&self, child: LocationId) -> Option<LocationId> {
        self.nodes
            .iter()
            .position(|n| n.left == Some(child) || n.right == Some(child))
            .map(LocationId)
    }

    /// Whether `target` is `from` or lies somewhere below it.
    fn reaches(&self, from: LocationId, target: LocationId) -> bool {
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            if id == target {
                return true;
            }
            let node = &self.nodes[id.0];
            stack.extend(node.left);
            stack.extend(node.right);
        }
        false
    }

    /// Follow one edge from `node`.
    pub fn traverse(&self, node: LocationId, direction: Direction) -> Result<LocationId, MapError> {
        let location = self.get(node).ok_or(MapError::UnknownLocation(node))?;
        location.child(direction).ok_or_else(|| MapError::NoSuchPath {
            from: location.name.clone(),
            direction,
        })
    }

    /// The room behind `id`, or `None` if it is not in this map.
    pub fn get(&self, id: LocationId) -> Option<&Location> {
        self.nodes.get(id.0)
    }

    pub fn name(&self, id: LocationId) -> Option<&str> {
        self.get(id).map(|l| l.name.as_str())
    }

    /// Find a room by exact name.
    pub fn find(&self, name: &str) -> Option<LocationId> {
        self.nodes
            .iter()
            .position(|l| l.name == name)
            .map(LocationId)
    }

    /// Number of rooms created, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Rooms in preorder with their depth below `root`.
    pub fn walk_preorder(&self, root: LocationId) -> Preorder<'_> {
        let stack = if self.get(root).is_some() {
            vec![(root, 0)]
        } else {
            Vec::new()
        };
        Preorder { graph: self, stack }
    }

    pub fn visit_preorder<F>(&self, root: LocationId, mut visit: F)
    where
        F: FnMut(usize, &Location),
    {
        for (depth, location) in self.walk_preorder(root) {
            visit(depth, location);
        }
    }
}

/// Lazy preorder walk produced by [`LocationGraph::walk_preorder`].
pub struct Preorder<'a> {
    graph: &'a LocationGraph,
    stack: Vec<(LocationId, usize)>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = (usize, &'a Location);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, depth) = self.stack.pop()?;
        let location = &self.graph.nodes[id.0];
        // right first so left is visited first
        if let Some(right) = location.right {
            self.stack.push((right, depth + 1));
        }
        if let Some(left) = location.left {
            self.stack.push((left, depth + 1));
        }
        Some((depth, location))
    }
}
