//! Alphabetically ordered set of discovered clues.
//!
//! A plain binary search tree of owned nodes. Insertion consumes the tree
//! and hands it back, so callers always rebind:
//!
//! ```
//! use detective_core::clues::ClueStore;
//!
//! let mut store = ClueStore::new();
//! store = store.insert("Carta rasgada encontrada".to_string());
//! store = store.insert("Carta rasgada encontrada".to_string());
//! assert_eq!(store.len(), 1);
//! ```

use std::cmp::Ordering;
use tracing::debug;

/// Owned link to a subtree.
pub type ClueTree = Option<Box<ClueNode>>;

/// A single stored clue.
#[derive(Debug)]
pub struct ClueNode {
    pub text: String,
    lesser: ClueTree,
    greater: ClueTree,
}

impl ClueNode {
    fn leaf(text: String) -> Box<Self> {
        Box::new(Self {
            text,
            lesser: None,
            greater: None,
        })
    }
}

/// Insert `text` below `root` and return the root to keep.
///
/// Equal text leaves the tree untouched.
#[must_use]
pub fn insert(mut root: ClueTree, text: String) -> ClueTree {
    let mut slot = &mut root;
    while let Some(node) = slot {
        match text.cmp(&node.text) {
            Ordering::Less => slot = &mut node.lesser,
            Ordering::Greater => slot = &mut node.greater,
            Ordering::Equal => {
                debug!(clue = %text, "duplicate clue ignored");
                return root;
            }
        }
    }
    debug!(clue = %text, "clue stored");
    *slot = Some(ClueNode::leaf(text));
    root
}

/// The set of clues collected so far.
#[derive(Debug, Default)]
pub struct ClueStore {
    root: ClueTree,
    len: usize,
}

impl ClueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a clue, ignoring exact duplicates.
    #[must_use]
    pub fn insert(mut self, text: String) -> Self {
        if !self.contains(&text) {
            self.len += 1;
        }
        self.root = insert(self.root.take(), text);
        self
    }

    /// Whether exactly `text` was already recorded.
    pub fn contains(&self, text: &str) -> bool {
        let mut cursor = self.root.as_deref();
        while let Some(node) = cursor {
            cursor = match text.cmp(node.text.as_str()) {
                Ordering::Less => node.lesser.as_deref(),
                Ordering::Greater => node.greater.as_deref(),
                Ordering::Equal => return true,
            };
        }
        false
    }

    /// Number of distinct clues.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Clues in ascending order.
    pub fn in_order(&self) -> InOrder<'_> {
        let mut walk = InOrder { stack: Vec::new() };
        walk.descend(self.root.as_deref());
        walk
    }

    pub fn visit_in_order<F>(&self, mut visit: F)
    where
        F: FnMut(&str),
    {
        for text in self.in_order() {
            visit(text);
        }
    }

    /// Height of the tree, mostly useful in tests.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(&ClueNode, usize)> =
            self.root.as_deref().map(|n| (n, 1)).into_iter().collect();
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(node.lesser.as_deref().map(|n| (n, depth + 1)));
            stack.extend(node.greater.as_deref().map(|n| (n, depth + 1)));
        }
        deepest
    }
}

impl Drop for ClueStore {
    // Post-order without recursion, so a degenerate tree cannot blow the stack.
    fn drop(&mut self) {
        let mut pending: Vec<Box<ClueNode>> = self.root.take().into_iter().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.lesser.take());
            pending.extend(node.greater.take());
        }
    }
}

/// Lazy in-order walk produced by [`ClueStore::in_order`].
pub struct InOrder<'a> {
    stack: Vec<&'a ClueNode>,
}

impl<'a> InOrder<'a> {
    fn descend(&mut self, mut cursor: Option<&'a ClueNode>) {
        while let Some(node) = cursor {
            self.stack.push(node);
            cursor = node.lesser.as_deref();
        }
    }
}

impl<'a> Iterator for InOrder<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.descend(node.greater.as_deref());
        Some(node.text.as_str())
    }
}
