//! Flat comment records → nested comment tree.
//!
//! The store delivers comments as a flat, arrival-ordered list where each
//! record may name a parent. [`build`] turns one such snapshot into a tree
//! hanging from a synthetic `"root"` node:
//!
//! - records without a parent, with an empty parent, or whose parent is not
//!   in the snapshot attach directly under root (nothing is ever dropped)
//! - siblings keep the relative order of the input
//! - duplicate ids and parent cycles are reported as [`TreeError`]
//!
//! The tree is rebuilt from scratch for every snapshot.

use std::collections::HashMap;

use crate::model::{CommentId, CommentRecord, ROOT_ID};

/// Structural problems that prevent building a tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// Two records (or a record and the synthetic root) share an id.
    #[error("duplicate comment id: {id}")]
    DuplicateId { id: CommentId },

    /// Parent links form a loop; `ids` lists every record cut off from root.
    #[error("parent links form a cycle: {}", ids.join(", "))]
    Cycle { ids: Vec<CommentId> },
}

/// A comment plus its replies.
///
/// Clone, equality and drop walk the subtree with an explicit stack, so a
/// reply chain of any depth is safe to hold.
#[derive(Debug)]
pub struct CommentNode {
    pub id: CommentId,
    /// The comment itself; `None` only for the synthetic root.
    pub record: Option<CommentRecord>,
    /// Replies, in input order.
    pub children: Vec<CommentNode>,
}

impl CommentNode {
    fn root(children: Vec<CommentNode>) -> Self {
        Self {
            id: ROOT_ID.to_string(),
            record: None,
            children,
        }
    }

    fn leaf(record: &CommentRecord, children: Vec<CommentNode>) -> Self {
        Self {
            id: record.id.clone(),
            record: Some(record.clone()),
            children,
        }
    }

    pub fn is_root(&self) -> bool {
        self.record.is_none()
    }

    /// Number of nodes in this subtree, including this one.
    pub fn len(&self) -> usize {
        1 + self.descendants().count()
    }

    /// Always false: a node counts itself.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Ids of the direct children, in order.
    pub fn child_ids(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.id.as_str()).collect()
    }

    /// Find a node anywhere in this subtree.
    pub fn find(&self, id: &str) -> Option<&CommentNode> {
        if self.id == id {
            return Some(self);
        }
        self.descendants().find(|n| n.id == id)
    }

    /// Depth-first, pre-order iterator over every node below this one.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }
}

impl Clone for CommentNode {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            record: self.record.clone(),
            children: map_forest(
                &self.children,
                |n| n.children.as_slice(),
                |n, _, children| {
                    Some(CommentNode {
                        id: n.id.clone(),
                        record: n.record.clone(),
                        children,
                    })
                },
            ),
        }
    }
}

impl PartialEq for CommentNode {
    fn eq(&self, other: &Self) -> bool {
        let mut pairs = vec![(self, other)];
        while let Some((a, b)) = pairs.pop() {
            if a.id != b.id || a.record != b.record || a.children.len() != b.children.len() {
                return false;
            }
            pairs.extend(a.children.iter().zip(&b.children));
        }
        true
    }
}

impl Eq for CommentNode {}

impl Drop for CommentNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Map a forest bottom-up without recursion.
///
/// `map` sees each node with its depth (0 for the forest's own nodes) and
/// the already mapped children, in order. Returning `None` drops the node
/// and everything mapped below it.
pub(crate) fn map_forest<'a, T, U>(
    forest: &'a [T],
    children: impl Fn(&'a T) -> &'a [T],
    mut map: impl FnMut(&'a T, usize, Vec<U>) -> Option<U>,
) -> Vec<U> {
    let mut order: Vec<(&'a T, usize, Option<usize>)> = Vec::new();
    let mut stack: Vec<(&'a T, usize, Option<usize>)> =
        forest.iter().rev().map(|n| (n, 0, None)).collect();
    while let Some((node, depth, parent)) = stack.pop() {
        let slot = order.len();
        order.push((node, depth, parent));
        stack.extend(
            children(node)
                .iter()
                .rev()
                .map(move |c| (c, depth + 1, Some(slot))),
        );
    }

    // Reverse pre-order finishes every child before its parent; siblings
    // arrive back to front and are flipped when their parent is mapped.
    let mut finished: Vec<Vec<U>> = (0..order.len()).map(|_| Vec::new()).collect();
    let mut top = Vec::with_capacity(forest.len());
    for (slot, &(node, depth, parent)) in order.iter().enumerate().rev() {
        let mut kids = std::mem::take(&mut finished[slot]);
        kids.reverse();
        if let Some(mapped) = map(node, depth, kids) {
            match parent {
                Some(p) => finished[p].push(mapped),
                None => top.push(mapped),
            }
        }
    }
    top.reverse();
    top
}

/// Pre-order iterator returned by [`CommentNode::descendants`].
pub struct Descendants<'a> {
    stack: Vec<&'a CommentNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a CommentNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Build the comment tree for one snapshot.
///
/// Slot 0 is the synthetic root, record `i` lives in slot `i + 1`. Linking
/// is a single pass over a hash map of ids; assembly walks the slots in
/// reverse pre-order so every child is finished before its parent, without
/// recursion.
pub fn build(records: &[CommentRecord]) -> Result<CommentNode, TreeError> {
    let slots = records.len() + 1;

    let mut index: HashMap<&str, usize> = HashMap::with_capacity(slots);
    index.insert(ROOT_ID, 0);
    for (i, record) in records.iter().enumerate() {
        if index.insert(record.id.as_str(), i + 1).is_some() {
            return Err(TreeError::DuplicateId {
                id: record.id.clone(),
            });
        }
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); slots];
    for (i, record) in records.iter().enumerate() {
        let parent = record
            .parent()
            .and_then(|p| index.get(p).copied())
            .unwrap_or(0);
        children[parent].push(i + 1);
    }

    let mut order = Vec::with_capacity(slots);
    let mut stack = vec![0usize];
    while let Some(slot) = stack.pop() {
        order.push(slot);
        stack.extend(children[slot].iter().copied());
    }

    if order.len() != slots {
        let mut reached = vec![false; slots];
        for &slot in &order {
            reached[slot] = true;
        }
        let ids = records
            .iter()
            .enumerate()
            .filter(|(i, _)| !reached[i + 1])
            .map(|(_, r)| r.id.clone())
            .collect();
        return Err(TreeError::Cycle { ids });
    }

    let mut built: Vec<Option<CommentNode>> = (0..slots).map(|_| None).collect();
    for &slot in order.iter().skip(1).rev() {
        let kids = children[slot]
            .iter()
            .filter_map(|&c| built[c].take())
            .collect();
        built[slot] = Some(CommentNode::leaf(&records[slot - 1], kids));
    }

    let top = children[0]
        .iter()
        .filter_map(|&c| built[c].take())
        .collect();
    Ok(CommentNode::root(top))
}
