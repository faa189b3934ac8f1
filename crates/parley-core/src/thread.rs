//! Live thread state and the view model the renderer draws.
//!
//! The tree is thrown away and rebuilt on every snapshot, so anything the
//! viewer toggles (reply panels) is kept beside it in [`ReplyPanels`], keyed
//! by comment id. A node that survives into the next snapshot finds its
//! panel exactly as it was left.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::model::{CommentId, CommentRecord, User};
use crate::time::{iso_timestamp, relative_label};
use crate::tree::{build, map_forest, CommentNode, TreeError};

/// Reply-panel visibility, keyed by comment id. Hidden unless listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyPanels {
    open: HashSet<CommentId>,
}

impl ReplyPanels {
    pub fn is_open(&self, id: &str) -> bool {
        self.open.contains(id)
    }

    /// Flip the panel for `id`; returns whether it is now open.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.open.remove(id) {
            false
        } else {
            self.open.insert(id.to_string());
            true
        }
    }

    pub fn open_count(&self) -> usize {
        self.open.len()
    }
}

/// The reply control under one comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyAffordance {
    /// Viewer is not signed in: no toggle at all.
    Unavailable,
    /// Toggle shown, panel hidden.
    Collapsed,
    /// Toggle shown, reply composer shown.
    Expanded,
}

impl ReplyAffordance {
    /// Text of the toggle link.
    pub fn toggle_label(self) -> Option<&'static str> {
        match self {
            ReplyAffordance::Unavailable => None,
            ReplyAffordance::Collapsed => Some("Reply"),
            ReplyAffordance::Expanded => Some("Cancel"),
        }
    }
}

/// One rendered comment and its replies.
///
/// Like [`CommentNode`], clone, equality and drop do not recurse.
#[derive(Debug)]
pub struct CommentView {
    pub id: CommentId,
    pub author_name: String,
    /// Comment text, verbatim.
    pub text: String,
    /// "3 minutes ago", or "moments ago" while the write is pending.
    pub time_label: String,
    /// RFC 3339 creation time, once resolved.
    pub timestamp: Option<String>,
    pub reply: ReplyAffordance,
    /// 0 for top-level comments.
    pub depth: usize,
    pub children: Vec<CommentView>,
}

impl CommentView {
    fn with_children(&self, children: Vec<CommentView>) -> Self {
        Self {
            id: self.id.clone(),
            author_name: self.author_name.clone(),
            text: self.text.clone(),
            time_label: self.time_label.clone(),
            timestamp: self.timestamp.clone(),
            reply: self.reply,
            depth: self.depth,
            children,
        }
    }

    fn same_comment(&self, other: &Self) -> bool {
        self.id == other.id
            && self.author_name == other.author_name
            && self.text == other.text
            && self.time_label == other.time_label
            && self.timestamp == other.timestamp
            && self.reply == other.reply
            && self.depth == other.depth
            && self.children.len() == other.children.len()
    }
}

impl Clone for CommentView {
    fn clone(&self) -> Self {
        let children = map_forest(
            &self.children,
            |v| v.children.as_slice(),
            |v, _, kids| Some(v.with_children(kids)),
        );
        self.with_children(children)
    }
}

impl PartialEq for CommentView {
    fn eq(&self, other: &Self) -> bool {
        let mut pairs = vec![(self, other)];
        while let Some((a, b)) = pairs.pop() {
            if !a.same_comment(b) {
                return false;
            }
            pairs.extend(a.children.iter().zip(&b.children));
        }
        true
    }
}

impl Eq for CommentView {}

impl Drop for CommentView {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut view) = pending.pop() {
            pending.append(&mut view.children);
        }
    }
}

/// Build the views for every comment under `root`. Root itself is not a
/// comment and never appears.
pub fn thread_view(
    root: &CommentNode,
    viewer: Option<&User>,
    panels: &ReplyPanels,
    now: DateTime<Utc>,
) -> Vec<CommentView> {
    map_forest(
        &root.children,
        |node| node.children.as_slice(),
        |node, depth, children| {
            let record = node.record.as_ref()?;
            let reply = match viewer {
                None => ReplyAffordance::Unavailable,
                Some(_) if panels.is_open(&node.id) => ReplyAffordance::Expanded,
                Some(_) => ReplyAffordance::Collapsed,
            };
            Some(CommentView {
                id: node.id.clone(),
                author_name: record.author_name.clone(),
                text: record.text.clone(),
                time_label: relative_label(record.created_at, now),
                timestamp: iso_timestamp(record.created_at),
                reply,
                depth,
                children,
            })
        },
    )
}

/// Whether the first snapshot has arrived.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ThreadState {
    #[default]
    Loading,
    Ready(CommentNode),
}

/// The thread as the widget holds it between snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveThread {
    state: ThreadState,
    panels: ReplyPanels,
    rebuilds: u64,
}

impl LiveThread {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ThreadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ThreadState::Loading)
    }

    pub fn tree(&self) -> Option<&CommentNode> {
        match &self.state {
            ThreadState::Ready(root) => Some(root),
            ThreadState::Loading => None,
        }
    }

    pub fn panels(&self) -> &ReplyPanels {
        &self.panels
    }

    /// Number of snapshots applied so far.
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// Replace the tree with one built from `snapshot`. Reply panels are
    /// left alone. On error the previous tree stays in place.
    ///
    /// Returns the number of comments in the new tree.
    pub fn apply_snapshot(&mut self, snapshot: &[CommentRecord]) -> Result<usize, TreeError> {
        let root = build(snapshot)?;
        self.rebuilds += 1;
        debug!(
            comments = snapshot.len(),
            top_level = root.children.len(),
            rebuild = self.rebuilds,
            "Rebuilt comment tree"
        );
        self.state = ThreadState::Ready(root);
        Ok(snapshot.len())
    }

    /// Flip the reply panel under comment `id`; returns whether it is open.
    pub fn toggle_reply(&mut self, id: &str) -> bool {
        self.panels.toggle(id)
    }

    /// Views for rendering, or `None` while still loading.
    pub fn view(&self, viewer: Option<&User>, now: DateTime<Utc>) -> Option<Vec<CommentView>> {
        self.tree()
            .map(|root| thread_view(root, viewer, &self.panels, now))
    }
}
