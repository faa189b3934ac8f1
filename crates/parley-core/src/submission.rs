//! Submission controller: draft → validated comment → store write.
//!
//! Per composer instance:
//!
//! ```text
//! idle ── user absent ──────────────► inert (nothing rendered)
//! idle ── submit ─► validating ─┬─ blank ──► idle  (draft kept, no error)
//!                               └─ text ───► writing ─► idle (draft cleared,
//!                                                              focus requested)
//! ```
//!
//! The write is dispatched on its own task and is not awaited: the draft is
//! cleared as soon as it is handed off, and dropping the composer never
//! cancels it. Write errors go to the [`FaultSink`].

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::fault::FaultSink;
use crate::model::{CommentId, NewComment, User};
use crate::store::{AppendRequest, CollectionPath, CommentStore};

/// Result of validating a composer's draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Nobody is signed in; the composer is not interactive.
    Inert,
    /// The draft was blank after trimming. Nothing changes.
    Rejected,
    /// The draft became a comment ready to be written.
    Ready(NewComment),
}

/// Draft state of one composer (top-level form or a reply panel).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composer {
    parent_id: Option<CommentId>,
    draft: String,
    focus_generation: u64,
}

impl Composer {
    /// A new composer. Mounting counts as the first focus request.
    pub fn new(parent_id: Option<CommentId>) -> Self {
        Self {
            parent_id,
            draft: String::new(),
            focus_generation: 1,
        }
    }

    pub fn top_level() -> Self {
        Self::new(None)
    }

    pub fn reply_to(parent_id: impl Into<CommentId>) -> Self {
        Self::new(Some(parent_id.into()))
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Bumped whenever the input should (re)take focus.
    pub fn focus_generation(&self) -> u64 {
        self.focus_generation
    }

    /// Validate the draft for `user` and, if it holds text, take it.
    ///
    /// On success the draft is cleared and focus is requested again.
    pub fn take_submission(&mut self, user: Option<&User>) -> Submission {
        let Some(user) = user else {
            return Submission::Inert;
        };

        let text = self.draft.trim();
        if text.is_empty() {
            debug!(parent_id = ?self.parent_id, "Blank comment ignored");
            return Submission::Rejected;
        }

        let comment = NewComment {
            parent_id: self.parent_id.clone(),
            author_id: user.id.clone(),
            author_name: user.display_name.clone(),
            text: text.to_string(),
        };
        self.draft.clear();
        self.focus_generation += 1;
        Submission::Ready(comment)
    }
}

/// What `SubmissionController::submit` did.
#[derive(Debug)]
pub enum SubmitOutcome {
    Inert,
    Rejected,
    /// The write is on its way; the handle resolves when the store answers.
    Dispatched(JoinHandle<()>),
}

impl SubmitOutcome {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, SubmitOutcome::Dispatched(_))
    }
}

/// Hand a comment to the store on a detached task.
pub fn dispatch_append(
    store: Arc<dyn CommentStore>,
    path: CollectionPath,
    comment: NewComment,
    faults: FaultSink,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let parent_id = comment.parent_id.clone();
        match store.append(&path, AppendRequest::new(comment)).await {
            Ok(id) => info!(comment_id = %id, parent_id = ?parent_id, path = %path, "Comment written"),
            Err(e) => faults.report(e),
        }
    })
}

/// A composer bound to a store and a comments collection.
pub struct SubmissionController {
    composer: Composer,
    store: Arc<dyn CommentStore>,
    path: CollectionPath,
    faults: FaultSink,
}

impl SubmissionController {
    pub fn new(
        composer: Composer,
        store: Arc<dyn CommentStore>,
        path: CollectionPath,
        faults: FaultSink,
    ) -> Self {
        Self {
            composer,
            store,
            path,
            faults,
        }
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn composer_mut(&mut self) -> &mut Composer {
        &mut self.composer
    }

    /// Submit the current draft on behalf of `user`.
    pub fn submit(&mut self, user: Option<&User>) -> SubmitOutcome {
        match self.composer.take_submission(user) {
            Submission::Inert => SubmitOutcome::Inert,
            Submission::Rejected => SubmitOutcome::Rejected,
            Submission::Ready(comment) => SubmitOutcome::Dispatched(dispatch_append(
                Arc::clone(&self.store),
                self.path.clone(),
                comment,
                self.faults.clone(),
            )),
        }
    }

    /// Replace the draft with `raw_text` and submit it.
    pub fn submit_text(&mut self, raw_text: &str, user: Option<&User>) -> SubmitOutcome {
        self.composer.set_draft(raw_text);
        self.submit(user)
    }
}
