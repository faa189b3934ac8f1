//! Core of the Parley threaded comments widget.
//!
//! Everything here is renderer-agnostic: the widget crate draws it with
//! Dioxus, tests drive it directly.
//!
//! # Pieces
//!
//! - [`tree::build`]: flat comment records → rooted, ordered [`CommentNode`] tree
//! - [`thread::LiveThread`]: rebuilds the tree per snapshot and keeps reply-panel
//!   state keyed by comment id across rebuilds
//! - [`identity::IdentityGate`]: push-driven current-user state, login/logout
//! - [`submission::SubmissionController`]: validates drafts and dispatches writes
//! - [`store::CommentStore`] / [`identity::IdentityProvider`] /
//!   [`attestation::Attestor`]: collaborator contracts
//!
//! # Example
//!
//! ```
//! use parley_core::{build, CommentRecord};
//!
//! let records = vec![
//!     CommentRecord::new("a", None, "u1", "Ada", "first"),
//!     CommentRecord::new("b", Some("a"), "u2", "Bo", "reply"),
//!     CommentRecord::new("c", Some("zzz"), "u3", "Cy", "orphan"),
//! ];
//! let root = build(&records).unwrap();
//! assert_eq!(root.child_ids(), vec!["a", "c"]);
//! assert_eq!(root.children[0].child_ids(), vec!["b"]);
//! ```

pub mod attestation;
pub mod config;
pub mod error;
pub mod fault;
pub mod identity;
pub mod model;
pub mod store;
pub mod stream;
pub mod submission;
pub mod thread;
pub mod time;
pub mod tree;

pub use attestation::{with_optional_attestation, AttestationToken, AttestedStore, Attestor};
pub use config::{StoreConfig, WidgetConfig};
pub use error::{ParleyError, Result};
pub use fault::{Fault, FaultKind, FaultSink};
pub use identity::{AuthState, AuthStatus, CurrentUser, GateView, IdentityGate, IdentityProvider};
pub use model::{CommentId, CommentRecord, NewComment, User, ROOT_ID};
pub use store::{AppendRequest, CollectionPath, CommentStore, Snapshot, SnapshotStream};
pub use submission::{dispatch_append, Composer, Submission, SubmissionController, SubmitOutcome};
pub use thread::{thread_view, CommentView, LiveThread, ReplyAffordance, ReplyPanels, ThreadState};
pub use time::{format_relative, iso_timestamp, relative_label, PENDING_LABEL};
pub use tree::{build, CommentNode, TreeError};
