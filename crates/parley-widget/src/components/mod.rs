//! UI components for the comments widget.

pub mod app;
pub mod composer;
pub mod identity_bar;
pub mod thread;

pub use app::{FaultBoundary, Widget};
pub use composer::CommentComposer;
pub use identity_bar::IdentityBar;
pub use thread::{CommentItem, CommentList, CommentThread};
