//! In-process collaborators for the Parley comments widget.
//!
//! These stand in for the hosted identity provider, document store and
//! attestation service. The demo binary runs on them and the integration
//! tests drive the whole widget core through them.
//!
//! - [`MemoryStore`]: live comment collections with push snapshots and
//!   server-side timestamps
//! - [`MemoryIdentity`]: push-driven sign-in state with a configurable account
//! - [`SiteKeyAttestor`]: issues per-write tokens for a site key

pub mod attestation;
pub mod identity;
pub mod memory;

pub use attestation::SiteKeyAttestor;
pub use identity::MemoryIdentity;
pub use memory::MemoryStore;
