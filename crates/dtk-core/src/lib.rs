//! # dtk-core
//!
//! Shared data types for dtk: the identity and team records read from the
//! remote access-control service, and the response shapes rendered by the CLI.
//!
//! Nothing in this crate performs I/O. Records are created and mutated only by
//! the remote service; dtk reads them.

pub mod identity;
pub mod permission;
pub mod responses;
pub mod team;

pub use identity::{Identity, Timestamp};
pub use permission::Permission;
pub use responses::{CheckUserResponse, FoundBy, IdentityLookup, KeyIssueResponse, LoginResponse};
pub use team::Team;
