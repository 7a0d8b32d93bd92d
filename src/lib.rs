//! spr - stacked pull requests for git
//!
//! Every local commit between the trunk branch and `HEAD` gets its own GitHub
//! pull request. Pull requests are chained base-to-head so each one shows a
//! single commit, and the whole stack is kept in sync by re-running `spr update`.
//!
//! The library is split the same way the command pipeline runs:
//! - [`stack`] parses local history and orders remote pull requests
//! - [`sync`] plans and executes the reconciliation of the two
//! - [`merge`] plans and executes the merge cascade
//! - [`git`] and [`platform`] are the collaborators the engine drives

pub mod auth;
pub mod config;
pub mod error;
pub mod git;
pub mod merge;
pub mod platform;
pub mod stack;
pub mod sync;
pub mod types;
