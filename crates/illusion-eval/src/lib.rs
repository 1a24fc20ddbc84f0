//! # illusion-eval
//!
//! Illusion evaluation on colored graphs.
//!
//! A node's neighbourhood is its set of out-neighbours. Every predicate
//! compares the winners of the node's neighbourhood against the winners of
//! the whole coloring:
//!
//! - **Majority** (`majority`): binary palette, strict or weak tie handling
//! - **Plurality / quota** (`plurality`): arbitrary palettes, strict and weak flags
//! - **1/k aggregates** (`aggregate`): fraction of deceived nodes against `1/k`
//! - **Dynamics** (`dynamics`): synchronous plurality updates
//! - **Search** (`search`): parallel exhaustive search over all colorings
//!
//! All evaluation is pure; inputs are never mutated.

pub mod aggregate;
pub mod dynamics;
pub mod majority;
pub mod plurality;
pub mod search;
pub mod winners;

pub use aggregate::{plurality_illusion_over_graph, quota_illusion_over_graph, KFractionIllusion};
pub use dynamics::{update, update_until_stable, DynamicsOutcome};
pub use majority::{
    check_majority, check_majority_majority_illusion, classify_majority,
    majority_illusion_over_graph, MajorityReport, Verdict,
};
pub use plurality::{check_plurality, check_quota, IllusionPair};
pub use search::{search_colorings, ColoringEnumerator, SearchOutcome};
pub use winners::{determine_quota_winners, neighbor_colors, winners, WinnerSet};
