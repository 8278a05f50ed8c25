//! Link graph and the analyses run over it
//!
//! - `link_graph`: the page universe and the reverse ("linked-from") graph
//!   built up while crawling
//! - `analytics`: orphan detection, most-linked ranking and distance tiers

pub mod analytics;
mod link_graph;

pub use analytics::{
    analyze, distance_tiers, find_orphans, hop_distances, rank_most_linked, DistanceTiers,
    GraphAnalysis, LinkedPage, RankedPage,
};
pub use link_graph::{BadLink, LinkGraph, LinkTally, PageUniverse};
