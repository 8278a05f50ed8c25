//! Read-only analyses over a completed link graph
//!
//! Hop distances are counted from the home page along outbound links. Pages
//! at hop 1 are listed on the home page itself, hop 2 pages are one click
//! away from that list and hop 3 pages two clicks away.

use crate::graph::LinkGraph;
use crate::links::PageName;
use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};

/// Farthest hop still considered "within one click" of the home page
const WITHIN_ONE_CLICK: usize = 2;

/// Farthest hop still considered "within two clicks" of the home page
const WITHIN_TWO_CLICKS: usize = 3;

/// A page with its number of inbound links
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedPage {
    pub name: PageName,
    pub inbound: usize,
}

/// A page with the list of pages that link to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkedPage {
    pub name: PageName,
    pub linked_from: Vec<PageName>,
}

/// Pages bucketed by their distance from the home page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DistanceTiers {
    /// Pages first reached two clicks beyond the home page's own links
    pub two_clicks: Vec<PageName>,

    /// Linked pages farther than that, or not reachable from home at all
    pub over_two_clicks: Vec<PageName>,
}

/// Everything the reports need from a crawled graph
#[derive(Debug, Clone, Default, Serialize)]
pub struct GraphAnalysis {
    pub orphans: Vec<PageName>,
    pub most_linked: Vec<RankedPage>,
    pub linked_pages: Vec<LinkedPage>,
    pub distance_tiers: Option<DistanceTiers>,
}

/// Runs every analysis over the graph
///
/// Distance tiers are only computed when `with_tiers` is set, since they are
/// only reported in verbose runs.
pub fn analyze(graph: &LinkGraph, most_linked_limit: usize, with_tiers: bool) -> GraphAnalysis {
    let orphans = find_orphans(graph);
    let ranking = rank_most_linked(graph);
    let linked_pages = linked_pages(graph, &ranking);

    let distance_tiers = with_tiers.then(|| distance_tiers(graph, &orphans));

    let mut most_linked = ranking;
    most_linked.truncate(most_linked_limit);

    tracing::debug!(
        "Analysis: {} orphans, {} linked pages",
        orphans.len(),
        linked_pages.len()
    );

    GraphAnalysis {
        orphans,
        most_linked,
        linked_pages,
        distance_tiers,
    }
}

/// Pages that no crawled page links to, in universe order
pub fn find_orphans(graph: &LinkGraph) -> Vec<PageName> {
    graph
        .iter()
        .filter(|(_, sources)| sources.is_empty())
        .map(|(page, _)| page.clone())
        .collect()
}

/// All pages sorted by inbound link count, most linked first
///
/// The sort is stable, so pages with equal counts keep universe order.
pub fn rank_most_linked(graph: &LinkGraph) -> Vec<RankedPage> {
    let mut ranking: Vec<RankedPage> = graph
        .iter()
        .map(|(page, sources)| RankedPage {
            name: page.clone(),
            inbound: sources.len(),
        })
        .collect();

    ranking.sort_by(|a, b| b.inbound.cmp(&a.inbound));
    ranking
}

/// Linked-from lists of every page with at least one inbound link
pub fn linked_pages(graph: &LinkGraph, ranking: &[RankedPage]) -> Vec<LinkedPage> {
    ranking
        .iter()
        .filter(|ranked| ranked.inbound > 0)
        .filter_map(|ranked| {
            graph.linked_from(ranked.name.as_str()).map(|sources| LinkedPage {
                name: ranked.name.clone(),
                linked_from: sources.to_vec(),
            })
        })
        .collect()
}

/// Inverts the linked-from relation into outbound links
///
/// Self links are dropped. Targets appear in universe order.
pub fn outbound_links(graph: &LinkGraph) -> HashMap<&PageName, Vec<&PageName>> {
    let mut outbound: HashMap<&PageName, Vec<&PageName>> = HashMap::new();

    for (target, sources) in graph.iter() {
        for source in sources {
            if source != target {
                outbound.entry(source).or_default().push(target);
            }
        }
    }

    outbound
}

/// Breadth-first hop distances from the home page
///
/// Returns pages in discovery order, starting with home at distance 0. Empty
/// if home is not part of the universe.
pub fn hop_distances(graph: &LinkGraph) -> Vec<(PageName, usize)> {
    let Some(start) = graph.universe().iter().find(|page| page.is_home()) else {
        return Vec::new();
    };

    let outbound = outbound_links(graph);
    let mut visited: HashSet<&PageName> = HashSet::new();
    let mut queue: VecDeque<(&PageName, usize)> = VecDeque::new();
    let mut discovered = Vec::new();

    visited.insert(start);
    queue.push_back((start, 0));

    while let Some((page, distance)) = queue.pop_front() {
        discovered.push((page.clone(), distance));

        for next in outbound.get(page).into_iter().flatten() {
            if visited.insert(*next) {
                queue.push_back((*next, distance + 1));
            }
        }
    }

    discovered
}

/// Buckets linked pages by how far they are from the home page
///
/// Orphans and the home page itself are never placed in a tier, and no page
/// is in both tiers.
pub fn distance_tiers(graph: &LinkGraph, orphans: &[PageName]) -> DistanceTiers {
    let distances = hop_distances(graph);

    let two_clicks: Vec<PageName> = distances
        .iter()
        .filter(|(_, distance)| *distance > WITHIN_ONE_CLICK && *distance <= WITHIN_TWO_CLICKS)
        .map(|(page, _)| page.clone())
        .collect();

    let within_two: HashSet<&PageName> = distances
        .iter()
        .filter(|(_, distance)| *distance <= WITHIN_TWO_CLICKS)
        .map(|(page, _)| page)
        .collect();
    let orphans: HashSet<&PageName> = orphans.iter().collect();

    let over_two_clicks = graph
        .universe()
        .iter()
        .filter(|page| !page.is_home())
        .filter(|page| !within_two.contains(page) && !orphans.contains(page))
        .cloned()
        .collect();

    DistanceTiers {
        two_clicks,
        over_two_clicks,
    }
}
