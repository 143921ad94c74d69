//! Bounded bidirectional breadth-first search.
//!
//! One search grows from the start state and one from the end state, a level
//! at a time, start side first. Every generated state is checked against the
//! opposite side's parent map and the search stops at the first hit. With
//! seven levels per side this covers every path of up to 14 moves.

use std::collections::HashMap;
use std::time::Instant;

use tracing::{debug, info};

use crate::perm::PermutationGroup;

/// Levels expanded from each end; two sides of seven cover 14 moves
pub const DEFAULT_LEVELS_PER_SIDE: usize = 7;

/// State -> the state and move that first discovered it (`None` for the root)
pub type ParentMap<S, M> = HashMap<S, Option<(S, M)>>;

/// Configuration for the search
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Number of levels expanded from each end
    pub levels_per_side: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            levels_per_side: DEFAULT_LEVELS_PER_SIDE,
        }
    }
}

impl SearchConfig {
    /// Longest path this configuration can find
    pub fn max_moves(&self) -> usize {
        self.levels_per_side * 2
    }
}

/// Result of a search
#[derive(Debug, Clone)]
pub struct SearchResult<M> {
    /// Shortest move sequence, or `None` if none exists within the bound
    pub path: Option<Vec<M>>,
    /// Start-side levels begun before the search stopped
    pub levels_expanded: usize,
    /// States in the start-side parent map when the search stopped
    pub start_discovered: usize,
    /// States in the end-side parent map when the search stopped
    pub end_discovered: usize,
    /// Time elapsed in milliseconds
    pub time_elapsed_ms: u64,
}

impl<M> SearchResult<M> {
    pub fn found(&self) -> bool {
        self.path.is_some()
    }
}

/// Outcome of expanding one level of one side
#[derive(Debug)]
pub enum Expansion<S> {
    /// States first discovered at the new depth, in discovery order
    Frontier(Vec<S>),
    /// A generated state already known to the opposite side
    Met(S),
}

/// Expand every state of `frontier` by every generator.
///
/// Newly discovered states are recorded in `parents` together with the state
/// and move that produced them; states already present are left untouched.
/// Each generated state is checked against `opposite` as soon as it is
/// produced, and the first hit ends the expansion.
pub fn expand<G: PermutationGroup>(
    group: &G,
    frontier: &[G::State],
    parents: &mut ParentMap<G::State, G::Move>,
    opposite: &ParentMap<G::State, G::Move>,
) -> Expansion<G::State> {
    let mut next_frontier = Vec::new();

    for state in frontier {
        for &mv in group.generators() {
            let next = group.apply(mv, state);

            if !parents.contains_key(&next) {
                parents.insert(next.clone(), Some((state.clone(), mv)));
                next_frontier.push(next.clone());
            }

            if opposite.contains_key(&next) {
                return Expansion::Met(next);
            }
        }
    }

    Expansion::Frontier(next_frontier)
}

/// Assemble the path through `meeting`.
///
/// The start-side chain is walked back to its root and reversed into
/// chronological order. The end-side chain was recorded moving away from the
/// end state, so its moves are inverted and kept in visit order.
pub fn reconstruct<G: PermutationGroup>(
    group: &G,
    start_parents: &ParentMap<G::State, G::Move>,
    end_parents: &ParentMap<G::State, G::Move>,
    meeting: &G::State,
) -> Vec<G::Move> {
    let mut moves = Vec::new();

    let mut current = meeting;
    while let Some(Some((previous, mv))) = start_parents.get(current) {
        moves.push(*mv);
        current = previous;
    }
    moves.reverse();

    let mut current = meeting;
    while let Some(Some((previous, mv))) = end_parents.get(current) {
        moves.push(group.inverse(*mv));
        current = previous;
    }

    moves
}

/// Find a shortest move sequence from `start` to `end` within
/// `config.levels_per_side` levels from each end.
pub fn search<G: PermutationGroup>(
    group: &G,
    start: &G::State,
    end: &G::State,
    config: &SearchConfig,
) -> SearchResult<G::Move> {
    let start_time = Instant::now();

    info!(
        event = "search_start",
        generators = group.generators().len(),
        levels_per_side = config.levels_per_side,
    );

    let mut start_parents: ParentMap<G::State, G::Move> = HashMap::new();
    start_parents.insert(start.clone(), None);
    let mut end_parents: ParentMap<G::State, G::Move> = HashMap::new();
    end_parents.insert(end.clone(), None);

    let finish = |path: Option<Vec<G::Move>>,
                  levels_expanded: usize,
                  start_parents: &ParentMap<G::State, G::Move>,
                  end_parents: &ParentMap<G::State, G::Move>| SearchResult {
        path,
        levels_expanded,
        start_discovered: start_parents.len(),
        end_discovered: end_parents.len(),
        time_elapsed_ms: start_time.elapsed().as_millis() as u64,
    };

    if start == end {
        info!(event = "meet", length = 0);
        return finish(Some(Vec::new()), 0, &start_parents, &end_parents);
    }

    let mut start_frontier = vec![start.clone()];
    let mut end_frontier = vec![end.clone()];

    for depth in 1..=config.levels_per_side {
        match expand(group, &start_frontier, &mut start_parents, &end_parents) {
            Expansion::Met(meeting) => {
                let path = reconstruct(group, &start_parents, &end_parents, &meeting);
                info!(event = "meet", side = "start", depth, length = path.len());
                return finish(Some(path), depth, &start_parents, &end_parents);
            }
            Expansion::Frontier(next) => start_frontier = next,
        }
        debug!(
            event = "level",
            side = "start",
            depth,
            frontier = start_frontier.len(),
            discovered = start_parents.len(),
        );

        match expand(group, &end_frontier, &mut end_parents, &start_parents) {
            Expansion::Met(meeting) => {
                let path = reconstruct(group, &start_parents, &end_parents, &meeting);
                info!(event = "meet", side = "end", depth, length = path.len());
                return finish(Some(path), depth, &start_parents, &end_parents);
            }
            Expansion::Frontier(next) => end_frontier = next,
        }
        debug!(
            event = "level",
            side = "end",
            depth,
            frontier = end_frontier.len(),
            discovered = end_parents.len(),
        );
    }

    info!(
        event = "bound_exhausted",
        max_moves = config.max_moves(),
        start_discovered = start_parents.len(),
        end_discovered = end_parents.len(),
    );
    finish(None, config.levels_per_side, &start_parents, &end_parents)
}

/// Shortest move sequence from `start` to `end` of at most 14 moves.
///
/// Returns `Some(vec![])` when the states are equal and `None` when no
/// sequence exists within the bound.
pub fn shortest_path<G: PermutationGroup>(
    group: &G,
    start: &G::State,
    end: &G::State,
) -> Option<Vec<G::Move>> {
    search(group, start, end, &SearchConfig::default()).path
}
