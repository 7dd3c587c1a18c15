//! One tree's worth of Monte-Carlo search: PUCT selection, Dirichlet
//! noise mixed into the root's priors, batched leaf evaluation, and
//! game-theoretic back-propagation of proven (not just estimated)
//! results. Each node owns a cloned [`Position`], so descent never needs
//! an undo step (see `node.rs`/`arena.rs`).

use std::collections::{HashMap, HashSet};

use rand::Rng;
use rand_distr::{Dirichlet, Distribution};
use tracing::{debug, trace};

use crate::arena::{Arena, NodeId};
use crate::evaluator::Evaluator;
use crate::mv::NUM_MOVES;
use crate::node::{Edge, KnownResult, MAX_VISITS, Node};
use crate::position::Position;

/// Default iteration budget per move.
pub const DEFAULT_MAX_SEARCHES: u32 = 1600;
/// Default leaf-evaluation batch size.
pub const DEFAULT_SEARCHES_PER_EVAL: usize = 16;
/// Default PUCT exploration constant.
pub const DEFAULT_C_PUCT: f32 = 1.0;
/// Default weight given to Dirichlet noise at the root.
pub const DEFAULT_EPSILON: f32 = 0.25;
/// Number of plies from the start of a game during which moves are
/// sampled from the visit distribution instead of argmax-chosen, to keep
/// self-play games diverse.
pub const NUM_OPENING_MOVES: u32 = 6;

#[derive(Debug, Clone, Copy)]
pub struct SearcherConfig {
    pub c_puct: f32,
    pub epsilon: f32,
    pub max_searches: u32,
    pub searches_per_eval: usize,
}

impl Default for SearcherConfig {
    fn default() -> Self {
        Self {
            c_puct: DEFAULT_C_PUCT,
            epsilon: DEFAULT_EPSILON,
            max_searches: DEFAULT_MAX_SEARCHES,
            searches_per_eval: DEFAULT_SEARCHES_PER_EVAL,
        }
    }
}

/// The value assigned to an edge's provisional statistics while its leaf
/// is awaiting evaluation, so a batch of `searches_per_eval` selections
/// spreads across distinct leaves instead of collapsing onto one path.
const VIRTUAL_LOSS: f32 = -1.0;

pub struct Searcher {
    arena: Arena<Node>,
    root: NodeId,
    config: SearcherConfig,
    /// Selection paths for leaves queued into the current batch but not
    /// yet evaluated, keyed by leaf id so a later duplicate selection of
    /// the same leaf doesn't require tracking more than one path to it.
    pending_paths: HashMap<NodeId, Vec<(NodeId, usize)>>,
}

impl Searcher {
    pub fn new(position: Position, config: SearcherConfig) -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(Node::new_root(position));
        Self { arena, root, config, pending_paths: HashMap::new() }
    }

    pub fn root_position(&self) -> &Position {
        &self.arena.get(self.root).position
    }

    pub fn node_count(&self) -> usize {
        crate::node::count_nodes(&self.arena, self.root)
    }

    /// Run search to completion: either `max_searches` visits at the
    /// root, or an earlier proof that the root's result is forced.
    pub fn search<R: Rng>(&mut self, evaluator: &dyn Evaluator, rng: &mut R) {
        if self.arena.get(self.root).is_leaf() {
            self.evaluate_and_expand(&[self.root], evaluator);
            self.mix_dirichlet_noise(self.root, rng);
        }

        let target = self.config.max_searches.min(MAX_VISITS as u32);

        while (self.arena.get(self.root).visits as u32) < target && self.arena.get(self.root).known_result.is_none() {
            let remaining = target - self.arena.get(self.root).visits as u32;
            let batch_target = self.config.searches_per_eval.min(remaining as usize).max(1);

            let mut queued: Vec<NodeId> = Vec::new();
            let mut seen: HashSet<NodeId> = HashSet::new();
            let mut attempts = 0;
            while queued.len() < batch_target && attempts < batch_target * 4 {
                attempts += 1;
                if self.arena.get(self.root).known_result.is_some() {
                    break;
                }
                match self.select_leaf() {
                    SelectOutcome::Terminal(path, terminal_value) => {
                        self.backpropagate(&path, terminal_value);
                    }
                    SelectOutcome::Leaf(path, leaf) => {
                        if seen.insert(leaf) {
                            queued.push(leaf);
                        }
                        // Path is stashed implicitly on the node via parent
                        // pointers; remember it for this leaf's eventual backprop.
                        self.pending_paths.entry(leaf).or_insert(path);
                    }
                }
            }

            if !queued.is_empty() {
                self.evaluate_and_expand(&queued, evaluator);
            }
        }

        debug!(visits = self.arena.get(self.root).visits, nodes = self.node_count(), "search complete");
    }

    fn evaluate_and_expand(&mut self, leaves: &[NodeId], evaluator: &dyn Evaluator) {
        let features: Vec<[f32; crate::position::GAME_STATE_SIZE]> = leaves
            .iter()
            .map(|&id| {
                let mut f = [0.0; crate::position::GAME_STATE_SIZE];
                self.arena.get(id).position.write_features(&mut f);
                f
            })
            .collect();
        let results = evaluator.evaluate_batch(&features);

        for (&leaf, (value, policy)) in leaves.iter().zip(results) {
            self.arena.get_mut(leaf).evaluation = Some(value);
            self.arena.get_mut(leaf).set_policy(&policy);

            if let Some(path) = self.pending_paths.remove(&leaf) {
                self.backpropagate(&path, value);
            } else {
                // Root's initial evaluation: no path, just record visit.
                self.arena.get_mut(leaf).visits += 1;
            }
        }
    }

    fn mix_dirichlet_noise<R: Rng>(&mut self, node_id: NodeId, rng: &mut R) {
        let node = self.arena.get_mut(node_id);
        let n = node.edges.len();
        if n < 2 {
            return;
        }
        let alpha = (10.0 / n as f32).max(0.03);
        let dirichlet = match Dirichlet::new(&vec![alpha as f64; n]) {
            Ok(d) => d,
            Err(_) => return,
        };
        let noise: Vec<f64> = dirichlet.sample(rng);
        for (edge, &eta) in node.edges.iter_mut().zip(noise.iter()) {
            let mixed = (1.0 - self.config.epsilon) * edge.prior() + self.config.epsilon * eta as f32;
            edge.probability = (mixed * crate::node::MAX_PROBABILITY as f32).round() as u16;
        }
    }

    fn select_leaf(&mut self) -> SelectOutcome {
        let mut path: Vec<(NodeId, usize)> = Vec::new();
        let mut current = self.root;

        loop {
            if let Some(result) = self.arena.get(current).known_result {
                return SelectOutcome::Terminal(path, result.value());
            }
            if self.arena.get(current).is_leaf() {
                return SelectOutcome::Leaf(path, current);
            }

            let edge_idx = self.select_edge_puct(current);
            {
                let node = self.arena.get_mut(current);
                node.visits += 1;
                let edge = &mut node.edges[edge_idx];
                edge.visits += 1;
                edge.value_sum += VIRTUAL_LOSS;
            }

            let move_id = self.arena.get(current).edges[edge_idx].move_id;
            let child = self.arena.get(current).edges[edge_idx].child;
            let child_id = match child {
                Some(id) => id,
                None => {
                    let mut child_pos = self.arena.get(current).position.clone();
                    child_pos.do_move(move_id);
                    let depth = self.arena.get(current).depth + 1;
                    let child_node = Node::new_child(current, depth, child_pos);
                    let is_terminal = child_node.known_result.is_some();
                    let id = self.arena.insert(child_node);
                    self.arena.get_mut(current).edges[edge_idx].child = Some(id);
                    if is_terminal {
                        self.propagate_known_result(id);
                    }
                    id
                }
            };
            path.push((current, edge_idx));
            current = child_id;
        }
    }

    fn select_edge_puct(&self, node_id: NodeId) -> usize {
        let node = self.arena.get(node_id);
        let parent_visits = node.visits.max(1) as f32;
        let mut best_idx = 0;
        let mut best_score = f32::NEG_INFINITY;
        for (i, edge) in node.edges.iter().enumerate() {
            let q = edge.mean_value();
            let u = self.config.c_puct * edge.prior() * parent_visits.sqrt() / (1.0 + edge.visits as f32);
            let score = q + u;
            if score > best_score {
                best_score = score;
                best_idx = i;
            }
        }
        best_idx
    }

    fn backpropagate(&mut self, path: &[(NodeId, usize)], leaf_value: f32) {
        let mut value = leaf_value;
        for &(node_id, edge_idx) in path.iter().rev() {
            value = -value;
            let node = self.arena.get_mut(node_id);
            let edge = &mut node.edges[edge_idx];
            edge.value_sum += value - VIRTUAL_LOSS;
        }
    }

    /// Walk known results upward from `node_id` once it (or a child of
    /// it) has had its result proven, deducing forced wins/losses the
    /// way a minimax search would: a node is a forced win if any edge
    /// leads to a forced loss for the opponent, and a forced loss only
    /// once every edge has been tried and every one leads to a forced
    /// win for the opponent.
    fn propagate_known_result(&mut self, mut node_id: NodeId) {
        loop {
            let parent_id = match self.arena.get(node_id).parent {
                Some(p) => p,
                None => break,
            };
            let child_result = match self.arena.get(node_id).known_result {
                Some(r) => r,
                None => break,
            };
            let result_for_parent = child_result.flip();

            if result_for_parent == KnownResult::Win {
                self.arena.get_mut(parent_id).known_result = Some(KnownResult::Win);
                trace!(parent = ?parent_id, "forced win deduced");
                node_id = parent_id;
                continue;
            }

            let parent = self.arena.get(parent_id);
            let fully_explored = parent.edges.iter().all(|e| {
                e.child.is_some_and(|c| self.arena.get(c).known_result.is_some())
            });
            if !fully_explored {
                break;
            }
            let worst = parent
                .edges
                .iter()
                .map(|e| self.arena.get(e.child.unwrap()).known_result.unwrap().flip())
                .max_by_key(rank)
                .unwrap();
            self.arena.get_mut(parent_id).known_result = Some(worst);
            node_id = parent_id;
        }
    }

    /// Decide the move to play from the root, along with the probability
    /// vector to record as that position's training target. Order of
    /// precedence:
    ///   - a proven win picks the (any) child proven lost for the
    ///     opponent, target concentrated on it;
    ///   - a proven loss picks the most-visited child (longest
    ///     resistance), concentrated target;
    ///   - a proven draw picks the most-visited child that isn't itself
    ///     proven won for the opponent, concentrated target;
    ///   - otherwise, while still inside the opening and not testing, a
    ///     move is sampled from the visit distribution over children not
    ///     proven won for the opponent, and that distribution is the
    ///     target;
    ///   - failing all of that, the most-visited child wins, ties broken
    ///     by evaluation (drawn children count as 0), skipping children
    ///     proven won for the opponent; concentrated target.
    pub fn decide<R: Rng>(&self, ply: u32, testing: bool, rng: &mut R) -> (u8, [f32; NUM_MOVES]) {
        let node = self.arena.get(self.root);

        if let Some(result) = node.known_result {
            let chosen = match result {
                KnownResult::Win => node
                    .edges
                    .iter()
                    .find(|e| self.edge_result(e) == Some(KnownResult::Loss))
                    .or_else(|| node.edges.iter().max_by_key(|e| e.visits))
                    .map(|e| e.move_id)
                    .expect("root must have legal moves"),
                KnownResult::Loss => {
                    node.edges.iter().max_by_key(|e| e.visits).map(|e| e.move_id).expect("root must have legal moves")
                }
                KnownResult::Draw => node
                    .edges
                    .iter()
                    .filter(|e| self.edge_result(e) != Some(KnownResult::Win))
                    .max_by_key(|e| e.visits)
                    .or_else(|| node.edges.iter().max_by_key(|e| e.visits))
                    .map(|e| e.move_id)
                    .expect("root must have legal moves"),
            };
            return (chosen, one_hot(chosen));
        }

        if ply < NUM_OPENING_MOVES && !testing {
            let candidates: Vec<&Edge> = node.edges.iter().filter(|e| self.edge_result(e) != Some(KnownResult::Win)).collect();
            let total: u32 = candidates.iter().map(|e| e.visits as u32).sum();
            if total > 0 {
                let mut probs = [0.0; NUM_MOVES];
                for edge in &candidates {
                    probs[edge.move_id as usize] = edge.visits as f32 / total as f32;
                }
                let mut pick = rng.random_range(0..total);
                for edge in &candidates {
                    let v = edge.visits as u32;
                    if pick < v {
                        return (edge.move_id, probs);
                    }
                    pick -= v;
                }
            }
        }

        let chosen = node
            .edges
            .iter()
            .filter(|e| self.edge_result(e) != Some(KnownResult::Win))
            .max_by(|a, b| a.visits.cmp(&b.visits).then(self.edge_value(a).total_cmp(&self.edge_value(b))))
            .or_else(|| node.edges.iter().max_by_key(|e| e.visits))
            .map(|e| e.move_id)
            .expect("root must have legal moves");
        (chosen, one_hot(chosen))
    }

    /// A child's proven result from its own (the opponent's) perspective,
    /// if search has proven one.
    fn edge_result(&self, edge: &Edge) -> Option<KnownResult> {
        edge.child.and_then(|c| self.arena.get(c).known_result)
    }

    /// An edge's value from the root's perspective: the proven result
    /// (drawn counts as 0) if one exists, else the running mean value.
    fn edge_value(&self, edge: &Edge) -> f32 {
        match self.edge_result(edge) {
            Some(result) => result.flip().value(),
            None => edge.mean_value(),
        }
    }

    /// Re-root the tree at the child reached by `move_id`, discarding
    /// every node outside that subtree. Used both for the engine's own
    /// chosen move and for a move announced by an opponent.
    pub fn advance(&mut self, move_id: u8) {
        let edge_idx = self
            .arena
            .get(self.root)
            .edges
            .iter()
            .position(|e| e.move_id == move_id)
            .expect("advance requires a currently-legal move id");
        let existing_child = self.arena.get(self.root).edges[edge_idx].child;

        let new_root_position = {
            let mut pos = self.arena.get(self.root).position.clone();
            pos.do_move(move_id);
            pos
        };

        let mut new_arena = Arena::new();
        let new_root = match existing_child {
            Some(child_id) => self.copy_subtree(child_id, &mut new_arena, None),
            None => new_arena.insert(Node::new_root(new_root_position)),
        };
        new_arena.get_mut(new_root).parent = None;
        new_arena.get_mut(new_root).depth = 0;

        self.arena = new_arena;
        self.root = new_root;
        self.pending_paths.clear();
    }

    fn copy_subtree(&self, old_id: NodeId, new_arena: &mut Arena<Node>, new_parent: Option<NodeId>) -> NodeId {
        let old_node = self.arena.get(old_id);
        let mut new_node = old_node.clone();
        new_node.parent = new_parent;
        for edge in &mut new_node.edges {
            edge.child = None;
        }
        let new_id = new_arena.insert(new_node);

        for (i, edge) in old_node.edges.iter().enumerate() {
            if let Some(old_child) = edge.child {
                let new_child = self.copy_subtree(old_child, new_arena, Some(new_id));
                new_arena.get_mut(new_id).edges[i].child = Some(new_child);
            }
        }
        new_id
    }
}

fn one_hot(move_id: u8) -> [f32; NUM_MOVES] {
    let mut out = [0.0; NUM_MOVES];
    out[move_id as usize] = 1.0;
    out
}

fn rank(r: &KnownResult) -> i32 {
    match r {
        KnownResult::Win => 2,
        KnownResult::Draw => 1,
        KnownResult::Loss => 0,
    }
}

enum SelectOutcome {
    Terminal(Vec<(NodeId, usize)>, f32),
    Leaf(Vec<(NodeId, usize)>, NodeId),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::UniformEvaluator;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn search_increases_root_visits_up_to_budget() {
        let config = SearcherConfig { max_searches: 32, searches_per_eval: 4, ..Default::default() };
        let mut searcher = Searcher::new(Position::new(), config);
        let mut rng = StdRng::seed_from_u64(1);
        searcher.search(&UniformEvaluator, &mut rng);
        assert!(searcher.arena.get(searcher.root).visits >= 32 || searcher.arena.get(searcher.root).known_result.is_some());
    }

    #[test]
    fn decide_returns_a_currently_legal_move() {
        let config = SearcherConfig { max_searches: 16, searches_per_eval: 4, ..Default::default() };
        let mut searcher = Searcher::new(Position::new(), config);
        let mut rng = StdRng::seed_from_u64(2);
        searcher.search(&UniformEvaluator, &mut rng);
        let (mv, probs) = searcher.decide(10, false, &mut rng);
        let (mask, _) = searcher.root_position().legal_moves();
        assert!(mask.is_legal(mv as usize));
        assert!((probs.iter().sum::<f32>() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn decide_outside_the_opening_yields_a_concentrated_target() {
        let config = SearcherConfig { max_searches: 16, searches_per_eval: 4, ..Default::default() };
        let mut searcher = Searcher::new(Position::new(), config);
        let mut rng = StdRng::seed_from_u64(4);
        searcher.search(&UniformEvaluator, &mut rng);
        let (mv, probs) = searcher.decide(NUM_OPENING_MOVES, true, &mut rng);
        assert_eq!(probs[mv as usize], 1.0);
        assert_eq!(probs.iter().filter(|&&p| p > 0.0).count(), 1);
    }

    #[test]
    fn decide_picks_the_proven_winning_move_when_root_is_a_deduced_win() {
        let mut searcher = Searcher::new(Position::new(), SearcherConfig::default());
        let root = searcher.root;

        let losing_child = searcher.arena.insert(Node::new_root(Position::new()));
        searcher.arena.get_mut(losing_child).known_result = Some(KnownResult::Loss);
        let other_child = searcher.arena.insert(Node::new_root(Position::new()));
        searcher.arena.get_mut(other_child).known_result = Some(KnownResult::Draw);

        let node = searcher.arena.get_mut(root);
        node.edges[0].child = Some(losing_child);
        node.edges[0].visits = 1;
        node.edges[1].child = Some(other_child);
        node.edges[1].visits = 100;
        node.known_result = Some(KnownResult::Win);
        let winning_move = node.edges[0].move_id;

        let mut rng = StdRng::seed_from_u64(5);
        let (mv, probs) = searcher.decide(20, false, &mut rng);
        assert_eq!(mv, winning_move);
        assert_eq!(probs[mv as usize], 1.0);
        assert_eq!(probs.iter().filter(|&&p| p > 0.0).count(), 1);
    }

    #[test]
    fn advance_reroots_onto_the_chosen_move() {
        let config = SearcherConfig { max_searches: 16, searches_per_eval: 4, ..Default::default() };
        let mut searcher = Searcher::new(Position::new(), config);
        let mut rng = StdRng::seed_from_u64(3);
        searcher.search(&UniformEvaluator, &mut rng);
        let (mv, _) = searcher.decide(10, true, &mut rng);
        let mut expected = searcher.root_position().clone();
        expected.do_move(mv);
        searcher.advance(mv);
        assert_eq!(*searcher.root_position(), expected);
    }
}
