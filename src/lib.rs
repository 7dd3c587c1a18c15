//! Self-play search engine for Corintho, a deterministic two-player
//! perfect-information board game.
//!
//! The crate drives many games in parallel, each backed by a
//! Monte-Carlo search tree guided by an external position evaluator,
//! and produces either training samples (game state, move-probability
//! target, terminal outcome) from self-play or scored match outcomes
//! between two evaluators.
//!
//! ## Modules
//!
//! - [`mv`] - the dense move-id codec
//! - [`position`] - board state, legal-move generation, feature tensors
//! - [`arena`] / [`node`] - the search tree's node storage
//! - [`searcher`] - one tree's batched PUCT search
//! - [`evaluator`] - the position-scoring trait boundary
//! - [`symmetry`] - the board's dihedral symmetry group
//! - [`sample`] - training sample records
//! - [`driver`] - one game from start to finish
//! - [`coordinator`] - many games run in parallel
//! - [`config`] - validated parameters and the experimentation CLI
//!
//! ## Example
//!
//! ```
//! use corintho_engine::driver::{Driver, Seat};
//! use corintho_engine::evaluator::UniformEvaluator;
//! use corintho_engine::searcher::{Searcher, SearcherConfig};
//! use corintho_engine::position::Position;
//! use rand::SeedableRng;
//!
//! let eval = UniformEvaluator;
//! let config = SearcherConfig { max_searches: 8, searches_per_eval: 4, ..Default::default() };
//! let searcher = Searcher::new(Position::new(), config);
//! let mut driver = Driver::new([Seat::Search(searcher, &eval), Seat::Random], true);
//! let mut rng = rand::rngs::StdRng::seed_from_u64(0);
//! let _outcome = driver.run(&mut rng);
//! ```

pub mod arena;
pub mod config;
pub mod coordinator;
pub mod driver;
pub mod error;
pub mod evaluator;
pub mod mv;
pub mod node;
pub mod piece;
pub mod position;
pub mod render;
pub mod sample;
pub mod searcher;
pub mod symmetry;
