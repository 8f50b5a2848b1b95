//! Top-level module for the phonetic n-gram modeling system.
//!
//! This crate provides segment-level n-gram frequency statistics and
//! smoothed conditional probability estimation, including:
//! - Interned phonetic segments (`Segment`, `SegmentPool`)
//! - Fixed-length segment sequences (`Ngram`)
//! - Frequency bookkeeping (`FrequencyDistribution`,
//!   `ConditionalFrequencyDistribution`)
//! - Read-only training input (`Variety`, `Word`, `Sense`)
//! - Trained models and their backoff chains (`NgramModel`)
//! - Interchangeable smoothing strategies (`SmootherKind`)

/// Interned phonetic units and the interning arena.
///
/// Handles are stable indices; equality and hashing are identity-based
/// by construction.
pub mod segment;

/// Fixed-length ordered segment sequences and traversal direction.
///
/// Direction-aware splitting into context and outcome lives here.
pub mod ngram;

/// Frequency-distribution data structures.
///
/// A plain multiset with counts, and the condition-to-distribution map
/// the models key on.
pub mod frequencies;

/// The read-only training input: varieties, words, shapes and senses.
pub mod variety;

/// Trained n-gram models.
///
/// Handles training (window extraction, chain construction), contract
/// validation, probability and frequency queries, and count-weighted
/// sampling.
pub mod ngram_model;

/// Smoothing strategies.
///
/// Maximum likelihood, Witten-Bell and modified Kneser-Ney; the latter
/// two own the lower-order model of their backoff chain.
/// The trained representations are internal; models are queried through
/// `NgramModel`.
pub mod smoothing;

/// Internal window extraction walking a variety's shapes.
///
/// This module is not exposed publicly.
mod windows;

pub use ngram::{Direction, Ngram};
pub use ngram_model::NgramModel;
pub use segment::{Segment, SegmentKey, SegmentPool, SegmentType};
pub use smoothing::SmootherKind;
pub use variety::{Category, Sense, ShapeNode, Variety, Word};
