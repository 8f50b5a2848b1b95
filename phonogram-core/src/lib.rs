//! Phonetic n-gram language modeling library.
//!
//! This crate provides the statistical core used for lexical and
//! phonetic similarity work across language varieties, including:
//! - Segment-level n-gram frequency statistics over a variety's words
//! - Smoothed conditional probabilities `P(segment | context, category)`
//! - Interchangeable smoothing strategies (maximum likelihood,
//!   Witten-Bell, modified Kneser-Ney) with recursive backoff chains
//! - Count-weighted sampling for pseudo-word generation
//!
//! Segmentation of raw spelling, alignment scoring and cognate
//! clustering are collaborators of this crate, not part of it; they
//! supply the `Variety` input and consume the trained models.

/// Core model types, training and probability estimation.
///
/// This module exposes the model interface while keeping internal
/// window-extraction machinery private.
pub mod model;

/// Shared fixtures for the crate's tests.
///
/// Not part of the crate; a minimal digraph-aware orthographic
/// segmenter and the reference word list.
#[cfg(test)]
pub(crate) mod testutil;
