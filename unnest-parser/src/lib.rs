//! # unnest
//!
//! Flattens nested doctest declarations.
//!
//! A `TEST_CASE` holding `SUBCASE` blocks (nested to any depth) is rewritten as one plain
//! `TEST_CASE` per leaf path through the nesting. Each flat declaration carries every ancestor's
//! code, in root to leaf order, with the nesting syntax removed and the bodies re-indented.
//!
//! The pipeline is strictly linear:
//!
//!     lines ── extraction ──▶ declaration lines ── building ──▶ Tree ── flattening ──▶ FlatDeclaration*
//!
//! [`unnest::loader::SourceLoader`] drives it over a whole file. For test guidelines see the
//! [testing module](unnest::testing).

pub mod unnest;
