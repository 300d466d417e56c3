//! # mtbdd-rs: Shared Multi-Terminal ROBDDs in Rust
//!
//! **`mtbdd-rs`** is a manager-centric library for **shared multi-terminal
//! reduced ordered binary decision diagrams (MT-ROBDDs)** representing the
//! transition functions of finite automata: for every source state, a
//! diagram over a fixed, totally ordered set of Boolean variables maps a
//! bit-encoded input symbol (plus optional nondeterminism-choice bits) to a
//! target state.
//!
//! ## What is a shared MTBDD?
//!
//! A multi-terminal BDD generalizes a BDD: instead of two truth terminals
//! it ends in terminals carrying arbitrary values, here state identifiers.
//! *Shared* means one node store serves many entry points --- states with
//! similar behavior reuse common subgraphs, and hash consing keeps exactly
//! one physical node per equivalence class.
//!
//! ## Key Features
//!
//! - **Manager-Centric Architecture**: All construction goes through the
//!   [`MtBdd`][crate::mtbdd::MtBdd] manager, which guarantees structural
//!   sharing (hash consing) and hands out lightweight
//!   [`NodeId`][crate::types::NodeId] handles.
//! - **Canonicalization pipeline**: [`trim`][crate::mtbdd::MtBdd::trim]
//!   drops unreachable nodes,
//!   [`remove_redundant_tests`][crate::mtbdd::MtBdd::remove_redundant_tests]
//!   eliminates tests whose branches coincide, and
//!   [`make_complete`][crate::mtbdd::MtBdd::make_complete] fills the holes
//!   of a partial diagram with a rejecting sink.
//! - **Path enumeration**: [`paths`][crate::mtbdd::MtBdd::paths] yields
//!   every full-width bit string reaching a terminal, expanding skipped
//!   variables as don't-cares.
//! - **Flat-table bridge**: bidirectional transfer to foreign BDD managers
//!   with position-indexed node tables via the
//!   [`FlatManager`][crate::flat::FlatManager] contract.
//!
//! ## Basic Usage
//!
//! ```rust
//! use mtbdd_rs::mtbdd::MtBdd;
//! use mtbdd_rs::types::{HI, LO, SINK_VALUE};
//!
//! // 1. One diagram over 2 variables.
//! let mut mtbdd = MtBdd::new(2);
//!
//! // 2. One bit string per transition:
//! //    state 0 goes to state 1 on 00 and back to 0 on 11.
//! mtbdd.insert_bit_string(0, &[LO, LO], 1).unwrap();
//! mtbdd.insert_bit_string(0, &[HI, HI], 0).unwrap();
//!
//! // 3. Canonicalize.
//! mtbdd.trim().remove_redundant_tests().make_complete(SINK_VALUE, true);
//!
//! // 4. Enumerate: 2 real transitions, 2 paths into the sink.
//! let root = mtbdd.get_root(0).unwrap();
//! assert_eq!(mtbdd.paths(root).count(), 4);
//! ```
//!
//! ## Core Components
//!
//! - **[`mtbdd`]**: The heart of the library. Contains the
//!   [`MtBdd`][crate::mtbdd::MtBdd] manager and the canonicalization
//!   passes.
//! - **[`paths`]**: Don't-care-expanding path enumeration.
//! - **[`flat`]**: Import/export against flat node tables.
//! - **[`encode`]**: The adapter boundary turning automaton transitions
//!   into bit strings and back.
//! - **[`dot`]**: Graphviz visualization for diagnostics.

pub mod dot;
pub mod encode;
pub mod error;
pub mod flat;
pub mod mtbdd;
pub mod node;
pub mod paths;
pub mod store;
pub mod types;
pub mod utils;
