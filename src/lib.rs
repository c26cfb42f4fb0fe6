//! A red black tree with inspectable node handles, plus a chained string hash map and an
//! undirected graph with greedy coloring.

pub mod arena;
pub mod config;
pub mod graph;
pub mod hash_map;
pub mod red_black_tree;
