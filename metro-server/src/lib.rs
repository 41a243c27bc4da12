//! Metro route planner server.
//!
//! Loads a GTFS-style metro feed into an immutable station graph and
//! answers: "what is the shortest or fastest way from this station to
//! that one, and where do I change lines?"

pub mod cache;
pub mod config;
pub mod domain;
pub mod feed;
pub mod graph;
pub mod planner;
pub mod present;
pub mod router;
pub mod store;
pub mod web;
