//! Adjacency list entries.

/// A directed hop between adjacent stations on one line.
///
/// `to` and `line` are dense indices into the graph's station and line
/// tables, not feed ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub to: usize,
    pub line: usize,
    pub meters: u32,
    pub secs: u32,
}

impl Edge {
    pub fn new(to: usize, line: usize, meters: u32, secs: u32) -> Self {
        Self {
            to,
            line,
            meters,
            secs,
        }
    }
}
