//! Graphviz export for diagnostics.
//!
//! One rank of pre-root name nodes on the left, one rank per variable
//! level, one rank of terminals on the right. Edges are labeled `0` (low)
//! and `1` (high). Store iteration order is unspecified, so everything is
//! emitted in sorted order (root name; variable index, then slot index) to
//! keep the output stable between runs.

use std::fmt;
use std::io;
use std::path::Path;

use crate::mtbdd::MtBdd;
use crate::types::{NodeId, SINK_VALUE};

impl MtBdd {
    pub fn to_dot(&self) -> Result<String, fmt::Error> {
        let mut dot = String::new();
        self.write_dot(&mut dot)?;
        Ok(dot)
    }

    pub fn save_as_dot(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let dot = self
            .to_dot()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        std::fs::write(path, dot)
    }

    pub fn print_as_dot(&self) {
        let mut dot = String::new();
        self.write_dot(&mut dot).expect("writing to a String does not fail");
        print!("{}", dot);
    }

    fn write_dot(&self, w: &mut impl fmt::Write) -> fmt::Result {
        // Group nodes by variable level, terminals last; slot order within
        // a level is already ascending.
        let mut levels: Vec<Vec<NodeId>> = vec![Vec::new(); self.num_vars()];
        let mut terminals: Vec<NodeId> = Vec::new();
        for id in self.node_ids() {
            let node = self.node(id);
            if node.is_terminal() {
                terminals.push(id);
            } else {
                levels[node.var as usize].push(id);
            }
        }

        let mut roots: Vec<_> = self.roots().collect();
        roots.sort();

        writeln!(w, "digraph Mtbdd {{")?;
        writeln!(w, "  rankdir=LR;")?;

        writeln!(w, "  node [shape=circle];")?;
        writeln!(w, "  // Pre-root nodes")?;
        write!(w, "  {{ rank=same; ")?;
        for &(name, _) in &roots {
            if name == SINK_VALUE {
                write!(w, "s{} [label=\"sink\"]; ", name)?;
            } else {
                write!(w, "s{} [label=\"{}\"]; ", name, name)?;
            }
        }
        writeln!(w, "}}")?;

        writeln!(w, "  node [shape=box];")?;
        for (var, level) in levels.iter().enumerate() {
            writeln!(w, "  // Level {}", var)?;
            write!(w, "  {{ rank=same; ")?;
            for &id in level {
                write!(w, "n{} [label=\"Var {}\"]; ", id.index(), var)?;
            }
            writeln!(w, "}}")?;
        }

        writeln!(w, "  node [shape=doublecircle];")?;
        writeln!(w, "  // Terminal nodes")?;
        write!(w, "  {{ rank=same; ")?;
        for &id in &terminals {
            let value = self.node(id).value;
            if value == SINK_VALUE {
                write!(w, "n{} [label=\"sink\"]; ", id.index())?;
            } else {
                write!(w, "n{} [label=\"{}\"]; ", id.index(), value)?;
            }
        }
        writeln!(w, "}}")?;

        writeln!(w, "  // Edges from pre-root nodes")?;
        for &(name, root) in &roots {
            writeln!(w, "  s{} -> n{};", name, root.index())?;
        }

        writeln!(w, "  // Edges between nodes")?;
        for id in self.node_ids() {
            let node = self.node(id);
            if let Some(low) = node.low {
                writeln!(w, "  n{} -> n{} [label=\"0\"];", id.index(), low.index())?;
            }
            if let Some(high) = node.high {
                writeln!(w, "  n{} -> n{} [label=\"1\"];", id.index(), high.index())?;
            }
        }

        writeln!(w, "}}")
    }
}
