//! Graphviz rendering of the level structure, for debugging.
//!
//! Each node is a record with one port per level, drawn left to right in
//! rank order. Every link is an edge labelled with its width.

use std::fmt;
use std::fmt::Write;

use rustc_hash::FxHashMap;

use super::SkipList;
use super::node::HEAD;
use super::node::Idx;
use super::node::NIL;

impl<T: fmt::Display, C> SkipList<T, C> {
    /// Write a Graphviz `digraph` of the list to `out`.
    pub fn write_dot<W: Write>(&self, out: &mut W) -> fmt::Result {
        let mut names: FxHashMap<Idx, String> = FxHashMap::default();
        names.insert(HEAD, "head".to_string());
        let mut order = vec![HEAD];

        writeln!(out, "digraph skiplist {{")?;
        writeln!(out, "    rankdir=LR;")?;
        writeln!(out, "    node [shape=record];")?;

        write_node(out, "head", self.arena.head().height(), "head")?;
        let mut idx = self.arena.head().next(0);
        let mut rank = 0usize;
        // Bounded so a corrupted, cyclic list still renders.
        while let Some(value) = self.arena.value(idx).filter(|_| rank < self.arena.slots()) {
            let name = format!("n{}", rank);
            write_node(out, &name, self.arena.node(idx).height(), &escape(&value.to_string()))?;
            names.insert(idx, name);
            order.push(idx);
            idx = self.arena.node(idx).next(0);
            rank += 1;
        }
        writeln!(out, "    end [label=\"end\"];")?;

        for idx in order {
            let Some(name) = names.get(&idx) else {
                continue;
            };
            for (level, link) in self.arena.node(idx).links.iter().enumerate() {
                match names.get(&link.next) {
                    Some(target) => writeln!(
                        out,
                        "    {}:l{} -> {}:l{} [label=\"{}\"];",
                        name, level, target, level, link.width
                    )?,
                    None if link.next == NIL => writeln!(
                        out,
                        "    {}:l{} -> end [label=\"{}\"];",
                        name, level, link.width
                    )?,
                    None => writeln!(
                        out,
                        "    {}:l{} -> dangling{} [label=\"{}\", color=red];",
                        name, level, link.next, link.width
                    )?,
                }
            }
        }

        writeln!(out, "}}")
    }

    /// The Graphviz source of [`SkipList::write_dot`] as a string.
    pub fn dot_file(&self) -> String {
        let mut out = String::new();
        // Writing into a String never fails.
        let _ = self.write_dot(&mut out);
        out
    }
}

fn write_node<W: Write>(out: &mut W, name: &str, height: usize, label: &str) -> fmt::Result {
    write!(out, "    {} [label=\"", name)?;
    for level in (0..height).rev() {
        write!(out, "<l{}> {} | ", level, level)?;
    }
    writeln!(out, "{}\"];", label)
}

/// Escape the characters that are special inside a record label.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '{' | '}' | '|' | '<' | '>' | '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::Natural;
    use crate::height::HeightGenerator;

    #[test]
    fn empty_list() {
        let list: SkipList<i64> = SkipList::new();
        let dot = list.dot_file();
        assert!(dot.starts_with("digraph skiplist {\n"));
        assert!(dot.contains("head:l0 -> end [label=\"1\"];"));
        assert!(dot.ends_with("}\n"));
    }

    #[test]
    fn edges_carry_widths() {
        // Heights 2, 1, 2.
        let mut list = SkipList::with_height_generator(Natural, 8, HeightGenerator::scripted(&[1, 0, 0, 1, 0]));
        for v in [10i64, 20, 30] {
            list.insert(v).unwrap();
        }
        let dot = list.dot_file();
        assert!(dot.contains("n0 [label=\"<l1> 1 | <l0> 0 | 10\"];"));
        assert!(dot.contains("head:l1 -> n0:l1 [label=\"1\"];"));
        assert!(dot.contains("n0:l1 -> n2:l1 [label=\"2\"];"));
        assert!(dot.contains("n1:l0 -> n2:l0 [label=\"1\"];"));
        assert!(dot.contains("n2:l1 -> end [label=\"1\"];"));
        // Head edges come before any node's edges.
        let head_edge = dot.find("head:l0 ->").unwrap();
        let node_edge = dot.find("n0:l0 ->").unwrap();
        assert!(head_edge < node_edge);
    }

    #[test]
    fn labels_are_escaped() {
        assert_eq!(escape("a|b{c}"), "a\\|b\\{c\\}");
        assert_eq!(escape("plain"), "plain");
    }
}
