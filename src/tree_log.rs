//! Debug rendering of tree shape.
//!
//! Rendering is a diagnostic hook only; it never restructures the tree and
//! walks it with an explicit stack, so a degenerate tree of any depth can be
//! drawn.

use alloc::string::String;
use alloc::vec::Vec;

use crate::raw::{Handle, RawSplayTree};

/// The glyphs used to draw a tree, one line per node in ascending order.
///
/// Lesser subtrees are drawn above their parent and greater subtrees below.
///
/// # Examples
///
/// ```
/// use splay_collections::{Charmap, SortedSet};
///
/// let set = SortedSet::from([1, 2, 3]);
/// assert_eq!(set.log(&Charmap::ASCII, |v| v.to_string()), ["  .-- 1", ".-+ 2", "+ 3"]);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Charmap {
    /// A node with both children.
    pub intersection: &'static str,
    /// A leaf, and the horizontal run into a child's branch.
    pub through: &'static str,
    /// A node with only a lesser child (drawn above it).
    pub branch_up: &'static str,
    /// A node with only a greater child (drawn below it).
    pub branch_down: &'static str,
    /// The corner joining a lesser child to the vertical line below it.
    pub from_below: &'static str,
    /// The corner joining a greater child to the vertical line above it.
    pub from_above: &'static str,
    /// The vertical line between a node and a distant child.
    pub strafe: &'static str,
}

impl Charmap {
    /// Plain ASCII glyphs.
    pub const ASCII: Charmap = Charmap {
        intersection: "+",
        through: "-",
        branch_up: "+",
        branch_down: "+",
        from_below: ".",
        from_above: "'",
        strafe: "|",
    };

    /// Box-drawing glyphs with rounded corners.
    pub const UNICODE_ROUND: Charmap = Charmap {
        intersection: "┼",
        through: "─",
        branch_up: "┴",
        branch_down: "┬",
        from_below: "╭",
        from_above: "╰",
        strafe: "│",
    };

    /// Box-drawing glyphs with square corners.
    pub const UNICODE_SHARP: Charmap = Charmap {
        intersection: "┼",
        through: "─",
        branch_up: "┴",
        branch_down: "┬",
        from_below: "┌",
        from_above: "└",
        strafe: "│",
    };
}

impl Default for Charmap {
    fn default() -> Self {
        Charmap::UNICODE_ROUND
    }
}

#[derive(Clone, Copy, Eq, PartialEq)]
enum Side {
    Root,
    Lesser,
    Greater,
}

impl Charmap {
    /// The two columns a node draws in front of its own label.
    fn lead(&self, side: Side) -> (&'static str, &'static str) {
        match side {
            Side::Root => ("", ""),
            Side::Lesser => (self.from_below, self.through),
            Side::Greater => (self.from_above, self.through),
        }
    }

    /// The two columns a node on `side` of its parent contributes in front
    /// of every line drawn for its `child` subtree.
    fn gutter(&self, side: Side, child: Side) -> &'static str {
        match (side, child) {
            (Side::Root, _) => "",
            (Side::Lesser, Side::Lesser) | (Side::Greater, Side::Greater) => "  ",
            _ => self.strafe,
        }
    }

    fn pad(&self, side: Side, child: Side) -> &'static str {
        if self.gutter(side, child) == self.strafe { " " } else { "" }
    }
}

/// The lines drawn for one node by a custom label.
///
/// Lines passed to [`write`](NodeLines::write) hang from the node's branch,
/// the first on the branch itself and the rest below it. Lines passed to
/// [`write_above`](NodeLines::write_above) are drawn just above the branch.
/// A node that writes nothing is drawn with an empty label.
///
/// # Examples
///
/// ```
/// use splay_collections::{Charmap, SortedSet};
///
/// let mut set = SortedSet::from([1, 2, 3]);
/// set.contains(&2);
/// let drawn = set.log_with(&Charmap::ASCII, |value, out| {
///     out.write(value.to_string());
///     out.write(format!("#{value}"));
/// });
/// assert_eq!(drawn, [".-- 1", "|   #1", "+ 2", "| #2", "'-- 3", "    #3"]);
/// ```
#[derive(Debug, Default)]
pub struct NodeLines {
    lines: Vec<(Placement, String)>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Placement {
    Above,
    Branch,
}

impl NodeLines {
    /// Draws a line on the node's branch, or below it after the first.
    pub fn write(&mut self, line: impl Into<String>) {
        self.lines.push((Placement::Branch, line.into()));
    }

    /// Draws a line above the node's branch.
    pub fn write_above(&mut self, line: impl Into<String>) {
        self.lines.push((Placement::Above, line.into()));
    }
}

/// Draws every element of `tree` in ascending order, each with the lines
/// `label` writes for it.
pub(crate) fn lines<T, F>(tree: &RawSplayTree<T>, charmap: &Charmap, mut label: F) -> Vec<String>
where
    F: FnMut(&T, &mut NodeLines),
{
    let mut lines = Vec::with_capacity(tree.len());
    let mut stack: Vec<(Handle, Side, String)> = Vec::new();
    let mut cursor = tree.root_handle().map(|h| (h, Side::Root, String::new()));

    loop {
        while let Some((handle, side, prefix)) = cursor.take() {
            cursor = tree.node(handle).left.map(|left| (left, Side::Lesser, indent(charmap, &prefix, side, Side::Lesser)));
            stack.push((handle, side, prefix));
        }
        let Some((handle, side, prefix)) = stack.pop() else {
            break;
        };

        let node = tree.node(handle);
        let branch = match (node.left.is_some(), node.right.is_some()) {
            (true, true) => charmap.intersection,
            (true, false) => charmap.branch_up,
            (false, true) => charmap.branch_down,
            (false, false) => charmap.through,
        };
        let (corner, run) = charmap.lead(side);

        let mut drawn = NodeLines::default();
        label(&node.value, &mut drawn);
        if !drawn.lines.iter().any(|(placement, _)| *placement == Placement::Branch) {
            drawn.write(String::new());
        }

        let mut on_branch = true;
        for (placement, text) in drawn.lines {
            let mut line = match placement {
                Placement::Above => {
                    let mut line = indent(charmap, &prefix, side, Side::Lesser);
                    line.push_str(if node.left.is_some() { charmap.strafe } else { " " });
                    line
                }
                Placement::Branch if on_branch => {
                    on_branch = false;
                    let mut line = prefix.clone();
                    for part in [corner, run, branch] {
                        line.push_str(part);
                    }
                    line
                }
                Placement::Branch => {
                    let mut line = indent(charmap, &prefix, side, Side::Greater);
                    line.push_str(if node.right.is_some() { charmap.strafe } else { " " });
                    line
                }
            };
            line.push(' ');
            line.push_str(&text);
            lines.push(line);
        }

        cursor = node.right.map(|right| (right, Side::Greater, indent(charmap, &prefix, side, Side::Greater)));
    }
    lines
}

fn indent(charmap: &Charmap, prefix: &str, side: Side, child: Side) -> String {
    let mut indent = String::from(prefix);
    indent.push_str(charmap.gutter(side, child));
    indent.push_str(charmap.pad(side, child));
    indent
}

/// Renders `tree` as nested `(value <size lesser, greater)` groups.
pub(crate) fn summary<T, F>(tree: &RawSplayTree<T>, mut label: F) -> String
where
    F: FnMut(&T) -> String,
{
    enum Task {
        Node(Option<Handle>),
        Text(&'static str),
    }

    let mut out = String::new();
    let mut tasks = alloc::vec![Task::Node(tree.root_handle())];
    while let Some(task) = tasks.pop() {
        match task {
            Task::Text(text) => out.push_str(text),
            Task::Node(None) => out.push_str("()"),
            Task::Node(Some(handle)) => {
                let node = tree.node(handle);
                out.push('(');
                out.push_str(&label(&node.value));
                out.push_str(" <");
                out.push_str(&alloc::format!("{}", node.size));
                if node.is_leaf() {
                    out.push(')');
                } else {
                    out.push(' ');
                    tasks.push(Task::Text(")"));
                    tasks.push(Task::Node(node.right));
                    tasks.push(Task::Text(", "));
                    tasks.push(Task::Node(node.left));
                }
            }
        }
    }
    out
}
