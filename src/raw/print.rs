//! Text rendering of a tree's shape, for debugging.

use alloc::format;
use alloc::string::String;

use super::arena::Arena;
use super::handle::Link;
use super::node::{BinaryNode, Dir};

/// Renders the subtree at `root` under a `title` line.
///
/// Every node is printed on its own line by `label`. A node with at least one child is
/// followed by a `←` line for its left child and a `→` line for its right child, indented
/// one level deeper; a missing child prints as `∅`.
///
/// ```text
/// AvlTreeMap
/// 20 h=2 s=3
/// ← 10 h=1 s=1
/// → 30 h=1 s=1
/// ```
pub(crate) fn render<N, F>(nodes: &Arena<N>, root: Link, title: &str, label: F) -> String
where
    N: BinaryNode,
    F: Fn(&N) -> String,
{
    let mut out = String::from(title);
    out.push('\n');
    subtree(nodes, root, "", &label, &mut out);
    out
}

fn subtree<N, F>(nodes: &Arena<N>, link: Link, tab: &str, label: &F, out: &mut String)
where
    N: BinaryNode,
    F: Fn(&N) -> String,
{
    let Some(handle) = link else {
        out.push('∅');
        return;
    };
    let node = nodes.get(handle);
    out.push_str(&label(node));

    let children = node.children();
    if children[Dir::Left].is_none() && children[Dir::Right].is_none() {
        return;
    }
    let inner = format!("{tab}  ");
    for (dir, arrow) in [(Dir::Left, "← "), (Dir::Right, "→ ")] {
        out.push('\n');
        out.push_str(tab);
        out.push_str(arrow);
        subtree(nodes, children[dir], &inner, label, out);
    }
}
