// src/formatting/walker.rs
//! Depth-first flattening of a block forest into markdown lines.
//!
//! The walk keeps an explicit stack of sibling frames instead of recursing, so
//! depth is plain data: children of a block are pushed as a new frame one level
//! deeper and drained before the parent's remaining siblings.

use super::markdown::{render_block, NumberingPolicy};
use crate::api::{list_all_children, NotionRepository};
use crate::constants::NOTION_MAX_FETCH_DEPTH;
use crate::error::FetchError;
use crate::model::{Block, BlockKind};
use crate::types::{BlockId, NotionId};
use std::collections::HashSet;

/// Tunables for a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkOptions {
    pub numbering: NumberingPolicy,
    /// Children of blocks at this depth or deeper are not fetched.
    pub max_depth: usize,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            numbering: NumberingPolicy::default(),
            max_depth: NOTION_MAX_FETCH_DEPTH,
        }
    }
}

/// Rendered lines plus what happened along the way.
#[derive(Debug, Default)]
pub struct WalkReport {
    pub lines: Vec<String>,
    pub blocks_visited: usize,
    /// Child listings that failed; their subtrees contributed no lines.
    pub fetch_failures: Vec<FetchError>,
    /// Subtrees left unexpanded because of the depth limit.
    pub truncated_subtrees: usize,
}

impl WalkReport {
    /// Lines joined with newlines and trimmed.
    pub fn full_text(&self) -> String {
        self.lines.join("\n").trim().to_string()
    }
}

/// Remaining siblings at one level of the tree.
struct Frame {
    blocks: std::vec::IntoIter<Block>,
    depth: usize,
    numbered_run: usize,
}

impl Frame {
    fn new(blocks: Vec<Block>, depth: usize) -> Self {
        Self {
            blocks: blocks.into_iter(),
            depth,
            numbered_run: 0,
        }
    }

    /// Position of `kind` within the current run of numbered siblings.
    fn ordinal_for(&mut self, kind: &BlockKind) -> usize {
        if *kind == BlockKind::NumberedListItem {
            self.numbered_run += 1;
        } else {
            self.numbered_run = 0;
        }
        self.numbered_run
    }
}

/// Walks `roots` and everything beneath them in pre-order.
pub async fn walk_blocks(
    repo: &dyn NotionRepository,
    roots: Vec<Block>,
    options: &WalkOptions,
) -> WalkReport {
    let mut report = WalkReport::default();
    let mut expanded: HashSet<BlockId> = HashSet::new();
    let mut stack = vec![Frame::new(roots, 0)];

    loop {
        let Some(frame) = stack.last_mut() else {
            break;
        };
        let Some(block) = frame.blocks.next() else {
            stack.pop();
            continue;
        };
        let depth = frame.depth;
        let ordinal = frame.ordinal_for(&block.kind);

        report.blocks_visited += 1;
        report
            .lines
            .extend(render_block(&block, depth, ordinal, options.numbering));

        if !block.has_children {
            continue;
        }
        if depth >= options.max_depth {
            log::warn!(
                "Not expanding block {} at depth {}: depth limit {} reached",
                block.id,
                depth,
                options.max_depth
            );
            report.truncated_subtrees += 1;
            continue;
        }
        if !expanded.insert(block.id.clone()) {
            log::warn!("Block {} was already expanded; skipping its children", block.id);
            continue;
        }

        let children = list_all_children(repo, &NotionId::from(&block.id)).await;
        if let Some(failure) = children.failure {
            log::warn!("Subtree of block {} dropped: {}", block.id, failure);
            report.fetch_failures.push(failure);
            continue;
        }
        if !children.items.is_empty() {
            stack.push(Frame::new(children.items, depth + 1));
        }
    }

    log::debug!(
        "Walked {} block(s) into {} line(s)",
        report.blocks_visited,
        report.lines.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeNotion;
    use pretty_assertions::assert_eq;

    fn para(text: &str) -> Block {
        Block::text(BlockId::new_v4(), BlockKind::Paragraph, text)
    }

    fn numbered(text: &str) -> Block {
        Block::text(BlockId::new_v4(), BlockKind::NumberedListItem, text)
    }

    #[tokio::test]
    async fn children_come_before_following_siblings() {
        let a = para("A").with_children(true);
        let b = para("B");
        let c = para("C");
        let repo = FakeNotion::new().with_children(&a.id, vec![b]);

        let report = walk_blocks(&repo, vec![a, c], &WalkOptions::default()).await;

        assert_eq!(report.lines, vec!["A", "  B", "C"]);
        assert_eq!(report.blocks_visited, 3);
    }

    #[tokio::test]
    async fn leaf_blocks_never_fetch_children() {
        let repo = FakeNotion::new();
        let report = walk_blocks(
            &repo,
            vec![para("one"), para("two")],
            &WalkOptions::default(),
        )
        .await;

        assert_eq!(report.lines.len(), 2);
        assert_eq!(repo.children_fetches(), 0);
    }

    #[tokio::test]
    async fn nested_code_stays_unindented() {
        let item = Block::text(BlockId::new_v4(), BlockKind::BulletedListItem, "step")
            .with_children(true);
        let code = Block::code(BlockId::new_v4(), "sh", "make");
        let repo = FakeNotion::new().with_children(&item.id, vec![code]);

        let report = walk_blocks(&repo, vec![item], &WalkOptions::default()).await;

        assert_eq!(report.lines, vec!["- step", "", "```sh", "make", "```", ""]);
    }

    #[tokio::test]
    async fn failed_child_listing_drops_only_that_subtree() {
        let a = para("A").with_children(true);
        let b = para("B");
        let repo = FakeNotion::new().failing_children(&a.id);

        let report = walk_blocks(&repo, vec![a, b], &WalkOptions::default()).await;

        assert_eq!(report.lines, vec!["A", "B"]);
        assert_eq!(report.fetch_failures.len(), 1);
    }

    #[tokio::test]
    async fn depth_limit_stops_expansion() {
        let root = para("root").with_children(true);
        let child = para("child").with_children(true);
        let grandchild = para("grandchild");
        let repo = FakeNotion::new()
            .with_children(&root.id, vec![child.clone()])
            .with_children(&child.id, vec![grandchild]);
        let options = WalkOptions {
            max_depth: 1,
            ..WalkOptions::default()
        };

        let report = walk_blocks(&repo, vec![root], &options).await;

        assert_eq!(report.lines, vec!["root", "  child"]);
        assert_eq!(report.truncated_subtrees, 1);
        assert_eq!(repo.children_fetches(), 1);
    }

    #[tokio::test]
    async fn cyclic_tree_terminates() {
        let looping = para("loop").with_children(true);
        let repo = FakeNotion::new().with_children(&looping.id, vec![looping.clone()]);

        let report = walk_blocks(&repo, vec![looping], &WalkOptions::default()).await;

        assert_eq!(report.lines, vec!["loop", "  loop"]);
        assert_eq!(repo.children_fetches(), 1);
    }

    #[tokio::test]
    async fn sequential_numbering_restarts_after_other_blocks() {
        let roots = vec![
            numbered("a"),
            numbered("b"),
            para("break"),
            numbered("c"),
        ];
        let options = WalkOptions {
            numbering: NumberingPolicy::Sequential,
            ..WalkOptions::default()
        };

        let report = walk_blocks(&FakeNotion::new(), roots.clone(), &options).await;
        assert_eq!(report.lines, vec!["1. a", "2. b", "break", "1. c"]);

        let literal = walk_blocks(&FakeNotion::new(), roots, &WalkOptions::default()).await;
        assert_eq!(literal.lines, vec!["1. a", "1. b", "break", "1. c"]);
    }

    #[tokio::test]
    async fn children_listing_spans_pages() {
        let parent = para("parent").with_children(true);
        let children: Vec<Block> = (0..250).map(|i| para(&format!("item {}", i))).collect();
        let repo = FakeNotion::new().with_children(&parent.id, children);

        let report = walk_blocks(&repo, vec![parent], &WalkOptions::default()).await;

        assert_eq!(report.lines.len(), 251);
        assert_eq!(report.lines[250], "  item 249");
        assert_eq!(repo.children_fetches(), 3);
    }

    #[tokio::test]
    async fn non_code_lines_never_exceed_text_bearing_blocks() {
        let parent = Block::new(BlockId::new_v4(), BlockKind::parse("column_list"))
            .with_children(true);
        let kids = vec![
            para("x"),
            Block::new(BlockId::new_v4(), BlockKind::parse("divider")),
            Block::new(BlockId::new_v4(), BlockKind::Paragraph).with_runs(vec![]),
            Block::text(BlockId::new_v4(), BlockKind::Heading(1), "y"),
        ];
        let text_bearing = kids.iter().filter(|b| b.is_text_bearing()).count();
        let repo = FakeNotion::new().with_children(&parent.id, kids);

        let report = walk_blocks(&repo, vec![parent], &WalkOptions::default()).await;

        assert!(report.lines.len() <= text_bearing);
        assert_eq!(report.lines, vec!["  x", "  # y"]);
    }
}
