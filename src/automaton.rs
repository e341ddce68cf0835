use std::collections::VecDeque;

use crate::errors::*;
use crate::patterns::*;

/// Maximum number of substitution errors tolerated when matching adapters.
/// Only 0 (exact matching), 1, and 2 are supported; anything else is rejected
/// at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorBudget(u8);

impl ErrorBudget {
    pub const EXACT: ErrorBudget = ErrorBudget(0);

    pub fn new(errors: u8) -> Result<Self> {
        if errors > 2 {
            return Err(Error::ErrorBudget(errors));
        }
        Ok(Self(errors))
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }

    pub fn is_exact(self) -> bool {
        self.0 == 0
    }
}

pub(crate) type NodeId = u32;

pub(crate) const ROOT: NodeId = 0;

/// Marks a node as the end of a sub-segment of a pattern. `offset` is the
/// offset of the segment's last byte within the original, unsplit pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Checkpoint {
    pub pattern: usize,
    pub offset: usize,
}

#[derive(Debug)]
struct Node {
    children: Vec<(u8, NodeId)>,
    fail: NodeId,
    label: Option<ReadClass>,
    checkpoints: Vec<Checkpoint>,
}

impl Node {
    fn new() -> Self {
        Self {
            children: Vec::new(),
            fail: ROOT,
            label: None,
            checkpoints: Vec::new(),
        }
    }
}

/// Trie of pattern bytes with Aho-Corasick failure links, stored as an arena
/// of nodes addressed by index.
///
/// Built once from a [`PatternSet`], then immutable: scans never mutate the
/// automaton, so one instance can be shared by any number of concurrent
/// readers. The root's failure link points to itself and acts as the terminal
/// condition for every failure-chain walk.
#[derive(Debug)]
pub struct Automaton {
    nodes: Vec<Node>,
    patterns: PatternSet,
    errors: ErrorBudget,
}

impl Automaton {
    /// Builds the trie and computes failure links.
    ///
    /// With a nonzero error budget, adapter patterns are additionally split
    /// into segments inserted as independent paths from the root, each
    /// annotated with a [`Checkpoint`] used to seed approximate matching.
    pub fn build(patterns: PatternSet, errors: ErrorBudget) -> Self {
        let mut nodes = vec![Node::new()];

        for (id, pattern) in patterns.iter().enumerate() {
            if !errors.is_exact() && pattern.class == ReadClass::Adapter {
                insert_segmented(&mut nodes, id, pattern, errors.get());
            } else {
                let end = insert_path(&mut nodes, &pattern.bytes);
                // last writer wins when two patterns end at the same node
                nodes[end as usize].label = Some(pattern.class);
            }
        }

        add_failures(&mut nodes);

        tracing::debug!(
            nodes = nodes.len(),
            patterns = patterns.len(),
            "built matching automaton"
        );

        Self {
            nodes,
            patterns,
            errors,
        }
    }

    pub fn errors(&self) -> ErrorBudget {
        self.errors
    }

    pub fn pattern(&self, id: usize) -> &Pattern {
        self.patterns.get(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Advances one state by one byte: follow failure links until some state
    /// has a child on `byte` or the root is reached, then take that child if
    /// it exists.
    pub(crate) fn advance(&self, mut state: NodeId, byte: u8) -> NodeId {
        loop {
            if let Some(next) = child_of(&self.nodes, state, byte) {
                return next;
            }
            let fail = self.nodes[state as usize].fail;
            if fail == state {
                return state;
            }
            state = fail;
        }
    }

    pub(crate) fn fail(&self, state: NodeId) -> NodeId {
        self.nodes[state as usize].fail
    }

    pub(crate) fn label(&self, state: NodeId) -> Option<ReadClass> {
        self.nodes[state as usize].label
    }

    pub(crate) fn checkpoints(&self, state: NodeId) -> &[Checkpoint] {
        &self.nodes[state as usize].checkpoints
    }

    #[cfg(test)]
    pub(crate) fn node_at(&self, path: &[u8]) -> Option<NodeId> {
        let mut curr = ROOT;
        for &b in path {
            curr = child_of(&self.nodes, curr, b)?;
        }
        Some(curr)
    }
}

fn child_of(nodes: &[Node], state: NodeId, byte: u8) -> Option<NodeId> {
    nodes[state as usize]
        .children
        .iter()
        .find(|&&(b, _)| b == byte)
        .map(|&(_, id)| id)
}

fn insert_path(nodes: &mut Vec<Node>, bytes: &[u8]) -> NodeId {
    let mut curr = ROOT;
    for &b in bytes {
        curr = match child_of(nodes, curr, b) {
            Some(next) => next,
            None => {
                let id = nodes.len() as NodeId;
                nodes.push(Node::new());
                nodes[curr as usize].children.push((b, id));
                id
            }
        };
    }
    curr
}

/// Sub-pattern spans for approximate matching: one segment per tolerated
/// error plus one, split at fixed floor-division boundaries. Spans emptied by
/// the integer division (patterns shorter than the segment count) are
/// dropped.
pub(crate) fn segment_spans(len: usize, errors: usize) -> Vec<(usize, usize)> {
    let bounds = match errors {
        0 => vec![0, len],
        1 => vec![0, len / 2, len],
        _ => vec![0, len / 3, 2 * len / 3, len],
    };
    bounds
        .windows(2)
        .map(|w| (w[0], w[1]))
        .filter(|&(s, t)| s < t)
        .collect()
}

fn insert_segmented(nodes: &mut Vec<Node>, id: usize, pattern: &Pattern, errors: usize) {
    for (s, t) in segment_spans(pattern.bytes.len(), errors) {
        // each segment restarts from the root instead of extending the
        // previous segment's path
        let end = insert_path(nodes, &pattern.bytes[s..t]);
        nodes[end as usize].checkpoints.push(Checkpoint {
            pattern: id,
            offset: t - 1,
        });
        if t == pattern.bytes.len() {
            nodes[end as usize].label = Some(pattern.class);
        }
    }
}

/// Breadth-first failure-link propagation. A node's failure link is found by
/// walking its parent's failure chain to the first ancestor with a child on
/// the node's own edge byte; the root if none has one.
fn add_failures(nodes: &mut [Node]) {
    let mut queue = VecDeque::new();
    queue.push_back(ROOT);

    while let Some(curr) = queue.pop_front() {
        let edges = nodes[curr as usize].children.clone();

        for (byte, node) in edges {
            let mut fail = ROOT;
            if curr != ROOT {
                let mut ancestor = curr;
                loop {
                    ancestor = nodes[ancestor as usize].fail;
                    if let Some(next) = child_of(nodes, ancestor, byte) {
                        fail = next;
                        break;
                    }
                    if ancestor == ROOT {
                        break;
                    }
                }
            }
            nodes[node as usize].fail = fail;
            queue.push_back(node);
        }
    }
}
