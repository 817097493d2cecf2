// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Address-space traversal.
//!
//! Collects every node reachable from a root by repeatedly expanding the
//! direct children of visited nodes, up to a hard count bound.
//!
//! The work list is popped from the end by default, so the walk is
//! depth-first-like with the last sibling returned by the server visited
//! first. Nodes reachable through several parents are visited once per path
//! unless [`VisitPolicy::Deduplicate`] is selected.
//!
//! # Example
//!
//! ```rust,ignore
//! use opcscope_opcua::traverse::{traverse, TraversalOptions};
//! use opcscope_opcua::types::NodeId;
//!
//! let report = traverse(&transport, &NodeId::OBJECTS_FOLDER, &TraversalOptions::default()).await?;
//! println!("we found {} nodes in {:?}", report.count(), report.elapsed);
//! ```

use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize, Serializer};

use crate::client::{OpcUaTransport, ScopedConnection};
use crate::error::{ConfigurationError, OpcUaError, OpcUaResult};
use crate::types::NodeId;

/// Default upper bound on collected nodes.
pub const DEFAULT_MAX_COUNT: usize = 500_000;

/// Default number of nodes shown in a report preview.
pub const DEFAULT_PREVIEW: usize = 10;

/// Upper bound on the capacity reserved up front for results.
const INITIAL_CAPACITY_CAP: usize = 1024;

// =============================================================================
// Policies
// =============================================================================

/// Which end of the work list the next node is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkListOrder {
    /// Take from the end (last pushed, first visited).
    #[default]
    Stack,

    /// Take from the front (breadth-first).
    Queue,
}

impl fmt::Display for WorkListOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stack => write!(f, "stack"),
            Self::Queue => write!(f, "queue"),
        }
    }
}

impl FromStr for WorkListOrder {
    type Err = OpcUaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stack" | "dfs" | "depth" => Ok(Self::Stack),
            "queue" | "bfs" | "breadth" => Ok(Self::Queue),
            _ => Err(OpcUaError::configuration(ConfigurationError::invalid_value(
                "order",
                s,
                "expected stack or queue",
            ))),
        }
    }
}

/// Whether a node reached through several paths is visited more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VisitPolicy {
    /// Visit a node every time it is popped.
    #[default]
    AllowRevisit,

    /// Skip nodes that were already visited.
    Deduplicate,
}

impl VisitPolicy {
    /// Returns `true` for [`VisitPolicy::Deduplicate`].
    pub fn deduplicates(&self) -> bool {
        matches!(self, Self::Deduplicate)
    }
}

// =============================================================================
// TraversalOptions
// =============================================================================

/// Knobs for a traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraversalOptions {
    /// Maximum number of nodes to collect.
    pub max_count: usize,

    /// Work list removal order.
    pub order: WorkListOrder,

    /// Revisit policy.
    pub visit: VisitPolicy,
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self {
            max_count: DEFAULT_MAX_COUNT,
            order: WorkListOrder::default(),
            visit: VisitPolicy::default(),
        }
    }
}

impl TraversalOptions {
    /// Options with the given bound and default policies.
    pub fn with_max_count(max_count: usize) -> Self {
        Self {
            max_count,
            ..Default::default()
        }
    }

    /// Sets the work list order.
    pub fn order(mut self, order: WorkListOrder) -> Self {
        self.order = order;
        self
    }

    /// Sets the revisit policy.
    pub fn visit(mut self, visit: VisitPolicy) -> Self {
        self.visit = visit;
        self
    }
}

// =============================================================================
// WorkList
// =============================================================================

struct WorkList {
    items: VecDeque<NodeId>,
    order: WorkListOrder,
}

impl WorkList {
    fn new(root: NodeId, order: WorkListOrder) -> Self {
        let mut items = VecDeque::new();
        items.push_back(root);
        Self { items, order }
    }

    fn take(&mut self) -> Option<NodeId> {
        match self.order {
            WorkListOrder::Stack => self.items.pop_back(),
            WorkListOrder::Queue => self.items.pop_front(),
        }
    }

    fn extend(&mut self, children: Vec<NodeId>) {
        self.items.extend(children);
    }
}

// =============================================================================
// Collection
// =============================================================================

/// Collects up to `max_count` nodes under `root` using the default policies.
///
/// The root itself is the first element. Any transport error aborts the walk
/// and is returned unchanged; nothing collected so far is returned.
pub async fn collect_all_under<T>(
    client: &T,
    root: &NodeId,
    max_count: usize,
) -> OpcUaResult<Vec<NodeId>>
where
    T: OpcUaTransport + ?Sized,
{
    collect_with(client, root, &TraversalOptions::with_max_count(max_count)).await
}

/// Collects nodes under `root` with explicit options.
pub async fn collect_with<T>(
    client: &T,
    root: &NodeId,
    options: &TraversalOptions,
) -> OpcUaResult<Vec<NodeId>>
where
    T: OpcUaTransport + ?Sized,
{
    let max_count = options.max_count;
    if max_count == 0 {
        return Ok(Vec::new());
    }

    let mut work = WorkList::new(root.clone(), options.order);
    let mut result = Vec::with_capacity(max_count.min(INITIAL_CAPACITY_CAP));
    let mut seen: HashSet<NodeId> = HashSet::new();

    while result.len() < max_count {
        let Some(node) = work.take() else {
            break;
        };

        if options.visit.deduplicates() && !seen.insert(node.clone()) {
            continue;
        }

        tracing::trace!(node_id = %node, visited = result.len(), "Visiting node");

        let children = client.children(&node).await?;
        result.push(node);
        work.extend(children);
    }

    Ok(result)
}

// =============================================================================
// TraversalReport
// =============================================================================

/// Timed outcome of a traversal.
#[derive(Debug, Clone, Serialize)]
pub struct TraversalReport {
    /// Root the walk started from.
    pub root: NodeId,

    /// Collected nodes in visit order.
    pub nodes: Vec<NodeId>,

    /// Wall-clock duration of the walk.
    #[serde(rename = "elapsed_secs", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
}

impl TraversalReport {
    /// Number of collected nodes.
    pub fn count(&self) -> usize {
        self.nodes.len()
    }

    /// Collected nodes per second of elapsed time, `0.0` if no time elapsed.
    pub fn nodes_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.count() as f64 / secs
        } else {
            0.0
        }
    }

    /// The first `n` collected nodes.
    pub fn preview(&self, n: usize) -> &[NodeId] {
        &self.nodes[..n.min(self.nodes.len())]
    }
}

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

/// Runs a timed traversal on an already-connected client.
pub async fn traverse<T>(
    client: &T,
    root: &NodeId,
    options: &TraversalOptions,
) -> OpcUaResult<TraversalReport>
where
    T: OpcUaTransport + ?Sized,
{
    tracing::debug!(
        root = %root,
        max_count = options.max_count,
        order = %options.order,
        visit = ?options.visit,
        "Starting traversal"
    );

    let started = Instant::now();
    let nodes = collect_with(client, root, options).await?;
    let elapsed = started.elapsed();

    tracing::debug!(root = %root, count = nodes.len(), elapsed = ?elapsed, "Traversal finished");

    Ok(TraversalReport {
        root: root.clone(),
        nodes,
        elapsed,
    })
}

/// Connects `transport`, traverses, and disconnects.
pub async fn run_scoped<T>(
    transport: T,
    root: NodeId,
    options: TraversalOptions,
    deadline: Option<Duration>,
) -> OpcUaResult<TraversalReport>
where
    T: OpcUaTransport + 'static,
{
    let mut scope = ScopedConnection::new(transport).with_optional_deadline(deadline);
    scope
        .run(move |client| Box::pin(async move { traverse(client, &root, &options).await }))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryTransport;

    fn n(name: &str) -> NodeId {
        NodeId::string(2, name)
    }

    fn small_tree() -> MemoryTransport {
        MemoryTransport::new()
            .with_children(n("R"), vec![n("A"), n("B")])
            .with_children(n("B"), vec![n("C")])
    }

    #[tokio::test]
    async fn test_stack_order() {
        let client = small_tree();
        let nodes = collect_all_under(&client, &n("R"), DEFAULT_MAX_COUNT).await.unwrap();
        assert_eq!(nodes, vec![n("R"), n("B"), n("C"), n("A")]);
        assert_eq!(client.browse_calls(), 4);
    }

    #[tokio::test]
    async fn test_queue_order() {
        let client = small_tree();
        let options = TraversalOptions::default().order(WorkListOrder::Queue);
        let nodes = collect_with(&client, &n("R"), &options).await.unwrap();
        assert_eq!(nodes, vec![n("R"), n("A"), n("B"), n("C")]);
    }

    #[tokio::test]
    async fn test_zero_max_count_makes_no_calls() {
        let client = small_tree();
        let nodes = collect_all_under(&client, &n("R"), 0).await.unwrap();
        assert!(nodes.is_empty());
        assert_eq!(client.browse_calls(), 0);
    }

    #[tokio::test]
    async fn test_leaf_root() {
        let client = MemoryTransport::new();
        let nodes = collect_all_under(&client, &n("leaf"), 10).await.unwrap();
        assert_eq!(nodes, vec![n("leaf")]);
        assert_eq!(client.browse_calls(), 1);
    }

    #[tokio::test]
    async fn test_bound_is_respected() {
        let client = small_tree();
        let nodes = collect_all_under(&client, &n("R"), 2).await.unwrap();
        assert_eq!(nodes, vec![n("R"), n("B")]);
        assert_eq!(client.browse_calls(), 2);
    }

    #[tokio::test]
    async fn test_cycle_fills_bound() {
        let client = MemoryTransport::new()
            .with_children(n("X"), vec![n("Y")])
            .with_children(n("Y"), vec![n("X")]);
        let nodes = collect_all_under(&client, &n("X"), 7).await.unwrap();
        assert_eq!(nodes.len(), 7);
    }

    #[tokio::test]
    async fn test_diamond_dedup() {
        let client = MemoryTransport::new()
            .with_children(n("R"), vec![n("A"), n("B")])
            .with_children(n("A"), vec![n("D")])
            .with_children(n("B"), vec![n("D")]);

        let revisit = collect_all_under(&client, &n("R"), 100).await.unwrap();
        assert_eq!(revisit.iter().filter(|id| **id == n("D")).count(), 2);

        let options = TraversalOptions::default().visit(VisitPolicy::Deduplicate);
        let dedup = collect_with(&client, &n("R"), &options).await.unwrap();
        assert_eq!(dedup, vec![n("R"), n("B"), n("D"), n("A")]);
    }

    #[tokio::test]
    async fn test_error_aborts() {
        let client = small_tree().with_browse_failure(n("B"));
        let err = collect_all_under(&client, &n("R"), 100).await.unwrap_err();
        assert!(matches!(err, OpcUaError::Browse(_)));
    }

    #[tokio::test]
    async fn test_report() {
        let client = small_tree();
        let report = traverse(&client, &n("R"), &TraversalOptions::default()).await.unwrap();
        assert_eq!(report.count(), 4);
        assert_eq!(report.preview(2), &[n("R"), n("B")]);
        assert_eq!(report.preview(50).len(), 4);
    }

    #[test]
    fn test_rate_with_zero_elapsed() {
        let report = TraversalReport {
            root: n("R"),
            nodes: vec![n("R")],
            elapsed: Duration::ZERO,
        };
        assert_eq!(report.nodes_per_second(), 0.0);

        let report = TraversalReport {
            elapsed: Duration::from_millis(500),
            ..report
        };
        assert!((report.nodes_per_second() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_order_parse() {
        assert_eq!("stack".parse::<WorkListOrder>().unwrap(), WorkListOrder::Stack);
        assert_eq!("BFS".parse::<WorkListOrder>().unwrap(), WorkListOrder::Queue);
        assert!("sideways".parse::<WorkListOrder>().is_err());
    }

    #[tokio::test]
    async fn test_run_scoped_disconnects() {
        let client = small_tree();
        let handle = client.clone();
        let report = run_scoped(client, n("R"), TraversalOptions::default(), None)
            .await
            .unwrap();
        assert_eq!(report.count(), 4);
        assert_eq!(handle.disconnects(), 1);
    }
}
