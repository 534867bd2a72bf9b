//! Graph layout behind a swappable interface.
//!
//! Renderers only need node boxes in and positions out, so the layout
//! algorithm is a [`LayoutEngine`] trait object. [`LayeredLayout`] is the
//! built-in rank-based implementation:
//!
//! 1. Break cycles by reversing DFS back edges.
//! 2. Rank nodes by longest path (Kahn order).
//! 3. Split edges spanning several ranks with one virtual node per crossed
//!    rank, so long edges claim room in every rank they pass.
//! 4. Order nodes within ranks by barycenter sweeps, keeping the ordering
//!    with the fewest crossings.
//! 5. Assign coordinates, centring every rank on the widest one and
//!    widening rank gaps that carry edge labels.
//! 6. Route edges between node ports, through their virtual nodes.

use rustc_hash::FxHashMap;

use crate::markdown::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub id: String,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEdge {
    pub from: String,
    pub to: String,
    /// Label box `(width, height)`, if the edge is labelled.
    pub label: Option<(f64, f64)>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutInput {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    pub direction: Direction,
    /// Gap between consecutive ranks.
    pub rank_sep: f64,
    /// Gap between neighbours in one rank.
    pub node_sep: f64,
    /// Blank border around the drawing.
    pub margin: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            direction: Direction::TopToBottom,
            rank_sep: 56.0,
            node_sep: 36.0,
            margin: 24.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRoute {
    pub points: Vec<Point>,
    /// Label centre, for labelled edges.
    pub label: Option<Point>,
}

/// Absolute positions. `nodes` and `edges` follow input order.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOutput {
    pub width: f64,
    pub height: f64,
    /// Node centres.
    pub nodes: Vec<Point>,
    pub edges: Vec<EdgeRoute>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("graph has no nodes")]
    Empty,

    #[error("edge references unknown node `{0}`")]
    UnknownNode(String),

    #[error("node `{0}` has an invalid size")]
    InvalidSize(String),

    #[error("layout engine failed: {0}")]
    Engine(String),
}

/// Directed-graph layout algorithm.
pub trait LayoutEngine: Send + Sync {
    fn layout(&self, input: &LayoutInput, options: &LayoutOptions) -> Result<LayoutOutput, LayoutError>;
}

/// Rank-based layered layout.
#[derive(Debug, Clone, Copy)]
pub struct LayeredLayout {
    /// Upper bound on forward+backward barycenter sweeps.
    pub max_sweeps: usize,
}

impl Default for LayeredLayout {
    fn default() -> Self {
        Self { max_sweeps: 4 }
    }
}

impl LayoutEngine for LayeredLayout {
    fn layout(&self, input: &LayoutInput, options: &LayoutOptions) -> Result<LayoutOutput, LayoutError> {
        if input.nodes.is_empty() {
            return Err(LayoutError::Empty);
        }

        let mut index: FxHashMap<&str, usize> = FxHashMap::default();
        for (i, node) in input.nodes.iter().enumerate() {
            let valid = |v: f64| v.is_finite() && v >= 0.0;
            if !valid(node.width) || !valid(node.height) {
                return Err(LayoutError::InvalidSize(node.id.clone()));
            }
            index.entry(node.id.as_str()).or_insert(i);
        }

        let lookup = |id: &str| {
            index
                .get(id)
                .copied()
                .ok_or_else(|| LayoutError::UnknownNode(id.to_string()))
        };
        let edges = input
            .edges
            .iter()
            .map(|e| Ok((lookup(&e.from)?, lookup(&e.to)?)))
            .collect::<Result<Vec<_>, LayoutError>>()?;

        let graph = Graph::new(input.nodes.len(), &edges);
        let Expanded { graph, ranks, chains } = insert_virtual_nodes(&graph, &graph.ranks());
        let mut order = rank_buckets(&ranks);
        minimize_crossings(&mut order, &graph, self.max_sweeps);

        let mut boxes: Vec<Extent> = input
            .nodes
            .iter()
            .map(|n| Extent::of(n.width, n.height, options.direction))
            .collect();
        boxes.resize(graph.n, Extent { along: 0.0, across: 0.0 });
        let label_extents: Vec<Option<f64>> = input
            .edges
            .iter()
            .map(|e| e.label.map(|(w, h)| Extent::of(w, h, options.direction).along))
            .collect();

        let placed = assign_coordinates(&order, &ranks, &boxes, &edges, &label_extents, options);
        let routes = edges
            .iter()
            .zip(&input.edges)
            .map(|(&(u, v), edge)| {
                // Reversed back edges walk their chain backwards.
                let via: Vec<Point> = match (chains.get(&(u, v)), chains.get(&(v, u))) {
                    (Some(chain), _) => chain.iter().map(|&d| placed.centers[d]).collect(),
                    (None, Some(chain)) => chain.iter().rev().map(|&d| placed.centers[d]).collect(),
                    (None, None) => Vec::new(),
                };
                let points = route(u, v, &ranks, &placed.centers, &boxes, &via, options.direction);
                let label = edge.label.map(|_| label_anchor(&points));
                EdgeRoute { points, label }
            })
            .collect();

        let mut nodes = placed.centers;
        nodes.truncate(input.nodes.len());
        Ok(LayoutOutput {
            width: placed.width,
            height: placed.height,
            nodes,
            edges: routes,
        })
    }
}

// ============================================================================
// Ranking
// ============================================================================

/// Acyclic view of the input: back edges are reversed, self loops dropped.
struct Graph {
    n: usize,
    succ: Vec<Vec<usize>>,
    pred: Vec<Vec<usize>>,
}

impl Graph {
    fn new(n: usize, edges: &[(usize, usize)]) -> Self {
        let mut out: Vec<Vec<usize>> = vec![Vec::new(); n];
        for &(u, v) in edges {
            if u != v {
                out[u].push(v);
            }
        }
        let back = back_edges(n, &out);

        let mut succ = vec![Vec::new(); n];
        let mut pred = vec![Vec::new(); n];
        for &(u, v) in edges {
            if u == v {
                continue;
            }
            let (a, b) = if back.contains(&(u, v)) { (v, u) } else { (u, v) };
            if !succ[a].contains(&b) {
                succ[a].push(b);
                pred[b].push(a);
            }
        }
        Self { n, succ, pred }
    }

    /// Longest-path ranks in Kahn order. Sources are seeded in node order.
    fn ranks(&self) -> Vec<usize> {
        let mut in_degree: Vec<usize> = self.pred.iter().map(Vec::len).collect();
        let mut queue: Vec<usize> = (0..self.n).filter(|&v| in_degree[v] == 0).collect();
        let mut ranks = vec![0; self.n];

        let mut head = 0;
        while head < queue.len() {
            let u = queue[head];
            head += 1;
            for &v in &self.succ[u] {
                ranks[v] = ranks[v].max(ranks[u] + 1);
                in_degree[v] -= 1;
                if in_degree[v] == 0 {
                    queue.push(v);
                }
            }
        }
        ranks
    }
}

/// Edges closing a cycle during a depth-first walk in node order.
fn back_edges(n: usize, out: &[Vec<usize>]) -> Vec<(usize, usize)> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        New,
        Open,
        Done,
    }

    let mut mark = vec![Mark::New; n];
    let mut back = Vec::new();
    for root in 0..n {
        if mark[root] != Mark::New {
            continue;
        }
        mark[root] = Mark::Open;
        let mut stack = vec![(root, 0usize)];
        while let Some(top) = stack.last_mut() {
            let (u, next) = *top;
            if let Some(&v) = out[u].get(next) {
                top.1 += 1;
                match mark[v] {
                    Mark::New => {
                        mark[v] = Mark::Open;
                        stack.push((v, 0));
                    }
                    Mark::Open => back.push((u, v)),
                    Mark::Done => {}
                }
            } else {
                mark[u] = Mark::Done;
                stack.pop();
            }
        }
    }
    back
}

/// Acyclic graph with long edges split into chains of virtual nodes.
/// Virtual nodes are numbered after the real ones.
struct Expanded {
    graph: Graph,
    ranks: Vec<usize>,
    /// Virtual nodes of each split edge, keyed by its acyclic direction.
    chains: FxHashMap<(usize, usize), Vec<usize>>,
}

fn insert_virtual_nodes(graph: &Graph, ranks: &[usize]) -> Expanded {
    let mut ranks = ranks.to_vec();
    let mut succ: Vec<Vec<usize>> = vec![Vec::new(); graph.n];
    let mut chains = FxHashMap::default();

    for u in 0..graph.n {
        for &v in &graph.succ[u] {
            let mut prev = u;
            let mut chain = Vec::new();
            for r in ranks[u] + 1..ranks[v] {
                let virt = ranks.len();
                ranks.push(r);
                succ.push(Vec::new());
                succ[prev].push(virt);
                chain.push(virt);
                prev = virt;
            }
            succ[prev].push(v);
            if !chain.is_empty() {
                chains.insert((u, v), chain);
            }
        }
    }

    let n = ranks.len();
    let mut pred = vec![Vec::new(); n];
    for (u, targets) in succ.iter().enumerate() {
        for &v in targets {
            pred[v].push(u);
        }
    }
    Expanded {
        graph: Graph { n, succ, pred },
        ranks,
        chains,
    }
}

fn rank_buckets(ranks: &[usize]) -> Vec<Vec<usize>> {
    let max_rank = ranks.iter().copied().max().unwrap_or(0);
    let mut buckets = vec![Vec::new(); max_rank + 1];
    for (v, &r) in ranks.iter().enumerate() {
        buckets[r].push(v);
    }
    buckets
}

// ============================================================================
// Ordering
// ============================================================================

fn barycenter(prev_order: &[usize], neighbors: &[usize]) -> f64 {
    let positions: Vec<usize> = neighbors
        .iter()
        .filter_map(|nb| prev_order.iter().position(|x| x == nb))
        .collect();
    if positions.is_empty() {
        return f64::MAX;
    }
    positions.iter().sum::<usize>() as f64 / positions.len() as f64
}

/// Reorder rank `r` by the barycenters of its neighbours in `fixed`.
fn sweep(rank_order: &mut [Vec<usize>], r: usize, fixed: usize, neighbors: &[Vec<usize>]) {
    let reference = rank_order[fixed].clone();
    let current = &rank_order[r];
    let mut scored: Vec<(usize, f64, usize)> = current
        .iter()
        .enumerate()
        .map(|(pos, &v)| (v, barycenter(&reference, &neighbors[v]), pos))
        .collect();
    // Nodes without neighbours keep their relative position.
    scored.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.2.cmp(&b.2)));
    rank_order[r] = scored.into_iter().map(|(v, _, _)| v).collect();
}

fn count_crossings(rank_a: &[usize], rank_b: &[usize], graph: &Graph) -> usize {
    let mut pos_b = vec![usize::MAX; graph.n];
    for (i, &v) in rank_b.iter().enumerate() {
        pos_b[v] = i;
    }

    let mut edges = Vec::new();
    for (i, &u) in rank_a.iter().enumerate() {
        for &v in &graph.succ[u] {
            if pos_b[v] != usize::MAX {
                edges.push((i, pos_b[v]));
            }
        }
    }

    let mut crossings = 0;
    for (i, &(a1, b1)) in edges.iter().enumerate() {
        for &(a2, b2) in &edges[i + 1..] {
            if (a1 < a2 && b1 > b2) || (a1 > a2 && b1 < b2) {
                crossings += 1;
            }
        }
    }
    crossings
}

fn total_crossings(rank_order: &[Vec<usize>], graph: &Graph) -> usize {
    rank_order
        .windows(2)
        .map(|pair| count_crossings(&pair[0], &pair[1], graph))
        .sum()
}

/// Alternate forward and backward sweeps, keeping the best ordering seen.
/// Returns the remaining crossing count.
fn minimize_crossings(rank_order: &mut Vec<Vec<usize>>, graph: &Graph, max_sweeps: usize) -> usize {
    if rank_order.len() <= 1 {
        return 0;
    }

    let mut best = total_crossings(rank_order, graph);
    let mut best_order = rank_order.clone();

    for _ in 0..max_sweeps {
        if best == 0 {
            break;
        }
        for r in 1..rank_order.len() {
            sweep(rank_order, r, r - 1, &graph.pred);
        }
        for r in (0..rank_order.len() - 1).rev() {
            sweep(rank_order, r, r + 1, &graph.succ);
        }

        let crossings = total_crossings(rank_order, graph);
        if crossings < best {
            best = crossings;
            best_order = rank_order.clone();
        } else {
            break;
        }
    }

    *rank_order = best_order;
    best
}

// ============================================================================
// Coordinates
// ============================================================================

/// Node size split into the rank axis (`along`) and the in-rank axis
/// (`across`). Top-to-bottom ranks stack vertically.
#[derive(Debug, Clone, Copy)]
struct Extent {
    along: f64,
    across: f64,
}

impl Extent {
    fn of(width: f64, height: f64, direction: Direction) -> Self {
        match direction {
            Direction::TopToBottom => Self { along: height, across: width },
            Direction::LeftToRight => Self { along: width, across: height },
        }
    }
}

/// Rank-space coordinates to screen coordinates.
fn to_screen(along: f64, across: f64, direction: Direction) -> Point {
    match direction {
        Direction::TopToBottom => Point::new(across, along),
        Direction::LeftToRight => Point::new(along, across),
    }
}

/// Screen coordinates to `(along, across)`.
fn to_rank_space(p: Point, direction: Direction) -> (f64, f64) {
    match direction {
        Direction::TopToBottom => (p.y, p.x),
        Direction::LeftToRight => (p.x, p.y),
    }
}

struct Placement {
    centers: Vec<Point>,
    width: f64,
    height: f64,
}

fn assign_coordinates(
    rank_order: &[Vec<usize>],
    ranks: &[usize],
    boxes: &[Extent],
    edges: &[(usize, usize)],
    label_extents: &[Option<f64>],
    options: &LayoutOptions,
) -> Placement {
    let rank_count = rank_order.len();

    let thickness: Vec<f64> = rank_order
        .iter()
        .map(|nodes| nodes.iter().map(|&v| boxes[v].along).fold(0.0, f64::max))
        .collect();

    // Labelled edges leaving a rank widen the gap below it.
    let mut extra = vec![0.0_f64; rank_count];
    for (&(u, v), label) in edges.iter().zip(label_extents) {
        if let Some(extent) = label
            && ranks[u] != ranks[v]
        {
            let r = ranks[u].min(ranks[v]);
            extra[r] = extra[r].max(*extent);
        }
    }

    let mut rank_start = Vec::with_capacity(rank_count);
    let mut cursor = options.margin;
    for r in 0..rank_count {
        rank_start.push(cursor);
        cursor += thickness[r] + options.rank_sep + extra[r];
    }
    let along_total = rank_start.last().copied().unwrap_or(options.margin)
        + thickness.last().copied().unwrap_or(0.0)
        + options.margin;

    let spans: Vec<f64> = rank_order
        .iter()
        .map(|nodes| {
            let sum: f64 = nodes.iter().map(|&v| boxes[v].across).sum();
            sum + nodes.len().saturating_sub(1) as f64 * options.node_sep
        })
        .collect();
    let max_span = spans.iter().copied().fold(0.0, f64::max);

    let mut centers = vec![Point::default(); boxes.len()];
    for (r, nodes) in rank_order.iter().enumerate() {
        let along = rank_start[r] + thickness[r] / 2.0;
        let mut across = options.margin + (max_span - spans[r]) / 2.0;
        for &v in nodes {
            let center = across + boxes[v].across / 2.0;
            centers[v] = to_screen(along, center, options.direction);
            across += boxes[v].across + options.node_sep;
        }
    }

    let across_total = max_span + options.margin * 2.0;
    let size = to_screen(along_total, across_total, options.direction);
    Placement {
        centers,
        width: size.x,
        height: size.y,
    }
}

// ============================================================================
// Edge routing
// ============================================================================

const SELF_LOOP_REACH: f64 = 24.0;

fn route(
    u: usize,
    v: usize,
    ranks: &[usize],
    centers: &[Point],
    boxes: &[Extent],
    via: &[Point],
    direction: Direction,
) -> Vec<Point> {
    let (ua, uc) = to_rank_space(centers[u], direction);
    let (va, vc) = to_rank_space(centers[v], direction);
    let (bu, bv) = (boxes[u], boxes[v]);
    let screen = |along: f64, across: f64| to_screen(along, across, direction);

    if u == v {
        let side = uc + bu.across / 2.0;
        return vec![
            screen(ua - 4.0, side),
            screen(ua - 12.0, side + SELF_LOOP_REACH),
            screen(ua + 12.0, side + SELF_LOOP_REACH),
            screen(ua + 4.0, side),
        ];
    }

    if ranks[u] == ranks[v] {
        let sign = if vc >= uc { 1.0 } else { -1.0 };
        return vec![
            screen(ua, uc + sign * bu.across / 2.0),
            screen(va, vc - sign * bv.across / 2.0),
        ];
    }

    // Leave through the face pointing at the target rank.
    let sign = if ranks[v] > ranks[u] { 1.0 } else { -1.0 };
    let start_along = ua + sign * bu.along / 2.0;
    let end_along = va - sign * bv.along / 2.0;

    if !via.is_empty() {
        let mut points = Vec::with_capacity(via.len() + 2);
        points.push(screen(start_along, uc));
        points.extend_from_slice(via);
        points.push(screen(end_along, vc));
        return points;
    }

    if (uc - vc).abs() < 0.5 {
        return vec![screen(start_along, uc), screen(end_along, vc)];
    }

    let mid = (start_along + end_along) / 2.0;
    vec![
        screen(start_along, uc),
        screen(mid, uc),
        screen(mid, vc),
        screen(end_along, vc),
    ]
}

/// Middle of the route's central segment.
fn label_anchor(points: &[Point]) -> Point {
    match points.len() {
        0 => Point::default(),
        n => points[(n - 1) / 2].midpoint(points[n / 2]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str) -> LayoutNode {
        LayoutNode {
            id: id.to_string(),
            width: 80.0,
            height: 32.0,
        }
    }

    fn edge(from: &str, to: &str) -> LayoutEdge {
        LayoutEdge {
            from: from.to_string(),
            to: to.to_string(),
            label: None,
        }
    }

    fn run(nodes: &[&str], edges: &[(&str, &str)], direction: Direction) -> LayoutOutput {
        let input = LayoutInput {
            nodes: nodes.iter().map(|id| node(id)).collect(),
            edges: edges.iter().map(|(a, b)| edge(a, b)).collect(),
        };
        let options = LayoutOptions {
            direction,
            ..LayoutOptions::default()
        };
        LayeredLayout::default().layout(&input, &options).unwrap()
    }

    #[test]
    fn test_chain_top_to_bottom() {
        let out = run(&["a", "b", "c"], &[("a", "b"), ("b", "c")], Direction::TopToBottom);
        assert_eq!(out.nodes[0], Point::new(64.0, 40.0));
        assert_eq!(out.nodes[1], Point::new(64.0, 128.0));
        assert_eq!(out.nodes[2], Point::new(64.0, 216.0));
        assert_eq!(out.width, 128.0);
        assert_eq!(out.height, 256.0);
        // Straight edges from bottom face to top face.
        assert_eq!(out.edges[0].points, vec![Point::new(64.0, 56.0), Point::new(64.0, 112.0)]);
    }

    #[test]
    fn test_left_to_right_swaps_axes() {
        let out = run(&["a", "b"], &[("a", "b")], Direction::LeftToRight);
        assert!(out.nodes[1].x > out.nodes[0].x);
        assert_eq!(out.nodes[0].y, out.nodes[1].y);
        assert_eq!(out.edges[0].points[0].x, out.nodes[0].x + 40.0);
    }

    #[test]
    fn test_siblings_share_rank_and_center() {
        let out = run(&["root", "l", "r"], &[("root", "l"), ("root", "r")], Direction::TopToBottom);
        assert_eq!(out.nodes[1].y, out.nodes[2].y);
        let mid = (out.nodes[1].x + out.nodes[2].x) / 2.0;
        assert!((mid - out.nodes[0].x).abs() < 1e-9);
        // Bent edges use four points.
        assert_eq!(out.edges[0].points.len(), 4);
    }

    #[test]
    fn test_cycle_terminates() {
        let out = run(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")], Direction::TopToBottom);
        assert!(out.nodes[0].y < out.nodes[1].y);
        assert!(out.nodes[1].y < out.nodes[2].y);
        // The back edge leaves c upwards.
        let back = &out.edges[2].points;
        assert!(back.first().unwrap().y > back.last().unwrap().y);
    }

    #[test]
    fn test_long_edge_passes_beside_middle_rank() {
        let out = run(
            &["a", "b", "c"],
            &[("a", "b"), ("b", "c"), ("a", "c")],
            Direction::TopToBottom,
        );
        assert_eq!(out.nodes.len(), 3);
        let long = &out.edges[2].points;
        assert_eq!(long.len(), 3);
        // The bend sits in b's rank, clear of b's box.
        assert_eq!(long[1].y, out.nodes[1].y);
        assert!((long[1].x - out.nodes[1].x).abs() > 40.0);
        assert_eq!(long[0].y, out.nodes[0].y + 16.0);
        assert_eq!(long[2].y, out.nodes[2].y - 16.0);
    }

    #[test]
    fn test_self_loop() {
        let out = run(&["a"], &[("a", "a")], Direction::TopToBottom);
        assert_eq!(out.edges[0].points.len(), 4);
    }

    #[test]
    fn test_crossings_removed() {
        // a->d, b->c laid out in declaration order would cross.
        let out = run(
            &["a", "b", "c", "d"],
            &[("a", "d"), ("b", "c")],
            Direction::TopToBottom,
        );
        assert!(out.nodes[3].x < out.nodes[2].x);
    }

    #[test]
    fn test_labels_widen_gap() {
        let plain = run(&["a", "b"], &[("a", "b")], Direction::TopToBottom);
        let input = LayoutInput {
            nodes: vec![node("a"), node("b")],
            edges: vec![LayoutEdge {
                label: Some((40.0, 18.0)),
                ..edge("a", "b")
            }],
        };
        let labelled = LayeredLayout::default()
            .layout(&input, &LayoutOptions::default())
            .unwrap();
        assert_eq!(labelled.height - plain.height, 18.0);
        let anchor = labelled.edges[0].label.unwrap();
        assert_eq!(anchor.x, labelled.nodes[0].x);
        assert!(anchor.y > labelled.nodes[0].y && anchor.y < labelled.nodes[1].y);
    }

    #[test]
    fn test_errors() {
        let engine = LayeredLayout::default();
        let opts = LayoutOptions::default();
        assert_eq!(
            engine.layout(&LayoutInput::default(), &opts),
            Err(LayoutError::Empty)
        );

        let input = LayoutInput {
            nodes: vec![node("a")],
            edges: vec![edge("a", "ghost")],
        };
        assert_eq!(
            engine.layout(&input, &opts),
            Err(LayoutError::UnknownNode("ghost".into()))
        );

        let input = LayoutInput {
            nodes: vec![LayoutNode { width: f64::NAN, ..node("a") }],
            edges: vec![],
        };
        assert_eq!(
            engine.layout(&input, &opts),
            Err(LayoutError::InvalidSize("a".into()))
        );
    }
}
