//! Dodecahedron topology
//!
//! Vertex positions and the edge list are fixed by the sculpture: edge order
//! is wiring order, and the edge index decides where its LEDs live in the
//! output buffer. From those two tables the successor table is derived once,
//! telling anything that travels along an edge where it can go next.
//!
//! Standing on a vertex and looking along the edge you arrived on, the two
//! other edges leaving that vertex are classified as left or right using the
//! outward normal at the edge's midpoint. The whole derivation runs in a
//! `const` context, so a malformed table fails the build.

use crate::layout::{LEDS_PER_EDGE, TOTAL_EDGES, TOTAL_VERTICES, edge_backward, edge_forward};
use crate::vector::Vec3;

/// Vertex positions, four rings of five from the south pole up
///
/// Coordinates range from -16384 to 16384.
pub const VERTICES: [Vec3; TOTAL_VERTICES] = [
    Vec3::new(0, -10125, -13254),
    Vec3::new(-9630, -3129, -13254),
    Vec3::new(-5951, 8192, -13254),
    Vec3::new(5951, 8192, -13254),
    Vec3::new(9630, -3129, -13254),
    Vec3::new(0, -16384, -3129),
    Vec3::new(-15582, -5062, -3129),
    Vec3::new(-9630, 13254, -3129),
    Vec3::new(9630, 13254, -3129),
    Vec3::new(15582, -5062, -3129),
    Vec3::new(-9630, -13254, 3129),
    Vec3::new(-15582, 5062, 3129),
    Vec3::new(0, 16384, 3129),
    Vec3::new(15582, 5062, 3129),
    Vec3::new(9630, -13254, 3129),
    Vec3::new(-5951, -8192, 13254),
    Vec3::new(-9630, 3129, 13254),
    Vec3::new(0, 10125, 13254),
    Vec3::new(9630, 3129, 13254),
    Vec3::new(5951, -8192, 13254),
];

/// Edges as (first vertex, second vertex), in wiring order
pub const EDGES: [(usize, usize); TOTAL_EDGES] = [
    (0, 1),
    (1, 6),
    (6, 11),
    (11, 16),
    (16, 17),
    (11, 7),
    (1, 2),
    (2, 7),
    (7, 12),
    (12, 17),
    (17, 18),
    (12, 8),
    (2, 3),
    (3, 8),
    (8, 13),
    (13, 18),
    (18, 19),
    (13, 9),
    (3, 4),
    (4, 9),
    (9, 14),
    (14, 19),
    (19, 15),
    (14, 5),
    (4, 0),
    (0, 5),
    (5, 10),
    (10, 15),
    (15, 16),
    (10, 6),
];

/// Direction to take at a vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Turn {
    Left,
    Right,
}

/// An edge together with a direction of travel
///
/// Forward travels from the edge's first vertex to its second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DirectedEdge {
    edge: u8,
    backward: bool,
}

impl DirectedEdge {
    /// `edge` must be below `TOTAL_EDGES`
    #[allow(clippy::cast_possible_truncation)]
    pub const fn new(edge: usize, backward: bool) -> Self {
        debug_assert!(edge < TOTAL_EDGES);
        Self {
            edge: edge as u8,
            backward,
        }
    }

    pub const fn edge(self) -> usize {
        self.edge as usize
    }

    pub const fn backward(self) -> bool {
        self.backward
    }

    /// Same edge, opposite direction
    pub const fn uturn(self) -> Self {
        Self {
            edge: self.edge,
            backward: !self.backward,
        }
    }

    /// Buffer index of the `offset`th LED in the direction of travel
    pub const fn led(self, offset: usize) -> usize {
        if self.backward {
            edge_backward(self.edge(), offset)
        } else {
            edge_forward(self.edge(), offset)
        }
    }

    /// Vertex the edge is travelled from
    pub const fn start_vertex(self) -> usize {
        let (first, second) = EDGES[self.edge()];
        if self.backward { second } else { first }
    }

    /// Vertex the edge is travelled toward
    pub const fn end_vertex(self) -> usize {
        let (first, second) = EDGES[self.edge()];
        if self.backward { first } else { second }
    }

    /// Travel direction as a vector
    pub const fn forward_vector(self) -> Vec3 {
        VERTICES[self.end_vertex()].sub(VERTICES[self.start_vertex()])
    }

    /// Next directed edge past the end vertex
    pub fn successor(self, turn: Turn) -> Self {
        graph().successor(self, turn)
    }
}

/// The four successors of one edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Successors {
    pub left_forward: DirectedEdge,
    pub right_forward: DirectedEdge,
    pub left_backward: DirectedEdge,
    pub right_backward: DirectedEdge,
}

/// Defect found while deriving the successor table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphError {
    /// No edge leaving the vertex classified to this side
    MissingSuccessor { from: DirectedEdge, turn: Turn },
    /// More than one edge leaving the vertex classified to this side
    DuplicateSuccessor { from: DirectedEdge, turn: Turn },
    /// A successor does not start where its predecessor ends
    Disconnected { from: DirectedEdge, turn: Turn },
    /// Reversing a successor cannot lead back
    NotReversible { from: DirectedEdge, turn: Turn },
}

/// Graph neighbors of one LED, two mid-edge and three at a vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjacentLeds {
    leds: [usize; 3],
    count: usize,
}

impl AdjacentLeds {
    pub fn as_slice(&self) -> &[usize] {
        &self.leds[..self.count]
    }

    pub const fn len(&self) -> usize {
        self.count
    }

    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub const fn has_three(&self) -> bool {
        self.count == 3
    }
}

/// Successor table of the dodecahedron wireframe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DodecahedronGraph {
    successors: [Successors; TOTAL_EDGES],
}

/// The sculpture's graph, derived at compile time
pub static DODECAHEDRON: DodecahedronGraph = match DodecahedronGraph::build() {
    Ok(graph) => graph,
    Err(_) => panic!("dodecahedron tables do not form a closed graph"),
};

/// Shared read-only handle to [`DODECAHEDRON`]
#[inline]
pub fn graph() -> &'static DodecahedronGraph {
    &DODECAHEDRON
}

const TURNS: [Turn; 2] = [Turn::Left, Turn::Right];

/// Record `candidate` on one side, refusing a second claim
const fn claim(
    slot: &mut Option<DirectedEdge>,
    candidate: DirectedEdge,
    from: DirectedEdge,
    turn: Turn,
) -> Result<(), GraphError> {
    if slot.is_some() {
        return Err(GraphError::DuplicateSuccessor { from, turn });
    }
    *slot = Some(candidate);
    Ok(())
}

const fn settle(slot: Option<DirectedEdge>, from: DirectedEdge, turn: Turn) -> Result<DirectedEdge, GraphError> {
    match slot {
        Some(edge) => Ok(edge),
        None => Err(GraphError::MissingSuccessor { from, turn }),
    }
}

/// Left and right successors of one directed edge
const fn classify(from: DirectedEdge) -> Result<(DirectedEdge, DirectedEdge), GraphError> {
    let start = VERTICES[from.start_vertex()];
    let end = VERTICES[from.end_vertex()];
    let center = start.add(end).div(2);
    let right = center.cross(end.sub(start)).div(32768);
    let vertex = from.end_vertex();

    let mut left_slot = None;
    let mut right_slot = None;
    let mut other = 0;
    while other < TOTAL_EDGES {
        let (first, second) = EDGES[other];
        if other != from.edge() && (first == vertex || second == vertex) {
            let candidate = DirectedEdge::new(other, second == vertex);
            let claimed = if right.dot(candidate.forward_vector()) > 0 {
                claim(&mut right_slot, candidate, from, Turn::Right)
            } else {
                claim(&mut left_slot, candidate, from, Turn::Left)
            };
            if let Err(err) = claimed {
                return Err(err);
            }
        }
        other += 1;
    }

    let left = match settle(left_slot, from, Turn::Left) {
        Ok(edge) => edge,
        Err(err) => return Err(err),
    };
    match settle(right_slot, from, Turn::Right) {
        Ok(right) => Ok((left, right)),
        Err(err) => Err(err),
    }
}

impl DodecahedronGraph {
    /// Derive the successor table from [`VERTICES`] and [`EDGES`]
    pub const fn build() -> Result<Self, GraphError> {
        let empty = DirectedEdge::new(0, false);
        let mut successors = [Successors {
            left_forward: empty,
            right_forward: empty,
            left_backward: empty,
            right_backward: empty,
        }; TOTAL_EDGES];

        let mut edge = 0;
        while edge < TOTAL_EDGES {
            let (left_forward, right_forward) = match classify(DirectedEdge::new(edge, false)) {
                Ok(pair) => pair,
                Err(err) => return Err(err),
            };
            let (left_backward, right_backward) = match classify(DirectedEdge::new(edge, true)) {
                Ok(pair) => pair,
                Err(err) => return Err(err),
            };
            successors[edge] = Successors {
                left_forward,
                right_forward,
                left_backward,
                right_backward,
            };
            edge += 1;
        }

        let graph = Self { successors };
        match graph.validate() {
            Ok(()) => Ok(graph),
            Err(err) => Err(err),
        }
    }

    /// Check that every successor continues its predecessor and that the
    /// way back is always among the reversed successor's options
    pub const fn validate(&self) -> Result<(), GraphError> {
        let mut edge = 0;
        while edge < TOTAL_EDGES {
            let mut direction = 0;
            while direction < 2 {
                let from = DirectedEdge::new(edge, direction == 1);
                let mut t = 0;
                while t < TURNS.len() {
                    let turn = TURNS[t];
                    let next = self.successor(from, turn);
                    if next.start_vertex() != from.end_vertex() {
                        return Err(GraphError::Disconnected { from, turn });
                    }
                    let back = next.uturn();
                    let home = from.uturn();
                    let left = self.successor(back, Turn::Left);
                    let right = self.successor(back, Turn::Right);
                    let returns = (left.edge == home.edge && left.backward == home.backward)
                        || (right.edge == home.edge && right.backward == home.backward);
                    if !returns {
                        return Err(GraphError::NotReversible { from, turn });
                    }
                    t += 1;
                }
                direction += 1;
            }
            edge += 1;
        }
        Ok(())
    }

    /// Successor record of an undirected edge
    pub const fn successors(&self, edge: usize) -> &Successors {
        &self.successors[edge]
    }

    pub const fn successor(&self, from: DirectedEdge, turn: Turn) -> DirectedEdge {
        let entry = &self.successors[from.edge()];
        match (from.backward, turn) {
            (false, Turn::Left) => entry.left_forward,
            (false, Turn::Right) => entry.right_forward,
            (true, Turn::Left) => entry.left_backward,
            (true, Turn::Right) => entry.right_backward,
        }
    }

    /// Neighbors of the LED at `offset` along `edge`, measured forward
    pub const fn adjacent_leds(&self, edge: usize, offset: usize) -> AdjacentLeds {
        if offset == 0 {
            let entry = &self.successors[edge];
            return AdjacentLeds {
                leds: [
                    entry.left_backward.led(0),
                    entry.right_backward.led(0),
                    edge_forward(edge, 1),
                ],
                count: 3,
            };
        }
        if offset == LEDS_PER_EDGE - 1 {
            let entry = &self.successors[edge];
            return AdjacentLeds {
                leds: [
                    entry.left_forward.led(0),
                    entry.right_forward.led(0),
                    edge_backward(edge, 1),
                ],
                count: 3,
            };
        }
        AdjacentLeds {
            leds: [edge_forward(edge, offset - 1), edge_forward(edge, offset + 1), 0],
            count: 2,
        }
    }

    /// Neighbors of a buffer index
    pub const fn adjacent_leds_of(&self, led: usize) -> AdjacentLeds {
        let (edge, offset) = crate::layout::led_position(led);
        self.adjacent_leds(edge, offset)
    }
}
