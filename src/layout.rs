//! Physical LED layout
//!
//! The sculpture is wired as five strands of six edges each. Every edge
//! carries `LEDS_PER_EDGE` LEDs, and the edge index alone decides where its
//! LEDs sit in the output buffer. These mappings must match the wiring.

pub const LEDS_PER_HALF: usize = 15;
pub const LEDS_PER_EDGE: usize = LEDS_PER_HALF * 2;
pub const EDGES_PER_STRAND: usize = 6;
pub const TOTAL_STRANDS: usize = 5;
pub const LEDS_PER_STRAND: usize = LEDS_PER_EDGE * EDGES_PER_STRAND;
pub const TOTAL_EDGES: usize = EDGES_PER_STRAND * TOTAL_STRANDS;
pub const TOTAL_VERTICES: usize = 20;
pub const TOTAL_LEDS: usize = TOTAL_EDGES * LEDS_PER_EDGE;

/// Index of the `offset`th LED walking an edge from its first vertex
#[inline]
pub const fn edge_forward(edge: usize, offset: usize) -> usize {
    edge * LEDS_PER_EDGE + offset
}

/// Index of the `offset`th LED walking an edge from its second vertex
#[inline]
pub const fn edge_backward(edge: usize, offset: usize) -> usize {
    edge * LEDS_PER_EDGE + (LEDS_PER_EDGE - offset - 1)
}

/// Global index of the `edge`th edge on a strand
#[inline]
pub const fn strand_edge(strand: usize, edge: usize) -> usize {
    strand * EDGES_PER_STRAND + edge
}

/// Edge and forward offset of an LED index
#[inline]
pub const fn led_position(index: usize) -> (usize, usize) {
    (index / LEDS_PER_EDGE, index % LEDS_PER_EDGE)
}
