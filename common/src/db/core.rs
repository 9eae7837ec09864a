use crate::db::indices::*;
use crate::error::{GenError, Result};
use std::ops::RangeInclusive;

pub const NODE_DIM_RANGE: RangeInclusive<u32> = 10..=25;
pub const NET_DEGREE_RANGE: RangeInclusive<usize> = 3..=15;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InstanceSpec {
    pub node_count: usize,
    pub terminal_count: usize,
    pub net_count: usize,
}

impl InstanceSpec {
    pub fn new(node_count: usize, terminal_count: usize, net_count: usize) -> Self {
        Self {
            node_count,
            terminal_count,
            net_count,
        }
    }

    /// Rejects counts that can never be sampled. A net degree above
    /// `node_count` that is merely possible is left to the sampler.
    pub fn validate(&self) -> Result<()> {
        if self.node_count == 0 {
            return Err(GenError::invalid_spec("node count must be positive"));
        }
        if self.terminal_count > self.node_count {
            return Err(GenError::invalid_spec(format!(
                "terminal count {} exceeds node count {}",
                self.terminal_count, self.node_count
            )));
        }
        let min_degree = *NET_DEGREE_RANGE.start();
        if self.net_count > 0 && self.node_count < min_degree {
            return Err(GenError::invalid_spec(format!(
                "{} nets requested but only {} nodes; every net needs at least {} distinct nodes",
                self.net_count, self.node_count, min_degree
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeRecord {
    pub id: NodeId,
    pub width: u32,
    pub height: u32,
    pub is_terminal: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinDirection {
    Input,
    Output,
}

impl PinDirection {
    pub fn symbol(self) -> char {
        match self {
            PinDirection::Input => 'I',
            PinDirection::Output => 'O',
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Pin {
    pub node: NodeId,
    pub direction: PinDirection,
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NetRecord {
    pub id: NetId,
    pub pins: Vec<Pin>,
}

impl NetRecord {
    /// Builds a net from node ids in draw order: the first becomes the
    /// input pin, and each pin's offset is its position in the net.
    pub fn from_drawn_nodes(id: NetId, nodes: impl IntoIterator<Item = NodeId>) -> Self {
        let pins = nodes
            .into_iter()
            .enumerate()
            .map(|(k, node)| Pin {
                node,
                direction: if k == 0 {
                    PinDirection::Input
                } else {
                    PinDirection::Output
                },
                x: k as f64,
                y: k as f64,
            })
            .collect();
        Self { id, pins }
    }

    #[inline]
    pub fn degree(&self) -> usize {
        self.pins.len()
    }
}
