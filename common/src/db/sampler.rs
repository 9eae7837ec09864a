use crate::db::core::*;
use crate::db::indices::*;
use crate::error::{GenError, Result};
use rand::Rng;
use rand::seq::index;
use std::collections::HashSet;
use std::ops::Range;
use std::vec;

pub fn sample_terminals<R: Rng + ?Sized>(
    rng: &mut R,
    node_count: usize,
    terminal_count: usize,
) -> Result<HashSet<NodeId>> {
    if terminal_count > node_count {
        return Err(GenError::invalid_spec(format!(
            "terminal count {} exceeds node count {}",
            terminal_count, node_count
        )));
    }
    Ok(index::sample(rng, node_count, terminal_count)
        .into_iter()
        .map(NodeId::new)
        .collect())
}

pub fn sample_node<R: Rng + ?Sized>(
    rng: &mut R,
    id: NodeId,
    terminals: &HashSet<NodeId>,
) -> NodeRecord {
    let width = rng.gen_range(NODE_DIM_RANGE);
    let height = rng.gen_range(NODE_DIM_RANGE);
    NodeRecord {
        id,
        width,
        height,
        is_terminal: terminals.contains(&id),
    }
}

pub fn sample_net<R: Rng + ?Sized>(rng: &mut R, id: NetId, node_count: usize) -> Result<NetRecord> {
    let degree = rng.gen_range(NET_DEGREE_RANGE);
    sample_net_with_degree(rng, id, degree, node_count)
}

/// Draws `degree` distinct nodes for a net. There is no clamping: a degree
/// larger than the node population is an error.
pub fn sample_net_with_degree<R: Rng + ?Sized>(
    rng: &mut R,
    id: NetId,
    degree: usize,
    node_count: usize,
) -> Result<NetRecord> {
    if degree > node_count {
        return Err(GenError::invalid_spec(format!(
            "{} has degree {} but only {} nodes exist",
            id, degree, node_count
        )));
    }
    // index::sample returns indices in draw order
    let drawn = index::sample(rng, node_count, degree);
    Ok(NetRecord::from_drawn_nodes(
        id,
        drawn.into_iter().map(NodeId::new),
    ))
}

pub struct InstanceSampler<R: Rng> {
    spec: InstanceSpec,
    rng: R,
    terminals: HashSet<NodeId>,
}

impl<R: Rng> InstanceSampler<R> {
    pub fn new(spec: InstanceSpec, mut rng: R) -> Result<Self> {
        let terminals = sample_terminals(&mut rng, spec.node_count, spec.terminal_count)?;
        Ok(Self {
            spec,
            rng,
            terminals,
        })
    }

    pub fn spec(&self) -> &InstanceSpec {
        &self.spec
    }

    pub fn terminals(&self) -> &HashSet<NodeId> {
        &self.terminals
    }

    pub fn sample_node(&mut self, id: NodeId) -> NodeRecord {
        sample_node(&mut self.rng, id, &self.terminals)
    }

    pub fn sample_net(&mut self, id: NetId) -> Result<NetRecord> {
        sample_net(&mut self.rng, id, self.spec.node_count)
    }

    // Each call to a *_records method starts a new pass.
    pub fn node_records(&mut self) -> NodeRecords<'_, R> {
        let ids = 0..self.spec.node_count;
        NodeRecords { sampler: self, ids }
    }

    pub fn net_records(&mut self) -> NetRecords<'_, R> {
        let ids = 0..self.spec.net_count;
        NetRecords { sampler: self, ids }
    }

    /// Draws one degree per net up front, failing on the first degree that
    /// exceeds `node_count`, so a caller can reject the instance before
    /// writing any net.
    pub fn sample_degrees(&mut self) -> Result<Vec<u8>> {
        let node_count = self.spec.node_count;
        (0..self.spec.net_count)
            .map(|id| {
                let degree = self.rng.gen_range(NET_DEGREE_RANGE);
                if degree > node_count {
                    return Err(GenError::invalid_spec(format!(
                        "{} has degree {} but only {} nodes exist",
                        NetId::new(id),
                        degree,
                        node_count
                    )));
                }
                Ok(degree as u8)
            })
            .collect()
    }

    pub fn planned_net_records(&mut self, degrees: Vec<u8>) -> PlannedNetRecords<'_, R> {
        PlannedNetRecords {
            sampler: self,
            degrees: degrees.into_iter().enumerate(),
        }
    }
}

pub struct NodeRecords<'a, R: Rng> {
    sampler: &'a mut InstanceSampler<R>,
    ids: Range<usize>,
}

impl<R: Rng> Iterator for NodeRecords<'_, R> {
    type Item = NodeRecord;

    fn next(&mut self) -> Option<NodeRecord> {
        let id = self.ids.next()?;
        Some(self.sampler.sample_node(NodeId::new(id)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl<R: Rng> ExactSizeIterator for NodeRecords<'_, R> {}

pub struct NetRecords<'a, R: Rng> {
    sampler: &'a mut InstanceSampler<R>,
    ids: Range<usize>,
}

impl<R: Rng> Iterator for NetRecords<'_, R> {
    type Item = Result<NetRecord>;

    fn next(&mut self) -> Option<Result<NetRecord>> {
        let id = self.ids.next()?;
        Some(self.sampler.sample_net(NetId::new(id)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl<R: Rng> ExactSizeIterator for NetRecords<'_, R> {}

pub struct PlannedNetRecords<'a, R: Rng> {
    sampler: &'a mut InstanceSampler<R>,
    degrees: std::iter::Enumerate<vec::IntoIter<u8>>,
}

impl<R: Rng> Iterator for PlannedNetRecords<'_, R> {
    type Item = Result<NetRecord>;

    fn next(&mut self) -> Option<Result<NetRecord>> {
        let (id, degree) = self.degrees.next()?;
        let node_count = self.sampler.spec.node_count;
        Some(sample_net_with_degree(
            &mut self.sampler.rng,
            NetId::new(id),
            degree as usize,
            node_count,
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.degrees.size_hint()
    }
}

impl<R: Rng> ExactSizeIterator for PlannedNetRecords<'_, R> {}
