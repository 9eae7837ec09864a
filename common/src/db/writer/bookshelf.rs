use crate::db::core::{NetRecord, NodeRecord};
use crate::error::{GenError, Result};
use crate::util::target::OutputTarget;
use std::fmt;
use std::io::Write;

pub const DEFAULT_NODE_BATCH_SIZE: usize = 10_000;
pub const DEFAULT_NET_BATCH_SIZE: usize = 5_000;

pub const MANIFEST_EXTENSIONS: [&str; 7] = ["nodes", "nets", "wts", "pl", "scl", "shapes", "route"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Artifact {
    Nodes,
    Nets,
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Artifact::Nodes => write!(f, "nodes"),
            Artifact::Nets => write!(f, "nets"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchProgress {
    pub artifact: Artifact,
    pub written: usize,
    pub total: usize,
    pub batch_size: usize,
}

pub trait BatchObserver {
    fn batch_written(&mut self, progress: &BatchProgress);
}

impl<F: FnMut(&BatchProgress)> BatchObserver for F {
    fn batch_written(&mut self, progress: &BatchProgress) {
        self(progress)
    }
}

pub struct NoProgress;

impl BatchObserver for NoProgress {
    fn batch_written(&mut self, _progress: &BatchProgress) {}
}

// Only artifacts spanning more than one batch are reported.
pub struct LogProgress;

impl BatchObserver for LogProgress {
    fn batch_written(&mut self, p: &BatchProgress) {
        if p.total > p.batch_size {
            log::info!(
                "  Processed {}/{} {} ({}%)",
                p.written,
                p.total,
                p.artifact,
                p.written * 100 / p.total
            );
        }
    }
}

#[derive(Clone, Debug)]
pub struct Header {
    pub created: String,
    pub user: String,
}

pub struct BookshelfWriter {
    header: Header,
    node_batch_size: usize,
    net_batch_size: usize,
}

impl BookshelfWriter {
    pub fn new(header: Header) -> Self {
        Self {
            header,
            node_batch_size: DEFAULT_NODE_BATCH_SIZE,
            net_batch_size: DEFAULT_NET_BATCH_SIZE,
        }
    }

    pub fn with_batch_sizes(mut self, node_batch_size: usize, net_batch_size: usize) -> Self {
        self.node_batch_size = checked_batch_size(Artifact::Nodes, node_batch_size);
        self.net_batch_size = checked_batch_size(Artifact::Nets, net_batch_size);
        self
    }

    pub fn node_batch_size(&self) -> usize {
        self.node_batch_size
    }

    pub fn net_batch_size(&self) -> usize {
        self.net_batch_size
    }

    fn write_header(&self, buf: &mut Vec<u8>, kind: &str) -> std::io::Result<()> {
        writeln!(buf, "UCLA {} 1.0", kind)?;
        writeln!(buf, "# Created  :  {}", self.header.created)?;
        writeln!(buf, "# User     :  {}", self.header.user)?;
        writeln!(buf)
    }

    pub fn write_nodes<W, I, O>(
        &self,
        nodes: I,
        node_count: usize,
        terminal_count: usize,
        out: &mut W,
        observer: &mut O,
    ) -> Result<usize>
    where
        W: Write,
        I: IntoIterator<Item = NodeRecord>,
        O: BatchObserver + ?Sized,
    {
        if terminal_count > node_count {
            return Err(GenError::invalid_spec(format!(
                "terminal count {} exceeds node count {}",
                terminal_count, node_count
            )));
        }

        let mut buf = Vec::new();
        self.write_header(&mut buf, "nodes")?;
        writeln!(buf, "NumNodes      :  {}", node_count)?;
        writeln!(buf, "NumTerminals  :  {}", terminal_count)?;
        writeln!(buf)?;

        let written = drain_batches(
            nodes.into_iter().map(Ok),
            buf,
            out,
            Batching {
                artifact: Artifact::Nodes,
                total: node_count,
                batch_size: self.node_batch_size,
            },
            observer,
            write_node_line,
        )?;

        if written != node_count {
            log::warn!(
                "Declared {} nodes but the stream yielded {}",
                node_count,
                written
            );
        }
        Ok(written)
    }

    pub fn write_nets<W, I, O>(
        &self,
        nets: I,
        net_count: usize,
        out: &mut W,
        observer: &mut O,
    ) -> Result<usize>
    where
        W: Write,
        I: IntoIterator<Item = Result<NetRecord>>,
        O: BatchObserver + ?Sized,
    {
        let mut buf = Vec::new();
        self.write_header(&mut buf, "nets")?;
        writeln!(buf, "NumNets   :  {}", net_count)?;

        let written = drain_batches(
            nets.into_iter(),
            buf,
            out,
            Batching {
                artifact: Artifact::Nets,
                total: net_count,
                batch_size: self.net_batch_size,
            },
            observer,
            write_net_lines,
        )?;

        if written != net_count {
            log::warn!(
                "Declared {} nets but the stream yielded {}",
                net_count,
                written
            );
        }
        Ok(written)
    }
}

fn checked_batch_size(artifact: Artifact, size: usize) -> usize {
    if size == 0 {
        log::warn!("{} batch size of 0 is not usable; writing one record per batch", artifact);
        return 1;
    }
    size
}

pub fn write_manifest<W: Write>(target: &OutputTarget, out: &mut W) -> Result<()> {
    write!(out, "RowBasedPlacement :")?;
    for name in target.manifest_entries() {
        write!(out, "  {}", name)?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_node_line(buf: &mut Vec<u8>, node: &NodeRecord) -> std::io::Result<()> {
    let marker = if node.is_terminal { "    terminal" } else { "" };
    writeln!(
        buf,
        "    {}     {}     {}{}",
        node.id, node.width, node.height, marker
    )
}

// Header and pins go into the same batch, so a net is never split.
fn write_net_lines(buf: &mut Vec<u8>, net: &NetRecord) -> std::io::Result<()> {
    writeln!(buf, "NetDegree :  {}    {}", net.degree(), net.id)?;
    for pin in &net.pins {
        writeln!(
            buf,
            "        {}   {}  :   {:.1}  {:.1}",
            pin.node,
            pin.direction.symbol(),
            pin.x,
            pin.y
        )?;
    }
    Ok(())
}

struct Batching {
    artifact: Artifact,
    total: usize,
    batch_size: usize,
}

// `buf` may arrive holding the file header; it is flushed together with the
// first batch, so a stream error inside that batch leaves `out` untouched.
fn drain_batches<T, I, W, O, F>(
    mut records: I,
    mut buf: Vec<u8>,
    out: &mut W,
    batching: Batching,
    observer: &mut O,
    mut format: F,
) -> Result<usize>
where
    I: Iterator<Item = Result<T>>,
    W: Write,
    O: BatchObserver + ?Sized,
    F: FnMut(&mut Vec<u8>, &T) -> std::io::Result<()>,
{
    let mut written = 0;
    loop {
        let mut in_batch = 0;
        for record in records.by_ref().take(batching.batch_size) {
            format(&mut buf, &record?)?;
            in_batch += 1;
        }

        out.write_all(&buf)?;
        buf.clear();
        written += in_batch;

        if in_batch > 0 {
            observer.batch_written(&BatchProgress {
                artifact: batching.artifact,
                written,
                total: batching.total,
                batch_size: batching.batch_size,
            });
        }
        if in_batch < batching.batch_size {
            break;
        }
    }
    out.flush()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::core::InstanceSpec;
    use crate::db::indices::{NetId, NodeId};
    use crate::db::sampler::InstanceSampler;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn writer() -> BookshelfWriter {
        BookshelfWriter::new(Header {
            created: "May 05 2025".to_string(),
            user: "Example User".to_string(),
        })
    }

    fn sampler(spec: InstanceSpec, seed: u64) -> InstanceSampler<StdRng> {
        InstanceSampler::new(spec, StdRng::seed_from_u64(seed)).unwrap()
    }

    fn nodes_text(writer: &BookshelfWriter, spec: InstanceSpec, seed: u64) -> String {
        let mut s = sampler(spec, seed);
        let mut out = Vec::new();
        writer
            .write_nodes(
                s.node_records(),
                spec.node_count,
                spec.terminal_count,
                &mut out,
                &mut NoProgress,
            )
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    fn nets_text(writer: &BookshelfWriter, spec: InstanceSpec, seed: u64) -> String {
        let mut s = sampler(spec, seed);
        let mut out = Vec::new();
        writer
            .write_nets(s.net_records(), spec.net_count, &mut out, &mut NoProgress)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    fn node_lines(text: &str) -> Vec<&str> {
        text.lines()
            .filter(|l| l.trim_start().starts_with('n'))
            .collect()
    }

    #[test]
    fn five_nodes_two_terminals() {
        let text = nodes_text(&writer(), InstanceSpec::new(5, 2, 0), 1);
        let lines = node_lines(&text);
        assert_eq!(lines.len(), 5);
        assert_eq!(lines.iter().filter(|l| l.ends_with("terminal")).count(), 2);
        for (i, line) in lines.iter().enumerate() {
            let parts: Vec<&str> = line.split_whitespace().collect();
            assert_eq!(parts[0], format!("n{}", i));
            let w: u32 = parts[1].parse().unwrap();
            let h: u32 = parts[2].parse().unwrap();
            assert!((10..=25).contains(&w) && (10..=25).contains(&h));
        }
    }

    #[test]
    fn nodes_header_layout() {
        let text = nodes_text(&writer(), InstanceSpec::new(3, 1, 0), 2);
        let head: Vec<&str> = text.lines().take(7).collect();
        assert_eq!(
            head,
            vec![
                "UCLA nodes 1.0",
                "# Created  :  May 05 2025",
                "# User     :  Example User",
                "",
                "NumNodes      :  3",
                "NumTerminals  :  1",
                "",
            ]
        );
    }

    #[test]
    fn terminal_marker_boundaries() {
        let none = nodes_text(&writer(), InstanceSpec::new(20, 0, 0), 3);
        assert!(!none.contains("terminal"));

        let all = nodes_text(&writer(), InstanceSpec::new(20, 20, 0), 3);
        let lines = node_lines(&all);
        assert_eq!(lines.len(), 20);
        assert!(lines.iter().all(|l| l.ends_with("    terminal")));
    }

    #[test]
    fn exact_node_line_format() {
        let node = NodeRecord {
            id: NodeId::new(12),
            width: 10,
            height: 25,
            is_terminal: true,
        };
        let mut buf = Vec::new();
        write_node_line(&mut buf, &node).unwrap();
        assert_eq!(buf, b"    n12     10     25    terminal\n");
    }

    #[test]
    fn nets_with_given_degrees() {
        let nets: Vec<NetRecord> = [3usize, 4, 5]
            .iter()
            .enumerate()
            .map(|(i, &d)| NetRecord::from_drawn_nodes(NetId::new(i), (0..d).rev().map(NodeId::new)))
            .collect();
        let mut out = Vec::new();
        let written = writer()
            .write_nets(nets.into_iter().map(Ok), 3, &mut out, &mut NoProgress)
            .unwrap();
        assert_eq!(written, 3);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "UCLA nets 1.0");
        assert_eq!(lines[4], "NumNets   :  3");
        assert_eq!(
            lines.iter().filter(|l| l.starts_with("NetDegree")).count(),
            3
        );

        let mut i = 5;
        for (net_id, degree) in [(0, 3), (1, 4), (2, 5)] {
            assert_eq!(lines[i], format!("NetDegree :  {}    net{}", degree, net_id));
            for k in 0..degree {
                let parts: Vec<&str> = lines[i + 1 + k].split_whitespace().collect();
                assert_eq!(parts[1], if k == 0 { "I" } else { "O" });
                assert_eq!(parts[3], format!("{}.0", k));
                assert_eq!(parts[4], format!("{}.0", k));
            }
            i += degree + 1;
        }
        assert_eq!(i, lines.len());
        assert_eq!(lines[6], "        n2   I  :   0.0  0.0");
    }

    #[test]
    fn node_batching_does_not_change_bytes() {
        let spec = InstanceSpec::new(25, 7, 0);
        let small = nodes_text(&writer().with_batch_sizes(10, 10), spec, 9);
        let large = nodes_text(&writer().with_batch_sizes(100, 100), spec, 9);
        assert_eq!(small, large);

        let exact = nodes_text(&writer().with_batch_sizes(5, 5), spec, 9);
        assert_eq!(exact, large);
    }

    #[test]
    fn net_batching_does_not_change_bytes() {
        let spec = InstanceSpec::new(60, 0, 23);
        let small = nets_text(&writer().with_batch_sizes(4, 4), spec, 11);
        let large = nets_text(&writer().with_batch_sizes(1000, 1000), spec, 11);
        assert_eq!(small, large);
    }

    #[test]
    fn zero_batch_size_still_writes_every_record() {
        let writer = writer().with_batch_sizes(0, 0);
        assert_eq!((writer.node_batch_size(), writer.net_batch_size()), (1, 1));
        let spec = InstanceSpec::new(6, 2, 0);
        assert_eq!(
            nodes_text(&writer, spec, 8),
            nodes_text(&self::writer(), spec, 8)
        );
    }

    #[test]
    fn observer_sees_every_batch() {
        let spec = InstanceSpec::new(60, 0, 5);
        let mut s = sampler(spec, 4);
        let mut seen = Vec::new();
        let mut record = |p: &BatchProgress| seen.push((p.artifact, p.written, p.total));
        writer()
            .with_batch_sizes(2, 2)
            .write_nets(s.net_records(), 5, &mut std::io::sink(), &mut record)
            .unwrap();
        assert_eq!(
            seen,
            vec![
                (Artifact::Nets, 2, 5),
                (Artifact::Nets, 4, 5),
                (Artifact::Nets, 5, 5)
            ]
        );
    }

    #[test]
    fn failing_net_in_first_batch_writes_nothing() {
        let nets = vec![
            Ok(NetRecord::from_drawn_nodes(NetId::new(0), (0..3).map(NodeId::new))),
            Err(GenError::invalid_spec("net1 has degree 9 but only 5 nodes exist")),
        ];
        let mut out = Vec::new();
        let err = writer()
            .write_nets(nets, 2, &mut out, &mut NoProgress)
            .unwrap_err();
        assert!(matches!(err, GenError::InvalidSpec { .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn rejects_more_terminals_than_nodes() {
        let mut out = Vec::new();
        let err = writer()
            .write_nodes(std::iter::empty(), 2, 3, &mut out, &mut NoProgress)
            .unwrap_err();
        assert!(matches!(err, GenError::InvalidSpec { .. }));
        assert!(out.is_empty());
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn io_failure_propagates() {
        let spec = InstanceSpec::new(4, 1, 0);
        let mut s = sampler(spec, 5);
        let err = writer()
            .write_nodes(s.node_records(), 4, 1, &mut BrokenPipe, &mut NoProgress)
            .unwrap_err();
        assert!(matches!(err, GenError::Io { .. }));
    }

    #[test]
    fn manifest_line() {
        let mut out = Vec::new();
        let target = OutputTarget::in_base_dir("benchmarks", "example_small");
        write_manifest(&target, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "RowBasedPlacement :  example_small.nodes  example_small.nets  example_small.wts  \
             example_small.pl  example_small.scl  example_small.shapes  example_small.route\n"
        );
    }
}
