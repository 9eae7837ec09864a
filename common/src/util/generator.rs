use crate::db::core::InstanceSpec;
use crate::db::sampler::InstanceSampler;
use crate::db::writer::bookshelf::{BatchObserver, BookshelfWriter, write_manifest};
use crate::error::Result;
use crate::util::profiler::ScopedTimer;
use crate::util::target::OutputTarget;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::Write;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct GenerationReport {
    pub target: OutputTarget,
    pub spec: InstanceSpec,
    pub nodes_written: usize,
    pub nets_written: usize,
    pub elapsed: Duration,
}

pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Net degrees are drawn before any file is created, so an `InvalidSpec`
/// leaves nothing on disk. An I/O error aborts immediately and may leave
/// partial files behind.
pub fn generate_benchmark<R, O>(
    spec: InstanceSpec,
    target: &OutputTarget,
    writer: &BookshelfWriter,
    rng: R,
    observer: &mut O,
) -> Result<GenerationReport>
where
    R: Rng,
    O: BatchObserver + ?Sized,
{
    spec.validate()?;
    let timer = ScopedTimer::new(format!("Generating '{}'", target.basename));

    log::info!(
        "Generating benchmark with {} nodes, {} terminals, and {} nets...",
        spec.node_count,
        spec.terminal_count,
        spec.net_count
    );
    let mut sampler = InstanceSampler::new(spec, rng)?;
    let degrees = sampler.sample_degrees()?;
    target.ensure_dir()?;

    let nodes_path = target.nodes_path();
    log::info!("Generating nodes file: {:?}", nodes_path);
    let mut file = File::create(&nodes_path)?;
    let nodes_written = writer.write_nodes(
        sampler.node_records(),
        spec.node_count,
        spec.terminal_count,
        &mut file,
        observer,
    )?;

    let nets_path = target.nets_path();
    log::info!("Generating nets file: {:?}", nets_path);
    let mut file = File::create(&nets_path)?;
    let nets_written = writer.write_nets(
        sampler.planned_net_records(degrees),
        spec.net_count,
        &mut file,
        observer,
    )?;

    let mut file = File::create(target.aux_path())?;
    write_manifest(target, &mut file)?;
    file.flush()?;

    log::info!("Files created in directory {:?}", target.dir);
    Ok(GenerationReport {
        target: target.clone(),
        spec,
        nodes_written,
        nets_written,
        elapsed: timer.elapsed(),
    })
}

pub fn created_stamp() -> String {
    format_created(Utc::now())
}

fn format_created(at: DateTime<Utc>) -> String {
    at.format("%b %d %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn created_dates_use_month_day_year() {
        let at = Utc.with_ymd_and_hms(2025, 5, 5, 12, 30, 0).unwrap();
        assert_eq!(format_created(at), "May 05 2025");
        let leap = Utc.with_ymd_and_hms(2000, 2, 29, 0, 0, 0).unwrap();
        assert_eq!(format_created(leap), "Feb 29 2000");
    }

    #[test]
    fn seeded_rngs_agree() {
        let a: u64 = rng_from_seed(Some(9)).r#gen();
        let b: u64 = rng_from_seed(Some(9)).r#gen();
        assert_eq!(a, b);
    }
}
