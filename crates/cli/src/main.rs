use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use kirchhoff::api::{
    disconnected_vertices, display_rational, find_kirchhoff_graph, weighted_components, Kirchhoff,
    MatrixSampler, SampleCfg, SearchCfg, SimplexCfg,
};
use kirchhoff::GrowthStep;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod export;
mod input;
mod provenance;

use provenance::Payload;

#[derive(Parser)]
#[command(name = "kirchhoff")]
#[command(about = "Search for Kirchhoff graphs of rational matrices")]
struct Cmd {
    /// Log level (error, warn, info, debug, trace); logs go to stderr
    #[arg(long, default_value = "info")]
    log_level: Level,

    #[command(subcommand)]
    action: Action,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Growth {
    Double,
    Unit,
}

impl From<Growth> for GrowthStep {
    fn from(g: Growth) -> Self {
        match g {
            Growth::Double => GrowthStep::Double,
            Growth::Unit => GrowthStep::Unit,
        }
    }
}

#[derive(Subcommand)]
enum Action {
    /// Grow a frame until it admits a Kirchhoff graph; write graph JSON and provenance
    Find {
        /// Matrix JSON: array of rows, entries as integers or "p/q" strings
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, value_enum, default_value_t = Growth::Double)]
        growth: Growth,
        /// Give up after this many growth steps
        #[arg(long)]
        max_growths: Option<usize>,
        /// Pivot budget per solve
        #[arg(long)]
        max_pivots: Option<usize>,
    },
    /// Seed a frame and print its size and the size of its linear system
    Inspect {
        #[arg(long)]
        input: PathBuf,
    },
    /// Print random matrices as JSON lines
    Sample {
        #[arg(long, default_value_t = 1)]
        count: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 2)]
        dimensions: usize,
        #[arg(long, default_value_t = 2)]
        columns: usize,
        #[arg(long, default_value_t = 2)]
        max_abs: i64,
        #[arg(long, default_value_t = 1)]
        max_denominator: i64,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(cmd.log_level)
        .with_writer(std::io::stderr)
        .init();
    match cmd.action {
        Action::Find {
            input,
            out,
            growth,
            max_growths,
            max_pivots,
        } => {
            let cfg = SearchCfg {
                growth: growth.into(),
                max_growths,
                simplex: SimplexCfg { max_pivots },
            };
            find(&input, &out, cfg)
        }
        Action::Inspect { input } => inspect(&input),
        Action::Sample {
            count,
            seed,
            dimensions,
            columns,
            max_abs,
            max_denominator,
        } => sample(
            count,
            seed,
            SampleCfg {
                dimensions,
                columns,
                max_abs,
                max_denominator,
            },
        ),
        Action::Report => report(),
    }
}

fn find(input: &Path, out: &Path, cfg: SearchCfg) -> Result<()> {
    tracing::info!(input = %input.display(), out = %out.display(), growth = ?cfg.growth, "find");
    let matrix = input::read_matrix(input)?;
    let (frame, solution) =
        find_kirchhoff_graph(matrix.clone(), cfg).context("searching for a Kirchhoff graph")?;
    let lonely = disconnected_vertices(&frame).len();
    if lonely > 0 {
        tracing::info!(vertices = lonely, "frame has vertices outside the graph");
    }
    let graph = export::graph_export(&matrix, &frame, &solution);

    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    fs::write(out, serde_json::to_vec_pretty(&graph)?)
        .with_context(|| format!("writing {}", out.display()))?;

    let payload = Payload::new(json!({
        "input": input.to_string_lossy(),
        "growth": format!("{:?}", cfg.growth),
        "max_growths": cfg.max_growths,
        "max_pivots": cfg.simplex.max_pivots,
    }))
    .with_summary(json!({
        "growths": solution.growths,
        "shape": solution.shape(),
        "edges": solution.edge_count(),
        "disconnected_vertices": lonely,
        "components": weighted_components(&frame),
    }));
    let sidecar = provenance::write_sidecar(out, payload)?;
    tracing::info!(sidecar = %sidecar.display(), "wrote graph");
    Ok(())
}

fn inspect(input: &Path) -> Result<()> {
    let matrix = input::read_matrix(input)?;
    let search = Kirchhoff::new(matrix.clone()).context("seeding frame")?;
    let summary = export::frame_summary(&matrix, search.frame());
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn sample(count: usize, seed: u64, cfg: SampleCfg) -> Result<()> {
    let mut gen = MatrixSampler::new(cfg, seed);
    for _ in 0..count {
        let s = gen.generate_next()?;
        let rows: Vec<Vec<String>> = s
            .matrix
            .rows()
            .iter()
            .map(|row| row.iter().map(display_rational).collect())
            .collect();
        let line = json!({
            "replay": { "seed": s.replay.seed, "index": s.replay.index },
            "matrix": rows,
        });
        println!("{}", serde_json::to_string(&line)?);
    }
    Ok(())
}

fn report() -> Result<()> {
    let doc = provenance::provenance_doc(&Payload::new(json!({})), &[]);
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}
