#![doc = include_str!("../README.md")]

mod config;
mod output;
mod telemetry;

use std::io::{self, BufWriter, Write};
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use config::{CliArgs, Config, Mode};
use output::{InputFormat, OutputFormat, write_id, write_inspection};
use sleet::{LockIdWorker, MAX_BATCH_SIZE, WaitStrategy, WorkerBuilder, WorkerIdentity};
use telemetry::init_tracing;

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = Config::try_from(args)?;

    init_tracing(config.log_format)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match config.mode {
        Mode::Generate {
            identity,
            wait,
            count,
            format,
        } => generate(&mut out, identity, wait, count, format)?,
        Mode::Inspect { input, layout, ids } => inspect(&mut out, input, layout, &ids)?,
    }

    out.flush().context("failed to flush stdout")
}

fn generate<W>(
    out: &mut W,
    identity: WorkerIdentity,
    wait: WaitStrategy,
    count: usize,
    format: OutputFormat,
) -> anyhow::Result<()>
where
    W: Write,
{
    let worker: LockIdWorker = WorkerBuilder::new(identity.node_id())
        .region_id(identity.region_id())
        .wait_strategy(wait)
        .build()
        .context("failed to build worker")?;

    tracing::info!(
        node_id = identity.node_id(),
        region_id = identity.region_id(),
        count,
        "generating ids"
    );
    let start = Instant::now();

    let mut remaining = count;
    while remaining > 0 {
        let n = remaining.min(MAX_BATCH_SIZE);
        for id in worker.next_ids(n).context("failed to generate ids")? {
            write_id(out, id, format).context("failed to write id")?;
        }
        remaining -= n;
    }

    tracing::info!(count, elapsed = ?start.elapsed(), "done");
    Ok(())
}

fn inspect<W>(out: &mut W, input: InputFormat, layout: bool, ids: &[String]) -> anyhow::Result<()>
where
    W: Write,
{
    for raw in ids {
        let id = input.decode(raw)?;
        let written = if layout {
            writeln!(out, "{id:#?}")
        } else {
            write_inspection(out, id)
        };
        written.context("failed to write inspection")?;
    }
    Ok(())
}
