//! Standalone front-end for the LTE downlink REG-mapping core.
//!
//! Builds a cell's REG Table and PCFICH/PHICH/PDCCH allocations from either
//! a YAML config file or CLI flags, prints a summary, and exercises a
//! put/get round trip on an in-memory resource grid to demonstrate the API.

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use num_complex::Complex32;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use common::{AntennaPorts, CellId, CyclicPrefix, PhichLength, PhichResource};
use regs::{pcfich, phich, CellParameters, ControlChannels};

use crate::config::CellConfig;

/// LTE downlink control-channel REG mapper
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a YAML cell-configuration file; if given, overrides the
    /// individual cell flags below.
    #[arg(short, long)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Physical cell identity (0-503)
    #[arg(long, default_value_t = 0)]
    cell_id: u16,

    /// Number of PRBs (6-110)
    #[arg(long, default_value_t = 25)]
    nof_prb: u16,

    /// Number of antenna ports (1, 2, or 4)
    #[arg(long, default_value_t = 2)]
    nof_ports: u8,

    /// Cyclic prefix (normal, extended)
    #[arg(long, default_value = "normal")]
    cyclic_prefix: String,

    /// PHICH duration (normal, extended)
    #[arg(long, default_value = "normal")]
    phich_length: String,

    /// PHICH resource (1/6, 1/2, 1, 2)
    #[arg(long, default_value = "1")]
    phich_resource: String,

    /// Active CFI to select for the PDCCH demo (1-3)
    #[arg(long, default_value_t = 1)]
    cfi: u8,
}

fn parse_cp(s: &str) -> Result<CyclicPrefix> {
    match s {
        "normal" => Ok(CyclicPrefix::Normal),
        "extended" => Ok(CyclicPrefix::Extended),
        other => Err(anyhow::anyhow!("invalid cyclic prefix: {other}")),
    }
}

fn parse_phich_length(s: &str) -> Result<PhichLength> {
    match s {
        "normal" => Ok(PhichLength::Normal),
        "extended" => Ok(PhichLength::Extended),
        other => Err(anyhow::anyhow!("invalid PHICH length: {other}")),
    }
}

fn parse_phich_resource(s: &str) -> Result<PhichResource> {
    match s {
        "1/6" => Ok(PhichResource::OneSixth),
        "1/2" => Ok(PhichResource::OneHalf),
        "1" => Ok(PhichResource::One),
        "2" => Ok(PhichResource::Two),
        other => Err(anyhow::anyhow!("invalid PHICH resource: {other}")),
    }
}

fn cell_from_args(args: &Args) -> Result<CellParameters> {
    let cell_id = CellId::new(args.cell_id)
        .ok_or_else(|| anyhow::anyhow!("invalid cell ID: {}", args.cell_id))?;
    let nof_ports = AntennaPorts::new(args.nof_ports)
        .ok_or_else(|| anyhow::anyhow!("invalid antenna port count: {}", args.nof_ports))?;
    let cp = parse_cp(&args.cyclic_prefix)?;
    let phich_len = parse_phich_length(&args.phich_length)?;
    let phich_res = parse_phich_resource(&args.phich_resource)?;

    CellParameters::new(cell_id, args.nof_prb, nof_ports, cp, phich_len, phich_res)
        .context("invalid cell parameters")
}

fn cell_from_config(path: &str) -> Result<CellParameters> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {path}"))?;
    let cell_cfg: CellConfig =
        serde_yaml::from_str(&text).with_context(|| format!("failed to parse config file {path}"))?;
    cell_cfg
        .into_cell_parameters()
        .context("invalid cell configuration")
}

fn main() -> Result<()> {
    let args = Args::parse();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_line_number(true)
        .init();

    info!("Starting LTE REG-mapping core");

    let cell = match &args.config {
        Some(path) => cell_from_config(path)?,
        None => cell_from_args(&args)?,
    };

    info!(
        cell_id = cell.cell_id.value(),
        nof_prb = cell.nof_prb,
        nof_ports = cell.nof_ports.value(),
        "cell parameters validated"
    );

    let mut cc = ControlChannels::init(cell).context("failed to initialise REG mapping")?;
    println!("REG Table: {} REGs total", cc.nof_regs());
    println!(
        "PCFICH: {} REGs ({} symbols)",
        pcfich::NOF_REGS,
        pcfich::NOF_SYMBOLS
    );
    println!(
        "PHICH: {} groups, {} REGs/group",
        cc.n_groups_phich(),
        phich::REGS_PER_GROUP
    );

    cc.set_cfi(args.cfi)
        .with_context(|| format!("failed to select CFI {}", args.cfi))?;
    println!(
        "PDCCH (CFI={}): {} REGs, {} CCEs",
        args.cfi,
        cc.nof_pdcch_regs()?,
        cc.nof_pdcch_cces()?
    );

    let stride = cc.grid_stride();
    let mut grid = vec![Complex32::new(0.0, 0.0); stride * 3];

    let pcfich_symbols = [Complex32::new(1.0, 0.0); pcfich::NOF_SYMBOLS];
    cc.pcfich_put(&pcfich_symbols, &mut grid);
    let mut pcfich_out = [Complex32::new(0.0, 0.0); pcfich::NOF_SYMBOLS];
    cc.pcfich_get(&grid, &mut pcfich_out);
    println!(
        "PCFICH round trip: {}",
        if pcfich_out == pcfich_symbols { "ok" } else { "MISMATCH" }
    );

    let nof_pdcch_regs = cc.nof_pdcch_regs()?;
    let pdcch_symbols: Vec<Complex32> = (0..nof_pdcch_regs * regs::table::RE_PER_REG)
        .map(|i| Complex32::new(i as f32, 0.0))
        .collect();
    cc.pdcch_put(&pdcch_symbols, &mut grid)?;
    let mut pdcch_out = vec![Complex32::new(0.0, 0.0); pdcch_symbols.len()];
    cc.pdcch_get(&grid, &mut pdcch_out)?;
    println!(
        "PDCCH round trip: {}",
        if pdcch_out == pdcch_symbols { "ok" } else { "MISMATCH" }
    );

    Ok(())
}
