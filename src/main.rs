//! apt-post - CLI tool to postprocess CLDATA programs into 5-axis G-code.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use apt_post_rs::{
    generate_program, parse_cldata_file, validate_commands, FeedMode, PostConfig,
    RotaryConvention, Units,
};

/// Postprocess APT-style CLDATA motion programs into 5-axis G-code.
#[derive(Parser, Debug)]
#[command(name = "apt-post")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input CLDATA file path
    #[arg(short, long)]
    input: PathBuf,

    /// Output G-code file path (defaults to the input path with a .nc extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Units the CLDATA program is written in (mm, inch)
    #[arg(long, default_value = "mm")]
    program_units: String,

    /// Units the G-code output must use (mm, inch)
    #[arg(long, default_value = "mm")]
    output_units: String,

    /// Rotary C-angle convention (from-y, from-x)
    #[arg(long, default_value = "from-y")]
    convention: String,

    /// Starting block number; the first emitted block is start + increment
    #[arg(long, default_value = "0")]
    start: u64,

    /// Block number increment
    #[arg(long, default_value = "5")]
    increment: u64,

    /// Feed emission mode (inline, standalone)
    #[arg(long, default_value = "inline")]
    feed_mode: String,

    /// Emit translated blocks only, without startup/shutdown blocks
    #[arg(long)]
    bare: bool,

    /// Validate only, don't generate output
    #[arg(long)]
    validate: bool,

    /// Output the parsed command stream as JSON
    #[arg(long)]
    debug: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let program_units = Units::from_name(&args.program_units)
        .with_context(|| format!("Unknown program units '{}'", args.program_units))?;
    let output_units = Units::from_name(&args.output_units)
        .with_context(|| format!("Unknown output units '{}'", args.output_units))?;
    let convention = RotaryConvention::from_name(&args.convention)
        .with_context(|| format!("Unknown rotary convention '{}'", args.convention))?;
    let feed_mode = FeedMode::from_name(&args.feed_mode)
        .with_context(|| format!("Unknown feed mode '{}'", args.feed_mode))?;

    if args.increment == 0 {
        bail!("Block number increment must be positive");
    }

    let mut config = PostConfig {
        unit_scale: program_units.factor_to(output_units),
        rotary_convention: convention,
        start_block: args.start,
        block_increment: args.increment,
        feed_mode,
        ..Default::default()
    };
    if !args.bare {
        config.header_blocks = PostConfig::standard_header(output_units);
        config.trailer_blocks = PostConfig::standard_trailer();
    }

    info!("Processing: {}", args.input.display());

    // Parse the input file
    let commands = parse_cldata_file(&args.input)
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;

    info!("Parsed {} record(s)", commands.len());

    // Validate
    let validation = validate_commands(&commands);

    for warning in &validation.warnings {
        warn!("{}", warning);
    }

    for err in &validation.errors {
        error!("{}", err);
    }

    if !validation.passed {
        bail!("Validation failed");
    }

    // Debug output
    if args.debug {
        let json = serde_json::to_string_pretty(&commands)?;
        println!("{}", json);
        return Ok(());
    }

    // Validate-only mode
    if args.validate {
        info!("Validation passed");
        return Ok(());
    }

    // Generate output
    let gcode = generate_program(&commands, &config)
        .with_context(|| format!("Failed to translate {}", args.input.display()))?;

    // Write output
    let output_path = args.output.unwrap_or_else(|| {
        let mut path = args.input.clone();
        path.set_extension("nc");
        path
    });

    std::fs::write(&output_path, &gcode)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    info!("Generated: {}", output_path.display());

    Ok(())
}
