// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{crate_version, Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use op1_drum::config::KitConfig;
use op1_drum::container::read_descriptor;
use op1_drum::drum::{load_samples, DrumEncoder, FxType, LfoType, PatchDescriptor, SlotLayout};
use op1_drum::DrumError;

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "Builds OP-1 drum patches from audio samples."
)]
struct Cli {
    /// Enables debug logging. RUST_LOG takes precedence when set.
    #[arg(short, long, global = true)]
    debug: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encodes up to 24 samples into a drum patch.
    Encode(EncodeArgs),
    /// Prints the descriptor embedded in a drum patch.
    Dump {
        /// Pretty prints the descriptor JSON.
        #[arg(long)]
        pretty: bool,
        /// The drum patch to read.
        path: PathBuf,
    },
}

#[derive(Args)]
struct EncodeArgs {
    /// The samples, one per drum slot in order.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// The drum patch to write.
    #[arg(short, long)]
    output: PathBuf,
    /// The effect type. Defaults to cwo.
    #[arg(long = "fxtype", visible_alias = "fx")]
    fx_type: Option<FxType>,
    /// Turns the effect on.
    #[arg(long = "fxon")]
    fx_on: bool,
    /// The LFO type. Defaults to element.
    #[arg(long = "lfotype", visible_alias = "lfo")]
    lfo_type: Option<LfoType>,
    /// Turns the LFO on.
    #[arg(long = "lfoon")]
    lfo_on: bool,
    /// Normalizes every sample to full scale.
    #[arg(short, long)]
    normalize: bool,
    /// A kit file with further patch parameters. Options given here win.
    #[arg(short, long)]
    kit: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match cli.command {
        Commands::Encode(args) => encode(args)?,
        Commands::Dump { pretty, path } => dump(&path, pretty)?,
    }

    Ok(())
}

fn init_tracing(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Builds the descriptor and layout from the kit, then the command line.
fn patch_settings(args: &EncodeArgs) -> Result<(PatchDescriptor, SlotLayout), DrumError> {
    let mut descriptor = PatchDescriptor::default();
    let mut layout = SlotLayout::Auto;

    if let Some(path) = &args.kit {
        let kit = KitConfig::load(path)?;
        kit.apply(&mut descriptor)?;
        layout = kit.layout()?;
        info!(path = ?path, "Applied kit");
    }

    if let Some(fx_type) = args.fx_type {
        descriptor.set_fx_type(fx_type);
    }
    if args.fx_on {
        descriptor.set_fx_active(true);
    }
    if let Some(lfo_type) = args.lfo_type {
        descriptor.set_lfo_type(lfo_type);
    }
    if args.lfo_on {
        descriptor.set_lfo_active(true);
    }

    Ok((descriptor, layout))
}

fn encode(args: EncodeArgs) -> Result<(), DrumError> {
    let samples = load_samples(&args.inputs, args.normalize)?;
    let (descriptor, layout) = patch_settings(&args)?;

    DrumEncoder::new(samples, descriptor)
        .with_layout(layout)
        .write(&args.output)
}

fn dump(path: &Path, pretty: bool) -> Result<(), DrumError> {
    let json = read_descriptor(path)?;
    if pretty {
        let value: serde_json::Value = serde_json::from_str(&json)?;
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", json);
    }
    Ok(())
}
