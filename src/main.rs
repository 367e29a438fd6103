//! Main Program for Tilereorder
//! Run with `--help` for more instruction

// Copyright (C) 2023 Dheatly23
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Error};
use clap::{Parser, Subcommand};
use image::GenericImageView;
use tilereorder::{ordering, Dimensions, ImageBackend, Imaging};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rearrange tiles according to an ordering file
    Apply {
        /// Input file
        input: PathBuf,

        /// Tile size (WxH, or a single number for square tiles)
        #[arg(short = 't', long)]
        tile_size: Dimensions,

        /// Ordering file, one tile index per line
        #[arg(long)]
        order: PathBuf,

        /// Output file
        #[arg(short = 'o', long)]
        output: PathBuf,
    },

    /// Shuffle tiles randomly and write the ordering that restores them
    Scramble {
        /// Input file
        input: PathBuf,

        /// Tile size (WxH, or a single number for square tiles)
        #[arg(short = 't', long)]
        tile_size: Dimensions,

        /// Random seed
        #[arg(long)]
        seed: Option<String>,

        /// Output file
        #[arg(short = 'o', long)]
        output: PathBuf,

        /// Where to write the restoring ordering
        #[arg(long)]
        order_out: PathBuf,
    },

    /// Check whether an ordering fits an image
    Check {
        /// Input file
        input: PathBuf,

        /// Tile size (WxH, or a single number for square tiles)
        #[arg(short = 't', long)]
        tile_size: Dimensions,

        /// Ordering file, one tile index per line
        #[arg(long)]
        order: PathBuf,
    },
}

fn main() -> Result<ExitCode, Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Command::Apply {
            input,
            tile_size,
            order,
            output,
        } => {
            let ordering = ordering::read_file(&order)
                .with_context(|| format!("reading ordering {}", order.display()))?;
            tilereorder::rearrange_tiles(&input, tile_size, &ordering, &output)?;
            info!(output = %output.display(), "wrote rearranged image");
        }
        Command::Scramble {
            input,
            tile_size,
            seed,
            output,
            order_out,
        } => {
            if seed.is_none() {
                warn!("No seed given, the scramble will not be reproducible");
            }
            let mut random = ordering::seeded_rng(seed.as_deref());

            let im = ImageBackend
                .open(&input)
                .with_context(|| format!("opening {}", input.display()))?;
            let (out, restore) = tilereorder::scramble_image(&im, tile_size, &mut random)?;

            out.save(&output)?;
            ordering::write_file(&order_out, &restore)
                .with_context(|| format!("writing ordering {}", order_out.display()))?;
            info!(tiles = restore.len(), output = %output.display(), "wrote scrambled image");
        }
        Command::Check {
            input,
            tile_size,
            order,
        } => {
            let ordering = ordering::read_file(&order)
                .with_context(|| format!("reading ordering {}", order.display()))?;
            let im = ImageBackend
                .open(&input)
                .with_context(|| format!("opening {}", input.display()))?;

            if tilereorder::is_valid_input(im.dimensions().into(), tile_size, &ordering) {
                println!("valid");
            } else {
                println!("invalid");
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
