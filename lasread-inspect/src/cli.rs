use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tool to inspect the header and point records of las files.
#[derive(Debug, Parser)]
pub struct AppOptions {
    /// Verbosity of the command line output.
    #[clap(long, default_value = "info")]
    pub log_level: log::Level,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Prints the public header block of a las file as json.
    Header(HeaderOptions),

    /// Prints point records as json, one point per line.
    Points(PointsOptions),

    /// Decodes all points of a las file and checks them against the header.
    ///
    /// The point records are split into one range per thread,
    /// each of which is decoded independently.
    Check(CheckOptions),
}

#[derive(Debug, Parser)]
pub struct HeaderOptions {
    /// The las file to read
    #[clap()]
    pub file: PathBuf,
}

#[derive(Debug, Parser)]
pub struct PointsOptions {
    /// Index of the first point to print
    #[clap(long, default_value = "0")]
    pub start: u64,

    /// Maximum number of points to print.
    /// If not set, all points from the start index up to the end of the file are printed.
    #[clap(long)]
    pub limit: Option<u64>,

    /// The las file to read the points from
    #[clap()]
    pub file: PathBuf,
}

#[derive(Debug, Parser)]
pub struct CheckOptions {
    /// Number of threads to decode the points with.
    /// Defaults to the number of cpu cores.
    #[clap(long)]
    pub threads: Option<usize>,

    /// The las file to check
    #[clap()]
    pub file: PathBuf,
}
