//! CLI interface for the skill matcher

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "skill-matcher")]
#[command(about = "Embedding-based skill extraction and CV / job description comparison")]
#[command(
    long_about = "Extract canonical skills from free text by semantic similarity against a \
                  skill taxonomy, and compare CV skills with job description requirements"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Taxonomy JSON file (defaults to the bundled taxonomy)
    #[arg(short, long, global = true)]
    pub taxonomy: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract skills from a text file
    Extract {
        /// Path to a plain-text file (CV or job description)
        #[arg(short, long)]
        input: PathBuf,

        /// Minimum similarity for a skill to count as present
        #[arg(long)]
        threshold: Option<f32>,

        /// Maximum chunk length for segmentation
        #[arg(long)]
        max_chunk_size: Option<usize>,

        /// Score every catalog skill, bypassing the lexical pre-filter
        #[arg(long)]
        no_filter: bool,

        /// Emit JSON instead of the console report
        #[arg(long)]
        json: bool,
    },

    /// Compare CV skills against a job description
    Compare {
        /// Path to the CV text file
        #[arg(long)]
        cv: PathBuf,

        /// Path to the job description text file
        #[arg(long)]
        jd: PathBuf,

        /// Inclusion-stage similarity threshold
        #[arg(long)]
        threshold: Option<f32>,

        /// Threshold for a required skill to count as satisfied
        #[arg(long)]
        match_threshold: Option<f32>,

        /// Emit JSON instead of the console report
        #[arg(long)]
        json: bool,
    },

    /// Show the canonical skill catalog
    Catalog {
        /// Emit JSON instead of the console listing
        #[arg(long)]
        json: bool,
    },
}
