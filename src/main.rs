//! Skill matcher: embedding-based skill extraction and comparison CLI

use anyhow::Context;
use clap::Parser;
use log::info;
use skill_matcher::cli::{Cli, Commands};
use skill_matcher::matching::filter::CandidateFilter;
use skill_matcher::matching::segmenter;
use skill_matcher::output;
use skill_matcher::{
    CompareOptions, Config, ExtractionOptions, HashEmbedder, SkillCatalog, SkillComparator,
    SkillExtractor,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = Config::load().context("failed to load configuration")?;
    let catalog = Arc::new(build_catalog(&cli.taxonomy, &config));
    let provider = Arc::new(HashEmbedder::default());
    let filter = build_filter(&config)?;
    let extractor = SkillExtractor::with_filter(Arc::clone(&catalog), provider, filter);

    match cli.command {
        Commands::Extract {
            input,
            threshold,
            max_chunk_size,
            no_filter,
            json,
        } => {
            let text = read_input(&input)?;
            let mut options: ExtractionOptions = config.extraction_options();
            if let Some(threshold) = threshold {
                options.threshold = threshold;
            }
            if let Some(max_chunk_size) = max_chunk_size {
                options.max_chunk_size = max_chunk_size;
            }
            options.skip_filter = no_filter;

            info!("extracting skills from {}", input.display());
            let result = extractor.extract(&text, &options).await?;

            if json {
                println!("{}", output::to_json(&result)?);
            } else {
                output::print_extraction(&result, cli.verbose);
            }
        }

        Commands::Compare {
            cv,
            jd,
            threshold,
            match_threshold,
            json,
        } => {
            let cv_text = read_input(&cv)?;
            let jd_text = read_input(&jd)?;
            let mut options: CompareOptions = config.compare_options();
            if let Some(threshold) = threshold {
                options.threshold = threshold;
            }
            if let Some(match_threshold) = match_threshold {
                options.match_threshold = match_threshold;
            }

            info!(
                "comparing {} against {}",
                cv.display(),
                jd.display()
            );
            let comparator = SkillComparator::new(extractor);
            let result = comparator.compare(&cv_text, &jd_text, &options).await?;

            if json {
                println!("{}", output::to_json(&result)?);
            } else {
                output::print_comparison(&result);
            }
        }

        Commands::Catalog { json } => {
            let skills = catalog.load_skills().await?;
            if json {
                println!("{}", output::to_json(skills.as_ref())?);
            } else {
                output::print_catalog(&skills);
            }
        }
    }

    Ok(())
}

fn build_catalog(cli_taxonomy: &Option<PathBuf>, config: &Config) -> SkillCatalog {
    match cli_taxonomy.as_ref().or(config.data.taxonomy_path.as_ref()) {
        Some(path) => SkillCatalog::from_file(path),
        None => SkillCatalog::built_in(),
    }
}

fn build_filter(config: &Config) -> anyhow::Result<CandidateFilter> {
    match &config.data.alias_path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read alias table {}", path.display()))?;
            Ok(CandidateFilter::from_alias_json(&json)?)
        }
        None => Ok(CandidateFilter::new()),
    }
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(segmenter::clean_text(&raw))
}
