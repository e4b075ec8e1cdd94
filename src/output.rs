//! Console and JSON rendering of extraction and comparison results

use crate::catalog::CanonicalSkill;
use crate::error::Result;
use crate::matching::comparator::ComparisonResult;
use crate::matching::extractor::ExtractionResult;
use colored::Colorize;
use serde::Serialize;

pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn print_extraction(result: &ExtractionResult, detailed: bool) {
    if result.skills.is_empty() {
        println!("{}", "No skills found.".yellow());
    } else {
        println!("{}", "Extracted skills".bold());
        for skill_match in &result.skills {
            println!(
                "  {} {:<24} {:<24} {:.4}",
                "•".green(),
                skill_match.skill,
                skill_match.category.dimmed(),
                skill_match.similarity
            );
        }
    }

    println!(
        "\n{} chunks, {} candidate skills scored",
        result.chunk_count, result.candidate_count
    );

    if detailed {
        println!("{}", "Chunks:".bold());
        for chunk in &result.chunks {
            println!("  {}", chunk.dimmed());
        }
    }
}

pub fn print_comparison(result: &ComparisonResult) {
    println!(
        "{} {:.1}%",
        "Match score:".bold(),
        result.summary.match_percentage
    );

    if !result.matched.is_empty() {
        println!("\n{}", "Matched".green().bold());
        for skill in &result.matched {
            println!(
                "  {} {:<24} cv {:.4}  jd {:.4}",
                "✓".green(),
                skill.skill,
                skill.cv_similarity,
                skill.jd_similarity
            );
        }
    }

    if !result.missing.is_empty() {
        println!("\n{}", "Missing".red().bold());
        for skill in &result.missing {
            println!(
                "  {} {:<24} jd {:.4}  cv {:.4}",
                "✗".red(),
                skill.skill,
                skill.jd_similarity,
                skill.cv_similarity
            );
        }
    }

    if !result.nice_to_have.is_empty() {
        println!("\n{}", "Nice to have".yellow().bold());
        for skill in &result.nice_to_have {
            println!("  {} {:<24} cv {:.4}", "+".yellow(), skill.skill, skill.similarity);
        }
    }

    println!(
        "\n{} matched, {} missing, {} nice to have",
        result.summary.total_matched,
        result.summary.total_missing,
        result.summary.total_nice_to_have
    );
}

pub fn print_catalog(skills: &[CanonicalSkill]) {
    let mut current_category = "";
    for skill in skills {
        if skill.category != current_category {
            current_category = &skill.category;
            println!("{}", current_category.bold());
        }
        println!("  {}", skill.name);
    }
    println!("\n{} skills total", skills.len());
}
