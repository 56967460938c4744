use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use mediakit_editor::{ComponentCatalog, ComponentTemplates, DocumentTree, Snapshot};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Document JSON file
    pub input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Summary of a document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub sections: usize,
    pub components: usize,
    pub premium_components: Vec<String>,
    /// Component types the built-in catalog does not know
    pub unknown_types: Vec<String>,
    pub snapshot_bytes: usize,
}

pub fn summarize(document: &DocumentTree) -> Result<Summary> {
    let catalog = ComponentCatalog::builtin();
    let snapshot = Snapshot::capture(document)?;

    let mut unknown_types: Vec<String> = document
        .components()
        .filter(|c| catalog.template(&c.component_type).is_none())
        .map(|c| c.component_type.clone())
        .collect();
    unknown_types.sort();
    unknown_types.dedup();

    Ok(Summary {
        sections: document.sections.len(),
        components: document.component_count(),
        premium_components: document
            .components()
            .filter(|c| c.premium)
            .map(|c| c.id.clone())
            .collect(),
        unknown_types,
        snapshot_bytes: snapshot.to_json().len(),
    })
}

pub fn inspect(args: InspectArgs, _cwd: &str) -> Result<()> {
    let content = fs::read_to_string(&args.input)
        .with_context(|| format!("Cannot read {}", args.input.display()))?;
    let document: DocumentTree =
        serde_json::from_str(&content).context("Not a media kit document")?;
    let summary = summarize(&document)?;

    if args.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("📄 {}", args.input.display().to_string().bright_white().bold());
    println!(
        "   {} sections, {} components, {} bytes per snapshot",
        summary.sections, summary.components, summary.snapshot_bytes
    );
    println!();

    for section in &document.sections {
        println!(
            "   {} {} ({})",
            section.id.bright_blue(),
            section.section_type,
            serde_json::to_string(&section.layout)?.trim_matches('"')
        );
        for column in &section.columns {
            if column.is_empty() {
                println!("     {} {}", column.id.dimmed(), "(empty)".dimmed());
                continue;
            }
            println!("     {}", column.id.dimmed());
            for component in &column.components {
                let marker = if component.premium { "★".yellow() } else { "•".normal() };
                println!(
                    "       {} {} {}",
                    marker,
                    component.component_type,
                    component.id.dimmed()
                );
            }
        }
    }

    if !summary.unknown_types.is_empty() {
        println!();
        println!(
            "   {} unknown component types: {}",
            "⚠️".yellow(),
            summary.unknown_types.join(", ")
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediakit_editor::{Component, IdGenerator, SectionLayout};
    use std::collections::BTreeMap;

    #[test]
    fn test_summary() {
        let mut ids = IdGenerator::new();
        let mut section = ids.new_section("media", SectionLayout::TwoColumn);
        for (component_type, premium) in [("video", true), ("bio", false), ("hologram", false)] {
            section.columns[0].components.push(Component {
                id: ids.component_id(),
                component_type: component_type.to_string(),
                content: BTreeMap::new(),
                premium,
            });
        }
        let document = DocumentTree {
            sections: vec![section],
        };

        let summary = summarize(&document).unwrap();

        assert_eq!(summary.sections, 1);
        assert_eq!(summary.components, 3);
        assert_eq!(summary.premium_components, vec!["component-4"]);
        assert_eq!(summary.unknown_types, vec!["hologram"]);
    }

    #[test]
    fn test_corrupt_document_is_rejected() {
        let mut ids = IdGenerator::new();
        let section = ids.new_section("hero", SectionLayout::FullWidth);
        let document = DocumentTree {
            sections: vec![section.clone(), section],
        };

        assert!(summarize(&document).is_err());
    }
}
