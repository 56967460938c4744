use crate::config::Config;
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use mediakit_editor::{DocumentTree, EditSession, Mutation, SectionLayout, Tier};
use std::fs;
use std::path::Path;

/// Starter layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Starter {
    /// No sections at all
    Blank,
    /// Hero, about and contact sections for speakers
    Speaker,
    /// Guest introduction and interview questions for podcast guests
    Podcast,
}

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Document name (written to <documentsDir>/<name>.json)
    pub name: String,

    /// Starter layout
    #[arg(short, long, value_enum, default_value = "speaker")]
    pub starter: Starter,

    /// Force overwrite an existing document
    #[arg(short, long)]
    pub force: bool,
}

/// Sections of each starter, top to bottom: (section type, layout, components per column)
fn starter_sections(
    starter: Starter,
) -> Vec<(&'static str, SectionLayout, Vec<Vec<&'static str>>)> {
    match starter {
        Starter::Blank => vec![],
        Starter::Speaker => vec![
            ("hero", SectionLayout::FullWidth, vec![vec!["hero"]]),
            ("about", SectionLayout::MainSidebar, vec![vec!["bio"], vec!["stats"]]),
            ("topics", SectionLayout::FullWidth, vec![vec!["topics"]]),
            ("contact", SectionLayout::FullWidth, vec![vec!["contact", "social"]]),
        ],
        Starter::Podcast => vec![
            ("hero", SectionLayout::FullWidth, vec![vec!["hero"]]),
            ("intro", SectionLayout::TwoColumn, vec![vec!["guest-intro"], vec!["bio"]]),
            ("interview", SectionLayout::FullWidth, vec![vec!["questions"]]),
            ("contact", SectionLayout::FullWidth, vec![vec!["call-to-action"]]),
        ],
    }
}

/// Build a starter document through a regular edit session
pub fn build_starter(starter: Starter, config: &Config) -> Result<DocumentTree> {
    let mut session =
        EditSession::new(DocumentTree::new(), config.editor.clone()).with_access(Tier::Agency);

    for (section_type, layout, columns) in starter_sections(starter) {
        session.apply(&Mutation::AddSection {
            section_type: section_type.to_string(),
            layout,
            index: None,
        })?;

        let column_ids: Vec<String> = session
            .document()
            .sections
            .last()
            .map(|s| s.columns.iter().map(|c| c.id.clone()).collect())
            .unwrap_or_default();

        for (column_id, component_types) in column_ids.iter().zip(columns) {
            for component_type in component_types {
                let result = session.add_component(component_type, column_id)?;
                anyhow::ensure!(
                    result.is_applied(),
                    "Cannot place {} in starter: {:?}",
                    component_type,
                    result
                );
            }
        }
    }

    Ok(session.document().clone())
}

pub fn new(args: NewArgs, config: &Config, cwd: &str) -> Result<()> {
    let documents_dir = config.get_documents_dir(cwd);
    let document_path = documents_dir.join(format!("{}.json", args.name));

    // Check if the document already exists
    if document_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            document_path.display().to_string().bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Creating media kit...".bright_blue().bold());

    if !documents_dir.exists() {
        fs::create_dir_all(&documents_dir)?;
        println!("  {} Created {}/", "✓".green(), config.documents_dir);
    }

    let document = build_starter(args.starter, config)?;
    let json = serde_json::to_string_pretty(&document)?;
    fs::write(&document_path, json)
        .with_context(|| format!("Cannot write {}", document_path.display()))?;

    println!(
        "  {} Created {} ({} sections, {} components)",
        "✓".green(),
        relative(&document_path, cwd),
        document.sections.len(),
        document.component_count()
    );
    println!();
    println!("{}", "✅ Media kit created!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: mediakit inspect {}", relative(&document_path, cwd));
    println!(
        "  2. Replay an editing script: mediakit replay {} script.json",
        relative(&document_path, cwd)
    );

    Ok(())
}

fn relative(path: &Path, cwd: &str) -> String {
    path.strip_prefix(cwd)
        .unwrap_or(path)
        .display()
        .to_string()
}
