//! # Document Tree
//!
//! In-memory model of a media kit. The tree is the canonical editing state;
//! the page DOM is a render target derived from it.
//!
//! ```text
//! DocumentTree
//!   └─ Section (id, type, layout)
//!        └─ Column (drop zone)
//!             └─ Component (id, type, content fields)
//! ```
//!
//! Ordering inside every `Vec` is significant and is preserved by
//! serialization.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

/// The editable media kit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentTree {
    pub sections: Vec<Section>,
}

/// Top-level horizontal block of the media kit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub section_type: String,
    pub layout: SectionLayout,
    pub columns: Vec<Column>,
}

/// Column layout variant of a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionLayout {
    FullWidth,
    TwoColumn,
    ThreeColumn,
    MainSidebar,
}

impl SectionLayout {
    /// Number of columns this layout renders
    pub fn column_count(self) -> usize {
        match self {
            SectionLayout::FullWidth => 1,
            SectionLayout::TwoColumn | SectionLayout::MainSidebar => 2,
            SectionLayout::ThreeColumn => 3,
        }
    }
}

impl Default for SectionLayout {
    fn default() -> Self {
        SectionLayout::FullWidth
    }
}

/// Drop target inside a section holding an ordered list of components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    #[serde(default)]
    pub components: Vec<Component>,
}

impl Column {
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn position_of(&self, component_id: &str) -> Option<usize> {
        self.components.iter().position(|c| c.id == component_id)
    }
}

/// A single content block (hero, bio, stats, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: String,
    pub component_type: String,
    #[serde(default)]
    pub content: BTreeMap<String, FieldValue>,
    #[serde(default)]
    pub premium: bool,
}

/// Value of a component content field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum FieldValue {
    Text(String),
    MediaUrl(String),
}

impl FieldValue {
    pub fn as_str(&self) -> &str {
        match self {
            FieldValue::Text(s) | FieldValue::MediaUrl(s) => s,
        }
    }
}

/// Position of a component inside the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentLocation {
    pub section: usize,
    pub column: usize,
    pub index: usize,
}

/// Position of a column inside the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLocation {
    pub section: usize,
    pub column: usize,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    #[error("Empty id on {0}")]
    EmptyId(&'static str),

    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    #[error("Section {0} has no columns")]
    SectionWithoutColumns(String),
}

impl DocumentTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Check structural invariants: non-empty ids, unique across the tree,
    /// and every section owns at least one column.
    pub fn validate(&self) -> Result<(), DocumentError> {
        let mut seen = HashSet::new();
        let mut check = |id: &str, what: &'static str| {
            if id.is_empty() {
                return Err(DocumentError::EmptyId(what));
            }
            if !seen.insert(id.to_string()) {
                return Err(DocumentError::DuplicateId(id.to_string()));
            }
            Ok(())
        };

        for section in &self.sections {
            check(&section.id, "section")?;
            if section.columns.is_empty() {
                return Err(DocumentError::SectionWithoutColumns(section.id.clone()));
            }
            for column in &section.columns {
                check(&column.id, "column")?;
                for component in &column.components {
                    check(&component.id, "component")?;
                }
            }
        }

        Ok(())
    }

    pub fn section_index(&self, section_id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == section_id)
    }

    pub fn section(&self, section_id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == section_id)
    }

    pub fn find_column(&self, column_id: &str) -> Option<ColumnLocation> {
        self.sections.iter().enumerate().find_map(|(s, section)| {
            section
                .columns
                .iter()
                .position(|c| c.id == column_id)
                .map(|column| ColumnLocation { section: s, column })
        })
    }

    pub fn column(&self, column_id: &str) -> Option<&Column> {
        let loc = self.find_column(column_id)?;
        Some(&self.sections[loc.section].columns[loc.column])
    }

    pub fn column_mut(&mut self, column_id: &str) -> Option<&mut Column> {
        let loc = self.find_column(column_id)?;
        Some(&mut self.sections[loc.section].columns[loc.column])
    }

    pub fn find_component(&self, component_id: &str) -> Option<ComponentLocation> {
        for (s, section) in self.sections.iter().enumerate() {
            for (c, column) in section.columns.iter().enumerate() {
                if let Some(index) = column.position_of(component_id) {
                    return Some(ComponentLocation {
                        section: s,
                        column: c,
                        index,
                    });
                }
            }
        }
        None
    }

    pub fn component(&self, component_id: &str) -> Option<&Component> {
        let loc = self.find_component(component_id)?;
        Some(&self.sections[loc.section].columns[loc.column].components[loc.index])
    }

    pub fn component_mut(&mut self, component_id: &str) -> Option<&mut Component> {
        let loc = self.find_component(component_id)?;
        Some(&mut self.sections[loc.section].columns[loc.column].components[loc.index])
    }

    /// Id of the column that owns `component_id`
    pub fn column_of(&self, component_id: &str) -> Option<&str> {
        let loc = self.find_component(component_id)?;
        Some(&self.sections[loc.section].columns[loc.column].id)
    }

    pub fn component_count(&self) -> usize {
        self.components().count()
    }

    /// Iterate every component in document order
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.sections
            .iter()
            .flat_map(|s| s.columns.iter())
            .flat_map(|c| c.components.iter())
    }

    /// How many nodes carry `id`. Anything other than 0 or 1 is corruption.
    pub fn occurrences(&self, id: &str) -> usize {
        let mut count = 0;
        for section in &self.sections {
            count += usize::from(section.id == id);
            for column in &section.columns {
                count += usize::from(column.id == id);
                count += column.components.iter().filter(|c| c.id == id).count();
            }
        }
        count
    }

    /// Every id in the tree, sections then columns then components
    pub fn ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        for section in &self.sections {
            ids.push(section.id.as_str());
            for column in &section.columns {
                ids.push(column.id.as_str());
                ids.extend(column.components.iter().map(|c| c.id.as_str()));
            }
        }
        ids
    }
}

/// Issues `"{prefix}-{n}"` identifiers.
///
/// The counter only moves forward. Undo may bring back a node with an old
/// id, but a fresh id is never reused.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Start above every numeric suffix already present in `tree`
    pub fn seeded_from(tree: &DocumentTree) -> Self {
        let highest = tree
            .ids()
            .into_iter()
            .filter_map(|id| id.rsplit('-').next()?.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self { next: highest + 1 }
    }

    pub fn next_id(&mut self, prefix: &str) -> String {
        let n = self.next.max(1);
        self.next = n + 1;
        format!("{}-{}", prefix, n)
    }

    pub fn section_id(&mut self) -> String {
        self.next_id("section")
    }

    pub fn column_id(&mut self) -> String {
        self.next_id("column")
    }

    pub fn component_id(&mut self) -> String {
        self.next_id("component")
    }

    /// Build a section with fresh ids and one empty column per layout slot
    pub fn new_section(&mut self, section_type: &str, layout: SectionLayout) -> Section {
        let id = self.section_id();
        let columns = (0..layout.column_count())
            .map(|_| Column {
                id: self.column_id(),
                components: Vec::new(),
            })
            .collect();
        Section {
            id,
            section_type: section_type.to_string(),
            layout,
            columns,
        }
    }
}
