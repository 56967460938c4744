//! # Document Mutations
//!
//! Two entry points change the document tree:
//!
//! - [`Resolver`] turns a finished drag (what was dragged, which zone it was
//!   released over, where inside that zone) into an insert or a move. Premium
//!   gating lives here so every path that adds components goes through it.
//! - [`Mutation`] covers the remaining editing operations (section
//!   management, layout changes, content edits).
//!
//! ## Mutation Semantics
//!
//! ### Move
//! - Source and target are validated before anything is touched; the node
//!   is then removed and re-inserted in one step
//! - A move that would leave the node where it is reports no change
//!
//! ### Layout change
//! - Growing adds empty columns
//! - Shrinking moves the components of dropped columns to the end of the
//!   last remaining column; nothing is deleted
//!
//! ### UpdateContent
//! - Atomic replacement of one field
//! - Writing the value a field already holds is not a change

use crate::access::AccessControl;
use crate::catalog::ComponentTemplates;
use crate::document::{Column, DocumentTree, FieldValue, IdGenerator, SectionLayout};
use crate::drop_zone::{InsertionPoint, ZoneKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// What is being dragged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DragSource {
    /// A component type from the palette; dropping it creates a component
    #[serde(rename_all = "camelCase")]
    Palette { component_type: String },

    /// An existing component
    #[serde(rename_all = "camelCase")]
    Component { component_id: String },

    /// An existing section
    #[serde(rename_all = "camelCase")]
    Section { section_id: String },
}

impl DragSource {
    pub fn palette(component_type: impl Into<String>) -> Self {
        DragSource::Palette {
            component_type: component_type.into(),
        }
    }

    pub fn component(component_id: impl Into<String>) -> Self {
        DragSource::Component {
            component_id: component_id.into(),
        }
    }

    pub fn section(section_id: impl Into<String>) -> Self {
        DragSource::Section {
            section_id: section_id.into(),
        }
    }

    /// Id of the existing node being dragged, if any
    pub fn node_id(&self) -> Option<&str> {
        match self {
            DragSource::Palette { .. } => None,
            DragSource::Component { component_id } => Some(component_id),
            DragSource::Section { section_id } => Some(section_id),
        }
    }

    /// Whether this source may be dropped into a zone of `kind`
    pub fn accepts(&self, kind: &ZoneKind) -> bool {
        match (self, kind) {
            (DragSource::Section { .. }, ZoneKind::SectionList) => true,
            (
                DragSource::Palette { .. } | DragSource::Component { .. },
                ZoneKind::Column { .. },
            ) => true,
            _ => false,
        }
    }
}

/// Outcome of resolving a drop
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum MutationResult {
    #[serde(rename_all = "camelCase")]
    Inserted { component_id: String, column_id: String },

    #[serde(rename_all = "camelCase")]
    Moved { node_id: String },

    /// The node was dropped where it already is
    NoOp,

    /// The palette token needs a capability the user lacks
    #[serde(rename_all = "camelCase")]
    PremiumRequired { feature: String, component_type: String },

    #[serde(rename_all = "camelCase")]
    UnknownComponentType { component_type: String },

    /// The dragged node is no longer in the tree
    #[serde(rename_all = "camelCase")]
    SourceMissing { node_id: String },

    InvalidTarget { reason: String },
}

impl MutationResult {
    /// Whether the tree was changed
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationResult::Inserted { .. } | MutationResult::Moved { .. })
    }
}

/// Applies drops to the document tree
pub struct Resolver<'a> {
    templates: &'a dyn ComponentTemplates,
    access: &'a dyn AccessControl,
    premium_capability: &'a str,
}

impl<'a> Resolver<'a> {
    pub fn new(
        templates: &'a dyn ComponentTemplates,
        access: &'a dyn AccessControl,
        premium_capability: &'a str,
    ) -> Self {
        Self {
            templates,
            access,
            premium_capability,
        }
    }

    /// Apply a drop. The tree is either fully updated or left untouched.
    pub fn apply(
        &self,
        tree: &mut DocumentTree,
        ids: &mut IdGenerator,
        source: &DragSource,
        target: &ZoneKind,
        insertion: &InsertionPoint,
    ) -> MutationResult {
        let before = insertion.before.as_deref();

        match (source, target) {
            (DragSource::Palette { component_type }, ZoneKind::Column { column_id }) => {
                self.insert_new(tree, ids, component_type, column_id, before)
            }
            (DragSource::Component { component_id }, ZoneKind::Column { column_id }) => {
                move_component(tree, component_id, column_id, before)
            }
            (DragSource::Section { section_id }, ZoneKind::SectionList) => {
                move_section(tree, section_id, before)
            }
            _ => MutationResult::InvalidTarget {
                reason: format!("{:?} cannot be dropped on {:?}", source, target),
            },
        }
    }

    fn insert_new(
        &self,
        tree: &mut DocumentTree,
        ids: &mut IdGenerator,
        component_type: &str,
        column_id: &str,
        before: Option<&str>,
    ) -> MutationResult {
        let Some(template) = self.templates.template(component_type) else {
            return MutationResult::UnknownComponentType {
                component_type: component_type.to_string(),
            };
        };

        if template.premium && !self.access.has_capability(self.premium_capability) {
            debug!(component_type, "premium component rejected");
            return MutationResult::PremiumRequired {
                feature: self.premium_capability.to_string(),
                component_type: component_type.to_string(),
            };
        }

        let Some(column) = tree.column_mut(column_id) else {
            return MutationResult::InvalidTarget {
                reason: format!("column {} not found", column_id),
            };
        };

        let index = index_before(column.components.iter().map(|c| c.id.as_str()), before);
        let component = template.instantiate(ids.component_id());
        let component_id = component.id.clone();
        column.components.insert(index, component);

        MutationResult::Inserted {
            component_id,
            column_id: column_id.to_string(),
        }
    }
}

fn move_component(
    tree: &mut DocumentTree,
    component_id: &str,
    column_id: &str,
    before: Option<&str>,
) -> MutationResult {
    let Some(from) = tree.find_component(component_id) else {
        return MutationResult::SourceMissing {
            node_id: component_id.to_string(),
        };
    };
    let Some(to) = tree.find_column(column_id) else {
        return MutationResult::InvalidTarget {
            reason: format!("column {} not found", column_id),
        };
    };

    // Dropping in front of itself leaves the node where it is
    if before == Some(component_id) {
        return MutationResult::NoOp;
    }

    let destination = &tree.sections[to.section].columns[to.column];
    let index = index_before(
        destination
            .components
            .iter()
            .map(|c| c.id.as_str())
            .filter(|id| *id != component_id),
        before,
    );

    let same_column = from.section == to.section && from.column == to.column;
    if same_column && index == from.index {
        return MutationResult::NoOp;
    }

    let component = tree.sections[from.section].columns[from.column]
        .components
        .remove(from.index);
    tree.sections[to.section].columns[to.column]
        .components
        .insert(index, component);

    MutationResult::Moved {
        node_id: component_id.to_string(),
    }
}

fn move_section(tree: &mut DocumentTree, section_id: &str, before: Option<&str>) -> MutationResult {
    let Some(from) = tree.section_index(section_id) else {
        return MutationResult::SourceMissing {
            node_id: section_id.to_string(),
        };
    };

    if before == Some(section_id) {
        return MutationResult::NoOp;
    }

    let index = index_before(
        tree.sections
            .iter()
            .map(|s| s.id.as_str())
            .filter(|id| *id != section_id),
        before,
    );

    if index == from {
        return MutationResult::NoOp;
    }

    let section = tree.sections.remove(from);
    tree.sections.insert(index, section);

    MutationResult::Moved {
        node_id: section_id.to_string(),
    }
}

/// Index of `before` among `siblings`; the end when `before` is `None` or
/// no longer present.
fn index_before<'s>(siblings: impl Iterator<Item = &'s str>, before: Option<&str>) -> usize {
    let mut count = 0;
    for (i, id) in siblings.enumerate() {
        if Some(id) == before {
            return i;
        }
        count = i + 1;
    }
    count
}

/// Editing operations other than drops
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Mutation {
    /// Insert a new section with empty columns (appended when `index` is
    /// `None`)
    #[serde(rename_all = "camelCase")]
    AddSection {
        section_type: String,
        #[serde(default)]
        layout: SectionLayout,
        #[serde(default)]
        index: Option<usize>,
    },

    #[serde(rename_all = "camelCase")]
    RemoveSection { section_id: String },

    /// Move a section to `index` in the list without it
    #[serde(rename_all = "camelCase")]
    MoveSection { section_id: String, index: usize },

    #[serde(rename_all = "camelCase")]
    SetSectionLayout {
        section_id: String,
        layout: SectionLayout,
    },

    #[serde(rename_all = "camelCase")]
    RemoveComponent { component_id: String },

    /// Insert a copy (with a fresh id) right after the original
    #[serde(rename_all = "camelCase")]
    DuplicateComponent { component_id: String },

    /// Move a component to `index` in the target column without it
    #[serde(rename_all = "camelCase")]
    MoveComponent {
        component_id: String,
        column_id: String,
        index: usize,
    },

    /// Content edit, committed when the field loses focus
    #[serde(rename_all = "camelCase")]
    UpdateContent {
        component_id: String,
        field: String,
        value: FieldValue,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Section not found: {0}")]
    SectionNotFound(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Component not found: {0}")]
    ComponentNotFound(String),

    #[error("Index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// What applying a [`Mutation`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The tree changed; `node_id` is the node created or touched
    Changed { node_id: String },
    /// The mutation was valid but the tree already had the requested shape
    Unchanged,
}

impl EditOutcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, EditOutcome::Changed { .. })
    }
}

impl Mutation {
    /// Validate, then apply
    pub fn apply(
        &self,
        tree: &mut DocumentTree,
        ids: &mut IdGenerator,
    ) -> Result<EditOutcome, MutationError> {
        self.validate(tree)?;

        let outcome = match self {
            Mutation::AddSection {
                section_type,
                layout,
                index,
            } => {
                let section = ids.new_section(section_type, *layout);
                let node_id = section.id.clone();
                let at = index.unwrap_or(tree.sections.len());
                tree.sections.insert(at, section);
                EditOutcome::Changed { node_id }
            }

            Mutation::RemoveSection { section_id } => {
                tree.sections.retain(|s| s.id != *section_id);
                changed(section_id)
            }

            Mutation::MoveSection { section_id, index } => {
                let from = tree
                    .section_index(section_id)
                    .ok_or_else(|| MutationError::SectionNotFound(section_id.clone()))?;
                if from == *index {
                    EditOutcome::Unchanged
                } else {
                    let section = tree.sections.remove(from);
                    tree.sections.insert(*index, section);
                    changed(section_id)
                }
            }

            Mutation::SetSectionLayout { section_id, layout } => {
                Self::apply_layout(tree, ids, section_id, *layout)?
            }

            Mutation::RemoveComponent { component_id } => {
                let loc = tree
                    .find_component(component_id)
                    .ok_or_else(|| MutationError::ComponentNotFound(component_id.clone()))?;
                tree.sections[loc.section].columns[loc.column]
                    .components
                    .remove(loc.index);
                changed(component_id)
            }

            Mutation::DuplicateComponent { component_id } => {
                let loc = tree
                    .find_component(component_id)
                    .ok_or_else(|| MutationError::ComponentNotFound(component_id.clone()))?;
                let column = &mut tree.sections[loc.section].columns[loc.column];
                let mut copy = column.components[loc.index].clone();
                copy.id = ids.component_id();
                let node_id = copy.id.clone();
                column.components.insert(loc.index + 1, copy);
                EditOutcome::Changed { node_id }
            }

            Mutation::MoveComponent {
                component_id,
                column_id,
                index,
            } => {
                let from = tree
                    .find_component(component_id)
                    .ok_or_else(|| MutationError::ComponentNotFound(component_id.clone()))?;
                let to = tree
                    .find_column(column_id)
                    .ok_or_else(|| MutationError::ColumnNotFound(column_id.clone()))?;

                if from.section == to.section && from.column == to.column && from.index == *index {
                    EditOutcome::Unchanged
                } else {
                    let component = tree.sections[from.section].columns[from.column]
                        .components
                        .remove(from.index);
                    tree.sections[to.section].columns[to.column]
                        .components
                        .insert(*index, component);
                    changed(component_id)
                }
            }

            Mutation::UpdateContent {
                component_id,
                field,
                value,
            } => {
                let component = tree
                    .component_mut(component_id)
                    .ok_or_else(|| MutationError::ComponentNotFound(component_id.clone()))?;
                if component.content.get(field) == Some(value) {
                    EditOutcome::Unchanged
                } else {
                    component.content.insert(field.clone(), value.clone());
                    changed(component_id)
                }
            }
        };

        debug!(mutation = self.name(), changed = outcome.is_changed(), "mutation applied");
        Ok(outcome)
    }

    fn apply_layout(
        tree: &mut DocumentTree,
        ids: &mut IdGenerator,
        section_id: &str,
        layout: SectionLayout,
    ) -> Result<EditOutcome, MutationError> {
        let index = tree
            .section_index(section_id)
            .ok_or_else(|| MutationError::SectionNotFound(section_id.to_string()))?;
        let section = &mut tree.sections[index];

        let wanted = layout.column_count();
        if section.layout == layout && section.columns.len() == wanted {
            return Ok(EditOutcome::Unchanged);
        }

        if section.columns.len() > wanted {
            let dropped: Vec<Column> = section.columns.drain(wanted..).collect();
            // `wanted` is at least 1, so a last column always remains
            if let Some(last) = section.columns.last_mut() {
                for column in dropped {
                    last.components.extend(column.components);
                }
            }
        }

        while section.columns.len() < wanted {
            section.columns.push(Column {
                id: ids.column_id(),
                components: Vec::new(),
            });
        }

        section.layout = layout;
        Ok(changed(section_id))
    }

    /// Validate without applying
    pub fn validate(&self, tree: &DocumentTree) -> Result<(), MutationError> {
        match self {
            Mutation::AddSection { index, .. } => match index {
                Some(i) if *i > tree.sections.len() => Err(MutationError::IndexOutOfBounds {
                    index: *i,
                    len: tree.sections.len(),
                }),
                _ => Ok(()),
            },

            Mutation::RemoveSection { section_id }
            | Mutation::SetSectionLayout { section_id, .. } => {
                tree.section(section_id)
                    .map(|_| ())
                    .ok_or_else(|| MutationError::SectionNotFound(section_id.clone()))
            }

            Mutation::MoveSection { section_id, index } => {
                tree.section(section_id)
                    .ok_or_else(|| MutationError::SectionNotFound(section_id.clone()))?;
                let len = tree.sections.len() - 1;
                if *index > len {
                    return Err(MutationError::IndexOutOfBounds { index: *index, len });
                }
                Ok(())
            }

            Mutation::RemoveComponent { component_id }
            | Mutation::DuplicateComponent { component_id }
            | Mutation::UpdateContent { component_id, .. } => tree
                .find_component(component_id)
                .map(|_| ())
                .ok_or_else(|| MutationError::ComponentNotFound(component_id.clone())),

            Mutation::MoveComponent {
                component_id,
                column_id,
                index,
            } => {
                let from = tree
                    .find_component(component_id)
                    .ok_or_else(|| MutationError::ComponentNotFound(component_id.clone()))?;
                let to = tree
                    .find_column(column_id)
                    .ok_or_else(|| MutationError::ColumnNotFound(column_id.clone()))?;

                let mut len = tree.sections[to.section].columns[to.column].components.len();
                if from.section == to.section && from.column == to.column {
                    len -= 1;
                }
                if *index > len {
                    return Err(MutationError::IndexOutOfBounds { index: *index, len });
                }
                Ok(())
            }
        }
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::AddSection { .. } => "add_section",
            Mutation::RemoveSection { .. } => "remove_section",
            Mutation::MoveSection { .. } => "move_section",
            Mutation::SetSectionLayout { .. } => "set_section_layout",
            Mutation::RemoveComponent { .. } => "remove_component",
            Mutation::DuplicateComponent { .. } => "duplicate_component",
            Mutation::MoveComponent { .. } => "move_component",
            Mutation::UpdateContent { .. } => "update_content",
        }
    }
}

fn changed(node_id: &str) -> EditOutcome {
    EditOutcome::Changed {
        node_id: node_id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{CapabilitySet, Tier};
    use crate::catalog::ComponentCatalog;

    /// One two-column section: column-2 holds components a, b, c
    fn fixture() -> (DocumentTree, IdGenerator) {
        let mut ids = IdGenerator::new();
        let mut section = ids.new_section("content", SectionLayout::TwoColumn);
        let catalog = ComponentCatalog::builtin();
        for name in ["a", "b", "c"] {
            let component = catalog.template("bio").unwrap().instantiate(name.to_string());
            section.columns[0].components.push(component);
        }
        (DocumentTree { sections: vec![section] }, ids)
    }

    fn column_ids(tree: &DocumentTree, column_id: &str) -> Vec<String> {
        tree.column(column_id)
            .unwrap()
            .components
            .iter()
            .map(|c| c.id.clone())
            .collect()
    }

    fn before(id: Option<&str>) -> InsertionPoint {
        InsertionPoint {
            before: id.map(str::to_string),
            indicator_y: 0.0,
        }
    }

    fn col(id: &str) -> ZoneKind {
        ZoneKind::Column {
            column_id: id.to_string(),
        }
    }

    #[test]
    fn test_insert_from_palette() {
        let (mut tree, mut ids) = fixture();
        let catalog = ComponentCatalog::builtin();
        let resolver = Resolver::new(&catalog, &Tier::Free, "premiumComponents");

        let result = resolver.apply(
            &mut tree,
            &mut ids,
            &DragSource::palette("stats"),
            &col("column-2"),
            &before(Some("b")),
        );

        let MutationResult::Inserted { component_id, .. } = result else {
            panic!("expected insert, got {:?}", result);
        };
        assert_eq!(column_ids(&tree, "column-2"), vec!["a", component_id.as_str(), "b", "c"]);
        assert_eq!(tree.component(&component_id).unwrap().component_type, "stats");
    }

    #[test]
    fn test_premium_palette_token_requires_capability() {
        let (mut tree, mut ids) = fixture();
        let original = tree.clone();
        let catalog = ComponentCatalog::builtin();
        let resolver = Resolver::new(&catalog, &Tier::Free, "premiumComponents");

        let result = resolver.apply(
            &mut tree,
            &mut ids,
            &DragSource::palette("video"),
            &col("column-3"),
            &before(None),
        );

        assert_eq!(
            result,
            MutationResult::PremiumRequired {
                feature: "premiumComponents".to_string(),
                component_type: "video".to_string(),
            }
        );
        assert_eq!(tree, original);

        let caps = CapabilitySet::new().grant("premiumComponents");
        let resolver = Resolver::new(&catalog, &caps, "premiumComponents");
        let result = resolver.apply(
            &mut tree,
            &mut ids,
            &DragSource::palette("video"),
            &col("column-3"),
            &before(None),
        );
        assert!(result.is_applied());
    }

    #[test]
    fn test_move_within_column() {
        let (mut tree, mut ids) = fixture();
        let catalog = ComponentCatalog::builtin();
        let resolver = Resolver::new(&catalog, &Tier::Free, "premiumComponents");

        let result = resolver.apply(
            &mut tree,
            &mut ids,
            &DragSource::component("a"),
            &col("column-2"),
            &before(None),
        );

        assert!(result.is_applied());
        assert_eq!(column_ids(&tree, "column-2"), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_move_across_columns_keeps_single_copy() {
        let (mut tree, mut ids) = fixture();
        let catalog = ComponentCatalog::builtin();
        let resolver = Resolver::new(&catalog, &Tier::Free, "premiumComponents");

        resolver.apply(
            &mut tree,
            &mut ids,
            &DragSource::component("b"),
            &col("column-3"),
            &before(None),
        );

        assert_eq!(tree.occurrences("b"), 1);
        assert_eq!(column_ids(&tree, "column-2"), vec!["a", "c"]);
        assert_eq!(column_ids(&tree, "column-3"), vec!["b"]);
    }

    #[test]
    fn test_drop_in_place_is_noop() {
        let (mut tree, mut ids) = fixture();
        let original = tree.clone();
        let catalog = ComponentCatalog::builtin();
        let resolver = Resolver::new(&catalog, &Tier::Free, "premiumComponents");

        // "b" dropped in front of "c" (its current neighbour) stays put
        let result = resolver.apply(
            &mut tree,
            &mut ids,
            &DragSource::component("b"),
            &col("column-2"),
            &before(Some("c")),
        );

        assert_eq!(result, MutationResult::NoOp);
        assert_eq!(tree, original);
    }

    #[test]
    fn test_drop_in_front_of_itself_is_noop() {
        let (mut tree, mut ids) = fixture();
        Mutation::AddSection {
            section_type: "hero".to_string(),
            layout: SectionLayout::FullWidth,
            index: None,
        }
        .apply(&mut tree, &mut ids)
        .unwrap();
        let original = tree.clone();
        let first = tree.sections[0].id.clone();
        let catalog = ComponentCatalog::builtin();
        let resolver = Resolver::new(&catalog, &Tier::Free, "premiumComponents");

        let result = resolver.apply(
            &mut tree,
            &mut ids,
            &DragSource::component("a"),
            &col("column-2"),
            &before(Some("a")),
        );
        assert_eq!(result, MutationResult::NoOp);

        let result = resolver.apply(
            &mut tree,
            &mut ids,
            &DragSource::section(first.clone()),
            &ZoneKind::SectionList,
            &before(Some(&first)),
        );
        assert_eq!(result, MutationResult::NoOp);
        assert_eq!(tree, original);
    }

    #[test]
    fn test_missing_source_aborts() {
        let (mut tree, mut ids) = fixture();
        let original = tree.clone();
        let catalog = ComponentCatalog::builtin();
        let resolver = Resolver::new(&catalog, &Tier::Free, "premiumComponents");

        let result = resolver.apply(
            &mut tree,
            &mut ids,
            &DragSource::component("deleted"),
            &col("column-2"),
            &before(None),
        );
        assert!(matches!(result, MutationResult::SourceMissing { .. }));

        let result = resolver.apply(
            &mut tree,
            &mut ids,
            &DragSource::component("a"),
            &col("column-99"),
            &before(None),
        );
        assert!(matches!(result, MutationResult::InvalidTarget { .. }));
        assert_eq!(tree, original);
    }

    #[test]
    fn test_incompatible_zone_is_rejected() {
        let (mut tree, mut ids) = fixture();
        let catalog = ComponentCatalog::builtin();
        let resolver = Resolver::new(&catalog, &Tier::Free, "premiumComponents");

        let result = resolver.apply(
            &mut tree,
            &mut ids,
            &DragSource::component("a"),
            &ZoneKind::SectionList,
            &before(None),
        );
        assert!(matches!(result, MutationResult::InvalidTarget { .. }));
    }

    #[test]
    fn test_section_reorder() {
        let (mut tree, mut ids) = fixture();
        Mutation::AddSection {
            section_type: "hero".to_string(),
            layout: SectionLayout::FullWidth,
            index: None,
        }
        .apply(&mut tree, &mut ids)
        .unwrap();
        let first = tree.sections[0].id.clone();
        let second = tree.sections[1].id.clone();

        let catalog = ComponentCatalog::builtin();
        let resolver = Resolver::new(&catalog, &Tier::Free, "premiumComponents");
        let result = resolver.apply(
            &mut tree,
            &mut ids,
            &DragSource::section(second.clone()),
            &ZoneKind::SectionList,
            &before(Some(&first)),
        );

        assert!(result.is_applied());
        assert_eq!(tree.sections[0].id, second);
    }

    #[test]
    fn test_shrinking_layout_keeps_components() {
        let (mut tree, mut ids) = fixture();
        let section_id = tree.sections[0].id.clone();
        Mutation::MoveComponent {
            component_id: "c".to_string(),
            column_id: "column-3".to_string(),
            index: 0,
        }
        .apply(&mut tree, &mut ids)
        .unwrap();

        let outcome = Mutation::SetSectionLayout {
            section_id: section_id.clone(),
            layout: SectionLayout::FullWidth,
        }
        .apply(&mut tree, &mut ids)
        .unwrap();

        assert!(outcome.is_changed());
        assert_eq!(tree.sections[0].columns.len(), 1);
        assert_eq!(column_ids(&tree, "column-2"), vec!["a", "b", "c"]);

        Mutation::SetSectionLayout {
            section_id,
            layout: SectionLayout::ThreeColumn,
        }
        .apply(&mut tree, &mut ids)
        .unwrap();
        assert_eq!(tree.sections[0].columns.len(), 3);
        tree.validate().unwrap();
    }

    #[test]
    fn test_update_content_same_value_is_unchanged() {
        let (mut tree, mut ids) = fixture();
        let update = Mutation::UpdateContent {
            component_id: "a".to_string(),
            field: "title".to_string(),
            value: FieldValue::Text("About Me".to_string()),
        };

        assert_eq!(update.apply(&mut tree, &mut ids).unwrap(), EditOutcome::Unchanged);
    }

    #[test]
    fn test_duplicate_component() {
        let (mut tree, mut ids) = fixture();
        let outcome = Mutation::DuplicateComponent {
            component_id: "a".to_string(),
        }
        .apply(&mut tree, &mut ids)
        .unwrap();

        let EditOutcome::Changed { node_id } = outcome else {
            panic!("expected change");
        };
        assert_eq!(column_ids(&tree, "column-2"), vec!["a", node_id.as_str(), "b", "c"]);
        tree.validate().unwrap();
    }

    #[test]
    fn test_move_component_index_validation() {
        let (tree, _) = fixture();
        let mutation = Mutation::MoveComponent {
            component_id: "a".to_string(),
            column_id: "column-2".to_string(),
            index: 3,
        };

        assert_eq!(
            mutation.validate(&tree),
            Err(MutationError::IndexOutOfBounds { index: 3, len: 2 })
        );
    }

    #[test]
    fn test_mutation_serialization() {
        let mutation = Mutation::UpdateContent {
            component_id: "component-3".to_string(),
            field: "title".to_string(),
            value: FieldValue::Text("Hello World".to_string()),
        };

        let json = serde_json::to_string(&mutation).unwrap();
        let deserialized: Mutation = serde_json::from_str(&json).unwrap();

        assert_eq!(mutation, deserialized);
    }
}
