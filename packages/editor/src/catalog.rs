//! Component catalog: templates for the component types the palette offers.

use crate::document::{Component, FieldValue};
use std::collections::BTreeMap;

/// Definition of a component type
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentTemplate {
    pub type_id: String,
    pub label: String,
    pub premium: bool,
    pub default_content: BTreeMap<String, FieldValue>,
}

impl ComponentTemplate {
    /// Build a component of this type with default content
    pub fn instantiate(&self, id: String) -> Component {
        Component {
            id,
            component_type: self.type_id.clone(),
            content: self.default_content.clone(),
            premium: self.premium,
        }
    }
}

/// Source of component templates
pub trait ComponentTemplates {
    fn template(&self, type_id: &str) -> Option<ComponentTemplate>;
}

/// Built-in component types of the media kit builder
#[derive(Debug, Clone)]
pub struct ComponentCatalog {
    templates: BTreeMap<String, ComponentTemplate>,
}

impl ComponentCatalog {
    pub fn new() -> Self {
        Self {
            templates: BTreeMap::new(),
        }
    }

    /// Catalog with every built-in component type
    pub fn builtin() -> Self {
        let mut catalog = Self::new();

        catalog.add(free(
            "hero",
            "Hero",
            &[("name", "Your Name"), ("tagline", "Your professional tagline")],
        ));
        catalog.add(
            free(
                "bio",
                "Biography",
                &[("title", "About Me"), ("text", "Write a short biography here.")],
            )
            .with_media("photo", ""),
        );
        catalog.add(free(
            "topics",
            "Speaking Topics",
            &[("title", "Topics"), ("topic1", "Topic one"), ("topic2", "Topic two")],
        ));
        catalog.add(free(
            "stats",
            "Statistics",
            &[("title", "By the Numbers"), ("stat1", "0"), ("label1", "Listeners")],
        ));
        catalog.add(free("social", "Social Links", &[("title", "Connect")]));
        catalog.add(free(
            "questions",
            "Interview Questions",
            &[("title", "Suggested Questions"), ("question1", "What got you started?")],
        ));
        catalog.add(free(
            "guest-intro",
            "Guest Introduction",
            &[("text", "Please welcome our guest.")],
        ));
        catalog.add(free("contact", "Contact", &[("title", "Get in Touch"), ("email", "")]));
        catalog.add(free(
            "call-to-action",
            "Call to Action",
            &[("title", "Book me"), ("buttonText", "Contact")],
        ));
        catalog.add(premium(
            "testimonials",
            "Testimonials",
            &[("title", "What People Say"), ("quote1", "")],
        ));
        catalog.add(premium("logo-grid", "Logo Grid", &[("title", "As Featured On")]));
        catalog.add(premium("gallery", "Photo Gallery", &[("title", "Gallery")]));
        catalog.add(premium("video", "Video", &[("title", "Watch")]).with_media("videoUrl", ""));
        catalog.add(
            premium("podcast-player", "Podcast Player", &[("title", "Listen")])
                .with_media("feedUrl", ""),
        );
        catalog.add(premium(
            "booking-calendar",
            "Booking Calendar",
            &[("title", "Schedule a Call")],
        ));

        catalog
    }

    pub fn add(&mut self, template: ComponentTemplate) {
        self.templates.insert(template.type_id.clone(), template);
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Default for ComponentCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ComponentTemplates for ComponentCatalog {
    fn template(&self, type_id: &str) -> Option<ComponentTemplate> {
        self.templates.get(type_id).cloned()
    }
}

impl ComponentTemplate {
    fn with_media(mut self, field: &str, url: &str) -> Self {
        self.default_content
            .insert(field.to_string(), FieldValue::MediaUrl(url.to_string()));
        self
    }
}

fn free(type_id: &str, label: &str, fields: &[(&str, &str)]) -> ComponentTemplate {
    template(type_id, label, false, fields)
}

fn premium(type_id: &str, label: &str, fields: &[(&str, &str)]) -> ComponentTemplate {
    template(type_id, label, true, fields)
}

fn template(
    type_id: &str,
    label: &str,
    premium: bool,
    fields: &[(&str, &str)],
) -> ComponentTemplate {
    ComponentTemplate {
        type_id: type_id.to_string(),
        label: label.to_string(),
        premium,
        default_content: fields
            .iter()
            .map(|(k, v)| (k.to_string(), FieldValue::Text(v.to_string())))
            .collect(),
    }
}
