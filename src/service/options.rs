//! In-memory option lists and classification trees, built once from config.

use crate::config::{FieldDefinition, FullConfig};
use crate::service::OptionResolver;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// One choice of a PICKLIST field as sent to the client.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PickOption {
    pub id: String,
    pub text: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub default: bool,
}

struct ItemNode {
    parent: Option<String>,
    name: String,
}

#[derive(Default)]
pub struct OptionCatalog {
    options_by_field: HashMap<(String, String), Vec<PickOption>>,
    option_text: HashMap<String, String>,
    items: HashMap<String, ItemNode>,
    open_levels: HashMap<String, i32>,
}

impl OptionCatalog {
    pub fn from_config(config: &FullConfig) -> Self {
        let mut catalog = OptionCatalog::default();

        let mut sorted: Vec<_> = config.pick_lists.iter().collect();
        sorted.sort_by_key(|o| o.seq);
        for o in sorted {
            catalog.option_text.insert(o.id.clone(), o.text.clone());
            catalog
                .options_by_field
                .entry((o.entity.clone(), o.field.clone()))
                .or_default()
                .push(PickOption {
                    id: o.id.clone(),
                    text: o.text.clone(),
                    default: o.default,
                });
        }
        for c in &config.classifications {
            catalog.open_levels.insert(c.id.clone(), c.open_level);
        }
        for item in &config.classification_items {
            catalog.items.insert(
                item.id.clone(),
                ItemNode {
                    parent: item.parent.clone(),
                    name: item.name.clone(),
                },
            );
        }
        catalog
    }
}

impl OptionResolver for OptionCatalog {
    fn list_options(&self, entity: &str, field: &FieldDefinition) -> Vec<PickOption> {
        self.options_by_field
            .get(&(entity.to_string(), field.name.clone()))
            .cloned()
            .unwrap_or_default()
    }

    fn option_label(&self, id: &str) -> Option<String> {
        self.option_text.get(id).cloned()
    }

    /// Breadcrumb from the root down to `id`. A missing ancestor cuts the path short
    /// there; only a missing leaf yields `None`.
    fn classification_name(&self, id: &str) -> Option<String> {
        let leaf = self.items.get(id)?;
        let mut names = vec![leaf.name.as_str()];
        let mut visited = HashSet::from([id]);
        let mut current = leaf.parent.as_deref();
        while let Some(cur) = current {
            if !visited.insert(cur) {
                tracing::warn!(item = %id, "classification parent cycle");
                break;
            }
            let Some(node) = self.items.get(cur) else {
                tracing::warn!(item = %id, parent = %cur, "classification ancestor missing");
                break;
            };
            names.push(node.name.as_str());
            current = node.parent.as_deref();
        }
        names.reverse();
        Some(names.join("."))
    }

    fn open_level(&self, field: &FieldDefinition) -> i32 {
        field
            .classification
            .as_deref()
            .and_then(|c| self.open_levels.get(c).copied())
            .unwrap_or(0)
    }
}
