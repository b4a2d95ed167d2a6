//! Config validation: referential integrity between entities, fields, options and classifications.

use crate::config::{DisplayType, FullConfig};
use crate::error::ConfigError;
use std::collections::{HashMap, HashSet};

pub fn validate(config: &FullConfig) -> Result<(), ConfigError> {
    let mut entity_names = HashSet::new();
    let mut entity_codes = HashSet::new();
    for e in &config.entities {
        if !entity_names.insert(e.name.as_str()) {
            return Err(ConfigError::DuplicateName {
                kind: "entity",
                name: e.name.clone(),
            });
        }
        if !entity_codes.insert(e.code) {
            return Err(ConfigError::DuplicateName {
                kind: "entity code",
                name: e.code.to_string(),
            });
        }
    }

    let mut slave_of: HashMap<&str, &str> = HashMap::new();
    for e in &config.entities {
        let Some(master) = e.master_entity.as_deref() else { continue };
        if master == e.name || !entity_names.contains(master) {
            return Err(ConfigError::MissingReference {
                kind: "master entity",
                id: master.to_string(),
            });
        }
        if let Some(existing) = slave_of.insert(master, e.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "entity {} already has slave entity {}; {} cannot be a second one",
                master, existing, e.name
            )));
        }
    }

    let classification_ids: HashSet<&str> = config.classifications.iter().map(|c| c.id.as_str()).collect();
    let mut fields_by_entity: HashMap<&str, HashMap<&str, DisplayType>> = HashMap::new();
    for f in &config.fields {
        if !entity_names.contains(f.entity.as_str()) {
            return Err(ConfigError::MissingReference {
                kind: "entity",
                id: f.entity.clone(),
            });
        }
        let fields = fields_by_entity.entry(f.entity.as_str()).or_default();
        if fields.insert(f.name.as_str(), f.display_type).is_some() {
            return Err(ConfigError::DuplicateName {
                kind: "field",
                name: format!("{}.{}", f.entity, f.name),
            });
        }
        match f.display_type {
            DisplayType::Reference => {
                let target = f.reference_entity.as_deref().unwrap_or("");
                if !entity_names.contains(target) {
                    return Err(ConfigError::MissingReference {
                        kind: "reference entity",
                        id: format!("{}.{} -> {}", f.entity, f.name, target),
                    });
                }
            }
            DisplayType::Classification => {
                let cid = f.classification.as_deref().unwrap_or("");
                if !classification_ids.contains(cid) {
                    return Err(ConfigError::MissingReference {
                        kind: "classification",
                        id: format!("{}.{} -> {}", f.entity, f.name, cid),
                    });
                }
            }
            _ => {}
        }
    }

    for e in &config.entities {
        let fields = fields_by_entity.get(e.name.as_str());
        let has = |name: &str| fields.map(|m| m.contains_key(name)).unwrap_or(false);
        if !has(&e.primary_field) {
            return Err(ConfigError::InvalidPrimaryField {
                entity: e.name.clone(),
                field: e.primary_field.clone(),
            });
        }
        if let Some(nf) = &e.name_field {
            if !has(nf) {
                return Err(ConfigError::MissingReference {
                    kind: "name field",
                    id: format!("{}.{}", e.name, nf),
                });
            }
        }
    }

    let mut option_ids = HashSet::new();
    for o in &config.pick_lists {
        let dt = fields_by_entity
            .get(o.entity.as_str())
            .and_then(|m| m.get(o.field.as_str()));
        if dt != Some(&DisplayType::Picklist) {
            return Err(ConfigError::MissingReference {
                kind: "picklist field",
                id: format!("{}.{}", o.entity, o.field),
            });
        }
        if !option_ids.insert(o.id.as_str()) {
            return Err(ConfigError::DuplicateName {
                kind: "option",
                name: o.id.clone(),
            });
        }
    }

    let item_ids: HashSet<&str> = config.classification_items.iter().map(|i| i.id.as_str()).collect();
    for item in &config.classification_items {
        if !classification_ids.contains(item.classification_id.as_str()) {
            return Err(ConfigError::MissingReference {
                kind: "classification",
                id: item.classification_id.clone(),
            });
        }
        if let Some(parent) = &item.parent {
            if !item_ids.contains(parent.as_str()) {
                return Err(ConfigError::MissingReference {
                    kind: "classification item",
                    id: parent.clone(),
                });
            }
        }
    }

    Ok(())
}
