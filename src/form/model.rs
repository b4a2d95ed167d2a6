//! Request and rendered model types of the form builder.

use crate::config::{DisplayType, EntityDisplayMeta, DIVIDER};
use crate::error::FormError;
use crate::service::PickOption;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
    View,
}

/// One build call. A slave-entity create carries its master record id explicitly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormRequest {
    pub entity: String,
    pub user: String,
    pub record: Option<String>,
    pub is_view: bool,
    pub master: Option<String>,
}

impl FormRequest {
    pub fn new(entity: impl Into<String>, user: impl Into<String>, record: Option<String>, is_view: bool) -> Self {
        FormRequest {
            entity: entity.into(),
            user: user.into(),
            record,
            is_view,
            master: None,
        }
    }

    pub fn create(entity: impl Into<String>, user: impl Into<String>) -> Self {
        Self::new(entity, user, None, false)
    }

    pub fn edit(entity: impl Into<String>, user: impl Into<String>, record: impl Into<String>) -> Self {
        Self::new(entity, user, Some(record.into()), false)
    }

    pub fn view(entity: impl Into<String>, user: impl Into<String>, record: impl Into<String>) -> Self {
        Self::new(entity, user, Some(record.into()), true)
    }

    pub fn with_master(mut self, master: impl Into<String>) -> Self {
        self.master = Some(master.into());
        self
    }

    /// No record means create, whatever `is_view` says.
    pub fn mode(&self) -> FormMode {
        match (&self.record, self.is_view) {
            (None, _) => FormMode::Create,
            (Some(_), true) => FormMode::View,
            (Some(_), false) => FormMode::Edit,
        }
    }
}

/// A resolved field slot. Overlay keys with no typed slot ride along in `extra`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldElement {
    pub field: String,
    pub label: String,
    #[serde(rename = "type")]
    pub display_type: DisplayType,
    pub nullable: bool,
    pub readonly: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<PickOption>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_level: Option<i32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FieldElement {
    pub fn new(field: impl Into<String>, label: impl Into<String>, display_type: DisplayType, nullable: bool) -> Self {
        FieldElement {
            field: field.into(),
            label: label.into(),
            display_type,
            nullable,
            readonly: false,
            value: None,
            options: None,
            date_format: None,
            datetime_format: None,
            open_level: None,
            extra: Map::new(),
        }
    }

    /// The format slot matching this element's type, if it has one.
    pub fn format_slot(&mut self) -> Option<&mut Option<String>> {
        match self.display_type {
            DisplayType::Date => Some(&mut self.date_format),
            DisplayType::Datetime => Some(&mut self.datetime_format),
            _ => None,
        }
    }
}

/// Section break; only rendered in view mode.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DividerElement {
    pub field: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DividerElement {
    pub fn new(extra: Map<String, Value>) -> Self {
        DividerElement {
            field: DIVIDER.to_string(),
            extra,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RenderedElement {
    Field(FieldElement),
    Divider(DividerElement),
}

impl RenderedElement {
    pub fn field_name(&self) -> &str {
        match self {
            RenderedElement::Field(f) => &f.field,
            RenderedElement::Divider(d) => &d.field,
        }
    }

    pub fn as_field(&self) -> Option<&FieldElement> {
        match self {
            RenderedElement::Field(f) => Some(f),
            RenderedElement::Divider(_) => None,
        }
    }

    pub fn is_divider(&self) -> bool {
        matches!(self, RenderedElement::Divider(_))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedFormModel {
    pub entity: String,
    pub elements: Vec<RenderedElement>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_slave: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_master: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slave_meta: Option<EntityDisplayMeta>,
    /// Epoch milliseconds of the loaded record's `modifiedOn`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<i64>,
}

impl RenderedFormModel {
    pub fn element(&self, field: &str) -> Option<&FieldElement> {
        self.elements
            .iter()
            .filter_map(RenderedElement::as_field)
            .find(|f| f.field == field)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.elements.iter().map(RenderedElement::field_name).collect()
    }
}

/// Result of a build that got past invocation checks: a model, or an error the client shows inline.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum FormOutcome {
    Model(RenderedFormModel),
    Error(FormError),
}

impl FormOutcome {
    pub fn model(&self) -> Option<&RenderedFormModel> {
        match self {
            FormOutcome::Model(m) => Some(m),
            FormOutcome::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&FormError> {
        match self {
            FormOutcome::Model(_) => None,
            FormOutcome::Error(e) => Some(e),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, FormOutcome::Error(_))
    }
}

impl From<FormError> for FormOutcome {
    fn from(e: FormError) -> Self {
        FormOutcome::Error(e)
    }
}
