//! FormsBuilder: entity schema + layout + permissions + record into a rendered form model.

use crate::config::{
    DisplayType, EntityDefinition, FieldDefinition, LayoutElement, MetadataRegistry, CREATED_BY, CREATED_ON, MODIFIED_BY,
    MODIFIED_ON, OWNING_DEPT, OWNING_USER,
};
use crate::error::{AppError, DeniedAction, FormError};
use crate::form::{
    augment, creation_value, divider_extra, merge_overlay, DividerElement, FieldElement, FormMode, FormOutcome,
    FormRequest, RenderedElement, RenderedFormModel,
};
use crate::locale::Locale;
use crate::service::{
    FieldValueWrapper, LayoutStore, OptionResolver, PermissionOracle, QueryExecutor, Record, RecordFetcher,
    UserContext, UserStore, DATETIME_FORMAT,
};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::sync::Arc;

const USER_ENTITY: &str = "User";
const DEPARTMENT_ENTITY: &str = "Department";

/// Builds create, edit and view models. Holds no per-call state; share it behind an `Arc`.
pub struct FormsBuilder {
    metadata: Arc<MetadataRegistry>,
    permissions: Arc<dyn PermissionOracle>,
    layouts: Arc<dyn LayoutStore>,
    options: Arc<dyn OptionResolver>,
    fetcher: RecordFetcher,
    users: Arc<dyn UserStore>,
    locale: Locale,
}

impl FormsBuilder {
    pub fn new(
        metadata: Arc<MetadataRegistry>,
        permissions: Arc<dyn PermissionOracle>,
        layouts: Arc<dyn LayoutStore>,
        options: Arc<dyn OptionResolver>,
        executor: Arc<dyn QueryExecutor>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        FormsBuilder {
            metadata,
            permissions,
            layouts,
            options,
            fetcher: RecordFetcher::new(executor),
            users,
            locale: Locale::default(),
        }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn metadata(&self) -> &MetadataRegistry {
        &self.metadata
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Create (no record) or edit form. `master` is required when `entity` is a slave type.
    pub async fn build_form(
        &self,
        entity: &str,
        user: &str,
        record: Option<&str>,
        master: Option<&str>,
    ) -> Result<FormOutcome, AppError> {
        let mut req = FormRequest::new(entity, user, record.map(String::from), false);
        req.master = master.map(String::from);
        self.build(&req).await
    }

    pub async fn build_view(&self, entity: &str, user: &str, record: &str) -> Result<FormOutcome, AppError> {
        self.build(&FormRequest::view(entity, user, record)).await
    }

    pub async fn build(&self, req: &FormRequest) -> Result<FormOutcome, AppError> {
        self.build_at(req, Utc::now()).await
    }

    /// `build` with the clock injected; `now` feeds system timestamps and default expressions.
    pub async fn build_at(&self, req: &FormRequest, now: DateTime<Utc>) -> Result<FormOutcome, AppError> {
        check_invocation(req)?;
        let entity = self.metadata.get_entity(&req.entity)?;
        let mode = req.mode();

        if let Some(denied) = self.check_permission(entity, req, mode).await? {
            tracing::debug!(entity = %entity.name, user = %req.user, ?mode, "form denied");
            return Ok(FormError::denied(denied, self.locale).into());
        }

        let layout = match self.layouts.layout(&entity.name, &req.user).await? {
            Some(l) if !l.elements.is_empty() => l,
            _ => return Ok(FormError::not_configured(self.locale).into()),
        };

        let record = match req.record.as_deref() {
            Some(id) => {
                let fields: Vec<&str> = layout.elements.iter().map(|e| e.field.as_str()).collect();
                match self.fetcher.fetch(&self.metadata, entity, &fields, id, &req.user).await? {
                    Some(r) => Some(r),
                    None => return Ok(FormError::record_unavailable(self.locale).into()),
                }
            }
            None => None,
        };

        let mut acting_user: Option<UserContext> = None;
        let mut elements = Vec::with_capacity(layout.elements.len());
        for el in &layout.elements {
            if el.is_divider() {
                if mode == FormMode::View {
                    elements.push(RenderedElement::Divider(DividerElement::new(divider_extra(&el.ext))));
                }
                continue;
            }
            let Some(field) = entity.field(&el.field) else {
                tracing::warn!(entity = %entity.name, field = %el.field, layout = %layout.id, "layout field not in schema, dropped");
                continue;
            };
            let mut element = self.render_field(entity, field, el, mode, record.as_ref(), now);
            if record.is_none() && !field.creatable && is_user_field(&field.name) && acting_user.is_none() {
                acting_user = Some(self.resolve_user(&req.user).await?);
            }
            if record.is_none() && !field.creatable {
                element.value = system_value(&field.name, now, acting_user.as_ref());
            }
            elements.push(RenderedElement::Field(element));
        }

        if elements.is_empty() {
            return Ok(FormError::not_configured(self.locale).into());
        }

        let mut model = RenderedFormModel {
            entity: entity.name.clone(),
            elements,
            is_slave: false,
            is_master: false,
            slave_meta: None,
            last_modified: record.as_ref().and_then(Record::last_modified),
        };
        if entity.master_entity.is_some() {
            model.is_slave = true;
        } else if let Some(slave) = entity.slave_entity.as_deref() {
            model.is_master = true;
            model.slave_meta = self.metadata.entity(slave).map(EntityDefinition::display_meta);
        }
        Ok(FormOutcome::Model(model))
    }

    /// The action refused for this mode, or `None` when the user may proceed.
    async fn check_permission(
        &self,
        entity: &EntityDefinition,
        req: &FormRequest,
        mode: FormMode,
    ) -> Result<Option<DeniedAction>, AppError> {
        let user = req.user.as_str();
        let allowed = match (mode, req.record.as_deref()) {
            (FormMode::Create, _) => match entity.master_entity.as_deref() {
                Some(master_name) => {
                    let master_id = req.master.as_deref().filter(|m| !m.trim().is_empty()).ok_or_else(|| {
                        AppError::InvalidInvocation(format!("creating {} requires a master record id", entity.name))
                    })?;
                    let master = self.metadata.get_entity(master_name)?;
                    (
                        self.permissions.can_update(user, master, master_id).await?,
                        DeniedAction::CreateDetail,
                    )
                }
                None => (self.permissions.can_create(user, entity).await?, DeniedAction::Create),
            },
            (FormMode::View, Some(id)) => (self.permissions.can_read(user, entity, id).await?, DeniedAction::Read),
            (FormMode::Edit, Some(id)) => (self.permissions.can_update(user, entity, id).await?, DeniedAction::Update),
            (_, None) => return Err(AppError::InvalidInvocation("record id required".into())),
        };
        Ok(match allowed {
            (true, _) => None,
            (false, action) => Some(action),
        })
    }

    fn render_field(
        &self,
        entity: &EntityDefinition,
        field: &FieldDefinition,
        el: &LayoutElement,
        mode: FormMode,
        record: Option<&Record>,
        now: DateTime<Utc>,
    ) -> FieldElement {
        let mut element = FieldElement::new(field.name.clone(), field.label.clone(), field.display_type, field.nullable);
        element.readonly = is_readonly(field, record.is_some());
        merge_overlay(&mut element, &el.ext);
        merge_overlay(&mut element, &field.ext);
        let format_len = augment(&mut element, &entity.name, field, self.options.as_ref());

        match record {
            Some(r) => {
                let wrapper = FieldValueWrapper::new(self.options.as_ref(), self.locale);
                let is_view = mode == FormMode::View;
                element.value = wrapper
                    .wrap_field(r, field, is_view)
                    .map(|v| if is_view { v } else { self.encode_for_edit(field, v) });
            }
            None if field.creatable => {
                element.value = creation_value(&element, field, format_len, self.locale, now);
            }
            None => {}
        }
        element
    }

    /// Booleans leave the wrapper as localized text; edit forms post back `T`/`F`.
    fn encode_for_edit(&self, field: &FieldDefinition, value: Value) -> Value {
        if field.display_type != DisplayType::Bool {
            return value;
        }
        let on = value.as_str() == Some(self.locale.bool_text(true));
        Value::String(if on { "T" } else { "F" }.to_string())
    }

    async fn resolve_user(&self, user: &str) -> Result<UserContext, AppError> {
        self.users
            .resolve(user)
            .await?
            .ok_or_else(|| AppError::InvalidInvocation(format!("unknown user: {}", user)))
    }
}

fn check_invocation(req: &FormRequest) -> Result<(), AppError> {
    if req.entity.trim().is_empty() {
        return Err(AppError::InvalidInvocation("entity name is required".into()));
    }
    if req.user.trim().is_empty() {
        return Err(AppError::InvalidInvocation("user id is required".into()));
    }
    if matches!(req.record.as_deref(), Some(r) if r.trim().is_empty()) {
        return Err(AppError::InvalidInvocation("record id is empty".into()));
    }
    Ok(())
}

/// Loaded records follow `updatable`, new ones `creatable`.
pub fn is_readonly(field: &FieldDefinition, record_loaded: bool) -> bool {
    if record_loaded {
        !field.updatable
    } else {
        !field.creatable
    }
}

fn is_user_field(name: &str) -> bool {
    matches!(name, CREATED_BY | MODIFIED_BY | OWNING_USER | OWNING_DEPT)
}

/// Value stamped by the system on a field the user cannot set at creation.
fn system_value(name: &str, now: DateTime<Utc>, user: Option<&UserContext>) -> Option<Value> {
    match name {
        CREATED_ON | MODIFIED_ON => Some(Value::String(now.format(DATETIME_FORMAT).to_string())),
        CREATED_BY | MODIFIED_BY | OWNING_USER => user.map(|u| json!([u.id, u.full_name, USER_ENTITY])),
        OWNING_DEPT => user
            .and_then(|u| u.department.as_ref())
            .map(|d| json!([d.id, d.name, DEPARTMENT_ENTITY])),
        _ => None,
    }
}
