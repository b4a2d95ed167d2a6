mod common;

use common::*;
use form_model_sdk::config::{DisplayType, FieldDefinition, LayoutConfig, DIVIDER};
use form_model_sdk::error::{DeniedAction, FormErrorKind};
use form_model_sdk::form::{augment, creation_value, FieldElement};
use form_model_sdk::{AppError, FormOutcome, FormRequest, Locale, OptionCatalog, RenderedFormModel};
use serde_json::json;

fn model(outcome: FormOutcome) -> RenderedFormModel {
    match outcome {
        FormOutcome::Model(m) => m,
        FormOutcome::Error(e) => panic!("expected a model, got error: {}", e),
    }
}

fn error_kind(outcome: &FormOutcome) -> FormErrorKind {
    outcome.error().expect("expected a form error").kind
}

#[tokio::test]
async fn create_contact_populates_defaults_and_system_values() {
    let h = harness();
    h.layouts.put(layout("Contact", &["name", "status", "createdOn"])).unwrap();

    let out = h.builder.build_at(&FormRequest::create("Contact", ANN), now()).await.unwrap();
    let m = model(out);

    assert_eq!(m.field_names(), vec!["name", "status", "createdOn"]);
    let name = m.element("name").unwrap();
    assert_eq!(name.value, None);
    assert!(!name.readonly);
    assert!(!name.nullable);

    let status = m.element("status").unwrap();
    assert_eq!(status.value, Some(json!("A")));
    assert!(!status.readonly);
    assert_eq!(status.options.as_ref().map(Vec::len), Some(2));

    let created = m.element("createdOn").unwrap();
    assert_eq!(created.value, Some(json!("2024-06-01 12:00:00")));
    assert!(created.readonly);
    assert_eq!(created.datetime_format.as_deref(), Some("yyyy-MM-dd HH:mm:ss"));
    assert_eq!(m.last_modified, None);
}

#[tokio::test]
async fn view_resolves_choice_label() {
    let h = harness();
    h.layouts.put(layout("Contact", &["name", "status", "createdOn"])).unwrap();
    h.records.insert("c-1", contact_record()).unwrap();

    let m = model(h.builder.build_at(&FormRequest::view("Contact", ANN, "c-1"), now()).await.unwrap());

    let status = m.element("status").unwrap();
    assert_eq!(status.value, Some(json!("Blocked")));
    assert!(!status.readonly);
    assert!(m.element("createdOn").unwrap().readonly);
    assert_eq!(m.element("createdOn").unwrap().value, Some(json!("2024-03-01 09:00:00")));
    assert_eq!(m.last_modified, Some(1_709_287_200_000));
}

#[test]
fn choice_without_default_option_has_no_initial_value() {
    let mut config = config();
    for o in &mut config.pick_lists {
        o.default = false;
    }
    let catalog = OptionCatalog::from_config(&config);
    let f = FieldDefinition::new("status", DisplayType::Picklist);
    let mut e = FieldElement::new("status", "Status", f.display_type, true);
    augment(&mut e, "Contact", &f, &catalog);
    assert_eq!(e.options.as_ref().map(Vec::len), Some(2));
    assert_eq!(creation_value(&e, &f, None, Locale::En, now()), None);
}

#[tokio::test]
async fn dividers_only_survive_in_view_mode() {
    let h = harness();
    h.layouts.put(layout("Contact", &["name", DIVIDER, "status"])).unwrap();
    h.records.insert("c-1", contact_record()).unwrap();

    let create = model(h.builder.build_at(&FormRequest::create("Contact", ANN), now()).await.unwrap());
    let edit = model(h.builder.build_at(&FormRequest::edit("Contact", ANN, "c-1"), now()).await.unwrap());
    let view = model(h.builder.build_at(&FormRequest::view("Contact", ANN, "c-1"), now()).await.unwrap());

    assert_eq!(create.field_names(), vec!["name", "status"]);
    assert_eq!(edit.field_names(), vec!["name", "status"]);
    assert_eq!(view.field_names(), vec!["name", DIVIDER, "status"]);
    assert!(view.elements[1].is_divider());
}

#[tokio::test]
async fn removed_fields_are_dropped_without_aborting() {
    let h = harness();
    h.layouts.put(layout("Contact", &["name", "faxNumber", "status"])).unwrap();

    let m = model(h.builder.build_at(&FormRequest::create("Contact", ANN), now()).await.unwrap());
    assert_eq!(m.field_names(), vec!["name", "status"]);
}

#[tokio::test]
async fn layout_missing_or_emptied_is_not_configured() {
    let h = harness();
    let out = h.builder.build_at(&FormRequest::create("Contact", ANN), now()).await.unwrap();
    assert_eq!(error_kind(&out), FormErrorKind::NotConfigured);

    h.layouts.put(layout("Contact", &[])).unwrap();
    let out = h.builder.build_at(&FormRequest::create("Contact", ANN), now()).await.unwrap();
    assert_eq!(error_kind(&out), FormErrorKind::NotConfigured);

    h.layouts.put(layout("Contact", &["faxNumber", DIVIDER])).unwrap();
    let out = h.builder.build_at(&FormRequest::create("Contact", ANN), now()).await.unwrap();
    assert_eq!(error_kind(&out), FormErrorKind::NotConfigured);
}

#[tokio::test]
async fn revoked_read_access_reads_as_unavailable() {
    let h = harness();
    h.layouts.put(layout("Contact", &["name", "status"])).unwrap();
    h.records.insert("c-1", contact_record()).unwrap();
    h.records.hide_from(ANN, "c-1").unwrap();

    let out = h.builder.build_at(&FormRequest::view("Contact", ANN, "c-1"), now()).await.unwrap();
    assert_eq!(error_kind(&out), FormErrorKind::RecordUnavailable);
    let body = serde_json::to_value(&out).unwrap();
    assert!(body.get("elements").is_none());
    assert!(body["error"].is_string());

    let out = h.builder.build_at(&FormRequest::view("Contact", ANN, "c-404"), now()).await.unwrap();
    assert_eq!(error_kind(&out), FormErrorKind::RecordUnavailable);
}

#[tokio::test]
async fn permission_denials_are_distinct_outcomes() {
    let h = harness();
    h.layouts.put(layout("Contact", &["name"])).unwrap();
    h.records.insert("c-1", contact_record()).unwrap();
    h.permissions.deny_create("Contact").unwrap();
    h.permissions.deny_read("Contact").unwrap();
    h.permissions.deny_update("Contact").unwrap();

    let create = h.builder.build_at(&FormRequest::create("Contact", ANN), now()).await.unwrap();
    let view = h.builder.build_at(&FormRequest::view("Contact", ANN, "c-1"), now()).await.unwrap();
    let edit = h.builder.build_at(&FormRequest::edit("Contact", ANN, "c-1"), now()).await.unwrap();

    assert_eq!(error_kind(&create), FormErrorKind::PermissionDenied(DeniedAction::Create));
    assert_eq!(error_kind(&view), FormErrorKind::PermissionDenied(DeniedAction::Read));
    assert_eq!(error_kind(&edit), FormErrorKind::PermissionDenied(DeniedAction::Update));
    assert_ne!(create.error().unwrap().error, view.error().unwrap().error);
}

#[tokio::test]
async fn numbers_group_in_view_and_round_trip_in_edit() {
    let h = harness();
    h.layouts.put(layout("Contact", &["amount", "visits"])).unwrap();
    h.records.insert("c-1", contact_record()).unwrap();

    let view = model(h.builder.build_at(&FormRequest::view("Contact", ANN, "c-1"), now()).await.unwrap());
    let edit = model(h.builder.build_at(&FormRequest::edit("Contact", ANN, "c-1"), now()).await.unwrap());

    assert_eq!(view.element("amount").unwrap().value, Some(json!("1,234,567.50")));
    assert_eq!(view.element("visits").unwrap().value, Some(json!("1,234,567")));
    assert_eq!(edit.element("amount").unwrap().value, Some(json!("1234567.50")));
    let visits = edit.element("visits").unwrap().value.clone().unwrap();
    assert_eq!(visits.as_str().unwrap().parse::<i64>().unwrap(), 1234567);
}

#[tokio::test]
async fn readonly_follows_mode_and_mutability() {
    let h = harness();
    let fields = ["name", "status", "createdOn", "code", "owningUser", "due"];
    h.layouts.put(layout("Contact", &fields)).unwrap();
    h.records.insert("c-1", contact_record()).unwrap();
    let metadata = h.builder.metadata();
    let contact = metadata.entity("Contact").unwrap();

    let create = model(h.builder.build_at(&FormRequest::create("Contact", ANN), now()).await.unwrap());
    let edit = model(h.builder.build_at(&FormRequest::edit("Contact", ANN, "c-1"), now()).await.unwrap());
    let view = model(h.builder.build_at(&FormRequest::view("Contact", ANN, "c-1"), now()).await.unwrap());

    for name in fields {
        let f = contact.field(name).unwrap();
        assert_eq!(create.element(name).unwrap().readonly, !f.creatable, "create {}", name);
        assert_eq!(edit.element(name).unwrap().readonly, !f.updatable, "edit {}", name);
        assert_eq!(view.element(name).unwrap().readonly, !f.updatable, "view {}", name);
    }
}

#[tokio::test]
async fn booleans_are_text_in_view_and_tokens_in_edit() {
    let h = harness();
    h.layouts.put(layout("Contact", &["active"])).unwrap();
    h.records.insert("c-1", contact_record()).unwrap();

    let view = model(h.builder.build_at(&FormRequest::view("Contact", ANN, "c-1"), now()).await.unwrap());
    let edit = model(h.builder.build_at(&FormRequest::edit("Contact", ANN, "c-1"), now()).await.unwrap());
    let create = model(h.builder.build_at(&FormRequest::create("Contact", ANN), now()).await.unwrap());

    assert_eq!(view.element("active").unwrap().value, Some(json!("Yes")));
    assert_eq!(edit.element("active").unwrap().value, Some(json!("T")));
    assert_eq!(create.element("active").unwrap().value, Some(json!("T")));
}

#[tokio::test]
async fn reference_and_classification_values() {
    let h = harness();
    h.layouts.put(layout("Contact", &["owningUser", "region"])).unwrap();
    h.records.insert("c-1", contact_record()).unwrap();

    let edit = model(h.builder.build_at(&FormRequest::edit("Contact", ANN, "c-1"), now()).await.unwrap());
    assert_eq!(edit.element("owningUser").unwrap().value, Some(json!(["u1", "Ann Lee", "User"])));
    let region = edit.element("region").unwrap();
    assert_eq!(region.value, Some(json!(["cn", "Asia.China"])));
    assert_eq!(region.open_level, Some(3));

    let view = model(h.builder.build_at(&FormRequest::view("Contact", ANN, "c-1"), now()).await.unwrap());
    assert_eq!(view.element("region").unwrap().value, Some(json!("Asia.China")));
}

#[tokio::test]
async fn new_record_gets_user_and_department_stamps() {
    let h = harness();
    h.layouts.put(layout("Contact", &["owningUser", "owningDept", "due", "code"])).unwrap();

    let m = model(h.builder.build_at(&FormRequest::create("Contact", ANN), now()).await.unwrap());
    assert_eq!(m.element("owningUser").unwrap().value, Some(json!(["u1", "Ann Lee", "User"])));
    assert_eq!(m.element("owningDept").unwrap().value, Some(json!(["d1", "Sales", "Department"])));
    assert_eq!(m.element("due").unwrap().value, Some(json!("2024-06-04")));
    assert_eq!(m.element("code").unwrap().value, Some(json!(Locale::En.series_placeholder())));

    let err = h.builder.build_at(&FormRequest::create("Contact", "ghost"), now()).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidInvocation(_)));
}

#[tokio::test]
async fn master_and_slave_flags() {
    let h = harness();
    h.layouts.put(layout("Order", &["title"])).unwrap();
    h.layouts.put(layout("OrderLine", &["product", "qty"])).unwrap();

    let order = model(h.builder.build_at(&FormRequest::create("Order", ANN), now()).await.unwrap());
    assert!(order.is_master);
    assert!(!order.is_slave);
    let meta = order.slave_meta.as_ref().unwrap();
    assert_eq!(meta.entity, "OrderLine");
    assert_eq!(meta.entity_label, "Order lines");

    let req = FormRequest::create("OrderLine", ANN).with_master("o-1");
    let line = model(h.builder.build_at(&req, now()).await.unwrap());
    assert!(line.is_slave);
    assert!(!line.is_master);
    assert!(line.slave_meta.is_none());
}

#[tokio::test]
async fn slave_create_checks_update_on_master() {
    let h = harness();
    h.layouts.put(layout("OrderLine", &["product"])).unwrap();

    let err = h.builder.build_at(&FormRequest::create("OrderLine", ANN), now()).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidInvocation(_)));

    h.permissions.deny_update("Order").unwrap();
    let out = h
        .builder
        .build_at(&FormRequest::create("OrderLine", ANN).with_master("o-1"), now())
        .await
        .unwrap();
    assert_eq!(error_kind(&out), FormErrorKind::PermissionDenied(DeniedAction::CreateDetail));
}

#[tokio::test]
async fn invalid_invocations_are_faults() {
    let h = harness();
    let err = h.builder.build_at(&FormRequest::create("Nope", ANN), now()).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidInvocation(_)));
    let err = h.builder.build_at(&FormRequest::create("Contact", " "), now()).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidInvocation(_)));
}

#[tokio::test]
async fn own_layout_takes_precedence_and_overlays_merge() {
    let h = harness();
    h.layouts.put(layout("Contact", &["name"])).unwrap();
    h.layouts
        .put(LayoutConfig {
            id: "mine".into(),
            entity: "Contact".into(),
            applies_to: Some(ANN.into()),
            elements: vec![
                element("name", json!({ "label": "Full name", "readonly": true, "hint_text": "as on ID" })),
                element("phone", json!({})),
            ],
        })
        .unwrap();

    let m = model(h.builder.build_at(&FormRequest::create("Contact", ANN), now()).await.unwrap());
    assert_eq!(m.field_names(), vec!["name", "phone"]);
    let name = m.element("name").unwrap();
    assert_eq!(name.label, "Full name");
    assert!(!name.readonly);
    assert_eq!(name.extra.get("hintText"), Some(&json!("as on ID")));
    assert_eq!(m.element("phone").unwrap().extra.get("placeholder"), Some(&json!("+1 555")));

    let body = serde_json::to_value(FormOutcome::Model(m)).unwrap();
    assert!(body.get("id").is_none());
    assert_eq!(body["elements"][0]["hintText"], json!("as on ID"));
}

#[tokio::test]
async fn errors_are_localized() {
    let h = harness_with_locale(Locale::Zh);
    let out = h.builder.build_at(&FormRequest::create("Contact", ANN), now()).await.unwrap();
    assert_eq!(out.error().unwrap().error, "此表单布局尚未配置，请配置后使用");
}

#[tokio::test]
async fn convenience_entry_points_match_build() {
    let h = harness();
    h.layouts.put(layout("Contact", &["name", DIVIDER, "status"])).unwrap();
    h.records.insert("c-1", contact_record()).unwrap();

    let view = model(h.builder.build_view("Contact", ANN, "c-1").await.unwrap());
    assert_eq!(view.field_names(), vec!["name", DIVIDER, "status"]);
    let edit = model(h.builder.build_form("Contact", ANN, Some("c-1"), None).await.unwrap());
    assert_eq!(edit.element("status").unwrap().value, Some(json!("B")));
    let create = model(h.builder.build_form("Contact", ANN, None, None).await.unwrap());
    assert_eq!(create.element("status").unwrap().value, Some(json!("A")));
}

#[tokio::test]
async fn field_schema_extension_wins_over_layout_element() {
    let h = harness();
    h.layouts
        .put(LayoutConfig {
            id: "layout-Contact".into(),
            entity: "Contact".into(),
            applies_to: None,
            elements: vec![element("phone", json!({ "placeholder": "from layout", "mask": "999-9999" }))],
        })
        .unwrap();

    let m = model(h.builder.build_at(&FormRequest::create("Contact", ANN), now()).await.unwrap());
    let phone = m.element("phone").unwrap();
    assert_eq!(phone.extra.get("placeholder"), Some(&json!("+1 555")));
    assert_eq!(phone.extra.get("mask"), Some(&json!("999-9999")));
}

#[tokio::test]
async fn divider_extension_is_normalised() {
    let h = harness();
    h.layouts
        .put(LayoutConfig {
            id: "layout-Contact".into(),
            entity: "Contact".into(),
            applies_to: None,
            elements: vec![
                element("name", json!({})),
                element(DIVIDER, json!({ "field": "name", "section_title": "Billing" })),
            ],
        })
        .unwrap();
    h.records.insert("c-1", contact_record()).unwrap();

    let view = model(h.builder.build_at(&FormRequest::view("Contact", ANN, "c-1"), now()).await.unwrap());
    let body = serde_json::to_value(FormOutcome::Model(view)).unwrap();
    assert_eq!(body["elements"][1], json!({ "field": DIVIDER, "sectionTitle": "Billing" }));
}
