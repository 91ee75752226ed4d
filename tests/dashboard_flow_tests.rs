//! End-to-end tests simulating a dashboard session
//!
//! Login, role-dependent controls, editing with drafts, assignment,
//! the home-page overview and sharing, all against in-memory services.

use desk::core::error::{AuthError, DeskError};
use desk::entities::forms::MeasurementDraft;
use desk::prelude::*;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
}

fn normal_session() -> Session {
    Session::new(
        "field_token",
        SessionUser {
            user_id: Some("7".to_string()),
            email: "field@demo.com".to_string(),
            role: Some("normal".to_string()),
        },
    )
}

async fn seeded() -> (InMemoryRecordService<Measurement>, InMemoryRecordService<User>) {
    let mut raj = Measurement::new("Raj Kumar", "9876543210", "12 MG Road");
    raj.id = Some(RecordId::Int(1));
    raj.measurement_date = Some("2024-03-12T00:00:00.000Z".to_string());
    raj.status = Some(MeasurementStatus::Created);
    raj.areas = vec![Area {
        area_name: "Hall".to_string(),
        height: Some(2.0),
        width: Some(4.0),
        notes: String::new(),
        photo_urls: vec!["/uploads/hall.jpg".to_string()],
    }];

    let mut done = Measurement::new("Carl", "9000000003", "1 Hill Road");
    done.id = Some(RecordId::Int(2));
    done.status = Some(MeasurementStatus::Approved);

    let mut field_user = User::new("Asha", "Rao", "98765-43210").with_role(Role::Normal);
    field_user.user_id = Some(RecordId::Int(7));
    let admin = User::new("Admin", "Desk", "9999999999").with_role(Role::Admin);

    (
        InMemoryRecordService::with_entities([raj, done]).unwrap(),
        InMemoryRecordService::with_entities([field_user, admin]).unwrap(),
    )
}

#[tokio::test]
async fn test_admin_login_and_assignment() {
    let session = StaticAuthenticator::default()
        .login(&LoginForm::new("admin@demo.com", "admin123"))
        .await
        .unwrap();
    assert!(session.is_authenticated());
    let capabilities = session.capabilities();

    let (measurements, users) = seeded().await;
    let mut raj = measurements.get(&RecordId::Int(1)).await.unwrap();

    let assignee = assignable_users(&users.list().await.unwrap())
        .into_iter()
        .next()
        .unwrap();
    let assignee_id = assignee.user_id.clone().unwrap();

    capabilities
        .require(Some(raj.status()), Action::AssignUser)
        .unwrap();
    raj.assign_to(assignee_id.clone());
    let saved = measurements.update(&RecordId::Int(1), raj).await.unwrap();
    assert_eq!(saved.status(), MeasurementStatus::Assigned);
    assert_eq!(saved.user_id, Some(assignee_id));

    let link = WhatsAppLink::build(&assignee, &saved, Platform::Mobile)
        .unwrap()
        .unwrap();
    assert!(link.url.starts_with("https://api.whatsapp.com/send?phone=919876543210&text="));
    assert!(link.message.contains("📅 Date: 12/03/2024"));
}

#[tokio::test]
async fn test_wrong_password_is_rejected() {
    let err = StaticAuthenticator::default()
        .login(&LoginForm::new("admin@demo.com", "wrong-password"))
        .await
        .unwrap_err();
    assert!(matches!(err, DeskError::Auth(AuthError::InvalidCredentials)));
}

#[tokio::test]
async fn test_approved_record_is_read_only() {
    let (measurements, _) = seeded().await;
    let approved = measurements.get(&RecordId::Int(2)).await.unwrap();

    let admin = Capabilities::for_role(Role::Admin);
    let allowed = admin.allowed_actions(Some(approved.status()));
    assert_eq!(
        allowed.into_iter().collect::<Vec<_>>(),
        vec![Action::View, Action::Delete, Action::Share]
    );

    let mut form = MeasurementForm::from_measurement(&approved, "http://backend", today());
    form.name = "Carl Dsouza".to_string();
    assert!(matches!(
        form.ensure_allowed(Some(&approved), &admin),
        Err(AuthError::Forbidden { .. })
    ));
}

#[tokio::test]
async fn test_field_user_edits_areas_only() {
    let session = normal_session();
    let capabilities = session.capabilities();
    let (measurements, _) = seeded().await;
    let original = measurements.get(&RecordId::Int(1)).await.unwrap();

    // Areas and photos are open to field users
    let mut form = MeasurementForm::from_measurement(&original, "http://backend", today());
    form.areas[0].notes = "Measured twice".to_string();
    form.add_area();
    form.areas[1].area_name = "Bedroom".to_string();
    form.areas[1].height = "2.7".to_string();
    form.areas[1].width = "3.1".to_string();
    form.ensure_allowed(Some(&original), &capabilities).unwrap();

    // Customer details are not
    let mut form = MeasurementForm::from_measurement(&original, "http://backend", today());
    form.address = "13 MG Road".to_string();
    match form.ensure_allowed(Some(&original), &capabilities) {
        Err(AuthError::Forbidden { role, action }) => {
            assert_eq!(role, "normal");
            assert_eq!(action, Action::EditCustomerDetails.as_str());
        }
        other => panic!("expected Forbidden, got {other:?}"),
    }

    // Nor is creating
    let blank = MeasurementForm::new(today());
    assert!(blank.ensure_allowed(None, &capabilities).is_err());
}

#[tokio::test]
async fn test_form_draft_survives_navigation() {
    let (measurements, _) = seeded().await;
    let original = measurements.get(&RecordId::Int(1)).await.unwrap();
    let drafts = DraftStore::new();

    let mut form = MeasurementForm::from_measurement(&original, "http://backend", today());
    form.areas[0].notes = "Check skirting".to_string();
    form.add_photos(0, vec![PhotoUpload::captured(vec![1, 2, 3])], 102_400)
        .unwrap();
    drafts.save(MEASUREMENT_FORM_DRAFT, &form.to_draft()).unwrap();

    let draft: MeasurementDraft = drafts.load(MEASUREMENT_FORM_DRAFT).unwrap().unwrap();
    let restored = MeasurementForm::from_draft(draft);
    assert_eq!(restored.measurement_date, "2024-03-12");
    assert_eq!(restored.areas[0].notes, "Check skirting");
    // Only the stored photo comes back
    assert_eq!(restored.areas[0].photos.len(), 1);
    assert_eq!(
        restored.areas[0].photos[0].preview(),
        "http://backend/uploads/hall.jpg"
    );

    drafts.clear(MEASUREMENT_FORM_DRAFT).unwrap();
    assert!(drafts
        .load::<MeasurementDraft>(MEASUREMENT_FORM_DRAFT)
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_overview_per_role() {
    let (measurements, users) = seeded().await;
    let all = measurements.list().await.unwrap();
    let directory = users.list().await.unwrap();

    let admin = Overview::compute(Role::Admin, &all, &directory);
    assert_eq!(admin.total_users, 2);
    assert_eq!(admin.total_measurements, 2);
    assert_eq!(admin.status_breakdown.len(), 4);

    let field = Overview::compute(normal_session().role(), &all, &directory);
    assert_eq!(field.status_breakdown.len(), 2);
    assert!(field.timeline.is_empty());
}

#[tokio::test]
async fn test_user_directory_listing() {
    let (_, users) = seeded().await;
    let records = to_records(&users.list().await.unwrap()).unwrap();
    let engine = QueryEngine::new(RecordSchema::user());

    let mut table = TableState::for_engine(&engine, &TableConfig::default());
    table.set_text("rao");
    let view = table.view(&engine, &records);
    assert_eq!(view.filtered_len, 1);
    assert_eq!(view.rows[0].get_str("first_name"), Some("Asha"));

    table.set_text("");
    let first_names = |table: &TableState| -> Vec<String> {
        table
            .view(&engine, &records)
            .rows
            .iter()
            .filter_map(|r| r.get_str("first_name").map(str::to_string))
            .collect()
    };
    // Already ascending on first_name, so one click flips to descending
    assert_eq!(first_names(&table), vec!["Admin", "Asha"]);
    table.request_sort("first_name");
    assert_eq!(first_names(&table), vec!["Asha", "Admin"]);
    table.request_sort("first_name");
    assert_eq!(first_names(&table), vec!["Admin", "Asha"]);
}
