//! Integration tests for entity CRUD operations.
//!
//! Exercises the full repository layer against a real database:
//! - Create / find / update across the entity families
//! - Partial-update (COALESCE) semantics, including the empty update
//! - NotFound on missing ids
//! - Category hierarchy validation (missing parents, cycles)
//! - User UUID generation and immutability

use assert_matches::assert_matches;
use sqlx::PgPool;

use stockdesk_core::error::CoreError;
use stockdesk_core::pagination::PageRequest;
use stockdesk_db::error::DbError;
use stockdesk_db::models::category::{CategoryFilter, CreateCategory, UpdateCategory};
use stockdesk_db::models::certificate::{CreateCertificate, UpdateCertificate};
use stockdesk_db::models::lookup::{CreateLookupItem, UpdateLookupItem};
use stockdesk_db::models::notification_template::CreateNotificationTemplate;
use stockdesk_db::models::user::{CreateUser, UpdateUser};
use stockdesk_db::repositories::{
    CategoryRepo, CertificateRepo, NotificationTemplateRepo, UserRepo, COLORS, MATERIALS,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_lookup(name: &str, code: Option<&str>) -> CreateLookupItem {
    CreateLookupItem {
        name: name.to_string(),
        code: code.map(str::to_string),
        description: None,
    }
}

fn new_category(name: &str, parent_id: Option<i64>) -> CreateCategory {
    CreateCategory {
        name: name.to_string(),
        code: None,
        description: None,
        parent_id,
    }
}

fn new_certificate(name: &str) -> CreateCertificate {
    CreateCertificate {
        name: name.to_string(),
        authority: "TUV".to_string(),
        issued_at: chrono::Utc::now(),
        expires_at: None,
        metadata: None,
    }
}

fn new_user(username: &str) -> CreateUser {
    CreateUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        display_name: None,
    }
}

// ---------------------------------------------------------------------------
// Test: lookup create and find round trip
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_lookup_create_and_find(pool: PgPool) {
    let created = COLORS
        .create(&pool, &new_lookup("Crimson", Some("CRM")))
        .await
        .unwrap();
    assert!(created.active, "new items must start active");
    assert_eq!(created.code.as_deref(), Some("CRM"));
    assert!(created.updated_at >= created.created_at);

    let found = COLORS.find_by_id(&pool, created.id).await.unwrap();
    assert_eq!(found.id, created.id);
    assert_eq!(found.name, "Crimson");

    assert!(COLORS.exists(&pool, created.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Test: find_by_id on an empty table is NotFound
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_by_id_missing_is_not_found(pool: PgPool) {
    let err = COLORS.find_by_id(&pool, 999).await.unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::NotFound { entity: "color", id: 999 }));
}

// ---------------------------------------------------------------------------
// Test: update applies only the supplied fields
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_partial_update_keeps_unset_fields(pool: PgPool) {
    let created = MATERIALS
        .create(
            &pool,
            &CreateLookupItem {
                name: "Oak".to_string(),
                code: Some("OAK".to_string()),
                description: Some("hardwood".to_string()),
            },
        )
        .await
        .unwrap();

    let updated = MATERIALS
        .update(
            &pool,
            created.id,
            &UpdateLookupItem {
                description: Some("solid hardwood".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Oak");
    assert_eq!(updated.code.as_deref(), Some("OAK"));
    assert_eq!(updated.description.as_deref(), Some("solid hardwood"));
    assert!(updated.updated_at >= created.updated_at);
}

// ---------------------------------------------------------------------------
// Test: empty update refreshes updated_at and nothing else
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_empty_update_is_a_touch(pool: PgPool) {
    let created = MATERIALS
        .create(&pool, &new_lookup("Pine", Some("PIN")))
        .await
        .unwrap();

    let updated = MATERIALS
        .update(&pool, created.id, &UpdateLookupItem::default())
        .await
        .unwrap();

    assert_eq!(updated.name, created.name);
    assert_eq!(updated.code, created.code);
    assert!(updated.updated_at >= created.updated_at);
    assert_eq!(updated.created_at, created.created_at);
}

// ---------------------------------------------------------------------------
// Test: update of a missing id is NotFound
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_is_not_found(pool: PgPool) {
    let err = MATERIALS
        .update(&pool, 4242, &UpdateLookupItem::default())
        .await
        .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::NotFound { id: 4242, .. }));
}

// ---------------------------------------------------------------------------
// Test: category parent must exist and be active
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_category_parent_must_exist(pool: PgPool) {
    let err = CategoryRepo::create(&pool, &new_category("Orphan", Some(999)))
        .await
        .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::Validation(_)));

    let parent = CategoryRepo::create(&pool, &new_category("Electronics", None))
        .await
        .unwrap();
    CategoryRepo::remove(&pool, parent.id).await.unwrap();

    // A soft-deleted parent is not a valid reference either.
    let err = CategoryRepo::create(&pool, &new_category("Phones", Some(parent.id)))
        .await
        .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::Validation(_)));
}

// ---------------------------------------------------------------------------
// Test: re-parenting may not form a cycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_category_cycle_is_rejected(pool: PgPool) {
    let a = CategoryRepo::create(&pool, &new_category("Tools", None))
        .await
        .unwrap();
    let b = CategoryRepo::create(&pool, &new_category("Hand Tools", Some(a.id)))
        .await
        .unwrap();

    // a -> b would close the loop a -> b -> a.
    let err = CategoryRepo::update(
        &pool,
        a.id,
        &UpdateCategory {
            parent_id: Some(b.id),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::Validation(_)));

    // Self-parenting is the one-node cycle.
    let err = CategoryRepo::update(
        &pool,
        a.id,
        &UpdateCategory {
            parent_id: Some(a.id),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::Validation(_)));

    // A legitimate re-parent still works.
    let c = CategoryRepo::create(&pool, &new_category("Garden", None))
        .await
        .unwrap();
    let moved = CategoryRepo::update(
        &pool,
        b.id,
        &UpdateCategory {
            parent_id: Some(c.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(moved.parent_id, Some(c.id));
}

// ---------------------------------------------------------------------------
// Test: children listing and parent filter agree
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_category_children(pool: PgPool) {
    let parent = CategoryRepo::create(&pool, &new_category("Furniture", None))
        .await
        .unwrap();
    let chair = CategoryRepo::create(&pool, &new_category("Chairs", Some(parent.id)))
        .await
        .unwrap();
    CategoryRepo::create(&pool, &new_category("Tables", Some(parent.id)))
        .await
        .unwrap();

    let children = CategoryRepo::list_children(&pool, parent.id).await.unwrap();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].name, "Chairs");

    let filtered = CategoryRepo::find_all(
        &pool,
        &CategoryFilter {
            parent_id: Some(parent.id),
            ..Default::default()
        },
        &PageRequest::default(),
    )
    .await
    .unwrap();
    assert_eq!(filtered.total, 2);

    // Soft-deleting a child hides it from both paths.
    CategoryRepo::remove(&pool, chair.id).await.unwrap();
    let children = CategoryRepo::list_children(&pool, parent.id).await.unwrap();
    assert_eq!(children.len(), 1);
}

// ---------------------------------------------------------------------------
// Test: certificate metadata defaults and updates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_certificate_crud(pool: PgPool) {
    let created = CertificateRepo::create(&pool, &new_certificate("CE 2026-001"))
        .await
        .unwrap();
    assert_eq!(created.metadata, serde_json::json!({}));
    assert!(created.expires_at.is_none());

    let updated = CertificateRepo::update(
        &pool,
        created.id,
        &UpdateCertificate {
            metadata: Some(serde_json::json!({"scan": "s3://certs/001.pdf"})),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.metadata["scan"], "s3://certs/001.pdf");
    assert_eq!(updated.name, "CE 2026-001");
}

// ---------------------------------------------------------------------------
// Test: notification template round trip
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_notification_template_crud(pool: PgPool) {
    let created = NotificationTemplateRepo::create(
        &pool,
        &CreateNotificationTemplate {
            name: "loan-overdue".to_string(),
            subject: "Asset overdue".to_string(),
            body: "Please return the asset.".to_string(),
        },
    )
    .await
    .unwrap();

    let found = NotificationTemplateRepo::find_by_id(&pool, created.id)
        .await
        .unwrap();
    assert_eq!(found.subject, "Asset overdue");
}

// ---------------------------------------------------------------------------
// Test: user UUID is generated and immutable
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_uuid_lifecycle(pool: PgPool) {
    let created = UserRepo::create(&pool, &new_user("asanchez")).await.unwrap();
    assert!(!created.uuid.is_nil());

    let by_uuid = UserRepo::find_by_uuid(&pool, created.uuid)
        .await
        .unwrap()
        .expect("user should resolve by public uuid");
    assert_eq!(by_uuid.id, created.id);

    let updated = UserRepo::update(
        &pool,
        created.id,
        &UpdateUser {
            display_name: Some("A. Sanchez".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.uuid, created.uuid);
    assert_eq!(updated.username, "asanchez");
}
