// ABOUTME: Slot generation and persistence tests against an in-memory database
// ABOUTME: Covers idempotent re-generation and range listing of stored slots

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use agendly::database::{is_unique_violation, Database};
use agendly::models::{Company, User};
use agendly::scheduling::{generate_slots, GenerationParams};

async fn setup() -> (Database, Company) {
    let database = Database::new("sqlite::memory:").await.unwrap();
    database.migrate().await.unwrap();

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        name: "Owner".into(),
        email: format!("owner-{}@example.com", Uuid::new_v4()),
        password_hash: "hash".into(),
        cell_phone: "5511999999999".into(),
        tax_id: "12345678901".into(),
        created_at: now,
    };
    database.create_user(&user).await.unwrap();

    let company = Company {
        id: Uuid::new_v4(),
        user_id: user.id,
        name: "Studio".into(),
        address: "Main St".into(),
        address_number: 42,
        zip_code: "01000-000".into(),
        cell_phone: "5511888888888".into(),
        created_at: now,
    };
    database.create_company(&company).await.unwrap();

    (database, company)
}

fn week_of_mondays(company_id: Uuid) -> GenerationParams {
    GenerationParams {
        company_id,
        start_time_of_day: "09:00:00".parse().unwrap(),
        end_time_of_day: "12:00:00".parse().unwrap(),
        interval_minutes: 60,
        days_of_week: vec![1],
        period_start: "2025-01-06".parse().unwrap(),
        period_end: "2025-01-12".parse().unwrap(),
    }
}

/// Persist drafts the way the generation endpoint does, skipping windows
/// that already exist
async fn persist(database: &Database, params: &GenerationParams) -> u64 {
    let mut created = 0;
    for slot in generate_slots(params).unwrap() {
        match database.create_slot(&slot).await {
            Ok(()) => created += 1,
            Err(e) if is_unique_violation(&e) => {}
            Err(e) => panic!("unexpected storage error: {e}"),
        }
    }
    created
}

#[tokio::test]
async fn test_generated_slots_are_persisted() {
    let (database, company) = setup().await;

    let created = persist(&database, &week_of_mondays(company.id)).await;
    assert_eq!(created, 3);

    let range_start = Utc.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap();
    let range_end = Utc.with_ymd_and_hms(2025, 1, 13, 0, 0, 0).unwrap();
    let slots = database
        .list_slots(company.id, range_start, range_end)
        .await
        .unwrap();

    assert_eq!(slots.len(), 3);
    assert!(slots.windows(2).all(|w| w[0].start_time < w[1].start_time));
    assert!(slots.iter().all(|s| !s.is_booked));
}

#[tokio::test]
async fn test_regeneration_skips_existing_windows() {
    let (database, company) = setup().await;
    let params = week_of_mondays(company.id);

    assert_eq!(persist(&database, &params).await, 3);
    // The exact same pattern again creates nothing new
    assert_eq!(persist(&database, &params).await, 0);

    // An extended period only adds the new windows
    let mut extended = params;
    extended.period_end = "2025-01-19".parse().unwrap();
    assert_eq!(persist(&database, &extended).await, 3);
}

#[tokio::test]
async fn test_range_listing_excludes_slots_outside_the_window() {
    let (database, company) = setup().await;
    persist(&database, &week_of_mondays(company.id)).await;

    // A range before the generated day
    let range_start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let range_end = Utc.with_ymd_and_hms(2025, 1, 5, 0, 0, 0).unwrap();
    let slots = database
        .list_slots(company.id, range_start, range_end)
        .await
        .unwrap();
    assert!(slots.is_empty());

    // A range covering only the first hour
    let range_start = Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap();
    let range_end = Utc.with_ymd_and_hms(2025, 1, 6, 10, 0, 0).unwrap();
    let slots = database
        .list_slots(company.id, range_start, range_end)
        .await
        .unwrap();
    assert_eq!(slots.len(), 1);
}

#[tokio::test]
async fn test_booked_flag_survives_listing() {
    let (database, company) = setup().await;
    persist(&database, &week_of_mondays(company.id)).await;

    let range_start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let range_end = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
    let slots = database
        .list_slots(company.id, range_start, range_end)
        .await
        .unwrap();

    database.set_slot_booked(slots[0].id, true).await.unwrap();

    let relisted = database
        .list_slots(company.id, range_start, range_end)
        .await
        .unwrap();
    assert!(relisted[0].is_booked);
    assert!(relisted[1..].iter().all(|s| !s.is_booked));
}

#[tokio::test]
async fn test_slots_are_scoped_per_company() {
    let (database, company) = setup().await;
    persist(&database, &week_of_mondays(company.id)).await;

    let range_start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let range_end = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
    let slots = database
        .list_slots(Uuid::new_v4(), range_start, range_end)
        .await
        .unwrap();
    assert!(slots.is_empty());
}

#[tokio::test]
async fn test_purging_a_companys_slots() {
    let (database, company) = setup().await;
    persist(&database, &week_of_mondays(company.id)).await;

    let deleted = database.delete_slots_for_company(company.id).await.unwrap();
    assert_eq!(deleted, 3);

    let range_start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let range_end = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
    assert!(database
        .list_slots(company.id, range_start, range_end)
        .await
        .unwrap()
        .is_empty());
}
