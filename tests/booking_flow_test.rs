// ABOUTME: End-to-end booking lifecycle tests against an in-memory database
// ABOUTME: Covers confirmation, capacity shortfall, double-booking conflicts and cancellation

use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;

use agendly::database::Database;
use agendly::errors::ErrorCode;
use agendly::models::{AvailableSlot, Client, Company, Product, Service, Situation, User};
use agendly::scheduling::{BookingCoordinator, BookingRequest, ProductLine};

struct Fixture {
    database: Database,
    coordinator: BookingCoordinator,
    company: Company,
    client: Client,
    slot: AvailableSlot,
}

async fn setup() -> Fixture {
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

    let client = Client {
        id: Uuid::new_v4(),
        company_id: company.id,
        name: "Alice".into(),
        email: format!("alice-{}@example.com", Uuid::new_v4()),
        password_hash: "hash".into(),
        cell_phone: "5511777777777".into(),
        registered_at: now,
    };
    database.create_client(&client).await.unwrap();

    let start = Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap();
    let slot = AvailableSlot {
        id: Uuid::new_v4(),
        company_id: company.id,
        date: start.date_naive(),
        start_time: start,
        end_time: start + Duration::minutes(60),
        is_booked: false,
    };
    database.create_slot(&slot).await.unwrap();

    let coordinator = BookingCoordinator::new(database.clone());

    Fixture {
        database,
        coordinator,
        company,
        client,
        slot,
    }
}

async fn insert_service(fixture: &Fixture, expected_minutes: i64) -> Service {
    let now = Utc::now();
    let service = Service {
        id: Uuid::new_v4(),
        company_id: fixture.company.id,
        name: "Haircut".into(),
        description: "Standard haircut".into(),
        price: 5000,
        expected_minutes,
        created_at: now,
        updated_at: now,
    };
    fixture.database.create_service(&service).await.unwrap();
    service
}

async fn insert_product(fixture: &Fixture) -> Product {
    let now = Utc::now();
    let product = Product {
        id: Uuid::new_v4(),
        company_id: fixture.company.id,
        name: "Shampoo".into(),
        description: "Bottle".into(),
        price: 2500,
        quantity: 10,
        created_at: now,
        updated_at: now,
    };
    fixture.database.create_product(&product).await.unwrap();
    product
}

fn request_for(fixture: &Fixture) -> BookingRequest {
    BookingRequest {
        company_id: fixture.company.id,
        client_id: fixture.client.id,
        available_slot_id: fixture.slot.id,
        services: vec![],
        products: vec![],
    }
}

#[tokio::test]
async fn test_booking_confirms_when_slot_covers_services() {
    let fixture = setup().await;
    let service = insert_service(&fixture, 45).await;

    let mut request = request_for(&fixture);
    request.services = vec![service.id];

    let booking = fixture.coordinator.book(request).await.unwrap();
    assert_eq!(booking.situation, Situation::Confirmed);

    let slot = fixture
        .database
        .get_slot(fixture.slot.id)
        .await
        .unwrap()
        .unwrap();
    assert!(slot.is_booked);

    let services = fixture
        .database
        .get_booking_services(booking.id)
        .await
        .unwrap();
    assert_eq!(services.len(), 1);
    assert_eq!(services[0].service_id, service.id);
}

#[tokio::test]
async fn test_booking_pending_when_services_exceed_slot() {
    let fixture = setup().await;
    let service = insert_service(&fixture, 90).await;

    let mut request = request_for(&fixture);
    request.services = vec![service.id];

    let booking = fixture.coordinator.book(request).await.unwrap();
    assert_eq!(booking.situation, Situation::Pending);

    // The slot is still claimed even for a pending booking
    let slot = fixture
        .database
        .get_slot(fixture.slot.id)
        .await
        .unwrap()
        .unwrap();
    assert!(slot.is_booked);
}

#[tokio::test]
async fn test_second_booking_for_same_slot_conflicts() {
    let fixture = setup().await;

    fixture.coordinator.book(request_for(&fixture)).await.unwrap();

    let err = fixture
        .coordinator
        .book(request_for(&fixture))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceAlreadyExists);
    assert_eq!(err.http_status(), 409);

    // Only the winner's booking exists
    let bookings = fixture
        .database
        .list_bookings(fixture.company.id)
        .await
        .unwrap();
    assert_eq!(bookings.len(), 1);
}

#[tokio::test]
async fn test_cancel_releases_slot_for_rebooking() {
    let fixture = setup().await;

    let booking = fixture.coordinator.book(request_for(&fixture)).await.unwrap();
    fixture.coordinator.cancel(booking.id).await.unwrap();

    let slot = fixture
        .database
        .get_slot(fixture.slot.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!slot.is_booked);
    assert!(fixture
        .database
        .get_booking(booking.id)
        .await
        .unwrap()
        .is_none());

    // The slot can be claimed again
    let rebooked = fixture.coordinator.book(request_for(&fixture)).await.unwrap();
    assert_eq!(rebooked.available_slot_id, fixture.slot.id);
}

#[tokio::test]
async fn test_missing_client_yields_not_found_without_partial_writes() {
    let fixture = setup().await;

    let mut request = request_for(&fixture);
    request.client_id = Uuid::new_v4();

    let err = fixture.coordinator.book(request).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);

    let bookings = fixture
        .database
        .list_bookings(fixture.company.id)
        .await
        .unwrap();
    assert!(bookings.is_empty());

    let slot = fixture
        .database
        .get_slot(fixture.slot.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!slot.is_booked);
}

#[tokio::test]
async fn test_missing_service_yields_not_found() {
    let fixture = setup().await;

    let mut request = request_for(&fixture);
    request.services = vec![Uuid::new_v4()];

    let err = fixture.coordinator.book(request).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_cross_tenant_slot_reads_as_missing() {
    let fixture = setup().await;

    // A second tenant owned by a different user
    let now = Utc::now();
    let other_user = User {
        id: Uuid::new_v4(),
        name: "Other".into(),
        email: format!("other-{}@example.com", Uuid::new_v4()),
        password_hash: "hash".into(),
        cell_phone: "5511666666666".into(),
        tax_id: "98765432109".into(),
        created_at: now,
    };
    fixture.database.create_user(&other_user).await.unwrap();

    let other_company = Company {
        id: Uuid::new_v4(),
        user_id: other_user.id,
        name: "Other Studio".into(),
        address: "Side St".into(),
        address_number: 7,
        zip_code: "02000-000".into(),
        cell_phone: "5511555555555".into(),
        created_at: now,
    };
    fixture.database.create_company(&other_company).await.unwrap();

    let mut request = request_for(&fixture);
    request.company_id = other_company.id;

    let err = fixture.coordinator.book(request).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_booking_persists_product_line_items() {
    let fixture = setup().await;
    let product = insert_product(&fixture).await;

    let mut request = request_for(&fixture);
    request.products = vec![ProductLine {
        product_id: product.id,
        quantity: 2,
        discount: Some(500),
    }];

    let booking = fixture.coordinator.book(request).await.unwrap();

    let items = fixture
        .database
        .get_booking_products(booking.id)
        .await
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].product_id, product.id);
    assert_eq!(items[0].quantity, 2);
    assert_eq!(items[0].discount, Some(500));
}
