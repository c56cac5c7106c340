// ABOUTME: Sale recording tests against an in-memory database
// ABOUTME: Covers line-item persistence and copying booking products into a sale

use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;

use agendly::database::Database;
use agendly::models::{
    AvailableSlot, Client, Company, Product, Sale, SaleProduct, User,
};
use agendly::scheduling::{BookingCoordinator, BookingRequest, ProductLine};

struct Fixture {
    database: Database,
    company: Company,
    client: Client,
    product: Product,
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

    let product = Product {
        id: Uuid::new_v4(),
        company_id: company.id,
        name: "Shampoo".into(),
        description: "Bottle".into(),
        price: 2500,
        quantity: 10,
        created_at: now,
        updated_at: now,
    };
    database.create_product(&product).await.unwrap();

    Fixture {
        database,
        company,
        client,
        product,
    }
}

#[tokio::test]
async fn test_sale_with_explicit_line_items() {
    let fixture = setup().await;

    let sale = Sale {
        id: Uuid::new_v4(),
        company_id: fixture.company.id,
        client_id: fixture.client.id,
        booking_id: None,
        total: 2 * 2500 - 500,
        created_at: Utc::now(),
    };
    let items = vec![SaleProduct {
        id: Uuid::new_v4(),
        sale_id: sale.id,
        product_id: fixture.product.id,
        quantity: 2,
        discount: Some(500),
    }];

    fixture.database.create_sale(&sale, &items).await.unwrap();

    let stored = fixture
        .database
        .get_sale(sale.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.total, 4500);
    assert_eq!(stored.booking_id, None);

    let stored_items = fixture
        .database
        .get_sale_products(sale.id)
        .await
        .unwrap();
    assert_eq!(stored_items.len(), 1);
    assert_eq!(stored_items[0].quantity, 2);
    assert_eq!(stored_items[0].discount, Some(500));

    let sales = fixture
        .database
        .list_sales(fixture.company.id)
        .await
        .unwrap();
    assert_eq!(sales.len(), 1);
}

#[tokio::test]
async fn test_sale_copies_booking_product_items() {
    let fixture = setup().await;

    let start = Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap();
    let slot = AvailableSlot {
        id: Uuid::new_v4(),
        company_id: fixture.company.id,
        date: start.date_naive(),
        start_time: start,
        end_time: start + Duration::minutes(60),
        is_booked: false,
    };
    fixture.database.create_slot(&slot).await.unwrap();

    let coordinator = BookingCoordinator::new(fixture.database.clone());
    let booking = coordinator
        .book(BookingRequest {
            company_id: fixture.company.id,
            client_id: fixture.client.id,
            available_slot_id: slot.id,
            services: vec![],
            products: vec![ProductLine {
                product_id: fixture.product.id,
                quantity: 3,
                discount: None,
            }],
        })
        .await
        .unwrap();

    // The copied items' value is what the sale total must carry
    let copied_value = fixture
        .database
        .booking_products_value(booking.id)
        .await
        .unwrap();
    assert_eq!(copied_value, 3 * 2500);

    let sale = Sale {
        id: Uuid::new_v4(),
        company_id: fixture.company.id,
        client_id: fixture.client.id,
        booking_id: Some(booking.id),
        total: copied_value,
        created_at: Utc::now(),
    };
    fixture.database.create_sale(&sale, &[]).await.unwrap();

    // The booking's reserved products were copied into the sale
    let items = fixture
        .database
        .get_sale_products(sale.id)
        .await
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].product_id, fixture.product.id);
    assert_eq!(items[0].quantity, 3);

    // Stored total matches the value of every stored line item
    let stored = fixture
        .database
        .get_sale(sale.id)
        .await
        .unwrap()
        .unwrap();
    let line_value: i64 = items
        .iter()
        .map(|i| fixture.product.price * i.quantity - i.discount.unwrap_or(0))
        .sum();
    assert_eq!(stored.total, line_value);
}
