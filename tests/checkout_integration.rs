//! Integration tests for the storefront HTTP surface
//!
//! These tests drive the full router against an in-memory store API and
//! verify:
//! - Filter normalization for the book list
//! - Buy-now selection and stock checks
//! - Checkout quotes
//! - Order submission, failure handling and the submission state machine
//! - Independent loading of the checkout page sections

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tower::util::ServiceExt; // for `oneshot`

use bookstore_checkout::api::{
    ApiError, ApiResult, Book, Order, OrderLine, PageMeta, Paginated, SavedAddress, StoreApi,
    UserProfile,
};
use bookstore_checkout::checkout::{AppState, SharedState};
use bookstore_checkout::filters::BookFilters;
use bookstore_checkout::orders::{OrderStatus, PaymentStatus};
use bookstore_checkout::pricing::{Money, PricingCalculator};
use bookstore_checkout::router::create_app_router;

const SESSION: &str = "store_session=test-session";

// =============================================================================
// In-memory store API
// =============================================================================

#[derive(Default)]
struct FakeStore {
    books: Mutex<HashMap<String, Book>>,
    profile_fails: Mutex<bool>,
    order_failure: Mutex<Option<(u16, Option<String>)>>,
    submitted: Mutex<Vec<OrderLine>>,
    listed_with: Mutex<Option<BookFilters>>,
    /// When set, order creation signals `entered` and waits for `release`.
    gate: Mutex<Option<(Arc<Notify>, Arc<Notify>)>>,
}

impl FakeStore {
    fn with_book(id: &str, price: &str, stock: u32) -> Arc<Self> {
        let store = FakeStore::default();
        store.books.lock().unwrap().insert(
            id.to_string(),
            Book {
                id: id.to_string(),
                title: format!("Book {}", id),
                author: None,
                price: price.parse().unwrap(),
                stock,
                category_name: None,
                rating: None,
                featured: false,
                cover_image: None,
            },
        );
        Arc::new(store)
    }

    fn fail_orders(&self, status: u16, message: Option<&str>) {
        *self.order_failure.lock().unwrap() = Some((status, message.map(str::to_string)));
    }

    fn submitted(&self) -> Vec<OrderLine> {
        self.submitted.lock().unwrap().clone()
    }

    fn update_book(&self, id: &str, price: &str, stock: u32) {
        let mut books = self.books.lock().unwrap();
        let book = books.get_mut(id).unwrap();
        book.price = price.parse().unwrap();
        book.stock = stock;
    }

    /// Makes order creation wait until the returned `release` is notified.
    fn hold_orders(&self) -> (Arc<Notify>, Arc<Notify>) {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some((entered.clone(), release.clone()));
        (entered, release)
    }
}

#[async_trait]
impl StoreApi for FakeStore {
    async fn list_books(&self, filters: &BookFilters) -> ApiResult<Paginated<Book>> {
        *self.listed_with.lock().unwrap() = Some(filters.clone());
        let data: Vec<Book> = self.books.lock().unwrap().values().cloned().collect();
        Ok(Paginated {
            meta: PageMeta {
                page: filters.page,
                limit: filters.limit,
                total: data.len() as u64,
                total_pages: 1,
                has_next: false,
                has_prev: filters.page > 1,
            },
            data,
        })
    }

    async fn get_book(&self, id: &str) -> ApiResult<Book> {
        self.books
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound("book".to_string()))
    }

    async fn create_orders(&self, lines: &[OrderLine]) -> ApiResult<Vec<Order>> {
        let gate = self.gate.lock().unwrap().clone();
        if let Some((entered, release)) = gate {
            entered.notify_one();
            release.notified().await;
        }

        if let Some((status, message)) = self.order_failure.lock().unwrap().clone() {
            return Err(ApiError::Remote { status, message });
        }

        let mut submitted = self.submitted.lock().unwrap();
        submitted.extend_from_slice(lines);
        Ok(vec![Order {
            id: format!("o-{}", submitted.len()),
            book_id: Some(lines[0].book_id.clone()),
            quantity: Some(lines[0].quantity),
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            total: Some(Money::new(lines[0].total)),
            currency: Some(lines[0].currency.clone()),
            created_at: None,
        }])
    }

    async fn get_order(&self, id: &str) -> ApiResult<Order> {
        if id != "o-1" {
            return Err(ApiError::NotFound("order".to_string()));
        }
        Ok(Order {
            id: id.to_string(),
            book_id: Some("b1".to_string()),
            quantity: Some(2),
            status: OrderStatus::Shipped,
            payment_status: PaymentStatus::Paid,
            total: Some("57.4885".parse().unwrap()),
            currency: Some("USD".to_string()),
            created_at: None,
        })
    }

    async fn get_profile(&self) -> ApiResult<UserProfile> {
        if *self.profile_fails.lock().unwrap() {
            return Err(ApiError::Remote {
                status: 503,
                message: None,
            });
        }
        Ok(UserProfile {
            id: "u1".to_string(),
            name: Some("Ada".to_string()),
            email: None,
            addresses: vec![SavedAddress {
                id: "a1".to_string(),
                street: "1 Main St".to_string(),
                city: "Springfield".to_string(),
                state: "IL".to_string(),
                country: "US".to_string(),
                zip_code: "62701".to_string(),
                is_default: true,
            }],
        })
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Helper function to create a test app instance
fn create_test_app(store: Arc<FakeStore>) -> axum::Router {
    create_test_app_with_state(store).0
}

/// Like `create_test_app`, also returning the shared state for inspection.
fn create_test_app_with_state(store: Arc<FakeStore>) -> (axum::Router, SharedState) {
    let state = Arc::new(AppState::new(store, PricingCalculator::default(), "USD"));
    (create_app_router(state.clone()), state)
}

/// Helper function to send a request and get the response (REST API)
async fn send_request(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, HeaderMap, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::COOKIE, SESSION);
    let body = match body {
        Some(body) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_string(&body).unwrap())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(json!({}));

    (status, headers, body)
}

fn money(value: &Value) -> Money {
    value.as_str().unwrap().parse().unwrap()
}

fn complete_order(quantity: u32, shipping_method: &str) -> Value {
    json!({
        "quantity": quantity,
        "shippingMethod": shipping_method,
        "paymentMethod": "card",
        "shippingAddress": {
            "street": "1 Main St",
            "city": "Springfield",
            "state": "IL",
            "country": "US",
            "zipCode": "62701"
        },
        "customerNotes": "Leave at the door"
    })
}

async fn select(app: &axum::Router, book_id: &str, quantity: u32) {
    let (status, _, body) = send_request(
        app,
        "PUT",
        "/buy-now",
        Some(json!({ "bookId": book_id, "quantity": quantity })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "selection failed: {body}");
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_book_list_normalizes_filters() {
    let store = FakeStore::with_book("b1", "10", 3);
    let app = create_test_app(store.clone());

    let (status, _, body) = send_request(
        &app,
        "GET",
        "/books?search=dune&page=0&minPrice=NaN&inStock=true&sortOrder=sideways&ref=mail",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["filters"]["search"], "dune");
    assert_eq!(body["filters"]["page"], 1);
    assert_eq!(body["filters"]["minPrice"], 0.0);
    assert_eq!(body["filters"]["sortOrder"], "desc");
    assert_eq!(body["query"], "search=dune&inStock=true");
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let listed = store.listed_with.lock().unwrap().clone().unwrap();
    assert!(listed.in_stock);
    assert_eq!(listed.limit, 12);
}

#[tokio::test]
async fn test_missing_book_is_not_found() {
    let app = create_test_app(FakeStore::with_book("b1", "10", 3));
    let (status, _, body) = send_request(&app, "GET", "/books/nope", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "book not found");
}

// =============================================================================
// Buy-now and quotes
// =============================================================================

#[tokio::test]
async fn test_buy_now_at_stock_limit_is_accepted() {
    let app = create_test_app(FakeStore::with_book("b1", "100", 2));
    let (status, _, body) = send_request(
        &app,
        "PUT",
        "/buy-now",
        Some(json!({ "bookId": "b1", "quantity": 2 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["item"]["quantity"], 2);
    assert_eq!(body["quote"]["display"]["total"], "260.00");
}

#[tokio::test]
async fn test_buy_now_above_stock_is_rejected() {
    let app = create_test_app(FakeStore::with_book("b1", "100", 2));
    let (status, _, body) = send_request(
        &app,
        "PUT",
        "/buy-now",
        Some(json!({ "bookId": "b1", "quantity": 3 })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["quantity"], "Only 2 left in stock");
}

#[tokio::test]
async fn test_new_session_gets_cookie() {
    let app = create_test_app(FakeStore::with_book("b1", "10", 3));
    let request = Request::builder()
        .method("GET")
        .uri("/checkout")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cookie.starts_with("store_session="));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn test_quote_two_units_standard() {
    let app = create_test_app(FakeStore::default().into());
    let (status, _, body) = send_request(
        &app,
        "POST",
        "/checkout/quote",
        Some(json!({ "unitPrice": 100, "quantity": 2, "shippingMethod": "standard" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let breakdown = &body["breakdown"];
    assert_eq!(money(&breakdown["subtotal"]), Money::from_major(200));
    assert_eq!(money(&breakdown["tax"]), Money::from_major(30));
    assert_eq!(money(&breakdown["shippingCost"]), Money::from_major(30));
    assert_eq!(money(&breakdown["discount"]), Money::ZERO);
    assert_eq!(money(&breakdown["total"]), Money::from_major(260));
}

#[tokio::test]
async fn test_quote_pickup_keeps_precision() {
    let app = create_test_app(FakeStore::default().into());
    let (status, _, body) = send_request(
        &app,
        "POST",
        "/checkout/quote",
        Some(json!({ "unitPrice": "49.99", "quantity": 1, "shippingMethod": "pickup" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(money(&body["breakdown"]["tax"]), "7.4985".parse::<Money>().unwrap());
    assert_eq!(money(&body["breakdown"]["total"]), "57.4885".parse::<Money>().unwrap());
    assert_eq!(body["display"]["total"], "57.49");
}

#[tokio::test]
async fn test_quote_rejects_unknown_shipping_method() {
    let app = create_test_app(FakeStore::default().into());
    let (status, _, body) = send_request(
        &app,
        "POST",
        "/checkout/quote",
        Some(json!({ "unitPrice": 10, "quantity": 1, "shippingMethod": "drone" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["message"].as_str().unwrap().contains("drone"));
}

#[tokio::test]
async fn test_quote_checks_stock_when_given() {
    let app = create_test_app(FakeStore::default().into());
    let (status, _, _) = send_request(
        &app,
        "POST",
        "/checkout/quote",
        Some(json!({ "unitPrice": 10, "quantity": 4, "shippingMethod": "express", "stock": 3 })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// =============================================================================
// Submission
// =============================================================================

#[tokio::test]
async fn test_submit_without_selection_is_not_found() {
    let app = create_test_app(FakeStore::default().into());
    let (status, _, _) =
        send_request(&app, "POST", "/checkout", Some(complete_order(1, "standard"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_incomplete_address_blocks_submission() {
    let store = FakeStore::with_book("b1", "100", 5);
    let app = create_test_app(store.clone());
    select(&app, "b1", 1).await;

    let mut order = complete_order(1, "standard");
    order["shippingAddress"]["zipCode"] = json!("");

    let (status, _, body) = send_request(&app, "POST", "/checkout", Some(order)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["errors"]["shippingAddress.zipCode"],
        "zipCode is required"
    );
    assert!(store.submitted().is_empty(), "order API must not be called");
}

#[tokio::test]
async fn test_successful_submission_clears_draft() {
    let store = FakeStore::with_book("b1", "100", 5);
    let app = create_test_app(store.clone());
    select(&app, "b1", 2).await;

    let (status, _, body) =
        send_request(&app, "POST", "/checkout", Some(complete_order(2, "standard"))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["orderId"], "o-1");
    assert_eq!(body["redirect"], "/orders/o-1");

    let submitted = store.submitted();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].quantity, 2);
    assert_eq!(Money::new(submitted[0].total), Money::from_major(260));
    assert_eq!(submitted[0].customer_notes.as_deref(), Some("Leave at the door"));

    let (_, _, page) = send_request(&app, "GET", "/checkout", None).await;
    assert_eq!(page["item"]["status"], "empty");
    assert_eq!(page["submission"]["status"], "idle");
}

#[tokio::test]
async fn test_completed_checkout_releases_session() {
    let (app, state) = create_test_app_with_state(FakeStore::with_book("b1", "100", 5));
    select(&app, "b1", 1).await;
    assert_eq!(state.sessions.len(), 1);

    let (status, _, _) =
        send_request(&app, "POST", "/checkout", Some(complete_order(1, "standard"))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(state.sessions.is_empty());
}

#[tokio::test]
async fn test_clearing_buy_now_releases_session() {
    let (app, state) = create_test_app_with_state(FakeStore::with_book("b1", "100", 5));
    select(&app, "b1", 1).await;

    let (status, _, _) = send_request(&app, "DELETE", "/buy-now", None).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(state.sessions.is_empty());
}

#[tokio::test]
async fn test_failed_submission_keeps_draft_and_message() {
    let store = FakeStore::with_book("b1", "100", 5);
    store.fail_orders(400, Some("Payment declined by issuer"));
    let app = create_test_app(store.clone());
    select(&app, "b1", 1).await;

    let (status, _, body) =
        send_request(&app, "POST", "/checkout", Some(complete_order(1, "express"))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Payment declined by issuer");

    let (_, _, page) = send_request(&app, "GET", "/checkout", None).await;
    assert_eq!(page["item"]["status"], "ready");
    assert_eq!(page["item"]["data"]["bookId"], "b1");
    assert_eq!(page["submission"]["status"], "failed");
    assert_eq!(page["submission"]["message"], "Payment declined by issuer");

    // The customer can retry once the problem is fixed.
    *store.order_failure.lock().unwrap() = None;
    let (status, _, _) =
        send_request(&app, "POST", "/checkout", Some(complete_order(1, "express"))).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_server_error_without_message_uses_fallback() {
    let store = FakeStore::with_book("b1", "100", 5);
    store.fail_orders(500, None);
    let app = create_test_app(store);
    select(&app, "b1", 1).await;

    let (status, _, body) =
        send_request(&app, "POST", "/checkout", Some(complete_order(1, "pickup"))).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["message"], "Something went wrong. Please try again.");
}

#[tokio::test]
async fn test_duplicate_submission_is_rejected_while_pending() {
    let store = FakeStore::with_book("b1", "100", 5);
    let (entered, release) = store.hold_orders();
    let app = create_test_app(store.clone());
    select(&app, "b1", 1).await;

    let first = {
        let app = app.clone();
        tokio::spawn(async move {
            send_request(&app, "POST", "/checkout", Some(complete_order(1, "standard"))).await
        })
    };
    entered.notified().await;

    let (status, _, _) =
        send_request(&app, "POST", "/checkout", Some(complete_order(1, "standard"))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    release.notify_one();
    let (status, _, _) = first.await.unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(store.submitted().len(), 1);
}

#[tokio::test]
async fn test_selection_is_locked_while_submission_is_pending() {
    let store = FakeStore::with_book("b1", "100", 5);
    let other = Book {
        id: "b2".to_string(),
        ..store.books.lock().unwrap()["b1"].clone()
    };
    store.books.lock().unwrap().insert(other.id.clone(), other);
    let (entered, release) = store.hold_orders();
    let app = create_test_app(store.clone());
    select(&app, "b1", 1).await;

    let first = {
        let app = app.clone();
        tokio::spawn(async move {
            send_request(&app, "POST", "/checkout", Some(complete_order(1, "standard"))).await
        })
    };
    entered.notified().await;

    let (status, _, _) = send_request(
        &app,
        "PUT",
        "/buy-now",
        Some(json!({ "bookId": "b2", "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _, _) = send_request(&app, "DELETE", "/buy-now", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    release.notify_one();
    let (status, _, body) = first.await.unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["redirect"], "/orders/o-1");
    assert_eq!(store.submitted().len(), 1);

    let (_, _, page) = send_request(&app, "GET", "/checkout", None).await;
    assert_eq!(page["item"]["status"], "empty");
}

// =============================================================================
// Checkout page and confirmation
// =============================================================================

#[tokio::test]
async fn test_checkout_page_sections_load_independently() {
    let store = FakeStore::with_book("b1", "49.99", 4);
    *store.profile_fails.lock().unwrap() = true;
    let app = create_test_app(store);
    select(&app, "b1", 1).await;

    let (status, _, page) = send_request(&app, "GET", "/checkout", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["item"]["status"], "ready");
    assert_eq!(page["addresses"]["status"], "error");
    assert_eq!(
        page["addresses"]["message"],
        "Something went wrong. Please try again."
    );
    assert_eq!(page["quote"]["display"]["total"], "87.49");
    assert_eq!(page["shippingOptions"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_checkout_page_reports_sold_out_item() {
    let store = FakeStore::with_book("b1", "20", 3);
    let app = create_test_app(store.clone());
    select(&app, "b1", 2).await;
    store.update_book("b1", "20", 0);

    let (status, _, page) = send_request(&app, "GET", "/checkout", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["item"]["status"], "unavailable");
    assert_eq!(page["item"]["message"], "This item is out of stock");
    assert_eq!(page["item"]["data"]["stock"], 0);
    assert!(page.get("quote").is_none());

    let (status, _, body) =
        send_request(&app, "POST", "/checkout", Some(complete_order(1, "standard"))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["quantity"], "This item is out of stock");
    assert!(store.submitted().is_empty());
}

#[tokio::test]
async fn test_checkout_page_reports_unpriceable_item() {
    let store = FakeStore::with_book("b1", "20", 3);
    let app = create_test_app(store.clone());
    select(&app, "b1", 1).await;
    store.update_book("b1", "-5", 3);

    let (_, _, page) = send_request(&app, "GET", "/checkout", None).await;

    assert_eq!(page["item"]["status"], "error");
    assert_eq!(page["item"]["message"], "unit price must not be negative");
    assert!(page.get("quote").is_none());
    assert_eq!(page["addresses"]["status"], "ready");
}

#[tokio::test]
async fn test_checkout_page_lists_saved_addresses() {
    let app = create_test_app(FakeStore::with_book("b1", "10", 1));
    let (_, _, page) = send_request(&app, "GET", "/checkout", None).await;

    assert_eq!(page["item"]["status"], "empty");
    assert_eq!(page["addresses"]["status"], "ready");
    assert_eq!(page["addresses"]["data"][0]["zipCode"], "62701");
    assert_eq!(page["defaultAddressId"], "a1");
    assert_eq!(page["submission"]["status"], "idle");
}

#[tokio::test]
async fn test_order_confirmation_tones() {
    let app = create_test_app(FakeStore::default().into());

    let (status, _, body) = send_request(&app, "GET", "/orders/o-1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["statusTone"], "info");
    assert_eq!(body["paymentTone"], "success");
    assert_eq!(body["totalDisplay"], "57.49");

    let (status, _, _) = send_request(&app, "GET", "/orders/o-404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
