//! End-to-end flows through the HTTP router on an in-memory database

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use food_server::{Config, ServerState, build_app};

async fn app() -> Router {
    let state = ServerState::initialize(&Config::in_memory()).await.unwrap();
    build_app(&state).with_state(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_restaurant(app: &Router, name: &str, cuisine: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/restaurants",
        Some(json!({
            "name": name,
            "description": "Family run since 1998",
            "cuisine_type": cuisine,
            "address": "21 Canal Street, Riverside",
            "phone_number": "+1-555-010-2030",
            "opening_time": "10:00:00",
            "closing_time": "23:00:00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
}

async fn create_menu_item(app: &Router, restaurant_id: i64, name: &str, price: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        &format!("/restaurants/{restaurant_id}/menu-items"),
        Some(json!({
            "name": name,
            "price": price,
            "category": "Pasta",
            "preparation_time": 25
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
}

async fn create_customer(app: &Router, email: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/customers",
        Some(json!({
            "name": "Grace Hopper",
            "email": email,
            "phone_number": "555-222-3333",
            "address": "1 Navy Yard Road"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
}

async fn set_status(app: &Router, order_id: i64, status: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::PUT,
        &format!("/orders/{order_id}/status"),
        Some(json!({ "order_status": status })),
    )
    .await
}

#[tokio::test]
async fn test_order_lifecycle_review_and_analytics() {
    let app = app().await;
    let r = create_restaurant(&app, "Trattoria Roma", "Italian").await;
    let a = create_menu_item(&app, r, "Spaghetti Carbonara", "15.99").await;
    let b = create_menu_item(&app, r, "Lasagne al Forno", "18.99").await;
    let c = create_customer(&app, "grace@example.com").await;

    let (status, placed) = send(
        &app,
        Method::POST,
        &format!("/customers/{c}/orders"),
        Some(json!({
            "restaurant_id": r,
            "delivery_address": "1 Navy Yard Road",
            "items": [
                { "menu_item_id": a, "quantity": 2 },
                { "menu_item_id": b, "quantity": 1, "special_requests": "extra cheese" }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{placed}");
    assert_eq!(placed["total_amount"], "50.97");
    assert_eq!(placed["order_status"], "placed");
    assert_eq!(placed["estimated_delivery_minutes"], 40);
    assert_eq!(placed["order_items"].as_array().unwrap().len(), 2);
    let order_id = placed["id"].as_i64().unwrap();

    for next in ["confirmed", "preparing", "out_for_delivery", "delivered"] {
        let (status, body) = set_status(&app, order_id, next).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["order_status"], next);
    }

    let review_uri = format!("/orders/{order_id}/review?customer_id={c}");
    let review = json!({ "rating": 5, "comment": "Perfect carbonara" });
    let (status, body) = send(&app, Method::POST, &review_uri, Some(review.clone())).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["rating"], 5);

    let (status, body) = send(&app, Method::POST, &review_uri, Some(review)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5002);

    let (_, restaurant) = send(&app, Method::GET, &format!("/restaurants/{r}"), None).await;
    assert_eq!(restaurant["rating"], 5.0);

    let (status, analytics) =
        send(&app, Method::GET, &format!("/analytics/restaurants/{r}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(analytics["total_orders"], 1);
    assert_eq!(analytics["total_revenue"], "50.97");
    assert_eq!(analytics["average_order_value"], "50.97");
    assert_eq!(analytics["total_reviews"], 1);
    assert_eq!(analytics["orders_by_status"]["delivered"], 1);
    assert_eq!(analytics["popular_items"][0]["menu_item_id"], a);

    let (status, detail) = send(&app, Method::GET, &format!("/orders/{order_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["customer"]["id"], c);
    assert_eq!(detail["restaurant"]["id"], r);
    assert_eq!(detail["order_items"].as_array().unwrap().len(), 2);
    assert!(detail["delivery_time"].is_i64());
}

#[tokio::test]
async fn test_invalid_transition_keeps_status() {
    let app = app().await;
    let r = create_restaurant(&app, "Curry House", "Indian").await;
    let m = create_menu_item(&app, r, "Butter Chicken", "14.50").await;
    let c = create_customer(&app, "ada@example.com").await;

    let (_, placed) = send(
        &app,
        Method::POST,
        &format!("/customers/{c}/orders"),
        Some(json!({
            "restaurant_id": r,
            "delivery_address": "12 Analytical Way",
            "items": [{ "menu_item_id": m, "quantity": 1 }]
        })),
    )
    .await;
    let order_id = placed["id"].as_i64().unwrap();

    let (status, body) = set_status(&app, order_id, "delivered").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4004);

    let (_, detail) = send(&app, Method::GET, &format!("/orders/{order_id}"), None).await;
    assert_eq!(detail["order_status"], "placed");

    let (status, _) = set_status(&app, 9999, "confirmed").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_order_with_unavailable_item_is_rejected() {
    let app = app().await;
    let r = create_restaurant(&app, "Pho Saigon", "Vietnamese").await;
    let m = create_menu_item(&app, r, "Pho Bo", "12.00").await;
    let c = create_customer(&app, "linus@example.com").await;

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/menu-items/{m}"),
        Some(json!({ "is_available": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/customers/{c}/orders"),
        Some(json!({
            "restaurant_id": r,
            "delivery_address": "3 Kernel Street",
            "items": [{ "menu_item_id": m, "quantity": 1 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4002);

    let (_, orders) = send(&app, Method::GET, &format!("/customers/{c}/orders"), None).await;
    assert!(orders.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_restaurant_delete_cascades() {
    let app = app().await;
    let doomed = create_restaurant(&app, "Closing Soon Cafe", "Cafe").await;
    let kept = create_restaurant(&app, "Here To Stay Deli", "Deli").await;
    let doomed_item = create_menu_item(&app, doomed, "Flat White", "4.20").await;
    let kept_item = create_menu_item(&app, kept, "Reuben", "11.00").await;
    let c = create_customer(&app, "barbara@example.com").await;

    for (r, m) in [(doomed, doomed_item), (kept, kept_item)] {
        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/customers/{c}/orders"),
            Some(json!({
                "restaurant_id": r,
                "delivery_address": "8 Liskov Lane",
                "items": [{ "menu_item_id": m, "quantity": 1 }]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, deleted) =
        send(&app, Method::DELETE, &format!("/restaurants/{doomed}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["id"], doomed);

    let (status, _) = send(&app, Method::GET, &format!("/restaurants/{doomed}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::GET, &format!("/menu-items/{doomed_item}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, orders) = send(&app, Method::GET, "/orders", None).await;
    let orders = orders.as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["restaurant_id"], kept);

    let (status, _) = send(&app, Method::GET, &format!("/customers/{c}"), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_validation_and_conflicts() {
    let app = app().await;
    create_restaurant(&app, "Unique Name Bistro", "French").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/restaurants",
        Some(json!({
            "name": "Unique Name Bistro",
            "cuisine_type": "French",
            "address": "5 Other Street",
            "phone_number": "555-000-1111",
            "opening_time": "09:00:00",
            "closing_time": "17:00:00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6002);

    let (status, body) = send(&app, Method::POST, "/customers", Some(json!({ "name": 7 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);

    let (status, _) = send(&app, Method::GET, "/restaurants?limit=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, Method::GET, "/restaurants/trending?days=31", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, Method::GET, "/restaurants/not-a-number", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cache_serves_until_invalidated() {
    let app = app().await;
    let r = create_restaurant(&app, "Cached Kitchen", "Fusion").await;

    let uri = format!("/restaurants/{r}");
    send(&app, Method::GET, &uri, None).await;
    send(&app, Method::GET, &uri, None).await;

    let (_, stats) = send(&app, Method::GET, "/cache/stats", None).await;
    assert_eq!(stats["status"], "success");
    assert_eq!(stats["data"]["hits"], 1);
    assert_eq!(stats["data"]["keys_by_namespace"]["restaurants"], 1);

    let (status, updated) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "cuisine_type": "Modern Fusion" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["cuisine_type"], "Modern Fusion");

    let (_, fresh) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(fresh["cuisine_type"], "Modern Fusion");

    let (status, cleared) = send(&app, Method::DELETE, "/cache/clear/restaurants", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["deleted_keys"], 1);

    let (status, body) = send(&app, Method::DELETE, "/cache/clear/widgets", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("menu_items"));

    let (status, body) = send(&app, Method::DELETE, "/cache/clear", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted_keys"], 0);
}

#[tokio::test]
async fn test_health_and_request_id() {
    let app = app().await;
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let (_, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
}
