//! Order Service
//!
//! Order placement and the status workflow.
//!
//! # Placement
//!
//! ```text
//! validate request ─▶ BEGIN ─▶ customer/restaurant ─▶ price lines ─▶ INSERT order + lines ─▶ COMMIT
//!                                     │                    │
//!                                     └── NotFound         └── InvalidOrder (all line errors joined)
//! ```
//!
//! Line prices are snapshotted from the menu at placement time and the
//! total is the exact sum of `price × quantity`. Any failure drops the
//! transaction, so nothing is persisted.

use std::collections::HashMap;

use rust_decimal::Decimal;
use shared::models::{
    MenuItem, Order, OrderCreate, OrderDetail, OrderItemCreate, OrderItemDetail, OrderStatus,
    OrderUpdate, PlacedOrder,
};
use shared::util::now_millis;
use sqlx::SqlitePool;

use crate::db::repository::order::{NewOrder, OrderFilter};
use crate::db::repository::{Page, customer, menu_item, order, restaurant};
use crate::utils::money;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NOTE_LEN, MIN_ADDRESS_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Preparation buffer added on top of the slowest item
pub const DELIVERY_BUFFER_MINUTES: i64 = 15;

/// Estimate used when no ordered item has a preparation time
pub const DEFAULT_DELIVERY_MINUTES: i64 = 30;

/// Priced order line, ready to insert
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub menu_item_id: i64,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub special_requests: Option<String>,
}

/// Validated and priced order lines with their exact total
#[derive(Debug, Clone, PartialEq)]
pub struct PricedOrder {
    pub lines: Vec<PricedLine>,
    pub total: Decimal,
}

fn validate_order_request(req: &OrderCreate) -> AppResult<()> {
    if req.items.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::OrderEmpty,
            "Order must contain at least one item",
        ));
    }
    validate_required_text(
        &req.delivery_address,
        "delivery_address",
        MIN_ADDRESS_LEN,
        MAX_ADDRESS_LEN,
    )?;
    validate_optional_text(&req.special_instructions, "special_instructions", MAX_NOTE_LEN)?;

    let bad_quantities: Vec<String> = req
        .items
        .iter()
        .filter(|item| !money::quantity_in_range(item.quantity))
        .map(|item| {
            format!(
                "Quantity for menu item {} must be between {} and {}, got {}",
                item.menu_item_id,
                money::MIN_QUANTITY,
                money::MAX_QUANTITY,
                item.quantity
            )
        })
        .collect();
    if !bad_quantities.is_empty() {
        return Err(AppError::invalid_order(bad_quantities.join("; ")));
    }
    for item in &req.items {
        validate_optional_text(&item.special_requests, "special_requests", MAX_NOTE_LEN)?;
    }
    Ok(())
}

/// Check every line against the restaurant's menu and price it
///
/// All problems are collected and reported together.
pub fn price_lines(
    restaurant_id: i64,
    items: &[OrderItemCreate],
    menu: &HashMap<i64, MenuItem>,
) -> AppResult<PricedOrder> {
    let mut errors = Vec::new();
    let mut lines = Vec::with_capacity(items.len());
    let mut total = Decimal::ZERO;

    for item in items {
        match menu.get(&item.menu_item_id) {
            Some(m) if m.restaurant_id != restaurant_id => errors.push(format!(
                "Menu item {} not found in restaurant {}",
                item.menu_item_id, restaurant_id
            )),
            None => errors.push(format!(
                "Menu item {} not found in restaurant {}",
                item.menu_item_id, restaurant_id
            )),
            Some(m) if !m.is_available => {
                errors.push(format!("Menu item {} is not available", item.menu_item_id))
            }
            Some(m) => {
                total += money::line_total(m.price, item.quantity);
                lines.push(PricedLine {
                    menu_item_id: m.id,
                    quantity: item.quantity,
                    unit_price: m.price,
                    special_requests: item.special_requests.clone(),
                });
            }
        }
    }

    if !errors.is_empty() {
        return Err(AppError::invalid_order(errors.join("; ")));
    }
    Ok(PricedOrder { lines, total })
}

/// Slowest available item's preparation time plus the delivery buffer
pub fn estimated_delivery_minutes<'a>(
    restaurant_id: i64,
    items: impl IntoIterator<Item = &'a MenuItem>,
) -> i64 {
    items
        .into_iter()
        .filter(|m| m.restaurant_id == restaurant_id && m.is_available)
        .filter_map(|m| m.preparation_time)
        .max()
        .map(|minutes| i64::from(minutes) + DELIVERY_BUFFER_MINUTES)
        .unwrap_or(DEFAULT_DELIVERY_MINUTES)
}

/// Place an order for a customer
pub async fn place_order(
    pool: &SqlitePool,
    customer_id: i64,
    req: &OrderCreate,
) -> AppResult<PlacedOrder> {
    validate_order_request(req)?;

    let mut tx = pool.begin().await?;

    let customer = customer::find_by_id(&mut *tx, customer_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CustomerNotFound))?;
    if !customer.is_active {
        return Err(AppError::new(ErrorCode::CustomerInactive));
    }
    restaurant::find_by_id(&mut *tx, req.restaurant_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?;

    let mut ids: Vec<i64> = req.items.iter().map(|i| i.menu_item_id).collect();
    ids.sort_unstable();
    ids.dedup();
    let menu: HashMap<i64, MenuItem> = menu_item::find_by_ids(&mut *tx, &ids)
        .await?
        .into_iter()
        .map(|m| (m.id, m))
        .collect();

    let priced = price_lines(req.restaurant_id, &req.items, &menu)?;

    let order_id = order::insert(
        &mut *tx,
        &NewOrder {
            customer_id,
            restaurant_id: req.restaurant_id,
            total_amount_cents: money::to_cents(priced.total),
            delivery_address: &req.delivery_address,
            special_instructions: req.special_instructions.as_deref(),
            order_date: now_millis(),
        },
    )
    .await?;

    for line in &priced.lines {
        order::insert_item(
            &mut *tx,
            order_id,
            line.menu_item_id,
            line.quantity,
            money::to_cents(line.unit_price),
            line.special_requests.as_deref(),
        )
        .await?;
    }

    let created = order::find_by_id(&mut *tx, order_id)
        .await?
        .ok_or_else(|| AppError::internal("Order vanished after insert"))?;
    let order_items = order::items_for_order(&mut *tx, order_id).await?;
    tx.commit().await?;

    let estimate = estimated_delivery_minutes(req.restaurant_id, menu.values());

    tracing::info!(
        order_id,
        customer_id,
        restaurant_id = req.restaurant_id,
        total = %created.total_amount,
        lines = order_items.len(),
        "Order placed"
    );

    Ok(PlacedOrder {
        order: created,
        order_items,
        estimated_delivery_minutes: estimate,
    })
}

pub async fn get_order(pool: &SqlitePool, order_id: i64) -> AppResult<Order> {
    order::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))
}

/// Order with its customer, restaurant and lines (each with its menu item)
pub async fn get_order_detail(pool: &SqlitePool, order_id: i64) -> AppResult<OrderDetail> {
    let order = get_order(pool, order_id).await?;
    let customer = customer::find_by_id(pool, order.customer_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CustomerNotFound))?;
    let restaurant = restaurant::find_by_id(pool, order.restaurant_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?;

    let items = order::items_for_order(pool, order_id).await?;
    let ids: Vec<i64> = items.iter().map(|i| i.menu_item_id).collect();
    let menu: HashMap<i64, MenuItem> = menu_item::find_by_ids(pool, &ids)
        .await?
        .into_iter()
        .map(|m| (m.id, m))
        .collect();

    let mut order_items = Vec::with_capacity(items.len());
    for item in items {
        let menu_item = menu.get(&item.menu_item_id).cloned().ok_or_else(|| {
            AppError::internal(format!(
                "Order {order_id} references missing menu item {}",
                item.menu_item_id
            ))
        })?;
        order_items.push(OrderItemDetail { item, menu_item });
    }

    Ok(OrderDetail {
        order,
        customer,
        restaurant,
        order_items,
    })
}

/// Apply a status transition and/or delivery metadata changes
///
/// The transition is checked before anything is written. Reaching
/// `Delivered` without an explicit delivery time stamps the current time.
pub async fn update_order(
    pool: &SqlitePool,
    order_id: i64,
    update: &OrderUpdate,
) -> AppResult<Order> {
    if let Some(address) = &update.delivery_address {
        validate_required_text(address, "delivery_address", MIN_ADDRESS_LEN, MAX_ADDRESS_LEN)?;
    }
    validate_optional_text(&update.special_instructions, "special_instructions", MAX_NOTE_LEN)?;

    let mut tx = pool.begin().await?;
    let mut current = order::find_by_id(&mut *tx, order_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    let previous = current.order_status;

    if let Some(next) = update.order_status {
        if !previous.can_transition_to(next) {
            return Err(AppError::invalid_transition(format!(
                "Invalid status transition from {previous} to {next}"
            ))
            .with_detail("current_status", previous.as_str())
            .with_detail("requested_status", next.as_str()));
        }
        current.order_status = next;
        if next == OrderStatus::Delivered && update.delivery_time.is_none() {
            current.delivery_time = Some(now_millis());
        }
    }
    if let Some(address) = &update.delivery_address {
        current.delivery_address = address.clone();
    }
    if let Some(instructions) = &update.special_instructions {
        current.special_instructions = Some(instructions.clone());
    }
    if let Some(delivery_time) = update.delivery_time {
        current.delivery_time = Some(delivery_time);
    }

    order::update(&mut *tx, &current).await?;
    tx.commit().await?;

    if previous != current.order_status {
        tracing::info!(
            order_id,
            from = %previous,
            to = %current.order_status,
            "Order status changed"
        );
    }
    Ok(current)
}

/// List orders, scoped to a customer and/or restaurant that must exist
pub async fn list_orders(
    pool: &SqlitePool,
    filter: &OrderFilter,
    page: Page,
) -> AppResult<Vec<Order>> {
    if let Some(customer_id) = filter.customer_id {
        customer::find_by_id(pool, customer_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::CustomerNotFound))?;
    }
    if let Some(restaurant_id) = filter.restaurant_id {
        restaurant::find_by_id(pool, restaurant_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?;
    }
    Ok(order::list(pool, filter, page).await?)
}
