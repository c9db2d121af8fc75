use rust_decimal::Decimal;
use sqlx::{PgPool, types::Json};
use uuid::Uuid;

use crate::{
    error::Result,
    models::{CreateOrderRequest, Order, OrderItem, OrderItemData, OrderStatus},
};

/// Creates the order, snapshots its items, and decrements stock, all in one
/// transaction. Returns `None` when some product no longer has enough stock;
/// the whole order rolls back in that case.
pub async fn create_order_with_items(
    pool: &PgPool,
    customer_id: Uuid,
    req: &CreateOrderRequest,
    items: &[OrderItemData],
    total_amount: Decimal,
) -> Result<Option<Order>> {
    let mut tx = pool.begin().await?;

    let order = sqlx::query_as::<_, Order>(
        "INSERT INTO orders (customer_id, shop_id, total_amount, delivery_address, delivery_location)
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(customer_id)
    .bind(req.shop_id)
    .bind(total_amount)
    .bind(&req.delivery_address)
    .bind(Json(&req.delivery_location))
    .fetch_one(&mut *tx)
    .await?;

    let product_ids: Vec<Uuid> = items.iter().map(|i| i.product_id).collect();
    let product_names: Vec<&str> = items.iter().map(|i| i.product_name.as_str()).collect();
    let quantities: Vec<i32> = items.iter().map(|i| i.quantity).collect();
    let prices: Vec<Decimal> = items.iter().map(|i| i.price).collect();

    sqlx::query(
        "INSERT INTO order_items (order_id, product_id, product_name, quantity, price)
         SELECT $1, unnest($2::uuid[]), unnest($3::varchar[]), unnest($4::int[]), unnest($5::decimal[])",
    )
    .bind(order.id)
    .bind(&product_ids)
    .bind(&product_names)
    .bind(&quantities)
    .bind(&prices)
    .execute(&mut *tx)
    .await?;

    // Conditional decrement is the real stock guard; the pre-checks in the
    // handler can lose a race against a concurrent order.
    for item in items {
        let result = sqlx::query(
            "UPDATE products SET stock = stock - $1 WHERE id = $2 AND stock >= $1",
        )
        .bind(item.quantity)
        .bind(item.product_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }
    }

    tx.commit().await?;
    Ok(Some(order))
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Order>> {
    let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(order)
}

pub async fn list_for_customer(pool: &PgPool, customer_id: Uuid) -> Result<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(
        "SELECT * FROM orders WHERE customer_id = $1 ORDER BY created_at DESC",
    )
    .bind(customer_id)
    .fetch_all(pool)
    .await?;

    Ok(orders)
}

pub async fn list_for_shops(pool: &PgPool, shop_ids: &[Uuid]) -> Result<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(
        "SELECT * FROM orders WHERE shop_id = ANY($1) ORDER BY created_at DESC",
    )
    .bind(shop_ids)
    .fetch_all(pool)
    .await?;

    Ok(orders)
}

pub async fn list_for_agent(pool: &PgPool, agent_id: Uuid) -> Result<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(
        "SELECT * FROM orders WHERE delivery_agent_id = $1 ORDER BY created_at DESC",
    )
    .bind(agent_id)
    .fetch_all(pool)
    .await?;

    Ok(orders)
}

pub async fn get_items_for_orders(pool: &PgPool, order_ids: &[Uuid]) -> Result<Vec<OrderItem>> {
    let items = sqlx::query_as::<_, OrderItem>(
        "SELECT order_id, product_id, product_name, quantity, price
         FROM order_items WHERE order_id = ANY($1)",
    )
    .bind(order_ids)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

/// Compare-and-set status advance. The `WHERE status = $from` clause makes
/// the transition atomic: of two racing advances only one matches the
/// expected current status, the other gets `None` back.
pub async fn advance_status(
    pool: &PgPool,
    id: Uuid,
    from: OrderStatus,
    to: OrderStatus,
) -> Result<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(
        "UPDATE orders SET status = $1, updated_at = NOW()
         WHERE id = $2 AND status = $3 RETURNING *",
    )
    .bind(to)
    .bind(id)
    .bind(from)
    .fetch_optional(pool)
    .await?;

    Ok(order)
}

/// Sets the delivery agent and moves pending -> assigned in one statement,
/// so the agent id and the status can never disagree. Valid once per order:
/// a second call no longer matches the pending status.
pub async fn assign_agent(pool: &PgPool, id: Uuid, agent_id: Uuid) -> Result<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(
        "UPDATE orders SET delivery_agent_id = $1, status = $2, updated_at = NOW()
         WHERE id = $3 AND status = $4 RETURNING *",
    )
    .bind(agent_id)
    .bind(OrderStatus::Assigned)
    .bind(id)
    .bind(OrderStatus::Pending)
    .fetch_optional(pool)
    .await?;

    Ok(order)
}
