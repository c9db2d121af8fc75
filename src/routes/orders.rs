use std::collections::HashMap;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    AppState,
    error::{AppError, Result},
    models::{
        AssignQuery, CreateOrderRequest, Order, OrderItemData, OrderResponse, StatusQuery,
        UserRole,
    },
    queries::{order_queries, product_queries, shop_queries, user_queries},
    utils::extractors::{extract_user_id, require_role},
    utils::jwt::Claims,
};

pub async fn create_order(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<Json<OrderResponse>> {
    require_role(&claims, UserRole::Customer, "Only customers can place orders")?;
    let customer_id = extract_user_id(&claims)?;

    validate_order(&payload)?;

    shop_queries::find_by_id(&state.db, payload.shop_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Shop not found".to_string()))?;

    // Coalesce duplicate lines so stock checks see total demand per product
    let mut demand: HashMap<Uuid, i32> = HashMap::new();
    for item in &payload.items {
        *demand.entry(item.product_id).or_insert(0) += item.quantity;
    }

    let requested_ids: Vec<Uuid> = demand.keys().copied().collect();
    let products = product_queries::find_by_ids(&state.db, &requested_ids).await?;

    let mut total_amount = Decimal::ZERO;
    let mut order_items = Vec::with_capacity(demand.len());

    for (product_id, quantity) in &demand {
        let product = products
            .get(product_id)
            .ok_or_else(|| AppError::NotFound(format!("Product {} not found", product_id)))?;

        if product.shop_id != payload.shop_id {
            return Err(AppError::BadRequest(format!(
                "Product {} does not belong to this shop",
                product_id
            )));
        }

        if !product.is_available {
            return Err(AppError::BadRequest(format!(
                "Product {} is unavailable",
                product_id
            )));
        }

        if product.stock < *quantity {
            return Err(AppError::BadRequest(format!(
                "Insufficient stock for product {}",
                product_id
            )));
        }

        // The catalog price is authoritative; whatever the client estimated
        // in its cart is ignored.
        total_amount += product.price * Decimal::from(*quantity);

        order_items.push(OrderItemData {
            product_id: *product_id,
            product_name: product.name.clone(),
            quantity: *quantity,
            price: product.price,
        });
    }

    let order = order_queries::create_order_with_items(
        &state.db,
        customer_id,
        &payload,
        &order_items,
        total_amount,
    )
    .await?
    .ok_or_else(|| AppError::Conflict("Insufficient stock, please refresh".to_string()))?;

    let items = order_queries::get_items_for_orders(&state.db, &[order.id]).await?;

    Ok(Json(OrderResponse { order, items }))
}

pub async fn get_orders(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<OrderResponse>>> {
    let user_id = extract_user_id(&claims)?;

    // Role projection happens here, on the authoritative side; clients never
    // receive orders outside their slice.
    let orders = match claims.role {
        UserRole::Customer => order_queries::list_for_customer(&state.db, user_id).await?,
        UserRole::ShopOwner => {
            let shops = shop_queries::list_by_owner(&state.db, user_id).await?;
            let shop_ids: Vec<Uuid> = shops.iter().map(|s| s.id).collect();
            order_queries::list_for_shops(&state.db, &shop_ids).await?
        }
        UserRole::DeliveryAgent => order_queries::list_for_agent(&state.db, user_id).await?,
    };

    let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let all_items = order_queries::get_items_for_orders(&state.db, &order_ids).await?;

    let mut items_map: HashMap<Uuid, Vec<_>> = HashMap::new();
    for item in all_items {
        items_map.entry(item.order_id).or_default().push(item);
    }

    let response = orders
        .into_iter()
        .map(|order| {
            let items = items_map.remove(&order.id).unwrap_or_default();
            OrderResponse { order, items }
        })
        .collect();

    Ok(Json(response))
}

pub async fn get_order(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderResponse>> {
    let user_id = extract_user_id(&claims)?;

    let order = order_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    authorize_order_access(&state, &claims, user_id, &order).await?;

    let items = order_queries::get_items_for_orders(&state.db, &[order.id]).await?;

    Ok(Json(OrderResponse { order, items }))
}

pub async fn update_order_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Query(params): Query<StatusQuery>,
) -> Result<Json<Order>> {
    require_role(
        &claims,
        UserRole::DeliveryAgent,
        "Only the assigned delivery agent can update order status",
    )?;
    let agent_id = extract_user_id(&claims)?;

    let order = order_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    if order.delivery_agent_id != Some(agent_id) {
        return Err(AppError::Forbidden("Not authorized".to_string()));
    }

    if !order.status.can_advance_to(params.status) {
        return Err(match order.status.next() {
            None => AppError::Conflict("Order is already delivered".to_string()),
            Some(expected) => AppError::Conflict(format!(
                "Order is {}, the only valid next status is {}",
                order.status, expected
            )),
        });
    }

    // Compare-and-set: if another actor advanced the order in the meantime,
    // this call loses and the caller must re-fetch.
    let updated = order_queries::advance_status(&state.db, order.id, order.status, params.status)
        .await?
        .ok_or_else(|| {
            AppError::Conflict("Order status changed, please refresh".to_string())
        })?;

    Ok(Json(updated))
}

pub async fn assign_agent(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Query(params): Query<AssignQuery>,
) -> Result<Json<Order>> {
    require_role(
        &claims,
        UserRole::ShopOwner,
        "Only shop owners can assign delivery agents",
    )?;
    let owner_id = extract_user_id(&claims)?;

    let order = order_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    shop_queries::find_by_id_and_owner(&state.db, order.shop_id, owner_id)
        .await?
        .ok_or_else(|| AppError::Forbidden("Not authorized".to_string()))?;

    let agent = user_queries::find_by_id(&state.db, params.agent_id)
        .await?
        .filter(|u| u.role == UserRole::DeliveryAgent)
        .ok_or_else(|| AppError::NotFound("Delivery agent not found".to_string()))?;

    let updated = order_queries::assign_agent(&state.db, order.id, agent.id)
        .await?
        .ok_or_else(|| {
            AppError::Conflict("Order has already been assigned".to_string())
        })?;

    Ok(Json(updated))
}

async fn authorize_order_access(
    state: &AppState,
    claims: &Claims,
    user_id: Uuid,
    order: &Order,
) -> Result<()> {
    let allowed = match claims.role {
        UserRole::Customer => order.customer_id == user_id,
        UserRole::ShopOwner => {
            shop_queries::find_by_id_and_owner(&state.db, order.shop_id, user_id)
                .await?
                .is_some()
        }
        UserRole::DeliveryAgent => order.delivery_agent_id == Some(user_id),
    };

    if !allowed {
        return Err(AppError::Forbidden("Not authorized".to_string()));
    }

    Ok(())
}

fn validate_order(payload: &CreateOrderRequest) -> Result<()> {
    if payload.items.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".to_string()));
    }

    for item in &payload.items {
        if item.quantity < 1 {
            return Err(AppError::BadRequest(format!(
                "Invalid quantity for product {}",
                item.product_id
            )));
        }
    }

    if payload.delivery_address.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Delivery address is required".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GeoLocation, OrderItemRequest};

    fn request(items: Vec<OrderItemRequest>) -> CreateOrderRequest {
        CreateOrderRequest {
            shop_id: Uuid::new_v4(),
            items,
            delivery_address: "Main St 1".to_string(),
            delivery_location: GeoLocation {
                lat: 41.7,
                lng: 44.8,
                address: "Main St 1".to_string(),
            },
        }
    }

    #[test]
    fn empty_cart_is_rejected() {
        let req = request(vec![]);
        assert!(matches!(
            validate_order(&req),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let req = request(vec![OrderItemRequest {
            product_id: Uuid::new_v4(),
            quantity: 0,
        }]);
        assert!(validate_order(&req).is_err());
    }

    #[test]
    fn blank_delivery_address_is_rejected() {
        let mut req = request(vec![OrderItemRequest {
            product_id: Uuid::new_v4(),
            quantity: 1,
        }]);
        req.delivery_address = "  ".to_string();
        assert!(validate_order(&req).is_err());
    }

    #[test]
    fn well_formed_order_passes() {
        let req = request(vec![OrderItemRequest {
            product_id: Uuid::new_v4(),
            quantity: 2,
        }]);
        assert!(validate_order(&req).is_ok());
    }
}
