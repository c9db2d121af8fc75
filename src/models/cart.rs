use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{OrderItemRequest, Product};

/// One line in a cart. `price` is the catalog price at the time the product
/// was added and is only a pre-submission estimate; the server recomputes
/// the authoritative total at order creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: u32,
    pub price: Decimal,
}

/// Ephemeral client-local cart. Lines are coalesced by product id: adding a
/// product that is already in the cart bumps its quantity instead of
/// appending a duplicate line. Not persisted anywhere; a client that reloads
/// starts empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `product` to the cart.
    pub fn add(&mut self, product: &Product) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            line.quantity += 1;
        } else {
            self.lines.push(CartLine {
                product_id: product.id,
                product_name: product.name.clone(),
                quantity: 1,
                price: product.price,
            });
        }
    }

    /// Drop the whole line for `product_id`, regardless of quantity.
    pub fn remove(&mut self, product_id: Uuid) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    pub fn total(&self) -> Decimal {
        self.lines
            .iter()
            .map(|l| l.price * Decimal::from(l.quantity))
            .sum()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Convert the cart into the item list of an order-creation request.
    pub fn to_order_items(&self) -> Vec<OrderItemRequest> {
        self.lines
            .iter()
            .map(|l| OrderItemRequest {
                product_id: l.product_id,
                quantity: l.quantity as i32,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(name: &str, price: Decimal) -> Product {
        Product {
            id: Uuid::new_v4(),
            shop_id: Uuid::new_v4(),
            name: name.to_string(),
            description: String::new(),
            price,
            category: "grocery".to_string(),
            image_url: None,
            stock: 10,
            is_available: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn repeated_adds_coalesce_into_one_line() {
        let mut cart = Cart::new();
        let apples = product("Apples", Decimal::new(250, 2));

        cart.add(&apples);
        cart.add(&apples);
        cart.add(&apples);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 3);
    }

    #[test]
    fn distinct_products_get_distinct_lines() {
        let mut cart = Cart::new();
        let a = product("Apples", Decimal::new(250, 2));
        let b = product("Bread", Decimal::new(120, 2));

        cart.add(&a);
        cart.add(&b);
        cart.add(&a);

        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn remove_then_add_starts_at_quantity_one() {
        let mut cart = Cart::new();
        let milk = product("Milk", Decimal::new(180, 2));

        cart.add(&milk);
        cart.add(&milk);
        cart.remove(milk.id);
        cart.add(&milk);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn total_is_sum_of_price_times_quantity() {
        let mut cart = Cart::new();
        let a = product("Apples", Decimal::new(250, 2)); // 2.50
        let b = product("Bread", Decimal::new(120, 2)); // 1.20

        cart.add(&a);
        cart.add(&a);
        cart.add(&b);

        assert_eq!(cart.total(), Decimal::new(620, 2)); // 2*2.50 + 1.20
    }

    #[test]
    fn zero_price_items_sum_correctly() {
        let mut cart = Cart::new();
        let free = product("Sample", Decimal::ZERO);
        let paid = product("Bread", Decimal::new(120, 2));

        cart.add(&free);
        cart.add(&paid);

        assert_eq!(cart.total(), Decimal::new(120, 2));
    }

    #[test]
    fn removing_last_line_zeroes_the_total() {
        let mut cart = Cart::new();
        let a = product("Apples", Decimal::new(250, 2));

        cart.add(&a);
        cart.remove(a.id);

        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[test]
    fn two_units_at_fifty_total_one_hundred() {
        let mut cart = Cart::new();
        let p = product("Rice 5kg", Decimal::from(50));

        cart.add(&p);
        cart.add(&p);

        assert_eq!(cart.total(), Decimal::from(100));
    }

    #[test]
    fn order_items_carry_product_id_and_quantity() {
        let mut cart = Cart::new();
        let a = product("Apples", Decimal::new(250, 2));
        cart.add(&a);
        cart.add(&a);

        let items = cart.to_order_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product_id, a.id);
        assert_eq!(items[0].quantity, 2);
    }
}
