mod cart;
mod order;
mod product;
mod review;
mod shop;
mod user;

pub use cart::*;
pub use order::*;
pub use product::*;
pub use review::*;
pub use shop::*;
pub use user::*;
