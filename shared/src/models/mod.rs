//! Domain models

mod interaction;
mod product;

pub use interaction::{ActionType, InteractionEvent};
pub use product::{Product, LOW_STOCK_THRESHOLD, URGENT_EXPIRY_DAYS};
