//! Shared newtypes and enums.

pub mod email;
pub mod id;
pub mod order_number;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use order_number::{OrderNumber, OrderNumberError};
pub use price::{CurrencyCode, Price};
pub use status::{OrderStatus, PaymentMethod, PaymentStatus};
