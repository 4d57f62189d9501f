//! Records, value objects and the calculation engine. Nothing in here touches
//! storage or the clock.

pub mod calc;
pub mod investment;
pub mod money;
pub mod ports;
pub mod stock;
pub mod transaction;
pub mod user;
