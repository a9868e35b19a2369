pub mod bottle_handlers;
pub mod health_handlers;
