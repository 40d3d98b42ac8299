pub mod action;
pub mod market_scope;
pub mod price;
pub mod stage;
pub mod symbol;
