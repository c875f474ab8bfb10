pub mod coordinates;
pub mod health;
pub mod permits;
pub mod views;
