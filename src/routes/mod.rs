pub mod health;
pub mod resorts;
