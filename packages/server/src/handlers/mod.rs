pub mod alert;
pub mod health;
pub mod suggestion;
