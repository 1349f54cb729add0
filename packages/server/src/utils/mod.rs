pub mod jwt;
pub mod request;
