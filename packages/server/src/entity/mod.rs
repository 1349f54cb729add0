pub mod blood_request;
pub mod donation;
pub mod donor;
pub mod profile;
