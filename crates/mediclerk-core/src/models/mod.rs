pub mod payload;
pub mod record;
pub mod user;
