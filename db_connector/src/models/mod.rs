pub mod chargers;
pub mod connectors;
pub mod favorites;
pub mod password_reset_tokens;
pub mod users;
