pub mod crypto;
pub mod pagination;
pub mod time;
pub mod token;
pub mod validation;
