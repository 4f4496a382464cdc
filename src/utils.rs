pub mod logs;
pub mod password;
pub mod price;
pub mod validate;
