pub mod admin;
pub mod cart;
pub mod checkout;
pub mod detail;
pub mod history;
pub mod login;
pub mod menu;
