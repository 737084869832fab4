pub mod accounts;
pub mod cart;
pub mod catalog;
pub mod filters;
pub mod listing;
pub mod orders;
pub mod session;
pub mod storefront;

pub use storefront::Storefront;
