pub mod filter;
pub mod pagination;
pub mod selection;
pub mod session;
