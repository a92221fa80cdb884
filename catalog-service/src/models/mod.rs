pub mod book;
pub mod catalog;
pub mod criteria;
pub mod responses;
