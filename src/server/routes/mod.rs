pub mod comics;
pub mod explanation;
pub mod users;
