//! Request orchestration: each function is one linear sequence of store and
//! upstream calls. Collaborators are passed in explicitly.

pub mod comics;
pub mod explanation;
pub mod password;
pub mod users;
