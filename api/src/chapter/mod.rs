pub mod comment;
pub mod routes;
