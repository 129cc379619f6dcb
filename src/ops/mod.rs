pub mod auth;
pub mod draft;
pub mod filter;
pub mod idea_ops;
pub mod import;
