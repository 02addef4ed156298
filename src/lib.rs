//! md2html: a stateless markdown-to-HTML cloud function.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
