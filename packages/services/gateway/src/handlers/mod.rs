//! HTTP 핸들러

pub mod auth;
pub mod basic;
pub mod health;
pub mod path;
