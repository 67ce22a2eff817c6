//! Accessibility monitoring server library.
//!
//! Case management for website accessibility audits: WCAG check results kept
//! in step with the pages under test, accessibility statement assessment,
//! retests of outstanding issues and the compliance figures derived from them.

pub mod api;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod services;
