//! Architekt kúziel - content management backend with AI assistants
//!
//! Users, content with tags and collaborators, dashboard widgets and
//! notifications, plus rule-based and LLM-backed writing assistants.

pub mod api;
pub mod cache;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
