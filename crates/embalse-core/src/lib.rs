//! Core library for Embalse.
//!
//! Contains the content model, the data access layer over a
//! [`ContentStore`](embalse_store::ContentStore), admin form validation, the
//! admin session gate, the admin panels, and the public page data with its
//! fallbacks. This crate knows nothing about HTTP routing or HTML; the server
//! crate renders what it returns.

pub mod calendar;
pub mod content;
pub mod display;
pub mod error;
pub mod forms;
pub mod gate;
pub mod models;
pub mod panels;
