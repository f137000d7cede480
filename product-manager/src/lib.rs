//! Product table transforms
//!
//! Turns product records from the platform into table rows, builds the
//! column descriptors for the table renderer, and sorts and filters the
//! rows in memory. The `services` layer wraps these transforms with the
//! event handling and remote calls of the product manager table.

pub mod cli;
pub mod config;
pub mod services;
pub mod table;
