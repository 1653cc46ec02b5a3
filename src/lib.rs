//! Self-describing REST resources.
//!
//! Answers HTTP `OPTIONS` requests with a JSON document describing the target
//! resource: its allowed methods, its input fields and any free-form
//! documentation configured for it. See [`options`] for the document builder.

pub mod config;
pub mod filewatcher;
pub mod http;
pub mod options;
