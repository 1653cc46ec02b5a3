//! OPTIONS body generation for REST resources.

pub mod body;
pub mod context;
pub mod error;
pub mod fields;
pub mod merger;
pub mod methods;
pub mod node;
pub mod registry;
pub mod whitelist;

pub use body::{assemble, build_body, render};
pub use context::{ResourceContext, ResourceKind};
pub use error::OptionsError;
pub use node::{ConfigNode, Key, OrderedMap};
pub use registry::{ResourceConfig, ResourceRegistry};
