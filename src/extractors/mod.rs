//! Request extractors.

mod request;

pub use request::RequestContext;
