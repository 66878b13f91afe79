//! HTTP request domain types

mod descriptor;
mod method;

pub use descriptor::{
    FileAttachment, Header, JSON_CONTENT_TYPE, Part, PartValue, RequestBody, RequestDescriptor,
};
pub use method::HttpMethod;
