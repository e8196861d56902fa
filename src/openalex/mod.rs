mod client;
mod config;
mod hierarchy;
mod parse;
mod request;
mod works;

pub use client::{FetchError, HttpTransport, OpenAlexClient, PAGE_SIZE, Transport};
pub use config::{ClientConfig, DEFAULT_API_URL};
pub use hierarchy::{HierarchyNode, build_hierarchy};
pub use parse::{
    GroupCount, ListQuery, ListResponse, ParentRef, RawAuthor, RawDomain, RawField, RawSubfield,
    RawTopic, RawWork, Topic,
};
pub use request::{RequestToken, RequestTracker};
pub use works::{WorkGraph, WorkNode};
