//! Core Laika types: the state tree, visit options and response outcomes.

mod payload;
mod request;
mod response;

pub use payload::{
    ComponentDescriptor, LayoutName, PageMeta, PageObject, StateTree, ThemeObject,
};
pub use request::{NavigationRequest, VisitOptions};
pub use response::{Outcome, PageResponse, RawResponse};
