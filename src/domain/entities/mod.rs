//! Domain Entities

mod folder_mapping;
mod upload_request;

pub use folder_mapping::{FolderMapping, MappingError};
pub use upload_request::UploadRequest;
