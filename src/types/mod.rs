// ScrollWise shared type definitions
// Each submodule defines types used across the client.

pub mod bookmark;
pub mod errors;
pub mod route;
pub mod settings;
pub mod submission;
pub mod summary;
