pub mod add_image;
pub mod create;
pub mod delete;
pub mod delete_image;
pub mod set_primary_image;
pub mod update;

pub use add_image::AddImageCommand;
pub use create::{CreatePropertyCommand, CreatePropertyError, CreatePropertyRequest};
pub use delete::{DeletePropertyCommand, DeletePropertyError, DeletePropertyResponse};
pub use delete_image::{DeleteImageCommand, DeleteImageResponse};
pub use set_primary_image::SetPrimaryImageCommand;
pub use update::{UpdatePropertyCommand, UpdatePropertyError, UpdatePropertyRequest};
