pub mod check_availability;
pub mod get;
pub mod list;
pub mod list_images;

pub use check_availability::CheckAvailabilityQuery;
pub use get::{GetPropertyError, GetPropertyQuery, PropertyDetail};
pub use list::{ListPropertiesError, ListPropertiesQuery, PropertyOrdering};
pub use list_images::ListImagesQuery;
