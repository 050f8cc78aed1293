pub mod update_profile;

pub use update_profile::{UpdateProfileCommand, UpdateProfileError, UpdateProfileRequest};
