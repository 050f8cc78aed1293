pub mod login;
pub mod refresh;
pub mod register;

pub use login::{LoginCommand, LoginError, LoginRequest, LoginResponse};
pub use refresh::{AccessToken, RefreshCommand, RefreshError, RefreshRequest};
pub use register::{RegisterCommand, RegisterError, RegisterRequest, RegisterResponse};
