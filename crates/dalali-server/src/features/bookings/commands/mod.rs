pub mod create;
pub mod transition;

pub use create::CreateBookingCommand;
pub use transition::TransitionBookingCommand;
