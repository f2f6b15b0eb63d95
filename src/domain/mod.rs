pub mod user;
pub mod event;
pub mod registration;
pub mod announcement;

pub use user::*;
pub use event::*;
pub use registration::*;
pub use announcement::*;
