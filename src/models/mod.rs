pub mod appointment;
pub mod attachment;
pub mod enums;
pub mod lenient;
pub mod patient;
pub mod user;

pub use appointment::*;
pub use attachment::*;
pub use patient::*;
pub use user::*;
