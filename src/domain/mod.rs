pub mod booking;
pub mod commands;
pub mod errors;
pub mod state_filter;
pub mod value_objects;

pub use booking::{Booking, BookingStatus, NewBooking};
pub use errors::*;
pub use state_filter::StateFilter;
pub use value_objects::*;
