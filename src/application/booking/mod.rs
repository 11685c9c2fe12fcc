mod booking_service;
mod errors;

#[allow(unused_imports)]
pub use booking_service::{
    ServiceDependencies, decide_booking, get_booking, list_for_booker, list_for_owner,
    request_booking,
};
#[allow(unused_imports)]
pub use errors::{BookingApplicationError, Result};
