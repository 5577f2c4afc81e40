pub mod bookings;
pub mod scheduling;
pub mod slots;
pub mod time;

pub use bookings::BookingService;
pub use scheduling::SchedulingError;
