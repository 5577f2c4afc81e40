pub mod availability;
pub mod booking;
pub mod service;

pub use availability::{AvailabilityReport, SlotCandidate, TimeSlot};
pub use booking::{Booking, BookingFilter, BookingPatch, BookingStatus, NewBooking, BOOKINGS_PAGE_SIZE};
pub use service::{Service, MAX_SERVICE_DURATION_MINUTES, MIN_SERVICE_DURATION_MINUTES};
