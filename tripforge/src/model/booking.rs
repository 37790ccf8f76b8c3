use serde::{Deserialize, Serialize};

/// booking requirements for demand-responsive service. may be declared at
/// route, trip, or stop level; the effective arrangement for a leg is
/// resolved most-specific-wins (stop > trip > route), each level only
/// overriding the fields it actually sets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingArrangement {
    pub booking_contact: Option<String>,
    pub booking_methods: Option<String>,
    pub latest_booking_time: Option<String>,
    pub minimum_booking_period: Option<String>,
    pub book_when: Option<String>,
    pub booking_note: Option<String>,
}

impl BookingArrangement {
    /// overlay the fields set on `other` onto this arrangement.
    pub fn add_overrides(&mut self, other: &BookingArrangement) {
        if other.booking_contact.is_some() {
            self.booking_contact = other.booking_contact.clone();
        }
        if other.booking_methods.is_some() {
            self.booking_methods = other.booking_methods.clone();
        }
        if other.latest_booking_time.is_some() {
            self.latest_booking_time = other.latest_booking_time.clone();
        }
        if other.minimum_booking_period.is_some() {
            self.minimum_booking_period = other.minimum_booking_period.clone();
        }
        if other.book_when.is_some() {
            self.book_when = other.book_when.clone();
        }
        if other.booking_note.is_some() {
            self.booking_note = other.booking_note.clone();
        }
    }
}
