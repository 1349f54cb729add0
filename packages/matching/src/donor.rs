use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::request_status::RequestStatus;
use crate::urgency::UrgencyLevel;

/// A donor managed directly by one hospital.
///
/// `donation_count` and `last_donation_date` are cached on the record.
/// `linked_user_id` is a weak reference to the donor's self-registered profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DonorRecord {
    pub id: Uuid,
    pub full_name: String,
    pub blood_group: String,
    pub phone: String,
    pub email: Option<String>,
    pub location: String,
    pub donation_count: u32,
    pub last_donation_date: Option<NaiveDate>,
    pub hospital_id: Option<Uuid>,
    pub linked_user_id: Option<Uuid>,
}

/// A self-registered donor profile, visible to every hospital.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DonorProfile {
    pub user_id: Uuid,
    pub full_name: String,
    pub phone: String,
    pub location: Option<String>,
    pub blood_group: String,
}

/// Append-only record of a single donation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationEvent {
    pub id: Uuid,
    pub donor_record_id: Option<Uuid>,
    pub donor_user_id: Option<Uuid>,
    pub hospital_id: Uuid,
    pub blood_group: String,
    pub donation_date: NaiveDate,
    pub units_donated: i32,
}

/// Donation count and most recent donation date for one donor.
///
/// The default value (no donations) is also the fallback when a lookup fails,
/// which makes the donor maximally eligible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationHistory {
    pub count: u32,
    pub last_date: Option<NaiveDate>,
}

impl DonationHistory {
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a DonationEvent>) -> Self {
        events
            .into_iter()
            .fold(Self::default(), |acc, event| Self {
                count: acc.count + 1,
                last_date: acc.last_date.max(Some(event.donation_date)),
            })
    }
}

/// An emergency blood request raised by a hospital.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct BloodRequest {
    pub id: Uuid,
    /// Rows written before the column was enforced may lack it.
    pub hospital_id: Option<Uuid>,
    pub blood_group: String,
    pub units_needed: i32,
    pub urgency_level: UrgencyLevel,
    pub patient_name: String,
    pub patient_contact: String,
    pub status: RequestStatus,
}

/// Display details of the requesting hospital, used in alert text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HospitalContact {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
}

impl Default for HospitalContact {
    fn default() -> Self {
        Self {
            name: "Hospital".into(),
            address: None,
            phone: None,
        }
    }
}
