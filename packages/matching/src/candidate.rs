use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::donor::{DonationHistory, DonorProfile, DonorRecord};
use crate::phone::normalize_phone;

/// Key under which two candidates are considered the same person.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum IdentityKey {
    User(Uuid),
    Phone(String),
    Record(Uuid),
}

/// Where a candidate came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum CandidateSource {
    HospitalManaged(DonorRecord),
    SelfRegistered(DonorProfile),
}

/// Unified view of one donor for a single matching evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateDonor {
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub location: String,
    pub blood_group: String,
    pub donation_count: u32,
    pub last_donation_date: Option<NaiveDate>,
    pub source: CandidateSource,
}

impl CandidateDonor {
    pub fn from_record(record: DonorRecord) -> Self {
        Self {
            full_name: record.full_name.clone(),
            phone: record.phone.clone(),
            email: record.email.clone(),
            location: record.location.clone(),
            blood_group: record.blood_group.clone(),
            donation_count: record.donation_count,
            last_donation_date: record.last_donation_date,
            source: CandidateSource::HospitalManaged(record),
        }
    }

    /// Profiles carry no cached stats, so the resolved history supplies them.
    pub fn from_profile(profile: DonorProfile, history: DonationHistory) -> Self {
        Self {
            full_name: profile.full_name.clone(),
            phone: profile.phone.clone(),
            email: None,
            location: profile.location.clone().unwrap_or_default(),
            blood_group: profile.blood_group.clone(),
            donation_count: history.count,
            last_donation_date: history.last_date,
            source: CandidateSource::SelfRegistered(profile),
        }
    }

    /// Record id for hospital-managed donors, user id for self-registered ones.
    pub fn id(&self) -> Uuid {
        match &self.source {
            CandidateSource::HospitalManaged(record) => record.id,
            CandidateSource::SelfRegistered(profile) => profile.user_id,
        }
    }

    pub fn user_id(&self) -> Option<Uuid> {
        match &self.source {
            CandidateSource::HospitalManaged(record) => record.linked_user_id,
            CandidateSource::SelfRegistered(profile) => Some(profile.user_id),
        }
    }

    pub fn is_hospital_managed(&self) -> bool {
        matches!(self.source, CandidateSource::HospitalManaged(_))
    }

    /// Primary identity: user id, else normalized phone, else record id.
    pub fn identity_key(&self) -> IdentityKey {
        if let Some(user_id) = self.user_id() {
            IdentityKey::User(user_id)
        } else if let Some(phone) = normalize_phone(&self.phone) {
            IdentityKey::Phone(phone)
        } else {
            IdentityKey::Record(self.id())
        }
    }

    /// Every key this candidate claims. A later candidate sharing any of them is a duplicate.
    pub fn identity_keys(&self) -> Vec<IdentityKey> {
        let mut keys = claimed_keys(self.user_id(), &self.phone);
        if keys.is_empty() {
            keys.push(IdentityKey::Record(self.id()));
        }
        keys
    }
}

impl DonorProfile {
    /// Keys the profile will claim once it becomes a candidate.
    pub fn identity_keys(&self) -> Vec<IdentityKey> {
        claimed_keys(Some(self.user_id), &self.phone)
    }
}

fn claimed_keys(user_id: Option<Uuid>, phone: &str) -> Vec<IdentityKey> {
    let mut keys = Vec::with_capacity(2);
    if let Some(user_id) = user_id {
        keys.push(IdentityKey::User(user_id));
    }
    if let Some(phone) = normalize_phone(phone) {
        keys.push(IdentityKey::Phone(phone));
    }
    keys
}
