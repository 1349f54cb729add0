use matching::{DonorProfile, HospitalContact};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account profile shared by donors and hospitals.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    /// Same as the auth provider's user id.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub full_name: String,
    pub phone: String,
    pub location: Option<String>,
    /// Set only for donor accounts.
    pub blood_group: Option<String>,
    pub hospital_name: Option<String>,
    pub hospital_address: Option<String>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Donor view of this profile; `None` for profiles without a blood group.
    pub fn into_donor_profile(self) -> Option<DonorProfile> {
        let blood_group = self.blood_group?;
        Some(DonorProfile {
            user_id: self.id,
            full_name: self.full_name,
            phone: self.phone,
            location: self.location,
            blood_group,
        })
    }

    pub fn hospital_contact(&self) -> HospitalContact {
        let name = self
            .hospital_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .or(Some(self.full_name.as_str()).filter(|name| !name.trim().is_empty()))
            .map(str::to_string)
            .unwrap_or_else(|| HospitalContact::default().name);

        HospitalContact {
            name,
            address: self.hospital_address.clone().filter(|a| !a.trim().is_empty()),
            phone: Some(self.phone.clone()).filter(|p| !p.trim().is_empty()),
        }
    }
}
