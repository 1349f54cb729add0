use matching::DonationEvent;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Append-only donation log. Exactly one of `donor_id` / `donor_user_id` is set.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "donations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub donor_id: Option<Uuid>,
    #[sea_orm(indexed)]
    pub donor_user_id: Option<Uuid>,
    pub hospital_id: Uuid,
    pub blood_group: String,
    pub donation_date: Date,
    pub units_donated: i32,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for DonationEvent {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            donor_record_id: m.donor_id,
            donor_user_id: m.donor_user_id,
            hospital_id: m.hospital_id,
            blood_group: m.blood_group,
            donation_date: m.donation_date,
            units_donated: m.units_donated,
        }
    }
}
