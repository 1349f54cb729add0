pub mod blood_group;
pub mod candidate;
pub mod dedup;
pub mod donor;
pub mod eligibility;
pub mod engine;
pub mod phone;
pub mod rank;
pub mod request_status;
pub mod urgency;

pub use candidate::{CandidateDonor, CandidateSource, IdentityKey};
pub use donor::{
    BloodRequest, DonationEvent, DonationHistory, DonorProfile, DonorRecord, HospitalContact,
};
pub use eligibility::EligibilityPolicy;
pub use engine::{
    Evaluation, MAX_SUGGESTIONS, MatchingEngine, Precondition, RequestScope, SuggestionSet,
};
pub use rank::RankedCandidate;
pub use request_status::RequestStatus;
pub use urgency::UrgencyLevel;
