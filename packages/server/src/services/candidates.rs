use futures::{StreamExt, stream};
use matching::{DonationHistory, DonorProfile, DonorRecord, MatchingEngine, RequestScope};
use tracing::{debug, instrument, warn};

use crate::store::{DonorStore, StoreError};

/// Raw inputs for one engine evaluation.
#[derive(Debug, Default)]
pub struct CandidatePool {
    pub hospital_donors: Vec<DonorRecord>,
    pub profiles: Vec<(DonorProfile, DonationHistory)>,
}

/// Load the hospital roster and the matching self-registered donors with their history.
///
/// Only a failed roster fetch is an error. A failed profile fetch degrades to no
/// self-registered donors, and a failed history lookup to an empty history.
/// History lookups run at most `lookup_concurrency` at a time.
#[instrument(skip_all, fields(hospital_id = %scope.hospital_id, blood_group = %scope.blood_group))]
pub async fn gather_candidates(
    store: &dyn DonorStore,
    engine: &MatchingEngine,
    scope: &RequestScope,
    lookup_concurrency: usize,
) -> Result<CandidatePool, StoreError> {
    let (hospital_donors, all_profiles) = tokio::join!(
        store.fetch_hospital_donors(scope.hospital_id),
        store.fetch_all_donor_profiles(),
    );
    let hospital_donors = hospital_donors?;
    let all_profiles = all_profiles.unwrap_or_else(|e| {
        warn!(error = %e, "Donor profile fetch failed, continuing with hospital donors only");
        Vec::new()
    });

    let to_resolve = engine.profiles_to_resolve(scope, &hospital_donors, &all_profiles);
    debug!(
        hospital_donors = hospital_donors.len(),
        profiles = all_profiles.len(),
        to_resolve = to_resolve.len(),
        "Fetched donor sources"
    );

    let profiles = stream::iter(to_resolve.into_iter().cloned())
        .map(|profile| async move {
            let history = match store.fetch_donation_history(profile.user_id).await {
                Ok(history) => history,
                Err(e) => {
                    warn!(
                        user_id = %profile.user_id,
                        error = %e,
                        "Donation history lookup failed, assuming no donations"
                    );
                    DonationHistory::default()
                }
            };
            (profile, history)
        })
        .buffered(lookup_concurrency.max(1))
        .collect()
        .await;

    Ok(CandidatePool {
        hospital_donors,
        profiles,
    })
}
