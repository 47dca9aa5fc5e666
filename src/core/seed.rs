//! Startup seed data
//!
//! Registers configured donor identifiers and fills an empty doctors table.

use crate::adapters::database::Repositories;
use crate::config::SeedConfig;
use crate::domain::{DonorId, NewDoctor, Result};

/// Doctors inserted when the configuration names none
const DEFAULT_ROSTER: [(&str, &str); 3] = [
    ("Dr. Amelia Hart", "Hematology"),
    ("Dr. Rahul Mehta", "Transfusion Medicine"),
    ("Dr. Sofia Lindqvist", "Internal Medicine"),
];

/// What a seed run changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub donors_registered: usize,
    pub doctors_created: usize,
}

/// Apply the seed configuration
///
/// Idempotent: donors are registered with upsert semantics and doctors are
/// only inserted into an empty table.
///
/// # Errors
///
/// Fails on an invalid configured doctor or a store error.
pub async fn apply_seed(repos: &Repositories, config: &SeedConfig) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();
    if !config.enabled {
        tracing::debug!("Seeding disabled");
        return Ok(summary);
    }

    for &donor_id in &config.donor_ids {
        repos.database.register_donor(DonorId::new(donor_id)).await?;
        summary.donors_registered += 1;
    }

    if repos.doctors.count().await? == 0 {
        let roster: Vec<NewDoctor> = if config.doctors.is_empty() {
            DEFAULT_ROSTER
                .iter()
                .map(|(name, specialization)| NewDoctor::new(*name, *specialization))
                .collect()
        } else {
            config
                .doctors
                .iter()
                .map(|doctor| doctor.to_new_doctor())
                .collect::<std::result::Result<_, _>>()?
        };

        for doctor in roster {
            repos.doctors.create(doctor).await?;
            summary.doctors_created += 1;
        }
    }

    tracing::info!(
        donors_registered = summary.donors_registered,
        doctors_created = summary.doctors_created,
        "Seed data applied"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SeedDoctor;

    #[tokio::test]
    async fn test_default_roster_inserted_once() {
        let repos = Repositories::in_memory();
        let config = SeedConfig {
            donor_ids: vec![1, 2],
            ..Default::default()
        };

        let first = apply_seed(&repos, &config).await.unwrap();
        let second = apply_seed(&repos, &config).await.unwrap();

        assert_eq!(first.doctors_created, 3);
        assert_eq!(first.donors_registered, 2);
        assert_eq!(second.doctors_created, 0);
        assert_eq!(repos.doctors.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_configured_doctors_replace_roster() {
        let repos = Repositories::in_memory();
        let config = SeedConfig {
            doctors: vec![SeedDoctor {
                name: "Dr. Ada Obi".to_string(),
                specialization: "Pathology".to_string(),
            }],
            ..Default::default()
        };

        apply_seed(&repos, &config).await.unwrap();
        let doctors = repos.doctors.find_all().await.unwrap();
        assert_eq!(doctors.len(), 1);
        assert_eq!(doctors[0].name, "Dr. Ada Obi");
    }

    #[tokio::test]
    async fn test_disabled_seed_does_nothing() {
        let repos = Repositories::in_memory();
        let config = SeedConfig {
            enabled: false,
            donor_ids: vec![1],
            ..Default::default()
        };

        assert_eq!(apply_seed(&repos, &config).await.unwrap(), SeedSummary::default());
        assert_eq!(repos.doctors.count().await.unwrap(), 0);
    }
}
