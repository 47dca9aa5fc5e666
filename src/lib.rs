// Donor Review - Blood Donor Medical Report Review Service
// Copyright (c) 2025 Donor Review Contributors
// Licensed under the MIT License

//! # Donor Review
//!
//! REST backend that lets doctors review blood donor medical reports:
//! create and update reports, approve or reject donations, append medical
//! notes, and query reports by donor, doctor, status or appointment window.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface (`serve`, `migrate`, `validate-config`, `init`)
//! - [`api`] - HTTP routes under `/api/doctor` and error bodies
//! - [`core`] - Doctor workflow service, doctor directory, seed data
//! - [`adapters`] - Report and doctor stores (PostgreSQL, in-memory)
//! - [`domain`] - Reports, doctors, identifiers, validation and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use donor_review::adapters::database::create_repositories;
//! use donor_review::api::{router, serve, AppState};
//! use donor_review::config::load_config;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("donor-review.toml")?;
//!     let repos = create_repositories(&config).await?;
//!     repos.database.ensure_schema().await?;
//!
//!     let app = router(AppState::from_repositories(&repos), &config.server);
//!     let listener = TcpListener::bind(config.server.bind_address()).await?;
//!
//!     let (_stop, shutdown) = tokio::sync::watch::channel(false);
//!     serve(listener, app, shutdown).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Doctor Workflow
//!
//! ```rust
//! use donor_review::adapters::database::Repositories;
//! use donor_review::core::DoctorService;
//! use donor_review::domain::{DonorId, NewDoctor, NewMedicalReport};
//!
//! # #[tokio::main]
//! # async fn main() -> donor_review::domain::Result<()> {
//! let repos = Repositories::in_memory();
//! repos.database.register_donor(DonorId::new(1)).await?;
//! let doctor = repos.doctors.create(NewDoctor::new("Dr. Hart", "Hematology")).await?;
//!
//! let report = repos
//!     .reports
//!     .insert(NewMedicalReport::new(DonorId::new(1), doctor.id).with_health_status("Pending"))
//!     .await?;
//!
//! let service = DoctorService::new(repos.reports.clone());
//! let approved = service.approve_donation(report.id).await?;
//! assert!(approved.is_approved);
//! assert_eq!(approved.health_status.as_deref(), Some("Fit to Donate"));
//!
//! let stats = service.get_doctor_statistics(doctor.id).await?;
//! assert_eq!(stats.approved_reports, 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every layer returns [`domain::ReviewError`]; the HTTP layer maps it to a
//! status code and a JSON error body (404 not found, 400 validation with
//! per-field messages, 409 referential violation, 500 otherwise).

pub mod adapters;
pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
