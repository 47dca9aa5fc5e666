//! Integration tests for the doctor workflow over the in-memory store

use chrono::{Duration, TimeZone, Utc};
use donor_review::adapters::database::Repositories;
use donor_review::core::{DoctorDirectory, DoctorService};
use donor_review::domain::{
    Doctor, DoctorId, DonorId, DonorMedicalReport, MedicalReportPayload, NewDoctor,
    NewMedicalReport, ReportId, ReviewError, FIT_TO_DONATE, UNFIT,
};

struct Fixture {
    repos: Repositories,
    service: DoctorService,
    directory: DoctorDirectory,
}

impl Fixture {
    async fn new() -> Self {
        let repos = Repositories::in_memory();
        for donor in 1..=3 {
            repos
                .database
                .register_donor(DonorId::new(donor))
                .await
                .unwrap();
        }
        Self {
            service: DoctorService::new(repos.reports.clone()),
            directory: DoctorDirectory::new(repos.doctors.clone()),
            repos,
        }
    }

    async fn doctor(&self, name: &str) -> Doctor {
        self.repos
            .doctors
            .create(NewDoctor::new(name, "Hematology"))
            .await
            .unwrap()
    }

    async fn report(&self, donor: i64, doctor: DoctorId) -> DonorMedicalReport {
        self.repos
            .reports
            .insert(NewMedicalReport::new(DonorId::new(donor), doctor).with_health_status("Pending"))
            .await
            .unwrap()
    }

    async fn snapshot(&self) -> Vec<DonorMedicalReport> {
        let mut reports = self.repos.reports.find_by_approval(true).await.unwrap();
        reports.extend(self.repos.reports.find_by_approval(false).await.unwrap());
        reports.sort_by_key(|r| r.id);
        reports
    }
}

fn is_not_found(err: &ReviewError) -> bool {
    matches!(err, ReviewError::NotFound { .. })
}

#[tokio::test]
async fn test_approve_sets_fit_and_advances_updated_at() {
    let fx = Fixture::new().await;
    let doctor = fx.doctor("Dr. Hart").await;
    let report = fx.report(1, doctor.id).await;

    let approved = fx.service.approve_donation(report.id).await.unwrap();

    assert!(approved.is_approved);
    assert_eq!(approved.health_status.as_deref(), Some(FIT_TO_DONATE));
    assert!(approved.updated_at > report.updated_at);
    assert_eq!(approved.created_at, report.created_at);
}

#[tokio::test]
async fn test_reject_sets_unfit() {
    let fx = Fixture::new().await;
    let doctor = fx.doctor("Dr. Hart").await;
    let report = fx.report(1, doctor.id).await;
    fx.service.approve_donation(report.id).await.unwrap();

    let rejected = fx.service.reject_donation(report.id).await.unwrap();

    assert!(!rejected.is_approved);
    assert_eq!(rejected.health_status.as_deref(), Some(UNFIT));
}

#[tokio::test]
async fn test_approve_twice_is_idempotent_except_timestamp() {
    let fx = Fixture::new().await;
    let doctor = fx.doctor("Dr. Hart").await;
    let report = fx.report(1, doctor.id).await;

    let first = fx.service.approve_donation(report.id).await.unwrap();
    let second = fx.service.approve_donation(report.id).await.unwrap();

    assert!(second.is_approved);
    assert_eq!(second.health_status, first.health_status);
    assert_eq!(second.doctor_notes, first.doctor_notes);
    assert!(second.updated_at > first.updated_at);
}

#[tokio::test]
async fn test_add_notes_sets_then_appends() {
    let fx = Fixture::new().await;
    let doctor = fx.doctor("Dr. Hart").await;
    let report = fx.report(1, doctor.id).await;

    let first = fx
        .service
        .add_medical_notes(report.id, Some("A".to_string()))
        .await
        .unwrap();
    assert_eq!(first.doctor_notes.as_deref(), Some("A"));

    let second = fx
        .service
        .add_medical_notes(report.id, Some("B".to_string()))
        .await
        .unwrap();
    assert_eq!(second.doctor_notes.as_deref(), Some("A\n\nB"));
}

#[tokio::test]
async fn test_add_notes_rejects_overflowing_history() {
    let fx = Fixture::new().await;
    let doctor = fx.doctor("Dr. Hart").await;
    let report = fx.report(1, doctor.id).await;

    fx.service
        .add_medical_notes(report.id, Some("x".repeat(600)))
        .await
        .unwrap();
    let err = fx
        .service
        .add_medical_notes(report.id, Some("y".repeat(600)))
        .await
        .unwrap_err();

    assert!(matches!(err, ReviewError::Validation(_)));
    let stored = fx.repos.reports.find_by_id(report.id).await.unwrap().unwrap();
    assert_eq!(stored.doctor_notes.map(|n| n.len()), Some(600));
}

#[tokio::test]
async fn test_blank_notes_rejected() {
    let fx = Fixture::new().await;
    let doctor = fx.doctor("Dr. Hart").await;
    let report = fx.report(1, doctor.id).await;

    for notes in [None, Some(String::new()), Some("   ".to_string())] {
        let err = fx
            .service
            .add_medical_notes(report.id, notes)
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewError::Validation(_)));
    }
}

#[tokio::test]
async fn test_missing_report_fails_and_leaves_store_unchanged() {
    let fx = Fixture::new().await;
    let doctor = fx.doctor("Dr. Hart").await;
    fx.report(1, doctor.id).await;
    let before = fx.snapshot().await;
    let missing = ReportId::new(999);

    let approve = fx.service.approve_donation(missing).await.unwrap_err();
    let reject = fx.service.reject_donation(missing).await.unwrap_err();
    let notes = fx
        .service
        .add_medical_notes(missing, Some("note".to_string()))
        .await
        .unwrap_err();
    let delete = fx.service.delete_medical_report(missing).await.unwrap_err();

    for err in [&approve, &reject, &notes, &delete] {
        assert!(is_not_found(err), "unexpected error: {err}");
    }
    assert_eq!(approve.to_string(), "Medical report not found with id: 999");
    assert_eq!(fx.snapshot().await, before);
}

#[tokio::test]
async fn test_statistics_scenario() {
    let fx = Fixture::new().await;
    let doctor = fx.doctor("Dr. Hart").await;
    let other = fx.doctor("Dr. Mehta").await;

    let first = fx.report(1, doctor.id).await;
    let second = fx.report(2, doctor.id).await;
    fx.report(3, doctor.id).await;
    fx.report(1, other.id).await;
    fx.service.approve_donation(first.id).await.unwrap();
    fx.service.approve_donation(second.id).await.unwrap();

    let stats = fx.service.get_doctor_statistics(doctor.id).await.unwrap();
    assert_eq!(
        (stats.total_reports, stats.approved_reports, stats.rejected_reports),
        (3, 2, 1)
    );

    for id in [doctor.id, other.id, DoctorId::new(404)] {
        let stats = fx.service.get_doctor_statistics(id).await.unwrap();
        assert_eq!(
            stats.approved_reports + stats.rejected_reports,
            stats.total_reports
        );
    }

    let empty = fx
        .service
        .get_doctor_statistics(DoctorId::new(404))
        .await
        .unwrap();
    assert_eq!(
        (empty.total_reports, empty.approved_reports, empty.rejected_reports),
        (0, 0, 0)
    );
}

#[tokio::test]
async fn test_has_report_matches_lookup() {
    let fx = Fixture::new().await;
    let doctor = fx.doctor("Dr. Hart").await;
    fx.report(1, doctor.id).await;

    for donor in 1..=3 {
        let donor = DonorId::new(donor);
        let has = fx.service.has_medical_report(donor).await.unwrap();
        let found = fx.repos.reports.find_by_donor_id(donor).await.unwrap();
        assert_eq!(has, found.is_some());
    }
    assert!(fx.service.has_medical_report(DonorId::new(1)).await.unwrap());
    assert!(!fx.service.has_medical_report(DonorId::new(2)).await.unwrap());
}

#[tokio::test]
async fn test_create_then_read_round_trip() {
    let fx = Fixture::new().await;
    fx.doctor("Dr. Hart").await;
    let doctor = fx.doctor("Dr. Mehta").await;
    assert_eq!(doctor.id, DoctorId::new(2));

    let created = fx
        .service
        .create_medical_report(MedicalReportPayload {
            donor_id: Some(DonorId::new(1)),
            doctor_id: Some(DoctorId::new(2)),
            health_status: Some("Pending".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let read = fx.repos.reports.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(read, created);
    assert_eq!(read.donor_id, DonorId::new(1));
    assert_eq!(read.doctor_id, DoctorId::new(2));
    assert_eq!(read.health_status.as_deref(), Some("Pending"));
    assert!(!read.is_approved);
    assert_eq!(read.doctor_notes, None);
}

#[tokio::test]
async fn test_create_rejects_unknown_references() {
    let fx = Fixture::new().await;
    let doctor = fx.doctor("Dr. Hart").await;

    let unknown_donor = fx
        .service
        .create_medical_report(MedicalReportPayload {
            donor_id: Some(DonorId::new(77)),
            doctor_id: Some(doctor.id),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(unknown_donor, ReviewError::Referential(_)));

    let unknown_doctor = fx
        .service
        .create_medical_report(MedicalReportPayload {
            donor_id: Some(DonorId::new(1)),
            doctor_id: Some(DoctorId::new(77)),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(unknown_doctor, ReviewError::Referential(_)));
}

#[tokio::test]
async fn test_update_keeps_created_at() {
    let fx = Fixture::new().await;
    let doctor = fx.doctor("Dr. Hart").await;
    let report = fx.report(1, doctor.id).await;

    let updated = fx
        .service
        .update_medical_report(
            report.id,
            MedicalReportPayload {
                donor_id: Some(DonorId::new(2)),
                doctor_id: Some(doctor.id),
                doctor_notes: Some("Low iron".to_string()),
                health_status: Some("Deferred".to_string()),
                is_approved: Some(false),
                appointment_date: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.id, report.id);
    assert_eq!(updated.created_at, report.created_at);
    assert!(updated.updated_at > report.updated_at);
    assert_eq!(updated.donor_id, DonorId::new(2));
    assert_eq!(updated.health_status.as_deref(), Some("Deferred"));
}

#[tokio::test]
async fn test_latest_and_earliest_report_for_donor() {
    let fx = Fixture::new().await;
    let doctor = fx.doctor("Dr. Hart").await;
    let first = fx.report(1, doctor.id).await;
    let second = fx.report(1, doctor.id).await;

    let earliest = fx.service.get_medical_report(DonorId::new(1)).await.unwrap();
    let latest = fx
        .service
        .get_latest_medical_report(DonorId::new(1))
        .await
        .unwrap();

    assert_eq!(earliest.id, first.id);
    assert_eq!(latest.id, second.id);

    let err = fx
        .service
        .get_latest_medical_report(DonorId::new(3))
        .await
        .unwrap_err();
    assert!(is_not_found(&err));
}

#[tokio::test]
async fn test_appointment_queries() {
    let fx = Fixture::new().await;
    let doctor = fx.doctor("Dr. Hart").await;
    let day = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();

    let scheduled = fx
        .repos
        .reports
        .insert(NewMedicalReport::new(DonorId::new(2), doctor.id).with_appointment(day))
        .await
        .unwrap();
    fx.repos
        .reports
        .insert(
            NewMedicalReport::new(DonorId::new(3), doctor.id)
                .with_appointment(day + Duration::days(10)),
        )
        .await
        .unwrap();

    let in_range = fx
        .service
        .get_medical_reports_by_appointment_range(day, day + Duration::days(1))
        .await
        .unwrap();
    assert_eq!(in_range.len(), 1);
    assert_eq!(in_range[0].id, scheduled.id);

    let inverted = fx
        .service
        .get_medical_reports_by_appointment_range(day + Duration::days(1), day)
        .await
        .unwrap_err();
    assert!(matches!(inverted, ReviewError::Validation(_)));

    let exact = fx
        .service
        .get_medical_report_for_appointment(DonorId::new(2), day)
        .await
        .unwrap();
    assert_eq!(exact.id, scheduled.id);
}

#[tokio::test]
async fn test_filter_queries() {
    let fx = Fixture::new().await;
    let doctor = fx.doctor("Dr. Hart").await;
    let other = fx.doctor("Dr. Mehta").await;
    let approved = fx.report(1, doctor.id).await;
    fx.report(2, other.id).await;
    fx.service.approve_donation(approved.id).await.unwrap();

    let by_doctor = fx
        .service
        .get_medical_reports_by_doctor(other.id)
        .await
        .unwrap();
    assert_eq!(by_doctor.len(), 1);
    assert_eq!(by_doctor[0].doctor_id, other.id);

    let approved_list = fx.service.get_approved_medical_reports().await.unwrap();
    assert_eq!(approved_list.len(), 1);
    assert_eq!(approved_list[0].id, approved.id);

    let unapproved = fx.service.get_unapproved_medical_reports().await.unwrap();
    assert_eq!(unapproved.len(), 1);

    let fit = fx
        .service
        .get_medical_reports_by_health_status(FIT_TO_DONATE)
        .await
        .unwrap();
    assert_eq!(fit.len(), 1);
    assert!(fx
        .service
        .get_medical_reports_by_health_status("Unknown")
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_deleting_doctor_cascades_to_reports() {
    let fx = Fixture::new().await;
    let doctor = fx.doctor("Dr. Hart").await;
    let other = fx.doctor("Dr. Mehta").await;
    let first = fx.report(1, doctor.id).await;
    let second = fx.report(2, doctor.id).await;
    let kept = fx.report(3, other.id).await;

    fx.directory.delete_doctor(doctor.id).await.unwrap();

    assert!(!fx.repos.reports.exists_by_id(first.id).await.unwrap());
    assert!(!fx.repos.reports.exists_by_id(second.id).await.unwrap());
    assert!(fx.repos.reports.exists_by_id(kept.id).await.unwrap());

    let err = fx.directory.get_doctor(doctor.id).await.unwrap_err();
    assert!(is_not_found(&err));
}

#[tokio::test]
async fn test_delete_report() {
    let fx = Fixture::new().await;
    let doctor = fx.doctor("Dr. Hart").await;
    let report = fx.report(1, doctor.id).await;

    fx.service.delete_medical_report(report.id).await.unwrap();

    assert!(!fx.repos.reports.exists_by_id(report.id).await.unwrap());
    let again = fx.service.delete_medical_report(report.id).await.unwrap_err();
    assert!(is_not_found(&again));
}
