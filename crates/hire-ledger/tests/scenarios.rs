//! # End-to-end ledger scenarios
//!
//! Each test drives the combined ledger through `LedgerService` with a
//! manual clock, the way an API handler would.

use std::sync::Arc;

use hire_core::{Address, ApplicationId, JobId, LedgerError, ManualClock, Timestamp, TokenId, UserRole};
use hire_ledger::{
    CertificateBatch, LedgerConfig, LedgerEvent, LedgerService, Outcome, ServiceError, Transaction,
};

struct Fixture {
    service: LedgerService,
    clock: Arc<ManualClock>,
}

fn admin() -> Address {
    Address::derive("admin")
}

fn alice() -> Address {
    Address::derive("alice")
}

fn bob() -> Address {
    Address::derive("bob")
}

fn carol() -> Address {
    Address::derive("carol")
}

fn fixture() -> Fixture {
    let clock = Arc::new(ManualClock::starting_at(
        Timestamp::parse("2026-09-01T08:00:00Z").unwrap(),
    ));
    let service = LedgerService::new(&LedgerConfig::with_admin(admin()), clock.clone());
    Fixture { service, clock }
}

fn register(f: &Fixture, who: Address, name: &str, role: UserRole) {
    f.service
        .submit(
            who,
            Transaction::RegisterUser {
                name: name.into(),
                email: format!("{name}@example.com"),
                role,
            },
        )
        .unwrap();
}

fn ledger_err(result: Result<hire_ledger::Receipt, ServiceError>) -> LedgerError {
    match result {
        Err(ServiceError::Ledger(e)) => e,
        other => panic!("expected ledger error, got {other:?}"),
    }
}

fn post_job(f: &Fixture, employer: Address, deadline: Timestamp) -> Result<hire_ledger::Receipt, ServiceError> {
    f.service.submit(
        employer,
        Transaction::PostJob {
            title: "Engineer".into(),
            description: "Build the ledger".into(),
            deadline,
        },
    )
}

#[test]
fn scenario_a_apply_and_review() {
    let f = fixture();
    register(&f, alice(), "alice", UserRole::JobSeeker);
    register(&f, bob(), "bob", UserRole::Employer);

    let receipt = post_job(&f, bob(), f.clock.now().plus_secs(86_400)).unwrap();
    assert_eq!(receipt.outcome, Outcome::Job(JobId(1)));

    let receipt = f
        .service
        .submit(alice(), Transaction::ApplyForJob { job_id: JobId(1) })
        .unwrap();
    assert_eq!(receipt.outcome, Outcome::Application(ApplicationId(1)));
    assert_eq!(
        receipt.events,
        vec![LedgerEvent::ApplicationSubmitted {
            application_id: ApplicationId(1),
            job_id: JobId(1),
            applicant: alice(),
        }]
    );
    let count = f
        .service
        .read(|l| l.jobs.get_job(JobId(1)).map(|j| j.applications_count));
    assert_eq!(count, Ok(1));

    let review = Transaction::MarkApplicationReviewed {
        application_id: ApplicationId(1),
    };
    f.service.submit(bob(), review.clone()).unwrap();
    assert_eq!(
        ledger_err(f.service.submit(bob(), review)),
        LedgerError::AlreadyReviewed(ApplicationId(1))
    );
}

#[test]
fn scenario_b_past_deadline_rejected() {
    let f = fixture();
    register(&f, bob(), "bob", UserRole::Employer);
    let err = ledger_err(post_job(&f, bob(), f.clock.now().plus_secs(-1)));
    assert!(matches!(err, LedgerError::InvalidDeadline { .. }));
    assert_eq!(f.service.read(|l| l.jobs.get_contract_stats().total_jobs), 0);
}

#[test]
fn scenario_c_soulbound_and_revocation() {
    let f = fixture();
    let receipt = f
        .service
        .submit(
            admin(),
            Transaction::MintCertificate {
                recipient: alice(),
                metadata_uri: "ipfs://diploma".into(),
                certificate_type: "Diploma".into(),
                subject_name: "Alice".into(),
                course_name: "Computer Science".into(),
                grade: "A".into(),
            },
        )
        .unwrap();
    let Outcome::Token(token_id) = receipt.outcome else {
        panic!("expected token outcome");
    };

    assert_eq!(
        ledger_err(f.service.submit(alice(), Transaction::Approve { to: bob(), token_id })),
        LedgerError::ApprovalsDisabled
    );
    f.service
        .submit(admin(), Transaction::RevokeCertificate { token_id })
        .unwrap();

    f.service.read(|l| {
        assert_eq!(l.certificates.token_uri(token_id), Err(LedgerError::Revoked(token_id)));
        let v = l.certificates.verify_certificate(token_id).unwrap();
        assert_eq!(v.holder, alice());
        assert!(!v.valid);
    });
}

#[test]
fn scenario_d_mismatched_batch_changes_nothing() {
    let f = fixture();
    let err = ledger_err(f.service.submit(
        admin(),
        Transaction::BatchMintCertificates {
            batch: CertificateBatch {
                recipients: vec![alice(), bob(), carol()],
                metadata_uris: vec!["u1".into(), "u2".into(), "u3".into()],
                subject_names: vec!["A".into(), "B".into(), "C".into()],
                course_names: vec!["X".into(), "X".into()],
                grades: vec!["A".into(), "B".into(), "C".into()],
            },
            certificate_type: "Diploma".into(),
        },
    ));
    assert_eq!(
        err,
        LedgerError::LengthMismatch {
            field: "course_names",
            expected: 3,
            actual: 2
        }
    );
    f.service.read(|l| {
        assert_eq!(l.certificates.total_supply(), 0);
        assert_eq!(l.certificates.balance_of(alice()), 0);
    });
}

#[test]
fn scenario_e_role_and_self_application() {
    let f = fixture();
    register(&f, carol(), "carol", UserRole::JobSeeker);
    register(&f, bob(), "bob", UserRole::Employer);
    let deadline = f.clock.now().plus_secs(3_600);
    assert!(matches!(
        ledger_err(post_job(&f, carol(), deadline)),
        LedgerError::Unauthorized(_)
    ));
    post_job(&f, bob(), deadline).unwrap();
    assert_eq!(
        ledger_err(f.service.submit(bob(), Transaction::ApplyForJob { job_id: JobId(1) })),
        LedgerError::SelfApplicationForbidden(JobId(1))
    );
}

#[test]
fn deadline_passes_with_clock() {
    let f = fixture();
    register(&f, alice(), "alice", UserRole::JobSeeker);
    register(&f, bob(), "bob", UserRole::Employer);
    post_job(&f, bob(), f.clock.now().plus_secs(60)).unwrap();
    f.clock.advance(61);
    assert!(matches!(
        ledger_err(f.service.submit(alice(), Transaction::ApplyForJob { job_id: JobId(1) })),
        LedgerError::Expired { .. }
    ));
}

#[test]
fn close_removes_from_active_and_is_irreversible() {
    let f = fixture();
    register(&f, bob(), "bob", UserRole::Both);
    let deadline = f.clock.now().plus_secs(600);
    post_job(&f, bob(), deadline).unwrap();
    post_job(&f, bob(), deadline).unwrap();
    f.service
        .submit(bob(), Transaction::CloseJob { job_id: JobId(1) })
        .unwrap();
    assert_eq!(f.service.read(|l| l.jobs.get_active_jobs()), vec![JobId(2)]);
    assert!(matches!(
        ledger_err(f.service.submit(bob(), Transaction::CloseJob { job_id: JobId(1) })),
        LedgerError::InvalidState(_)
    ));
}

#[test]
fn double_verification_succeeds_double_revocation_fails() {
    let relay = Address::derive("relay");
    let f = fixture();
    register(&f, alice(), "alice", UserRole::JobSeeker);
    f.service
        .submit(admin(), Transaction::SetBackendAddress { address: relay })
        .unwrap();
    for _ in 0..2 {
        let receipt = f
            .service
            .submit(relay, Transaction::MarkVerified { user: alice() })
            .unwrap();
        assert_eq!(receipt.events, vec![LedgerEvent::UserVerified { user: alice() }]);
    }

    f.service
        .submit(
            admin(),
            Transaction::BatchMintCertificatesSimple {
                recipients: vec![alice()],
                metadata_uris: vec!["ipfs://x".into()],
                certificate_type: "Badge".into(),
            },
        )
        .unwrap();
    let revoke = Transaction::RevokeCertificate { token_id: TokenId(1) };
    f.service.submit(admin(), revoke.clone()).unwrap();
    assert_eq!(
        ledger_err(f.service.submit(admin(), revoke)),
        LedgerError::AlreadyRevoked(TokenId(1))
    );
}

#[test]
fn burn_keeps_supply_and_frees_nothing() {
    let f = fixture();
    let mint = |to: Address| Transaction::MintCertificate {
        recipient: to,
        metadata_uri: "ipfs://c".into(),
        certificate_type: "Diploma".into(),
        subject_name: String::new(),
        course_name: String::new(),
        grade: String::new(),
    };
    f.service.submit(admin(), mint(alice())).unwrap();
    f.service
        .submit(alice(), Transaction::BurnCertificate { token_id: TokenId(1) })
        .unwrap();
    let receipt = f.service.submit(admin(), mint(alice())).unwrap();
    assert_eq!(receipt.outcome, Outcome::Token(TokenId(2)));
    f.service.read(|l| {
        assert_eq!(l.certificates.total_supply(), 2);
        assert_eq!(l.certificates.balance_of(alice()), 1);
        assert_eq!(l.certificates.tokens_of(alice()), &[TokenId(2)]);
    });
}
