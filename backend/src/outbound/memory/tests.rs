//! Behavioural coverage for the in-memory store.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::{AcademicScores, Course, EmailPolicy, SuppliedScores};

fn id(raw: &str) -> ScholarId {
    ScholarId::new(raw).expect("valid id")
}

#[fixture]
fn store() -> InMemoryPortalStore {
    let store = InMemoryPortalStore::default();
    for raw in ["42", "0042", "25EC10001", "2415062"] {
        store.insert_student(Student::new(id(raw)));
    }
    store
}

async fn find(store: &InMemoryPortalStore, lookup: StudentLookup) -> Option<String> {
    StudentRepository::find(store, &lookup)
        .await
        .expect("lookup succeeds")
        .map(|student| student.scholar_id.to_string())
}

#[rstest]
#[tokio::test]
async fn lookups_follow_their_matching_rule(store: InMemoryPortalStore) {
    assert_eq!(find(&store, StudentLookup::Exact("0042".to_owned())).await.as_deref(), Some("0042"));
    // "0042" sorts before "42", so it is the lowest numeric match.
    assert_eq!(find(&store, StudentLookup::Numeric(42)).await.as_deref(), Some("0042"));
    assert_eq!(
        find(&store, StudentLookup::CaseInsensitive("25ec10001".to_owned())).await.as_deref(),
        Some("25EC10001")
    );
    assert_eq!(find(&store, StudentLookup::Exact("25ec10001".to_owned())).await, None);
}

fn registration(raw: &str, cgpa: Option<f64>) -> RegistrationRequest {
    RegistrationRequest::try_new(
        id(raw),
        "ada@nits.ac.in",
        "Ada",
        SuppliedScores {
            cgpa,
            sgpa_curr: None,
            sgpa_prev: None,
        },
        &EmailPolicy::default(),
    )
    .expect("valid registration")
}

#[rstest]
#[tokio::test]
async fn registration_creates_then_merges(store: InMemoryPortalStore) {
    let created = store
        .register(&id("2499999"), &registration("2499999", Some(7.5)))
        .await
        .expect("created");
    assert_eq!(created.scores.cgpa, 7.5);

    let again = store
        .register(&id("2499999"), &registration("2499999", Some(9.9)))
        .await
        .expect("updated");
    assert_eq!(again.scores.cgpa, 7.5);
    assert!(again.is_registered());
}

#[rstest]
#[tokio::test]
async fn concurrent_registrations_do_not_lose_updates() {
    let store = Arc::new(InMemoryPortalStore::default());
    let tasks: Vec<_> = (0..16)
        .map(|n| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                let cgpa = f64::from(n) + 1.0;
                store
                    .register(&id("2415062"), &registration("2415062", Some(cgpa)))
                    .await
            })
        })
        .collect();
    for task in tasks {
        task.await.expect("task joins").expect("registration succeeds");
    }
    let stored = StudentRepository::find(&*store, &StudentLookup::Exact("2415062".to_owned()))
        .await
        .expect("lookup")
        .expect("record exists");
    // Whichever registration landed first fixed the score; later ones kept it.
    assert!(stored.scores.cgpa >= 1.0);
    assert_eq!(store.student_count(), 1);
}

#[rstest]
#[tokio::test]
async fn profile_image_swap_returns_previous(store: InMemoryPortalStore) {
    let previous = store
        .set_profile_image(&id("2415062"), "2415062-1.png")
        .await
        .expect("swap");
    assert_eq!(previous.as_deref(), Some("default.png"));
    let missing = store
        .set_profile_image(&id("9999999"), "x.png")
        .await
        .expect("swap");
    assert!(missing.is_none());
}

#[rstest]
#[tokio::test]
async fn import_overwrites_whole_record(store: InMemoryPortalStore) {
    let replacement = Student {
        scores: AcademicScores {
            cgpa: 6.0,
            sgpa_curr: 6.0,
            sgpa_prev: 6.0,
        },
        ..Student::new(id("2415062"))
    };
    store.import(&replacement).await.expect("import");
    let stored = StudentRepository::find(&store, &StudentLookup::Exact("2415062".to_owned()))
        .await
        .expect("lookup");
    assert_eq!(stored, Some(replacement));
}

#[rstest]
#[tokio::test]
async fn attendance_upserts_keep_order(store: InMemoryPortalStore) {
    let scholar = id("2415062");
    for (code, total) in [("EC201", 10), ("EC202", 8), ("EC201", 12)] {
        let entry = SubjectAttendance {
            subject_code: code.to_owned(),
            total,
            attended: 5,
        };
        store.upsert_subject(&scholar, &entry).await.expect("upsert");
    }
    let record = AttendanceRepository::find(&store, &scholar)
        .await
        .expect("lookup")
        .expect("record");
    let summary: Vec<_> = record
        .subjects
        .iter()
        .map(|s| (s.subject_code.as_str(), s.total))
        .collect();
    assert_eq!(summary, [("EC201", 12), ("EC202", 8)]);
}

#[rstest]
#[tokio::test]
async fn catalogue_entries_are_replaced_per_semester() {
    let entry = |semester: u8, code: &str| CourseCatalogueEntry {
        branch_short: "CSE".to_owned(),
        branch_code: Some(6),
        semester,
        courses: vec![Course {
            code: code.to_owned(),
            name: code.to_owned(),
            credits: 3.0,
        }],
    };
    let store = InMemoryPortalStore::with_catalogue(vec![entry(4, "CS401"), entry(2, "CS201")]);
    store.replace_entry(&entry(4, "CS499")).await.expect("replace");

    let entries = store.entries_for_branch("CSE").await.expect("entries");
    let codes: Vec<_> = entries
        .iter()
        .map(|e| (e.semester, e.courses[0].code.as_str()))
        .collect();
    assert_eq!(codes, [(2, "CS201"), (4, "CS499")]);
    assert!(store.entries_for_branch("ECE").await.expect("entries").is_empty());
}
