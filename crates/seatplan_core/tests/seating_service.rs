use seatplan_core::api::{parse_seating_request, seat_rows, DataCheckResponse, ErrorPayload};
use seatplan_core::db::open_db_in_memory;
use seatplan_core::{
    SeatingError, SeatingRequest, SeatingService, SqliteStudentStore, StudentRecord, StudentStore,
    DATA_CHECK_SAMPLE_LIMIT,
};
use serde_json::json;

fn seed(conn: &rusqlite::Connection) {
    let store = SqliteStudentStore::try_new(conn).unwrap();
    let mut roster = Vec::new();
    for index in 1..=5 {
        roster.push(StudentRecord::new(
            format!("CS {index}"),
            format!("C{index}"),
            "cs",
            "1",
        ));
    }
    for index in 1..=3 {
        roster.push(StudentRecord::new(
            format!("EE {index}"),
            format!("E{index}"),
            "ee",
            "1",
        ));
    }
    roster.push(StudentRecord::new("ME 1", "M1", "me", "2"));
    store.replace_all(&roster).unwrap();
}

#[test]
fn generate_seats_only_requested_cohorts() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let service = SeatingService::new(SqliteStudentStore::try_new(&conn).unwrap());

    let request = parse_seating_request(&json!({
        "departments": ["cs - 1", "ee - 1"],
        "classrooms": 2
    }))
    .unwrap();
    let plan = service.generate(&request).unwrap();

    let rows = seat_rows(&plan);
    assert_eq!(rows.len(), 8);
    assert!(rows.iter().all(|row| row.department != "me"));
    assert_eq!(
        serde_json::to_value(&rows[1]).unwrap(),
        json!({
            "name": "EE 2",
            "roll_number": "E2",
            "department": "ee",
            "year": "1",
            "room": "Room 1",
            "seat": 2
        })
    );
}

#[test]
fn enormous_classroom_count_seats_without_allocating_every_room() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let service = SeatingService::new(SqliteStudentStore::try_new(&conn).unwrap());

    let request =
        parse_seating_request(&json!({"departments": "me - 2", "classrooms": 1e18})).unwrap();
    assert_eq!(request.classrooms, 1_000_000_000_000_000_000);

    let plan = service.generate(&request).unwrap();
    assert_eq!(plan.room_count(), 1_000_000_000_000_000_000);
    let rows = seat_rows(&plan);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].room, "Room 1");
    assert_eq!(rows[0].seat, 1);
}

#[test]
fn unknown_cohorts_are_skipped_when_one_matches() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let service = SeatingService::new(SqliteStudentStore::try_new(&conn).unwrap());

    let plan = service
        .generate(&SeatingRequest::for_cohorts(["me - 2", "xx - 1"]))
        .unwrap();
    assert_eq!(plan.len(), 1);
    assert_eq!(plan.room_count(), 3);
}

#[test]
fn absent_cohort_is_no_match_with_requested_and_available() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let service = SeatingService::new(SqliteStudentStore::try_new(&conn).unwrap());

    let err = service
        .generate(&SeatingRequest::for_cohorts(["xx - 1"]))
        .unwrap_err();
    match &err {
        SeatingError::NoMatch {
            requested,
            available,
        } => {
            assert_eq!(requested, &vec!["xx - 1".to_string()]);
            assert_eq!(available, &vec!["cs - 1", "ee - 1", "me - 2"]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(ErrorPayload::from(&err).status, 400);
}

#[test]
fn empty_roster_is_no_match() {
    let conn = open_db_in_memory().unwrap();
    let service = SeatingService::new(SqliteStudentStore::try_new(&conn).unwrap());

    let err = service
        .generate(&SeatingRequest::for_cohorts(["cs - 1"]))
        .unwrap_err();
    assert!(matches!(err, SeatingError::NoMatch { ref available, .. } if available.is_empty()));
}

#[test]
fn empty_request_is_rejected_before_reading_store() {
    let conn = open_db_in_memory().unwrap();
    let service = SeatingService::new(SqliteStudentStore::try_new(&conn).unwrap());

    let request = SeatingRequest::for_cohorts(Vec::<String>::new());
    assert!(matches!(
        service.generate(&request).unwrap_err(),
        SeatingError::NoCohortsRequested
    ));
}

#[test]
fn data_check_reports_total_sample_and_cohorts() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStudentStore::try_new(&conn).unwrap();
    let roster: Vec<StudentRecord> = (0..60)
        .map(|index| StudentRecord::new(format!("S{index}"), format!("R{index:03}"), "cs", "1"))
        .collect();
    store.replace_all(&roster).unwrap();
    let service = SeatingService::new(store);

    let response = DataCheckResponse::from(service.data_check().unwrap());
    assert_eq!(response.student_count, 60);
    assert_eq!(response.sample_students.len(), DATA_CHECK_SAMPLE_LIMIT);
    assert_eq!(response.available_departments, vec!["cs - 1"]);
}
