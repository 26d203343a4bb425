//! End-to-end report test against a mock API server
//!
//! Exercises the full pipeline: employee, training module, training
//! record, and roster fetches, year-level resolution (including the
//! excluded "Year 3" legacy module title), per-student tallies, and the
//! assembled report rows and summary.

use rollcall::adapters::deputy::{Credentials, DeputyClient, HttpTransport};
use rollcall::config::{secret_string, ObligationConfig};
use rollcall::core::report::{ReportBuilder, ReportOptions};
use rollcall::domain::{RollcallError, YearLevel};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn client(url: &str) -> DeputyClient {
    let credentials = Credentials::new(
        url.to_string(),
        secret_string("test-token".to_string()),
        Duration::from_secs(5),
    );
    let transport = HttpTransport::new(&credentials).unwrap();
    DeputyClient::new(Arc::new(transport))
}

async fn mock_api(server: &mut mockito::Server) {
    server
        .mock("POST", "/resource/Employee/QUERY")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                {"Id": 11, "DisplayName": "Ada Able",
                 "ContactObject": {"Email": "ada@example.edu"}},
                {"Id": 12, "DisplayName": "Ben Baker",
                 "ContactObject": {"Email": "ben@example.edu"}},
                {"Id": 13, "DisplayName": "Cal Cook",
                 "ContactObject": {"Email": "cal@example.edu"}},
            ])
            .to_string(),
        )
        .create_async()
        .await;

    // "Year 3" (with a space) is a legacy module and must not count as a
    // year level; Year3 is the real one
    server
        .mock("POST", "/resource/TrainingModule/QUERY")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                {"Id": 1, "Title": "Year1"},
                {"Id": 2, "Title": "Year2"},
                {"Id": 3, "Title": "Year3"},
                {"Id": 4, "Title": "Year 3"},
                {"Id": 5, "Title": "Manual Handling"},
            ])
            .to_string(),
        )
        .create_async()
        .await;

    server
        .mock("POST", "/resource/TrainingRecord/QUERY")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                {"Id": 901, "Employee": 11, "Module": 1},
                {"Id": 902, "Employee": 12, "Module": 3},
                {"Id": 903, "Employee": 13, "Module": 4},
            ])
            .to_string(),
        )
        .create_async()
        .await;

    server
        .mock("POST", "/resource/Roster/QUERY")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                {"Id": 501, "Employee": 11, "MatchedByTimesheet": 71, "Open": false,
                 "OperationalUnitObject": {"CompanyName": "Main Campus"}},
                {"Id": 502, "Employee": 11, "MatchedByTimesheet": 0, "Open": true,
                 "OperationalUnitObject": {"CompanyName": "Main Campus"}},
                {"Id": 503, "Employee": 11, "MatchedByTimesheet": 72, "Open": false,
                 "OperationalUnitObject": {"CompanyName": "Annex"}},
                {"Id": 504, "Employee": 12, "MatchedByTimesheet": null, "Open": false,
                 "OperationalUnitObject": {"CompanyName": "Main Campus"}},
            ])
            .to_string(),
        )
        .create_async()
        .await;
}

fn options() -> ReportOptions {
    ReportOptions {
        obligations: ObligationConfig {
            year1: Some(2),
            year2: Some(4),
            year3: Some(6),
        },
        location: None,
        window: Default::default(),
    }
}

#[tokio::test]
async fn test_report_end_to_end() {
    let mut server = mockito::Server::new_async().await;
    mock_api(&mut server).await;

    let client = client(&server.url());
    let report = ReportBuilder::new(&client).build(&options()).await.unwrap();

    // Cal's only training record points at the legacy "Year 3" module, so
    // Cal does not appear on the report
    assert_eq!(report.rows.len(), 2);

    let ada = &report.rows[0];
    assert_eq!(ada.name, "Ada Able");
    assert_eq!(ada.year, YearLevel::Year1);
    assert_eq!(ada.obligation, 2);
    assert_eq!(ada.rostered, 3);
    assert_eq!(ada.completed, 2);
    assert_eq!(ada.open, 1);
    assert_eq!(ada.percent_rostered, "150%");
    assert_eq!(ada.percent_completed, "100%");
    assert_eq!(ada.issues, "");

    let ben = &report.rows[1];
    assert_eq!(ben.name, "Ben Baker");
    assert_eq!(ben.year, YearLevel::Year3);
    // a null MatchedByTimesheet does not count as completed
    assert_eq!(ben.rostered, 1);
    assert_eq!(ben.completed, 0);
    assert_eq!(ben.issues, "Incomplete roster. Outstanding Shifts.");

    assert_eq!(report.summary.bursary_students, 2);
    assert_eq!(report.summary.students_with_rosters, 2);
    let rostered_total = report
        .summary
        .totals
        .iter()
        .find(|t| t.title == "Rostered")
        .unwrap();
    assert_eq!(rostered_total.total, 4);
}

#[tokio::test]
async fn test_report_location_filter() {
    let mut server = mockito::Server::new_async().await;
    mock_api(&mut server).await;

    let client = client(&server.url());
    let mut options = options();
    options.location = Some("Annex".to_string());
    let report = ReportBuilder::new(&client).build(&options).await.unwrap();

    let ada = &report.rows[0];
    assert_eq!(ada.rostered, 1);
    assert_eq!(ada.completed, 1);
    assert_eq!(ada.open, 0);

    let ben = &report.rows[1];
    assert_eq!(ben.rostered, 0);
    assert_eq!(report.summary.students_with_rosters, 1);
}

#[tokio::test]
async fn test_report_missing_obligation_fails_naming_student() {
    let mut server = mockito::Server::new_async().await;
    mock_api(&mut server).await;

    let client = client(&server.url());
    let mut options = options();
    options.obligations.year3 = None;
    let err = ReportBuilder::new(&client).build(&options).await.unwrap_err();

    match &err {
        RollcallError::MissingObligation { student, year } => {
            assert_eq!(student, "Ben Baker");
            assert_eq!(year, "Year3");
        }
        other => panic!("expected MissingObligation, got {other}"),
    }
    assert!(err.to_string().contains("Ben Baker"));
}
