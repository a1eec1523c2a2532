//! Tests for parsing provider event files.

use calendar_common::{parse_events_json, CalendarError};
use chrono::{NaiveDate, Utc};
use chrono_tz::Europe::Prague;

// ============================================================================
// File shapes
// ============================================================================

#[test]
fn test_parse_flat_array() {
    let json = r#"[
        {
            "summary": "Conference",
            "start": {"date": "2024-03-10"},
            "end": {"date": "2024-03-13"}
        },
        {
            "summary": "Standup",
            "location": "Room 4",
            "start": {"date_time": "2024-03-11T09:00:00+01:00"},
            "end": {"date_time": "2024-03-11T09:15:00+01:00"},
            "calendar_name": "Work"
        }
    ]"#;

    let events = parse_events_json(json, &Utc).unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].summary, "Conference");
    assert!(events[0].all_day);
    assert_eq!(events[1].location, "Room 4");
    assert_eq!(events[1].calendar_name, "Work");
    assert!(!events[1].all_day);
}

#[test]
fn test_parse_grouped_calendars_keeps_file_order() {
    let json = r#"{
        "calendars": [
            {
                "name": "Family",
                "events": [
                    {"summary": "Dinner", "start": {"date_time": "2024-03-11T18:00:00Z"}, "end": {"date_time": "2024-03-11T19:00:00Z"}}
                ]
            },
            {
                "name": "Work",
                "events": [
                    {"summary": "Review", "start": {"date_time": "2024-03-11T08:00:00Z"}, "end": {"date_time": "2024-03-11T09:00:00Z"}},
                    {"summary": "Offsite", "calendar_name": "Team", "start": {"date": "2024-03-12"}, "end": {"date": "2024-03-13"}}
                ]
            }
        ]
    }"#;

    let events = parse_events_json(json, &Utc).unwrap();
    let names: Vec<_> = events.iter().map(|e| e.calendar_name.as_str()).collect();
    assert_eq!(names, vec!["Family", "Work", "Team"]);
    assert_eq!(events[1].summary, "Review");
}

#[test]
fn test_parse_accepts_provider_camel_case() {
    let json = r#"[{"summary": "Call", "start": {"dateTime": "2024-03-11T10:00:00Z"}, "end": {"dateTime": "2024-03-11T10:30:00Z"}}]"#;
    let events = parse_events_json(json, &Utc).unwrap();
    assert_eq!(events.len(), 1);
}

// ============================================================================
// Timezone handling
// ============================================================================

#[test]
fn test_timed_events_use_display_timezone() {
    // 23:30 UTC on the 10th is 00:30 on the 11th in Prague (CET, +01:00)
    let json = r#"[{"summary": "Night shift", "start": {"date_time": "2024-03-10T23:30:00Z"}, "end": {"date_time": "2024-03-11T01:00:00Z"}}]"#;
    let events = parse_events_json(json, &Prague).unwrap();
    assert_eq!(events[0].start_date(), NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
    assert_eq!(events[0].start.format("%H:%M").to_string(), "00:30");
}

#[test]
fn test_all_day_events_ignore_display_timezone() {
    let json = r#"[{"summary": "Holiday", "start": {"date": "2024-03-10"}, "end": {"date": "2024-03-11"}}]"#;
    let events = parse_events_json(json, &Prague).unwrap();
    assert_eq!(events[0].start_date(), NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
    assert_eq!(events[0].end_date(), NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_one_bad_event_fails_the_file() {
    let json = r#"[
        {"summary": "Fine", "start": {"date": "2024-03-10"}, "end": {"date": "2024-03-11"}},
        {"summary": "Bad", "start": {"date": "2024-02-30"}, "end": {"date": "2024-03-11"}}
    ]"#;
    match parse_events_json(json, &Utc) {
        Err(CalendarError::InvalidEvent { summary, .. }) => assert_eq!(summary, "Bad"),
        other => panic!("expected InvalidEvent, got {:?}", other),
    }
}

#[test]
fn test_malformed_json_is_read_error() {
    let err = parse_events_json("{not json", &Utc).unwrap_err();
    assert!(matches!(err, CalendarError::DataReadError(_)));
}
