//! Serde roundtrip and JsonSchema validation tests for wire and state types.

use chrono::{NaiveDate, Utc};
use schemars::schema_for;
use serde_json::json;
use solvr_core::entities::*;
use solvr_core::enums::*;
use solvr_core::identity::SessionIdentity;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

roundtrip_and_validate!(
    text_message_roundtrip,
    Message,
    Message::text("msg-000001", Role::Provider, "Hi! I saw your brief.", Utc::now())
);

roundtrip_and_validate!(
    proposal_message_roundtrip,
    Message,
    Message::proposal("msg-000002", Role::Requester, 250.0, Utc::now())
);

roundtrip_and_validate!(
    brief_roundtrip,
    Brief,
    Brief {
        title: "Portfolio site".into(),
        estimated_budget: Some(1500.0),
        deadline: NaiveDate::from_ymd_opt(2025, 11, 24),
        deadline_hour: Some("20".into()),
        required_skills: vec!["React".into(), "Three.js".into()],
        raw_fields: json!({ "topic": "Portfolio site" }),
    }
);

roundtrip_and_validate!(
    parsed_brief_roundtrip,
    ParsedBrief,
    ParsedBrief {
        topic: Some("Lab report".into()),
        kind: Some("Report".into()),
        domain: Some("Chemistry".into()),
        urgency: Some("High".into()),
        estimated_price: Some(400.0),
        skills_required: vec!["Writing".into()],
        raw_deadline: Some("2025-11-24T20:06:44Z".into()),
        deadline: NaiveDate::from_ymd_opt(2025, 11, 24),
        deadline_hour: Some("20".into()),
        pages: Some(6),
        message: None,
        raw: serde_json::Value::Null,
    }
);

roundtrip_and_validate!(
    submission_payload_roundtrip,
    SubmissionPayload,
    SubmissionPayload::build(
        Some("6560f0c2a1"),
        SubmissionSource {
            topic: Some("Landing page".into()),
            estimated_price: 250.0,
            deadline: Some("2025-11-24".into()),
            skills: vec!["Next.js".into(), "Tailwind".into()],
            urgency: Some("Medium".into()),
            pages: Some(1),
            raw_entities: json!({ "topic": "Landing page" }),
        },
        "Landing page",
        GeoPoint::new(12.9716, 77.5946),
        Utc::now(),
    )
);

roundtrip_and_validate!(
    matched_solver_roundtrip,
    MatchedSolver,
    MatchedSolver {
        user: SolverProfile {
            id: "a1".into(),
            name: "Alex Chen".into(),
            role: "solver".into(),
            price_per_job: Some(450.0),
        },
        score: 0.87,
    }
);

roundtrip_and_validate!(
    session_identity_roundtrip,
    SessionIdentity,
    SessionIdentity::new("6560f0c2a1", UserRole::Buyer)
);

#[test]
fn submission_payload_uses_backend_field_names() {
    let payload = SubmissionPayload::build(
        Some("u1"),
        SubmissionSource::from_display(&BriefDisplay {
            title: "Essay".into(),
            budget_label: "abc".into(),
            deadline_label: FLEXIBLE_LABEL.into(),
            skills: vec![],
        }),
        "Essay",
        GeoPoint::new(1.0, 2.0),
        Utc::now(),
    );
    let value = serde_json::to_value(&payload).unwrap();
    let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec![
            "bidAmount",
            "createdAt",
            "deadline",
            "description",
            "lat",
            "lng",
            "location",
            "pages",
            "price",
            "raw_entities",
            "skills",
            "status",
            "title",
            "urgency",
            "userId",
        ]
    );
    assert_eq!(value["price"], 0.0);
    assert!(value["deadline"].is_null());
}
