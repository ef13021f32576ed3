//! Property-based tests for the note codecs.
//!
//! Uses proptest to verify that:
//! - signatures survive encode/decode with their offset intact
//! - issues decode to the same fields they were encoded from
//! - assignee and label order and duplicates do not affect the encoding
//! - unknown header keys are always rejected

use chrono::{FixedOffset, TimeZone};
use proptest::prelude::*;
use tracing::info;

use git_issue::codec::decode_issue;
use git_issue::{FormatError, Issue, Signature, Status};

fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_test_writer()
        .try_init();
}

fn signature_strategy() -> impl Strategy<Value = Signature> {
    (
        "[A-Za-z][A-Za-z .'-]{0,24}",
        "[a-z0-9._+-]{1,16}@[a-z0-9-]{1,12}\\.[a-z]{2,4}",
        0i64..4_102_444_800,
        -1439i32..=1439,
    )
        .prop_map(|(name, email, unix, offset_minutes)| {
            let offset = FixedOffset::east_opt(offset_minutes * 60).expect("offset in range");
            let when = offset.timestamp_opt(unix, 0).single().expect("valid time");
            Signature::new(name, email, when)
        })
}

fn header_value() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9_@.<> -]{0,16}[A-Za-z0-9>]"
}

fn status_strategy() -> impl Strategy<Value = Status> {
    prop_oneof![
        Just(Status::Open),
        Just(Status::Closed),
        "[a-z][a-z-]{0,10}".prop_map(|value| Status::from_header(&value)),
    ]
}

fn issue_strategy() -> impl Strategy<Value = Issue> {
    (
        signature_strategy(),
        status_strategy(),
        prop::collection::vec(header_value(), 0..5),
        prop::collection::vec(header_value(), 0..5),
        "(?s).{0,200}",
    )
        .prop_map(|(author, status, assignees, labels, message)| {
            Issue::new(author, status)
                .with_assignees(assignees)
                .with_labels(labels)
                .with_message(message)
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 200,
        ..Default::default()
    })]

    /// Property: a signature decodes to the same identity, instant, and offset
    #[test]
    fn signature_roundtrip(signature in signature_strategy()) {
        init_test_logging();
        let encoded = signature.encode();
        info!("proptest_signature: encoded={encoded}");

        let decoded = Signature::decode(&encoded).expect("decode");
        prop_assert_eq!(&decoded.name, &signature.name);
        prop_assert_eq!(&decoded.email, &signature.email);
        prop_assert_eq!(decoded.when.timestamp(), signature.when.timestamp());
        prop_assert_eq!(decoded.when.offset(), signature.when.offset());
        prop_assert_eq!(decoded.encode(), encoded);
    }

    /// Property: decode(encode(issue)) yields the same fields
    #[test]
    fn issue_roundtrip(issue in issue_strategy()) {
        init_test_logging();
        let encoded = issue.encode();

        let decoded = decode_issue(&encoded).expect("decode");
        prop_assert_eq!(&decoded.author, &issue.author);
        prop_assert_eq!(decoded.author.when.offset(), issue.author.when.offset());
        prop_assert_eq!(&decoded.status, &issue.status);
        prop_assert_eq!(&decoded.assignees, &issue.assignees);
        prop_assert_eq!(&decoded.labels, &issue.labels);
        prop_assert_eq!(&decoded.message, &issue.message);
        prop_assert!(decoded.hash.is_empty());
    }

    /// Property: header order and duplicates do not change the encoding
    #[test]
    fn encoding_ignores_order_and_duplicates(
        author in signature_strategy(),
        mut labels in prop::collection::vec(header_value(), 1..6),
        mut assignees in prop::collection::vec(header_value(), 1..6),
    ) {
        init_test_logging();
        let forward = Issue::new(author.clone(), Status::Open)
            .with_assignees(assignees.clone())
            .with_labels(labels.clone())
            .with_message("same");

        labels.reverse();
        labels.push(labels[0].clone());
        assignees.reverse();
        assignees.extend(assignees.clone());
        let shuffled = Issue::new(author, Status::Open)
            .with_assignees(assignees)
            .with_labels(labels)
            .with_message("same");

        prop_assert_eq!(forward.encode(), shuffled.encode());
    }

    /// Property: an unrecognized header key is fatal wherever it appears
    #[test]
    fn unknown_header_rejected(
        key in "[a-z]{1,10}".prop_filter("known key", |k| {
            !matches!(k.as_str(), "author" | "status" | "assignee" | "label")
        }),
        value in header_value(),
        before in any::<bool>(),
    ) {
        init_test_logging();
        let author = "author Bob <bob@test.com> 1719340759 -0700";
        let extra = format!("{key} {value}");
        let block = if before {
            format!("{extra}\n{author}\nstatus open")
        } else {
            format!("{author}\n{extra}\nstatus open")
        };
        let body = format!("{block}\n\nmessage");

        let result = decode_issue(&body);
        prop_assert!(
            matches!(result, Err(FormatError::UnknownHeader { .. })),
            "expected unknown header error for {extra:?}, got {result:?}"
        );
    }

    /// Property: text without a blank line never decodes
    #[test]
    fn missing_separator_rejected(text in "[a-z \\n]{0,80}".prop_filter("no blank line", |t| !t.contains("\n\n"))) {
        init_test_logging();
        prop_assert!(matches!(decode_issue(&text), Err(FormatError::MissingSeparator)));
    }
}
