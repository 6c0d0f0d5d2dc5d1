use vtscan_core::{IndicatorKind, ScanError, Submission, MAX_FILE_BYTES};

#[test]
fn file_at_limit_is_accepted() {
    let bytes = vec![0u8; MAX_FILE_BYTES as usize];
    let submission = Submission::file("big.bin", bytes).expect("at limit");
    match submission {
        Submission::File(file) => {
            assert_eq!(file.size(), MAX_FILE_BYTES);
            assert_eq!(file.name(), "big.bin");
        }
        other => panic!("unexpected submission {other:?}"),
    }
}

#[test]
fn file_one_byte_over_limit_is_rejected() {
    let bytes = vec![0u8; MAX_FILE_BYTES as usize + 1];
    let err = Submission::file("big.bin", bytes).unwrap_err();
    assert_eq!(
        err,
        ScanError::SizeExceeded {
            size: MAX_FILE_BYTES + 1,
            limit: MAX_FILE_BYTES,
        }
    );
}

#[test]
fn empty_file_is_accepted() {
    assert!(Submission::file("empty", Vec::new()).is_ok());
}

#[test]
fn indicator_kind_is_fixed_at_creation() {
    let submission = Submission::indicator("8.8.8.8").unwrap();
    match submission {
        Submission::Indicator(query) => {
            assert_eq!(query.kind(), IndicatorKind::Ipv4);
            assert_eq!(query.text(), "8.8.8.8");
        }
        other => panic!("unexpected submission {other:?}"),
    }
}

#[test]
fn unrecognised_indicator_is_invalid_query() {
    assert_eq!(
        Submission::indicator("not a valid @@ string").unwrap_err(),
        ScanError::InvalidQuery
    );
}

#[test]
fn error_messages_are_user_facing() {
    assert_eq!(ScanError::MissingAnalysisId.to_string(), "missing analysis id");
    assert_eq!(ScanError::AnalysisTimedOut.to_string(), "analysis timed out");
    assert_eq!(
        ScanError::ReportFetchFailed {
            subject: "domain".into()
        }
        .to_string(),
        "failed to get domain report"
    );
}
