use pretty_assertions::assert_eq;
use safeharbor_capture::{CaptureDecision, CaptureSuppressResult};

#[test]
fn constants() {
    assert!(CaptureSuppressResult::SUPPRESS.suppress());
    assert!(!CaptureSuppressResult::ALLOW.suppress());
    assert_eq!(CaptureSuppressResult::new(true), CaptureSuppressResult::SUPPRESS);
}

#[test]
fn decision_inverts_suppression() {
    assert!(!CaptureDecision::from(CaptureSuppressResult::SUPPRESS).should_capture());
    assert!(CaptureDecision::from(CaptureSuppressResult::ALLOW).should_capture());
}

#[test]
fn serialized_shapes_have_exactly_one_key() {
    assert_eq!(
        serde_json::to_string(&CaptureSuppressResult::SUPPRESS).unwrap(),
        r#"{"suppress":true}"#
    );
    assert_eq!(
        serde_json::to_string(&CaptureDecision::new(false)).unwrap(),
        r#"{"shouldCapture":false}"#
    );
}

#[test]
fn extra_fields_are_rejected() {
    assert!(serde_json::from_str::<CaptureSuppressResult>(r#"{"suppress":true,"reason":"crisis"}"#).is_err());
    assert!(serde_json::from_str::<CaptureDecision>(r#"{"shouldCapture":true,"source":"gap"}"#).is_err());
    assert_eq!(
        serde_json::from_str::<CaptureDecision>(r#"{"shouldCapture":true}"#).unwrap(),
        CaptureDecision::new(true)
    );
}
