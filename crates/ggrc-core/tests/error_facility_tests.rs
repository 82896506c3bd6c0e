use ggrc_core::core_types::RequestId;
use ggrc_core::{ExError, ExErrorKind, GgrcError};
use std::error::Error;

#[test]
fn test_missing_revision_converts_with_snapshot_entity() {
    let err: ExError = GgrcError::RevisionNotCached {
        snapshot_id: 42,
        revision_id: Some(7),
    }
    .into();

    assert_eq!(err.kind(), ExErrorKind::MissingRevision);
    assert_eq!(err.code(), "ERR_MISSING_REVISION");
    assert_eq!(err.entity_id(), Some("42"));
    assert_eq!(err.op(), Some("resolve_revision"));
}

#[test]
fn test_abandoned_round_is_internal() {
    let err: ExError = GgrcError::RoundAbandoned {
        model: "Control".to_string(),
    }
    .into();

    assert_eq!(err.kind(), ExErrorKind::Internal);
    assert_eq!(err.entity_id(), Some("Control"));
}

#[test]
fn test_display_carries_request_id() {
    let request_id = RequestId::from_string("req-1".to_string());
    let err = ExError::new(ExErrorKind::SaveFailed)
        .with_op("deferred_save")
        .with_message("409 conflict")
        .with_request_id(request_id);

    assert_eq!(
        err.to_string(),
        "[ERR_SAVE_FAILED] in operation 'deferred_save': 409 conflict (request_id: req-1)"
    );
}

#[test]
fn test_source_chain_is_exposed() {
    let backend = ExError::new(ExErrorKind::ExternalService).with_message("timeout");
    let err = ExError::new(ExErrorKind::RefreshFailed)
        .with_message("timeout")
        .with_source(backend);

    let source = err.source().expect("source present");
    assert!(source.to_string().starts_with("[ERR_EXTERNAL_SERVICE]"));
    assert_eq!(err.source_error().map(ExError::kind), Some(ExErrorKind::ExternalService));
}

#[test]
fn test_json_errors_become_serialization() {
    let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: GgrcError = parse_err.into();
    assert!(matches!(err, GgrcError::Serialization { .. }));
    assert_eq!(ExError::from(err).kind(), ExErrorKind::Serialization);
}
