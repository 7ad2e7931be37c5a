use brreg::{BrregError, ErrorContext, ErrorKind, Result};

#[test]
fn test_error_display() {
    let err = BrregError::new(
        ErrorKind::NotFound,
        ErrorContext::new("no entity 123456789").status_code(404),
    );
    assert!(err.to_string().contains("not found"));
    assert!(err.to_string().contains("123456789"));
}

#[test]
fn test_result_alias() {
    fn returns_error() -> Result<()> {
        Err(BrregError::Configuration("missing base url".into()))
    }
    let err = returns_error().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(err.context().is_none());
    assert!(err.request_params().is_empty());
}

// ============================================================================
// Status classification
// ============================================================================

#[test]
fn status_codes_map_to_kinds() {
    let table = [
        (400, ErrorKind::Validation),
        (401, ErrorKind::Authentication),
        (403, ErrorKind::Forbidden),
        (404, ErrorKind::NotFound),
        (429, ErrorKind::RateLimited),
        (409, ErrorKind::Client),
        (418, ErrorKind::Client),
        (500, ErrorKind::Server),
        (502, ErrorKind::Server),
        (503, ErrorKind::ServiceUnavailable),
        (504, ErrorKind::Server),
        (302, ErrorKind::Api),
    ];
    for (status, kind) in table {
        assert_eq!(ErrorKind::from_status(Some(status)), kind, "status {status}");
    }
    assert_eq!(ErrorKind::from_status(None), ErrorKind::Api);
}

#[test]
fn service_unavailable_is_a_server_error() {
    assert!(ErrorKind::ServiceUnavailable.is_server_error());
    assert!(ErrorKind::Server.is_server_error());
    assert!(!ErrorKind::NotFound.is_server_error());
}

// ============================================================================
// Transient error classification
// ============================================================================

#[test]
fn transient_errors() {
    for kind in [
        ErrorKind::Connection,
        ErrorKind::Timeout,
        ErrorKind::Server,
        ErrorKind::ServiceUnavailable,
    ] {
        assert!(kind.is_transient(), "{kind} should be transient");
        assert!(BrregError::new(kind, ErrorContext::new("x")).is_transient());
    }
}

#[test]
fn permanent_errors() {
    for kind in [
        ErrorKind::Validation,
        ErrorKind::Authentication,
        ErrorKind::Forbidden,
        ErrorKind::NotFound,
        ErrorKind::RateLimited,
        ErrorKind::Client,
        ErrorKind::Data,
        ErrorKind::Configuration,
        ErrorKind::Api,
    ] {
        assert!(!kind.is_transient(), "{kind} should be permanent");
    }
}

// ============================================================================
// Context accessors
// ============================================================================

#[test]
fn context_is_exposed_through_accessors() {
    let params = vec![("navn".to_string(), "Test".to_string())];
    let err = BrregError::new(
        ErrorKind::Validation,
        ErrorContext::new("bad request")
            .status_code(400)
            .response_text(r#"{"feilmelding":"Ugyldig parameter"}"#)
            .request_url("https://data.brreg.no/enhetsregisteret/api/enheter?navn=Test")
            .request_params(&params),
    );

    assert_eq!(err.status_code(), Some(400));
    assert_eq!(err.request_params(), params.as_slice());
    assert!(err.request_url().unwrap().ends_with("navn=Test"));
    assert_eq!(
        err.response_json().unwrap()["feilmelding"],
        "Ugyldig parameter"
    );
}

#[test]
fn non_json_body_has_no_json_view() {
    let err = BrregError::new(
        ErrorKind::Server,
        ErrorContext::new("boom").response_text("<html>Bad Gateway</html>"),
    );
    assert_eq!(err.response_text(), Some("<html>Bad Gateway</html>"));
    assert!(err.response_json().is_none());
}
