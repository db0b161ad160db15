#![no_main]

// Route gate robustness fuzzer
//
// Feeds arbitrary paths and credentials to the gate and checks that:
// 1. Decoding never panics
// 2. A credential that does not verify never opens a protected path
// 3. Unprotected paths are always allowed

use arbitrary::Arbitrary;
use chrono::{DateTime, Utc};
use edugate_gate::{GateDecision, RouteGate, session_from_cookie_header};
use libfuzzer_sys::fuzz_target;

const SECRET: &str = "fuzz-secret";

#[derive(Debug, Arbitrary)]
struct GateInput {
    path: String,
    credential: Option<String>,
    cookie_header: String,
    now_secs: i64,
}

fuzz_target!(|input: GateInput| {
    let gate = RouteGate::with_secret(SECRET);
    let now = DateTime::from_timestamp(input.now_secs, 0).unwrap_or_else(Utc::now);

    let decision = gate.evaluate(&input.path, input.credential.as_deref(), now);

    if !gate.is_protected(&input.path) {
        assert_eq!(decision, GateDecision::Allow);
        return;
    }

    // Nothing here is signed with SECRET, so no credential may verify.
    assert_eq!(
        decision,
        GateDecision::RedirectLogin {
            from: input.path.clone()
        },
        "unsigned credential admitted at {:?}",
        input.path
    );

    if let Some(location) = gate.redirect_url(&decision) {
        assert!(location.starts_with("/login?from="));
    }

    let _ = session_from_cookie_header(&input.cookie_header, "session");
    let _ = gate.evaluate_headers(&input.path, Some(&input.cookie_header), None, now);
});
