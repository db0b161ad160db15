//! # edugate-gate: Route access gate
//!
//! Request-level authorization for the education-management dashboard:
//! - **Session decoding** (`session`): HS256 session tokens into typed claims
//! - **Route table** (`routes`): path prefixes and the roles admitted under them
//! - **Gate** (`gate`): allow / redirect decision for each request
//!
//! The gate is the coarse, per-path check. Page code then narrows data with
//! [`edugate_rbac::ScopeFilter`], using the identity from
//! [`SessionClaims::into_identity`].
//!
//! ## Example
//!
//! ```
//! use edugate_gate::{GateDecision, RouteGate};
//!
//! let gate = RouteGate::with_secret("shared-secret");
//!
//! let decision = gate.evaluate_now("/dashboard/zone", None);
//! assert_eq!(
//!     gate.redirect_url(&decision).as_deref(),
//!     Some("/login?from=%2Fdashboard%2Fzone")
//! );
//!
//! assert_eq!(gate.evaluate_now("/about", None), GateDecision::Allow);
//! ```

pub mod error;
pub mod gate;
pub mod routes;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{DecodeError, GateError, GateResult};
pub use gate::{
    DEFAULT_LOGIN_PATH, DEFAULT_PROTECTED_PREFIX, DEFAULT_UNAUTHORIZED_PATH, GateDecision,
    RouteGate,
};
pub use routes::{RoutePermissionTable, RouteRule};
pub use session::{
    DEFAULT_SESSION_COOKIE, JwtSessionDecoder, SessionClaims, SessionDecoder, bearer_token,
    credential_from_headers, session_from_cookie_header,
};
