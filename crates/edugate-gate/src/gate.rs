//! Route access gate.
//!
//! Runs in front of every dashboard request. The gate decodes the session
//! credential, classifies expiry, and checks the role against the route
//! permission table. It is pure: the only inputs are the path, the raw
//! credential and the clock reading passed in.
//!
//! ## Evaluation order
//!
//! ```text
//! path not protected ──────────────────────────────► Allow
//! no credential ───────────────────────────────────► RedirectLogin
//! credential does not decode ──────────────────────► RedirectLogin
//! exp < now ───────────────────────────────────────► RedirectLoginExpired
//! role SYSTEM_ADMIN ───────────────────────────────► Allow
//! any matching rule excludes role ─────────────────► RedirectUnauthorized
//! otherwise ───────────────────────────────────────► Allow
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use edugate_rbac::Role;
use tracing::{debug, info, warn};

use crate::error::{GateError, GateResult};
use crate::routes::RoutePermissionTable;
use crate::session::{
    DEFAULT_SESSION_COOKIE, JwtSessionDecoder, SessionDecoder, credential_from_headers,
};

/// Path prefix protected when none is configured.
pub const DEFAULT_PROTECTED_PREFIX: &str = "/dashboard";

/// Where unauthenticated callers are sent.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Where authenticated callers without the required role are sent.
pub const DEFAULT_UNAUTHORIZED_PATH: &str = "/dashboard";

/// Terminal outcome of evaluating one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    /// Authenticate, then come back to `from`.
    RedirectLogin { from: String },
    /// The session expired; authenticate again, then come back to `from`.
    RedirectLoginExpired { from: String },
    /// Authenticated, but not admitted under this path.
    RedirectUnauthorized,
}

impl GateDecision {
    /// Maps a gate error for `path` to the redirect it calls for.
    pub fn from_error(path: &str, err: &GateError) -> Self {
        match err {
            GateError::MissingCredential | GateError::MalformedCredential(_) => {
                GateDecision::RedirectLogin {
                    from: path.to_string(),
                }
            }
            GateError::ExpiredCredential { .. } => GateDecision::RedirectLoginExpired {
                from: path.to_string(),
            },
            GateError::InsufficientRole { .. } => GateDecision::RedirectUnauthorized,
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, GateDecision::Allow)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GateDecision::Allow => "allow",
            GateDecision::RedirectLogin { .. } => "redirect-login",
            GateDecision::RedirectLoginExpired { .. } => "redirect-login-expired",
            GateDecision::RedirectUnauthorized => "redirect-unauthorized",
        }
    }

    /// Renders the redirect location, or `None` for [`GateDecision::Allow`].
    pub fn redirect_url(&self, login_path: &str, unauthorized_path: &str) -> Option<String> {
        match self {
            GateDecision::Allow => None,
            GateDecision::RedirectLogin { from } => Some(format!(
                "{login_path}?from={}",
                urlencoding::encode(from)
            )),
            GateDecision::RedirectLoginExpired { from } => Some(format!(
                "{login_path}?from={}&expired=true",
                urlencoding::encode(from)
            )),
            GateDecision::RedirectUnauthorized => Some(unauthorized_path.to_string()),
        }
    }
}

impl fmt::Display for GateDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request gate over protected dashboard paths.
///
/// Holds only immutable state, so one gate can be shared across request
/// workers behind an `Arc`.
#[derive(Debug, Clone)]
pub struct RouteGate<D = JwtSessionDecoder> {
    decoder: D,
    table: RoutePermissionTable,
    protected_prefixes: Vec<String>,
    login_path: String,
    unauthorized_path: String,
    session_cookie: String,
    leeway_secs: u64,
}

impl RouteGate<JwtSessionDecoder> {
    /// Creates a gate verifying HS256 sessions against `secret`.
    pub fn with_secret(secret: impl AsRef<[u8]>) -> Self {
        Self::new(JwtSessionDecoder::new(secret))
    }
}

impl<D: SessionDecoder> RouteGate<D> {
    /// Creates a gate with the standard route table and default redirects.
    pub fn new(decoder: D) -> Self {
        Self {
            decoder,
            table: RoutePermissionTable::standard(),
            protected_prefixes: vec![DEFAULT_PROTECTED_PREFIX.to_string()],
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            unauthorized_path: DEFAULT_UNAUTHORIZED_PATH.to_string(),
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
            leeway_secs: 0,
        }
    }

    #[must_use]
    pub fn with_table(mut self, table: RoutePermissionTable) -> Self {
        self.table = table;
        self
    }

    #[must_use]
    pub fn with_protected_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.protected_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    #[must_use]
    pub fn with_unauthorized_path(mut self, path: impl Into<String>) -> Self {
        self.unauthorized_path = path.into();
        self
    }

    #[must_use]
    pub fn with_session_cookie(mut self, name: impl Into<String>) -> Self {
        self.session_cookie = name.into();
        self
    }

    /// Tolerates `secs` of clock skew when classifying expiry.
    #[must_use]
    pub fn with_leeway(mut self, secs: u64) -> Self {
        self.leeway_secs = secs;
        self
    }

    pub fn table(&self) -> &RoutePermissionTable {
        &self.table
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    pub fn session_cookie(&self) -> &str {
        &self.session_cookie
    }

    pub fn is_protected(&self, path: &str) -> bool {
        self.protected_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    /// Checks a request and reports why it is not admitted.
    ///
    /// Expiry is checked before the `SYSTEM_ADMIN` bypass, so an expired
    /// administrator session is refused like any other.
    pub fn authorize(
        &self,
        path: &str,
        credential: Option<&str>,
        now: DateTime<Utc>,
    ) -> GateResult<()> {
        if !self.is_protected(path) {
            debug!(path, "path not protected");
            return Ok(());
        }

        let raw = credential.ok_or(GateError::MissingCredential)?;
        let claims = self.decoder.decode(raw)?;

        if claims.is_expired_at(now, self.leeway_secs) {
            return Err(GateError::ExpiredCredential {
                expired_at: claims.exp,
            });
        }

        let role = claims.role();
        if role == Some(Role::SystemAdmin) {
            return Ok(());
        }

        if let Some(rule) = self.table.first_excluding(path, role) {
            return Err(GateError::InsufficientRole {
                role: claims.role,
                prefix: rule.prefix().to_string(),
            });
        }

        Ok(())
    }

    /// Evaluates a request against the gate.
    pub fn evaluate(
        &self,
        path: &str,
        credential: Option<&str>,
        now: DateTime<Utc>,
    ) -> GateDecision {
        match self.authorize(path, credential, now) {
            Ok(()) => {
                info!(path, "request admitted");
                GateDecision::Allow
            }
            Err(err) => {
                let decision = GateDecision::from_error(path, &err);
                warn!(path, error = %err, decision = %decision, "request refused");
                decision
            }
        }
    }

    /// Evaluates a request against a fresh clock reading.
    pub fn evaluate_now(&self, path: &str, credential: Option<&str>) -> GateDecision {
        self.evaluate(path, credential, Utc::now())
    }

    /// Evaluates a request given its raw `Cookie` and `Authorization` headers.
    pub fn evaluate_headers(
        &self,
        path: &str,
        cookie_header: Option<&str>,
        authorization_header: Option<&str>,
        now: DateTime<Utc>,
    ) -> GateDecision {
        let credential =
            credential_from_headers(cookie_header, authorization_header, &self.session_cookie);
        self.evaluate(path, credential, now)
    }

    /// Renders the redirect location for `decision` using this gate's paths.
    pub fn redirect_url(&self, decision: &GateDecision) -> Option<String> {
        decision.redirect_url(&self.login_path, &self.unauthorized_path)
    }
}
