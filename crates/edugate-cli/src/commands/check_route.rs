//! Route gate dry run.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use edugate_config::EdugateConfig;
use edugate_gate::{RouteGate, SessionDecoder};

use crate::style::info_table;

/// Builds the gate described by `config`.
pub fn build_gate(config: &EdugateConfig) -> RouteGate {
    RouteGate::with_secret(config.auth.secret().unwrap_or_default())
        .with_protected_prefixes(config.gate.protected_prefixes.iter().cloned())
        .with_login_path(&config.gate.login_path)
        .with_unauthorized_path(&config.gate.unauthorized_path)
        .with_session_cookie(&config.gate.session_cookie)
        .with_leeway(config.auth.leeway_secs)
}

pub fn run(
    config: &EdugateConfig,
    path: &str,
    token: Option<&str>,
    at: Option<&str>,
) -> Result<()> {
    if token.is_some() && config.auth.secret().is_none() {
        bail!("auth.jwt_secret is not configured; set it in edugate.toml or EDUGATE_AUTH__JWT_SECRET");
    }

    let now = match at {
        Some(at) => DateTime::parse_from_rfc3339(at)
            .with_context(|| format!("invalid --at timestamp '{at}'"))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let gate = build_gate(config);
    let decision = gate.evaluate(path, token, now);

    let mut entries = vec![
        ("path", path.to_string()),
        ("protected", gate.is_protected(path).to_string()),
        ("decision", decision.to_string()),
    ];
    if let Some(location) = gate.redirect_url(&decision) {
        entries.push(("location", location));
    }
    if let Some(claims) = token.and_then(|raw| gate.decoder().decode(raw).ok()) {
        entries.push(("role", claims.role));
        if let Some(tenant_type) = &claims.tenant_type {
            let shown = tenant_type
                .as_str()
                .map_or_else(|| tenant_type.to_string(), str::to_string);
            entries.push(("tenant type", shown));
        }
    }

    println!("{}", info_table(&entries));
    Ok(())
}
