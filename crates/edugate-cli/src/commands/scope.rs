//! Tenant scope filtering over JSON records.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use edugate_config::EdugateConfig;
use edugate_gate::{JwtSessionDecoder, SessionClaims, SessionDecoder};
use edugate_rbac::ScopeFilter;
use edugate_types::{EntityKind, EntityRecord, TenantScope, TenantType};
use tracing::info;

/// Where the caller's tenant scope comes from.
pub enum ScopeSource<'a> {
    Explicit {
        tenant_type: TenantType,
        tenant_id: Option<&'a str>,
    },
    Token(&'a str),
}

impl ScopeSource<'_> {
    fn resolve(&self, config: &EdugateConfig) -> Result<TenantScope> {
        match self {
            ScopeSource::Explicit {
                tenant_type,
                tenant_id,
            } => Ok(TenantScope {
                tenant_type: *tenant_type,
                tenant_id: tenant_id.map(Into::into),
            }),
            ScopeSource::Token(raw) => {
                let Some(secret) = config.auth.secret() else {
                    bail!("auth.jwt_secret is not configured");
                };
                let identity = JwtSessionDecoder::new(secret)
                    .decode(raw)
                    .and_then(SessionClaims::into_identity)
                    .context("Failed to decode session token")?;
                Ok(identity.scope)
            }
        }
    }
}

/// Filters the JSON array in `file` (`-` for stdin) and prints what the
/// caller may see.
pub fn run(
    config: &EdugateConfig,
    kind: EntityKind,
    source: &ScopeSource<'_>,
    file: &Path,
) -> Result<()> {
    let scope = source.resolve(config)?;
    let records = read_records(file)?;
    let total = records.len();

    let visible = ScopeFilter::new(scope.clone()).filter_owned(records, kind);
    info!(kind = %kind, scope = %scope, total, visible = visible.len(), "filtered records");

    let json = serde_json::to_string_pretty(&visible)?;
    println!("{json}");
    Ok(())
}

fn read_records(file: &Path) -> Result<Vec<EntityRecord>> {
    let content = if file.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read records from stdin")?;
        buf
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?
    };

    serde_json::from_str(&content).context("Expected a JSON array of records")
}
