//! Graph store connection configuration loaded via OrthoConfig.

use std::fmt;

use ortho_config::OrthoConfig;
use serde::Deserialize;

/// URI used when neither the environment nor the command line sets one.
pub const DEFAULT_URI: &str = "bolt://localhost:7687";
/// User name used when none is configured.
pub const DEFAULT_USER: &str = "neo4j";
/// Password used when none is configured.
pub const DEFAULT_PASSWORD: &str = "neo4j";

/// Connection values for the graph store.
///
/// Every field may come from `NEO4J_*` environment variables or a
/// configuration file; command-line flags override them after loading.
#[derive(Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "NEO4J")]
pub struct ConnectionSettings {
    /// Bolt or routing URI of the store.
    pub uri: Option<String>,
    /// User to authenticate as.
    pub user: Option<String>,
    /// Password for `user`.
    pub password: Option<String>,
    /// Database to run statements against; the server default when unset.
    pub database: Option<String>,
    /// Upgrade the URI scheme to its encrypted form.
    #[ortho_config(default = false)]
    pub tls: bool,
}

impl ConnectionSettings {
    /// Configured URI, falling back to [`DEFAULT_URI`].
    #[must_use]
    pub fn uri(&self) -> &str {
        self.uri.as_deref().unwrap_or(DEFAULT_URI)
    }

    /// Configured user, falling back to [`DEFAULT_USER`].
    #[must_use]
    pub fn user(&self) -> &str {
        self.user.as_deref().unwrap_or(DEFAULT_USER)
    }

    /// Configured password, falling back to [`DEFAULT_PASSWORD`].
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_deref().unwrap_or(DEFAULT_PASSWORD)
    }

    /// Configured database, if any.
    #[must_use]
    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    /// URI handed to the driver, with the scheme upgraded when `tls` is set.
    #[must_use]
    pub fn effective_uri(&self) -> String {
        effective_uri(self.uri(), self.tls)
    }
}

impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("uri", &self.uri)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("database", &self.database)
            .field("tls", &self.tls)
            .finish()
    }
}

/// Rewrite `uri` to its encrypted scheme when `tls` is requested.
///
/// `bolt://` becomes `bolt+s://` and `neo4j://` becomes `neo4j+s://`. URIs
/// that already name an encrypted scheme, or a scheme the driver will reject
/// anyway, are returned unchanged.
#[must_use]
pub fn effective_uri(uri: &str, tls: bool) -> String {
    if !tls {
        return uri.to_owned();
    }
    for scheme in ["bolt", "neo4j"] {
        if let Some(rest) = uri
            .strip_prefix(scheme)
            .and_then(|tail| tail.strip_prefix("://"))
        {
            return format!("{scheme}+s://{rest}");
        }
    }
    uri.to_owned()
}
