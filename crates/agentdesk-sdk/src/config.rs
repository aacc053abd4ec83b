//! Backend base-URL configuration.
//!
//! The base URL every gateway call is issued against is resolved **once**
//! per process from environment variables and never changes afterwards:
//!
//! | Variable                   | Default                    | Description                                   |
//! |----------------------------|----------------------------|-----------------------------------------------|
//! | `AGENTDESK_MODE`           | build profile              | `development` or `production`                 |
//! | `AGENTDESK_BACKEND_URL`    | —                          | Backend URL                                   |
//! | `AGENTDESK_USE_DIRECT_URL` | `false`                    | `true` bypasses the proxy in development      |
//! | `AGENTDESK_PROXY_ORIGIN`   | `http://localhost:5173`    | Dev proxy origin serving the `/api` prefix    |
//!
//! Resolution policy ([`ApiConfig::resolve`]):
//!
//! 1. development + direct URL enabled + backend URL set → backend URL;
//! 2. production → backend URL, or [`DEFAULT_BACKEND_URL`];
//! 3. otherwise → the relative [`PROXY_PREFIX`], served by the dev proxy.

use std::fmt;
use std::sync::OnceLock;

use tracing::{info, warn};

/// Backend URL used in production when none is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
/// Same-origin path prefix forwarded to the backend by the dev proxy.
pub const PROXY_PREFIX: &str = "/api";
/// Origin of the dev proxy when `AGENTDESK_PROXY_ORIGIN` is unset.
pub const DEFAULT_PROXY_ORIGIN: &str = "http://localhost:5173";

// ---------------------------------------------------------------------------
// BuildMode
// ---------------------------------------------------------------------------

/// Whether the running build is a development or production build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    /// Local development: requests go through the dev proxy by default.
    Development,
    /// Deployed build: requests go straight to the backend URL.
    Production,
}

impl BuildMode {
    /// Mode implied by the compilation profile (`debug_assertions`).
    pub fn compiled() -> Self {
        if cfg!(debug_assertions) {
            Self::Development
        } else {
            Self::Production
        }
    }

    /// Parse a mode name (`development`/`dev`, `production`/`prod`),
    /// case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ApiBase
// ---------------------------------------------------------------------------

/// The resolved request prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiBase {
    /// Requests target the backend directly.
    Direct {
        /// Absolute backend URL, without trailing slash.
        url: String,
    },
    /// Requests target a same-origin relative prefix served by a proxy.
    Proxied {
        /// Origin of the proxy (scheme + host + port).
        origin: String,
        /// Relative path prefix, e.g. `/api`.
        prefix: String,
    },
}

impl ApiBase {
    /// A direct base for `url` (trailing slashes are dropped).
    pub fn direct(url: &str) -> Self {
        Self::Direct {
            url: url.trim_end_matches('/').to_string(),
        }
    }

    /// A proxied base under [`PROXY_PREFIX`].
    pub fn proxied(origin: &str) -> Self {
        Self::Proxied {
            origin: origin.trim_end_matches('/').to_string(),
            prefix: PROXY_PREFIX.to_string(),
        }
    }

    /// The request target for `path` as the user agent sees it: absolute
    /// for [`ApiBase::Direct`], relative (`/api/...`) for [`ApiBase::Proxied`].
    pub fn request_target(&self, path: &str) -> String {
        match self {
            Self::Direct { url } => format!("{url}{path}"),
            Self::Proxied { prefix, .. } => format!("{prefix}{path}"),
        }
    }

    /// Absolute URL for `path`, resolving a relative prefix against the
    /// proxy origin.
    pub fn absolute_url(&self, path: &str) -> String {
        match self {
            Self::Direct { url } => format!("{url}{path}"),
            Self::Proxied { origin, prefix } => format!("{origin}{prefix}{path}"),
        }
    }
}

impl fmt::Display for ApiBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct { url } => f.write_str(url),
            Self::Proxied { origin, prefix } => write!(f, "{prefix} (via {origin})"),
        }
    }
}

// ---------------------------------------------------------------------------
// ApiConfig
// ---------------------------------------------------------------------------

/// Raw startup configuration, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Development or production build.
    pub mode: BuildMode,
    /// Configured backend URL, if any (empty values count as unset).
    pub backend_url: Option<String>,
    /// Bypass the proxy in development.
    pub use_direct_url: bool,
    /// Origin the relative prefix is resolved against.
    pub proxy_origin: String,
}

impl ApiConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode = match lookup("AGENTDESK_MODE") {
            Some(raw) => BuildMode::parse(&raw).unwrap_or_else(|| {
                let fallback = BuildMode::compiled();
                warn!(value = %raw, ?fallback, "unrecognised AGENTDESK_MODE");
                fallback
            }),
            None => BuildMode::compiled(),
        };

        let backend_url = lookup("AGENTDESK_BACKEND_URL").filter(|v| !v.trim().is_empty());
        let use_direct_url = lookup("AGENTDESK_USE_DIRECT_URL").is_some_and(|v| v == "true");
        let proxy_origin = lookup("AGENTDESK_PROXY_ORIGIN")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PROXY_ORIGIN.to_string());

        Self {
            mode,
            backend_url,
            use_direct_url,
            proxy_origin,
        }
    }

    /// Apply the resolution policy.
    pub fn resolve(&self) -> ApiBase {
        match (self.mode, &self.backend_url) {
            (BuildMode::Development, Some(url)) if self.use_direct_url => ApiBase::direct(url),
            (BuildMode::Production, url) => {
                ApiBase::direct(url.as_deref().unwrap_or(DEFAULT_BACKEND_URL))
            }
            (BuildMode::Development, _) => ApiBase::proxied(&self.proxy_origin),
        }
    }
}

static API_BASE: OnceLock<ApiBase> = OnceLock::new();

/// The process-wide base URL, resolved from the environment on first use.
pub fn api_base() -> &'static ApiBase {
    API_BASE.get_or_init(|| {
        let config = ApiConfig::from_env();
        let base = config.resolve();
        info!(mode = ?config.mode, base = %base, "backend base URL resolved");
        base
    })
}
