//! Route authorization predicate.
//!
//! Every request that reaches the dashboard is classified by
//! [`AuthConfig::authorize`] from two facts: whether a session principal is
//! present, and the request path. The result decides whether the handler
//! runs or the client is redirected.
//!
//! | Path                          | Logged in          | Anonymous          |
//! |-------------------------------|--------------------|--------------------|
//! | `/dashboard`, `/dashboard/..` | allow              | redirect to login  |
//! | anything else                 | redirect to home   | allow              |
//!
//! Exempt paths (`/api/..`, `/static/..`, `/health..`, `*.png`) are never
//! classified and always pass through.

use url::Url;
use url::form_urlencoded;

/// Decision produced by [`AuthConfig::authorize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Let the request through to its handler.
    Allow,
    /// Anonymous request for a protected page.
    RedirectToLogin {
        /// Path (with query) to return to after signing in.
        callback_url: String,
    },
    /// Signed-in request for a public page.
    RedirectToHome,
}

/// Immutable authentication settings, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    sign_in_path: String,
    home_path: String,
    protected_prefix: String,
    exempt_prefixes: Vec<String>,
    exempt_extensions: Vec<String>,
    min_password_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            sign_in_path: "/login".to_owned(),
            home_path: "/dashboard".to_owned(),
            protected_prefix: "/dashboard".to_owned(),
            exempt_prefixes: vec!["/api".to_owned(), "/static".to_owned(), "/health".to_owned()],
            exempt_extensions: vec![".png".to_owned()],
            min_password_length: 6,
        }
    }
}

impl AuthConfig {
    /// Path of the sign-in page.
    #[must_use]
    pub fn sign_in_path(&self) -> &str {
        &self.sign_in_path
    }

    /// Where signed-in users land.
    #[must_use]
    pub fn home_path(&self) -> &str {
        &self.home_path
    }

    /// Minimum accepted password length, in characters.
    #[must_use]
    pub const fn min_password_length(&self) -> usize {
        self.min_password_length
    }

    /// Whether `path` is under the protected prefix.
    ///
    /// Matches whole segments: `/dashboard` and `/dashboard/invoices` are
    /// protected, `/dashboards` is not.
    #[must_use]
    pub fn is_protected(&self, path: &str) -> bool {
        segment_prefix(path, &self.protected_prefix)
    }

    /// Whether `path` bypasses the predicate entirely.
    #[must_use]
    pub fn is_exempt(&self, path: &str) -> bool {
        self.exempt_prefixes
            .iter()
            .any(|prefix| segment_prefix(path, prefix))
            || self
                .exempt_extensions
                .iter()
                .any(|ext| path.ends_with(ext.as_str()))
    }

    /// Classify a request.
    ///
    /// `path_and_query` is the request target as received; only the path is
    /// matched, the whole target becomes the login callback.
    #[must_use]
    pub fn authorize(&self, logged_in: bool, path_and_query: &str) -> Access {
        let path = path_and_query
            .split_once('?')
            .map_or(path_and_query, |(path, _)| path);

        if self.is_exempt(path) {
            return Access::Allow;
        }

        match (self.is_protected(path), logged_in) {
            (true, true) | (false, false) => Access::Allow,
            (true, false) => Access::RedirectToLogin {
                callback_url: path_and_query.to_owned(),
            },
            (false, true) => Access::RedirectToHome,
        }
    }

    /// Location header value for an [`Access`] redirect, `None` for
    /// [`Access::Allow`].
    #[must_use]
    pub fn redirect_location(&self, access: &Access) -> Option<String> {
        match access {
            Access::Allow => None,
            Access::RedirectToLogin { callback_url } => Some(self.login_url(callback_url)),
            Access::RedirectToHome => Some(self.home_path.clone()),
        }
    }

    /// The sign-in page URL carrying a `callbackUrl` query parameter.
    #[must_use]
    pub fn login_url(&self, callback_url: &str) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("callbackUrl", callback_url)
            .finish();
        format!("{}?{query}", self.sign_in_path)
    }

    /// Resolve a submitted `callbackUrl` into a local path to redirect to.
    ///
    /// Relative paths and absolute URLs on `base_url`'s origin are accepted
    /// and reduced to path plus query. Anything else, including
    /// protocol-relative `//host` targets, falls back to the home path.
    #[must_use]
    pub fn resolve_callback(&self, raw: Option<&str>, base_url: &Url) -> String {
        let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
            return self.home_path.clone();
        };

        if raw.starts_with("//") || raw.starts_with("/\\") {
            return self.home_path.clone();
        }

        match base_url.join(raw) {
            Ok(target) if target.origin() == base_url.origin() => {
                let mut local = target.path().to_owned();
                if let Some(query) = target.query() {
                    local.push('?');
                    local.push_str(query);
                }
                local
            }
            _ => self.home_path.clone(),
        }
    }
}

fn segment_prefix(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> AuthConfig {
        AuthConfig::default()
    }

    fn login(callback: &str) -> Access {
        Access::RedirectToLogin {
            callback_url: callback.to_owned(),
        }
    }

    #[test]
    fn test_protected_paths_require_session() {
        let cfg = config();
        for path in ["/dashboard", "/dashboard/", "/dashboard/invoices", "/dashboard/invoices/abc/edit"] {
            assert_eq!(cfg.authorize(true, path), Access::Allow, "{path}");
            assert_eq!(cfg.authorize(false, path), login(path), "{path}");
        }
    }

    #[test]
    fn test_public_paths_redirect_signed_in_users_home() {
        let cfg = config();
        for path in ["/", "/login", "/dashboards", "/about"] {
            assert_eq!(cfg.authorize(false, path), Access::Allow, "{path}");
            assert_eq!(cfg.authorize(true, path), Access::RedirectToHome, "{path}");
        }
    }

    #[test]
    fn test_exempt_paths_always_pass() {
        let cfg = config();
        for path in [
            "/api/auth/signout",
            "/static/app.css",
            "/health",
            "/health/ready",
            "/hero-desktop.png",
            "/customers/evil-rabbit.png",
        ] {
            assert_eq!(cfg.authorize(true, path), Access::Allow, "{path}");
            assert_eq!(cfg.authorize(false, path), Access::Allow, "{path}");
        }
    }

    #[test]
    fn test_exempt_prefixes_match_whole_segments() {
        let cfg = config();
        for path in ["/healthz", "/statics/app.css", "/apis"] {
            assert_eq!(cfg.authorize(false, path), Access::Allow, "{path}");
            assert_eq!(cfg.authorize(true, path), Access::RedirectToHome, "{path}");
        }
    }

    #[test]
    fn test_callback_keeps_query() {
        let cfg = config();
        assert_eq!(
            cfg.authorize(false, "/dashboard/invoices?page=2&query=lee"),
            login("/dashboard/invoices?page=2&query=lee")
        );
    }

    #[test]
    fn test_redirect_locations() {
        let cfg = config();
        assert_eq!(cfg.redirect_location(&Access::Allow), None);
        assert_eq!(
            cfg.redirect_location(&Access::RedirectToHome).as_deref(),
            Some("/dashboard")
        );
        assert_eq!(
            cfg.redirect_location(&login("/dashboard/invoices?page=2")).as_deref(),
            Some("/login?callbackUrl=%2Fdashboard%2Finvoices%3Fpage%3D2")
        );
    }

    #[test]
    fn test_resolve_callback() {
        let cfg = config();
        let base = Url::parse("http://localhost:3000").unwrap();

        assert_eq!(cfg.resolve_callback(None, &base), "/dashboard");
        assert_eq!(cfg.resolve_callback(Some(""), &base), "/dashboard");
        assert_eq!(
            cfg.resolve_callback(Some("/dashboard/customers?query=a"), &base),
            "/dashboard/customers?query=a"
        );
        assert_eq!(
            cfg.resolve_callback(Some("http://localhost:3000/dashboard/invoices"), &base),
            "/dashboard/invoices"
        );
        assert_eq!(
            cfg.resolve_callback(Some("https://evil.example/dashboard"), &base),
            "/dashboard"
        );
        assert_eq!(
            cfg.resolve_callback(Some("//evil.example/dashboard"), &base),
            "/dashboard"
        );
    }

    #[test]
    fn test_min_password_length() {
        assert_eq!(config().min_password_length(), 6);
    }
}
