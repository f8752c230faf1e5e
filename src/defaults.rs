//! Role-dependent default destinations.
//!
//! An unmatched root path sends the user to the home route of their role.
//! Looking up the session is the host's business; the router only awaits a
//! [`DefaultRoute`].

use futures::future::{self, FutureExt, LocalBoxFuture};
use std::future::Future;
use std::rc::Rc;
use std::str::FromStr;

/// Role of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UserRole {
    /// Platform administrator.
    Admin,
    /// Course trainer.
    Trainer,
    /// Learner.
    Learner,
    /// Any role the router has no dedicated home for.
    Other(String),
}

impl UserRole {
    /// Home route of the role.
    pub fn home(&self) -> &'static str {
        match self {
            Self::Admin => "/admin/dashboard",
            Self::Trainer => "/trainer/dashboard",
            Self::Learner | Self::Other(_) => "/dashboard",
        }
    }
}

impl FromStr for UserRole {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "admin" => Self::Admin,
            "trainer" => Self::Trainer,
            "learner" => Self::Learner,
            other => Self::Other(other.to_string()),
        })
    }
}

/// Where to go when the root path has no handler.
pub trait DefaultRoute: 'static {
    /// Resolve the destination.
    fn default_route(&self) -> LocalBoxFuture<'static, String>;
}

type RoleLookup = Rc<dyn Fn() -> LocalBoxFuture<'static, Option<UserRole>>>;

/// Maps the session's role to its home route; no session goes to the login
/// route.
///
/// ```
/// use shell_navigator::{DefaultRoute, RoleHome, UserRole};
///
/// let home = RoleHome::new(|| async { Some(UserRole::Trainer) });
/// assert_eq!(pollster::block_on(home.default_route()), "/trainer/dashboard");
///
/// let signed_out = RoleHome::signed_out();
/// assert_eq!(pollster::block_on(signed_out.default_route()), "/login");
/// ```
#[derive(Clone)]
pub struct RoleHome {
    lookup: RoleLookup,
    login: String,
}

impl RoleHome {
    /// Route used when there is no session.
    pub const LOGIN: &'static str = "/login";

    /// Resolve the role with `lookup` on every use.
    pub fn new<F, Fut>(lookup: F) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Option<UserRole>> + 'static,
    {
        Self {
            lookup: Rc::new(move || lookup().boxed_local()),
            login: Self::LOGIN.to_string(),
        }
    }

    /// Always the login route.
    pub fn signed_out() -> Self {
        Self::new(|| future::ready(None))
    }

    /// Use a different login route.
    #[must_use]
    pub fn login_route(mut self, path: impl Into<String>) -> Self {
        self.login = path.into();
        self
    }
}

impl DefaultRoute for RoleHome {
    fn default_route(&self) -> LocalBoxFuture<'static, String> {
        let role = (self.lookup)();
        let login = self.login.clone();
        async move {
            match role.await {
                Some(role) => role.home().to_string(),
                None => login,
            }
        }
        .boxed_local()
    }
}

impl std::fmt::Debug for RoleHome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleHome")
            .field("login", &self.login)
            .finish_non_exhaustive()
    }
}
