//! Precedence resolution: which handler owns a concrete path.
//!
//! # Why a priority table
//!
//! The route space is not a flat prefix tree. `/courses/my-courses` is a
//! structurally valid instance of `/courses/:id`, and
//! `/courses/abc/lab/lab-1` is one of `/courses/:id/lab/:labId` as well as of
//! the course family's catch-all. Trying registered patterns in registration
//! order silently misroutes the specific case to the generic one, so the
//! order is spelled out here as data.
//!
//! # Tiers
//!
//! Evaluated strictly in this order; the first rule that yields a dispatch
//! wins, independent of route table insertion order:
//!
//! 1. **Exact literal rules** ([`RuleMatcher::Exact`]), by string equality.
//! 2. **Family rules** ([`RuleMatcher::Capture`], [`RuleMatcher::Family`]) in
//!    table order, most specific first.
//! 3. **Registered patterns** via [`match_pattern`], most
//!    [specific](crate::matching::specificity) first.
//! 4. **Root**: an unmatched `/` becomes [`Resolution::RoleDefault`].
//!
//! A matching rule re-dispatches to the first of its canonical patterns that
//! has a registered handler, with the parameters it captured. Without one it
//! falls back to its documented [`Fallback`]. A rule with neither does not
//! count as a match and evaluation continues.
//!
//! # Example
//!
//! ```
//! use shell_navigator::{handler_fn, resolve, PrecedenceTable, Resolution, RouteTable};
//!
//! let mut table = RouteTable::new();
//! table.add_route("/courses/:id", handler_fn(|_| async { Ok(()) }));
//! table.add_route("/courses/my-courses", handler_fn(|_| async { Ok(()) }));
//!
//! let precedence = PrecedenceTable::lms();
//! match resolve("/courses/my-courses", &precedence, &table) {
//!     Resolution::Registered { pattern, .. } => assert_eq!(pattern, "/courses/my-courses"),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

use crate::matching::{match_pattern, specificity, split_path};
use crate::params::RouteParams;
use crate::table::{BoxedHandler, RouteTable};
use crate::trace_log;
use futures::future::LocalBoxFuture;
use regex::Regex;
use std::fmt;

// ============================================================================
// Default views
// ============================================================================

/// Documented default activation for a resource family.
///
/// Names a view module by convention (`course-detail`) and the entry point it
/// exposes (`show`), plus the captured parameters passed to it in order. The
/// router never instantiates views itself; a [`ViewLoader`] does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultView {
    /// View module name, e.g. `lab-viewer`.
    pub module: String,
    /// Entry point on the module, e.g. `show`.
    pub entry: String,
    /// Names of the captured parameters passed as arguments, in order.
    pub args: Vec<String>,
}

impl DefaultView {
    /// Describe `module.entry(args...)`.
    pub fn new(module: impl Into<String>, entry: impl Into<String>, args: &[&str]) -> Self {
        Self {
            module: module.into(),
            entry: entry.into(),
            args: args.iter().map(|a| (*a).to_string()).collect(),
        }
    }
}

/// Loads and shows default views on behalf of the router.
///
/// Implemented by the shell: resolves `view.module` by its naming convention,
/// mounts it in the main container, and calls `view.entry` with `args`.
pub trait ViewLoader: 'static {
    /// Show `view` with the argument values resolved from the route.
    fn load(&self, view: &DefaultView, args: Vec<String>) -> LocalBoxFuture<'static, anyhow::Result<()>>;
}

// ============================================================================
// Rules
// ============================================================================

/// Evaluation tier of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    /// Checked by string equality before any parameterized rule.
    ExactLiteral,
    /// Checked in table order after every exact rule.
    Family,
}

/// How a rule recognizes a path and extracts its parameters.
#[derive(Debug, Clone)]
pub enum RuleMatcher {
    /// The path equals this string.
    Exact(String),
    /// The path matches this anchored regex; named groups become parameters.
    Capture(Regex),
    /// The path is this prefix or lies below it (`/admin`, `/admin/...`).
    Family(String),
}

impl RuleMatcher {
    fn tier(&self) -> Tier {
        match self {
            Self::Exact(_) => Tier::ExactLiteral,
            Self::Capture(_) | Self::Family(_) => Tier::Family,
        }
    }

    /// Parameters captured from `path`, or `None` if it does not apply.
    pub fn captures(&self, path: &str) -> Option<RouteParams> {
        match self {
            Self::Exact(literal) => (literal == path).then(RouteParams::new),
            Self::Family(prefix) => {
                let below = path
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'));
                below.then(RouteParams::new)
            }
            Self::Capture(regex) => {
                let caps = regex.captures(path)?;
                Some(
                    regex
                        .capture_names()
                        .flatten()
                        .filter_map(|name| caps.name(name).map(|m| (name, m.as_str())))
                        .collect(),
                )
            }
        }
    }
}

/// What a rule activates when no canonical pattern is registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    /// Show a family's default view.
    View(DefaultView),
    /// Navigate elsewhere; `{name}` placeholders are filled from captures.
    Redirect(String),
    /// Nothing; the rule only re-dispatches to registered handlers.
    None,
}

/// One entry of the [`PrecedenceTable`].
#[derive(Debug, Clone)]
pub struct PrecedenceRule {
    name: String,
    matcher: RuleMatcher,
    canonical: Vec<String>,
    fallback: Fallback,
}

impl PrecedenceRule {
    /// Rule matching exactly `path`.
    pub fn exact(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::with_matcher(name, RuleMatcher::Exact(path.into()))
    }

    /// Rule matching `path` and everything below it.
    pub fn family(name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::with_matcher(name, RuleMatcher::Family(prefix.into()))
    }

    /// Rule matching an anchored regex with named capture groups.
    pub fn capture(name: impl Into<String>, regex: &str) -> Result<Self, regex::Error> {
        Ok(Self::with_matcher(name, RuleMatcher::Capture(Regex::new(regex)?)))
    }

    fn with_matcher(name: impl Into<String>, matcher: RuleMatcher) -> Self {
        Self {
            name: name.into(),
            matcher,
            canonical: Vec::new(),
            fallback: Fallback::None,
        }
    }

    /// Add a canonical pattern whose registered handler takes this path.
    ///
    /// Several may be given; the first registered one is used.
    #[must_use]
    pub fn canonical(mut self, pattern: impl Into<String>) -> Self {
        self.canonical.push(pattern.into());
        self
    }

    /// Fall back to a default view.
    #[must_use]
    pub fn view(mut self, module: &str, entry: &str, args: &[&str]) -> Self {
        self.fallback = Fallback::View(DefaultView::new(module, entry, args));
        self
    }

    /// Fall back to a redirect built from `template`.
    #[must_use]
    pub fn redirect_to(mut self, template: impl Into<String>) -> Self {
        self.fallback = Fallback::Redirect(template.into());
        self
    }

    /// Rule name, used in logs and resolutions.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluation tier.
    pub fn tier(&self) -> Tier {
        self.matcher.tier()
    }

    /// The rule's matcher.
    pub fn matcher(&self) -> &RuleMatcher {
        &self.matcher
    }

    /// Apply the rule to `path`.
    ///
    /// Returns `None` when the rule does not match, or matches but has
    /// nothing to dispatch to.
    pub fn apply(&self, path: &str, table: &RouteTable) -> Option<Resolution> {
        let params = self.matcher.captures(path)?;

        for pattern in &self.canonical {
            if let Some(handler) = table.lookup(pattern) {
                return Some(Resolution::Registered {
                    rule: Some(self.name.clone()),
                    pattern: pattern.clone(),
                    handler,
                    params,
                });
            }
        }

        match &self.fallback {
            Fallback::View(view) => {
                let args = view
                    .args
                    .iter()
                    .map(|name| params.get(name).cloned().unwrap_or_default())
                    .collect();
                Some(Resolution::DefaultView {
                    rule: self.name.clone(),
                    view: view.clone(),
                    args,
                    params,
                })
            }
            Fallback::Redirect(template) => Some(Resolution::Redirect {
                rule: self.name.clone(),
                to: fill_template(template, &params),
            }),
            Fallback::None => None,
        }
    }
}

fn fill_template(template: &str, params: &RouteParams) -> String {
    params.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{key}}}"), value)
    })
}

// ============================================================================
// PrecedenceTable
// ============================================================================

/// Ordered rule set for structurally ambiguous paths.
///
/// Exact rules are always evaluated before family rules; within a tier the
/// insertion order is the precedence order.
#[derive(Debug, Clone, Default)]
pub struct PrecedenceTable {
    rules: Vec<PrecedenceRule>,
}

impl PrecedenceTable {
    /// Empty table: only registered patterns and the root fallback apply.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule.
    #[must_use]
    pub fn rule(mut self, rule: PrecedenceRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> impl Iterator<Item = &PrecedenceRule> {
        let exact = self.rules.iter().filter(|r| r.tier() == Tier::ExactLiteral);
        let family = self.rules.iter().filter(|r| r.tier() == Tier::Family);
        exact.chain(family)
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Return `true` if the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The learning-management shell's rule set.
    ///
    /// Course family, most specific first: `my-courses`, `learn`, `lab`,
    /// `content`, `trainer`, course detail, then the collection and its
    /// catch-all. Trainer, submission, notification, account and admin
    /// families follow.
    pub fn lms() -> Self {
        Self::new()
            // Exact literals that a parameterized sibling would capture.
            .rule(
                PrecedenceRule::exact("my-courses", "/courses/my-courses")
                    .canonical("/courses/my-courses")
                    .view("my-courses", "show", &[]),
            )
            .rule(
                PrecedenceRule::exact("account-pending", "/account/pending")
                    .canonical("/account/pending")
                    .view("account-status", "showPending", &[]),
            )
            .rule(
                PrecedenceRule::exact("account-rejected", "/account/rejected")
                    .canonical("/account/rejected")
                    .view("account-status", "showRejected", &[]),
            )
            .rule(
                PrecedenceRule::exact("dashboard", "/dashboard")
                    .canonical("/dashboard")
                    .canonical("/")
                    .view("learner-dashboard", "show", &[]),
            )
            .rule(
                PrecedenceRule::exact("profile", "/profile")
                    .canonical("/profile")
                    .view("user-profile", "show", &[]),
            )
            .rule(
                PrecedenceRule::exact("trainer-dashboard", "/trainer/dashboard")
                    .canonical("/trainer/dashboard")
                    .view("trainer-dashboard", "show", &[]),
            )
            .rule(
                PrecedenceRule::exact("trainer-learners", "/trainer/learners")
                    .canonical("/trainer/learners")
                    .view("trainer-learners-list", "show", &[]),
            )
            .rule(
                PrecedenceRule::exact("pending-approvals", "/admin/users/pending")
                    .canonical("/admin/users/pending")
                    .view("pending-approvals", "show", &[]),
            )
            // Course family.
            .rule(
                builtin("course-learn", r"^/courses/(?P<id>[^/]+)/learn$")
                    .canonical("/courses/:id/learn")
                    .view("start-learning", "show", &["id"]),
            )
            .rule(
                builtin("course-lab", r"^/courses/(?P<id>[^/]+)/lab/(?P<labId>.+)$")
                    .canonical("/courses/:id/lab/:labId")
                    .view("lab-viewer", "show", &["id", "labId"]),
            )
            .rule(
                builtin(
                    "course-content",
                    r"^/courses/(?P<id>[^/]+)/content/(?P<chapterId>.+)$",
                )
                .canonical("/courses/:id/content/:chapterId")
                .view("content-viewer", "show", &["id", "chapterId"]),
            )
            .rule(
                builtin(
                    "course-trainer",
                    r"^/courses/(?P<id>[^/]+)/trainer/(?P<contentId>.+)$",
                )
                .canonical("/courses/:id/trainer/:contentId")
                .view("content-viewer", "showTrainerContent", &["id", "contentId"]),
            )
            .rule(
                builtin("course-detail", r"^/courses/(?P<id>[^/]+)$")
                    .canonical("/courses/:id")
                    .view("course-detail", "show", &["id"]),
            )
            .rule(
                PrecedenceRule::family("courses", "/courses")
                    .canonical("/courses")
                    .view("course-listing", "show", &[]),
            )
            // Trainer tools.
            .rule(
                PrecedenceRule::family("course-allocation", "/trainer/course-allocation")
                    .canonical("/trainer/course-allocation")
                    .view("course-allocation-ui", "show", &[]),
            )
            .rule(
                builtin("lab-review-submission", r"^/trainer/lab-review/(?P<id>.+)$")
                    .canonical("/trainer/lab-review/:id")
                    .view("trainer-lab-review", "showSubmission", &["id"]),
            )
            .rule(
                PrecedenceRule::family("lab-review", "/trainer/lab-review")
                    .canonical("/trainer/lab-review")
                    .view("trainer-lab-review", "show", &[]),
            )
            .rule(
                builtin(
                    "learner-progress",
                    r"^/trainer/learners/(?P<id>[^/]+)/progress$",
                )
                .canonical("/trainer/learners/:id/progress")
                .redirect_to("/reports/trainer/learner/{id}"),
            )
            .rule(
                builtin("learner-detail", r"^/trainer/learners/(?P<id>[^/]+)$")
                    .canonical("/trainer/learners/:id")
                    .redirect_to("/reports/trainer/learner/{id}"),
            )
            .rule(
                PrecedenceRule::family("evaluations", "/trainer/evaluations")
                    .canonical("/trainer/evaluations")
                    .canonical("/trainer/evaluations/pending")
                    .view("evaluation-queue", "show", &[]),
            )
            // Learner-facing families.
            .rule(
                PrecedenceRule::family("notifications", "/notifications")
                    .canonical("/notifications")
                    .view("notification-center", "show", &[]),
            )
            .rule(
                builtin("submission", r"^/submissions/(?P<id>.+)$")
                    .canonical("/submissions/:id")
                    .view("submission-detail", "show", &["id"]),
            )
            // Admin family.
            .rule(
                builtin("admin-user", r"^/admin/users/(?P<id>[^/]+)$")
                    .canonical("/admin/users/:id")
                    .view("user-detail", "show", &["id"]),
            )
            .rule(
                PrecedenceRule::family("admin", "/admin")
                    .canonical("/admin/*")
                    .canonical("/admin/dashboard"),
            )
    }
}

/// Built-in capture rule. The regexes are literals checked by the tests.
fn builtin(name: &str, regex: &str) -> PrecedenceRule {
    match PrecedenceRule::capture(name, regex) {
        Ok(rule) => rule,
        Err(err) => unreachable!("built-in rule '{name}' has an invalid regex: {err}"),
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// The outcome of resolving a path.
#[derive(Clone)]
pub enum Resolution {
    /// A registered handler, either through a precedence rule or a generic
    /// pattern match.
    Registered {
        /// Precedence rule that chose the handler, `None` for tier 3.
        rule: Option<String>,
        /// Pattern the handler is registered under.
        pattern: String,
        /// The handler.
        handler: BoxedHandler,
        /// Parameters bound for the handler.
        params: RouteParams,
    },
    /// A family's default view, to be shown by the [`ViewLoader`].
    DefaultView {
        /// Rule that matched.
        rule: String,
        /// View to show.
        view: DefaultView,
        /// Argument values, in `view.args` order.
        args: Vec<String>,
        /// Captured parameters.
        params: RouteParams,
    },
    /// The rule forwards to another fragment.
    Redirect {
        /// Rule that matched.
        rule: String,
        /// Target fragment.
        to: String,
    },
    /// Root path with nothing registered: go to the role's home route.
    RoleDefault,
    /// Nothing owns this path.
    Unmatched,
}

impl Resolution {
    /// Return `true` if something will be activated.
    pub fn is_match(&self) -> bool {
        !matches!(self, Self::Unmatched)
    }

    /// Name of the precedence rule behind this resolution, if any.
    pub fn rule(&self) -> Option<&str> {
        match self {
            Self::Registered { rule, .. } => rule.as_deref(),
            Self::DefaultView { rule, .. } | Self::Redirect { rule, .. } => Some(rule),
            Self::RoleDefault | Self::Unmatched => None,
        }
    }

    /// Parameters bound by the resolution.
    pub fn params(&self) -> RouteParams {
        match self {
            Self::Registered { params, .. } | Self::DefaultView { params, .. } => params.clone(),
            _ => RouteParams::new(),
        }
    }
}

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registered {
                rule,
                pattern,
                params,
                ..
            } => f
                .debug_struct("Registered")
                .field("rule", rule)
                .field("pattern", pattern)
                .field("params", params)
                .finish_non_exhaustive(),
            Self::DefaultView {
                rule, view, args, ..
            } => f
                .debug_struct("DefaultView")
                .field("rule", rule)
                .field("view", view)
                .field("args", args)
                .finish_non_exhaustive(),
            Self::Redirect { rule, to } => f
                .debug_struct("Redirect")
                .field("rule", rule)
                .field("to", to)
                .finish(),
            Self::RoleDefault => write!(f, "RoleDefault"),
            Self::Unmatched => write!(f, "Unmatched"),
        }
    }
}

/// Resolve `path` (already normalized) through all four tiers.
pub fn resolve(path: &str, precedence: &PrecedenceTable, table: &RouteTable) -> Resolution {
    for rule in precedence.rules() {
        if let Some(resolution) = rule.apply(path, table) {
            trace_log!("Rule '{}' resolved '{}'", rule.name(), path);
            return resolution;
        }
    }

    if let Some(resolution) = resolve_registered(path, table) {
        return resolution;
    }

    if split_path(path).is_empty() {
        trace_log!("Root path unmatched, deferring to role default");
        return Resolution::RoleDefault;
    }

    Resolution::Unmatched
}

/// Tier 3: registered patterns, most specific first.
fn resolve_registered(path: &str, table: &RouteTable) -> Option<Resolution> {
    let mut patterns: Vec<&str> = table.patterns().collect();
    patterns.sort_by_key(|p| std::cmp::Reverse(specificity(p)));

    patterns.into_iter().find_map(|pattern| {
        let matched = match_pattern(path, pattern)?;
        let handler = table.lookup(pattern)?;
        trace_log!("Pattern '{}' matched '{}'", pattern, path);
        Some(Resolution::Registered {
            rule: None,
            pattern: pattern.to_string(),
            handler,
            params: matched.params,
        })
    })
}
