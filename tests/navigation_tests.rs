//! Integration tests for the navigation controller
//!
//! Every test drives a router over an in-memory location whose change
//! notifications are consumed by `Router::listen` on a `LocalPool`, so the
//! interleaving of concurrent navigations is deterministic.

mod common;

use common::*;
use futures::channel::oneshot;
use shell_navigator::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

// ============================================================================
// Re-entrancy
// ============================================================================

#[test]
fn test_duplicate_navigation_runs_handler_once() {
    let calls = Calls::new();
    let requests = Requests::new();
    let mut h = Harness::new(|b| b.route("/x", recording("x", &calls, &requests)));

    let first = h.spawn_navigate("/x");
    let second = h.spawn_navigate("/x");
    h.settle();

    assert!(matches!(*first.borrow(), Some(NavigationResult::Scheduled { .. })));
    assert!(matches!(*second.borrow(), Some(NavigationResult::Duplicate { .. })));
    assert_eq!(calls.count("x"), 1);
    assert_eq!(h.router.in_flight(), None);
}

#[test]
fn test_duplicate_suppressed_during_self_dispatch() {
    let calls = Calls::new();
    let (handler, gates) = gated("x", &calls);
    let mut h = Harness::at("/x", |b| b.route("/x", handler));

    let first = h.spawn_navigate("/x");
    h.settle();
    assert_eq!(calls.all(), vec!["x:start"]);

    let second = h.spawn_navigate("#/x/");
    h.settle();
    assert!(matches!(*second.borrow(), Some(NavigationResult::Duplicate { .. })));

    gates.open();
    h.settle();
    assert!(first.borrow().as_ref().is_some_and(NavigationResult::is_success));
    assert_eq!(calls.all(), vec!["x:start", "x:end"]);
}

#[test]
fn test_later_target_wins_when_transitions_overlap() {
    let calls = Calls::new();
    let requests = Requests::new();
    let (slow_x, gates) = gated("x", &calls);
    let guard = ScriptedGuard::new();
    let mut h = Harness::new(|b| {
        b.route("/x", slow_x)
            .route("/y", recording("y", &calls, &requests))
            .guard(guard.clone())
    });

    h.navigate("/x");
    assert_eq!(calls.all(), vec!["x:start"]);
    assert_eq!(h.current_path().as_deref(), Some("/x"));

    h.navigate("/y");
    assert_eq!(h.current_path().as_deref(), Some("/y"));

    gates.open();
    h.settle();

    assert_eq!(guard.checked.all(), vec!["/x", "/y"]);
    assert_eq!(calls.all(), vec!["x:start", "y", "x:end"]);
    assert_eq!(h.current_path().as_deref(), Some("/y"));
    assert_eq!(h.router.in_flight(), None);
    // Overlapping transitions interleave their marks.
    assert_eq!(
        h.surface.history(),
        vec![
            TransitionPhase::Leaving,
            TransitionPhase::Leaving,
            TransitionPhase::Entering,
            TransitionPhase::Entering,
        ]
    );
}

#[test]
fn test_back_to_back_navigations_activate_final_target_once() {
    let calls = Calls::new();
    let requests = Requests::new();
    let guard = ScriptedGuard::new();
    let mut h = Harness::new(|b| {
        b.route("/x", recording("x", &calls, &requests))
            .route("/y", recording("y", &calls, &requests))
            .guard(guard.clone())
    });

    let first = h.spawn_navigate("/x");
    let second = h.spawn_navigate("/y");
    h.settle();

    assert!(matches!(*first.borrow(), Some(NavigationResult::Scheduled { .. })));
    assert!(matches!(*second.borrow(), Some(NavigationResult::Scheduled { .. })));
    // Both queued changes read the final fragment.
    assert_eq!(guard.checked.all(), vec!["/y"]);
    assert_eq!(calls.all(), vec!["y"]);
    assert_eq!(h.current_path().as_deref(), Some("/y"));
    assert_eq!(h.router.in_flight(), None);

    // A later assignment is handled again.
    h.navigate("/x");
    h.navigate("/y");
    assert_eq!(calls.all(), vec!["y", "x", "y"]);
}

#[test]
fn test_running_pipeline_is_not_restarted() {
    let calls = Calls::new();
    let (slow_x, gates) = gated("x", &calls);
    let mut h = Harness::new(|b| b.route("/x", slow_x));

    h.navigate("/x");
    assert_eq!(calls.all(), vec!["x:start"]);

    let again = h.pool.run_until(h.router.handle_location_change());
    assert!(again.is_duplicate());
    assert_eq!(gates.waiting(), 1);

    gates.open();
    h.settle();
    assert_eq!(calls.all(), vec!["x:start", "x:end"]);
    assert_eq!(h.router.in_flight(), None);
}

#[test]
fn test_handler_may_navigate_further() {
    let calls = Calls::new();
    let requests = Requests::new();
    let mut h = Harness::new(|b| b.route("/next", recording("next", &calls, &requests)));

    let router = h.router.clone();
    let inner_calls = calls.clone();
    h.router.add_route(
        "/start",
        handler_fn(move |_| {
            inner_calls.push("start");
            let onward = router.navigate("/next");
            async move {
                onward.await;
                Ok(())
            }
        }),
    );

    let result = h.navigate("/start");
    assert!(matches!(result, NavigationResult::Scheduled { .. }));
    assert_eq!(calls.all(), vec!["start", "next"]);
    assert_eq!(h.current_path().as_deref(), Some("/next"));
    assert_eq!(h.location.fragment(), "/next");
}

// ============================================================================
// Guards
// ============================================================================

#[test]
fn test_guard_redirect_shows_message_after_redirect() {
    let calls = Calls::new();
    let requests = Requests::new();
    let guard = ScriptedGuard::new().on(
        "/admin/dashboard",
        GuardDecision::redirect_with_message("/login", "Please login to access this page"),
    );
    let mut h = Harness::new(|b| {
        b.route("/admin/dashboard", recording("admin", &calls, &requests))
            .route("/login", recording("login", &calls, &requests))
            .guard(guard.clone())
    });

    h.navigate("/admin/dashboard");

    assert_eq!(calls.all(), vec!["login"]);
    assert_eq!(guard.checked.count("/login"), 1);
    assert_eq!(h.current_path().as_deref(), Some("/login"));
    assert_eq!(h.location.fragment(), "/login");
    assert_eq!(h.message().as_deref(), Some("Please login to access this page"));
    assert_eq!(h.router.in_flight(), None);
}

#[test]
fn test_guard_redirect_from_external_change() {
    let calls = Calls::new();
    let requests = Requests::new();
    let guard = ScriptedGuard::new().on(
        "/trainer/dashboard",
        GuardDecision::redirect_with_message("/dashboard", "Trainer access required"),
    );
    let mut h = Harness::new(|b| {
        b.route("/dashboard", recording("dashboard", &calls, &requests))
            .route("/trainer/dashboard", recording("trainer", &calls, &requests))
            .guard(guard)
    });

    h.visit("#/trainer/dashboard");

    assert_eq!(calls.all(), vec!["dashboard"]);
    assert_eq!(h.message().as_deref(), Some("Trainer access required"));
}

#[test]
fn test_guard_deny_without_redirect() {
    let calls = Calls::new();
    let requests = Requests::new();
    let guard = ScriptedGuard::new().on(
        "/admin/users",
        GuardDecision::deny_with_message("Admin access required"),
    );
    let mut h = Harness::at("/profile", |b| {
        b.route("/profile", recording("profile", &calls, &requests))
            .route("/admin/*", recording("admin", &calls, &requests))
            .guard(guard)
    });
    h.pool.run_until(h.router.start());

    h.navigate("/admin/users");
    assert_eq!(calls.all(), vec!["profile"]);
    assert_eq!(h.current_path().as_deref(), Some("/profile"));
    assert_eq!(h.message().as_deref(), Some("Admin access required"));

    // The next attempt clears the stale message before the guard runs.
    h.navigate("/profile");
    assert_eq!(h.message(), None);
}

#[test]
fn test_guard_is_awaited_before_commit() {
    let calls = Calls::new();
    let requests = Requests::new();
    let (release, wait) = oneshot::channel::<()>();
    let wait = Rc::new(RefCell::new(Some(wait)));
    let guard = guard_fn(move |_| {
        let wait = wait.borrow_mut().take();
        async move {
            if let Some(wait) = wait {
                let _ = wait.await;
            }
            GuardDecision::allow()
        }
    });
    let mut h = Harness::new(|b| b.route("/profile", recording("profile", &calls, &requests)).guard(guard));

    h.navigate("/profile");
    assert!(calls.all().is_empty());
    assert_eq!(h.router.current_route(), None);
    assert_eq!(h.router.in_flight().as_deref(), Some("/profile"));
    assert!(h.navigate("/profile").is_duplicate());

    release.send(()).unwrap();
    h.settle();
    assert_eq!(calls.all(), vec!["profile"]);
    assert_eq!(h.router.in_flight(), None);
}

#[test]
fn test_redirect_loop_terminates() {
    let guard = ScriptedGuard::new()
        .on("/a", GuardDecision::redirect("/b"))
        .on("/b", GuardDecision::redirect("/a"));
    let mut h = Harness::new(|b| b.route("/a", noop()).route("/b", noop()).guard(guard.clone()));

    h.navigate("/a");

    let reported = h.reported.all();
    assert_eq!(reported.len(), 1);
    assert!(matches!(reported[0], NavigationError::RedirectLoop { depth: 5, .. }));
    assert_eq!(guard.checked.all().len(), 6);
    assert!(h.message().is_some_and(|m| m.starts_with("Redirect loop detected")));
    assert_eq!(h.router.in_flight(), None);
}

// ============================================================================
// Failures and misses
// ============================================================================

#[test]
fn test_handler_failure_resets_to_idle() {
    let calls = Calls::new();
    let mut h = Harness::new(|b| b.route("/broken", failing("broken", &calls, "render failed")));

    h.navigate("/broken");
    assert_eq!(h.router.in_flight(), None);
    assert_eq!(h.reported.all().len(), 1);
    assert_eq!(
        h.reported.all()[0].to_string(),
        "Handler for /broken failed: render failed"
    );

    // Same target again: dispatched directly, not dropped as a duplicate.
    let again = pollster::block_on(h.router.navigate("/broken"));
    match again {
        NavigationResult::Error(NavigationError::HandlerFailed { path, .. }) => {
            assert_eq!(path, "/broken");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(calls.count("broken"), 2);
    // No rollback: the failed route stays committed.
    assert_eq!(h.current_path().as_deref(), Some("/broken"));
}

#[test]
fn test_unmatched_path_keeps_current_route() {
    let calls = Calls::new();
    let requests = Requests::new();
    let mut h = Harness::new(|b| b.route("/profile", recording("profile", &calls, &requests)));

    h.navigate("/profile");
    let before = h.router.current_route();

    h.navigate("/totally-unknown");
    assert_eq!(h.router.current_route(), before);
    assert_eq!(calls.all(), vec!["profile"]);
    assert_eq!(h.router.in_flight(), None);

    let direct = pollster::block_on(h.router.handle_location_change());
    assert!(direct.is_not_found());
}

// ============================================================================
// Resolution through the controller
// ============================================================================

#[test]
fn test_handler_receives_params_and_query() {
    let calls = Calls::new();
    let requests = Requests::new();
    let mut h = Harness::new(|b| {
        b.route("/courses/:id", recording("detail", &calls, &requests))
            .route("/courses/:id/lab/:labId", recording("lab", &calls, &requests))
    });

    h.navigate("/courses/abc123/lab/lab-1?attempt=2");

    assert_eq!(calls.all(), vec!["lab"]);
    let request = requests.last().unwrap();
    assert_eq!(request.path, "/courses/abc123/lab/lab-1");
    assert_eq!(request.pattern.as_deref(), Some("/courses/:id/lab/:labId"));
    assert_param_equals(&request.params, "id", "abc123");
    assert_param_equals(&request.params, "labId", "lab-1");
    assert_eq!(request.query.get_as::<u32>("attempt"), Some(2));
    assert_eq!(h.router.current_route(), Some(request));
}

#[test]
fn test_my_courses_reaches_dedicated_handler() {
    let calls = Calls::new();
    let requests = Requests::new();
    let mut h = Harness::new(|b| {
        b.route("/courses/:id", recording("detail", &calls, &requests))
            .route("/courses/my-courses", recording("mine", &calls, &requests))
    });

    h.navigate("/courses/my-courses");
    h.navigate("/courses/abc123");
    assert_eq!(calls.all(), vec!["mine", "detail"]);
}

#[test]
fn test_default_view_loaded_without_handler() {
    let views = RecordingViews::default();
    let mut h = Harness::new(|b| b.views(views.clone()));

    let result = h.navigate("/courses/c1/lab/l-2");
    assert!(matches!(result, NavigationResult::Scheduled { .. }));
    assert_eq!(views.0.all(), vec!["lab-viewer.show(c1, l-2)"]);

    let current = h.router.current_route().unwrap();
    assert_eq!(current.pattern.as_deref(), Some("course-lab"));
    assert_param_equals(&current.params, "labId", "l-2");
}

#[test]
fn test_default_view_without_loader_is_not_found() {
    let (location, _changes) = MemoryLocation::with_fragment("/notifications");
    let router = Router::builder(location).build();
    assert!(pollster::block_on(router.start()).is_not_found());
    assert_eq!(router.current_route(), None);
}

#[test]
fn test_rule_redirect_continues_at_reports() {
    let calls = Calls::new();
    let requests = Requests::new();
    let mut h = Harness::new(|b| {
        b.route(
            "/reports/trainer/learner/:id",
            recording("report", &calls, &requests),
        )
    });

    h.navigate("/trainer/learners/u-9/progress");

    assert_eq!(calls.all(), vec!["report"]);
    assert_param_equals(&requests.last().unwrap().params, "id", "u-9");
    assert_eq!(h.location.fragment(), "/reports/trainer/learner/u-9");
}

#[test]
fn test_root_goes_to_role_home() {
    let calls = Calls::new();
    let requests = Requests::new();
    let mut h = Harness::new(|b| {
        b.route("/trainer/dashboard", recording("trainer", &calls, &requests))
            .default_route(RoleHome::new(|| async { Some(UserRole::Trainer) }))
    });

    let result = h.pool.run_until(h.router.start());
    assert_eq!(result.redirect_path(), Some("/trainer/dashboard"));
    h.settle();

    assert_eq!(calls.all(), vec!["trainer"]);
    assert_eq!(h.current_path().as_deref(), Some("/trainer/dashboard"));
}

#[test]
fn test_root_without_session_goes_to_login() {
    let calls = Calls::new();
    let requests = Requests::new();
    let mut h = Harness::new(|b| b.route("/login", recording("login", &calls, &requests)));

    h.pool.run_until(h.router.start());
    h.settle();
    assert_eq!(calls.all(), vec!["login"]);
}

#[test]
fn test_external_change_is_handled() {
    let calls = Calls::new();
    let requests = Requests::new();
    let mut h = Harness::new(|b| b.route("/courses/:id", recording("detail", &calls, &requests)));

    h.visit("/courses/seo-master-2026");
    h.visit("/courses/rust-101");

    assert_eq!(calls.all(), vec!["detail", "detail"]);
    assert_param_equals(&requests.last().unwrap().params, "id", "rust-101");
}

// ============================================================================
// Transitions
// ============================================================================

#[test]
fn test_leave_delay_uses_timer() {
    let slept = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&slept);
    let timer = move |duration: Duration| {
        sink.borrow_mut().push(duration);
        async {}
    };
    let mut h = Harness::new(|b| b.route("/profile", noop()).timer(timer));

    h.navigate("/profile");
    assert_eq!(*slept.borrow(), vec![Duration::from_millis(150)]);
    assert_eq!(
        h.surface.history(),
        vec![TransitionPhase::Leaving, TransitionPhase::Entering]
    );
}

#[test]
fn test_zero_leave_delay_skips_timer() {
    let slept = Rc::new(RefCell::new(Vec::<Duration>::new()));
    let sink = Rc::clone(&slept);
    let timer = move |duration: Duration| {
        sink.borrow_mut().push(duration);
        async {}
    };
    let mut h = Harness::new(|b| {
        b.route("/profile", noop())
            .timer(timer)
            .config(RouterConfig::new().leave_delay(Duration::ZERO))
    });

    h.navigate("/profile");
    assert!(slept.borrow().is_empty());
}
