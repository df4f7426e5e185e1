//! Guarded transitions end to end: router, session and scripted API.

use finanzas_frontend::api::Method;
use finanzas_frontend::models::Credentials;
use finanzas_frontend::router::Route;
use finanzas_frontend::storage::TokenStorage;
use finanzas_frontend::test_support::{Harness, Reply};
use futures::executor::block_on;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case(Route::Dashboard)]
#[case(Route::Movements)]
#[case(Route::Categories)]
#[case(Route::Budgets)]
#[case(Route::Reports)]
fn anonymous_visitors_land_on_login(#[case] target: Route) {
    let harness = Harness::anonymous();

    assert_eq!(block_on(harness.router.navigate(target)), Route::Login);
    assert_eq!(harness.router.current(), Route::Login);
    assert!(harness.transport.requests().is_empty());
}

#[rstest]
#[case("/")]
#[case("/login")]
#[case("/register")]
fn signed_in_users_skip_entry_pages(#[case] path: &str) {
    let harness = Harness::anonymous();
    harness.transport.expect(
        Method::Post,
        "/auth/login",
        Reply::json(json!({ "access_token": "T", "user": { "id": 1 } })),
    );
    let credentials = Credentials {
        email: "a".to_string(),
        password: "b".to_string(),
    };
    assert!(block_on(harness.session.login(&credentials)));

    assert_eq!(
        block_on(harness.router.navigate(Route::from_path(path))),
        Route::Dashboard
    );
    assert_eq!(harness.transport.count(Method::Get, "/auth/me"), 0);
}

#[test]
fn restored_token_loads_identity_before_showing_the_page() {
    let harness = Harness::signed_in("T");
    harness.transport.expect(
        Method::Get,
        "/auth/me",
        Reply::json(json!({ "id": 3, "email": "b@example.test" })),
    );

    assert_eq!(block_on(harness.router.navigate(Route::Budgets)), Route::Budgets);
    assert_eq!(harness.session.user().map(|user| user.id), Some(3));

    // Identity is cached; later transitions do not ask again.
    assert_eq!(block_on(harness.router.navigate(Route::Reports)), Route::Reports);
    assert_eq!(harness.transport.count(Method::Get, "/auth/me"), 1);
}

#[test]
fn redirect_to_dashboard_loads_identity_on_the_second_hop() {
    let harness = Harness::signed_in("T");
    harness
        .transport
        .expect(Method::Get, "/auth/me", Reply::json(json!({ "id": 3 })));

    assert_eq!(block_on(harness.router.navigate(Route::Welcome)), Route::Dashboard);
    assert!(harness.session.user().is_some());
}

#[test]
fn rejected_token_still_completes_the_current_transition() {
    let harness = Harness::signed_in("stale");
    harness.transport.expect(Method::Get, "/auth/me", Reply::status(401));

    // The table is not re-evaluated after the failed lookup.
    assert_eq!(block_on(harness.router.navigate(Route::Movements)), Route::Movements);
    assert!(!harness.session.is_authenticated());
    assert!(harness.session.user().is_none());
    assert_eq!(harness.tokens.load(), None);

    // Logout queued its own transition, which the guard then lets through.
    assert_eq!(harness.navigator.routes(), vec![Route::Login]);
    assert_eq!(block_on(harness.router.navigate(Route::Login)), Route::Login);
}

#[test]
fn logout_routes_through_the_guard() {
    let harness = Harness::signed_in("T");
    harness
        .transport
        .expect(Method::Get, "/auth/me", Reply::json(json!({ "id": 1 })));
    block_on(harness.router.navigate(Route::Dashboard));

    harness.session.logout();
    let requested = harness.navigator.routes();
    assert_eq!(requested, vec![Route::Login]);
    assert_eq!(block_on(harness.router.navigate(requested[0])), Route::Login);

    // A protected page is now out of reach again.
    assert_eq!(block_on(harness.router.navigate(Route::Dashboard)), Route::Login);
}
