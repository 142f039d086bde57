use cucumber::{given, then, when};
use e2e::helpers::{query_param_names, raw_query_param};
use log::debug;
use order_bar::scheduler::CycleErrorPolicy;

use crate::cucumber::{
    world::{SHOP_DOMAIN, WIDGET_UUID},
    BarWorld,
};

#[given("the mock services are running")]
async fn services_are_running(world: &mut BarWorld) {
    world.start_services().await;
}

#[given("the favicon service lists an icon for the shop")]
fn favicon_lists_an_icon(world: &mut BarWorld) {
    let services = world.services();
    let icon = services.icon_url("favicon.png");
    let fallback = services.icon_url("apple-touch-icon.jpg");
    services.list_icons(&[icon.as_str(), fallback.as_str()]);
}

#[given("the favicon service has no icons for the shop")]
fn favicon_has_no_icons(world: &mut BarWorld) {
    world.services().set_favicon_reply(200, r#"{"domain": "shop.example.com", "icons": []}"#);
}

#[given(expr = "the icon host responds with status {int}")]
fn icon_host_status(world: &mut BarWorld, status: u16) {
    world.services().set_icon(status, b"nope");
}

#[given(expr = "the shop has {int} orders today")]
fn shop_has_orders(world: &mut BarWorld, count: u64) {
    world.services().set_order_count(count);
}

#[given(expr = "the order count endpoint responds with status {int}")]
fn order_count_fails(world: &mut BarWorld, status: u16) {
    world.services().fail_order_count(status);
}

#[given(expr = "the widget host responds with status {int}")]
fn widget_host_status(world: &mut BarWorld, status: u16) {
    world.services().set_widget_status(status);
}

#[given("the order bar exits on errors")]
fn exits_on_errors(world: &mut BarWorld) {
    world.error_policy = CycleErrorPolicy::Exit;
}

#[when(expr = "the order bar runs {int} update(s)")]
async fn order_bar_runs(world: &mut BarWorld, updates: u64) {
    world.run_order_bar(updates).await;
}

#[then("the order bar finishes cleanly")]
fn finishes_cleanly(world: &mut BarWorld) {
    let outcome = world.outcome.clone().expect("The order bar has not run");
    assert!(outcome.is_ok(), "Expected a clean exit, got {outcome:?}");
}

#[then(expr = "the order bar stops with an error containing {string}")]
fn stops_with_error(world: &mut BarWorld, message: String) {
    match world.outcome.clone().expect("The order bar has not run") {
        Ok(()) => panic!("Expected the order bar to fail with '{message}'"),
        Err(e) => assert!(e.contains(&message), "Expected an error containing '{message}', got '{e}'"),
    }
}

#[then(expr = "the widget received {int} update(s)")]
fn widget_received(world: &mut BarWorld, count: usize) {
    let updates = world.widget_updates();
    debug!("Widget updates: {updates:?}");
    assert_eq!(updates.len(), count, "Expected {count} widget updates, got {}", updates.len());
}

#[then(expr = "the shop was asked for today's order count {int} time(s)")]
fn shop_was_asked(world: &mut BarWorld, count: usize) {
    let queries = world.services().count_queries();
    assert_eq!(queries.len(), count);
    for query in queries {
        let min = query.get("created_at_min").expect("created_at_min missing");
        let max = query.get("created_at_max").expect("created_at_max missing");
        assert!(min.contains("T00:00:00"), "Window should start at midnight, but starts at {min}");
        assert!(min <= max, "Window is back to front: {min} .. {max}");
    }
}

#[then(expr = "every update shows {string}")]
fn every_update_shows(world: &mut BarWorld, text: String) {
    for update in world.widget_updates() {
        assert_eq!(update.uuid, WIDGET_UUID);
        assert_eq!(update.text, text);
        assert_eq!(raw_query_param(&update.raw_query, "text").as_deref(), Some(text.as_str()));
        assert_eq!(query_param_names(&update.raw_query), vec!["uuid", "text", "icon_path"]);
    }
}

#[then("every update carries the downloaded icon path")]
fn updates_carry_icon(world: &mut BarWorld) {
    let expected = world.expected_icon_path().to_string_lossy().into_owned();
    for update in world.widget_updates() {
        assert_eq!(update.icon_path, expected);
    }
}

#[then("every update carries an empty icon path")]
fn updates_carry_empty_icon(world: &mut BarWorld) {
    for update in world.widget_updates() {
        assert!(update.icon_path.is_empty(), "Expected no icon, got {}", update.icon_path);
        assert!(update.raw_query.ends_with("&icon_path="));
    }
}

#[then("the shop icon was saved")]
fn icon_was_saved(world: &mut BarWorld) {
    let path = world.expected_icon_path();
    assert!(path.exists(), "Expected {} to exist", path.display());
    assert_eq!(world.services().favicon_lookups(), vec![SHOP_DOMAIN.to_string()]);
}

#[then("no icon file was saved")]
fn no_icon_saved(world: &mut BarWorld) {
    let files = std::fs::read_dir(world.icon_dir.path()).expect("Icon directory is missing").count();
    assert_eq!(files, 0, "Expected an empty icon directory");
}
