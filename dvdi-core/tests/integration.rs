//! Integration Tests for the Reconciliation Engine
//!
//! These tests drive the public API end to end: build virtual trees, apply
//! them to a live document, and check the live tree, the lifecycle hooks and
//! the mutation counters.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use dvdi_core::dom::{Document, LiveNode};
use dvdi_core::reactive::{create_observable, Mounted, Observable};
use dvdi_core::reconcile::{mount, reconcile, replace_root, unmount};
use dvdi_core::scheduler::{ManualFrames, SchedulerState, Update, UpdateScheduler};
use dvdi_core::vdom::{AttrValue, Child, Listener, Namespace, VNode};
use dvdi_core::{h, svg};

fn container() -> (Document, LiveNode) {
    let doc = Document::new();
    let app = doc.create_element(Namespace::Html, "div").unwrap();
    (doc, app)
}

fn counter() -> (Rc<Cell<u32>>, impl Fn() + 'static) {
    let count = Rc::new(Cell::new(0));
    let inner = Rc::clone(&count);
    (count, move || inner.set(inner.get() + 1))
}

/// Adding a node inserts exactly one live child and fires its mount hook once.
#[test]
fn addition_inserts_one_node_and_fires_mount() {
    let (doc, app) = container();
    let (mounted, on_mount) = counter();
    let node = h!("section", {}, h!("p", {}, "hello"));
    node.set_on_mount(on_mount);

    reconcile(&app, None, None, Some(&Child::from(&node)), 0).unwrap();

    assert_eq!(app.child_count(), 1);
    assert!(app.child_at(0).unwrap().ptr_eq(&node.live().unwrap()));
    assert_eq!(mounted.get(), 1);
    assert_eq!(doc.mutations().nodes_removed, 0);
    assert_eq!(app.to_html(), "<div><section><p>hello</p></section></div>");
}

/// Removing a node detaches its live node and fires its unmount hook once.
#[test]
fn removal_detaches_and_fires_unmount() {
    let (_doc, app) = container();
    let (unmounted, on_unmount) = counter();
    let keep = h!("header");
    let node = h!("p", {}, "bye");
    node.set_on_unmount(on_unmount);

    mount(&app, &keep).unwrap();
    mount(&app, &node).unwrap();
    let live = node.live().unwrap();

    reconcile(&app, None, Some(&Child::from(&node)), None, 1).unwrap();

    assert!(app.index_of(&live).is_none());
    assert!(live.parent().is_none());
    assert_eq!(app.child_count(), 1);
    assert_eq!(unmounted.get(), 1);
    assert!(!node.is_mounted());
    assert!(node.parent().is_none());
}

/// A text child replaced by an element leaves only the element.
#[test]
fn text_replaced_by_element() {
    let (_doc, app) = container();
    let fred = Child::from("fred");
    reconcile(&app, None, None, Some(&fred), 0).unwrap();
    let text_live = app.child_at(0).unwrap();

    let span = h!("span");
    reconcile(&app, None, Some(&fred), Some(&Child::from(&span)), 0).unwrap();

    assert_eq!(app.child_count(), 1);
    assert!(app.child_at(0).unwrap().ptr_eq(&span.live().unwrap()));
    assert!(text_live.parent().is_none());
}

/// A namespace change forces a full replacement even with matching shapes.
#[test]
fn namespace_change_forces_replacement() {
    let (doc, app) = container();
    let old = h!("span", { "className" => "a", "id" => "b", "title" => "c" });
    let new = svg!("svg", { "width" => 10, "height" => 20, "viewBox" => "0 0 10 20" });

    mount(&app, &old).unwrap();
    let old_live = old.live().unwrap();
    doc.reset_mutations();

    reconcile(&app, None, Some(&Child::from(&old)), Some(&Child::from(&new)), 0).unwrap();

    let new_live = new.live().unwrap();
    assert!(!new_live.ptr_eq(&old_live));
    assert_eq!(new_live.namespace(), Some(Namespace::Svg));
    assert_eq!(doc.mutations().nodes_replaced, 1);
    assert_eq!(doc.mutations().properties_cleared, 0);
    assert_eq!(old_live.property("className"), Some(AttrValue::from("a")));
}

/// Same tag, different namespace is still a replacement.
#[test]
fn same_tag_in_other_namespace_is_replaced() {
    let (_doc, app) = container();
    let old = h!("a", { "href" => "/" });
    let new = svg!("a", { "href" => "/" });
    mount(&app, &old).unwrap();
    let old_live = old.live().unwrap();

    reconcile(&app, None, Some(&Child::from(&old)), Some(&Child::from(&new)), 0).unwrap();

    assert!(!new.live().unwrap().ptr_eq(&old_live));
}

/// Removed keys are cleared, added keys are applied, unchanged keys are kept.
#[test]
fn property_diff_is_complete() {
    let (doc, app) = container();
    let clicks = Rc::new(Cell::new(0));
    let on_click = {
        let clicks = Rc::clone(&clicks);
        Listener::new(move |_| clicks.set(clicks.get() + 1))
    };
    let old = h!("button", {
        "className" => "btn",
        "style" => "color: red",
        "onClick" => on_click.clone()
    });
    let new = h!("button", {
        "className" => "btn",
        "id" => "go",
        "onClick" => on_click.clone()
    });

    mount(&app, &old).unwrap();
    let live = old.live().unwrap();
    doc.reset_mutations();

    reconcile(&app, None, Some(&Child::from(&old)), Some(&Child::from(&new)), 0).unwrap();

    assert!(new.live().unwrap().ptr_eq(&live));
    assert_eq!(live.property_keys(), ["className", "id"]);
    assert_eq!(live.property("style"), None);
    assert!(live.has_listener("click", &on_click));
    assert_eq!(live.listener_count("click"), 1);

    let stats = doc.mutations();
    assert_eq!(stats.properties_set, 1);
    assert_eq!(stats.properties_cleared, 1);
    assert_eq!(stats.listeners_added, 0);
    assert_eq!(stats.listeners_removed, 0);

    live.dispatch_event("click");
    assert_eq!(clicks.get(), 1);
}

/// A fresh closure on a listener key is rebound, so only one handler fires.
#[test]
fn fresh_listener_is_rebound() {
    let (_doc, app) = container();
    let log = Rc::new(RefCell::new(Vec::new()));
    let make = |tag: &'static str| {
        let log = Rc::clone(&log);
        Listener::new(move |_| log.borrow_mut().push(tag))
    };
    let old = h!("button", { "onClick" => make("old") });
    let new = h!("button", { "onClick" => make("new") });

    mount(&app, &old).unwrap();
    reconcile(&app, None, Some(&Child::from(&old)), Some(&Child::from(&new)), 0).unwrap();

    new.live().unwrap().dispatch_event("click");
    assert_eq!(*log.borrow(), ["new"]);
}

/// Reconciling a tree against itself touches nothing.
#[test]
fn reconciling_identical_tree_is_idempotent() {
    let (doc, app) = container();
    let listener = Listener::new(|_| {});
    let tree = h!("div", { "className" => "app" },
        h!("h1", {}, "Title"),
        "text",
        svg!("svg", { "width" => 24 }, svg!("circle", { "r" => 4 })),
        h!("button", { "onClick" => listener.clone() }, "go")
    );
    mount(&app, &tree).unwrap();
    let html = app.to_html();
    doc.reset_mutations();

    let as_child = Child::from(&tree);
    reconcile(&app, None, Some(&as_child), Some(&as_child), 0).unwrap();

    assert_eq!(doc.mutations().tree_mutations(), 0);
    assert_eq!(doc.mutations().nodes_created, 0);
    assert_eq!(app.to_html(), html);
}

/// An equal but freshly built tree only changes what differs.
#[test]
fn rebuilt_equal_tree_needs_no_mutations() {
    let (doc, app) = container();
    let build = || h!("ul", { "className" => "list" }, h!("li", {}, "a"), h!("li", {}, "b"));
    let first = build();
    mount(&app, &first).unwrap();
    doc.reset_mutations();

    let second = build();
    reconcile(&app, None, Some(&Child::from(&first)), Some(&Child::from(&second)), 0).unwrap();

    assert_eq!(doc.mutations().tree_mutations(), 0);
    assert!(second.is_mounted());
    assert!(!first.is_mounted());
}

/// Mount hooks fire children first; unmount hooks fire parents first.
#[test]
fn hook_order_across_a_subtree() {
    let (_doc, app) = container();
    let log = Rc::new(RefCell::new(Vec::new()));
    let hooked = |tag: &'static str, children: Vec<VNode>| {
        let node = h!(tag, {}, children);
        let mount_log = Rc::clone(&log);
        node.set_on_mount(move || mount_log.borrow_mut().push(format!("mount {tag}")));
        let unmount_log = Rc::clone(&log);
        node.set_on_unmount(move || unmount_log.borrow_mut().push(format!("unmount {tag}")));
        node
    };
    let tree = hooked("section", vec![hooked("p", vec![])]);

    mount(&app, &tree).unwrap();
    unmount(&app, &tree).unwrap();

    assert_eq!(
        *log.borrow(),
        ["mount p", "mount section", "unmount section", "unmount p"]
    );
}

/// Three enqueues of one update before a frame run it once.
#[test]
fn scheduler_coalesces_repeated_updates() {
    let frames = ManualFrames::new();
    let scheduler = UpdateScheduler::new(Rc::new(frames.clone()));
    let (runs, run) = counter();
    let update = Update::new(run);

    scheduler.enqueue(update.clone());
    scheduler.enqueue(update.clone());
    scheduler.enqueue(update.clone());
    assert_eq!(scheduler.state(), SchedulerState::Armed);

    frames.tick();
    assert_eq!(runs.get(), 1);
    assert_eq!(scheduler.state(), SchedulerState::Idle);

    frames.tick();
    assert_eq!(runs.get(), 1);
}

/// Clicking buttons inside a bound component re-renders it once per frame.
#[test]
fn component_rerenders_from_clicks() {
    let (doc, app) = container();
    let frames = ManualFrames::new();
    let scheduler = UpdateScheduler::new(Rc::new(frames.clone()));

    let count = create_observable(0);
    let increment = {
        let count = count.clone();
        Listener::new(move |_| {
            count.update(|n| n + 1);
        })
    };
    let state = count.clone();
    let counter = Mounted::new(move || {
        h!("div", { "id" => "counter" },
            h!("h2", {}, format!("Count: {}", state.get())),
            h!("button", { "id" => "inc", "onClick" => increment.clone() }, "Increment")
        )
    });
    counter.bind(&count, &scheduler);

    let page = h!("main", {}, h!("h1", {}, "Counters"), counter.tree());
    mount(&app, &page).unwrap();
    let counter_live = counter.tree().live().unwrap();
    doc.reset_mutations();

    let button = app.find_by_id("inc").unwrap();
    button.dispatch_event("click");
    button.dispatch_event("click");
    assert_eq!(count.get(), 2);
    assert!(app.text_content().contains("Count: 0"));

    frames.tick();

    assert!(app.text_content().contains("Count: 2"));
    assert!(counter.tree().live().unwrap().ptr_eq(&counter_live));
    assert!(page.child(1).unwrap().as_element().unwrap().ptr_eq(&counter.tree()));
    assert_eq!(scheduler.stats().updates_run, 1);
    // Only the heading's text node changes.
    let stats = doc.mutations();
    assert_eq!(stats.tree_mutations(), 1);
    assert_eq!(stats.nodes_replaced, 1);
}

fn counter_view(scheduler: &UpdateScheduler) -> (Observable<i32>, Mounted) {
    let count = create_observable(0);
    let state = count.clone();
    let view = Mounted::new(move || h!("div", { "id" => "counter" }, format!("Count: {}", state.get())));
    view.bind(&count, scheduler);
    (count, view)
}

/// A new page that drops a sibling before a mounted component keeps the
/// component's live subtree and moves it up.
#[test]
fn component_survives_removal_of_a_sibling_before_it() {
    let (doc, app) = container();
    let frames = ManualFrames::new();
    let scheduler = UpdateScheduler::new(Rc::new(frames.clone()));
    let (count, view) = counter_view(&scheduler);

    let first = h!("div", {}, h!("div", { "className" => "banner" }, "banner"), view.tree());
    mount(&app, &first).unwrap();
    let counter_live = view.tree().live().unwrap();
    let created = doc.mutations().nodes_created;

    let second = h!("div", {}, view.tree());
    reconcile(&app, None, Some(&Child::from(&first)), Some(&Child::from(&second)), 0).unwrap();

    assert_eq!(app.to_html(), r#"<div><div><div id="counter">Count: 0</div></div></div>"#);
    assert!(view.tree().live().unwrap().ptr_eq(&counter_live));
    assert!(second.live().unwrap().child_at(0).unwrap().ptr_eq(&counter_live));
    assert_eq!(doc.mutations().nodes_created, created);

    count.set(4);
    frames.tick();

    assert_eq!(app.to_html(), r#"<div><div><div id="counter">Count: 4</div></div></div>"#);
    assert!(second.child(0).unwrap().as_element().unwrap().ptr_eq(&view.tree()));
    assert!(view.tree().parent().unwrap().ptr_eq(&second));
}

/// A new page that adds a sibling before a mounted component moves the
/// component down without re-rendering or re-mounting it.
#[test]
fn component_survives_insertion_of_a_sibling_before_it() {
    let (doc, app) = container();
    let frames = ManualFrames::new();
    let scheduler = UpdateScheduler::new(Rc::new(frames.clone()));
    let (count, view) = counter_view(&scheduler);
    let (mounts, on_mount) = counter();

    let first = h!("div", {}, view.tree());
    mount(&app, &first).unwrap();
    view.tree().set_on_mount(on_mount);
    let counter_live = view.tree().live().unwrap();
    doc.reset_mutations();

    let second = h!("div", {}, h!("div", { "className" => "banner" }, "banner"), view.tree());
    reconcile(&app, None, Some(&Child::from(&first)), Some(&Child::from(&second)), 0).unwrap();

    assert_eq!(
        app.to_html(),
        r#"<div><div><div class="banner">banner</div><div id="counter">Count: 0</div></div></div>"#
    );
    assert!(second.live().unwrap().child_at(1).unwrap().ptr_eq(&counter_live));
    assert_eq!(app.find_by_id("counter").unwrap().text_content(), "Count: 0");
    assert_eq!(mounts.get(), 0);
    assert_eq!(doc.mutations().nodes_created, 2);

    count.set(1);
    frames.tick();
    assert_eq!(
        app.to_html(),
        r#"<div><div><div class="banner">banner</div><div id="counter">Count: 1</div></div></div>"#
    );
    assert_eq!(scheduler.stats().updates_run, 1);
}

/// Replacing the page swaps the whole root and tears down the old one.
#[test]
fn page_replacement() {
    let (_doc, app) = container();
    let (unmounted, on_unmount) = counter();
    let home = h!("div", {}, h!("h1", {}, "Home"));
    home.set_on_unmount(on_unmount);
    let about = h!("div", {}, h!("h1", {}, "About Page"));

    replace_root(&app, None, &home).unwrap();
    replace_root(&app, Some(&home), &about).unwrap();

    assert_eq!(app.to_html(), "<div><div><h1>About Page</h1></div></div>");
    assert_eq!(unmounted.get(), 1);
    assert!(about.is_mounted());
}

/// Snapshots serialize to JSON.
#[test]
fn snapshot_serializes_to_json() {
    let (_doc, app) = container();
    mount(&app, &h!("p", { "id" => "x" }, "hi")).unwrap();

    let value = serde_json::to_value(app.snapshot()).unwrap();
    assert_eq!(value["type"], "element");
    assert_eq!(value["children"][0]["tag"], "p");
    assert_eq!(value["children"][0]["children"][0]["text"], "hi");
}
