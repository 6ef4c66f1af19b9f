//! Two-counter demo page.
//!
//! Mounts a page with two independent counter components into an in-memory
//! document, clicks their buttons, lets the frame clock coalesce the
//! resulting re-renders, then navigates to a second page. The final document
//! is printed as HTML and as a JSON snapshot.
//!
//! Log output is controlled by `RUST_LOG` (default `info`).

use std::process::ExitCode;
use std::rc::Rc;

use serde_json::json;
use thiserror::Error;
use tokio::task::LocalSet;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use dvdi_core::dom::{Document, DomError, LiveNode};
use dvdi_core::reactive::{create_observable, Mounted, Observable};
use dvdi_core::reconcile::{mount, replace_root, ReconcileError};
use dvdi_core::scheduler::{FrameConfig, SchedulerState, TokioFrames, UpdateScheduler};
use dvdi_core::vdom::{Listener, Namespace, VNode};
use dvdi_core::h;

#[derive(Debug, Error)]
enum DemoError {
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error(transparent)]
    Dom(#[from] DomError),

    #[error("no element with id `{0}`")]
    MissingElement(String),

    #[error("failed to serialize snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

struct Counter {
    view: Mounted,
    count: Observable<i32>,
}

fn counter(id: &'static str, scheduler: &UpdateScheduler) -> Counter {
    let count = create_observable(0);

    let increment = {
        let count = count.clone();
        Listener::new(move |_| {
            count.update(|n| n + 1);
        })
    };
    let decrement = {
        let count = count.clone();
        Listener::new(move |_| {
            count.update(|n| n - 1);
        })
    };

    let state = count.clone();
    let view = Mounted::new(move || {
        h!("div", { "id" => id },
            h!("h2", {}, format!("Count: {}", state.get())),
            h!("button", { "id" => format!("{id}-inc"), "onClick" => increment.clone() }, "Increment"),
            h!("button", { "id" => format!("{id}-dec"), "onClick" => decrement.clone() }, "Decrement")
        )
    });
    view.bind(&count, scheduler);

    Counter { view, count }
}

fn home_page(counters: &[Counter]) -> VNode {
    let views: Vec<VNode> = counters.iter().map(|c| c.view.tree()).collect();
    h!("div", { "className" => "app" },
        h!("header", { "className" => "header" }, "Welcome to My App with Two Counters"),
        h!("main", { "className" => "main-content" },
            h!("section", { "className" => "description" },
                "Explore the counters below to interact with the virtual DOM:",
                views
            ),
            h!("article", {}, "More content can follow here.")
        ),
        h!("a", { "href" => "/about" }, "About"),
        h!("footer", { "className" => "footer" }, "Footer content goes here. © 2024.")
    )
}

fn about_page() -> VNode {
    h!("div", {},
        h!("h1", {}, "About Page"),
        h!("a", { "href" => "/" }, "Home")
    )
}

fn click(app: &LiveNode, id: &str) -> Result<(), DemoError> {
    let target = app
        .find_by_id(id)
        .ok_or_else(|| DemoError::MissingElement(id.to_string()))?;
    target.dispatch_event("click");
    Ok(())
}

async fn settle(scheduler: &UpdateScheduler, config: FrameConfig) {
    while scheduler.state() == SchedulerState::Armed {
        tokio::time::sleep(config.interval).await;
    }
}

async fn run() -> Result<(), DemoError> {
    let config = FrameConfig::default();
    let scheduler = UpdateScheduler::new(Rc::new(TokioFrames::new(config)));

    let document = Document::new();
    let app = document.create_element(Namespace::Html, "div")?;
    app.set_property("id", "app");

    let counters = vec![counter("counter-1", &scheduler), counter("counter-2", &scheduler)];
    let home = home_page(&counters);
    mount(&app, &home)?;
    info!(mutations = document.mutations().tree_mutations(), "home page mounted");

    document.reset_mutations();
    for _ in 0..3 {
        click(&app, "counter-1-inc")?;
    }
    click(&app, "counter-2-dec")?;
    settle(&scheduler, config).await;

    info!(
        first = counters[0].count.get(),
        second = counters[1].count.get(),
        mutations = document.mutations().tree_mutations(),
        "counters settled"
    );
    println!("{}", app.to_html());

    let about = about_page();
    replace_root(&app, Some(&home), &about)?;
    info!("navigated to about page");

    println!("{}", app.to_html());
    let report = json!({
        "document": app.snapshot(),
        "mutations": document.mutations(),
        "scheduler": scheduler.stats(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn main() -> ExitCode {
    let default_level = "info";
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            error!(%err, "failed to start runtime");
            return ExitCode::FAILURE;
        }
    };

    let local = LocalSet::new();
    match local.block_on(&runtime, run()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "demo failed");
            ExitCode::FAILURE
        }
    }
}
