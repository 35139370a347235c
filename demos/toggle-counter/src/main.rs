//! Toggle counter binary
//!
//! Reads commands from stdin, dispatches them, and re-renders both elements
//! after every committed transition.

use std::io::{self, BufRead, Write};
use std::sync::{Arc, Weak};
use toggle_counter::command::{Command, parse_line};
use toggle_counter::config::Config;
use toggle_counter::view::View;
use toggle_counter::{AppReducer, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use unistate_runtime::Store;

type AppStore = Store<AppReducer>;

fn render(state: &AppState) {
    println!("{}", View::of(state));
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "toggle_counter=info,unistate_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    unistate_runtime::metrics::describe_metrics();

    let config = Config::from_env();
    tracing::info!(?config, "Starting toggle counter");

    let store = Arc::new(AppStore::with_config(AppReducer, None, config.store_config()));

    // The listener holds a weak handle so the store is not kept alive by itself
    let weak: Weak<AppStore> = Arc::downgrade(&store);
    let subscription = store.subscribe(move || {
        if let Some(store) = weak.upgrade() {
            store.read(render);
        }
    });

    println!("=== Toggle Counter ===");
    println!("Commands: toggle, + [N], - [N], state, quit, or a JSON action\n");
    store.read(render);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        match parse_line(&line, config.step) {
            Ok(None) => {},
            Ok(Some(Command::Quit)) => break,
            Ok(Some(Command::Show)) => store.read(render),
            Ok(Some(Command::Dispatch(action))) => {
                if let Err(error) = store.dispatch(action) {
                    tracing::error!(%error, "Dispatch failed");
                    eprintln!("error: {error}");
                }
            },
            Err(error) => eprintln!("error: {error}"),
        }
        io::stdout().flush()?;
    }

    subscription.unsubscribe();
    tracing::info!(
        dispatches = store.dispatch_count(),
        state = ?*store.state(),
        "Toggle counter stopped"
    );
    Ok(())
}
