use std::sync::{Arc, Mutex};

use tracing::Subscriber;
use tracing_subscriber::{
    Layer, Registry,
    layer::{Context, SubscriberExt},
    registry::LookupSpan,
};

use crate::process::{config::RunOptions, redirect::Redirect, run::run};

use super::helper::echo;

/// Records the message of every event that carries a `pid` field.
#[derive(Clone, Default)]
struct PidEventLayer {
    messages: Arc<Mutex<Vec<String>>>,
}

impl<S> Layer<S> for PidEventLayer
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
{
    fn on_event(&self, event: &tracing::Event, _ctx: Context<S>) {
        let mut visitor = PidVisitor::default();
        event.record(&mut visitor);
        if visitor.has_pid {
            self.messages.lock().unwrap().push(visitor.message);
        }
    }
}

#[derive(Default)]
struct PidVisitor {
    has_pid: bool,
    message: String,
}

impl tracing::field::Visit for PidVisitor {
    fn record_u64(&mut self, field: &tracing::field::Field, _value: u64) {
        if field.name() == "pid" {
            self.has_pid = true;
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        }
    }
}

#[test]
fn spawn_and_reap_are_logged_with_pid() {
    let layer = PidEventLayer::default();
    let subscriber = Registry::default().with(layer.clone());

    tracing::subscriber::with_default(subscriber, || {
        run(echo("traced"), RunOptions::new().cout(Redirect::Pipe)).unwrap();
    });

    let messages = layer.messages.lock().unwrap();
    assert!(messages.iter().any(|m| m == "Process spawned"), "{:?}", messages);
    assert!(messages.iter().any(|m| m == "Child reaped"), "{:?}", messages);
}
