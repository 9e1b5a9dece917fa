//! Account Lifecycle
//!
//! This example walks a user account through registration, activation,
//! suspension and deletion.
//!
//! Key concepts:
//! - Guarded events (registration requires a password)
//! - Before callbacks resolved by method name
//! - A configured `save` action run after each state change
//! - Transition history recorded from performed transitions
//!
//! Run with: RUST_LOG=statewise=debug cargo run --example account_lifecycle

use chrono::{DateTime, Utc};
use serde_json::Value;
use statewise::core::{Matcher, Outcome, Stateful, TransitionHistory};
use statewise::{Callback, MachineBuilder, MachineError};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Debug, Default)]
struct User {
    login: String,
    state: Value,
    password: Option<String>,
    activation_code: Option<String>,
    activated_at: Option<DateTime<Utc>>,
    deleted_at: Option<DateTime<Utc>>,
}

impl Stateful for User {
    fn read_attribute(&self, _attribute: &str) -> Value {
        self.state.clone()
    }

    fn write_attribute(&mut self, _attribute: &str, value: Value) {
        self.state = value;
    }

    fn invoke(&mut self, method: &str) -> Result<Outcome, MachineError> {
        match method {
            "make_activation_code" => {
                self.deleted_at = None;
                self.activation_code = Some(Uuid::new_v4().simple().to_string());
            }
            "do_activate" => {
                self.activated_at = Some(Utc::now());
                self.deleted_at = None;
                self.activation_code = None;
            }
            "do_delete" => self.deleted_at = Some(Utc::now()),
            "save" => println!("  [DB] Saved {} in state {}", self.login, self.state),
            _ => {
                return Err(MachineError::UnknownMethod {
                    method: method.to_string(),
                });
            }
        }
        Ok(Outcome::Success)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== Account Lifecycle Example ===\n");

    let machine = MachineBuilder::new("state")
        .initial("passive")
        .action("save")
        .states(["passive", "pending", "active", "suspended", "deleted"])
        .before(Callback::method("make_activation_code").on("register"))
        .before(Callback::method("do_activate").on("activate"))
        .before(Callback::method("do_delete").on("delete"))
        .event("register", |e| {
            e.transition("passive", "pending")
                .when(|u: &User| u.password.is_some());
        })
        .event("activate", |e| {
            e.transition("pending", "active");
        })
        .event("suspend", |e| {
            e.transition(Matcher::all_except(["suspended", "deleted"]), "suspended");
        })
        .event("delete", |e| {
            e.transition(Matcher::all_except(["deleted"]), "deleted");
        })
        .event("unsuspend", |e| {
            e.transition("suspended", "active")
                .when(|u: &User| u.activated_at.is_some());
            e.transition("suspended", "pending")
                .when(|u: &User| u.activation_code.is_some());
        })
        .build()?;

    let mut user = User {
        login: "john".to_string(),
        ..User::default()
    };
    machine.initialize_state(&mut user);
    println!("New user starts in: {}", user.state);

    println!("\nScenario 1: Register without a password");
    println!("  Registered: {}", machine.fire(&mut user, "register")?);

    println!("\nScenario 2: Walk through the lifecycle");
    user.password = Some("testing".to_string());
    let mut history = TransitionHistory::new();
    for event in ["register", "activate", "suspend", "unsuspend", "delete"] {
        let Some(mut transition) = machine.transition_for(&user, event, &[])? else {
            println!("  {event} does not apply in {}", user.state);
            continue;
        };
        let ok = transition.perform(&mut user)?;
        println!("  {transition} -> {ok}");
        history = history.record(transition.record());
    }

    println!("\nPath taken: {}", history.path().join(" -> "));
    println!("Events still available: {:?}", machine.events_for(&user)?);
    println!("Deleted at: {:?}", user.deleted_at);
    let json = serde_json::to_string_pretty(&history)?;
    println!("\nHistory as JSON:\n{json}");

    Ok(())
}
