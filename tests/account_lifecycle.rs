//! Account lifecycle scenarios driven through the public API.
//!
//! A user account moves passive -> pending -> active, and can be
//! suspended, unsuspended and deleted along the way.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use statewise::core::{Matcher, Outcome, State, Stateful, TransitionHistory};
use statewise::engine::{Callback, Machine};
use statewise::{MachineBuilder, MachineError};
use uuid::Uuid;

#[derive(Clone, Debug, Default)]
struct User {
    login: String,
    state: Value,
    password: Option<String>,
    activation_code: Option<String>,
    activated_at: Option<DateTime<Utc>>,
    deleted_at: Option<DateTime<Utc>>,
    recently_activated: bool,
    saves: usize,
}

impl User {
    fn new(login: &str) -> Self {
        Self {
            login: login.to_string(),
            ..Self::default()
        }
    }

    fn with_password(mut self) -> Self {
        self.password = Some("testing".to_string());
        self
    }

    fn make_activation_code(&mut self) {
        self.deleted_at = None;
        self.activation_code = Some(Uuid::new_v4().simple().to_string());
    }

    fn do_activate(&mut self) {
        self.recently_activated = true;
        self.activated_at = Some(Utc::now());
        self.deleted_at = None;
        self.activation_code = None;
    }

    fn do_delete(&mut self) {
        self.deleted_at = Some(Utc::now());
    }
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
            "make_activation_code" => self.make_activation_code(),
            "do_activate" => self.do_activate(),
            "do_delete" => self.do_delete(),
            "save" => self.saves += 1,
            _ => {
                return Err(MachineError::UnknownMethod {
                    method: method.to_string(),
                });
            }
        }
        Ok(Outcome::Success)
    }
}

fn account_machine() -> Machine<User> {
    MachineBuilder::new("state")
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
        .build()
        .unwrap()
}

fn new_user(machine: &Machine<User>) -> User {
    let mut user = User::new("john");
    machine.initialize_state(&mut user);
    user
}

fn active_user(machine: &Machine<User>) -> User {
    let mut user = new_user(machine).with_password();
    assert!(machine.fire(&mut user, "register").unwrap());
    assert!(machine.fire(&mut user, "activate").unwrap());
    user
}

#[test]
fn new_user_starts_passive() {
    let machine = account_machine();
    let user = new_user(&machine);

    assert_eq!(user.state, json!("passive"));
    assert!(machine.is_in(&user, "passive").unwrap());
}

#[test]
fn cannot_register_without_password() {
    let machine = account_machine();
    let mut user = new_user(&machine);

    assert!(!machine.can_fire(&user, "register").unwrap());
    assert!(!machine.fire(&mut user, "register").unwrap());
    assert_eq!(user.state, json!("passive"));
    assert!(user.activation_code.is_none());
    assert_eq!(user.saves, 0);
}

#[test]
fn can_register_with_password() {
    let machine = account_machine();
    let user = new_user(&machine).with_password();
    assert!(machine.can_fire(&user, "register").unwrap());
}

#[test]
fn registering_issues_activation_code() {
    let machine = account_machine();
    let mut user = new_user(&machine).with_password();

    assert!(machine.fire(&mut user, "register").unwrap());
    assert!(machine.is_in(&user, "pending").unwrap());
    assert!(user.activation_code.is_some());
    assert_eq!(user.saves, 1);
}

#[test]
fn activation_stamps_timestamp() {
    let machine = account_machine();
    let user = active_user(&machine);

    assert_eq!(user.state, json!("active"));
    assert!(user.activated_at.is_some());
    assert!(user.deleted_at.is_none());
    assert!(user.activation_code.is_none());
    assert!(user.recently_activated);
}

#[test]
fn suspend_and_unsuspend_active_user() {
    let machine = account_machine();
    let mut user = active_user(&machine);

    assert!(machine.fire(&mut user, "suspend").unwrap());
    assert_eq!(user.state, json!("suspended"));
    assert!(!machine.fire(&mut user, "suspend").unwrap());

    assert!(machine.fire(&mut user, "unsuspend").unwrap());
    assert_eq!(user.state, json!("active"));
}

#[test]
fn unsuspend_pending_user_returns_to_pending() {
    let machine = account_machine();
    let mut user = new_user(&machine).with_password();
    machine.fire(&mut user, "register").unwrap();

    assert!(machine.fire(&mut user, "suspend").unwrap());
    assert!(machine.fire(&mut user, "unsuspend").unwrap());
    assert_eq!(user.state, json!("pending"));
}

#[test]
fn unsuspend_without_history_is_a_noop() {
    let machine = account_machine();
    let mut user = new_user(&machine);

    assert!(machine.fire(&mut user, "suspend").unwrap());
    assert!(!machine.fire(&mut user, "unsuspend").unwrap());
    assert_eq!(user.state, json!("suspended"));
}

#[test]
fn deletion_is_final() {
    let machine = account_machine();
    let mut user = active_user(&machine);

    assert!(machine.fire(&mut user, "delete").unwrap());
    assert_eq!(user.state, json!("deleted"));
    assert!(user.deleted_at.is_some());

    assert!(!machine.fire(&mut user, "delete").unwrap());
    assert!(!machine.fire(&mut user, "suspend").unwrap());
    assert!(machine.events_for(&user).unwrap().is_empty());
}

#[test]
fn available_events_follow_state() {
    let machine = account_machine();
    let user = new_user(&machine).with_password();
    assert_eq!(
        machine.events_for(&user).unwrap(),
        vec!["register", "suspend", "delete"]
    );

    let active = active_user(&machine);
    let events = machine.events_for(&active).unwrap();
    assert_eq!(events, vec!["suspend", "delete"]);
}

#[test]
fn only_active_users_are_in_active_scope() {
    let machine = account_machine();
    let mut deleted = active_user(&machine);
    machine.fire(&mut deleted, "delete").unwrap();
    let users = vec![new_user(&machine), active_user(&machine), deleted];

    let active = machine.with_states(&users, &["active"]).unwrap();
    assert_eq!(active.len(), 1);
    assert!(active[0].activated_at.is_some());

    let others = machine.without_states(&users, &["active"]).unwrap();
    assert_eq!(others.len(), 2);
}

#[test]
fn strict_firing_reports_the_blocked_event() {
    let machine = account_machine();
    let mut user = new_user(&machine);

    assert_eq!(
        machine.fire_strict(&mut user, "activate"),
        Err(MachineError::InvalidTransition {
            event: "activate".to_string(),
            from: "passive".to_string(),
        })
    );
}

#[test]
fn lifecycle_is_recorded_as_history() {
    let machine = account_machine();
    let mut user = new_user(&machine).with_password();
    let mut history = TransitionHistory::new();

    for event in ["register", "activate", "suspend", "unsuspend", "delete"] {
        let mut transition = machine
            .transition_for(&user, event, &[])
            .unwrap()
            .unwrap_or_else(|| panic!("{event} should apply to {}", user.login));
        transition.perform(&mut user).unwrap();
        history = history.record(transition.record());
    }

    assert_eq!(
        history.path(),
        vec!["passive", "pending", "active", "suspended", "active", "deleted"]
    );
    assert_eq!(history.len(), 5);
    assert!(history.records().iter().all(|r| r.success));

    let json = serde_json::to_string(&history).unwrap();
    let restored: TransitionHistory = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.path(), history.path());
}

#[test]
fn custom_state_values_can_be_declared() {
    let mut machine: Machine<User> = Machine::new("state");
    let passive = State::new("passive").with_value(0).initial();
    machine.state(passive).unwrap();
    machine.state(State::new("pending").with_value(1)).unwrap();
    machine
        .event("register", |e| {
            e.transition("passive", "pending");
        })
        .unwrap();
    let mut user = User::new("jane");
    machine.initialize_state(&mut user);

    assert_eq!(user.state, json!(0));
    assert!(machine.fire(&mut user, "register").unwrap());
    assert_eq!(user.state, json!(1));
    assert_eq!(machine.current_state(&user).unwrap().name(), "pending");
}
