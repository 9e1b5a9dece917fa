//! Statewise: an attribute-oriented state machine engine
//!
//! A `Machine` drives one attribute of a host object. It declares named
//! states and events, runs guarded before/after callbacks around each
//! transition, invokes a configured action once the new state is stored,
//! and can perform transitions of several machines on one object
//! together.
//!
//! # Core Concepts
//!
//! - **State**: a named value stored in the attribute, optionally recognized by a matcher
//! - **Event**: ordered, guarded `from -> to` rules; the first applicable rule wins
//! - **Transition**: one state change and its before/persist/action/after pipeline
//! - **Stateful**: the capability a host object exposes (attribute access and named methods)
//!
//! # Example
//!
//! ```rust
//! use statewise::core::{Outcome, State, Stateful};
//! use statewise::engine::{Callback, Machine, MachineOptions};
//! use statewise::MachineError;
//! use serde_json::{json, Value};
//!
//! #[derive(Default)]
//! struct Account {
//!     state: Value,
//!     password: Option<String>,
//!     saves: usize,
//! }
//!
//! impl Stateful for Account {
//!     fn read_attribute(&self, _attribute: &str) -> Value {
//!         self.state.clone()
//!     }
//!
//!     fn write_attribute(&mut self, _attribute: &str, value: Value) {
//!         self.state = value;
//!     }
//!
//!     fn invoke(&mut self, method: &str) -> Result<Outcome, MachineError> {
//!         match method {
//!             "save" => {
//!                 self.saves += 1;
//!                 Ok(Outcome::Success)
//!             }
//!             _ => Err(MachineError::UnknownMethod { method: method.to_string() }),
//!         }
//!     }
//! }
//!
//! let mut machine = Machine::with_options(MachineOptions {
//!     initial: Some("passive".to_string()),
//!     action: Some("save".to_string()),
//!     ..MachineOptions::default()
//! });
//! machine.state(State::new("passive")).unwrap();
//! machine.state(State::new("pending")).unwrap();
//! machine
//!     .event("register", |e| {
//!         e.transition("passive", "pending").when(|a: &Account| a.password.is_some());
//!     })
//!     .unwrap();
//! machine.after_transition(Callback::object(|a: &mut Account| a.password = None).on("register"));
//!
//! let mut account = Account::default();
//! machine.initialize_state(&mut account);
//! assert!(!machine.fire(&mut account, "register").unwrap());
//!
//! account.password = Some("secret".to_string());
//! assert!(machine.fire(&mut account, "register").unwrap());
//! assert_eq!(account.state, json!("pending"));
//! assert_eq!(account.saves, 1);
//! ```

pub mod builder;
pub mod core;
pub mod engine;
pub mod validation;

mod error;

// Re-export commonly used types
pub use builder::{BuildError, MachineBuilder};
pub use core::{Guard, Matcher, Outcome, State, Stateful, Target};
pub use engine::{Callback, Event, Machine, MachineOptions, MachineRegistry, Transition};
pub use error::MachineError;
