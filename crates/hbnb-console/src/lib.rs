//! Command interpreter for the HBnB object store.
//!
//! Each input line is normalized into a [`Command`] and dispatched by a
//! [`Console`] that owns its [`ObjectStore`](hbnb_store::ObjectStore). Two
//! surface grammars reach the same handlers:
//!
//! ```text
//! show User 1b7c...            verb + space-separated arguments
//! User.show("1b7c...")         dotted call, rewritten to the form above
//! User.update("1b7c...", {"first_name": "John", "age": 89})
//! ```
//!
//! User-input errors never escape a handler; they become one fixed message
//! line in the command's [`Outcome`].

pub mod command;
pub mod config;
pub mod console;
pub mod error;
pub mod repl;

pub use command::{normalize, Command, Verb};
pub use config::ConsoleConfig;
pub use console::{Console, Control, Outcome};
pub use error::{ConfigError, ConsoleError};
pub use repl::PROMPT;
