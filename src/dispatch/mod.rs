//! Method-dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     RestClass declarations / raw registrations
//!     → table.rs (DispatchTableBuilder: validate, add refusal handlers)
//!     → Freeze as immutable DispatchTable
//!
//! Request time:
//!     (resource, RestRequest)
//!     → dispatcher.rs (lookup → permission check → invoke)
//!     → allow.rs on a miss (NotAllowed + Allow list)
//!     → Return: Payload or DispatchError
//! ```
//!
//! # Design Decisions
//! - Each verb is its own registration with its own permission
//! - Refusal handlers make "nothing specific matched" an ordinary lookup hit
//! - The dispatcher never logs; errors go to the HTTP boundary

pub mod allow;
pub mod class;
pub mod dispatcher;
pub mod handler;
pub mod table;

pub use allow::{allow_header, allowed_verbs, NotAllowed, NOT_ALLOWED_BODY, TEXT_PLAIN_UTF8};
pub use class::RestClass;
pub use dispatcher::{DispatchError, Dispatcher};
pub use handler::{Handler, HandlerError, Payload, RestRequest, RestView};
pub use table::{DispatchTable, DispatchTableBuilder, Registration, RegistrationError};
