//! Configuration responder actor.
//!
//! The responder owns the core settings, the deletion backlog and every
//! generated artifact on disk. It reads the registry through the inventory
//! store's snapshot and never mutates it.
//!
//! ## Module Structure
//!
//! - `actor` - ResponderActor (backlog, publish pipeline)
//! - `handle` - ResponderHandle (cheap-to-clone interface for sending commands)
//! - `command` - ResponderCommand enum and the publish report

mod actor;
mod command;
mod handle;

pub use actor::ResponderActor;
pub use command::{PublishReport, ResponderCommand};
pub use handle::ResponderHandle;
