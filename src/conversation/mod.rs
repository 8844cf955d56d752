//! Client-side conversation state machine.
//!
//! [`transition`] is pure: it mutates a [`ConversationState`] and returns the
//! [`Effect`]s to perform. [`ChatSession`] performs them and feeds the
//! outcome back in as the next [`Event`].

mod session;
mod state;
mod transition;

pub use session::ChatSession;
pub use state::{ ConversationState, Phase };
pub use transition::{ timestamp, transition, Effect, Event, FALLBACK_REPLY };
