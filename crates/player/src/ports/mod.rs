//! Player port definitions.
//!
//! Ports are the seams between the session store and everything it talks to:
//! the game backend, persistent storage, the clock and the player.

pub mod outbound;
