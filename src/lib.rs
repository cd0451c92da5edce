//! Assembles a web response from independently processable content units
//! ("fragments"). Each fragment is driven through a compiled graph of
//! processing nodes that may fan out into parallel branches and fan back in;
//! the engines walk those graphs concurrently and hand back one result per
//! fragment, in the caller's original order.

pub mod api;
pub mod engine;
pub mod graph;
