// NOTE: runstream Architecture Rationale
//
// Why replay recordings (not attach to a live stream)?
// - A JSONL recording is the smallest thing that reproduces a viewer bug
// - The reducer is pure, so replaying gives the exact snapshot a live viewer had
// - Trade-off: no tailing; re-run the command on a growing file instead
//
// Why never fail on a bad record?
// - Producers ship ahead of consumers; an unknown type must still be visible
// - Corrupt lines become raw lines in place, keeping the order of everything else
// - Only the recording itself being unreadable is an error

mod args;
mod commands;
pub mod config;
mod handlers;
mod logging;
pub mod output;
pub mod types;

pub use args::{Cli, Commands};
pub use commands::run;
