// NOTE: Normalization Rationale
//
// Why an alias table (not string matching in each formatter)?
// - Producers renamed event types across schema versions
//   (build.phase.start -> build.phase.started, engine.complete -> run.completed)
// - One table lookup resolves every spelling to a CanonicalOp
// - Adding a new alias is a one-line edit; formatters only ever see CanonicalOp
//
// Why typed payloads with all-optional fields?
// - Payloads are loosely typed and frequently partial
// - Lifting never fails: a wrong-typed field reads as absent
// - The formatter gets exhaustive matching over EventPayload instead of
//   probing raw JSON everywhere

pub mod aliases;
pub mod classify;
pub mod error;
pub mod fields;
pub mod io;
pub mod payload;

pub use aliases::{CanonicalOp, all_aliases, resolve_alias};
pub use classify::{NormalizedEvent, StreamContext, normalize};
pub use error::{Error, Result};
pub use fields::FieldExt;
pub use io::{parse_record, read_envelopes, read_envelopes_from_str};
pub use payload::*;
