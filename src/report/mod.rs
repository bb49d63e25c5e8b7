/*!
 * Leak Reporting
 *
 * Every entry still in the ledger at a checkpoint is a suspected leak. The
 * reporter only reads; whether a non-empty report is fatal is the caller's
 * decision (see `LeakReporter::check`).
 */

mod reporter;
mod types;

pub use reporter::LeakReporter;
pub use types::{LeakError, LeakRecord, LeakReport};
