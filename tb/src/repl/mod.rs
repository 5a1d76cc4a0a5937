//! Interactive briefing loop
//!
//! Wires the briefer to a terminal session: read a multiline request, run
//! a briefing pass, then offer refinement or saving.

mod session;

pub use session::BriefSession;

use eyre::Result;

use crate::brief::Briefer;
use crate::config::Config;

/// Run the interactive session
///
/// This is the main entry point for `tb` with no subcommand.
pub async fn run_interactive(config: &Config) -> Result<()> {
    let briefer = Briefer::from_config(config)?;
    let mut session = BriefSession::new(briefer, config);
    session.run().await
}
