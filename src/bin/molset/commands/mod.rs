mod combine;
mod dedup;

use combine::run_combine;
use dedup::run_dedup;

use anyhow::Result;

use crate::cli::Command;
use crate::display::Context;

pub fn dispatch(command: Command, ctx: Context) -> Result<()> {
    match command {
        Command::Dedup(args) => run_dedup(args, ctx),
        Command::Combine(args) => run_combine(args, ctx),
    }
}
