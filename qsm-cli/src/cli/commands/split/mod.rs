mod handler;

pub use handler::handle_split_command;

use clap::Args;

#[derive(Debug, Args)]
pub struct SplitCommands {
    /// Combined "name and/or email" text; several values are split one by one
    #[arg(required = true)]
    pub text: Vec<String>,
}
