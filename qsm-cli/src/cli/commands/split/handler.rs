use anyhow::Result;
use colored::*;

use super::SplitCommands;
use crate::services::mapping::NameEmailSplitter;

pub fn handle_split_command(args: SplitCommands) -> Result<()> {
    let splitter = NameEmailSplitter::new();

    for text in &args.text {
        let (rule, pair) = splitter.split_explained(Some(text));
        println!("{:?}", text);
        println!("  rule:  {}", rule.to_string().cyan());
        println!("  name:  {:?}", pair.name);
        println!("  email: {:?}", pair.email);
    }

    Ok(())
}
