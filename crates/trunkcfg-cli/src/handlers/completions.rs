//! Shell completions command handler

use crate::cli::{Cli, CompletionsArgs};
use crate::error::Result;
use clap::CommandFactory;
use std::io::Write;

/// Handle the completions command, writing the script to `out`
pub fn handle_completions(args: CompletionsArgs, out: &mut dyn Write) -> Result<()> {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    clap_complete::generate(args.shell.to_clap_shell(), &mut cmd, bin_name, out);
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Shell;

    #[test]
    fn test_bash_script_mentions_subcommands() {
        let mut script = Vec::new();
        handle_completions(CompletionsArgs { shell: Shell::Bash }, &mut script).unwrap();

        let script = String::from_utf8(script).unwrap();
        assert!(script.contains("trunkcfg"));
        assert!(script.contains("validate"));
        assert!(script.contains("import"));
    }
}
