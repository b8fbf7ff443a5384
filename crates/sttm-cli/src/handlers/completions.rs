//! Shell completions command handler

use crate::cli::{Cli, CompletionsArgs, Shell};
use crate::error::Result;
use clap::CommandFactory;
use std::io::{self, Write};

/// Handle the completions command
pub fn handle_completions(args: CompletionsArgs) -> Result<()> {
    write_completions(args.shell, &mut io::stdout());
    Ok(())
}

fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell.to_clap_shell(), &mut cmd, name, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bash_completions_cover_subcommands() {
        let mut buffer = Vec::new();
        write_completions(Shell::Bash, &mut buffer);

        let script = String::from_utf8(buffer).unwrap();
        assert!(script.contains("sttm"));
        assert!(script.contains("transform"));
        assert!(script.contains("--save-to"));
    }
}
