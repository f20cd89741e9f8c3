//! Shell completion generation command.
//!
//! This module provides the `completions` command which generates shell completion
//! scripts for the shells clap_complete supports.

use crate::cli::Cli;
use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use std::io;

/// Name of the installed binary
const BIN_NAME: &str = "parking";

/// Generate shell completion scripts
#[derive(Parser)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsCommand {
    /// Execute the completions command.
    pub fn execute(&self, global: &GlobalOptions) -> Result<(), CliError> {
        if !global.quiet {
            print_install_hint(self.shell);
        }
        generate(self.shell, &mut Cli::command(), BIN_NAME, &mut io::stdout());
        Ok(())
    }
}

/// Print where to put the generated script, to stderr.
fn print_install_hint(shell: Shell) {
    eprintln!("# {shell} completion script for {BIN_NAME}");
    match shell {
        Shell::Bash => {
            eprintln!("#   parking completions bash > ~/.local/share/bash-completion/completions/parking");
            eprintln!("# or add to ~/.bashrc:");
            eprintln!("#   eval \"$(parking completions bash)\"");
        }
        Shell::Zsh => {
            eprintln!("#   parking completions zsh > ~/.zsh/completions/_parking");
            eprintln!("# with ~/.zsh/completions in your $fpath");
        }
        Shell::Fish => {
            eprintln!("#   parking completions fish > ~/.config/fish/completions/parking.fish");
        }
        Shell::PowerShell => {
            eprintln!("#   parking completions powershell | Out-String | Invoke-Expression");
        }
        _ => {}
    }
    eprintln!();
}
