// ABOUTME: Shell completion generation using clap_complete for all supported shells
// ABOUTME: Provides static completions for bash, zsh, fish, and powershell

use anyhow::Result;
use clap::{CommandFactory, ValueEnum};
use clap_complete::{generate, shells};
use std::fmt;
use std::io::Write;

use crate::cli::Cli;

const BIN_NAME: &str = "paired";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[allow(clippy::enum_variant_names)]
    #[value(name = "powershell", alias = "pwsh")]
    PowerShell,
}

impl Shell {
    pub fn all() -> [Shell; 4] {
        [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell]
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shell_str = match self {
            Shell::Bash => "bash",
            Shell::Zsh => "zsh",
            Shell::Fish => "fish",
            Shell::PowerShell => "powershell",
        };
        write!(f, "{}", shell_str)
    }
}

/// Write the completion script for the `paired` command to `writer`
pub fn write_completions<W: Write>(shell: Shell, writer: &mut W) -> Result<()> {
    let mut cmd = Cli::command();
    match shell {
        Shell::Bash => generate(shells::Bash, &mut cmd, BIN_NAME, writer),
        Shell::Zsh => generate(shells::Zsh, &mut cmd, BIN_NAME, writer),
        Shell::Fish => generate(shells::Fish, &mut cmd, BIN_NAME, writer),
        Shell::PowerShell => generate(shells::PowerShell, &mut cmd, BIN_NAME, writer),
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_parsing() {
        assert_eq!(Shell::from_str("bash", true).unwrap(), Shell::Bash);
        assert_eq!(Shell::from_str("ZSH", true).unwrap(), Shell::Zsh);
        assert_eq!(Shell::from_str("fish", true).unwrap(), Shell::Fish);
        assert_eq!(
            Shell::from_str("powershell", true).unwrap(),
            Shell::PowerShell
        );
        assert_eq!(Shell::from_str("pwsh", true).unwrap(), Shell::PowerShell);

        assert!(Shell::from_str("invalid", true).is_err());
    }

    #[test]
    fn test_shell_display_matches_value_names() {
        for shell in Shell::all() {
            assert_eq!(Shell::from_str(&shell.to_string(), false).unwrap(), shell);
        }
    }
}
