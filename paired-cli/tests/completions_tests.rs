// ABOUTME: Tests for shell completion generation functionality
// ABOUTME: Ensures completions for the paired command work for all supported shells

use paired_cli::completions::{write_completions, Shell};

fn completions_for(shell: Shell) -> String {
    let mut output = Vec::new();
    write_completions(shell, &mut output).expect("Should generate completions");
    String::from_utf8(output).expect("Should be valid UTF-8")
}

#[test]
fn test_bash_completion_generation() {
    let output = completions_for(Shell::Bash);
    assert!(output.contains("_paired"));
    assert!(output.contains("COMPREPLY"));
    assert!(output.contains("fetch"));
    assert!(output.contains("compare"));
}

#[test]
fn test_zsh_completion_generation() {
    let output = completions_for(Shell::Zsh);
    assert!(output.contains("#compdef paired"));
    assert!(output.contains("--strategy"));
}

#[test]
fn test_fish_completion_generation() {
    let output = completions_for(Shell::Fish);
    assert!(output.contains("complete -c paired"));
}

#[test]
fn test_powershell_completion_generation() {
    let output = completions_for(Shell::PowerShell);
    assert!(output.contains("Register-ArgumentCompleter"));
}

#[test]
fn test_every_shell_mentions_global_flags() {
    for shell in Shell::all() {
        let output = completions_for(shell);
        assert!(output.contains("no-color"), "{shell} completions lack --no-color");
    }
}
