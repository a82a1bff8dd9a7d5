use colored::Colorize;

/// Progress reporting for multi-step commands.
///
/// All step output goes through here so `--quiet` silences everything
/// except errors, which are printed by `main`.
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    quiet: bool,
}

impl Reporter {
    pub fn new(quiet: bool) -> Self {
        Reporter { quiet }
    }

    /// A completed step: `✓ message` in green.
    pub fn step(&self, message: &str) {
        if !self.quiet {
            println!("{} {message}", "✓".green());
        }
    }

    /// A non-fatal problem: `! message` in yellow.
    pub fn warn(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {message}", "!".yellow());
        }
    }

    /// Plain informational output (next-step hints and the like).
    pub fn note(&self, message: &str) {
        if !self.quiet {
            println!("{message}");
        }
    }
}
