use console::Term;

pub fn display_error(message: &str) {
    eprintln!("\x1b[31mERROR:\x1b[0m {}", message); // Red color
}

pub fn display_success(message: &str) {
    println!("\x1b[32m✓\x1b[0m {}", message); // Green color
}

pub fn display_status(message: &str) {
    println!("\x1b[33m→\x1b[0m {}", message); // Yellow color
}

/// Prints the consolidated validation failures in one block.
pub fn display_validation_errors(errors: &[String]) {
    eprintln!("\x1b[31mInvalid command line:\x1b[0m");
    for error in errors {
        eprintln!("  {}", error);
    }
}

/// Blocks until the user presses any key.
///
/// Used both after a failed run and, when the do-not-exit flag is set, after
/// a successful one.
pub fn pause_for_keypress() {
    println!("Waiting for key press before exiting...");
    let _ = Term::stdout().read_key();
}
