use std::process;

/// Ends the process with a message on the console when a startup setting is unusable.
pub trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self, msg: &str) -> T;
}

impl<T, E: std::fmt::Display> UnwrapOrExit<T> for Result<T, E> {
    fn unwrap_or_exit(self, msg: &str) -> T {
        self.unwrap_or_else(|e| {
            eprintln!("Error: {}: {}", msg, e);
            process::exit(1)
        })
    }
}
