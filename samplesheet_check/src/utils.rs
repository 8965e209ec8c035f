use itertools::Itertools;

/// Convert an io::error to a string and strip "(os error 2)" from the end.
fn io_error_to_string(err: &std::io::Error) -> String {
    let s = err.to_string();
    s.strip_suffix(&format!(" (os error {})", err.raw_os_error().unwrap_or(0)))
        .unwrap_or(&s)
        .to_string()
}

/// Format an error chain, one cause per line.
pub fn format_error_chain(err: &anyhow::Error) -> String {
    err.chain()
        .map(|cause| match cause.downcast_ref::<std::io::Error>() {
            Some(io_err) => io_error_to_string(io_err),
            None => cause.to_string(),
        })
        .join("\n\tCaused by: ")
}

/// Print an error chain to stderr.
pub fn print_error_chain(err: &anyhow::Error) {
    eprintln!("Error: {}", format_error_chain(err));
}
