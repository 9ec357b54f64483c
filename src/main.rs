use album_uploader::utils::log_utils::init_logging;
use album_uploader::{args, run_app};

fn main() {
    // Parse and validate command-line arguments
    let args = args::args_checks();
    init_logging(args.verbose);

    if let Err(e) = run_app(&args) {
        tracing::error!(error = %e, "upload aborted");
        eprintln!("{e}");
        std::process::exit(1);
    }
}
