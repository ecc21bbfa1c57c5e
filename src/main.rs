use anyhow::Context;
use minidb::config::USAGE;
use minidb::logging::Logger;
use minidb::{error, FileStore, Repl, Session, SessionOptions};
use std::io;

fn main() -> anyhow::Result<()> {
    error::setup_panic_handler();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = SessionOptions::parse_args(&args)
        .map_err(|e| anyhow::anyhow!("{}\n\n{}", e, USAGE))?;
    let options = SessionOptions::from_env().merged_with(&cli);

    if options.show_help {
        println!("{}", USAGE);
        return Ok(());
    }

    init_logging(&options)?;

    let root = options
        .resolve_working_directory()
        .context("failed to resolve the working directory")?;
    log::info!("managing files in {}", root.display());

    let session = Session::new(FileStore::new(root)).with_uniform_retry(options.uniform_retry);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut repl = Repl::new(session, stdin.lock(), stdout.lock());
    repl.run().context("terminal I/O failed")?;

    Ok(())
}

fn init_logging(options: &SessionOptions) -> anyhow::Result<()> {
    let mut logger = Logger::new(options.resolve_log_level());
    if let Some(path) = &options.debug_log_path {
        logger = logger
            .with_file_output(path)
            .with_context(|| format!("cannot open debug log {}", path.display()))?;
    }
    logger
        .install()
        .map_err(|e| anyhow::anyhow!("cannot install logger: {}", e))?;
    Ok(())
}
