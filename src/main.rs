//! CLI entry point for modulus sweeps

use clap::Parser;
use pascal_ifs::experiment::ExperimentDriver;
use pascal_ifs::io::cli::Cli;
use pascal_ifs::io::logging::init_logging;
use pascal_ifs::io::progress::ProgressManager;

fn main() -> pascal_ifs::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut driver = ExperimentDriver::new(cli.to_config()?)?;
    if cli.should_show_progress() {
        driver = driver.with_progress(ProgressManager::new());
    }
    let report = driver.run()?;

    // The report table is the program's output
    #[allow(clippy::print_stdout)]
    {
        print!("{report}");
    }
    Ok(())
}
