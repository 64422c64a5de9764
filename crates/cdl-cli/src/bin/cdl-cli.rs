//! CDL CLI binary entry point.

use cdl_cli::{Cli, Commands, ExportFormat};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { cdl } => cdl_cli::commands::validate::execute(&cdl),
        Commands::Render {
            cdl,
            elev,
            azim,
            width,
            height,
            output,
        } => cdl_cli::commands::render::execute(&cdl, elev, azim, width, height, output),
        Commands::Export { format } => match format {
            ExportFormat::Stl { cdl, scale, output } => {
                cdl_cli::commands::export::stl(&cdl, scale, output)
            }
            ExportFormat::Gltf { cdl, scale, output } => {
                cdl_cli::commands::export::gltf(&cdl, scale, output)
            }
        },
        Commands::Version => {
            cdl_cli::commands::version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        cdl_cli::output::print_error(&e.to_string());
        std::process::exit(1);
    }
    Ok(())
}
