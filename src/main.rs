#![deny(clippy::unwrap_used, clippy::expect_used)]

use pdfspool::{
    arguments::{self, ArgumentError},
    configuration::SpoolerConfiguration,
    dialog::TerminalConfirmation,
    dispatch::{self, DispatchOutcome},
    document::PdfSource,
    error::ContextError,
    rasterizer::Ghostscript,
    spooler::CupsPrintSystem,
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let request = match arguments::parse_arguments(std::env::args().skip(1)) {
        Ok(request) => request,
        Err(error) => exit_with_argument_error(error),
    };
    log::debug!("{:?}", request);

    if let Err(error) = fallible_main(&request) {
        log::error!("{}", error);
        std::process::exit(1);
    }
}

fn fallible_main(request: &arguments::PrintRequest) -> Result<(), ContextError> {
    let configuration = SpoolerConfiguration::from_environment()?;
    let document_source = PdfSource::new(Ghostscript::new(
        configuration.ghostscript_program.clone(),
    ));
    let print_system = CupsPrintSystem::new(&configuration);

    match dispatch::dispatch(
        request,
        &document_source,
        &print_system,
        &mut TerminalConfirmation::stdio(),
    )? {
        DispatchOutcome::Printed => log::info!("Printed {:?}", request.file_path),
        DispatchOutcome::Cancelled => log::info!("Nothing was printed"),
    }

    Ok(())
}

fn exit_with_argument_error(error: ArgumentError) -> ! {
    if error.is_usage_error() {
        log::debug!("{}", error);
        eprintln!("{}", arguments::USAGE);
    } else {
        log::debug!("{:?}", error);
        eprintln!("{}", error);
    }
    std::process::exit(1);
}
