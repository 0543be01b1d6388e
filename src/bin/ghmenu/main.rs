use std::process::ExitCode;

use ghmenu::{
    CommandPicker, GitHub, Pipeline, RepoCache, SystemLauncher, Termination, TokenSource,
    github::token_from_env, parse_args,
};

fn handle_clap_help_version(clap_err: &clap::Error) -> ExitCode {
    use clap::error::ErrorKind;
    match clap_err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            print!("{clap_err}");
            ExitCode::SUCCESS
        }
        _ => {
            eprint!("{clap_err}");
            ExitCode::from(2)
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();

    let (mode, settings) = match parse_args(std::env::args_os()) {
        Ok(result) => result,
        Err(err) => {
            if let Some(clap_err) = err.downcast_ref::<clap::Error>() {
                return handle_clap_help_version(clap_err);
            }
            eprintln!("Error: {err:#}");
            return ExitCode::from(2);
        }
    };

    let github = GitHub::new(TokenSource::new(
        token_from_env(),
        settings.secret_command.clone(),
    ))
    .with_api_url(settings.api_url.clone())
    .with_max_pages(settings.max_pages);
    let picker = CommandPicker::new(settings.picker.clone());
    let launcher = SystemLauncher::new(settings.opener.clone(), settings.notifier.clone());
    let cache = settings.cache_path.clone().map(RepoCache::new);

    let pipeline = Pipeline {
        forge: &github,
        picker: &picker,
        launcher: &launcher,
        cache: cache.as_ref(),
        refresh: settings.refresh,
    };

    match pipeline.execute(&mode).await {
        Termination::Failed(_) => ExitCode::FAILURE,
        Termination::Done(_) | Termination::Declined => ExitCode::SUCCESS,
    }
}
