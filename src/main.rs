use std::{
    fs,
    future::IntoFuture,
    io::{self, Write},
    path::Path,
    process,
    sync::Arc,
    time::Duration,
};

use md2html::{
    application::{
        convert,
        error::AppError,
        render::{RenderRequest, RenderService, render_service},
    },
    config,
    infra::{
        error::InfraError,
        http::{self, FunctionState},
        telemetry,
    },
};
use md2html_api_types::ConvertResponse;
use tokio::{signal, sync::Notify};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Render(args) => run_render(args),
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let registry = http::default_registry()
        .map_err(|err| InfraError::configuration(err.to_string()))?;
    let entry = registry
        .resolve(&settings.function.target)
        .map_err(|err| InfraError::configuration(err.to_string()))?;

    let state = FunctionState::new(render_service());
    let body_limit = usize::try_from(settings.server.max_body_bytes.get()).unwrap_or(usize::MAX);
    let app = http::build_app(entry(&state), body_limit);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(InfraError::from)?;

    info!(
        target = "md2html::serve",
        addr = %settings.server.addr,
        function = %settings.function.target,
        "function listening"
    );

    serve_until_shutdown(listener, app, settings.server.graceful_shutdown).await
}

/// Serve until SIGINT/SIGTERM, then drain in-flight requests for at most
/// `grace`.
async fn serve_until_shutdown(
    listener: tokio::net::TcpListener,
    app: axum::Router,
    grace: Duration,
) -> Result<(), AppError> {
    let shutdown = Arc::new(Notify::new());
    let server = axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown({
            let shutdown = Arc::clone(&shutdown);
            async move { shutdown.notified().await }
        })
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => {
            return result.map_err(|err| AppError::unexpected(format!("server error: {err}")));
        }
        _ = shutdown_signal() => {
            info!(target = "md2html::serve", grace_secs = grace.as_secs(), "shutting down");
            shutdown.notify_one();
        }
    }

    match tokio::time::timeout(grace, server).await {
        Ok(result) => result.map_err(|err| AppError::unexpected(format!("server error: {err}"))),
        Err(_) => {
            warn!(
                target = "md2html::serve",
                "graceful shutdown timed out; dropping open connections"
            );
            Ok(())
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

fn run_render(args: config::RenderArgs) -> Result<(), AppError> {
    let markdown = match args.input.as_deref() {
        Some(path) if path != Path::new("-") => fs::read_to_string(path).map_err(InfraError::from)?,
        _ => io::read_to_string(io::stdin()).map_err(InfraError::from)?,
    };

    let renderer = render_service();
    let output = renderer.render(&RenderRequest::new(markdown))?;

    let rendered = if args.json {
        let mut body = convert::encode_response(&ConvertResponse::new(output.html))?;
        body.push('\n');
        body
    } else {
        output.html
    };

    io::stdout()
        .lock()
        .write_all(rendered.as_bytes())
        .map_err(InfraError::from)?;
    Ok(())
}
