// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::rt::System;
use actix_web::{App, HttpServer, middleware::Logger, web};
use flatcms::app_state::AppState;
use flatcms::bootstrap;
use flatcms::config::ValidatedConfig;
use flatcms::runtime_paths::RuntimePaths;
use flatcms::session::SessionMiddlewareFactory;
use flatcms::{editor, login, public, util};
use log::info;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

const HELP_TEXT: &str = "\
Usage: flatcms [-C <root>] [-h|--help]

Serves the documents under <root>/data and the images under <root>/images.

Options:
  -C <root>    Runtime directory (default: current directory)
  -h, --help   Show this help
";

fn main() {
    let exit_code = run();
    std::process::exit(exit_code);
}

fn run() -> i32 {
    let parsed_args = match parse_args() {
        Ok(args) => args,
        Err(error) => {
            eprintln!("❌ Invalid command line arguments: {}", error);
            eprintln!("❌ Use -C <root> to set the runtime directory.");
            return 1;
        }
    };

    if parsed_args.help {
        print!("{}", HELP_TEXT);
        return 0;
    }

    let bootstrap = match bootstrap::bootstrap_runtime(&parsed_args.runtime_root) {
        Ok(result) => result,
        Err(error) => {
            eprintln!("❌ Bootstrap error: {}", error);
            eprintln!("❌ Application cannot start with invalid configuration.");
            return 1;
        }
    };

    match System::new().block_on(run_server(bootstrap)) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("❌ Server failed to start: {}", error);
            1
        }
    }
}

async fn run_server(bootstrap: bootstrap::BootstrapResult) -> std::io::Result<()> {
    let validated_config = Arc::new(bootstrap.validated_config);
    let runtime_paths = bootstrap.runtime_paths;

    let logger = env_logger::Builder::from_default_env()
        .filter_level(validated_config.log_level_filter())
        .target(env_logger::Target::Stdout)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f UTC"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .build();

    util::init_logger(util::default_rules(), logger).map_err(|error| {
        eprintln!("❌ Failed to initialize logger: {}", error);
        std::io::Error::other(error.to_string())
    })?;

    log_startup_info(&validated_config, &runtime_paths);

    let app_state = Arc::new(AppState::new(&validated_config, runtime_paths));
    info!(
        "✅ App state initialized with app name: {}",
        validated_config.app.name
    );

    let documents = app_state.documents.list().await.map_err(|error| {
        eprintln!("❌ Failed to read the data directory: {}", error);
        std::io::Error::other(error.to_string())
    })?;
    info!("✅ Found {} documents", documents.len());

    let workers = validated_config.server.workers;
    let factory = {
        let validated_config = validated_config.clone();
        let app_state = app_state.clone();

        move || {
            let session_middleware = SessionMiddlewareFactory::new(
                app_state.sessions.clone(),
                &validated_config.session,
            );

            App::new()
                .app_data(web::Data::from(validated_config.clone()))
                .app_data(web::Data::from(app_state.clone()))
                .wrap(session_middleware)
                .wrap(Logger::new(
                    r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T"#,
                ))
                .configure(login::configure)
                .configure(editor::configure)
                .configure(public::configure)
                .default_service(web::to(public::handlers::not_found))
        }
    };

    HttpServer::new(factory)
        .workers(workers)
        .bind(validated_config.server.address_tuple())?
        .run()
        .await
}

fn log_startup_info(config: &ValidatedConfig, runtime_paths: &RuntimePaths) {
    info!("Starting {} - {}", config.app.name, config.app.description);
    info!("Workers: {}", config.server.workers);
    info!(
        "Listening on http://{}:{}",
        config.server.host, config.server.port
    );
    info!(
        "Data directory (canonical): {}",
        runtime_paths.data_dir.display()
    );
    info!(
        "Images directory (canonical): {}",
        runtime_paths.images_dir.display()
    );
    info!("Config file: {}", runtime_paths.config_file.display());
    info!("Users file: {}", runtime_paths.users_file.display());
    info!("Runtime root: {}", runtime_paths.root.display());

    if let Ok(current_dir) = std::env::current_dir() {
        info!("Working directory: {}", current_dir.display());
    }
}

struct ParsedArgs {
    runtime_root: PathBuf,
    help: bool,
}

fn parse_args() -> Result<ParsedArgs, String> {
    parse_args_from(std::env::args().skip(1))
}

fn parse_args_from<I>(args: I) -> Result<ParsedArgs, String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut runtime_root = PathBuf::from(".");

    while let Some(arg) = args.next() {
        if arg == "-h" || arg == "--help" {
            return Ok(ParsedArgs {
                runtime_root: PathBuf::from("."),
                help: true,
            });
        } else if arg == "--" {
            continue;
        } else if arg == "-C" {
            let value = args
                .next()
                .ok_or_else(|| "Missing value for -C".to_string())?;
            runtime_root = PathBuf::from(value);
        } else {
            return Err(format!("Unexpected argument: {}", arg));
        }
    }

    Ok(ParsedArgs {
        runtime_root: make_runtime_root_absolute(runtime_root)?,
        help: false,
    })
}

fn make_runtime_root_absolute(runtime_root: PathBuf) -> Result<PathBuf, String> {
    if runtime_root.is_absolute() {
        return Ok(runtime_root);
    }

    let current_dir = std::env::current_dir()
        .map_err(|error| format!("Failed to resolve current directory: {}", error))?;
    Ok(current_dir.join(runtime_root))
}
