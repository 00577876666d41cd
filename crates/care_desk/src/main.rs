mod cli;
mod commands;
mod config;
mod errors;
mod store;

use std::process::ExitCode;

use app::{AppBuilder, Application};
use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use paths::PathContext;

use crate::cli::{Cli, Cmd};
use crate::commands::SubmitRequest;
use crate::config::DeskConfig;

struct CareDesk;

impl Application for CareDesk {
    const APP_ID: &'static str = "care_desk";
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    errors::init()?;
    let args = Cli::parse();

    let builder = match &args.data_dir {
        Some(dir) => AppBuilder::<CareDesk>::with_paths(
            PathContext::with_base_path(dir.clone(), CareDesk::FACILITY, CareDesk::APP_ID),
            env!("CARGO_PKG_VERSION"),
        ),
        None => AppBuilder::<CareDesk>::new(env!("CARGO_PKG_VERSION")),
    };
    let ctx = builder.map_err(|err| eyre!(err))?.build();

    let config = DeskConfig::load(&ctx.path_context().config_dir(), args.config.as_deref())
        .wrap_err("could not load the configuration")?;

    let ok = match args.cmd {
        Cmd::Forms => commands::forms(args.json)?,
        Cmd::Validate { form, file, today } => commands::validate(form, &file, today, args.json)?,
        Cmd::Submit {
            form,
            file,
            draft,
            edit,
            sets,
            simulate,
            today,
        } => {
            let request = SubmitRequest {
                record: commands::read_record(&file)?,
                draft,
                edit,
                sets,
                failure: simulate,
                today,
            };
            commands::submit(form, request, &config, args.json).await?
        }
        Cmd::Status { file, at } => commands::status(&file, at, args.json)?,
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
