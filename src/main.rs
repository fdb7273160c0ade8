use std::path::PathBuf;

use anyhow::{bail, Context as _};
use clap::{command, Arg, ArgMatches, Command};
use context::Context;
use generator::generate;

mod context;
mod error;
mod generator;
mod renderer;

fn path_arg(name: &'static str, help: &'static str, default: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help)
        .value_parser(clap::value_parser!(PathBuf))
        .default_value(default)
}

fn cli() -> Command {
    command!().args([
        path_arg("notes-dir", "Directory of markdown notes", "notes"),
        path_arg(
            "out-dir",
            "Directory of output. Existing pages are overwritten.",
            "docs",
        ),
        path_arg(
            "template-dir",
            "Directory holding post.html and index.html",
            "templates",
        ),
        path_arg(
            "css-dir",
            "Directory of stylesheets, copied into <out-dir>/css",
            "css",
        ),
        Arg::new("site-title")
            .long("site-title")
            .help("Title of the index page")
            .default_value(context::DEFAULT_SITE_TITLE),
    ])
}

fn context_from(matches: &ArgMatches) -> anyhow::Result<Context> {
    let path = |name: &str| -> anyhow::Result<PathBuf> {
        matches
            .get_one::<PathBuf>(name)
            .cloned()
            .with_context(|| format!("missing {name}"))
    };

    let site_title = matches
        .get_one::<String>("site-title")
        .cloned()
        .unwrap_or_else(|| context::DEFAULT_SITE_TITLE.to_string());

    Ok(Context {
        notes_dir: path("notes-dir")?,
        out_dir: path("out-dir")?,
        template_dir: path("template-dir")?,
        css_dir: path("css-dir")?,
        site_title,
        ..Context::default()
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let ctx = context_from(&cli().get_matches())?;
    if ctx.out_dir.exists() && !ctx.out_dir.is_dir() {
        bail!("if out-dir exists, it must be a directory.");
    }

    let summary = generate(&ctx).context("while generating site")?;

    println!();
    println!("{summary}");

    Ok(())
}
