//! Endpoint list commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::style;

use crate::Context;

#[derive(Subcommand, Debug)]
pub enum EndpointsCommands {
    /// List the endpoints of a source
    List(ListArgs),

    /// Add an endpoint to a source
    Add(EditArgs),

    /// Remove an endpoint from a source
    Remove(EditArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Source directory name
    #[arg(value_name = "SOURCE")]
    pub source: String,

    /// Show the endpoints known to work instead
    #[arg(long)]
    pub supported: bool,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Source directory name
    #[arg(value_name = "SOURCE")]
    pub source: String,

    /// Endpoint URL
    #[arg(value_name = "URL")]
    pub url: String,
}

pub fn execute(command: EndpointsCommands, ctx: &Context) -> Result<i32> {
    match command {
        EndpointsCommands::List(args) => list(args, ctx),
        EndpointsCommands::Add(args) => edit(args, ctx, true),
        EndpointsCommands::Remove(args) => edit(args, ctx, false),
    }
}

fn list(args: ListArgs, ctx: &Context) -> Result<i32> {
    let Some(source) = ctx.load_source(&args.source) else {
        return Ok(1);
    };

    let urls = if args.supported {
        source.supported_endpoints()
    } else {
        source.endpoints().urls()
    };
    for url in urls {
        println!("{}", url);
    }
    Ok(0)
}

fn edit(args: EditArgs, ctx: &Context, add: bool) -> Result<i32> {
    let Some(mut source) = ctx.load_source(&args.source) else {
        return Ok(1);
    };

    let result = if add {
        source.add_endpoint(&args.url)
    } else {
        source.remove_endpoint(&args.url)
    };

    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        return Ok(1);
    }

    println!(
        "{} {} {}",
        style(if add { "Added" } else { "Removed" }).green().bold(),
        args.url,
        style(format!("({} endpoints)", source.endpoints().len())).dim()
    );
    Ok(0)
}
