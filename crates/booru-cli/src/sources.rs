//! Source inspection commands.

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use console::style;
use serde::Serialize;
use std::collections::BTreeMap;

use booru_source::auth::{Auth, AuthField};
use booru_source::{Source, SourceRegistry, TagNameFormat};

use crate::Context;

#[derive(Subcommand, Debug)]
pub enum SourcesCommands {
    /// List every installed source
    List,

    /// Show the compiled definition of a source
    Show(ShowArgs),
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Source directory name
    #[arg(value_name = "SOURCE")]
    pub source: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Serializable view of a loaded source
#[derive(Serialize)]
struct SourceView<'a> {
    disk_name: &'a str,
    name: &'a str,
    error: Option<String>,
    tokens: &'a [String],
    tag_format: &'a TagNameFormat,
    apis: Vec<&'a str>,
    auths: &'a BTreeMap<String, Auth>,
    endpoints: &'a [String],
    supported_endpoints: &'a [String],
}

impl<'a> SourceView<'a> {
    fn new(source: &'a Source) -> Self {
        Self {
            disk_name: source.disk_name(),
            name: source.name(),
            error: source.load_error().map(ToString::to_string),
            tokens: source.additional_tokens(),
            tag_format: source.tag_name_format(),
            apis: source.apis().iter().map(|api| api.name()).collect(),
            auths: source.auths(),
            endpoints: source.endpoints().urls(),
            supported_endpoints: source.supported_endpoints(),
        }
    }
}

pub async fn execute(command: SourcesCommands, ctx: &Context) -> Result<i32> {
    match command {
        SourcesCommands::List => list(ctx).await,
        SourcesCommands::Show(args) => show(args, ctx),
    }
}

async fn list(ctx: &Context) -> Result<i32> {
    let registry = SourceRegistry::load(&ctx.config, &ctx.runtime)
        .await
        .with_context(|| format!("Failed to load sources from {}", ctx.config.sources_dir.display()))?;

    if registry.is_empty() {
        println!("No sources found in {}", ctx.config.sources_dir.display());
        return Ok(0);
    }

    for source in registry.iter() {
        if let Some(err) = source.load_error() {
            println!("{} {}", style(source.disk_name()).red().bold(), style(err).dim());
            continue;
        }

        let auths: Vec<&str> = source.auths().keys().map(String::as_str).collect();
        println!(
            "{} {} ({} APIs, {} endpoints{})",
            style(source.disk_name()).green().bold(),
            source.name(),
            source.apis().len(),
            source.endpoints().len(),
            if auths.is_empty() { String::new() } else { format!(", auth: {}", auths.join(", ")) }
        );
    }

    Ok(0)
}

fn show(args: ShowArgs, ctx: &Context) -> Result<i32> {
    let Some(source) = ctx.load_source(&args.source) else {
        return Ok(1);
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&SourceView::new(&source))?);
        return Ok(0);
    }

    println!("{} {}", style("name").cyan(), source.name());
    println!("{} {}", style("path").cyan(), source.dir().read_root().display());
    if let Some(err) = source.load_error() {
        println!("{} {}", style("error").red(), err);
    }

    let apis: Vec<&str> = source.apis().iter().map(|api| api.name()).collect();
    println!("{} {}", style("apis").cyan(), apis.join(", "));
    if !source.additional_tokens().is_empty() {
        println!("{} {}", style("tokens").cyan(), source.additional_tokens().join(", "));
    }

    let format = source.tag_name_format();
    println!(
        "{} {:?} separated by {:?}",
        style("tag format").cyan(),
        format.case_format,
        format.word_separator
    );

    if !source.auths().is_empty() {
        println!("{}", style("auth").cyan());
        for (id, auth) in source.auths() {
            println!("  {} {}", style(id).bold(), describe_auth(auth));
            for field in auth.fields() {
                println!("    - {}", describe_field(field));
            }
        }
    }

    println!("{}", style("endpoints").cyan());
    for url in source.endpoints().urls() {
        println!("  {}", url);
    }

    Ok(0)
}

fn describe_auth(auth: &Auth) -> String {
    match auth {
        Auth::OAuth2(a) => format!("oauth2 ({}) {}", a.grant, a.token_url),
        Auth::OAuth1(a) => format!("oauth1 {}", a.authorization_url),
        Auth::HttpBasic(a) if a.max_page > 0 => {
            format!("http basic ({}), max page {}", a.password_type, a.max_page)
        }
        Auth::HttpBasic(a) => format!("http basic ({})", a.password_type),
        Auth::Http(a) => {
            let mut out = format!("{} {}", a.method.as_str(), a.url);
            if !a.cookie.is_empty() {
                out.push_str(&format!(", cookie {}", a.cookie));
            }
            if !a.redirect_url.is_empty() {
                out.push_str(&format!(", redirect {}", a.redirect_url));
            }
            if !a.csrf_url.is_empty() {
                out.push_str(&format!(", csrf {} [{}]", a.csrf_url, a.csrf_fields.join(", ")));
            }
            out
        }
        Auth::Url(a) if a.max_page > 0 => format!("url, max page {}", a.max_page),
        Auth::Url(_) => "url".to_string(),
    }
}

fn describe_field(field: &AuthField) -> String {
    match field {
        AuthField::Text(f) if f.is_password => format!("{} (password)", f.key),
        AuthField::Text(f) if f.default.is_empty() => format!("{} (text)", f.key),
        AuthField::Text(f) => format!("{} (text, default {:?})", f.key, f.default),
        AuthField::Const(f) => format!("{} = {:?}", f.key, f.value),
        AuthField::Hash(f) => format!("{} ({} of {:?})", f.key, f.algorithm.as_str(), f.salt),
    }
}
