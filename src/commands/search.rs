use super::Host;
use super::common::{Common, CommonArgs};
use super::console::generate_suggestions;
use crate::Result;
use clap::Parser;
use ohno::IntoAppError;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Partial package name to search for
    #[arg(value_name = "QUERY")]
    pub query: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// List packages whose names match a partial query.
pub async fn search_packages<H: Host>(host: &mut H, args: &SearchArgs) -> Result<()> {
    let common = Common::new(&args.common)?;
    let suggestions = common.collector.suggestions(&args.query).await?;

    if common.json {
        let json = serde_json::to_string_pretty(&suggestions).into_app_err("serializing suggestions")?;
        writeln!(host.output(), "{json}").into_app_err("writing suggestions")?;
    } else {
        let mut text = String::new();
        generate_suggestions(&suggestions, common.use_colors, &mut text)?;
        write!(host.output(), "{text}").into_app_err("writing suggestions")?;
    }

    Ok(())
}
