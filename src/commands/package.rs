use super::Host;
use super::common::{Common, CommonArgs};
use super::console::generate_report;
use crate::Result;
use chrono::Utc;
use clap::Parser;
use ohno::IntoAppError;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct PackageArgs {
    /// Name of the npm package (e.g. `react` or `@babel/core`)
    #[arg(value_name = "PACKAGE")]
    pub name: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Report accessibility-related issues for one package.
///
/// Exits with status 1 when the package is unknown to the registry.
pub async fn process_package<H: Host>(host: &mut H, args: &PackageArgs) -> Result<()> {
    let common = Common::new(&args.common)?;

    let Some(report) = common.collector.collect(&args.name, Utc::now()).await? else {
        let _ = writeln!(host.error(), "Package '{}' was not found", args.name);
        host.exit(1);
        return Ok(());
    };

    if common.json {
        let json = serde_json::to_string_pretty(&report).into_app_err("serializing report")?;
        writeln!(host.output(), "{json}").into_app_err("writing report")?;
    } else {
        let mut text = String::new();
        generate_report(&report, common.use_colors, &mut text)?;
        write!(host.output(), "{text}").into_app_err("writing report")?;
    }

    Ok(())
}
