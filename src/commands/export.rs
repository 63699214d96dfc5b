use crate::{
    libs::{
        export::{ExportData, ExportFormat, Exporter},
        messages::Message,
    },
    msg_info,
};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Which records to export
    #[arg(value_enum, default_value = "all")]
    data: ExportData,

    #[arg(short, long, value_enum, default_value = "csv")]
    format: ExportFormat,

    /// Output file. Defaults to `busbuddy_export_<timestamp>` with the format's extension;
    /// exporting `all` as CSV writes one file per data set next to it.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn cmd(args: ExportArgs) -> Result<()> {
    msg_info!(Message::ExportingData(args.data.name().to_string(), format!("{:?}", args.format)));
    Exporter::new(args.format, args.output)?.export(args.data)?;
    Ok(())
}
