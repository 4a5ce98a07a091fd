mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use pagesplit::pdf::Watermark;
use pagesplit::{commands, mcp};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so the MCP transport on stdout stays clean.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Mcp => {
            mcp::run_server().await?;
        }
        Commands::Plan {
            path,
            pages,
            json,
            range,
        } => {
            commands::plan::run(&path, pages.as_deref(), range.backward_spans, json)?;
        }
        Commands::Split {
            path,
            pages,
            output_dir,
            zip,
            range,
        } => {
            commands::split::run(
                &path,
                pages.as_deref(),
                range.backward_spans,
                &output_dir,
                zip,
            )?;
        }
        Commands::Extract {
            path,
            pages,
            output,
            range,
        } => {
            commands::extract::run(&path, &pages, range.backward_spans, &output)?;
        }
        Commands::Merge { inputs, output } => {
            commands::merge::run(&inputs, &output)?;
        }
        Commands::Rotate {
            path,
            degrees,
            pages,
            output,
            range,
        } => {
            commands::rotate::run(
                &path,
                degrees,
                pages.as_deref(),
                range.backward_spans,
                &output,
            )?;
        }
        Commands::Watermark {
            path,
            text,
            size,
            opacity,
            rotation,
            color,
            pages,
            output,
            range,
        } => {
            let mark = Watermark {
                text,
                font_size: size,
                opacity,
                rotation,
                color,
            };
            commands::watermark::run(
                &path,
                &mark,
                pages.as_deref(),
                range.backward_spans,
                output.as_deref(),
            )?;
        }
        Commands::Images { inputs, output } => {
            commands::images::run(&inputs, &output)?;
        }
    }

    Ok(())
}
