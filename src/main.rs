// Copyright 2023 Kegan Holtzhausen
// Licensed under the MIT License (https://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed except according to those terms.

use std::io::{self, BufWriter};
use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use log::info;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::Sender;

use crate::args::AppArgs;
use crate::processor::{Processor, RunStats};

mod args;
mod error;
mod observation;
mod processor;
mod report;
mod rollingwindow;

const BUFFER_SIZE: usize = 65536 * 1;

#[cfg(not(test))]
#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {

    // simple logger, diagnostics go to stderr so stdout stays a clean table
    env_logger::Builder::from_env(Env::default().default_filter_or("windowstat=info"))
        .format(|buf, record| {
            use std::io::Write;
            let ts = buf.timestamp_micros();
            writeln!(buf, "{}: {} - {}", ts, record.level(), record.args())
        })
        .init();

    // argparse
    let args = AppArgs::parse();

    match run(args.clone()).await {
        Ok(stats) => {
            if args.strict && stats.rejected > 0 {
                log::error!("{} line(s) rejected in strict mode", stats.rejected);
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: AppArgs) -> Result<RunStats, Box<dyn std::error::Error + Send + Sync>> {
    let mut processor = Processor::new(&args, BufWriter::new(io::stdout()))?;

    // open before anything reaches stdout
    let file = if args.reads_stdin() {
        None
    } else {
        let file = tokio::fs::File::open(&args.file)
            .await
            .map_err(|e| io::Error::new(e.kind(), format!("cannot open {}: {}", args.file, e)))?;
        Some(file)
    };
    info!("Rolling window of {} over {}", args.window, args.file);

    // one consumer owns the window, lines reach it in file order
    let (line_tx, mut line_rx) = tokio::sync::mpsc::channel::<Vec<u8>>(BUFFER_SIZE);

    let window_task = tokio::spawn(async move {
        while let Some(line) = line_rx.recv().await {
            processor.handle_line(&line)?;
        }
        processor.finish()
    });

    // file parser
    let feed_result = match file {
        Some(file) => feed_lines(BufReader::new(file), line_tx).await,
        None => {
            info!("Reading observations from stdin");
            feed_lines(BufReader::new(tokio::io::stdin()), line_tx).await
        }
    };

    log::debug!("Waiting for the window task to finish up...");
    let (stats, _) = window_task.await??;
    feed_result?;
    Ok(stats)
}

// raw segments, so a line that is not UTF-8 is rejected on its own
async fn feed_lines<R: AsyncBufRead + Unpin>(reader: R, tx: Sender<Vec<u8>>) -> io::Result<()> {
    let mut lines = reader.split(b'\n');
    while let Some(line) = lines.next_segment().await? {
        if tx.send(line).await.is_err() {
            log::debug!("Window task stopped, discarding remaining input");
            break;
        }
    }
    Ok(())
}
