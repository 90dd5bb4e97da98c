// Copyright 2023 Kegan Holtzhausen
// Licensed under the MIT License (https://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed except according to those terms.

use std::io::{self, BufRead, Write};

use crate::args::AppArgs;
use crate::error::{LineError, RecordError, WindowError};
use crate::observation::parse_record;
use crate::report::{Report, Row};
use crate::rollingwindow::RollingWindow;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub lines: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub evicted: u64,
}

pub struct Processor<W: Write> {
    window: RollingWindow,
    report: Report<W>,
    line_no: usize, // 1-based number of the last line seen
    accepted: usize,
    rejected: usize,
}

impl<W: Write> Processor<W> {
    pub fn new(args: &AppArgs, out: W) -> Result<Self, WindowError> {
        Ok(Processor {
            window: RollingWindow::new(args.window)?,
            report: Report::new(out, args.format),
            line_no: 0,
            accepted: 0,
            rejected: 0,
        })
    }

    // parse one raw line and feed it to the window, the window is untouched on a rejected line.
    // the outer error is an output failure and ends the run.
    pub fn process_line(&mut self, raw: &[u8]) -> io::Result<Result<(), LineError>> {
        self.line_no += 1;
        let line_no = self.line_no;

        let result = std::str::from_utf8(raw)
            .map_err(|_| RecordError::InvalidUtf8)
            .and_then(parse_record)
            .map_err(|e| LineError::new(line_no, e))
            .and_then(|obs| {
                self.window
                    .put(obs.timestamp, obs.value)
                    .map_err(|e| LineError::new(line_no, e))?;
                Ok(obs)
            });

        match result {
            Ok(obs) => {
                let row = Row::new(obs, self.window.snapshot());
                self.report.write_row(&row)?;
                self.accepted += 1;
                Ok(Ok(()))
            }
            Err(e) => {
                self.rejected += 1;
                Ok(Err(e))
            }
        }
    }

    /// Process one line, logging a rejection and carrying on.
    pub fn handle_line(&mut self, raw: &[u8]) -> io::Result<()> {
        if let Err(e) = self.process_line(raw)? {
            log::error!("{}", e);
        }
        Ok(())
    }

    pub fn process_reader<R: BufRead>(&mut self, reader: R) -> io::Result<()> {
        for line in reader.split(b'\n') {
            self.handle_line(&line?)?;
        }
        Ok(())
    }

    pub fn stats(&self) -> RunStats {
        RunStats {
            lines: self.line_no,
            accepted: self.accepted,
            rejected: self.rejected,
            evicted: self.window.evicted(),
        }
    }

    // flush output and log the run summary
    pub fn finish(mut self) -> io::Result<(RunStats, W)> {
        self.report.finish()?;
        let stats = self.stats();
        log::info!(
            "Processed {} line(s): {} accepted, {} rejected, {} evicted",
            stats.lines,
            stats.accepted,
            stats.rejected,
            stats.evicted
        );
        if !self.window.is_empty() {
            log::info!(
                "Final window: {} observation(s) from {:?} to {:?}, mean {:?}",
                self.window.len(),
                self.window.oldest_timestamp(),
                self.window.latest_timestamp(),
                self.window.mean()
            );
        }
        Ok((stats, self.report.into_inner()))
    }
}
