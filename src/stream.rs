//! Reading several mazes from one text stream.
//!
//! Mazes are blocks of lines separated by one or more blank lines. Leading
//! and trailing whitespace on each line is ignored.

use std::{
    io::{self, BufRead, BufReader, Read},
    sync::mpsc::{Receiver, sync_channel},
    thread::JoinHandle,
};

use thiserror::Error;

use crate::maze::{Maze, ParseMazeError};

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("failed to read mazes: {0}")]
    Io(#[from] io::Error),
    #[error("maze #{index} is malformed: {source}")]
    Parse {
        /// Zero-based position of the block in the stream.
        index: usize,
        source: ParseMazeError,
    },
}

/// Iterates over the mazes of a buffered stream, one block at a time.
///
/// A malformed block is reported and skipped; an I/O error ends the
/// iteration.
pub struct MazeReader<R> {
    reader: R,
    index: usize,
    finished: bool,
}

impl<R: BufRead> MazeReader<R> {
    pub fn new(reader: R) -> Self {
        MazeReader {
            reader,
            index: 0,
            finished: false,
        }
    }

    /// Collects the lines of the next block, or `None` at end of input.
    fn next_block(&mut self) -> io::Result<Option<String>> {
        let mut block = String::new();
        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok((!block.is_empty()).then_some(block));
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                if !block.is_empty() {
                    return Ok(Some(block));
                }
                continue;
            }
            if !block.is_empty() {
                block.push('\n');
            }
            block.push_str(trimmed);
        }
    }
}

impl<R: BufRead> Iterator for MazeReader<R> {
    type Item = Result<Maze, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let block = match self.next_block() {
            Ok(Some(block)) => block,
            Ok(None) => {
                self.finished = true;
                return None;
            }
            Err(e) => {
                self.finished = true;
                return Some(Err(e.into()));
            }
        };
        let index = self.index;
        self.index += 1;
        Some(Maze::parse(&block).map_err(|source| {
            tracing::warn!("[stream] rejected maze #{}: {}", index, source);
            StreamError::Parse { index, source }
        }))
    }
}

/// Parses every maze in an in-memory string.
pub fn parse_mazes(text: &str) -> Result<Vec<Maze>, StreamError> {
    MazeReader::new(text.as_bytes()).collect()
}

/// Reads mazes on a worker thread and hands them over through a channel
/// holding at most `capacity` pending results.
///
/// The worker stops once the stream is exhausted or the receiver is dropped.
pub fn spawn_reader<R>(reader: R, capacity: usize) -> (Receiver<Result<Maze, StreamError>>, JoinHandle<()>)
where
    R: Read + Send + 'static,
{
    let (tx, rx) = sync_channel(capacity);
    let handle = std::thread::spawn(move || {
        let mut count = 0usize;
        for item in MazeReader::new(BufReader::new(reader)) {
            if tx.send(item).is_err() {
                tracing::debug!("[stream] receiver dropped after {} mazes", count);
                return;
            }
            count += 1;
        }
        tracing::debug!("[stream] finished reading {} mazes", count);
    });
    (rx, handle)
}
