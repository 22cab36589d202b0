#![allow(dead_code)]

use secure_layout::{LineEnding, LogEvent, RecordReader, SecureLayout};
use std::{
    io::Write,
    sync::{Arc, Mutex},
};

const CTRL_INDEX: &str = "CTRL_INDEX";

// launch child process from same executable and sets there an additional environment variable
// or finds this environment variable and returns its value
pub fn dispatch(count: u8) -> Option<u8> {
    match std::env::var(CTRL_INDEX) {
        Err(_) => {
            println!("dispatcher");
            let progname = std::env::args().next().unwrap();
            let nocapture = std::env::args().any(|a| a == "--nocapture");
            for value in 0..count {
                let mut command = std::process::Command::new(progname.clone());
                if nocapture {
                    command.arg("--nocapture");
                }
                let status = command
                    .env(CTRL_INDEX, value.to_string())
                    .status()
                    .expect("Command failed to start");
                assert!(status.success());
            }
            None
        }
        Ok(value) => {
            println!("executor {value}");
            Some(value.parse().unwrap())
        }
    }
}

// An output that can be handed to a writer and inspected afterwards.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);
impl SharedBuffer {
    pub fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}
impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

pub fn layout(pattern: &str) -> SecureLayout {
    SecureLayout::try_with_pattern(pattern)
        .unwrap()
        .with_line_ending(LineEnding::Lf)
        .unwrap()
}

pub fn event(message: &str) -> LogEvent {
    LogEvent::new(log::Level::Info, "test", message)
}

pub fn read_records(stream: &str, layout: &SecureLayout) -> Vec<String> {
    RecordReader::for_layout(stream.as_bytes(), layout)
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

// Counts the positions where an unescaped record separator is followed by the terminator.
pub fn count_boundaries(stream: &str, layout: &SecureLayout) -> usize {
    let esc = layout.escape_sequence();
    let marker = format!("{}{}", layout.record_separator(), layout.line_ending().as_str());
    stream
        .match_indices(&marker)
        .filter(|(pos, _)| {
            let mut before = &stream[..*pos];
            let mut run = 0;
            while let Some(rest) = before.strip_suffix(esc) {
                before = rest;
                run += 1;
            }
            run % 2 == 0
        })
        .count()
}
