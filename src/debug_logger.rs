// Debug logging module for asynchronous decision logging
//
// Fire-and-forget JSONL writer so move logging never blocks the
// request/response cycle. One line per turn: the board, the chosen move,
// and a timestamp.

use log::error;
use serde::Serialize;
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::types::{Board, Direction};

/// Represents a single debug log entry
#[derive(Debug, Serialize)]
struct DebugLogEntry {
    turn: i32,
    chosen_move: String,
    board: Board,
    timestamp: String,
}

/// Shared debug logger state; concurrent async writers share the file
/// handle behind an async mutex
#[derive(Clone)]
pub struct DebugLogger {
    file: Arc<Mutex<Option<File>>>,
    enabled: bool,
}

impl DebugLogger {
    /// Creates a new debug logger. If enabled, initializes the log file
    /// (truncating if it exists).
    pub async fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return Self::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
            .await
        {
            Ok(file) => {
                log::info!("Debug logging enabled: {}", log_file_path);
                DebugLogger {
                    file: Arc::new(Mutex::new(Some(file))),
                    enabled: true,
                }
            }
            Err(e) => {
                error!("Failed to create debug log file '{}': {}", log_file_path, e);
                Self::disabled()
            }
        }
    }

    /// Creates a disabled debug logger (no-op)
    pub fn disabled() -> Self {
        DebugLogger {
            file: Arc::new(Mutex::new(None)),
            enabled: false,
        }
    }

    /// Logs a move decision asynchronously (fire-and-forget)
    pub fn log_move(&self, turn: i32, board: Board, chosen_move: Direction) {
        if !self.enabled {
            return;
        }

        let file_handle = self.file.clone();
        let chosen_move = chosen_move.as_str().to_string();

        tokio::spawn(async move {
            Self::write_entry(file_handle, turn, board, chosen_move).await;
        });
    }

    async fn write_entry(
        file_handle: Arc<Mutex<Option<File>>>,
        turn: i32,
        board: Board,
        chosen_move: String,
    ) {
        let mut file_guard = file_handle.lock().await;

        let file = match file_guard.as_mut() {
            Some(f) => f,
            None => return,
        };

        let entry = DebugLogEntry {
            turn,
            chosen_move,
            board,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        match serde_json::to_string(&entry) {
            Ok(json_line) => {
                let line = format!("{}\n", json_line);
                if let Err(e) = file.write_all(line.as_bytes()).await {
                    error!("Failed to write debug log entry: {}", e);
                } else if let Err(e) = file.flush().await {
                    error!("Failed to flush debug log: {}", e);
                }
            }
            Err(e) => error!("Failed to serialize debug log entry: {}", e),
        }
    }
}
