//! # taskd
//!
//! A small task-management API server. Clients create, read, update,
//! delete and list task records over an HTTP JSON API; state is persisted
//! to a single JSON file that is fully read and fully rewritten on every
//! operation.
//!
//! ## Usage
//!
//! ```bash
//! # Start the server on the default port (8000)
//! taskd
//! # or explicitly
//! taskd serve --port 8000 --db /tmp/tasks.json
//!
//! # Operator commands against the local database
//! taskd list --status pending
//! taskd reset --force
//! taskd completions zsh
//! ```
//!
//! ## API
//!
//! | Method | Path              | Description                         |
//! |--------|-------------------|-------------------------------------|
//! | GET    | `/api/tasks`      | List tasks (`?status=`, `?limit=`)  |
//! | POST   | `/api/tasks`      | Create a task (201)                 |
//! | GET    | `/api/tasks/{id}` | Fetch a task                        |
//! | PUT    | `/api/tasks/{id}` | Partially update a task             |
//! | DELETE | `/api/tasks/{id}` | Delete a task                       |
//! | GET    | `/api/health`     | Liveness probe                      |
//!
//! ## Data Storage
//!
//! Tasks are saved in your local data directory:
//! *   Linux: `~/.local/share/taskd/tasks.json`
//! *   macOS: `~/Library/Application Support/taskd/tasks.json`
//! *   Windows: `%APPDATA%\taskd\tasks.json`
//!
//! You can override this by setting the `TASKD_DB` environment variable
//! or passing `--db`.

pub mod api;
pub mod commands;
pub mod error;
pub mod models;
pub mod repository;
pub mod storage;
