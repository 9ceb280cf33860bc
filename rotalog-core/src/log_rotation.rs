use std::{
    error::Error,
    sync::{Mutex, MutexGuard, PoisonError},
};

use crate::{
    config::{LogConfig, SEPARATOR},
    error::ConfigError,
    level::Level,
    storage::LogStorage,
    utils::format_record,
};

struct State {
    config: LogConfig,
    /// Newest first. Index 0 receives the next record.
    files: Vec<String>,
}

/// Leveled log spread over size-rotated files with count-based retention.
///
/// The ordered file list is persisted to `{file_name_base}_status.txt` after
/// every accepted record, so a new instance over the same storage picks up
/// where the previous one stopped. Storage failures never surface: writes
/// report `false` and reads return empty content.
pub struct RotatingLog<S: LogStorage> {
    storage: S,
    state: Mutex<State>,
}

impl<S: LogStorage> RotatingLog<S> {
    pub fn new(storage: S, config: LogConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let log = Self {
            storage,
            state: Mutex::new(State {
                config,
                files: Vec::new(),
            }),
        };
        log.setup_files(&mut log.lock());
        Ok(log)
    }

    /// Replaces limits and level, then reloads the persisted file list of
    /// the (possibly new) base name. On error nothing changes.
    pub fn configure(&self, config: LogConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let mut state = self.lock();
        state.config = config;
        state.files.clear();
        self.setup_files(&mut state);
        Ok(())
    }

    pub fn config(&self) -> LogConfig {
        self.lock().config.clone()
    }

    pub fn level(&self) -> Level {
        self.lock().config.level
    }

    pub fn status_file_name(&self) -> String {
        self.lock().config.status_file_name()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn setup_files(&self, state: &mut State) {
        if !self.load_status(state) {
            let name = self
                .storage
                .next_available_name(&state.config.file_name_base);
            state.files.push(name);
            self.save_status(state);
        }
    }

    fn load_status(&self, state: &mut State) -> bool {
        let status = self
            .storage
            .load(&state.config.status_file_name())
            .unwrap_or_default();
        let files: Vec<String> = status
            .split(SEPARATOR)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect();
        if files.is_empty() {
            return false;
        }
        state.files = files;
        true
    }

    fn save_status(&self, state: &State) -> bool {
        let separator = SEPARATOR.to_string();
        let status = state.files.join(separator.as_str());
        self.storage
            .save(&state.config.status_file_name(), &status)
            .is_ok()
    }

    /// Rolls over to a fresh file once the current one is over the size
    /// limit, evicting the oldest files first when the list is full.
    fn check_rollover(&self, state: &mut State) {
        let Some(current) = state.files.first() else {
            return;
        };
        let Ok(Some(size_kb)) = self.storage.size_kb(current) else {
            return;
        };
        if size_kb <= state.config.max_file_size_kb {
            return;
        }
        while state.files.len() >= state.config.max_files as usize {
            let Some(oldest) = state.files.last() else {
                break;
            };
            // a failed delete keeps the entry so it is retried on the next rollover
            if self.storage.delete(oldest).is_err() {
                break;
            }
            state.files.pop();
        }
        let name = self
            .storage
            .next_available_name(&state.config.file_name_base);
        state.files.insert(0, name);
    }

    /// Appends a record if `level` passes the configured threshold.
    ///
    /// Returns whether the record reached storage.
    pub fn log(&self, level: Level, message: &str, error: Option<&dyn Error>) -> bool {
        self.log_with(level, message, error, |_| {})
    }

    /// Same as [`log`](Self::log), handing the exact record line to `mirror`
    /// once the level check has passed. `mirror` runs under the engine lock.
    pub fn log_with<F: FnOnce(&str)>(
        &self,
        level: Level,
        message: &str,
        error: Option<&dyn Error>,
        mirror: F,
    ) -> bool {
        let mut state = self.lock();
        if level < state.config.level {
            return false;
        }
        if state.files.is_empty() {
            self.setup_files(&mut state);
        }
        let record = format_record(message, error);
        mirror(&record);
        let appended = match state.files.first() {
            Some(current) => self.storage.append(current, &record).is_ok(),
            None => false,
        };
        self.check_rollover(&mut state);
        self.save_status(&state);
        appended
    }

    pub fn debug(&self, message: &str) -> bool {
        self.log(Level::Debug, message, None)
    }

    pub fn info(&self, message: &str) -> bool {
        self.log(Level::Info, message, None)
    }

    pub fn warning(&self, message: &str) -> bool {
        self.log(Level::Warning, message, None)
    }

    pub fn error(&self, message: &str, error: &dyn Error) -> bool {
        self.log(Level::Error, message, Some(error))
    }

    pub fn current_log_content(&self) -> String {
        let state = self.lock();
        match state.files.first() {
            Some(current) => self.storage.load(current).unwrap_or_default(),
            None => String::new(),
        }
    }

    /// Content of every managed file, newest first, one block per file.
    pub fn all_log_content(&self) -> String {
        let state = self.lock();
        let mut content = String::new();
        for name in &state.files {
            content.push_str(&self.storage.load(name).unwrap_or_default());
            content.push('\n');
        }
        content
    }

    /// Content of any file in storage, managed or not.
    pub fn log_content(&self, name: &str) -> String {
        let _state = self.lock();
        self.storage.load(name).unwrap_or_default()
    }

    /// Copy of the managed file names, newest first.
    pub fn log_files(&self) -> Vec<String> {
        self.lock().files.clone()
    }

    /// Deletes every managed file and the status record, then forgets them.
    ///
    /// Each deletion is attempted even if a previous one failed. Returns
    /// `true` when all of them succeeded. The next accepted record starts a
    /// fresh file list.
    pub fn purge(&self) -> bool {
        let mut state = self.lock();
        let mut all_deleted = true;
        for name in &state.files {
            all_deleted &= self.storage.delete(name).is_ok();
        }
        all_deleted &= self
            .storage
            .delete(&state.config.status_file_name())
            .is_ok();
        state.files.clear();
        all_deleted
    }
}
