use std::{borrow::Borrow, fmt::Display};

use swc_common::{SourceMap, Span};

use crate::{Level, Logger};

/// A logger that can attach a source location to a message.
pub trait SrcFileLogger: Logger {
    fn src_log_at(&self, location: &Span, level: Level, message: impl Display);

    fn src_debug(&self, location: &Span, message: impl Display) {
        self.src_log_at(location, Level::Debug, message);
    }
    fn src_warn(&self, location: &Span, message: impl Display) {
        self.src_log_at(location, Level::Warn, message);
    }
    fn src_error(&self, location: &Span, message: impl Display) {
        self.src_log_at(location, Level::Error, message);
    }
}

impl<T: SrcFileLogger> SrcFileLogger for &T {
    fn src_log_at(&self, location: &Span, level: Level, message: impl Display) {
        (*self).src_log_at(location, level, message);
    }
}

/// Resolves spans against a `SourceMap` and forwards to an inner logger.
#[derive(Clone)]
pub struct WrapFileLogger<TSourceMap, TLogger> {
    source_map: TSourceMap,
    inner_logger: TLogger,
}

impl<TSourceMap: Borrow<SourceMap>, TLogger: Logger> WrapFileLogger<TSourceMap, TLogger> {
    pub fn new(source_map: TSourceMap, inner_logger: TLogger) -> Self {
        Self {
            source_map,
            inner_logger,
        }
    }

    pub fn inner(&self) -> &TLogger {
        &self.inner_logger
    }

    fn describe(&self, location: &Span) -> String {
        // generated nodes carry dummy spans, which have no position to look up
        if location.is_dummy() {
            return "<generated>".to_string();
        }
        let loc = self.source_map.borrow().lookup_char_pos(location.lo);
        format!("{}:{}:{}", loc.file.name, loc.line, loc.col_display)
    }
}

impl<TSourceMap: Borrow<SourceMap>, TLogger: Logger> Logger
    for WrapFileLogger<TSourceMap, TLogger>
{
    fn log_at(&self, level: Level, message: impl Display) {
        self.inner_logger.log_at(level, message);
    }
}

impl<TSourceMap: Borrow<SourceMap>, TLogger: Logger> SrcFileLogger
    for WrapFileLogger<TSourceMap, TLogger>
{
    fn src_log_at(&self, location: &Span, level: Level, message: impl Display) {
        self.inner_logger
            .log_at(level, format!("{} :: {}", self.describe(location), message));
    }
}
