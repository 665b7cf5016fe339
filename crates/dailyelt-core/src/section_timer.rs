//! Named code-section timer
//!
//! Keeps a registry of named sections, each with an optional start and end
//! instant. Starting or ending a section logs a message through the sink; a
//! section can be started once and ended once. Sections are never removed,
//! so re-selecting a name resumes the same section.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use dailyelt_core::logging_facility::{MemorySink, Severity};
//! use dailyelt_core::section_timer::SectionTimer;
//!
//! let sink = Arc::new(MemorySink::new("doc"));
//! let mut timer = SectionTimer::new(sink.clone());
//!
//! timer.section("load data").start(Severity::Info).unwrap();
//! timer.section("load data").end(Severity::Info).unwrap();
//!
//! assert_eq!(sink.messages()[0], "Started section 'load data'");
//! ```

use crate::errors::{ElError, Result};
use crate::logging_facility::{LogSink, Severity};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A named interval bounded by a start and an end instant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Section {
    start: Option<Instant>,
    end: Option<Instant>,
}

impl Section {
    pub fn start_time(&self) -> Option<Instant> {
        self.start
    }

    pub fn end_time(&self) -> Option<Instant> {
        self.end
    }

    /// Elapsed time, once both ends are set
    pub fn elapsed(&self) -> Option<Duration> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some(end.saturating_duration_since(start)),
            _ => None,
        }
    }
}

/// Registry of named sections plus the currently selected one
pub struct SectionTimer {
    sink: Arc<dyn LogSink>,
    sections: HashMap<String, Section>,
    current: Option<String>,
}

impl fmt::Debug for SectionTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectionTimer")
            .field("sink", &self.sink.name())
            .field("sections", &self.sections)
            .field("current", &self.current)
            .finish()
    }
}

impl SectionTimer {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            sections: HashMap::new(),
            current: None,
        }
    }

    /// Select the section `name`, creating it if it does not exist yet
    pub fn section(&mut self, name: &str) -> &mut Self {
        self.sections.entry(name.to_string()).or_default();
        self.current = Some(name.to_string());
        self
    }

    /// Start the selected section
    ///
    /// # Errors
    ///
    /// [`ElError::NoSectionSelected`] without a selection,
    /// [`ElError::AlreadyStarted`] if the section was started before.
    pub fn start(&mut self, level: Severity) -> Result<()> {
        let (name, section) = self.selected_mut()?;
        if section.start.is_some() {
            return Err(ElError::AlreadyStarted {
                section: name.to_string(),
            });
        }
        section.start = Some(Instant::now());
        let message = format!("Started section '{}'", name);
        self.sink.log(level, &message);
        Ok(())
    }

    /// End the selected section and return its elapsed time
    ///
    /// # Errors
    ///
    /// [`ElError::NoSectionSelected`] without a selection,
    /// [`ElError::NotStarted`] if the section was never started,
    /// [`ElError::AlreadyEnded`] if the section was ended before.
    pub fn end(&mut self, level: Severity) -> Result<Duration> {
        let (name, section) = self.selected_mut()?;
        let Some(start) = section.start else {
            return Err(ElError::NotStarted {
                section: name.to_string(),
            });
        };
        if section.end.is_some() {
            return Err(ElError::AlreadyEnded {
                section: name.to_string(),
            });
        }
        let end = Instant::now();
        section.end = Some(end);

        let elapsed = end.saturating_duration_since(start);
        let seconds = elapsed.as_secs_f64();
        let message = format!(
            "Finished section '{}' (total runtime {} seconds = {} minutes)",
            name,
            with_thousands(seconds, 0),
            with_thousands(seconds / 60.0, 2)
        );
        self.sink.log(level, &message);
        Ok(elapsed)
    }

    /// Give the selected, unstarted section the start instant of `other`
    ///
    /// Nothing is logged. Lets a section that only exists on an error path
    /// (e.g. a "failed" section) report the runtime of the section it
    /// replaces.
    ///
    /// # Errors
    ///
    /// [`ElError::NotStarted`] if `other` was never started,
    /// [`ElError::AlreadyStarted`] if the selected section has a start,
    /// [`ElError::NoSectionSelected`] without a selection.
    pub fn started_with(&mut self, other: &str) -> Result<&mut Self> {
        let start = self
            .sections
            .get(other)
            .and_then(Section::start_time)
            .ok_or_else(|| ElError::NotStarted {
                section: other.to_string(),
            })?;
        let (name, section) = self.selected_mut()?;
        if section.start.is_some() {
            return Err(ElError::AlreadyStarted {
                section: name.to_string(),
            });
        }
        section.start = Some(start);
        Ok(self)
    }

    /// Name of the selected section
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn get(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    pub fn elapsed(&self, name: &str) -> Option<Duration> {
        self.sections.get(name).and_then(Section::elapsed)
    }

    pub fn is_started(&self, name: &str) -> bool {
        self.get(name).is_some_and(|s| s.start.is_some())
    }

    pub fn is_ended(&self, name: &str) -> bool {
        self.get(name).is_some_and(|s| s.end.is_some())
    }

    /// Names of every section created so far, sorted
    pub fn section_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sections.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn selected_mut(&mut self) -> Result<(&str, &mut Section)> {
        let name = self.current.as_deref().ok_or(ElError::NoSectionSelected)?;
        let section = self
            .sections
            .get_mut(name)
            .ok_or(ElError::NoSectionSelected)?;
        Ok((name, section))
    }
}

/// `value` rounded to `decimals` places with `,` between thousands
fn with_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value);
    let (sign, digits) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted.as_str()),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(formatted.len() + int_part.len() / 3);
    grouped.push_str(sign);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac_part) = frac_part {
        grouped.push('.');
        grouped.push_str(frac_part);
    }
    grouped
}
