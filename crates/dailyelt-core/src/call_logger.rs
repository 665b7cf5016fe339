//! Call logger
//!
//! Wraps a function so every invocation is logged: a pre-call message with
//! the (optionally rendered) arguments, and, when outputs or runtime metrics
//! are requested, a post-call message with the truncated return value and the
//! elapsed time.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use dailyelt_core::call_logger::CallLogger;
//! use dailyelt_core::logging_facility::MemorySink;
//!
//! let sink = Arc::new(MemorySink::new("doc"));
//! let add = CallLogger::new(sink.clone())
//!     .log_inputs(true)
//!     .log_outputs(true)
//!     .wrap("add", |(a, b): (i32, i32)| a + b);
//!
//! assert_eq!(add.call((2, 3)), 5);
//! assert_eq!(sink.messages()[0], "Called add(2, 3)");
//! ```

use crate::format::{format_value, LogValue, ToLogValue, DEFAULT_MAX_LEN};
use crate::logging_facility::{LogSink, Severity};
use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Describes a call's arguments for logging
///
/// Tuples describe positional arguments. Parameter structs can implement
/// this to show up as `key=value` pairs.
pub trait LogArgs {
    fn positional(&self) -> Vec<LogValue>;

    fn keywords(&self) -> Vec<(String, LogValue)> {
        Vec::new()
    }
}

impl LogArgs for () {
    fn positional(&self) -> Vec<LogValue> {
        Vec::new()
    }
}

macro_rules! impl_log_args {
    ($($name:ident),+) => {
        impl<$($name: ToLogValue),+> LogArgs for ($($name,)+) {
            #[allow(non_snake_case)]
            fn positional(&self) -> Vec<LogValue> {
                let ($($name,)+) = self;
                vec![$($name.to_log_value()),+]
            }
        }
    };
}

impl_log_args!(A);
impl_log_args!(A, B);
impl_log_args!(A, B, C);
impl_log_args!(A, B, C, D);

/// Explicit argument list with positional and keyword arguments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    positional: Vec<LogValue>,
    keywords: Vec<(String, LogValue)>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg<T: ToLogValue + ?Sized>(mut self, value: &T) -> Self {
        self.positional.push(value.to_log_value());
        self
    }

    pub fn kwarg<T: ToLogValue + ?Sized>(mut self, key: impl Into<String>, value: &T) -> Self {
        self.keywords.push((key.into(), value.to_log_value()));
        self
    }
}

impl LogArgs for CallArgs {
    fn positional(&self) -> Vec<LogValue> {
        self.positional.clone()
    }

    fn keywords(&self) -> Vec<(String, LogValue)> {
        self.keywords.clone()
    }
}

/// One logged invocation, projected into the pre- and post-call messages
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedCall {
    pub name: String,
    /// Rendered argument list, when inputs are logged
    pub inputs: Option<String>,
    /// Rendered return value, when outputs are logged
    pub output: Option<String>,
    /// Elapsed wall-clock time, when runtime metrics are logged
    pub elapsed: Option<Duration>,
}

impl LoggedCall {
    pub fn pre_call_message(&self) -> String {
        format!("Called {}({})", self.name, self.inputs.as_deref().unwrap_or(""))
    }

    pub fn post_call_message(&self) -> String {
        let mut message = format!("Finished {}()", self.name);
        if let Some(output) = &self.output {
            message.push_str("\n    --Output--\n");
            message.push_str(output);
        }
        if let Some(elapsed) = self.elapsed {
            let seconds = elapsed.as_secs_f64();
            message.push_str(&format!(
                "\n    --Runtime metrics--\n    Total execution time: {:.2} seconds = {:.2} minutes",
                seconds,
                seconds / 60.0
            ));
        }
        message
    }
}

/// Call-logging configuration bound to a sink
#[derive(Clone)]
pub struct CallLogger {
    sink: Arc<dyn LogSink>,
    level: Severity,
    log_inputs: bool,
    log_outputs: bool,
    log_inputs_max_len: usize,
    log_outputs_max_len: usize,
    log_runtime: bool,
}

impl fmt::Debug for CallLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallLogger")
            .field("sink", &self.sink.name())
            .field("level", &self.level)
            .field("log_inputs", &self.log_inputs)
            .field("log_outputs", &self.log_outputs)
            .field("log_inputs_max_len", &self.log_inputs_max_len)
            .field("log_outputs_max_len", &self.log_outputs_max_len)
            .field("log_runtime", &self.log_runtime)
            .finish()
    }
}

impl CallLogger {
    /// Logger at `Info` that only logs the pre-call message
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            level: Severity::Info,
            log_inputs: false,
            log_outputs: false,
            log_inputs_max_len: DEFAULT_MAX_LEN,
            log_outputs_max_len: DEFAULT_MAX_LEN,
            log_runtime: false,
        }
    }

    pub fn level(mut self, level: Severity) -> Self {
        self.level = level;
        self
    }

    pub fn log_inputs(mut self, enabled: bool) -> Self {
        self.log_inputs = enabled;
        self
    }

    pub fn log_outputs(mut self, enabled: bool) -> Self {
        self.log_outputs = enabled;
        self
    }

    pub fn log_inputs_max_len(mut self, max_len: usize) -> Self {
        self.log_inputs_max_len = max_len;
        self
    }

    pub fn log_outputs_max_len(mut self, max_len: usize) -> Self {
        self.log_outputs_max_len = max_len;
        self
    }

    pub fn log_runtime(mut self, enabled: bool) -> Self {
        self.log_runtime = enabled;
        self
    }

    /// Wrap `func` under `name`
    pub fn wrap<F>(&self, name: impl Into<String>, func: F) -> LoggedFn<F> {
        LoggedFn {
            name: name.into(),
            func,
            logger: self.clone(),
        }
    }

    /// Run `func` once with call logging
    pub fn invoke<A, R, F>(&self, name: &str, args: A, func: F) -> R
    where
        A: LogArgs,
        R: ToLogValue,
        F: FnOnce(A) -> R,
    {
        match self.try_invoke(name, args, |a| Ok::<R, Infallible>(func(a))) {
            Ok(output) => output,
            Err(never) => match never {},
        }
    }

    /// Run a fallible `func` once with call logging
    ///
    /// The pre-call message is always emitted. If `func` returns `Err`, the
    /// post-call message is skipped.
    ///
    /// # Errors
    ///
    /// Whatever `func` returns, unchanged.
    pub fn try_invoke<A, T, E, F>(&self, name: &str, args: A, func: F) -> Result<T, E>
    where
        A: LogArgs,
        T: ToLogValue,
        F: FnOnce(A) -> Result<T, E>,
    {
        let mut call = LoggedCall {
            name: name.to_string(),
            inputs: self.log_inputs.then(|| self.render_args(&args)),
            output: None,
            elapsed: None,
        };
        self.sink.log(self.level, &call.pre_call_message());

        let started = Instant::now();
        let result = func(args);
        let elapsed = started.elapsed();

        if let Ok(output) = &result {
            if self.log_outputs || self.log_runtime {
                if self.log_outputs {
                    call.output = Some(format_value(
                        &output.to_log_value(),
                        self.log_outputs_max_len,
                    ));
                }
                if self.log_runtime {
                    call.elapsed = Some(elapsed);
                }
                self.sink.log(self.level, &call.post_call_message());
            }
        }
        result
    }

    fn render_args<A: LogArgs>(&self, args: &A) -> String {
        let max_len = self.log_inputs_max_len;
        let positional = args
            .positional()
            .into_iter()
            .map(|value| format_value(&value, max_len));
        let keywords = args.keywords().into_iter().map(|(key, value)| {
            format!(
                "{}={}",
                format_value(&LogValue::Str(key), max_len),
                format_value(&value, max_len)
            )
        });
        positional.chain(keywords).collect::<Vec<_>>().join(", ")
    }
}

/// A function wrapped by [`CallLogger::wrap`]
pub struct LoggedFn<F> {
    name: String,
    func: F,
    logger: CallLogger,
}

impl<F> fmt::Debug for LoggedFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggedFn")
            .field("name", &self.name)
            .field("logger", &self.logger)
            .finish_non_exhaustive()
    }
}

impl<F> LoggedFn<F> {
    /// Name of the wrapped function, as it appears in log messages
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The unwrapped function
    pub fn inner(&self) -> &F {
        &self.func
    }

    pub fn call<A, R>(&self, args: A) -> R
    where
        F: Fn(A) -> R,
        A: LogArgs,
        R: ToLogValue,
    {
        self.logger.invoke(&self.name, args, &self.func)
    }

    /// # Errors
    ///
    /// Whatever the wrapped function returns, unchanged.
    pub fn try_call<A, T, E>(&self, args: A) -> Result<T, E>
    where
        F: Fn(A) -> Result<T, E>,
        A: LogArgs,
        T: ToLogValue,
    {
        self.logger.try_invoke(&self.name, args, &self.func)
    }
}
