use anyhow::Result;
use chrono::Local;
use std::{
    fs::File,
    io::{self, IsTerminal, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError},
};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        FmtContext, MakeWriter,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    reload,
    util::SubscriberInitExt,
};

/// Default directive when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,tower_http=debug";

// --- Formatter ---

/// `<local timestamp> <LEVEL> <file:line> <fields>`, coloured on a terminal.
struct LocalFmt;

impl<S, N> FormatEvent<S, N> for LocalFmt
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let ansi = writer.has_ansi_escapes();
        let timestamp = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");

        if ansi {
            write!(writer, "\x1b[2m{timestamp}\x1b[0m ")?;
        } else {
            write!(writer, "{timestamp} ")?;
        }

        let colour = match *meta.level() {
            Level::ERROR => "\x1b[1;31m",
            Level::WARN => "\x1b[1;33m",
            Level::INFO => "\x1b[1;32m",
            Level::DEBUG => "\x1b[1;34m",
            Level::TRACE => "\x1b[1;35m",
        };
        if ansi {
            write!(writer, "{colour}{:>5}\x1b[0m ", meta.level())?;
        } else {
            write!(writer, "{:>5} ", meta.level())?;
        }

        if let (Some(file), Some(line)) = (meta.file(), meta.line()) {
            let file = file
                .rsplit_once("src/")
                .or_else(|| file.rsplit_once("src\\"))
                .map_or(file, |(_, rest)| rest);
            if ansi {
                write!(writer, "\x1b[36m{file}:{line}\x1b[0m ")?;
            } else {
                write!(writer, "{file}:{line} ")?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

// --- Late-bound file writer ---

type Slot = Arc<Mutex<Option<File>>>;

fn lock(slot: &Slot) -> MutexGuard<'_, Option<File>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Writes to a file once one is set; until then output is dropped.
#[derive(Clone)]
struct FileSlot(Slot);

struct SlotWriter<'a>(MutexGuard<'a, Option<File>>);

impl Write for SlotWriter<'_> {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> io::Result<usize> {
        match &mut *self.0 {
            Some(f) => f.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut *self.0 {
            Some(f) => f.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for FileSlot {
    type Writer = SlotWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        SlotWriter(lock(&self.0))
    }
}

// --- Statics ---

type SetLevelFn = Box<dyn Fn(&str) -> Result<()> + Send + Sync>;

static SET_LOG_LEVEL: OnceLock<SetLevelFn> = OnceLock::new();
static FILE_SLOT: OnceLock<Slot> = OnceLock::new();

fn make_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn store_level_handle<S>(handle: reload::Handle<EnvFilter, S>)
where
    S: Subscriber + Send + Sync + 'static,
{
    let _ = SET_LOG_LEVEL.set(Box::new(move |directive: &str| {
        let filter = EnvFilter::try_new(directive)
            .map_err(|e| anyhow::anyhow!("invalid log level '{directive}': {e}"))?;
        handle
            .reload(filter)
            .map_err(|e| anyhow::anyhow!("filter reload failed: {e}"))
    }));
}

// --- Public API ---

/// Replaces the active filter. Takes a bare level (`debug`) or any
/// `EnvFilter` directive (`info,tax_core=trace`).
pub fn set_log_level(directive: &str) -> Result<()> {
    match SET_LOG_LEVEL.get() {
        Some(f) => f(directive),
        None => anyhow::bail!("logging not yet initialized"),
    }
}

/// Starts appending log output to `path`, replacing any open log file.
/// The directory must already exist.
pub fn enable_file_logging(path: &Path) -> Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| anyhow::anyhow!("cannot open log file '{}': {e}", path.display()))?;

    match FILE_SLOT.get() {
        Some(slot) => {
            *lock(slot) = Some(file);
            Ok(())
        }
        None => anyhow::bail!("logging not yet initialized"),
    }
}

pub fn disable_file_logging() {
    if let Some(slot) = FILE_SLOT.get() {
        *lock(slot) = None;
    }
}

/// Installs the global subscriber. Later calls are no-ops.
///
/// - Stdout: coloured on a terminal, plain when piped.
/// - File: silent until [`enable_file_logging`] is called.
/// - Level: `RUST_LOG` if set, else [`DEFAULT_FILTER`]; changeable with
///   [`set_log_level`].
pub fn init_logging() {
    let file_inner: Slot = Arc::new(Mutex::new(None));
    if FILE_SLOT.set(file_inner.clone()).is_err() {
        return;
    }

    let (level_filter, level_handle) = reload::Layer::new(make_filter());

    let stdout_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalFmt)
        .with_ansi(io::stdout().is_terminal());

    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalFmt)
        .with_ansi(false)
        .with_writer(FileSlot(file_inner));

    if tracing_subscriber::registry()
        .with(level_filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .is_ok()
    {
        store_level_handle(level_handle);
    }
}
