//! The TUI shell (§6 "CLI surface"): takes an optional URL (default
//! `http://www.example.com`), prints the serialised DOM followed by a
//! rendered dump of the layout tree, and exits 1 on navigation or layout
//! failure. Grounded on hastur's `browser/tui/tui.cpp` (argument handling,
//! default URL, `ensure_has_scheme`, exit codes) and `tui/tui.cpp` (the
//! `dom::to_string` + "Building TUI" + `tui::render` + "Done" sequence).
//! The GUI shell named alongside it in hastur (`browser/gui/`) is out of
//! scope per spec.md §1 and isn't reproduced here.

use std::process::ExitCode;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use log::{Log, Metadata, Record, error, info};
use mimalloc::MiMalloc;
use url::Url;

use layout::{FontCache, ImageSizeLookup, LayoutBox};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const DEFAULT_URI: &str = "http://www.example.com";
// Latest Firefox ESR user agent (on Windows), matching what the Tor browser does.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:102.0) Gecko/20100101 Firefox/102.0";

/// Coalesces a repeated identical log line within a 10 second window (§6,
/// "a duplicate-filter sink (10s) coalesces identical lines"), grounded on
/// hastur's `spdlog::sinks::dup_filter_sink_mt`. `log`'s facade has no
/// built-in equivalent, so this wraps whatever logger `env_logger` built
/// and filters ahead of it.
struct DuplicateFilter<L> {
    inner: L,
    last: Mutex<Option<(String, Instant)>>,
}

impl<L: Log> Log for DuplicateFilter<L> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if !self.inner.enabled(record.metadata()) {
            return;
        }
        let line = format!("{}:{}", record.target(), record.args());
        let mut last = self.last.lock().unwrap();
        if let Some((prev, at)) = last.as_ref() {
            if *prev == line && at.elapsed() < Duration::from_secs(10) {
                return;
            }
        }
        *last = Some((line, Instant::now()));
        drop(last);
        self.inner.log(record);
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// `env_logger` honours `RUST_LOG`, the idiomatic-Rust analogue of hastur's
/// `SPDLOG_LEVEL` convention (§6); wrapped in [`DuplicateFilter`] before
/// being installed as the global logger.
fn init_logging() {
    let builder_logger = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).build();
    let max_level = builder_logger.filter();
    let filtered = DuplicateFilter { inner: builder_logger, last: Mutex::new(None) };
    log::set_boxed_logger(Box::new(filtered)).expect("logger already initialized");
    log::set_max_level(max_level);
}

/// No image codec is wired up for the TUI shell (image-file discovery and
/// decoding are external collaborators per spec.md §1), so every `<img>`
/// falls back to its `alt` text (§4.6 step 1, §6 "a null return signals the
/// resource is unavailable").
struct NoImages;

impl ImageSizeLookup for NoImages {
    fn size(&self, _src: &str) -> Option<(f32, f32)> {
        None
    }
}

fn ensure_has_scheme(raw: &str) -> String {
    if raw.contains("://") {
        raw.to_string()
    } else {
        info!("url missing scheme, assuming https");
        format!("https://{raw}")
    }
}

/// A plain-text dump of the layout tree: anonymous blocks flatten into
/// their children, a box carrying text prints that text, everything else
/// prints its tag name and recurses. Not the spec's DOM-dump format (§6
/// only defines that for the DOM) and not a faithful character-grid
/// renderer (hastur's `tui::render` drives `ftxui`, which this workspace's
/// dependency graph doesn't carry) — just enough structure to see that a
/// page actually laid out.
fn render_layout(b: &LayoutBox<'_, '_>, depth: usize, out: &mut String) {
    if b.is_anonymous() {
        for child in &b.children {
            render_layout(child, depth, out);
        }
        return;
    }

    let text = b.text.as_str();
    if !text.is_empty() {
        out.push_str(&"  ".repeat(depth));
        out.push_str(text);
        out.push('\n');
        return;
    }

    if let Some(name) = b.tag_name() {
        out.push_str(&"  ".repeat(depth));
        out.push('<');
        out.push_str(name);
        out.push_str(">\n");
    }

    for child in &b.children {
        render_layout(child, depth + 1, out);
    }
}

fn main() -> ExitCode {
    init_logging();

    let raw = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_URI.to_string());
    let raw = ensure_has_scheme(&raw);
    let url = match Url::parse(&raw) {
        Ok(url) => url,
        Err(e) => {
            error!("failed to parse {raw:?}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let handler = net::ResponseCache::new(net::MultiProtocolHandler::with_default_user_agent(USER_AGENT));
    let options = browser::NavigateOptions::default();

    let page = match browser::navigate(&handler, url.clone(), &options) {
        Ok(page) => page,
        Err(e) => {
            error!(r#"error loading "{url}": {e}"#);
            return ExitCode::FAILURE;
        }
    };

    print!("{}", html::dump_tree(&page.dom));
    info!("Building TUI");

    let fonts = FontCache::without_provider();
    browser::relayout(&page, &options, &NoImages, &fonts, |_styled, layout_tree| match layout_tree {
        Some(root) => {
            let mut rendered = String::new();
            render_layout(root, 0, &mut rendered);
            print!("{rendered}");
            info!("Done");
            ExitCode::SUCCESS
        }
        None => {
            error!("Unable to create a layout of {url}");
            ExitCode::FAILURE
        }
    })
}
