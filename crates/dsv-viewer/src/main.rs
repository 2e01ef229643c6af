//! `dsv-viewer` entrypoint: CLI parsing, logging init, config/file ingest,
//! and the single-threaded event loop (spec.md §5).

mod error;

use anyhow::{Context, Result};
use clap::Parser;
use dsv_arena::{Arena, ArenaLimits};
use dsv_cache::{ColumnWidths, DisplayCache};
use dsv_clipboard::copy_to_clipboard;
use dsv_config::Config;
use dsv_ingest::{FileData, IngestConfig, ParsedData};
use dsv_input::{map_key_event, InputRouter, RouterOutcome, SearchOutcome};
use dsv_model::{FileDataSource, SharedDataSource, View, ViewManager};
use dsv_render::{
    calculate_header_layout, get_column_screen_position, DefaultStatusInputs, Highlight,
    SortIndicator, StatusLine, Writer,
};
use dsv_terminal::{CrosstermBackend, TerminalBackend, TerminalCapabilities};
use std::cell::RefCell;
use std::io::Write as _;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

use error::{parse_delimiter_arg, ViewerError};

/// `<program> <filename> [--config <path>] [-d <delim>] [--headerless] [--benchmark]`
/// (spec.md §6 "CLI").
#[derive(Parser, Debug)]
#[command(name = "dsv-viewer", version, about = "Interactive terminal viewer for delimiter-separated-value files")]
struct Args {
    /// DSV file to open.
    path: PathBuf,
    /// Config file path; defaults are used when omitted.
    #[arg(long = "config")]
    config: Option<PathBuf>,
    /// Force a single-byte delimiter, overriding detection.
    #[arg(short = 'd', long = "delimiter")]
    delimiter: Option<String>,
    /// Treat every line as data; don't render line 0 as a header.
    #[arg(long = "headerless")]
    headerless: bool,
    /// Initialize, print timings, and exit without entering the TUI.
    #[arg(long = "benchmark")]
    benchmark: bool,
}

fn main() {
    let args = Args::parse();
    let _log_guard = init_logging();

    if let Err(err) = run(args) {
        tracing::error!(error = %err, "fatal error during startup or run");
        eprintln!("dsv-viewer: {err}");
        std::process::exit(1);
    }
}

/// Log to `dsv_debug.log` in the CWD, append mode (spec.md §6
/// "Environment / filesystem"). Failure to install the subscriber (e.g. a
/// second `try_init` in tests) is non-fatal: the viewer runs without file
/// logging rather than refusing to start.
fn init_logging() -> Option<WorkerGuard> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("dsv_debug.log")
        .ok()?;
    let (writer, guard) = tracing_appender::non_blocking(file);
    let result = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(writer)
        .with_ansi(false)
        .try_init();
    match result {
        Ok(()) => Some(guard),
        Err(_) => None,
    }
}

fn run(args: Args) -> Result<()> {
    if !args.path.is_file() {
        return Err(error::not_a_file(&args.path).into());
    }

    let config = load_config(args.config.as_deref())?;
    let forced_delimiter = args
        .delimiter
        .as_deref()
        .map(parse_delimiter_arg)
        .transpose()?;

    let ingest_config = IngestConfig {
        delimiter_detection_sample_size: config.delimiter_detection_sample_size,
        line_estimation_sample_size: config.line_estimation_sample_size,
        default_chars_per_line: config.default_chars_per_line,
        max_cols: config.max_cols,
        forced_delimiter,
        encoding: dsv_text::EncodingDetectionConfig {
            sample_size: config.encoding_detection_sample_size,
            auto_detect: config.auto_detect_encoding,
            force_encoding: config.force_encoding.as_deref().and_then(dsv_text::Encoding::parse_name),
        },
    };

    let startup = Instant::now();
    let (file_data, parsed) = dsv_ingest::load_file(&args.path, &ingest_config)
        .map_err(ViewerError::from)
        .with_context(|| format!("failed to open {}", args.path.display()))?;
    let ingest_elapsed = startup.elapsed();

    info!(
        path = %args.path.display(),
        encoding = file_data.encoding.name(),
        delimiter = parsed.delimiter as char,
        lines = parsed.num_lines(),
        "file ingested"
    );

    let has_header = parsed.has_header && !args.headerless;
    let col_count = parsed.header_fields.len();
    let file_data = std::sync::Arc::new(file_data);

    let file_source = FileDataSource::new(
        std::sync::Arc::clone(&file_data),
        &parsed,
        has_header,
        config.max_cols,
        config.min_column_width,
    );
    let file_ds: SharedDataSource = Rc::new(RefCell::new(file_source));
    let column_widths = RefCell::new(ColumnWidths::uncalculated(col_count, config.min_column_width, config.max_column_width));

    if args.benchmark {
        return run_benchmark(&file_data, &parsed, &column_widths, &config, ingest_elapsed);
    }

    let arena = Arena::new(ArenaLimits {
        entry_pool_capacity: config.cache_size,
        string_pool_bytes: config.cache_string_pool_size,
        truncated_pool_capacity: config.max_truncated_versions,
        intern_entry_pool_capacity: config.intern_table_size,
        intern_table_buckets: config.intern_table_size,
    });
    let cache = DisplayCache::new(&arena, config.cache_size, config.max_truncated_versions, file_data.encoding);

    let mut manager = ViewManager::new(Rc::clone(&file_ds));
    let caps = TerminalCapabilities::detect();
    let mut status = StatusLine::new();

    let mut backend = CrosstermBackend::new();
    backend.set_title(&format!("dsv-viewer — {}", args.path.display()))?;
    let _guard = backend.enter_guard()?;

    let (cols, rows) = crossterm::terminal::size().unwrap_or((80, 24));
    let mut router = InputRouter::new(cols as usize, visible_rows(rows));

    let mut screen_width = cols as usize;
    let mut screen_height = rows as usize;
    let mut show_help = false;

    render(
        &manager,
        &file_ds,
        &file_data,
        &parsed,
        &column_widths,
        &cache,
        &caps,
        &status,
        &config,
        screen_width,
        screen_height,
        show_help,
    )?;

    loop {
        let event = crossterm::event::read().context("reading terminal event")?;
        match event {
            crossterm::event::Event::Resize(w, h) => {
                screen_width = w as usize;
                screen_height = h as usize;
                router.resize(screen_width, visible_rows(h));
            }
            crossterm::event::Event::Key(key_event) => {
                if key_event.kind != crossterm::event::KeyEventKind::Press {
                    continue;
                }
                let Some(token) = map_key_event(&key_event) else {
                    continue;
                };

                if show_help {
                    show_help = false;
                } else {
                    // `handle_key` needs `&mut manager`, so the width closure
                    // below must capture the current view's data source by
                    // value (a cheap `Rc` clone) rather than `&View` itself —
                    // holding a live reference derived from `manager.current()`
                    // across the `&mut manager` call would not borrow-check.
                    let (data_source, is_file_view) = {
                        let view = manager.current();
                        (Rc::clone(&view.data_source), Rc::ptr_eq(&view.data_source, &file_ds))
                    };
                    let width_fn = column_width_fn(data_source, is_file_view, &file_data, &parsed, &column_widths, config.column_analysis_sample_lines);
                    let outcome = router.handle_key(&mut manager, token, width_fn);
                    match outcome {
                        RouterOutcome::Quit => break,
                        RouterOutcome::ShowHelp => show_help = true,
                        RouterOutcome::CycleView { forward } => {
                            if forward {
                                manager.cycle_next();
                            } else {
                                manager.cycle_prev();
                            }
                        }
                        RouterOutcome::CloseView => {
                            if !manager.close_current() {
                                status.set_error("Cannot close the only view");
                            }
                        }
                        RouterOutcome::CopyCell(text) => {
                            let outcome = copy_to_clipboard(&text);
                            status.set_copy_status(outcome.status_message());
                        }
                        RouterOutcome::SearchResult(result) => {
                            status.set_status(search_status_message(result));
                        }
                        RouterOutcome::Consumed { .. } | RouterOutcome::Ignored => {}
                    }
                }
            }
            _ => continue,
        }

        status.set_search_echo(router.is_composing_search().then(|| router.search_term().to_string()));

        render(
            &manager,
            &file_ds,
            &file_data,
            &parsed,
            &column_widths,
            &cache,
            &caps,
            &status,
            &config,
            screen_width,
            screen_height,
            show_help,
        )?;
    }

    Ok(())
}

fn visible_rows(screen_height: u16) -> usize {
    (screen_height as usize).saturating_sub(2)
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config, ViewerError> {
    let config = match path {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };
    config.validate()?;
    Ok(config)
}

fn search_status_message(outcome: SearchOutcome) -> &'static str {
    match outcome {
        SearchOutcome::Found => "Found",
        SearchOutcome::WrappedAndFound => "Found (wrapped)",
        SearchOutcome::NotFound => "Not found",
    }
}

/// Width source for `col`: the file view's width comes from the lazily
/// computed analyzer (spec.md §4.F); derived/analysis views already carry
/// exact widths in their `MemoryDataSource` (spec.md §4.H). `is_file_view`
/// (an `Rc::ptr_eq` check against the shared file data source, done once by
/// the caller) tells the two apart without the closure needing to know
/// which kind of source it holds. Takes `data_source` by value (a cloned
/// `Rc`) rather than borrowing the owning `View`, so the closure never
/// aliases a live borrow of `ViewManager` — callers that still hold
/// `&mut ViewManager` while this runs (the router) need that.
fn column_width_fn<'a>(
    data_source: SharedDataSource,
    is_file_view: bool,
    file_data: &'a FileData,
    parsed: &'a ParsedData,
    column_widths: &'a RefCell<ColumnWidths>,
    sample_size: usize,
) -> impl Fn(usize) -> usize + 'a {
    move |col: usize| {
        if is_file_view {
            column_widths.borrow_mut().width(
                col,
                file_data.bytes(),
                file_data.encoding,
                parsed.delimiter,
                &parsed.line_offsets,
                sample_size,
            )
        } else {
            data_source.borrow().get_column_width(col)
        }
    }
}

fn pad(s: &str, width: usize, encoding: dsv_text::Encoding) -> String {
    let w = dsv_text::display_width(s.as_bytes(), encoding);
    if w >= width {
        s.to_string()
    } else {
        let mut out = String::with_capacity(s.len() + (width - w));
        out.push_str(s);
        out.extend(std::iter::repeat(' ').take(width - w));
        out
    }
}

#[allow(clippy::too_many_arguments)]
fn render(
    manager: &ViewManager,
    file_ds: &SharedDataSource,
    file_data: &FileData,
    parsed: &ParsedData,
    column_widths: &RefCell<ColumnWidths>,
    cache: &DisplayCache,
    caps: &TerminalCapabilities,
    status: &StatusLine,
    config: &Config,
    screen_width: usize,
    screen_height: usize,
    show_help: bool,
) -> Result<()> {
    let mut writer = Writer::new();
    writer.clear_all();

    if show_help {
        draw_help(&mut writer, screen_width, screen_height);
    } else {
        let view = manager.current();
        let col_count = view.col_count();

        if col_count == 0 || view.visible_row_count == 0 {
            draw_empty_message(&mut writer, screen_width, screen_height);
        } else {
            draw_table(&mut writer, view, file_ds, file_data, parsed, column_widths, cache, caps, config, screen_width, screen_height);
        }
    }

    draw_status_line(&mut writer, manager, status, screen_width, screen_height);

    let mut stdout = std::io::stdout();
    writer.flush(&mut stdout).context("flushing terminal writes")?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn draw_table(
    writer: &mut Writer,
    view: &View,
    file_ds: &SharedDataSource,
    file_data: &FileData,
    parsed: &ParsedData,
    column_widths: &RefCell<ColumnWidths>,
    cache: &DisplayCache,
    caps: &TerminalCapabilities,
    config: &Config,
    screen_width: usize,
    screen_height: usize,
) {
    let col_count = view.col_count();
    let visible_rows = screen_height.saturating_sub(2);
    let is_file_view = Rc::ptr_eq(&view.data_source, file_ds);
    let width_fn = column_width_fn(Rc::clone(&view.data_source), is_file_view, file_data, parsed, column_widths, config.column_analysis_sample_lines);
    let layout = calculate_header_layout(col_count, view.start_col, screen_width, &width_fn);

    writer.move_to(0, 0);
    writer.style(Highlight::Header);
    let mut header_line = String::new();
    {
        let ds = view.data_source.borrow();
        for col in view.start_col..=layout.last_visible_col {
            let Some((_, w)) = get_column_screen_position(col_count, view.start_col, col, screen_width, &width_fn) else {
                continue;
            };
            let text = ds.get_header(col);
            let truncated = cache.get_truncated(text, w);
            header_line.push_str(&pad(&truncated, w, file_data.encoding));
            if col != layout.last_visible_col {
                header_line.push_str(caps.column_separator());
            }
        }
    }
    let header_pad = layout.underline_width.saturating_sub(dsv_text::display_width(header_line.as_bytes(), file_data.encoding));
    header_line.extend(std::iter::repeat(' ').take(header_pad));
    writer.print(header_line);
    writer.reset_style();

    for row_on_screen in 0..visible_rows {
        let display_row = view.start_row + row_on_screen;
        let y = (row_on_screen + 1) as u16;
        writer.move_to(0, y);
        writer.clear_line();

        let Some(actual_row) = view.view_get_displayed_row_index(display_row) else {
            continue;
        };
        let is_selected = view.is_selected(display_row);
        if is_selected {
            writer.style(Highlight::SelectedRow);
        }

        let mut line = String::new();
        {
            let mut ds = view.data_source.borrow_mut();
            for col in view.start_col..=layout.last_visible_col {
                let Some((_, w)) = get_column_screen_position(col_count, view.start_col, col, screen_width, &width_fn) else {
                    continue;
                };
                let cell = ds.get_cell(actual_row, col);
                let truncated = cache.get_truncated(&cell, w);
                line.push_str(&pad(&truncated, w, file_data.encoding));
                if col != layout.last_visible_col {
                    line.push_str(caps.column_separator());
                }
            }
        }
        writer.print(line);
        if is_selected {
            writer.reset_style();
        }
    }
}

fn draw_empty_message(writer: &mut Writer, screen_width: usize, screen_height: usize) {
    let message = "No data to display";
    let x = screen_width.saturating_sub(message.len()) / 2;
    let y = (screen_height / 2) as u16;
    writer.move_to(x as u16, y);
    writer.print(message);
}

fn draw_help(writer: &mut Writer, screen_width: usize, screen_height: usize) {
    const LINES: &[&str] = &[
        "dsv-viewer — key bindings",
        "",
        "Arrows / PageUp / PageDown / Home / End   move the cursor",
        "Space                                     toggle row selection",
        "A, Esc                                     clear selection",
        "v                                          open a view of the selected rows",
        "f                                          frequency-analyze the cursor's column",
        "0-9                                        sort by column (cycles asc/desc/off)",
        "/                                          search; Enter confirms, Esc cancels",
        "n                                          repeat last search",
        "y                                          copy the cursor's cell to the clipboard",
        "Tab / Shift-Tab                             cycle between open views",
        "x                                          close the current view",
        "h, H                                       toggle this help",
        "q, Q                                       quit",
        "",
        "Press any key to close this panel.",
    ];
    for (i, line) in LINES.iter().enumerate().take(screen_height.saturating_sub(1)) {
        writer.move_to(2, (i + 1) as u16);
        writer.print(*line);
    }
}

fn draw_status_line(writer: &mut Writer, manager: &ViewManager, status: &StatusLine, screen_width: usize, screen_height: usize) {
    let view = manager.current();
    let sort = match view.sort_direction {
        dsv_model::SortDirection::None => SortIndicator::None,
        dsv_model::SortDirection::Asc => SortIndicator::Asc(view.sort_column.unwrap_or(0)),
        dsv_model::SortDirection::Desc => SortIndicator::Desc(view.sort_column.unwrap_or(0)),
    };
    let inputs = DefaultStatusInputs {
        view_name: view.name.clone(),
        cursor_row: view.cursor_row,
        cursor_col: view.cursor_col,
        viewing_start: view.start_row + 1,
        viewing_end: (view.start_row + screen_height.saturating_sub(2)).min(view.visible_row_count.max(1)),
        total_rows: view.visible_row_count,
        selection_count: view.selection_count,
        sort,
    };

    let y = screen_height.saturating_sub(1) as u16;
    writer.move_to(0, y);
    writer.clear_line();
    let now = Instant::now();
    let is_error = status.is_error_active(now);
    let line = status.resolve(now, &inputs);
    let line: String = line.chars().take(screen_width).collect();
    if is_error {
        writer.style_error_text();
    }
    writer.print(line);
    if is_error {
        writer.reset_style();
    }
}

fn run_benchmark(
    file_data: &std::sync::Arc<FileData>,
    parsed: &ParsedData,
    column_widths: &RefCell<ColumnWidths>,
    config: &Config,
    ingest_elapsed: Duration,
) -> Result<()> {
    let analysis_start = Instant::now();
    for col in 0..parsed.header_fields.len() {
        column_widths.borrow_mut().width(
            col,
            file_data.bytes(),
            file_data.encoding,
            parsed.delimiter,
            &parsed.line_offsets,
            config.column_analysis_sample_lines,
        );
    }
    let analysis_elapsed = analysis_start.elapsed();

    println!("dsv-viewer --benchmark");
    println!("  file bytes:        {}", file_data.raw_len());
    println!("  lines:             {}", parsed.num_lines());
    println!("  columns:           {}", parsed.header_fields.len());
    println!("  ingest:            {:?}", ingest_elapsed);
    println!("  column analysis:   {:?}", analysis_elapsed);
    println!("  total:             {:?}", ingest_elapsed + analysis_elapsed);

    let mut stdout = std::io::stdout();
    stdout.flush().ok();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_status_messages_match_each_outcome() {
        assert_eq!(search_status_message(SearchOutcome::Found), "Found");
        assert_eq!(search_status_message(SearchOutcome::WrappedAndFound), "Found (wrapped)");
        assert_eq!(search_status_message(SearchOutcome::NotFound), "Not found");
    }

    #[test]
    fn pad_extends_short_strings_to_the_target_width() {
        assert_eq!(pad("hi", 5, dsv_text::Encoding::Ascii), "hi   ");
        assert_eq!(pad("hello", 5, dsv_text::Encoding::Ascii), "hello");
    }
}
