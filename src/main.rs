// SPDX-License-Identifier: MPL-2.0
use race_ana::app::{self, config, CopyOutcome, ShareOptions, Workspace};
use race_ana::application::port::{ClipboardSink, PlayerEvent};
use race_ana::diagnostics::generate_default_filename;
use race_ana::domain::marker::{format_optional_time, format_time, MarkerId};
use race_ana::domain::video::Side;
use race_ana::error::{Error, Result};
use race_ana::infrastructure::clipboard::{Osc52Clipboard, SystemClipboard};
use race_ana::infrastructure::storage::FileStorage;
use race_ana::input::FocusTarget;
use std::process::ExitCode;
use std::time::Duration;
use url::Url;

const HELP: &str = "\
race-ana: side-by-side video comparison

USAGE:
  race-ana [FLAGS] <COMMAND>

COMMANDS:
  show                              Print the stored session
  load <left|right> <url-or-path>   Set a side's video
  mark <left|right> <label> <secs>  Set a marker side-time
  edit <id> <left|right> <m:ss>     Edit a marker side-time
  delete <id>                       Delete a marker
  share [--no-markers] [--no-time] [--copy]
                                    Print a share link
  open <share-url>                  Restore the session from a share link
  clear                             Clear the session
  keys <script> [--duration <secs>] Replay keys (down:d up:d wait:600)

FLAGS:
  --data-dir <path>      Session storage directory
  --config-dir <path>    Directory holding settings.toml
  --session <name>       Session name
  --diagnostics          Write an action report on exit
  -v, --verbose          Debug logging
  -h, --help             Print this help
";

/// Seconds assumed for loaded videos when replaying keys.
const DEFAULT_KEYS_DURATION: f64 = 600.0;

#[derive(Debug)]
enum Command {
    Show,
    Load { side: Side, input: String },
    Mark { side: Side, label: String, seconds: f64 },
    Edit { id: u64, side: Side, text: String },
    Delete { id: u64 },
    Share { options: ShareOptions, copy: bool, explicit: bool },
    Open { link: Url },
    Clear,
    Keys { script: String, duration: f64 },
}

#[derive(Debug)]
struct Cli {
    data_dir: Option<String>,
    config_dir: Option<String>,
    session: Option<String>,
    diagnostics: bool,
    verbose: bool,
    command: Command,
}

fn parse_side(value: &str) -> std::result::Result<Side, String> {
    value.parse()
}

fn parse_url(value: &str) -> std::result::Result<Url, String> {
    Url::parse(value).map_err(|err| err.to_string())
}

fn parse_args() -> std::result::Result<Option<Cli>, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }

    let data_dir = args.opt_value_from_str("--data-dir")?;
    let config_dir = args.opt_value_from_str("--config-dir")?;
    let session = args.opt_value_from_str("--session")?;
    let diagnostics = args.contains("--diagnostics");
    let verbose = args.contains(["-v", "--verbose"]);

    let command = match args.subcommand()?.as_deref() {
        Some("show") | None => Command::Show,
        Some("load") => Command::Load {
            side: args.free_from_fn(parse_side)?,
            input: args.free_from_str()?,
        },
        Some("mark") => Command::Mark {
            side: args.free_from_fn(parse_side)?,
            label: args.free_from_str()?,
            seconds: args.free_from_str()?,
        },
        Some("edit") => Command::Edit {
            id: args.free_from_str()?,
            side: args.free_from_fn(parse_side)?,
            text: args.free_from_str()?,
        },
        Some("delete") => Command::Delete {
            id: args.free_from_str()?,
        },
        Some("share") => {
            let no_markers = args.contains("--no-markers");
            let no_time = args.contains("--no-time");
            Command::Share {
                options: ShareOptions {
                    include_markers: !no_markers,
                    include_time: !no_time,
                },
                copy: args.contains("--copy"),
                explicit: no_markers || no_time,
            }
        }
        Some("open") => Command::Open {
            link: args.free_from_fn(parse_url)?,
        },
        Some("clear") => Command::Clear,
        Some("keys") => Command::Keys {
            duration: args
                .opt_value_from_str("--duration")?
                .unwrap_or(DEFAULT_KEYS_DURATION),
            script: args.free_from_str()?,
        },
        Some(other) => {
            return Err(pico_args::Error::ArgumentParsingFailed {
                cause: format!("unknown command: {other}"),
            })
        }
    };

    let remaining = args.finish();
    if !remaining.is_empty() {
        tracing::warn!(?remaining, "ignoring unused arguments");
    }

    Ok(Some(Cli {
        data_dir,
        config_dir,
        session,
        diagnostics,
        verbose,
        command,
    }))
}

fn print_session(workspace: &Workspace) {
    println!(
        "sync mode: {}",
        if workspace.sync().sync_mode() { "on" } else { "off" }
    );
    for side in Side::BOTH {
        let adapter = workspace.adapter(side);
        match adapter.source() {
            Some(source) => {
                let status = if adapter.needs_reselect() {
                    " (unavailable, select the file again)"
                } else if adapter.is_failed() {
                    " (failed to load)"
                } else {
                    ""
                };
                println!(
                    "{side:<5}: {} [{}] at {}{status}",
                    source.display_title(),
                    source.url,
                    format_time(adapter.state().current_time)
                );
            }
            None => println!("{side:<5}: -"),
        }
    }
    if workspace.markers().is_empty() {
        println!("markers: none");
        return;
    }
    println!("markers:");
    for marker in workspace.markers() {
        println!(
            "  #{:<3} {:<8} left {:>6}  right {:>6}",
            marker.id.0,
            marker.label,
            format_optional_time(marker.left_time),
            format_optional_time(marker.right_time)
        );
    }
}

/// Replays a key script such as `down:d wait:600 up:d` with real timers.
async fn replay_keys(workspace: &mut Workspace, script: &str, duration: f64) -> Result<()> {
    for side in Side::BOTH {
        if workspace.adapter(side).is_loaded() {
            workspace.handle_player_event(side, PlayerEvent::Ready { duration });
        }
    }

    for token in script.split([' ', ',']).filter(|t| !t.is_empty()) {
        let (op, arg) = token.split_once(':').unwrap_or((token, ""));
        match op {
            "down" => {
                workspace.handle_key_down(arg, FocusTarget::None);
            }
            "up" => workspace.handle_key_up(arg),
            "press" => {
                workspace.handle_key_down(arg, FocusTarget::None);
                workspace.handle_key_up(arg);
            }
            "wait" => {
                let millis: u64 = arg
                    .parse()
                    .map_err(|_| Error::Config(format!("invalid wait in key script: {token}")))?;
                workspace.run_for(Duration::from_millis(millis)).await;
            }
            _ => return Err(Error::Config(format!("invalid key script step: {token}"))),
        }
        workspace.drain_pending();
    }

    for side in Side::BOTH {
        println!("{side:<5}: {:.3}s", workspace.current_time(side));
    }
    Ok(())
}

fn copy_to_clipboard(workspace: &mut Workspace, options: ShareOptions) -> Result<()> {
    let mut system = SystemClipboard;
    let mut terminal = Osc52Clipboard::stdout();
    let mut sinks: [&mut dyn ClipboardSink; 2] = [&mut system, &mut terminal];
    match workspace.copy_share_link(options, &mut sinks)? {
        CopyOutcome::Copied { via } => eprintln!("link copied ({via})"),
        CopyOutcome::Manual(link) => {
            eprintln!("clipboard unavailable, copy the link manually:");
            println!("{link}");
        }
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let (config, warning) = config::load();
    if let Some(key) = warning {
        tracing::warn!(warning = %key, "using default configuration");
    }
    let session_name = cli
        .session
        .clone()
        .unwrap_or_else(|| config.session_name().to_string());
    let storage = Box::new(FileStorage::open(&session_name)?);

    let share_link = match &cli.command {
        Command::Open { link } => Some(link.clone()),
        _ => None,
    };
    let (mut workspace, warnings) = Workspace::restore(config, storage, share_link.as_ref());
    for key in warnings {
        tracing::warn!(%key, "skipped malformed session value");
    }

    match cli.command {
        Command::Show | Command::Open { .. } => print_session(&workspace),
        Command::Load { side, input } => {
            workspace.load_video(side, &input)?;
            print_session(&workspace);
        }
        Command::Mark {
            side,
            label,
            seconds,
        } => {
            let id = workspace.set_marker(&label, side, seconds)?;
            println!("marker #{} {label}: {side} {}", id.0, format_time(seconds));
        }
        Command::Edit { id, side, text } => {
            let seconds = workspace.edit_marker_time(MarkerId(id), side, &text)?;
            println!("marker #{id}: {side} {}", format_time(seconds));
        }
        Command::Delete { id } => {
            let removed = workspace.delete_marker(MarkerId(id))?;
            println!("deleted marker #{id} {}", removed.label);
        }
        Command::Share {
            options,
            copy,
            explicit,
        } => {
            let options = if explicit {
                options
            } else {
                workspace.default_share_options()
            };
            if copy {
                copy_to_clipboard(&mut workspace, options)?;
            } else {
                println!("{}", workspace.share_url(options)?);
            }
        }
        Command::Clear => println!("{}", workspace.clear()?),
        Command::Keys { script, duration } => {
            replay_keys(&mut workspace, &script, duration).await?;
        }
    }

    if cli.diagnostics {
        let path = workspace
            .diagnostics()
            .export_to_file(generate_default_filename())?;
        eprintln!("diagnostics written to {}", path.display());
    }
    workspace.shutdown();
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match parse_args() {
        Ok(Some(cli)) => cli,
        Ok(None) => {
            print!("{HELP}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("error: {err}\n\n{HELP}");
            return ExitCode::FAILURE;
        }
    };

    app::logging::init_logging(cli.verbose);
    app::paths::init_cli_overrides(cli.data_dir.clone(), cli.config_dir.clone());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
