use clap::{Parser, Subcommand};
use pview_core::{
    effective_layout, is_narrow_viewport, layout_for, ActivityId, PatientViewSession, ViewConfig,
    ViewResult, ViewState, NARROW_VIEWPORT_BREAKPOINT,
};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "pview")]
#[command(about = "PView patient detail panel tooling")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the layout table
    Layout {
        /// Viewport width; applies the narrow-viewport override when given
        #[arg(long)]
        width: Option<u32>,
    },
    /// Print the view state ordering
    Order,
    /// Replay navigation steps and print a JSON snapshot after each one
    ///
    /// Steps: `summary:ID`, `note:ID`, `fullView:ID`, `default`, `back`, `toggle`, `escape`,
    /// `reset`.
    Replay {
        steps: Vec<String>,
        /// History cap for the replayed session
        #[arg(long)]
        max_history: Option<usize>,
    },
}

/// One replay step.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Transition(ViewState, Option<ActivityId>),
    Back,
    Toggle,
    Escape,
    Reset,
}

fn parse_step(input: &str) -> ViewResult<Step> {
    match input.trim() {
        "back" => return Ok(Step::Back),
        "toggle" => return Ok(Step::Toggle),
        "escape" => return Ok(Step::Escape),
        "reset" => return Ok(Step::Reset),
        _ => {}
    }

    let (state, id) = match input.split_once(':') {
        Some((state, id)) => (state, Some(ActivityId::new(id)?)),
        None => (input, None),
    };
    Ok(Step::Transition(state.parse()?, id))
}

fn apply_step(session: &mut PatientViewSession, step: Step) -> ViewResult<()> {
    match step {
        Step::Transition(state, id) => session.transition_to(state, id).map(|_| ()),
        Step::Back => {
            session.go_back();
            Ok(())
        }
        Step::Toggle => session.toggle_full_view().map(|_| ()),
        Step::Escape => session.exit_full_view().map(|_| ()),
        Step::Reset => {
            session.reset();
            Ok(())
        }
    }
}

/// Replays `steps` against a fresh session, recording the outcome of each step.
///
/// A failing step is reported and the replay continues with the session unchanged.
fn replay(steps: &[String], config: &ViewConfig) -> Vec<Value> {
    let mut session = PatientViewSession::with_config(config);
    steps
        .iter()
        .map(|raw| {
            let outcome = parse_step(raw).and_then(|step| apply_step(&mut session, step));
            match outcome {
                Ok(()) => json!({ "step": raw, "ok": true, "snapshot": session.snapshot() }),
                Err(e) => json!({
                    "step": raw,
                    "ok": false,
                    "error": e.to_string(),
                    "snapshot": session.snapshot(),
                }),
            }
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Layout { width }) => {
            let narrow = width.map(is_narrow_viewport).unwrap_or(false);
            if let Some(width) = width {
                println!(
                    "Viewport {}px ({} breakpoint {}px)",
                    width,
                    if narrow { "below" } else { "at or above" },
                    NARROW_VIEWPORT_BREAKPOINT
                );
            }
            for state in ViewState::ORDER {
                let layout = if width.is_some() {
                    effective_layout(state, narrow)
                } else {
                    layout_for(state)
                };
                println!(
                    "{:<9} header {:>3}px  {:.1}s  {}",
                    state.as_str(),
                    layout.header_height,
                    layout.duration().as_secs_f32(),
                    layout.easing.as_str()
                );
            }
        }
        Some(Commands::Order) => {
            for state in ViewState::ORDER {
                println!("{} {}", state.ordinal(), state);
            }
        }
        Some(Commands::Replay { steps, max_history }) => {
            if steps.is_empty() {
                return Err("no replay steps given".into());
            }
            let config = match max_history {
                Some(max) => ViewConfig::new(max, NARROW_VIEWPORT_BREAKPOINT)?,
                None => ViewConfig::default(),
            };
            for line in replay(&steps, &config) {
                println!("{}", line);
            }
        }
        None => {
            println!("Use 'pview --help' for commands");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pview_core::ViewError;

    fn steps(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_step_variants() {
        assert_eq!(parse_step("back").unwrap(), Step::Back);
        assert_eq!(
            parse_step("default").unwrap(),
            Step::Transition(ViewState::Default, None)
        );
        assert_eq!(
            parse_step("fullView:visit-1").unwrap(),
            Step::Transition(ViewState::FullView, Some(ActivityId::new("visit-1").unwrap()))
        );
    }

    #[test]
    fn test_parse_step_rejects_unknown_and_blank() {
        assert!(matches!(
            parse_step("sideways"),
            Err(ViewError::InvalidState(_))
        ));
        assert!(matches!(
            parse_step("note: "),
            Err(ViewError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_replay_scenarios() {
        let out = replay(
            &steps(&[
                "summary:visit-42",
                "note:visit-42",
                "toggle",
                "toggle",
                "back",
                "reset",
            ]),
            &ViewConfig::default(),
        );

        assert_eq!(out[0]["snapshot"]["state"], "summary");
        assert_eq!(out[1]["snapshot"]["historyDepth"], 2);
        assert_eq!(out[2]["snapshot"]["state"], "fullView");
        assert_eq!(out[3]["snapshot"]["state"], "note");
        assert_eq!(out[3]["snapshot"]["historyDepth"], 2);
        assert_eq!(out[4]["snapshot"]["state"], "summary");
        assert_eq!(out[5]["snapshot"]["state"], "default");
        assert_eq!(out[5]["snapshot"]["historyDepth"], 0);
        assert!(out.iter().all(|o| o["ok"] == true));
    }

    #[test]
    fn test_replay_reports_contract_violation_and_continues() {
        let out = replay(&steps(&["summary", "note:x"]), &ViewConfig::default());

        assert_eq!(out[0]["ok"], false);
        assert_eq!(out[0]["snapshot"]["state"], "default");
        assert_eq!(out[1]["ok"], true);
        assert_eq!(out[1]["snapshot"]["state"], "note");
    }
}
