//! Nav command implementation
//!
//! Replays hash changes and back actions through a [`Session`] the way the
//! browser adapter feeds them, printing each transition.

use clap::Args;

use crate::app::{Input, Session};
use crate::catalog::CatalogSource;
use crate::cli::SourceArgs;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::nav::Transition;
use crate::output::{format_nav, NavStep, OutputFormat};

/// Arguments for the nav command
#[derive(Args, Debug, Default)]
#[command(after_help = "INPUTS:
    #<hash>     Hash change (e.g. #properties, #unit-CRC-501, #search-crc-corporate-center-5)
    pop:#<hash> Browser back/forward landing on <hash>
    back        Generic back action
    back-unit   Back from the unit details page
    retry       Reload the current page after a failed fetch

EXAMPLES:
    leasehub nav \"#properties\" \"#orchard-plaza\" back
    leasehub nav --start \"#search-crc-corporate-center-5\" \"#unit-CRC-501\" back-unit
    leasehub nav \"#unit-CRC-501\" --load --demo --json")]
pub struct NavArgs {
    /// Inputs to replay, in order
    #[arg(allow_hyphen_values = true)]
    pub inputs: Vec<String>,

    /// Hash the session starts on (default: home)
    #[arg(long, default_value = "")]
    pub start: String,

    /// Fetch page data from the catalog after each transition
    #[arg(short, long)]
    pub load: bool,

    /// JSON output
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub source: SourceArgs,
}

fn snapshot(session: &Session, input: String, transition: Transition, load: bool) -> NavStep {
    let navigator = session.navigator();
    NavStep {
        input,
        transition,
        location: navigator.location(),
        state: navigator.state().clone(),
        view: load.then(|| session.view().clone()),
    }
}

/// Feed every input to a fresh session. Without a source, only the
/// navigation state is tracked and page loads are dropped.
pub async fn replay(
    start: &str,
    inputs: &[String],
    source: Option<&dyn CatalogSource>,
) -> Result<Vec<NavStep>> {
    let parsed = inputs
        .iter()
        .map(|raw| raw.parse::<Input>())
        .collect::<Result<Vec<_>>>()?;

    let mut session = Session::new(start);
    if let (Some(source), Some(load)) = (source, session.reload()) {
        let loaded = load.load(source).await;
        session.complete(loaded);
    }

    let mut steps = Vec::with_capacity(inputs.len() + 1);
    let label = if start.is_empty() {
        "start".to_string()
    } else {
        format!("start {}", start)
    };
    steps.push(snapshot(
        &session,
        label,
        Transition::none(),
        source.is_some(),
    ));

    for (raw, input) in inputs.iter().zip(parsed) {
        let transition = match source {
            Some(source) => session.run(input, source).await,
            None => session.dispatch(input).transition,
        };
        steps.push(snapshot(&session, raw.clone(), transition, source.is_some()));
    }
    Ok(steps)
}

/// Run the nav command
pub async fn run(args: NavArgs, mut config: Config) -> Result<()> {
    args.source.apply(&mut config);
    let steps = if args.load {
        let source = args.source.open(&config)?;
        replay(&args.start, &args.inputs, Some(source.as_ref())).await?
    } else {
        replay(&args.start, &args.inputs, None).await?
    };
    print!(
        "{}",
        format_nav(&steps, OutputFormat::from_json_flag(args.json))
    );
    Ok(())
}
