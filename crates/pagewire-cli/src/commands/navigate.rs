//! The `navigate` command.
//!
//! Replays a list of paths through the site's navigation loop, one at a
//! time, and prints every frame the navigator presents. Each path waits for
//! its view (or its failure) and for the page transition to settle before
//! the next one is pushed.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use pagewire_core::{PagewireError, PagewireResult, ResolutionFailure, Settings};
use pagewire_router::{
    ErrorPresenter, HistoryProvider, LogErrorPresenter, MemoryHistory, NavigationContext,
    Navigator,
};

use crate::command::ManagementCommand;

/// Replays navigations and prints the presented frames.
pub struct NavigateCommand;

/// Logs failures and forwards them to the replay loop.
struct ForwardingPresenter(mpsc::UnboundedSender<ResolutionFailure>);

impl ErrorPresenter for ForwardingPresenter {
    fn present(&self, failure: &ResolutionFailure, context: &NavigationContext) {
        LogErrorPresenter.present(failure, context);
        self.0.send(failure.clone()).ok();
    }
}

/// Drives `navigator` over `paths`, calling `emit` once per output line.
///
/// Lines are `> path` when a navigation starts, the display form of each
/// presented frame, and `error: ...` for a failed navigation. Frames
/// published faster than they are observed coalesce into the latest one.
pub async fn replay<F>(navigator: Navigator, paths: &[String], mut emit: F) -> PagewireResult<()>
where
    F: FnMut(String) + Send,
{
    let Some(first) = paths.first() else {
        return Err(PagewireError::ConfigurationError(
            "navigate needs at least one path".to_string(),
        ));
    };

    let (failures_tx, mut failures) = mpsc::unbounded_channel();
    let navigator =
        Arc::new(navigator.with_presenter(Arc::new(ForwardingPresenter(failures_tx))));
    let history = Arc::new(MemoryHistory::new(first));
    let mut frames = navigator.frames();

    let runner = tokio::spawn({
        let navigator = Arc::clone(&navigator);
        let history = Arc::clone(&history);
        async move { navigator.run(&*history).await }
    });

    let result = async {
        for (index, path) in paths.iter().enumerate() {
            if index > 0 {
                history.push(path);
            }
            emit(format!("> {}", history.current_path()));

            loop {
                tokio::select! {
                    // Frames first: a fallback published before a failure
                    // must be printed before it.
                    biased;
                    changed = frames.changed() => {
                        changed.map_err(|_| {
                            PagewireError::ImproperlyConfigured(
                                "navigator stopped publishing frames".to_string(),
                            )
                        })?;
                        let frame = frames.borrow_and_update().clone();
                        if let Some(frame) = frame {
                            let settled = !frame.is_fallback;
                            emit(frame.to_string());
                            if settled {
                                break;
                            }
                        }
                    }
                    Some(failure) = failures.recv() => {
                        emit(format!("error: {failure}"));
                        break;
                    }
                }
            }

            navigator.transitioner().wait_settled().await;
        }
        Ok::<(), PagewireError>(())
    }
    .await;

    runner.abort();
    result
}

#[async_trait]
impl ManagementCommand for NavigateCommand {
    fn name(&self) -> &'static str {
        "navigate"
    }

    fn help(&self) -> &'static str {
        "Replay navigations and print every presented frame"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("paths")
                .required(true)
                .num_args(1..)
                .value_name("PATH")
                .help("Paths to visit, in order"),
        )
    }

    async fn handle(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> Result<(), PagewireError> {
        let paths: Vec<String> = matches
            .get_many::<String>("paths")
            .map(|values| values.cloned().collect())
            .unwrap_or_default();
        let navigator = pagewire_site::navigator(settings)?;
        replay(navigator, &paths, |line| println!("{line}")).await
    }
}
