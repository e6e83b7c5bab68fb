use super::{notifier, open_tracker, print_geo_status};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::watch::{WatchSettings, run_watch};
use crate::errors::AppResult;
use crate::geo::replay::ReplaySampler;
use crate::geo::sampler::WatchOptions;
use crate::ui::messages::{info, success};
use std::time::Duration;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Watch {
        samples,
        ticks,
        interval_ms,
        follow,
    } = cmd
    {
        let source = samples.as_deref().unwrap_or("-");
        let mut sampler =
            ReplaySampler::from_arg(source).with_interval(Duration::from_millis(*interval_ms));
        let mut tracker = open_tracker(cfg)?;

        let options = WatchOptions::from_config(cfg);
        let settings = WatchSettings {
            tick: Duration::from_millis(cfg.tick_interval_ms),
            max_ticks: *ticks,
            stop_when_drained: !*follow,
        };

        info(format!(
            "Watching positions from {} ({})",
            if source == "-" { "stdin" } else { source },
            tracker.state().mode.label()
        ));

        let notifier = notifier(cfg);
        let summary = run_watch(
            &mut tracker,
            &mut sampler,
            &options,
            &settings,
            &notifier,
            |event| success(event),
        )?;

        print_geo_status(tracker.geo_status(), tracker.state());
        success(format!(
            "Watch ended: {} readings ({} errors), {} ticks, {} events",
            summary.readings,
            summary.errors,
            summary.ticks,
            summary.events.len()
        ));
    }

    Ok(())
}
