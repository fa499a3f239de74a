use metroid_rl::rollout::parse_episode_count;
use metroid_rl::{EnvError, EpisodeConfig, RamEmulator, RolloutBuilder};
use tracing::Level;

fn init_logging() {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();
}

#[tokio::main]
async fn main() -> Result<(), EnvError> {
    init_logging();
    let mut args = std::env::args().skip(1);
    let configuration = match args.next() {
        Some(path) => EpisodeConfig::load(path)?,
        None => EpisodeConfig::short(),
    };
    let episodes = match args.next() {
        Some(value) => parse_episode_count(&value)?,
        None => 1,
    };

    let rollout = RolloutBuilder::new(configuration)
        .episodes(episodes)
        .start(RamEmulator::new())?;

    let cancel_token = rollout.cancel_token();
    tokio::spawn(async move {
        tokio::select! {
            _ = cancel_token.cancelled() => {}
            result = tokio::signal::ctrl_c() => {
                if result.is_ok() {
                    tracing::info!("Interrupted, stopping rollout");
                }
                cancel_token.cancel();
            }
        }
    });

    let summary = rollout.join().await?;
    tracing::info!(
        "Played {} episode(s), {} steps, {} deaths, total reward {:.3}",
        summary.episodes,
        summary.steps,
        summary.deaths,
        summary.total_reward
    );
    Ok(())
}
