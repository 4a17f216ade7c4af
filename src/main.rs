use chrono::Local;
use hydration_tracker::{
    AppState, Settings, load_data, prepare_data_dir, router,
    schedule::{ScheduledTask, roll_over_day, until_next_midnight},
};
use std::net::SocketAddr;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let settings = Settings::from_env()?;
    prepare_data_dir(&settings.data_path).await?;

    let data = load_data(&settings.data_path).await;
    let state = AppState::new(&settings, data);

    let rollover = {
        let state = state.clone();
        ScheduledTask::spawn(
            || until_next_midnight(Local::now().naive_local()),
            move || {
                let state = state.clone();
                async move {
                    if let Err(err) = roll_over_day(&state, Local::now().date_naive()).await {
                        error!("daily rollover failed: {}", err.message);
                    }
                }
            },
        )
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    info!(
        goal_formula = %settings.goal_formula,
        data_path = %settings.data_path.display(),
        "listening on http://{addr}"
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    rollover.cancel().await;
    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
}
