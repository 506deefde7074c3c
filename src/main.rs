use static_group_sync::args::InvocationParams;
use static_group_sync::config::{ApiSettings, Config, DEFAULT_SECRET_CONFIG, DEFAULT_SHARED_CONFIG};
use static_group_sync::error::GroupSyncError;
use static_group_sync::services::group_sync::GroupSync;
use static_group_sync::services::update::UpdateResponse;
use std::env;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Arguments are checked before any file or network I/O.
    let params = match InvocationParams::from_args(env::args()) {
        Ok(params) => params,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(e.exit_code());
        }
    };

    match run(&params).await {
        Ok(response) => {
            println!("{}", response.body);
        }
        Err(e) => {
            log::error!("Group update failed: {}", e);
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    }
}

async fn run(params: &InvocationParams) -> Result<UpdateResponse, GroupSyncError> {
    let config = Config::load(DEFAULT_SHARED_CONFIG, DEFAULT_SECRET_CONFIG)?;
    let settings = ApiSettings::from_config(&config)?;
    let sync = GroupSync::new(settings)?;
    sync.run(params).await
}
