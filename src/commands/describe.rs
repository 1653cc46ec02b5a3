use std::{error::Error, io, path::PathBuf};

use clap::Args;
use rustyoptions::{
    config::{manager::load_api, resolver::get_config_path_cwd},
    http::router::find_route,
    options::build_body,
};
use tracing::info;

/// Print the OPTIONS body a request to a path would receive.
#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Config file describing the API
    #[arg(short, long, value_name = "FILE")]
    pub config: PathBuf,

    /// Request path, e.g. /widgets/42
    #[arg(short, long, value_name = "PATH")]
    pub path: String,
}

pub async fn run(args: DescribeArgs) -> Result<(), Box<dyn Error>> {
    let cfg = get_config_path_cwd(&args.config)?;
    info!(cfg = %cfg.display(), path = %args.path, "describing resource");

    let api = load_api(&cfg)?;
    let matched = find_route(&api.routes, &args.path).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("no resource is routed at '{}'", args.path),
        )
    })?;

    let body = build_body(&matched.params, &api.config)?;
    println!("{body}");
    Ok(())
}
