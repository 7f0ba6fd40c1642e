use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "governor", version, about = "Dispatch governor: routes agent requests and tracks executions")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file; defaults to ./governor.toml, then ~/.governor/config.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server (default).
    Serve(ServeArgs),
    /// Dispatch one request through a running server.
    Route(RouteArgs),
    /// Print the status of one execution.
    Status(StatusArgs),
    /// Dump one full execution record from the configured store.
    Inspect(InspectArgs),
    /// Dump the commander singleton from the configured store.
    Commander,
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct ServeArgs {
    #[arg(long)]
    pub host: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    /// Registry JSON file.
    #[arg(long)]
    pub registry: Option<PathBuf>,

    /// In-memory store and mock workflow service.
    #[arg(long)]
    pub mock: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RemoteArgs {
    #[arg(long, default_value = "http://localhost:8080")]
    pub server: String,

    /// Shared secret; defaults to the configured governor key.
    #[arg(long)]
    pub key: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RouteArgs {
    #[command(flatten)]
    pub remote: RemoteArgs,

    #[arg(long)]
    pub slot: u8,

    #[arg(long)]
    pub agent: String,

    /// JSON payload.
    #[arg(long, default_value = "{}")]
    pub payload: String,

    /// Poll status until the execution settles.
    #[arg(long)]
    pub wait: bool,

    #[arg(long, default_value_t = 2000)]
    pub poll_interval_ms: u64,

    #[arg(long, default_value_t = 10)]
    pub max_polls: u32,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct StatusArgs {
    #[command(flatten)]
    pub remote: RemoteArgs,

    pub execution_id: String,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct InspectArgs {
    pub execution_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_serve() {
        let args = Args::try_parse_from(["governor"]).unwrap();
        assert!(args.command.is_none());
        assert!(args.config.is_none());
    }

    #[test]
    fn test_route_args() {
        let args = Args::try_parse_from([
            "governor",
            "route",
            "--slot",
            "2",
            "--agent",
            "oracle-agent",
            "--payload",
            r#"{"task":"x"}"#,
            "--wait",
            "--key",
            "k",
        ])
        .unwrap();
        let Some(Commands::Route(route)) = args.command else {
            panic!("expected route");
        };
        assert_eq!(route.slot, 2);
        assert_eq!(route.agent, "oracle-agent");
        assert!(route.wait);
        assert_eq!(route.max_polls, 10);
        assert_eq!(route.remote.server, "http://localhost:8080");
        assert_eq!(route.remote.key.as_deref(), Some("k"));
    }

    #[test]
    fn test_serve_with_global_config() {
        let args =
            Args::try_parse_from(["governor", "serve", "--port", "9000", "--mock", "--config", "g.toml"])
                .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("g.toml")));
        let Some(Commands::Serve(serve)) = args.command else {
            panic!("expected serve");
        };
        assert_eq!(serve.port, Some(9000));
        assert!(serve.mock);
    }

    #[test]
    fn test_store_reading_commands() {
        let args = Args::try_parse_from(["governor", "inspect", "http_42", "--config", "g.toml"])
            .unwrap();
        let Some(Commands::Inspect(inspect)) = args.command else {
            panic!("expected inspect");
        };
        assert_eq!(inspect.execution_id, "http_42");
        assert_eq!(args.config, Some(PathBuf::from("g.toml")));

        let args = Args::try_parse_from(["governor", "commander"]).unwrap();
        assert!(matches!(args.command, Some(Commands::Commander)));
        assert!(Args::try_parse_from(["governor", "inspect"]).is_err());
    }
}
