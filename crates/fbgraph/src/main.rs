use std::time::Duration;

use clap::Parser;
use fbgraph::GraphAgent;
use fbgraph::oauth::{AuthClient, ClientConfig, ClientOptions, loopback::LoopbackConfig};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "fbgraph - Facebook login demo")]
struct Args {
    /// App id from the developer dashboard
    #[arg(long, env = "FBGRAPH_APP_ID")]
    app_id: String,

    /// App secret
    #[arg(long, env = "FBGRAPH_APP_SECRET", hide_env_values = true)]
    app_secret: String,

    /// Callback URL registered with the app; must point at this machine
    #[arg(long, default_value = "http://localhost:4000/auth/callback")]
    callback: String,

    /// Permission to request (repeatable)
    #[arg(short, long = "scope", default_value = "public_profile")]
    scopes: Vec<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Print the login URL without opening a browser
    #[arg(long)]
    no_browser: bool,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let options = ClientOptions::builder()
        .timeout(Duration::from_secs(args.timeout))
        .build();
    let config = ClientConfig::new(args.app_id, args.app_secret, &args.callback, args.scopes)?;
    let auth = AuthClient::with_options(config, reqwest::Client::new(), options);

    let token = auth
        .login_with_local_server(LoopbackConfig {
            open_browser: !args.no_browser,
            ..Default::default()
        })
        .await?;
    println!("logged in, token expires {}", token.expires_at);

    let info = auth.introspect_session().await?;
    println!(
        "token valid: {} (app {}, scopes: {})",
        info.is_valid,
        info.application,
        info.scopes.join(",")
    );

    let agent = GraphAgent::from(auth);
    let me = agent.user_with_fields(&["id", "name", "email"]).await?;
    println!("\nprofile:");
    println!("{}", serde_json::to_string_pretty(&me).into_diagnostic()?);

    let picture = agent.picture(200, 200, "").await?;
    println!("\npicture: {}", picture.data.url);

    Ok(())
}
