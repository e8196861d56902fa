mod app;

use std::time::Duration;

use clap::Parser;
use log::info;
use openalex_graphs::openalex::{ClientConfig, DEFAULT_API_URL, OpenAlexClient};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Base URL of the OpenAlex REST API.
    #[arg(long, env = "OPENALEX_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Contact address sent as `mailto` to join the polite pool.
    #[arg(long, env = "OPENALEX_MAILTO")]
    mailto: Option<String>,

    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Domain shown first, by id or name.
    #[arg(long)]
    domain: Option<String>,

    /// Open this subfield's page once the hierarchy is loaded.
    #[arg(long)]
    subfield: Option<String>,
}

impl Args {
    fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_url: self.api_url.clone(),
            mailto: self.mailto.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.client_config();
    info!("using OpenAlex API at {}", config.api_url);

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "OpenAlex Graphs",
        options,
        Box::new(move |cc| {
            let client = OpenAlexClient::from_config(config);
            Ok(Box::new(app::OpenAlexApp::new(
                cc,
                client,
                args.domain,
                args.subfield,
            )))
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_build_the_client_config() {
        let args = Args::try_parse_from([
            "openalex-graphs",
            "--api-url",
            "http://localhost:8080/",
            "--mailto",
            "me@example.org",
            "--timeout-secs",
            "5",
        ])
        .expect("flags parse");

        let config = args.client_config();
        assert_eq!(config.api_url, "http://localhost:8080/");
        assert_eq!(config.mailto.as_deref(), Some("me@example.org"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.endpoint_url("works"), "http://localhost:8080/works");
    }
}
