mod render;
mod replay_camera;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{ArgGroup, Parser};
use client::{
    AcquisitionController, ClientConfig, ConfigError, HttpRecognitionService, Payload,
    SubmissionState, SubmissionWorkflow,
};
use render::render_outcome;
use replay_camera::ReplayCamera;

#[derive(Parser, Debug)]
#[command(
    name = "food-recognize",
    version,
    about = "Identify the food in a photo and show its nutrition facts"
)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(["image", "data_uri", "data_uri_file"])
))]
struct Args {
    /// Image file to upload
    image: Option<PathBuf>,

    /// Camera frame as `data:<type>;base64,<data>`
    #[arg(long)]
    data_uri: Option<String>,

    /// File holding a camera frame in data-uri form
    #[arg(long)]
    data_uri_file: Option<PathBuf>,

    /// YAML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base url of the recognition service
    #[arg(long)]
    url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = Args::parse();
    match run(args).await {
        Ok(code) => code,
        Err(e) => report_setup_error(&mut std::io::stderr(), e.as_ref()),
    }
}

fn report_setup_error(out: &mut impl Write, err: &dyn std::error::Error) -> ExitCode {
    let _ = writeln!(out, "Error: {}", err);
    ExitCode::from(2)
}

async fn run(args: Args) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = load_config(&args)?;
    log::info!("Recognition endpoint: {}", config.endpoint()?);

    let frame = match (&args.data_uri, &args.data_uri_file) {
        (Some(encoded), _) => Some(encoded.clone()),
        (None, Some(path)) => Some(std::fs::read_to_string(path)?),
        (None, None) => None,
    };
    let mut acquisition =
        AcquisitionController::with_facing(ReplayCamera::new(frame), config.default_facing);

    if let Some(path) = &args.image {
        acquisition.select_payload(read_image(path)?);
    } else {
        acquisition.toggle_camera()?;
        let captured = acquisition.capture_frame().map(|_| ());
        acquisition.toggle_camera()?;
        captured?;
    }

    let payload = acquisition
        .payload()
        .cloned()
        .ok_or("no image was selected")?;

    let service = HttpRecognitionService::new(&config)?;
    let workflow = SubmissionWorkflow::with_policy(service, config.race_policy);
    let settled = workflow.submit(payload).await;

    print!("{}", render_outcome(&settled));

    Ok(match settled {
        SubmissionState::Succeeded(_) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}

fn load_config(args: &Args) -> Result<ClientConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    }
    .with_env_overrides()?;

    if let Some(url) = &args.url {
        config.base_url = url.clone();
    }
    if let Some(secs) = args.timeout {
        config.request_timeout = Some(Duration::from_secs(secs));
    }

    config.endpoint()?;
    Ok(config)
}

fn read_image(path: &Path) -> Result<Payload, std::io::Error> {
    let bytes = std::fs::read(path)?;
    let media_type = mime_guess::from_path(path).first_or_octet_stream();
    if media_type.type_() != mime_guess::mime::IMAGE {
        log::warn!(
            "{} does not look like an image ({}), sending anyway",
            path.display(),
            media_type
        );
    }

    let payload = Payload::new(bytes, media_type.essence_str());
    Ok(match path.file_name().and_then(|name| name.to_str()) {
        Some(name) => payload.with_file_name(name),
        None => payload,
    })
}
