use trail_cli::trail_cli_opts::TrailCliOpts;

#[tokio::main]
async fn main() {
    env_logger::init();

    match TrailCliOpts::process_args().await {
        Ok(()) => (),
        Err(e) => {
            if e.to_string().contains("Broken pipe") {
            } else {
                panic!("{e}")
            }
        }
    }
}
