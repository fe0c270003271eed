use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    clai::logging::init();

    match clai::run().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
