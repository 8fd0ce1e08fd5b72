fn main() {
    tracing_subscriber::fmt::init();
    let cli = logseq_analyzer_rs::cli::parse();
    let code = logseq_analyzer_rs::app::run_cli(cli);
    if code != 0 {
        std::process::exit(code);
    }
}
